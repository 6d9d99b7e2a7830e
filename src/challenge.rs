//! Round challenges: which block(s) appear, what the label says, and which
//! swipe direction(s) clear them.
//!
//! Every color owns exactly one direction (fixed bijection, never mutated).
//! Hard mode lies with the label text; Insane mode shows two blocks at once
//! and tracks them by id so duplicate colors stay distinguishable.

use crate::difficulty::Mode;
use crate::rng::Rng;

/// The four block colors. Order matches the original mapping table and is
/// what uniform picks index into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::Red, Color::Blue, Color::Green, Color::Yellow];

    /// The one swipe direction that clears a block of this color.
    pub fn required_direction(self) -> Direction {
        match self {
            Color::Red => Direction::Up,
            Color::Blue => Direction::Left,
            Color::Green => Direction::Down,
            Color::Yellow => Direction::Right,
        }
    }

    /// Label word shown to the player.
    pub fn word(self) -> &'static str {
        match self {
            Color::Red => "RED",
            Color::Blue => "BLUE",
            Color::Green => "GREEN",
            Color::Yellow => "YELLOW",
        }
    }

    /// Display hex for blocks, labels and the timer bar.
    pub fn css(self) -> &'static str {
        match self {
            Color::Red => "#ff5f52",
            Color::Blue => "#2a8bff",
            Color::Green => "#00ff88",
            Color::Yellow => "#ffd700",
        }
    }

    /// Lowercase key used for storage paths (skin asset file names).
    pub fn key(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Yellow => "yellow",
        }
    }

    /// The three colors other than `self`, in table order.
    fn others(self) -> [Color; 3] {
        let mut out = [Color::Red; 3];
        let mut i = 0;
        for c in Color::ALL {
            if c != self {
                out[i] = c;
                i += 1;
            }
        }
        out
    }
}

/// Identifies one pending block within a round. Single-block modes use the
/// fixed placeholder; Insane blocks get fresh ids so two same-colored blocks
/// can be cleared (and hidden) independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SwipeId(u64);

impl SwipeId {
    /// Placeholder id for modes that only ever show one block.
    pub const SINGLE: SwipeId = SwipeId(0);
}

/// Hands out session-unique ids for Insane sub-challenges. Starts above the
/// `SINGLE` placeholder and never repeats within a session.
#[derive(Clone, Copy, Debug)]
pub struct IdAlloc {
    next: u64,
}

impl IdAlloc {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn alloc(&mut self) -> SwipeId {
        let id = SwipeId(self.next);
        self.next += 1;
        id
    }
}

impl Default for IdAlloc {
    fn default() -> Self {
        Self::new()
    }
}

/// One block of an Insane-mode pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubChallenge {
    pub color: Color,
    pub direction: Direction,
    pub id: SwipeId,
}

impl SubChallenge {
    fn new(color: Color, id: SwipeId) -> Self {
        Self {
            color,
            direction: color.required_direction(),
            id,
        }
    }
}

/// Everything one round asks of the player.
#[derive(Clone, Copy, Debug)]
pub struct Challenge {
    /// Color of the (first) block; the gameplay-relevant color.
    pub block: Color,
    /// Color named by the label text. Differs from `block` only when Hard
    /// mode rolled a distraction.
    pub text: Color,
    /// Hard-mode second-layer distraction: the ink the label is painted in.
    /// Display-only; `None` renders the label white.
    pub label_paint: Option<Color>,
    /// Derived from `block` via the fixed mapping.
    pub required: Direction,
    /// Insane only: the two blocks shown side by side.
    pub sequence: Option<[SubChallenge; 2]>,
}

/// A swipe the player still owes this round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequiredSwipe {
    pub direction: Direction,
    pub id: SwipeId,
}

/// A generated round: the challenge, the swipes that clear it, and the
/// timer-bar accent (`None` = neutral white).
#[derive(Clone, Debug)]
pub struct Generated {
    pub challenge: Challenge,
    pub swipes: Vec<RequiredSwipe>,
    pub accent: Option<Color>,
}

/// Probability that Hard mode shows a lying label.
const HARD_DISTRACTION_P: f64 = 0.6;

/// Produce the next round for `mode`.
pub fn generate(mode: Mode, rng: &mut Rng, ids: &mut IdAlloc) -> Generated {
    match mode {
        Mode::Insane => {
            let first = SubChallenge::new(Color::ALL[rng.pick(4)], ids.alloc());
            let second = SubChallenge::new(Color::ALL[rng.pick(4)], ids.alloc());
            let accent = Color::ALL[rng.pick(4)];
            Generated {
                challenge: Challenge {
                    block: first.color,
                    text: first.color,
                    label_paint: None,
                    required: first.direction,
                    sequence: Some([first, second]),
                },
                swipes: vec![
                    RequiredSwipe { direction: first.direction, id: first.id },
                    RequiredSwipe { direction: second.direction, id: second.id },
                ],
                accent: Some(accent),
            }
        }
        Mode::Normal | Mode::Hard => {
            let block = Color::ALL[rng.pick(4)];
            let mut text = block;
            let mut label_paint = None;
            let mut accent = None;
            if mode == Mode::Hard {
                if rng.chance(HARD_DISTRACTION_P) {
                    // Distraction text is guaranteed different from the block,
                    // and its ink is guaranteed different from the text.
                    text = block.others()[rng.pick(3)];
                    label_paint = Some(text.others()[rng.pick(3)]);
                }
                accent = Some(Color::ALL[rng.pick(4)]);
            }
            Generated {
                challenge: Challenge {
                    block,
                    text,
                    label_paint,
                    required: block.required_direction(),
                    sequence: None,
                },
                swipes: vec![RequiredSwipe {
                    direction: block.required_direction(),
                    id: SwipeId::SINGLE,
                }],
                accent,
            }
        }
    }
}

/// Outcome of feeding one directional input to the pending set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// `id` was cleared; `round_complete` when nothing is left pending.
    Matched { id: SwipeId, round_complete: bool },
    /// No pending swipe wants this direction. Terminal for the round.
    Mismatch,
}

/// Match `direction` against the pending set. The first entry with that
/// direction is removed, one entry per input, so twin directions in Insane
/// mode are consumed one at a time, in whichever order the player supplies
/// them.
pub fn resolve(direction: Direction, pending: &mut Vec<RequiredSwipe>) -> Resolution {
    match pending.iter().position(|req| req.direction == direction) {
        Some(idx) => {
            let cleared = pending.remove(idx);
            Resolution::Matched {
                id: cleared.id,
                round_complete: pending.is_empty(),
            }
        }
        None => Resolution::Mismatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_is_the_fixed_bijection() {
        assert_eq!(Color::Red.required_direction(), Direction::Up);
        assert_eq!(Color::Blue.required_direction(), Direction::Left);
        assert_eq!(Color::Green.required_direction(), Direction::Down);
        assert_eq!(Color::Yellow.required_direction(), Direction::Right);

        // Bijective: all four directions reached, none twice.
        let mut seen = std::collections::HashSet::new();
        for c in Color::ALL {
            assert!(seen.insert(c.required_direction()));
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn others_excludes_self() {
        for c in Color::ALL {
            let rest = c.others();
            assert_eq!(rest.len(), 3);
            assert!(!rest.contains(&c));
        }
    }

    #[test]
    fn normal_rounds_never_distract() {
        let mut rng = Rng::new(11);
        let mut ids = IdAlloc::new();
        for _ in 0..200 {
            let g = generate(Mode::Normal, &mut rng, &mut ids);
            let ch = g.challenge;
            assert_eq!(ch.text, ch.block);
            assert_eq!(ch.label_paint, None);
            assert_eq!(ch.required, ch.block.required_direction());
            assert!(ch.sequence.is_none());
            assert_eq!(g.accent, None);
            assert_eq!(
                g.swipes,
                vec![RequiredSwipe {
                    direction: ch.block.required_direction(),
                    id: SwipeId::SINGLE
                }]
            );
        }
    }

    #[test]
    fn hard_distraction_text_never_matches_block() {
        let mut rng = Rng::new(3);
        let mut ids = IdAlloc::new();
        let mut distracted = 0;
        for _ in 0..500 {
            let g = generate(Mode::Hard, &mut rng, &mut ids);
            let ch = g.challenge;
            assert_eq!(ch.required, ch.block.required_direction());
            assert!(g.accent.is_some());
            if ch.text != ch.block {
                distracted += 1;
                // Second-layer ink exists and lies about the text too.
                let paint = ch.label_paint.expect("distracted label must be recolored");
                assert_ne!(paint, ch.text);
            } else {
                assert_eq!(ch.label_paint, None);
            }
        }
        // p = 0.6 over 500 rounds; far outside these bounds means the
        // distraction roll is broken, not unlucky.
        assert!((200..=400).contains(&distracted), "distracted {distracted} of 500");
    }

    #[test]
    fn insane_rounds_have_two_uniquely_tagged_entries() {
        let mut rng = Rng::new(5);
        let mut ids = IdAlloc::new();
        let mut seen_ids = std::collections::HashSet::new();
        for _ in 0..200 {
            let g = generate(Mode::Insane, &mut rng, &mut ids);
            let seq = g.challenge.sequence.expect("insane always carries a pair");
            assert_eq!(g.swipes.len(), 2);
            for (entry, swipe) in seq.iter().zip(&g.swipes) {
                assert_eq!(entry.direction, entry.color.required_direction());
                assert_eq!(swipe.direction, entry.direction);
                assert_eq!(swipe.id, entry.id);
                assert!(seen_ids.insert(entry.id), "id reused across rounds");
            }
            assert_ne!(seq[0].id, seq[1].id);
        }
    }

    #[test]
    fn insane_duplicate_colors_are_allowed_and_distinct() {
        let mut rng = Rng::new(0);
        let mut ids = IdAlloc::new();
        // Scan until a duplicate-color pair shows up; uniform picks make one
        // appear quickly (p = 1/4 per round).
        let dup = (0..200)
            .map(|_| generate(Mode::Insane, &mut rng, &mut ids))
            .find(|g| {
                let seq = g.challenge.sequence.unwrap();
                seq[0].color == seq[1].color
            })
            .expect("no duplicate pair in 200 rounds");
        let seq = dup.challenge.sequence.unwrap();
        assert_ne!(seq[0].id, seq[1].id);
    }

    #[test]
    fn resolve_removes_exactly_one_entry_per_input() {
        let a = SwipeId::SINGLE;
        let mut ids = IdAlloc::new();
        let b = ids.alloc();
        // Two pending swipes that both want Up.
        let mut pending = vec![
            RequiredSwipe { direction: Direction::Up, id: a },
            RequiredSwipe { direction: Direction::Up, id: b },
        ];
        assert_eq!(
            resolve(Direction::Up, &mut pending),
            Resolution::Matched { id: a, round_complete: false }
        );
        assert_eq!(pending.len(), 1);
        assert_eq!(
            resolve(Direction::Up, &mut pending),
            Resolution::Matched { id: b, round_complete: true }
        );
        // A third Up has nothing left to clear.
        assert_eq!(resolve(Direction::Up, &mut pending), Resolution::Mismatch);
    }

    #[test]
    fn resolve_order_is_free_for_distinct_directions() {
        let mut ids = IdAlloc::new();
        let red = ids.alloc();
        let blue = ids.alloc();
        let fresh = |red_id, blue_id| {
            vec![
                RequiredSwipe { direction: Direction::Up, id: red_id },
                RequiredSwipe { direction: Direction::Left, id: blue_id },
            ]
        };

        let mut pending = fresh(red, blue);
        assert_eq!(
            resolve(Direction::Left, &mut pending),
            Resolution::Matched { id: blue, round_complete: false }
        );
        assert_eq!(
            resolve(Direction::Up, &mut pending),
            Resolution::Matched { id: red, round_complete: true }
        );

        let mut pending = fresh(red, blue);
        assert_eq!(
            resolve(Direction::Up, &mut pending),
            Resolution::Matched { id: red, round_complete: false }
        );
        assert_eq!(
            resolve(Direction::Left, &mut pending),
            Resolution::Matched { id: blue, round_complete: true }
        );
    }

    #[test]
    fn repeating_a_cleared_direction_is_a_mismatch() {
        let mut ids = IdAlloc::new();
        let mut pending = vec![
            RequiredSwipe { direction: Direction::Up, id: ids.alloc() },
            RequiredSwipe { direction: Direction::Left, id: ids.alloc() },
        ];
        assert!(matches!(
            resolve(Direction::Up, &mut pending),
            Resolution::Matched { .. }
        ));
        // Up's only entry is gone; a second Up fails the round even though
        // the Left entry is still open.
        assert_eq!(resolve(Direction::Up, &mut pending), Resolution::Mismatch);
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn resolve_mismatch_leaves_pending_untouched() {
        let mut pending = vec![RequiredSwipe {
            direction: Direction::Down,
            id: SwipeId::SINGLE,
        }];
        assert_eq!(resolve(Direction::Up, &mut pending), Resolution::Mismatch);
        assert_eq!(pending.len(), 1);
    }
}
