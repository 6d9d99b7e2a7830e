//! Turns raw key names and touch coordinates into game directions.

use crate::challenge::Direction;

/// Minimum travel, in screen pixels, before a touch counts as a swipe.
pub const SWIPE_THRESHOLD_PX: f64 = 50.0;

/// Map a `KeyboardEvent.key` value to a direction. Arrow keys and WASD in
/// either case; everything else is ignored.
pub fn direction_from_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" | "w" | "W" => Some(Direction::Up),
        "ArrowDown" | "s" | "S" => Some(Direction::Down),
        "ArrowLeft" | "a" | "A" => Some(Direction::Left),
        "ArrowRight" | "d" | "D" => Some(Direction::Right),
        _ => None,
    }
}

/// Accumulates one touch gesture at a time. Feed it the start and end points
/// of a touch; it answers with a direction once the travel is big enough.
///
/// Screen coordinates: y grows downward, so a positive vertical delta is a
/// downward swipe.
#[derive(Clone, Copy, Debug, Default)]
pub struct SwipeTracker {
    start: Option<(f64, f64)>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record where the finger came down.
    pub fn begin(&mut self, x: f64, y: f64) {
        self.start = Some((x, y));
    }

    /// Classify the lift-off point against the recorded start.
    ///
    /// Returns `None` when no start was recorded or when both axes stayed
    /// under the threshold (a tap). A tap keeps the start point, matching
    /// the touch handling this replaces; a recognized swipe consumes it, so
    /// each gesture yields at most one direction. The longer axis wins and
    /// an exact tie reads as vertical.
    pub fn end(&mut self, x: f64, y: f64) -> Option<Direction> {
        let (start_x, start_y) = self.start?;
        let dx = x - start_x;
        let dy = y - start_y;
        if dx.abs() < SWIPE_THRESHOLD_PX && dy.abs() < SWIPE_THRESHOLD_PX {
            return None;
        }
        self.start = None;
        Some(if dx.abs() > dy.abs() {
            if dx > 0.0 { Direction::Right } else { Direction::Left }
        } else if dy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        })
    }

    /// Forget any in-flight gesture (round ended mid-touch).
    pub fn cancel(&mut self) {
        self.start = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_wasd_map_in_both_cases() {
        assert_eq!(direction_from_key("ArrowUp"), Some(Direction::Up));
        assert_eq!(direction_from_key("ArrowDown"), Some(Direction::Down));
        assert_eq!(direction_from_key("ArrowLeft"), Some(Direction::Left));
        assert_eq!(direction_from_key("ArrowRight"), Some(Direction::Right));
        assert_eq!(direction_from_key("w"), Some(Direction::Up));
        assert_eq!(direction_from_key("W"), Some(Direction::Up));
        assert_eq!(direction_from_key("s"), Some(Direction::Down));
        assert_eq!(direction_from_key("S"), Some(Direction::Down));
        assert_eq!(direction_from_key("a"), Some(Direction::Left));
        assert_eq!(direction_from_key("A"), Some(Direction::Left));
        assert_eq!(direction_from_key("d"), Some(Direction::Right));
        assert_eq!(direction_from_key("D"), Some(Direction::Right));
    }

    #[test]
    fn other_keys_are_ignored() {
        for key in ["Enter", "Escape", " ", "q", "ArrowUp ", "up", ""] {
            assert_eq!(direction_from_key(key), None, "key {key:?}");
        }
    }

    #[test]
    fn cardinal_swipes() {
        let mut t = SwipeTracker::new();
        t.begin(100.0, 100.0);
        assert_eq!(t.end(180.0, 100.0), Some(Direction::Right));
        t.begin(100.0, 100.0);
        assert_eq!(t.end(20.0, 100.0), Some(Direction::Left));
        t.begin(100.0, 100.0);
        assert_eq!(t.end(100.0, 180.0), Some(Direction::Down));
        t.begin(100.0, 100.0);
        assert_eq!(t.end(100.0, 20.0), Some(Direction::Up));
    }

    #[test]
    fn longer_axis_wins_and_ties_read_vertical() {
        let mut t = SwipeTracker::new();
        t.begin(0.0, 0.0);
        assert_eq!(t.end(90.0, 60.0), Some(Direction::Right));
        t.begin(0.0, 0.0);
        assert_eq!(t.end(60.0, -90.0), Some(Direction::Up));
        // Perfect diagonal: vertical branch.
        t.begin(0.0, 0.0);
        assert_eq!(t.end(70.0, 70.0), Some(Direction::Down));
    }

    #[test]
    fn taps_are_ignored_but_keep_the_start() {
        let mut t = SwipeTracker::new();
        t.begin(100.0, 100.0);
        assert_eq!(t.end(120.0, 110.0), None);
        // Still anchored at the original start; a later lift far enough away
        // from it resolves.
        assert_eq!(t.end(100.0, 240.0), Some(Direction::Down));
    }

    #[test]
    fn threshold_is_inclusive_on_either_axis() {
        let mut t = SwipeTracker::new();
        t.begin(0.0, 0.0);
        assert_eq!(t.end(49.9, 0.0), None);
        assert_eq!(t.end(50.0, 0.0), Some(Direction::Right));
    }

    #[test]
    fn one_direction_per_gesture() {
        let mut t = SwipeTracker::new();
        assert_eq!(t.end(500.0, 500.0), None);
        t.begin(0.0, 0.0);
        assert_eq!(t.end(0.0, -80.0), Some(Direction::Up));
        // Consumed; a stray second lift does nothing.
        assert_eq!(t.end(0.0, -160.0), None);

        t.begin(0.0, 0.0);
        t.cancel();
        assert_eq!(t.end(300.0, 0.0), None);
    }
}
