//! One run of the game, from "start" to the game-over screen.
//!
//! The session is a plain state machine threaded through by whoever owns the
//! clock. Input handling and timer polling both funnel into `&mut self`
//! methods that return an [`Update`], so callers learn about score changes,
//! revive offers and session death from the return value instead of diffing
//! state. Nothing in here touches the DOM, storage or the network.

use crate::challenge::{self, Challenge, Color, Direction, Generated, IdAlloc, RequiredSwipe, SwipeId};
use crate::difficulty::{self, Mode};
use crate::rng::Rng;
use crate::timer::RoundTimer;

/// How long the revive offer stays on screen before it counts as declined.
pub const REVIVE_DECISION_WINDOW_MS: u32 = 5_000;

/// Duration of each step of the "3, 2, 1, GO" resume countdown.
pub const REVIVE_COUNTDOWN_STEP_MS: u32 = 800;

/// Steps in the resume countdown ("3", "2", "1", "GO").
pub const REVIVE_COUNTDOWN_STEPS: u32 = 4;

/// Why a session stopped accepting input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailReason {
    WrongSwipe,
    TimeUp,
}

impl FailReason {
    /// Banner text shown on the failure screen.
    pub fn banner(self) -> &'static str {
        match self {
            FailReason::WrongSwipe => "WRONG SWIPE!",
            FailReason::TimeUp => "TIME'S UP!",
        }
    }
}

/// Where the session currently is. There is no menu phase; the session only
/// exists between "start" and the next "start".
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    Playing,
    /// Failed, but the player holds a credit and gets a short window to
    /// spend it. Gameplay stays frozen on screen behind the offer.
    RevivePrompt {
        reason: FailReason,
        cost: u32,
        expires_at_ms: f64,
    },
    /// Offer accepted and paid; the resume countdown is running.
    Reviving { started_at_ms: f64 },
    GameOver { reason: FailReason },
}

/// What a call into the session changed, for the caller to react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Update {
    /// Nothing happened this tick.
    Idle,
    /// One pending swipe cleared, round still open (first half of a pair).
    Cleared { id: SwipeId },
    /// Round solved and the next one dealt. `scaled` when the budget just
    /// took a decay step.
    RoundWon { scaled: bool },
    /// Session failed but a revive is on offer at the quoted cost.
    ReviveOffered { reason: FailReason, cost: u32 },
    /// Countdown finished, play resumed on a fresh round.
    Resumed,
    /// Session is over. Time for the caller to settle scores and rewards.
    Ended { reason: FailReason },
}

/// Price of the nth revive within one session (1-based). Fixed table for the
/// first three uses, then doubling.
pub fn revive_cost(nth_use: u32) -> u32 {
    match nth_use {
        0 | 1 => 1,
        2 => 3,
        3 => 5,
        n => 5u32.saturating_mul(2u32.saturating_pow(n - 3)),
    }
}

pub struct Session {
    mode: Mode,
    phase: Phase,
    score: u32,
    /// Current round budget; only ever shrinks, except that a revive re-arms
    /// with this same (already shrunk) value.
    budget_ms: u32,
    timer: RoundTimer,
    rng: Rng,
    ids: IdAlloc,
    challenge: Option<Challenge>,
    pending: Vec<RequiredSwipe>,
    accent: Option<Color>,
    /// Snapshot of the player's revive credits, debited as revives are
    /// bought. The shop is unreachable mid-session, so nothing else can
    /// change the balance while we hold it.
    credits: u32,
    revives_used: u32,
}

impl Session {
    /// Begin a run: score zeroed, budget at the mode's initial value, first
    /// challenge dealt and timer armed.
    pub fn start(mode: Mode, credits: u32, rng: Rng, now_ms: f64) -> Session {
        let mut s = Session {
            mode,
            phase: Phase::Playing,
            score: 0,
            budget_ms: mode.initial_budget_ms(),
            timer: RoundTimer::new(),
            rng,
            ids: IdAlloc::new(),
            challenge: None,
            pending: Vec::new(),
            accent: None,
            credits,
            revives_used: 0,
        };
        s.deal(now_ms);
        s
    }

    fn deal(&mut self, now_ms: f64) {
        let Generated { challenge, swipes, accent } =
            challenge::generate(self.mode, &mut self.rng, &mut self.ids);
        self.challenge = Some(challenge);
        self.pending = swipes;
        self.accent = accent;
        self.timer.arm(now_ms, self.budget_ms);
    }

    /// Feed one directional input. Ignored outside of play.
    pub fn apply_input(&mut self, direction: Direction, now_ms: f64) -> Update {
        if self.phase != Phase::Playing {
            return Update::Idle;
        }
        match challenge::resolve(direction, &mut self.pending) {
            challenge::Resolution::Matched { id, round_complete: false } => {
                Update::Cleared { id }
            }
            challenge::Resolution::Matched { id: _, round_complete: true } => {
                self.score += 1;
                let scaled = difficulty::is_scaling_score(self.score);
                if scaled {
                    self.budget_ms = self.mode.scale_budget(self.budget_ms);
                }
                self.deal(now_ms);
                Update::RoundWon { scaled }
            }
            challenge::Resolution::Mismatch => self.fail(FailReason::WrongSwipe, now_ms),
        }
    }

    /// Advance the clock-driven parts: round deadline, revive offer window,
    /// resume countdown. Call once per frame.
    pub fn poll(&mut self, now_ms: f64) -> Update {
        match self.phase {
            Phase::Playing => {
                // The generation check drops expiries from a round that was
                // superseded between polls.
                match self.timer.expired(now_ms) {
                    Some(generation) if generation == self.timer.generation() => {
                        self.fail(FailReason::TimeUp, now_ms)
                    }
                    _ => Update::Idle,
                }
            }
            Phase::RevivePrompt { reason, expires_at_ms, .. } => {
                if now_ms >= expires_at_ms {
                    self.enter_game_over(reason)
                } else {
                    Update::Idle
                }
            }
            Phase::Reviving { started_at_ms } => {
                let total = f64::from(REVIVE_COUNTDOWN_STEPS * REVIVE_COUNTDOWN_STEP_MS);
                if now_ms - started_at_ms >= total {
                    self.resume(now_ms)
                } else {
                    Update::Idle
                }
            }
            Phase::GameOver { .. } => Update::Idle,
        }
    }

    fn fail(&mut self, reason: FailReason, now_ms: f64) -> Update {
        // Hold the timer where it died so the bar stays put behind the
        // overlay, and so no further expiry fires while we wait.
        self.timer.freeze(now_ms);
        let cost = revive_cost(self.revives_used + 1);
        if self.credits >= 1 {
            self.phase = Phase::RevivePrompt {
                reason,
                cost,
                expires_at_ms: now_ms + f64::from(REVIVE_DECISION_WINDOW_MS),
            };
            Update::ReviveOffered { reason, cost }
        } else {
            self.enter_game_over(reason)
        }
    }

    /// Spend credits to continue. Only meaningful while the offer is up; if
    /// the price has escalated past the player's balance the session ends
    /// instead.
    pub fn accept_revive(&mut self, now_ms: f64) -> Update {
        let Phase::RevivePrompt { reason, cost, .. } = self.phase else {
            return Update::Idle;
        };
        if self.credits < cost {
            return self.enter_game_over(reason);
        }
        self.credits -= cost;
        self.revives_used += 1;
        self.phase = Phase::Reviving { started_at_ms: now_ms };
        Update::Idle
    }

    /// Turn the offer down.
    pub fn decline_revive(&mut self) -> Update {
        if let Phase::RevivePrompt { reason, .. } = self.phase {
            self.enter_game_over(reason)
        } else {
            Update::Idle
        }
    }

    fn resume(&mut self, now_ms: f64) -> Update {
        self.phase = Phase::Playing;
        // Same round budget as before the failure, not the mode's initial
        // value. Score is untouched.
        self.deal(now_ms);
        Update::Resumed
    }

    fn enter_game_over(&mut self, reason: FailReason) -> Update {
        self.phase = Phase::GameOver { reason };
        Update::Ended { reason }
    }

    // --- Read-side accessors, mostly for rendering ---

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn budget_ms(&self) -> u32 {
        self.budget_ms
    }

    pub fn revives_used(&self) -> u32 {
        self.revives_used
    }

    /// Credits the session still believes the player holds.
    pub fn credits_left(&self) -> u32 {
        self.credits
    }

    /// Credits spent on revives so far this session.
    pub fn credits_spent(&self) -> u32 {
        (1..=self.revives_used).map(revive_cost).sum()
    }

    pub fn challenge(&self) -> Option<&Challenge> {
        self.challenge.as_ref()
    }

    pub fn pending(&self) -> &[RequiredSwipe] {
        &self.pending
    }

    pub fn accent(&self) -> Option<Color> {
        self.accent
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver { .. })
    }

    /// Fraction of the round budget left, for the drain bar.
    pub fn timer_fraction(&self, now_ms: f64) -> f64 {
        self.timer.fraction_remaining(now_ms)
    }

    /// Whole seconds left on the revive offer, counting down 5..=1.
    pub fn prompt_seconds_left(&self, now_ms: f64) -> Option<u32> {
        if let Phase::RevivePrompt { expires_at_ms, .. } = self.phase {
            let left = (expires_at_ms - now_ms).max(0.0);
            Some((left / 1000.0).ceil() as u32)
        } else {
            None
        }
    }

    /// Label for the resume countdown, stepping through "3", "2", "1", "GO".
    pub fn countdown_label(&self, now_ms: f64) -> Option<&'static str> {
        if let Phase::Reviving { started_at_ms } = self.phase {
            let step = ((now_ms - started_at_ms) / f64::from(REVIVE_COUNTDOWN_STEP_MS))
                .floor()
                .max(0.0) as u32;
            Some(match step {
                0 => "3",
                1 => "2",
                2 => "1",
                _ => "GO",
            })
        } else {
            None
        }
    }
}
