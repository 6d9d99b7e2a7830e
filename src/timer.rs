//! Round deadline, polled from the frame loop rather than scheduled.
//!
//! The timer never fires on its own. Whoever drives the game asks
//! [`RoundTimer::expired`] with the current clock reading, which keeps every
//! timeout decision on the same thread and the same tick as input handling.
//! A generation counter ties each expiry to the round that armed it, so a
//! poll that raced a re-arm can be recognized as stale and dropped.

#[derive(Clone, Copy, Debug)]
struct Armed {
    deadline_ms: f64,
    budget_ms: u32,
    /// Clock reading at suspension. While set, the deadline is inert and
    /// `remaining` reports the value from the moment of the freeze.
    frozen_at: Option<f64>,
}

/// Poll-driven countdown for the current round.
#[derive(Clone, Copy, Debug, Default)]
pub struct RoundTimer {
    armed: Option<Armed>,
    generation: u64,
}

impl RoundTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh countdown of `budget_ms` from `now_ms`. Any previous
    /// round's deadline is superseded; the returned generation identifies
    /// this arming.
    pub fn arm(&mut self, now_ms: f64, budget_ms: u32) -> u64 {
        self.generation += 1;
        self.armed = Some(Armed {
            deadline_ms: now_ms + f64::from(budget_ms),
            budget_ms,
            frozen_at: None,
        });
        self.generation
    }

    /// Drop the countdown entirely (round resolved, session over).
    pub fn disarm(&mut self) {
        self.armed = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Budget the current countdown was armed with.
    pub fn budget_ms(&self) -> Option<u32> {
        self.armed.map(|a| a.budget_ms)
    }

    /// Suspend the countdown without losing it. No-op when disarmed or
    /// already frozen.
    pub fn freeze(&mut self, now_ms: f64) {
        if let Some(a) = &mut self.armed {
            if a.frozen_at.is_none() {
                a.frozen_at = Some(now_ms);
            }
        }
    }

    /// Resume a frozen countdown with the same time left it had when frozen.
    pub fn thaw(&mut self, now_ms: f64) {
        if let Some(a) = &mut self.armed {
            if let Some(frozen_at) = a.frozen_at.take() {
                a.deadline_ms += now_ms - frozen_at;
            }
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.armed.is_some_and(|a| a.frozen_at.is_some())
    }

    /// Milliseconds left, clamped at zero. `None` when disarmed. A frozen
    /// timer reports the remainder captured at the freeze.
    pub fn remaining_ms(&self, now_ms: f64) -> Option<f64> {
        self.armed.map(|a| {
            let reference = a.frozen_at.unwrap_or(now_ms);
            (a.deadline_ms - reference).max(0.0)
        })
    }

    /// Fraction of the budget still left, for the drain bar. 1.0 right after
    /// arming, 0.0 at (or past) the deadline, and also 0.0 when disarmed.
    pub fn fraction_remaining(&self, now_ms: f64) -> f64 {
        match (self.remaining_ms(now_ms), self.budget_ms()) {
            (Some(rem), Some(budget)) if budget > 0 => (rem / f64::from(budget)).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    /// Whether the deadline has passed. Frozen and disarmed timers never
    /// expire. The returned generation lets the caller discard an expiry
    /// observed for a round that has since been superseded.
    pub fn expired(&self, now_ms: f64) -> Option<u64> {
        let a = self.armed?;
        if a.frozen_at.is_none() && now_ms >= a.deadline_ms {
            Some(self.generation)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_and_expires_at_the_deadline() {
        let mut timer = RoundTimer::new();
        assert!(!timer.is_armed());
        assert_eq!(timer.remaining_ms(0.0), None);
        assert_eq!(timer.expired(1e12), None);

        let r#gen = timer.arm(1000.0, 1500);
        assert_eq!(timer.remaining_ms(1000.0), Some(1500.0));
        assert_eq!(timer.remaining_ms(2000.0), Some(500.0));
        assert_eq!(timer.expired(2499.9), None);
        assert_eq!(timer.expired(2500.0), Some(r#gen));
        // Past the deadline the remainder clamps instead of going negative.
        assert_eq!(timer.remaining_ms(9000.0), Some(0.0));
    }

    #[test]
    fn rearming_bumps_the_generation() {
        let mut timer = RoundTimer::new();
        let g1 = timer.arm(0.0, 1000);
        let g2 = timer.arm(500.0, 1000);
        assert!(g2 > g1);
        // An expiry check now speaks for the new round only.
        assert_eq!(timer.expired(1500.0), Some(g2));
    }

    #[test]
    fn freeze_holds_the_remainder_through_any_pause_length() {
        let mut timer = RoundTimer::new();
        timer.arm(0.0, 1000);
        timer.freeze(400.0);
        assert!(timer.is_frozen());
        // Time passing changes nothing while frozen.
        assert_eq!(timer.remaining_ms(400.0), Some(600.0));
        assert_eq!(timer.remaining_ms(50_000.0), Some(600.0));
        assert_eq!(timer.expired(50_000.0), None);

        timer.thaw(50_000.0);
        assert!(!timer.is_frozen());
        assert_eq!(timer.remaining_ms(50_000.0), Some(600.0));
        assert_eq!(timer.expired(50_599.0), None);
        assert_eq!(timer.expired(50_600.0), Some(timer.generation()));
    }

    #[test]
    fn freeze_and_thaw_are_idempotent() {
        let mut timer = RoundTimer::new();
        timer.arm(0.0, 1000);
        timer.freeze(100.0);
        timer.freeze(900.0);
        assert_eq!(timer.remaining_ms(900.0), Some(900.0));
        timer.thaw(2000.0);
        timer.thaw(3000.0);
        assert_eq!(timer.remaining_ms(2000.0), Some(900.0));

        // Freezing while disarmed is harmless.
        let mut idle = RoundTimer::new();
        idle.freeze(0.0);
        idle.thaw(10.0);
        assert!(!idle.is_armed());
    }

    #[test]
    fn fraction_tracks_the_drain_bar() {
        let mut timer = RoundTimer::new();
        assert_eq!(timer.fraction_remaining(0.0), 0.0);
        timer.arm(0.0, 1000);
        assert_eq!(timer.fraction_remaining(0.0), 1.0);
        assert_eq!(timer.fraction_remaining(250.0), 0.75);
        assert_eq!(timer.fraction_remaining(1000.0), 0.0);
        assert_eq!(timer.fraction_remaining(4000.0), 0.0);
    }

    #[test]
    fn disarm_silences_expiry() {
        let mut timer = RoundTimer::new();
        timer.arm(0.0, 100);
        timer.disarm();
        assert_eq!(timer.expired(1000.0), None);
        assert_eq!(timer.remaining_ms(1000.0), None);
    }
}
