//! Gem earnings and the wallet balance.

use serde::{Deserialize, Serialize};

use crate::difficulty::Mode;

/// DOM event fired (with an [`EarnedReceipt`] JSON payload) whenever a
/// session pays out, for toasts and other listeners outside the game loop.
pub const EARNED_EVENT: &str = "ColorSwipe_CurrencyEarned";

/// Gems earned for a finished session: one per point, times the mode
/// multiplier. Zero score earns nothing.
pub fn reward_for(score: u32, mode: Mode) -> u32 {
    score.saturating_mul(mode.gem_multiplier())
}

/// Record of the most recent payout. Persisted alongside the balance and
/// broadcast to any listener interested in showing a "+N" toast.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EarnedReceipt {
    pub earned: u32,
    pub total: u32,
    pub score: u32,
    pub mode: Mode,
    pub multiplier: u32,
    pub timestamp: f64,
}

/// Gem balance with the few mutations the game needs. Persisting the new
/// balance is the caller's job.
#[derive(Clone, Copy, Debug, Default)]
pub struct Wallet {
    gems: u32,
}

impl Wallet {
    pub fn new(gems: u32) -> Self {
        Self { gems }
    }

    pub fn gems(&self) -> u32 {
        self.gems
    }

    /// Pay out the session reward. `None` when the score earned nothing, so
    /// callers skip the receipt bookkeeping entirely in that case.
    pub fn earn_for_score(&mut self, score: u32, mode: Mode, now_ms: f64) -> Option<EarnedReceipt> {
        let earned = reward_for(score, mode);
        if earned == 0 {
            return None;
        }
        self.gems = self.gems.saturating_add(earned);
        Some(EarnedReceipt {
            earned,
            total: self.gems,
            score,
            mode,
            multiplier: mode.gem_multiplier(),
            timestamp: now_ms,
        })
    }

    /// Add gems outside the score path (promotions, sync). Returns the
    /// amount actually added.
    pub fn grant(&mut self, amount: u32) -> u32 {
        self.gems = self.gems.saturating_add(amount);
        amount
    }

    /// Spend gems if the balance covers it.
    pub fn deduct(&mut self, amount: u32) -> bool {
        if amount == 0 || self.gems < amount {
            return false;
        }
        self.gems -= amount;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reward_is_score_times_multiplier() {
        assert_eq!(reward_for(10, Mode::Normal), 10);
        assert_eq!(reward_for(10, Mode::Hard), 20);
        assert_eq!(reward_for(10, Mode::Insane), 30);
        assert_eq!(reward_for(0, Mode::Normal), 0);
        assert_eq!(reward_for(0, Mode::Insane), 0);
        assert_eq!(reward_for(7, Mode::Hard), 14);
    }

    #[test]
    fn earning_updates_the_balance_and_writes_a_receipt() {
        let mut w = Wallet::new(100);
        let receipt = w.earn_for_score(12, Mode::Insane, 1234.0).unwrap();
        assert_eq!(receipt.earned, 36);
        assert_eq!(receipt.total, 136);
        assert_eq!(receipt.score, 12);
        assert_eq!(receipt.mode, Mode::Insane);
        assert_eq!(receipt.multiplier, 3);
        assert_eq!(receipt.timestamp, 1234.0);
        assert_eq!(w.gems(), 136);
    }

    #[test]
    fn zero_score_pays_nothing() {
        let mut w = Wallet::new(50);
        assert!(w.earn_for_score(0, Mode::Hard, 0.0).is_none());
        assert_eq!(w.gems(), 50);
    }

    #[test]
    fn deduct_respects_the_balance() {
        let mut w = Wallet::new(500);
        assert!(w.deduct(500));
        assert_eq!(w.gems(), 0);
        assert!(!w.deduct(1));
        assert!(!w.deduct(0));

        let mut w = Wallet::new(499);
        assert!(!w.deduct(500));
        assert_eq!(w.gems(), 499);
    }

    #[test]
    fn receipt_serializes_with_the_published_field_names() {
        let receipt = EarnedReceipt {
            earned: 20,
            total: 120,
            score: 10,
            mode: Mode::Hard,
            multiplier: 2,
            timestamp: 99.0,
        };
        let json = serde_json::to_string(&receipt).unwrap();
        assert!(json.contains("\"earned\":20"));
        assert!(json.contains("\"total\":120"));
        assert!(json.contains("\"mode\":\"HARD\""));
        assert!(json.contains("\"multiplier\":2"));
        let back: EarnedReceipt = serde_json::from_str(&json).unwrap();
        assert_eq!(back, receipt);
    }
}
