//! Score submissions that survive being offline.
//!
//! Finished games are reported to the leaderboard on a best-effort basis.
//! When a report cannot be delivered it is parked here and retried the next
//! time connectivity looks plausible. This module is the pure queue; the
//! network side lives in [`crate::backend`].

use serde::{Deserialize, Serialize};

use crate::difficulty::Mode;

/// Longest username the leaderboard accepts.
pub const USERNAME_MAX_CHARS: usize = 12;

/// Name submitted when the player never picked one.
pub const ANONYMOUS: &str = "Anonymous";

/// Trim, clamp to the length limit, and fall back to the anonymous name.
/// Applied once, before a score is submitted or queued, so queued entries
/// are already in wire form.
pub fn normalize_username(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ANONYMOUS.to_owned();
    }
    trimmed.chars().take(USERNAME_MAX_CHARS).collect()
}

/// One not-yet-confirmed score report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingScore {
    pub username: String,
    pub score: u32,
    pub mode: Mode,
    /// When the game ended, not when delivery finally succeeded.
    pub timestamp: f64,
}

/// FIFO of unconfirmed reports. Oldest first; a flush that partially fails
/// puts the failures back at the front so age order is kept even if new
/// games finish mid-flush.
#[derive(Clone, Debug, Default)]
pub struct Outbox {
    pending: Vec<PendingScore>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(pending: Vec<PendingScore>) -> Self {
        Self { pending }
    }

    pub fn entries(&self) -> &[PendingScore] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn push(&mut self, entry: PendingScore) {
        self.pending.push(entry);
    }

    /// Hand out everything for a delivery attempt, leaving the queue empty.
    pub fn take_all(&mut self) -> Vec<PendingScore> {
        std::mem::take(&mut self.pending)
    }

    /// Put undelivered entries back ahead of anything queued since
    /// [`Outbox::take_all`].
    pub fn requeue_front(&mut self, failed: Vec<PendingScore>) {
        if failed.is_empty() {
            return;
        }
        self.pending.splice(0..0, failed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: u32) -> PendingScore {
        PendingScore {
            username: name.to_owned(),
            score,
            mode: Mode::Normal,
            timestamp: 0.0,
        }
    }

    #[test]
    fn usernames_are_trimmed_clamped_and_defaulted() {
        assert_eq!(normalize_username("  zed "), "zed");
        assert_eq!(normalize_username("exactlytwelve"), "exactlytwelv");
        assert_eq!(normalize_username("short"), "short");
        assert_eq!(normalize_username(""), ANONYMOUS);
        assert_eq!(normalize_username("   "), ANONYMOUS);
        // Clamp counts characters, not bytes.
        assert_eq!(normalize_username(&"é".repeat(13)), "é".repeat(12));
    }

    #[test]
    fn queue_keeps_arrival_order() {
        let mut outbox = Outbox::new();
        outbox.push(entry("a", 1));
        outbox.push(entry("b", 2));
        assert_eq!(outbox.len(), 2);
        assert_eq!(outbox.entries()[0].username, "a");

        let taken = outbox.take_all();
        assert!(outbox.is_empty());
        assert_eq!(taken.len(), 2);
    }

    #[test]
    fn failed_entries_requeue_ahead_of_newcomers() {
        let mut outbox = Outbox::new();
        outbox.push(entry("old-1", 1));
        outbox.push(entry("old-2", 2));

        let mut inflight = outbox.take_all();
        // A new game finishes while the flush is out.
        outbox.push(entry("new", 3));
        // Second in-flight entry failed to deliver.
        let failed = vec![inflight.remove(1)];
        outbox.requeue_front(failed);

        let names: Vec<&str> = outbox.entries().iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, ["old-2", "new"]);
    }

    #[test]
    fn requeue_of_nothing_is_a_no_op() {
        let mut outbox = Outbox::from_entries(vec![entry("a", 1)]);
        outbox.requeue_front(Vec::new());
        assert_eq!(outbox.len(), 1);
    }

    #[test]
    fn entries_round_trip_through_the_stored_json_shape() {
        let entries = vec![
            PendingScore {
                username: "zed".to_owned(),
                score: 10,
                mode: Mode::Insane,
                timestamp: 1_700_000_000_000.0,
            },
        ];
        let json = serde_json::to_string(&entries).unwrap();
        assert!(json.contains("\"username\":\"zed\""));
        assert!(json.contains("\"mode\":\"INSANE\""));
        assert!(json.contains("\"timestamp\":1700000000000.0"));
        let back: Vec<PendingScore> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entries);
    }
}
