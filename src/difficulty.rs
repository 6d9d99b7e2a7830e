//! Mode table: per-mode pacing numbers and the score-milestone budget decay.

use serde::{Deserialize, Serialize};

/// The three selectable difficulties. Serialized uppercase because that is
/// the spelling used by the score backend and the saved high-score keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    #[default]
    Normal,
    Hard,
    Insane,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Normal, Mode::Hard, Mode::Insane];

    /// Round budget for a fresh session, in milliseconds.
    pub fn initial_budget_ms(self) -> u32 {
        match self {
            Mode::Normal => 1500,
            Mode::Hard => 1200,
            Mode::Insane => 1300,
        }
    }

    /// Budget never decays below this.
    pub fn floor_ms(self) -> u32 {
        match self {
            Mode::Normal => 500,
            Mode::Hard => 300,
            Mode::Insane => 400,
        }
    }

    /// Taken off the budget at every score milestone.
    pub fn decrement_ms(self) -> u32 {
        match self {
            Mode::Normal => 50,
            Mode::Hard => 75,
            Mode::Insane => 40,
        }
    }

    /// Gems earned per point when a session ends in this mode.
    pub fn gem_multiplier(self) -> u32 {
        match self {
            Mode::Normal => 1,
            Mode::Hard => 2,
            Mode::Insane => 3,
        }
    }

    /// Uppercase wire/storage spelling, matching the serde form.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Hard => "HARD",
            Mode::Insane => "INSANE",
        }
    }

    pub fn from_str(s: &str) -> Option<Mode> {
        match s {
            "NORMAL" => Some(Mode::Normal),
            "HARD" => Some(Mode::Hard),
            "INSANE" => Some(Mode::Insane),
            _ => None,
        }
    }

    /// One decay step, clamped at the floor.
    pub fn scale_budget(self, budget_ms: u32) -> u32 {
        self.floor_ms().max(budget_ms.saturating_sub(self.decrement_ms()))
    }
}

/// Whether reaching `score` triggers a budget decay step. Fires on every
/// fifth point; never on zero.
pub fn is_scaling_score(score: u32) -> bool {
    score > 0 && score % 5 == 0
}
