//! Local persistence over `window.localStorage`.
//!
//! Every accessor is total: missing keys, garbage values and an absent
//! storage object (private browsing) all come back as defaults. Writes that
//! fail are logged to the console and dropped; nothing here is worth
//! interrupting a game for.

use web_sys::console;

use crate::currency::EarnedReceipt;
use crate::difficulty::Mode;
use crate::outbox::PendingScore;

const HIGH_SCORE_PREFIX: &str = "ColorSwipeMatch_HighScore_";
const USERNAME_KEY: &str = "ColorSwipe_Username";
const PENDING_SCORES_KEY: &str = "ColorSwipe_PendingScores";
const GEMS_KEY: &str = "ColorSwipe_Gems";
const SAVE_ME_COUNT_KEY: &str = "ColorSwipe_SaveMeCount";
const OWNED_ITEMS_KEY: &str = "ColorSwipe_OwnedItems";
const EQUIPPED_SKIN_KEY: &str = "ColorSwipe_EquippedSkinId";
const FIRST_GRANT_KEY: &str = "ColorSwipe_FirstTimeSaveMeGranted_v1";
const LAST_EARNED_KEY: &str = "ColorSwipe_LastEarned";
const LAST_EARNED_META_KEY: &str = "ColorSwipe_LastEarnedMeta";

pub(crate) fn high_score_key(mode: Mode) -> String {
    format!("{HIGH_SCORE_PREFIX}{}", mode.as_str())
}

/// Handle on local storage, or on nothing when the browser denies it.
pub struct Store {
    storage: Option<web_sys::Storage>,
}

impl Store {
    pub fn open() -> Store {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            console::warn_1(&"local storage unavailable, progress will not persist".into());
        }
        Store { storage }
    }

    fn get(&self, key: &str) -> Option<String> {
        let storage = self.storage.as_ref()?;
        match storage.get_item(key) {
            Ok(value) => value,
            Err(err) => {
                console::warn_2(&"storage read failed:".into(), &err);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if let Err(err) = storage.set_item(key, value) {
                console::warn_2(&"storage write failed:".into(), &err);
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = &self.storage {
            if let Err(err) = storage.remove_item(key) {
                console::warn_2(&"storage remove failed:".into(), &err);
            }
        }
    }

    fn get_u32(&self, key: &str) -> u32 {
        self.get(key)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0)
    }

    // --- High scores, one slot per mode ---

    pub fn high_score(&self, mode: Mode) -> u32 {
        self.get_u32(&high_score_key(mode))
    }

    pub fn set_high_score(&self, mode: Mode, value: u32) {
        self.set(&high_score_key(mode), &value.to_string());
    }

    // --- Player identity ---

    pub fn username(&self) -> Option<String> {
        self.get(USERNAME_KEY).filter(|name| !name.is_empty())
    }

    pub fn set_username(&self, name: &str) {
        self.set(USERNAME_KEY, name);
    }

    // --- Wallet and inventory ---

    pub fn gems(&self) -> u32 {
        self.get_u32(GEMS_KEY)
    }

    pub fn set_gems(&self, gems: u32) {
        self.set(GEMS_KEY, &gems.to_string());
    }

    pub fn save_me_count(&self) -> u32 {
        self.get_u32(SAVE_ME_COUNT_KEY)
    }

    pub fn set_save_me_count(&self, count: u32) {
        self.set(SAVE_ME_COUNT_KEY, &count.to_string());
    }

    /// Owned cosmetic ids. Entries that are not strings are dropped rather
    /// than poisoning the whole list.
    pub fn owned_items(&self) -> Vec<String> {
        let Some(raw) = self.get(OWNED_ITEMS_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
            Ok(values) => values
                .into_iter()
                .filter_map(|v| match v {
                    serde_json::Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn set_owned_items(&self, items: &[String]) {
        if let Ok(json) = serde_json::to_string(items) {
            self.set(OWNED_ITEMS_KEY, &json);
        }
    }

    pub fn equipped_skin(&self) -> Option<String> {
        self.get(EQUIPPED_SKIN_KEY).filter(|id| !id.is_empty())
    }

    pub fn set_equipped_skin(&self, id: Option<&str>) {
        match id {
            Some(id) if !id.is_empty() => self.set(EQUIPPED_SKIN_KEY, id),
            _ => self.remove(EQUIPPED_SKIN_KEY),
        }
    }

    /// Whether the one-time starter credits were already handed out.
    pub fn first_grant_done(&self) -> bool {
        self.get(FIRST_GRANT_KEY).is_some()
    }

    pub fn mark_first_grant_done(&self) {
        self.set(FIRST_GRANT_KEY, "true");
    }

    /// Payout trail for the "+N gems" toast and anything else listening.
    pub fn record_earned(&self, receipt: &EarnedReceipt) {
        self.set(LAST_EARNED_KEY, &receipt.earned.to_string());
        if let Ok(json) = serde_json::to_string(receipt) {
            self.set(LAST_EARNED_META_KEY, &json);
        }
    }

    pub fn last_earned(&self) -> Option<EarnedReceipt> {
        let raw = self.get(LAST_EARNED_META_KEY)?;
        serde_json::from_str(&raw).ok()
    }

    // --- Score outbox ---

    pub fn pending_scores(&self) -> Vec<PendingScore> {
        let Some(raw) = self.get(PENDING_SCORES_KEY) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_default()
    }

    /// Write the queue back, dropping the key entirely once it drains.
    pub fn set_pending_scores(&self, pending: &[PendingScore]) {
        if pending.is_empty() {
            self.remove(PENDING_SCORES_KEY);
            return;
        }
        if let Ok(json) = serde_json::to_string(pending) {
            self.set(PENDING_SCORES_KEY, &json);
        }
    }
}
