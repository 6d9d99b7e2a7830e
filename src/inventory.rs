//! Save-me credits, owned cosmetics, and the equipped skin.
//!
//! Pure bookkeeping over a [`Wallet`]; persisting the result is the
//! caller's job, same as with the wallet itself.

use serde::{Deserialize, Serialize};

use crate::currency::Wallet;

/// Gem price of one save-me credit.
pub const SAVE_ME_COST: u32 = 500;

/// Credits handed to a player the first time the game runs.
pub const FIRST_RUN_SAVE_ME_GRANT: u32 = 5;

/// Shop item categories, as spelled by the shop backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    SaveMe,
    EmojiSkin,
    Theme,
    Skin,
    #[serde(other)]
    Other,
}

impl ItemKind {
    /// Cosmetics are owned once and forever; consumables stack.
    pub fn is_cosmetic(self) -> bool {
        matches!(self, ItemKind::EmojiSkin | ItemKind::Theme | ItemKind::Skin)
    }
}

/// One purchasable row from the shop catalog.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShopItem {
    pub id: String,
    pub name: String,
    pub price: u32,
    #[serde(rename = "item_type")]
    pub kind: ItemKind,
}

/// How a purchase attempt went.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuyOutcome {
    Purchased,
    AlreadyOwned,
    NotEnoughGems,
    InvalidItem,
}

#[derive(Clone, Debug, Default)]
pub struct Inventory {
    save_me: u32,
    owned: Vec<String>,
    equipped_skin: Option<String>,
}

impl Inventory {
    pub fn new(save_me: u32, owned: Vec<String>, equipped_skin: Option<String>) -> Self {
        Self { save_me, owned, equipped_skin }
    }

    pub fn save_me_count(&self) -> u32 {
        self.save_me
    }

    pub fn owned_items(&self) -> &[String] {
        &self.owned
    }

    pub fn owns(&self, id: &str) -> bool {
        self.owned.iter().any(|owned| owned == id)
    }

    pub fn equipped_skin(&self) -> Option<&str> {
        self.equipped_skin.as_deref()
    }

    /// One-time starter credits. The caller gates this on its own
    /// already-granted flag.
    pub fn grant_first_run_credits(&mut self) -> u32 {
        self.save_me += FIRST_RUN_SAVE_ME_GRANT;
        self.save_me
    }

    /// Buy one save-me credit at the fixed price.
    pub fn buy_save_me(&mut self, wallet: &mut Wallet) -> bool {
        if !wallet.deduct(SAVE_ME_COST) {
            return false;
        }
        self.save_me += 1;
        true
    }

    /// Burn credits spent on revives during a session.
    pub fn spend_save_me(&mut self, count: u32) -> bool {
        if self.save_me < count {
            return false;
        }
        self.save_me -= count;
        true
    }

    /// Buy an arbitrary catalog item. Cosmetics join the owned list (once);
    /// save-me items stack; anything else just costs gems.
    pub fn buy_item(&mut self, item: &ShopItem, wallet: &mut Wallet) -> BuyOutcome {
        if item.price == 0 {
            return BuyOutcome::InvalidItem;
        }
        if item.kind.is_cosmetic() && self.owns(&item.id) {
            return BuyOutcome::AlreadyOwned;
        }
        if !wallet.deduct(item.price) {
            return BuyOutcome::NotEnoughGems;
        }
        match item.kind {
            ItemKind::SaveMe => self.save_me += 1,
            kind if kind.is_cosmetic() => self.owned.push(item.id.clone()),
            _ => {}
        }
        BuyOutcome::Purchased
    }

    /// Equip a skin, or revert to flat blocks with `None` / empty id.
    pub fn equip_skin(&mut self, id: Option<&str>) {
        self.equipped_skin = match id {
            Some("") | None => None,
            Some(id) => Some(id.to_owned()),
        };
    }
}
