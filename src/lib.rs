//! Color Swipe core crate.
//!
//! A reflex game: each round shows one colored block (two on INSANE) and the
//! player swipes the direction that color is bound to before a shrinking
//! timer runs out. The rules, scoring, revive economy and score outbox are
//! plain Rust with the clock passed in; `app` wires them to the canvas, DOM
//! and network, and this file exposes the JS-facing surface.

use wasm_bindgen::prelude::*;

mod app;
mod backend;
mod skins;
mod store;

pub mod challenge;
pub mod currency;
pub mod difficulty;
pub mod input;
pub mod inventory;
pub mod outbox;
pub mod rng;
pub mod session;
pub mod timer;

use difficulty::Mode;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Build the canvas and overlays, load saved progress and start the frame
/// loop. The page lands on the mode menu.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    app::bootstrap()
}

/// Start a run in the named tier ("NORMAL", "HARD" or "INSANE"). Unknown
/// names are ignored.
#[wasm_bindgen]
pub fn select_mode(mode: &str) {
    if let Some(mode) = Mode::from_str(mode) {
        app::select_mode(mode);
    }
}

/// Spend revive credits on the open offer, if any.
#[wasm_bindgen]
pub fn accept_revive() {
    app::accept_revive();
}

/// Turn the open revive offer down and go to the results screen.
#[wasm_bindgen]
pub fn decline_revive() {
    app::decline_revive();
}

/// Buy one Save Me with gems. Returns whether the purchase went through.
#[wasm_bindgen]
pub fn buy_save_me() -> bool {
    app::buy_save_me()
}

#[wasm_bindgen]
pub fn save_me_count() -> u32 {
    app::save_me_count()
}

#[wasm_bindgen]
pub fn gem_balance() -> u32 {
    app::gem_balance()
}

/// Equip a purchased block skin by id; an empty string goes back to flat
/// colors.
#[wasm_bindgen]
pub fn equip_skin(slug: &str) {
    app::equip_skin(slug);
}

/// Show the top-10 panel. Pass a tier name to pick the board, or nothing
/// for the currently selected tier.
#[wasm_bindgen]
pub fn open_leaderboard(mode: Option<String>) {
    app::open_leaderboard(mode.as_deref().and_then(Mode::from_str));
}

/// Claim a leaderboard name. Resolves with a status message, rejects with
/// one when the name is empty or already taken.
#[wasm_bindgen]
pub fn save_username(name: &str) -> js_sys::Promise {
    let name = name.to_owned();
    wasm_bindgen_futures::future_to_promise(async move {
        match app::save_username(name).await {
            Ok(msg) => Ok(JsValue::from_str(&msg)),
            Err(msg) => Err(JsValue::from_str(&msg)),
        }
    })
}

/// Retry delivery of any scores that finished while offline.
#[wasm_bindgen]
pub fn sync_pending_scores() {
    app::sync_pending_scores();
}
