//! Browser shell: canvas, DOM overlays, event listeners and the frame loop.
//!
//! All game logic lives in the pure modules; this one owns the `web_sys`
//! plumbing. State sits in a thread-local cell that the animation-frame
//! callback and every event listener reach through [`with_app`], which keeps
//! input handling and timer polling serialized on the browser's event loop.

mod render;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    window, CanvasRenderingContext2d, CustomEvent, CustomEventInit, Document, HtmlCanvasElement,
    HtmlElement, HtmlInputElement,
};

use crate::backend;
use crate::challenge::Direction;
use crate::currency::{EarnedReceipt, Wallet, EARNED_EVENT};
use crate::difficulty::Mode;
use crate::input::{self, SwipeTracker};
use crate::inventory::{Inventory, SAVE_ME_COST};
use crate::outbox::{normalize_username, Outbox, PendingScore, USERNAME_MAX_CHARS};
use crate::rng::Rng;
use crate::session::{Phase, Session, Update};
use crate::skins::SkinAtlas;
use crate::store::Store;

const CANVAS_W: u32 = 480;
const CANVAS_H: u32 = 640;

pub(crate) struct App {
    pub(crate) canvas: HtmlCanvasElement,
    pub(crate) ctx: CanvasRenderingContext2d,
    pub(crate) store: Store,
    pub(crate) wallet: Wallet,
    pub(crate) inventory: Inventory,
    pub(crate) outbox: Outbox,
    pub(crate) skins: SkinAtlas,
    pub(crate) swipe: SwipeTracker,
    pub(crate) session: Option<Session>,
    pub(crate) selected_mode: Mode,
    /// Stored best for the mode being played (or selected), kept fresh so
    /// the HUD never reads storage mid-frame.
    pub(crate) high_score: u32,
    pub(crate) new_high: bool,
    flush_in_flight: bool,
}

thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    APP.with(|cell| cell.borrow_mut().as_mut().map(f))
}

fn document() -> Option<Document> {
    window().and_then(|w| w.document())
}

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

// --- Bootstrap --------------------------------------------------------------

/// Build the DOM, load saved progress and start the frame loop. Safe to call
/// twice; the second call finds the state cell occupied and backs out.
pub fn bootstrap() -> Result<(), JsValue> {
    if APP.with(|cell| cell.borrow().is_some()) {
        return Ok(());
    }
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id("cs-canvas") {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id("cs-canvas");
        c.set_width(CANVAS_W);
        c.set_height(CANVAS_H);
        // touch-action:none keeps swipes from scrolling the page on mobile.
        c.set_attribute("style", "position:fixed; left:50%; top:50%; transform:translate(-50%,-50%); max-width:100vw; max-height:100vh; border-radius:14px; background:#14171c; box-shadow:0 0 40px 0 rgba(0,0,0,0.45); touch-action:none; z-index:10;").ok();
        doc.body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&c)?;
        c
    };
    let ctx: CanvasRenderingContext2d = canvas.get_context("2d")?.unwrap().dyn_into()?;
    ctx.set_text_align("center");

    let store = Store::open();
    let wallet = Wallet::new(store.gems());
    let mut inventory = Inventory::new(
        store.save_me_count(),
        store.owned_items(),
        store.equipped_skin(),
    );
    if !store.first_grant_done() {
        inventory.grant_first_run_credits();
        store.set_save_me_count(inventory.save_me_count());
        store.mark_first_grant_done();
    }
    let outbox = Outbox::from_entries(store.pending_scores());

    let app = App {
        canvas: canvas.clone(),
        ctx,
        store,
        wallet,
        inventory,
        outbox,
        skins: SkinAtlas::new(),
        swipe: SwipeTracker::new(),
        session: None,
        selected_mode: Mode::Normal,
        high_score: 0,
        new_high: false,
        flush_in_flight: false,
    };
    APP.with(|cell| cell.replace(Some(app)));
    with_app(|app| app.high_score = app.store.high_score(app.selected_mode));

    build_overlays(&doc)?;
    attach_listeners(&doc)?;

    // Anything queued from a previous visit gets a delivery attempt right
    // away; the `online` listener covers reconnects after that.
    sync_pending_scores();

    start_frame_loop();
    Ok(())
}

const PANEL_STYLE: &str = "position:fixed; left:50%; top:50%; transform:translate(-50%,-50%); display:none; flex-direction:column; align-items:center; gap:14px; padding:28px 36px; background:rgba(12,14,18,0.92); border:1px solid #2a2f3a; border-radius:16px; color:#e8eaf0; font-family:'Segoe UI', system-ui, sans-serif; text-align:center; z-index:40; min-width:280px;";
const BUTTON_STYLE: &str = "padding:10px 22px; border:1px solid #3a4152; border-radius:10px; background:#1d222c; color:#e8eaf0; font-size:16px; font-weight:600; cursor:pointer;";

fn ensure_panel(doc: &Document, id: &str, html: &str) -> Result<(), JsValue> {
    if doc.get_element_by_id(id).is_some() {
        return Ok(());
    }
    let Some(body) = doc.body() else {
        return Ok(());
    };
    let div = doc.create_element("div")?;
    div.set_id(id);
    div.set_inner_html(html);
    div.set_attribute("style", PANEL_STYLE).ok();
    body.append_child(&div)?;
    Ok(())
}

fn build_overlays(doc: &Document) -> Result<(), JsValue> {
    // Score strip above the canvas.
    if doc.get_element_by_id("cs-hud").is_none() {
        if let Some(body) = doc.body() {
            let div = doc.create_element("div")?;
            div.set_id("cs-hud");
            div.set_text_content(Some(""));
            div.set_attribute("style", "position:fixed; top:14px; left:50%; transform:translateX(-50%); font-family:'Segoe UI', system-ui, sans-serif; font-size:17px; letter-spacing:1px; color:#e8eaf0; padding:6px 16px; background:rgba(12,14,18,0.55); border-radius:8px; z-index:30;").ok();
            body.append_child(&div)?;
        }
    }

    let menu_html = format!(
        concat!(
            "<h1 style='margin:0; font-size:38px; letter-spacing:2px;'>COLOR SWIPE</h1>",
            "<p style='margin:0; color:#9aa3b5;'>Swipe the direction of the block's color.<br>Arrow keys and WASD work too.</p>",
            "<div style='display:flex; gap:10px;'>",
            "<button id='cs-mode-normal' style='{btn}'>NORMAL</button>",
            "<button id='cs-mode-hard' style='{btn}'>HARD</button>",
            "<button id='cs-mode-insane' style='{btn}'>INSANE</button>",
            "</div>",
            "<div id='cs-balances' style='color:#9aa3b5; font-size:15px;'></div>",
            "<div style='display:flex; gap:8px; align-items:center;'>",
            "<input id='cs-name-input' maxlength='{maxlen}' placeholder='Your name' style='padding:9px 12px; border-radius:8px; border:1px solid #3a4152; background:#10131a; color:#e8eaf0; width:140px;'>",
            "<button id='cs-name-save' style='{btn}'>Save</button>",
            "</div>",
            "<div id='cs-name-status' style='font-size:13px; color:#9aa3b5; min-height:16px;'></div>",
            "<div style='display:flex; gap:10px;'>",
            "<button id='cs-open-lb' style='{btn}'>Leaderboard</button>",
            "<button id='cs-buy-saveme' style='{btn}'>Save Me ({cost})</button>",
            "</div>",
            "<div id='cs-shop-status' style='font-size:13px; color:#9aa3b5; min-height:16px;'></div>",
        ),
        btn = BUTTON_STYLE,
        maxlen = USERNAME_MAX_CHARS,
        cost = SAVE_ME_COST,
    );
    ensure_panel(doc, "cs-menu", &menu_html)?;

    let revive_html = format!(
        concat!(
            "<h2 id='cs-revive-reason' style='margin:0; font-size:26px; color:#ff5f52;'></h2>",
            "<p style='margin:0;'>Keep going?</p>",
            "<p id='cs-revive-cost' style='margin:0; color:#ffd700;'></p>",
            "<p id='cs-revive-timer' style='margin:0; font-size:30px; font-weight:700;'></p>",
            "<div style='display:flex; gap:10px;'>",
            "<button id='cs-revive-accept' style='{btn}'>SAVE ME</button>",
            "<button id='cs-revive-decline' style='{btn}'>GIVE UP</button>",
            "</div>",
        ),
        btn = BUTTON_STYLE,
    );
    ensure_panel(doc, "cs-revive", &revive_html)?;

    let over_html = format!(
        concat!(
            "<h2 id='cs-over-reason' style='margin:0; font-size:28px; color:#ff5f52;'></h2>",
            "<p id='cs-over-score' style='margin:0; font-size:22px;'></p>",
            "<p id='cs-over-high' style='margin:0; color:#00ff88; font-weight:700;'></p>",
            "<p id='cs-over-earned' style='margin:0; color:#ffd700;'></p>",
            "<div style='display:flex; gap:10px;'>",
            "<button id='cs-again' style='{btn}'>PLAY AGAIN</button>",
            "<button id='cs-to-menu' style='{btn}'>MENU</button>",
            "</div>",
        ),
        btn = BUTTON_STYLE,
    );
    ensure_panel(doc, "cs-over", &over_html)?;

    let lb_html = format!(
        concat!(
            "<h2 id='cs-lb-title' style='margin:0; font-size:24px;'></h2>",
            "<ul id='cs-lb-list' style='list-style:none; margin:0; padding:0; width:260px; display:flex; flex-direction:column; gap:6px; font-size:15px; text-align:left;'></ul>",
            "<button id='cs-lb-close' style='{btn}'>Close</button>",
        ),
        btn = BUTTON_STYLE,
    );
    ensure_panel(doc, "cs-lb", &lb_html)?;

    // Prefill the name box with the saved identity.
    if let Some(name) = with_app(|app| app.store.username()).flatten() {
        if let Some(input) = doc
            .get_element_by_id("cs-name-input")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value(&name);
        }
    }
    Ok(())
}

// --- DOM helpers ------------------------------------------------------------

fn set_text(doc: &Document, id: &str, text: &str) {
    if let Some(el) = doc.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

fn set_html(doc: &Document, id: &str, html: &str) {
    if let Some(el) = doc.get_element_by_id(id) {
        el.set_inner_html(html);
    }
}

fn set_display(doc: &Document, id: &str, value: &str) {
    if let Some(el) = doc.get_element_by_id(id) {
        if let Some(html_el) = el.dyn_ref::<HtmlElement>() {
            let _ = html_el.style().set_property("display", value);
        }
    }
}

fn on_click(doc: &Document, id: &str, handler: impl FnMut() + 'static) -> Result<(), JsValue> {
    if let Some(el) = doc.get_element_by_id(id) {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut()>);
        el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

// --- Listeners --------------------------------------------------------------

fn attach_listeners(doc: &Document) -> Result<(), JsValue> {
    // Keyboard: arrows / WASD while a round is live. Only then do we eat the
    // key, so the name box still accepts those letters.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            let Some(direction) = input::direction_from_key(&evt.key()) else {
                return;
            };
            let now = now_ms();
            with_app(|app| {
                let playing = app.session.as_ref().map(Session::is_playing).unwrap_or(false);
                if playing {
                    evt.prevent_default();
                    dispatch_input(app, direction, now);
                }
            });
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Touch: record on start, classify on end.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::TouchEvent| {
            if let Some(touch) = evt.changed_touches().get(0) {
                let (x, y) = (f64::from(touch.screen_x()), f64::from(touch.screen_y()));
                with_app(|app| app.swipe.begin(x, y));
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::TouchEvent| {
            if let Some(touch) = evt.changed_touches().get(0) {
                let (x, y) = (f64::from(touch.screen_x()), f64::from(touch.screen_y()));
                let now = now_ms();
                with_app(|app| {
                    if let Some(direction) = app.swipe.end(x, y) {
                        dispatch_input(app, direction, now);
                    }
                });
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Reconnects drain the outbox.
    if let Some(win) = window() {
        let closure = Closure::wrap(Box::new(move || {
            sync_pending_scores();
        }) as Box<dyn FnMut()>);
        win.add_event_listener_with_callback("online", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    on_click(doc, "cs-mode-normal", || select_mode(Mode::Normal))?;
    on_click(doc, "cs-mode-hard", || select_mode(Mode::Hard))?;
    on_click(doc, "cs-mode-insane", || select_mode(Mode::Insane))?;
    on_click(doc, "cs-revive-accept", accept_revive)?;
    on_click(doc, "cs-revive-decline", decline_revive)?;
    on_click(doc, "cs-again", || {
        if let Some(mode) = with_app(|app| app.selected_mode) {
            select_mode(mode);
        }
    })?;
    on_click(doc, "cs-to-menu", || {
        with_app(|app| app.session = None);
    })?;
    on_click(doc, "cs-open-lb", || open_leaderboard(None))?;
    on_click(doc, "cs-lb-close", || {
        if let Some(doc) = document() {
            set_display(&doc, "cs-lb", "none");
        }
    })?;
    on_click(doc, "cs-buy-saveme", || {
        let bought = buy_save_me();
        if let Some(doc) = document() {
            let message = if bought {
                "Save Me added!"
            } else {
                "Not enough gems."
            };
            set_text(&doc, "cs-shop-status", message);
        }
    })?;
    on_click(doc, "cs-name-save", || {
        let Some(doc) = document() else { return };
        let value = doc
            .get_element_by_id("cs-name-input")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_default();
        spawn_local(async move {
            let message = match save_username(value).await {
                Ok(msg) => msg,
                Err(msg) => msg,
            };
            if let Some(doc) = document() {
                set_text(&doc, "cs-name-status", &message);
            }
        });
    })?;
    Ok(())
}

// --- Frame loop -------------------------------------------------------------

fn start_frame_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        tick(ts);
        if let Some(w) = window() {
            let _ = w.request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(w) = window() {
        let _ = w.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

fn tick(now_ms: f64) {
    with_app(|app| {
        let update = match app.session.as_mut() {
            Some(session) => session.poll(now_ms),
            None => Update::Idle,
        };
        apply_update(app, update, now_ms);

        // Equip changes take effect on the next frame; set_skin ignores
        // repeats.
        let equipped = app.inventory.equipped_skin().map(str::to_owned);
        app.skins.set_skin(equipped.as_deref(), js_sys::Date::now());

        render::draw(app, now_ms);
        sync_overlays(app, now_ms);
    });
}

fn dispatch_input(app: &mut App, direction: Direction, now_ms: f64) {
    let update = match app.session.as_mut() {
        Some(session) => session.apply_input(direction, now_ms),
        None => Update::Idle,
    };
    apply_update(app, update, now_ms);
}

fn apply_update(app: &mut App, update: Update, now_ms: f64) {
    if let Update::Ended { .. } = update {
        settle_game_over(app, now_ms);
    }
}

// --- Game-over settlement ---------------------------------------------------

/// High score first, then the gem payout, then the fire-and-forget report.
/// Everything here is local except the final submit.
fn settle_game_over(app: &mut App, _now_ms: f64) {
    let Some(session) = &app.session else { return };
    let score = session.score();
    let mode = session.mode();

    let stored = app.store.high_score(mode);
    if score > stored {
        app.store.set_high_score(mode, score);
        app.high_score = score;
        app.new_high = true;
    } else {
        app.high_score = stored;
        app.new_high = false;
    }

    let wall_now = js_sys::Date::now();
    if let Some(receipt) = app.wallet.earn_for_score(score, mode, wall_now) {
        app.store.set_gems(app.wallet.gems());
        app.store.record_earned(&receipt);
        dispatch_earned_event(&receipt);
    }

    if score > 0 {
        let username = normalize_username(&app.store.username().unwrap_or_default());
        let entry = PendingScore {
            username: username.clone(),
            score,
            mode,
            timestamp: wall_now,
        };
        spawn_local(async move {
            let delivered = backend::submit_score(&username, score, mode).await;
            if !delivered {
                with_app(|app| {
                    app.outbox.push(entry);
                    app.store.set_pending_scores(app.outbox.entries());
                });
            }
        });
    }
}

fn dispatch_earned_event(receipt: &EarnedReceipt) {
    let Some(win) = window() else { return };
    let Ok(json) = serde_json::to_string(receipt) else {
        return;
    };
    let init = CustomEventInit::new();
    init.set_detail(&JsValue::from_str(&json));
    if let Ok(event) = CustomEvent::new_with_event_init_dict(EARNED_EVENT, &init) {
        let _ = win.dispatch_event(&event);
    }
}

// --- Per-frame overlay sync -------------------------------------------------

fn sync_overlays(app: &App, now_ms: f64) {
    let Some(doc) = document() else { return };

    match &app.session {
        Some(session) => {
            set_text(
                &doc,
                "cs-hud",
                &format!(
                    "{}  SCORE {}  BEST {}",
                    session.mode().as_str(),
                    session.score(),
                    app.high_score
                ),
            );
        }
        None => {
            set_text(&doc, "cs-hud", "");
        }
    }

    let in_menu = app.session.is_none();
    set_display(&doc, "cs-menu", if in_menu { "flex" } else { "none" });
    if in_menu {
        set_text(
            &doc,
            "cs-balances",
            &format!(
                "Gems {}  |  Save Mes {}  |  Best ({}) {}",
                app.wallet.gems(),
                app.inventory.save_me_count(),
                app.selected_mode.as_str(),
                app.high_score
            ),
        );
    }

    let (show_revive, show_over) = match app.session.as_ref().map(|s| s.phase()) {
        Some(Phase::RevivePrompt { reason, cost, .. }) => {
            set_text(&doc, "cs-revive-reason", reason.banner());
            set_text(&doc, "cs-revive-cost", &format!("Cost: {cost} Save Me"));
            if let Some(seconds) = app
                .session
                .as_ref()
                .and_then(|s| s.prompt_seconds_left(now_ms))
            {
                set_text(&doc, "cs-revive-timer", &seconds.to_string());
            }
            (true, false)
        }
        Some(Phase::GameOver { reason }) => {
            let session = app.session.as_ref();
            set_text(&doc, "cs-over-reason", reason.banner());
            if let Some(s) = session {
                set_text(&doc, "cs-over-score", &format!("Score: {}", s.score()));
                let earned = crate::currency::reward_for(s.score(), s.mode());
                set_text(
                    &doc,
                    "cs-over-earned",
                    &if earned > 0 { format!("+{earned} gems") } else { String::new() },
                );
            }
            set_text(
                &doc,
                "cs-over-high",
                if app.new_high { "NEW HIGH SCORE!" } else { "" },
            );
            (false, true)
        }
        _ => (false, false),
    };
    set_display(&doc, "cs-revive", if show_revive { "flex" } else { "none" });
    set_display(&doc, "cs-over", if show_over { "flex" } else { "none" });
}

// --- Operations (wired to buttons here, re-exported through lib) ------------

pub fn select_mode(mode: Mode) {
    let now = now_ms();
    with_app(|app| {
        app.selected_mode = mode;
        app.high_score = app.store.high_score(mode);
        app.new_high = false;
        app.swipe.cancel();
        app.session = Some(Session::start(
            mode,
            app.inventory.save_me_count(),
            Rng::seeded(),
            now,
        ));
    });
}

pub fn accept_revive() {
    let now = now_ms();
    with_app(|app| {
        let Some(session) = app.session.as_mut() else {
            return;
        };
        let before = session.credits_left();
        let update = session.accept_revive(now);
        let spent = before.saturating_sub(session.credits_left());
        if spent > 0 {
            app.inventory.spend_save_me(spent);
            app.store.set_save_me_count(app.inventory.save_me_count());
        }
        apply_update(app, update, now);
    });
}

pub fn decline_revive() {
    let now = now_ms();
    with_app(|app| {
        let update = match app.session.as_mut() {
            Some(session) => session.decline_revive(),
            None => Update::Idle,
        };
        apply_update(app, update, now);
    });
}

pub fn buy_save_me() -> bool {
    with_app(|app| {
        let bought = app.inventory.buy_save_me(&mut app.wallet);
        if bought {
            app.store.set_gems(app.wallet.gems());
            app.store.set_save_me_count(app.inventory.save_me_count());
        }
        bought
    })
    .unwrap_or(false)
}

pub fn save_me_count() -> u32 {
    with_app(|app| app.inventory.save_me_count()).unwrap_or(0)
}

pub fn gem_balance() -> u32 {
    with_app(|app| app.wallet.gems()).unwrap_or(0)
}

pub fn equip_skin(slug: &str) {
    with_app(|app| {
        let id = if slug.is_empty() { None } else { Some(slug) };
        app.inventory.equip_skin(id);
        app.store.set_equipped_skin(id);
    });
}

pub fn open_leaderboard(mode: Option<Mode>) {
    let mode = mode
        .or_else(|| with_app(|app| app.selected_mode))
        .unwrap_or_default();
    if let Some(doc) = document() {
        set_display(&doc, "cs-lb", "flex");
        set_text(&doc, "cs-lb-title", &format!("{} TOP {}", mode.as_str(), backend::LEADERBOARD_LIMIT));
        set_html(&doc, "cs-lb-list", r#"<li class="lb-empty">Loading...</li>"#);
    }
    spawn_local(async move {
        // Land any queued scores first so the player's own result can show
        // on the board they are about to read.
        flush_outbox().await;
        let rows = backend::fetch_leaderboard(mode).await;
        if let Some(doc) = document() {
            set_html(&doc, "cs-lb-list", &backend::leaderboard_rows_html(&rows));
        }
    });
}

/// Try to deliver everything in the outbox. At most one flush runs at a
/// time; entries queued while one is out simply wait for the next.
pub fn sync_pending_scores() {
    spawn_local(flush_outbox());
}

async fn flush_outbox() {
    let entries = with_app(|app| {
        if app.flush_in_flight || app.outbox.is_empty() {
            None
        } else {
            app.flush_in_flight = true;
            Some(app.outbox.take_all())
        }
    })
    .flatten();
    let Some(entries) = entries else { return };
    let failed = backend::flush_pending(entries).await;
    with_app(|app| {
        app.outbox.requeue_front(failed);
        app.store.set_pending_scores(app.outbox.entries());
        app.flush_in_flight = false;
    });
}

/// Claim (or change to) a leaderboard name. Resolves with a status message;
/// rejects with one when the name is unusable.
pub async fn save_username(raw: String) -> Result<String, String> {
    let name: String = raw.trim().chars().take(USERNAME_MAX_CHARS).collect();
    if name.is_empty() {
        return Err("Enter a name first.".to_owned());
    }
    let store = Store::open();
    let current = store.username();
    if current.as_deref() == Some(name.as_str()) {
        return Ok("That's already your name.".to_owned());
    }
    if backend::username_taken(&name).await {
        return Err("That name is already taken.".to_owned());
    }
    // Carry old scores over to the new name; purely cosmetic if it fails.
    if let Some(old) = &current {
        let _ = backend::rename_player(old, &name).await;
    }
    store.set_username(&name);
    Ok("Name saved!".to_owned())
}
