//! Canvas drawing for every phase of a run.
//!
//! The overlays carry the menus and prompts; the canvas owns the timer bar,
//! the blocks and the resume countdown. Everything is redrawn from scratch
//! each frame.

use web_sys::CanvasRenderingContext2d;

use crate::challenge::{Color, Direction};
use crate::session::{Phase, Session};
use crate::skins::SkinAtlas;

use super::App;

const TIMER_BAR_H: f64 = 10.0;
const SINGLE_BLOCK: f64 = 180.0;
const PAIR_BLOCK: f64 = 150.0;
const PAIR_GAP: f64 = 36.0;

fn arrow(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "\u{2191}",
        Direction::Down => "\u{2193}",
        Direction::Left => "\u{2190}",
        Direction::Right => "\u{2192}",
    }
}

pub(crate) fn draw(app: &mut App, now_ms: f64) {
    let App {
        canvas,
        ctx,
        skins,
        session,
        ..
    } = app;
    let w = canvas.width() as f64;
    let h = canvas.height() as f64;

    ctx.set_fill_style_str("#14171c");
    ctx.fill_rect(0.0, 0.0, w, h);

    let Some(session) = session.as_ref() else {
        draw_legend(ctx, w, h);
        return;
    };

    draw_timer_bar(ctx, session, now_ms, w);
    draw_round(ctx, skins, session, w, h);

    match session.phase() {
        Phase::Playing => {}
        Phase::RevivePrompt { .. } | Phase::GameOver { .. } => {
            dim(ctx, w, h);
        }
        Phase::Reviving { .. } => {
            dim(ctx, w, h);
            if let Some(label) = session.countdown_label(now_ms) {
                ctx.set_fill_style_str("#ffffff");
                ctx.set_font("bold 84px 'Segoe UI', system-ui, sans-serif");
                ctx.fill_text(label, w / 2.0, h / 2.0 + 28.0).ok();
            }
        }
    }
}

/// Shrinking strip across the top. Tinted with the round's accent color
/// where one is in play, plain white otherwise.
fn draw_timer_bar(ctx: &CanvasRenderingContext2d, session: &Session, now_ms: f64, w: f64) {
    ctx.set_fill_style_str("rgba(255,255,255,0.08)");
    ctx.fill_rect(0.0, 0.0, w, TIMER_BAR_H);

    let fraction = session.timer_fraction(now_ms);
    if fraction <= 0.0 {
        return;
    }
    let tint = session.accent().map(Color::css).unwrap_or("#ffffff");
    ctx.set_fill_style_str(tint);
    ctx.fill_rect(0.0, 0.0, w * fraction, TIMER_BAR_H);
}

fn draw_round(
    ctx: &CanvasRenderingContext2d,
    skins: &mut SkinAtlas,
    session: &Session,
    w: f64,
    h: f64,
) {
    let Some(challenge) = session.challenge() else {
        return;
    };
    let cx = w / 2.0;
    let cy = h / 2.0 - 40.0;

    if let Some(pair) = &challenge.sequence {
        // Two blocks, answered in any order. A solved half stays on screen
        // as a dark husk so the player can see what is left.
        let left_x = cx - PAIR_BLOCK - PAIR_GAP / 2.0;
        let right_x = cx + PAIR_GAP / 2.0;
        for (sub, x) in pair.iter().zip([left_x, right_x]) {
            let solved = !session.pending().iter().any(|req| req.id == sub.id);
            draw_block(ctx, skins, sub.color, x, cy - PAIR_BLOCK / 2.0, PAIR_BLOCK);
            if solved {
                ctx.set_fill_style_str("rgba(0,0,0,0.72)");
                ctx.fill_rect(x, cy - PAIR_BLOCK / 2.0, PAIR_BLOCK, PAIR_BLOCK);
                ctx.set_stroke_style_str("rgba(255,255,255,0.35)");
                ctx.set_line_width(3.0);
                ctx.stroke_rect(x, cy - PAIR_BLOCK / 2.0, PAIR_BLOCK, PAIR_BLOCK);
            }
        }
        return;
    }

    let x = cx - SINGLE_BLOCK / 2.0;
    let y = cy - SINGLE_BLOCK / 2.0;
    draw_block(ctx, skins, challenge.block, x, y, SINGLE_BLOCK);

    // The word under the block is the trap: it names a color that may not be
    // the block's, in ink that may lie as well. Only the block counts.
    let ink = challenge.label_paint.map(Color::css).unwrap_or("#ffffff");
    ctx.set_fill_style_str(ink);
    ctx.set_font("bold 46px 'Segoe UI', system-ui, sans-serif");
    ctx.fill_text(challenge.text.word(), cx, y + SINGLE_BLOCK + 74.0)
        .ok();
}

fn draw_block(
    ctx: &CanvasRenderingContext2d,
    skins: &mut SkinAtlas,
    color: Color,
    x: f64,
    y: f64,
    size: f64,
) {
    if let Some(img) = skins.image_for(color) {
        ctx.draw_image_with_html_image_element_and_dw_and_dh(img, x, y, size, size)
            .ok();
        return;
    }
    ctx.set_fill_style_str(color.css());
    ctx.fill_rect(x, y, size, size);
    ctx.set_stroke_style_str("rgba(0,0,0,0.35)");
    ctx.set_line_width(4.0);
    ctx.stroke_rect(x, y, size, size);
}

/// Menu backdrop: the four color-to-direction pairings in a row, as a
/// reminder of the mapping before a run starts.
fn draw_legend(ctx: &CanvasRenderingContext2d, w: f64, h: f64) {
    let size = 44.0;
    let spacing = 104.0;
    let y = h - 120.0;
    let left = w / 2.0 - spacing * 1.5;

    ctx.set_font("bold 26px 'Segoe UI', system-ui, sans-serif");
    for (i, color) in Color::ALL.iter().enumerate() {
        let cx = left + spacing * i as f64;
        ctx.set_fill_style_str(color.css());
        ctx.fill_rect(cx - size / 2.0, y - size, size, size);
        ctx.set_fill_style_str("#e8eaf0");
        ctx.fill_text(arrow(color.required_direction()), cx, y + 34.0)
            .ok();
    }
}

fn dim(ctx: &CanvasRenderingContext2d, w: f64, h: f64) {
    ctx.set_fill_style_str("rgba(0,0,0,0.55)");
    ctx.fill_rect(0.0, 0.0, w, h);
}
