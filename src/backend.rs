//! REST client for the hosted score table.
//!
//! The table sits behind a PostgREST-style endpoint: rows are filtered and
//! ordered through query parameters, auth is a public key sent in headers.
//! Every call here is best-effort. Failures log to the console and come back
//! as empty lists or `false`; the game never waits on any of it.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{console, Headers, Request, RequestInit, Response};

use crate::difficulty::Mode;
use crate::outbox::PendingScore;

pub(crate) const BASE_URL: &str = "https://colorswipe-backend.example.com";
const SCORES_TABLE: &str = "scores";
// Public anon key; row-level security on the backend limits what it can do.
const API_KEY: &str = "public-anon-key";

/// Rows shown on the leaderboard overlay.
pub const LEADERBOARD_LIMIT: u32 = 10;

/// One leaderboard row. Extra columns in the reply are ignored.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: u32,
}

#[derive(Serialize)]
struct ScoreBody<'a> {
    username: &'a str,
    score: u32,
    mode: Mode,
}

fn scores_url() -> String {
    format!("{BASE_URL}/rest/v1/{SCORES_TABLE}")
}

fn leaderboard_url(mode: Mode) -> String {
    format!(
        "{}?order=score.desc&mode=eq.{}&limit={LEADERBOARD_LIMIT}",
        scores_url(),
        mode.as_str()
    )
}

/// `encoded` must already be URI-encoded.
fn username_lookup_url(encoded: &str) -> String {
    format!("{}?username=eq.{encoded}&select=username", scores_url())
}

fn rename_url(encoded_old: &str) -> String {
    format!("{}?username=eq.{encoded_old}", scores_url())
}

fn is_online() -> bool {
    web_sys::window().map(|w| w.navigator().on_line()).unwrap_or(true)
}

async fn request(
    method: &str,
    url: &str,
    body: Option<&str>,
    prefer_minimal: bool,
) -> Result<Response, JsValue> {
    let headers = Headers::new()?;
    headers.set("apikey", API_KEY)?;
    headers.set("Authorization", &format!("Bearer {API_KEY}"))?;
    if body.is_some() {
        headers.set("Content-Type", "application/json")?;
    }
    if prefer_minimal {
        headers.set("Prefer", "return=minimal")?;
    }

    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_headers(&headers);
    if let Some(body) = body {
        opts.set_body(&JsValue::from_str(body));
    }

    let request = Request::new_with_str_and_init(url, &opts)?;
    let win = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let resp: Response = JsFuture::from(win.fetch_with_request(&request)).await?.dyn_into()?;
    Ok(resp)
}

async fn response_text(resp: &Response) -> Result<String, JsValue> {
    let text = JsFuture::from(resp.text()?).await?;
    Ok(text.as_string().unwrap_or_default())
}

async fn post_score_body(body: &str) -> Result<(), JsValue> {
    let resp = request("POST", &scores_url(), Some(body), false).await?;
    if resp.ok() {
        Ok(())
    } else {
        Err(JsValue::from_str(&format!("score insert rejected: {}", resp.status())))
    }
}

/// Report one finished game. `username` is expected in wire form already
/// (trimmed, clamped, defaulted). Returns whether the row was accepted; on
/// `false` the caller should queue the entry for a later flush.
pub async fn submit_score(username: &str, score: u32, mode: Mode) -> bool {
    let Ok(body) = serde_json::to_string(&ScoreBody { username, score, mode }) else {
        return false;
    };
    if !is_online() {
        return false;
    }
    match post_score_body(&body).await {
        Ok(()) => true,
        Err(err) => {
            console::error_2(&"score submit failed, queueing:".into(), &err);
            false
        }
    }
}

/// Try to deliver queued entries, oldest first. Returns the ones that still
/// would not go through, in their original order.
pub async fn flush_pending(entries: Vec<PendingScore>) -> Vec<PendingScore> {
    if entries.is_empty() || !is_online() {
        return entries;
    }
    let mut failed = Vec::new();
    for entry in entries {
        let body = serde_json::to_string(&ScoreBody {
            username: &entry.username,
            score: entry.score,
            mode: entry.mode,
        });
        let delivered = match body {
            Ok(body) => post_score_body(&body).await.is_ok(),
            Err(_) => false,
        };
        if !delivered {
            failed.push(entry);
        }
    }
    failed
}

/// Top scores for one mode, highest first. Any failure reads as an empty
/// board.
pub async fn fetch_leaderboard(mode: Mode) -> Vec<LeaderboardEntry> {
    match try_fetch_leaderboard(mode).await {
        Ok(rows) => rows,
        Err(err) => {
            console::error_2(&"leaderboard fetch failed:".into(), &err);
            Vec::new()
        }
    }
}

async fn try_fetch_leaderboard(mode: Mode) -> Result<Vec<LeaderboardEntry>, JsValue> {
    let resp = request("GET", &leaderboard_url(mode), None, false).await?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!("status {}", resp.status())));
    }
    let text = response_text(&resp).await?;
    serde_json::from_str(&text).map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Whether any score row already claims this name. Network trouble reads as
/// "free" so an offline player can still pick a name.
pub async fn username_taken(name: &str) -> bool {
    let encoded = String::from(js_sys::encode_uri_component(name));
    let Ok(resp) = request("GET", &username_lookup_url(&encoded), None, false).await else {
        return false;
    };
    if !resp.ok() {
        return false;
    }
    let Ok(text) = response_text(&resp).await else {
        return false;
    };
    serde_json::from_str::<Vec<serde_json::Value>>(&text)
        .map(|rows| !rows.is_empty())
        .unwrap_or(false)
}

/// Point historical score rows at a new name after a rename.
pub async fn rename_player(old_name: &str, new_name: &str) -> bool {
    let encoded_old = String::from(js_sys::encode_uri_component(old_name));
    let Ok(body) = serde_json::to_string(&serde_json::json!({ "username": new_name })) else {
        return false;
    };
    match request("PATCH", &rename_url(&encoded_old), Some(&body), true).await {
        Ok(resp) => resp.ok(),
        Err(err) => {
            console::error_2(&"rename failed:".into(), &err);
            false
        }
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `<li>` rows for the leaderboard overlay. Usernames are player-supplied,
/// so they are escaped here and nowhere else.
pub fn leaderboard_rows_html(entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return r#"<li class="lb-empty">No scores yet. Be the first!</li>"#.to_owned();
    }
    let mut html = String::new();
    for (i, entry) in entries.iter().enumerate() {
        let _ = write!(
            html,
            r#"<li class="lb-row"><span class="lb-rank">{rank}</span><span class="lb-name">{name}</span><span class="lb-score">{score}</span></li>"#,
            rank = i + 1,
            name = escape_html(&entry.username),
            score = entry.score,
        );
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_follow_the_rest_shape() {
        assert_eq!(
            leaderboard_url(Mode::Hard),
            "https://colorswipe-backend.example.com/rest/v1/scores?order=score.desc&mode=eq.HARD&limit=10"
        );
        assert_eq!(
            username_lookup_url("zed%20x"),
            "https://colorswipe-backend.example.com/rest/v1/scores?username=eq.zed%20x&select=username"
        );
        assert_eq!(
            rename_url("old"),
            "https://colorswipe-backend.example.com/rest/v1/scores?username=eq.old"
        );
    }

    #[test]
    fn score_body_matches_the_table_columns() {
        let body = serde_json::to_string(&ScoreBody {
            username: "zed",
            score: 42,
            mode: Mode::Insane,
        })
        .unwrap();
        assert_eq!(body, r#"{"username":"zed","score":42,"mode":"INSANE"}"#);
    }

    #[test]
    fn leaderboard_rows_ignore_extra_columns() {
        let json = r#"[
            {"id": 7, "username": "ace", "score": 90, "mode": "NORMAL", "created_at": "2026-01-01"},
            {"username": "bee", "score": 55}
        ]"#;
        let rows: Vec<LeaderboardEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].username, "ace");
        assert_eq!(rows[1].score, 55);
    }

    #[test]
    fn leaderboard_html_is_ranked_and_escaped() {
        let rows = vec![
            LeaderboardEntry { username: "top".to_owned(), score: 100 },
            LeaderboardEntry { username: "<b>&\"x\"".to_owned(), score: 9 },
        ];
        let html = leaderboard_rows_html(&rows);
        assert!(html.contains(r#"<span class="lb-rank">1</span>"#));
        assert!(html.contains(r#"<span class="lb-rank">2</span>"#));
        assert!(html.contains("&lt;b&gt;&amp;&quot;x&quot;"));
        assert!(!html.contains("<b>"));
        assert!(html.contains(r#"<span class="lb-score">100</span>"#));
    }

    #[test]
    fn empty_board_gets_a_placeholder_row() {
        let html = leaderboard_rows_html(&[]);
        assert!(html.contains("lb-empty"));
        assert!(html.contains("No scores yet"));
    }
}
