//! Leaderboard HTTP client
//!
//! Requests go through `ehttp` so the same code serves wasm and native
//! builds. Completed responses land in a shared pending queue that the
//! frame loop drains; nothing here blocks.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// Rows requested for the menu leaderboard
pub const LEADERBOARD_LIMIT: usize = 10;

/// Completed request results, drained once per frame
#[derive(Default)]
pub struct Pending {
    pub submit: Option<Result<SubmitResponse, String>>,
    pub leaderboard: Option<Result<Vec<LeaderboardRow>, String>>,
}

pub type PendingHandle = Arc<Mutex<Pending>>;

pub fn new_pending() -> PendingHandle {
    Arc::new(Mutex::new(Pending::default()))
}

/// Progress of the one-shot score submission
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
    Done,
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
struct SubmitRequest<'a> {
    name: &'a str,
    score: u64,
}

/// Server acknowledgement for a submission
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub ok: bool,
    /// "inserted", "updated" or "kept_best"
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One leaderboard entry
#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardRow {
    pub name: String,
    pub score: u64,
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
struct LeaderboardResponse {
    data: Vec<LeaderboardRow>,
}

/// API base URL: same origin in the browser, localhost elsewhere
#[cfg(target_arch = "wasm32")]
fn api_base() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| "http://127.0.0.1:8080".to_string())
}

#[cfg(not(target_arch = "wasm32"))]
fn api_base() -> String {
    std::env::var("LANE_DASH_API").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string())
}

/// POST the final score; the result lands in `pending.submit`
pub fn submit_score(pending: &PendingHandle, name: &str, score: u64) {
    let url = format!("{}/submit-score", api_base());
    let body = serde_json::to_vec(&SubmitRequest { name, score }).unwrap_or_default();
    let mut request = ehttp::Request::post(&url, body);
    request
        .headers
        .insert("Content-Type".to_string(), "application/json".to_string());

    log::info!("submitting score {score} for {name:?}");
    let pending = Arc::clone(pending);
    ehttp::fetch(request, move |result| {
        let outcome = parse_submit(result);
        if let Err(e) = &outcome {
            log::warn!("score submission failed: {e}");
        }
        if let Ok(mut p) = pending.lock() {
            p.submit = Some(outcome);
        }
    });
}

/// GET the top scores; the result lands in `pending.leaderboard`
pub fn fetch_leaderboard(pending: &PendingHandle, limit: usize) {
    let url = format!("{}/leaderboard?limit={limit}", api_base());
    let request = ehttp::Request::get(&url);

    let pending = Arc::clone(pending);
    ehttp::fetch(request, move |result| {
        let outcome = parse_leaderboard(result);
        if let Err(e) = &outcome {
            log::warn!("leaderboard fetch failed: {e}");
        }
        if let Ok(mut p) = pending.lock() {
            p.leaderboard = Some(outcome);
        }
    });
}

fn parse_submit(result: ehttp::Result<ehttp::Response>) -> Result<SubmitResponse, String> {
    let response = result?;
    decode_submit(response.ok, response.status, &response.bytes)
}

fn parse_leaderboard(
    result: ehttp::Result<ehttp::Response>,
) -> Result<Vec<LeaderboardRow>, String> {
    let response = result?;
    decode_leaderboard(response.ok, response.status, &response.bytes)
}

fn decode_submit(ok: bool, status: u16, bytes: &[u8]) -> Result<SubmitResponse, String> {
    match serde_json::from_slice::<SubmitResponse>(bytes) {
        Ok(body) if body.ok => Ok(body),
        Ok(body) => Err(body.error.unwrap_or_else(|| format!("HTTP {status}"))),
        Err(_) if !ok => Err(format!("HTTP {status}")),
        Err(e) => Err(format!("invalid response: {e}")),
    }
}

fn decode_leaderboard(ok: bool, status: u16, bytes: &[u8]) -> Result<Vec<LeaderboardRow>, String> {
    if !ok {
        return Err(format!("HTTP {status}"));
    }
    serde_json::from_slice::<LeaderboardResponse>(bytes)
        .map(|body| body.data)
        .map_err(|e| format!("invalid response: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_submit_accepts_ok_body() {
        let body = br#"{"ok":true,"action":"inserted"}"#;
        let response = decode_submit(true, 200, body).unwrap();
        assert_eq!(response.action.as_deref(), Some("inserted"));
    }

    #[test]
    fn test_decode_submit_surfaces_server_error() {
        let body = br#"{"ok":false,"error":"name must be 2-30 characters","code":"invalid_name"}"#;
        let err = decode_submit(false, 400, body).unwrap_err();
        assert_eq!(err, "name must be 2-30 characters");
    }

    #[test]
    fn test_decode_submit_falls_back_to_status() {
        let err = decode_submit(false, 502, b"<html>bad gateway</html>").unwrap_err();
        assert_eq!(err, "HTTP 502");
    }

    #[test]
    fn test_decode_leaderboard_rows() {
        let body = br#"{"data":[{"name":"Ada","score":55,"created_at":1700000000}]}"#;
        let rows = decode_leaderboard(true, 200, body).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Ada");
        assert_eq!(rows[0].score, 55);
    }

    #[test]
    fn test_decode_leaderboard_rejects_malformed_body() {
        assert!(decode_leaderboard(true, 200, b"not json").is_err());
        assert!(decode_leaderboard(false, 500, b"{}").is_err());
    }
}
