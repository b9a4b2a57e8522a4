use actix_web::{
    http::StatusCode,
    web::{Data, Json, Query},
    HttpResponse, Responder,
};
use serde::{Deserialize, Serialize};

use crate::config::AppState;
use crate::now_unix_s;
use crate::response::json_error;

pub(crate) const NAME_MIN_CHARS: usize = 2;
pub(crate) const NAME_MAX_CHARS: usize = 30;
pub(crate) const DEFAULT_LEADERBOARD_LIMIT: usize = 10;
pub(crate) const MAX_LEADERBOARD_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitScoreRequest {
    pub(crate) name: String,
    pub(crate) score: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LeaderboardQuery {
    pub(crate) limit: Option<usize>,
}

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) status: &'static str,
    pub(crate) service: &'static str,
    pub(crate) stored_scores: usize,
}

/// Returns `(error_message, error_code)` on failure.
pub(crate) fn validate_name(raw: &str) -> Result<&str, (String, &'static str)> {
    let name = raw.trim();
    let chars = name.chars().count();
    if chars < NAME_MIN_CHARS || chars > NAME_MAX_CHARS {
        return Err((
            format!("name must be {NAME_MIN_CHARS}-{NAME_MAX_CHARS} characters"),
            "invalid_name",
        ));
    }
    Ok(name)
}

/// Returns `(error_message, error_code)` on failure.
pub(crate) fn validate_score(score: i64) -> Result<(), (String, &'static str)> {
    if score < 0 {
        return Err((
            "score must be a non-negative integer".to_string(),
            "invalid_score",
        ));
    }
    Ok(())
}

pub(crate) async fn submit_score(
    state: Data<AppState>,
    body: Json<SubmitScoreRequest>,
) -> impl Responder {
    let name = match validate_name(&body.name) {
        Ok(name) => name,
        Err((message, code)) => return json_error(StatusCode::BAD_REQUEST, message, Some(code)),
    };
    if let Err((message, code)) = validate_score(body.score) {
        return json_error(StatusCode::BAD_REQUEST, message, Some(code));
    }

    match state.scores.submit(name, body.score, now_unix_s()) {
        Ok(action) => HttpResponse::Ok().json(serde_json::json!({
            "ok": true,
            "action": action.as_str(),
        })),
        Err(e) => {
            tracing::error!("score submit failed: {e}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "score store error",
                Some("internal_error"),
            )
        }
    }
}

pub(crate) async fn leaderboard(
    state: Data<AppState>,
    query: Query<LeaderboardQuery>,
) -> impl Responder {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
        .clamp(1, MAX_LEADERBOARD_LIMIT);

    match state.scores.top(limit) {
        Ok(rows) => HttpResponse::Ok().json(serde_json::json!({ "data": rows })),
        Err(e) => {
            tracing::error!("leaderboard query failed: {e}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "score store error",
                Some("internal_error"),
            )
        }
    }
}

pub(crate) async fn health(state: Data<AppState>) -> impl Responder {
    let stored_scores = match state.scores.count() {
        Ok(count) => count,
        Err(e) => {
            tracing::error!("health check failed: {e}");
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "score store error",
                Some("internal_error"),
            );
        }
    };

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        service: "lane-dash-api",
        stored_scores,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::{test as awtest, web, App};
    use serde_json::{json, Value};
    use tempfile::TempDir;

    use crate::store::ScoreStore;

    fn test_state() -> (AppState, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = ScoreStore::open(dir.path()).unwrap();
        (
            AppState {
                scores: Arc::new(store),
            },
            dir,
        )
    }

    #[test]
    fn validate_name_trims_and_checks_length() {
        assert_eq!(validate_name("  Ada  ").unwrap(), "Ada");
        assert!(validate_name("x").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(31)).is_err());
        assert!(validate_name(&"x".repeat(30)).is_ok());
    }

    #[test]
    fn validate_score_rejects_negative() {
        assert!(validate_score(0).is_ok());
        assert!(validate_score(9999).is_ok());
        assert!(validate_score(-1).is_err());
    }

    #[actix_web::test]
    async fn submit_upserts_best_score_only() {
        let (state, _dir) = test_state();
        let app = awtest::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/submit-score", web::post().to(submit_score))
                .route("/leaderboard", web::get().to(leaderboard)),
        )
        .await;

        for (score, expected) in [(42, "inserted"), (30, "kept_best"), (55, "updated")] {
            let req = awtest::TestRequest::post()
                .uri("/submit-score")
                .set_json(json!({ "name": "Ada", "score": score }))
                .to_request();
            let resp = awtest::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);

            let body: Value = awtest::read_body_json(resp).await;
            assert_eq!(body["ok"], Value::Bool(true));
            assert_eq!(body["action"].as_str(), Some(expected));
        }

        let req = awtest::TestRequest::get().uri("/leaderboard").to_request();
        let resp = awtest::call_service(&app, req).await;
        let body: Value = awtest::read_body_json(resp).await;
        let rows = body["data"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"].as_str(), Some("Ada"));
        assert_eq!(rows[0]["score"].as_i64(), Some(55));
    }

    #[actix_web::test]
    async fn submit_trims_name_before_storing() {
        let (state, _dir) = test_state();
        let app = awtest::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .route("/submit-score", web::post().to(submit_score)),
        )
        .await;

        let req = awtest::TestRequest::post()
            .uri("/submit-score")
            .set_json(json!({ "name": "  Ada  ", "score": 7 }))
            .to_request();
        let resp = awtest::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let rows = state.scores.top(10).unwrap();
        assert_eq!(rows[0].name, "Ada");
    }

    #[actix_web::test]
    async fn submit_rejects_invalid_names() {
        let (state, _dir) = test_state();
        let app = awtest::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/submit-score", web::post().to(submit_score)),
        )
        .await;

        for name in ["x", "   ", &"x".repeat(31)] {
            let req = awtest::TestRequest::post()
                .uri("/submit-score")
                .set_json(json!({ "name": name, "score": 10 }))
                .to_request();
            let resp = awtest::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

            let body: Value = awtest::read_body_json(resp).await;
            assert_eq!(body["ok"], Value::Bool(false));
            assert_eq!(body["code"].as_str(), Some("invalid_name"));
        }
    }

    #[actix_web::test]
    async fn submit_rejects_negative_score() {
        let (state, _dir) = test_state();
        let app = awtest::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/submit-score", web::post().to(submit_score)),
        )
        .await;

        let req = awtest::TestRequest::post()
            .uri("/submit-score")
            .set_json(json!({ "name": "Ada", "score": -1 }))
            .to_request();
        let resp = awtest::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = awtest::read_body_json(resp).await;
        assert_eq!(body["code"].as_str(), Some("invalid_score"));
    }

    #[actix_web::test]
    async fn leaderboard_clamps_limit_to_max() {
        let (state, _dir) = test_state();
        for i in 0..60 {
            state.scores.submit(&format!("player{i}"), i, 1000 + i).unwrap();
        }
        let app = awtest::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/leaderboard", web::get().to(leaderboard)),
        )
        .await;

        let req = awtest::TestRequest::get()
            .uri("/leaderboard?limit=100")
            .to_request();
        let resp = awtest::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = awtest::read_body_json(resp).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 50);
    }

    #[actix_web::test]
    async fn leaderboard_defaults_to_ten_rows() {
        let (state, _dir) = test_state();
        for i in 0..12 {
            state.scores.submit(&format!("player{i}"), i, 1000 + i).unwrap();
        }
        let app = awtest::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/leaderboard", web::get().to(leaderboard)),
        )
        .await;

        let req = awtest::TestRequest::get().uri("/leaderboard").to_request();
        let resp = awtest::call_service(&app, req).await;
        let body: Value = awtest::read_body_json(resp).await;
        let rows = body["data"].as_array().unwrap();
        assert_eq!(rows.len(), 10);
        // Best score first.
        assert_eq!(rows[0]["score"].as_i64(), Some(11));
    }

    #[actix_web::test]
    async fn health_reports_stored_scores() {
        let (state, _dir) = test_state();
        state.scores.submit("Ada", 42, 1000).unwrap();
        state.scores.submit("Grace", 17, 1001).unwrap();
        let app = awtest::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/health", web::get().to(health)),
        )
        .await;

        let req = awtest::TestRequest::get().uri("/health").to_request();
        let resp = awtest::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = awtest::read_body_json(resp).await;
        assert_eq!(body["status"].as_str(), Some("healthy"));
        assert_eq!(body["service"].as_str(), Some("lane-dash-api"));
        assert_eq!(body["stored_scores"].as_u64(), Some(2));
    }
}
