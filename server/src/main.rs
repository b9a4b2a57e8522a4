//! Leaderboard API for Lane Dash.
//!
//! Three routes over a SQLite score store: `POST /submit-score` (upsert
//! best-only), `GET /leaderboard` (top N), `GET /health`. Configured via
//! `API_BIND_ADDR` and `DATA_DIR` environment variables.

mod config;
mod handlers;
mod response;
mod store;

use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};

use config::{AppState, ServerConfig};
use store::ScoreStore;

pub(crate) fn now_unix_s() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs() as i64)
        .unwrap_or(0)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = ServerConfig::from_env();
    let store = ScoreStore::open(&config.data_dir).map_err(std::io::Error::other)?;

    tracing::info!(
        "starting lane dash api: bind_addr={} data_dir={}",
        config.bind_addr,
        config.data_dir.display()
    );

    let state = AppState {
        scores: Arc::new(store),
    };

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .expose_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .route("/health", web::get().to(handlers::health))
            .route("/submit-score", web::post().to(handlers::submit_score))
            .route("/leaderboard", web::get().to(handlers::leaderboard))
    })
    .bind(config.bind_addr)?
    .run()
    .await
}
