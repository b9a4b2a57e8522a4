use std::{env, path::PathBuf, sync::Arc};

use crate::store::ScoreStore;

pub(crate) const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub(crate) const DEFAULT_DATA_DIR: &str = "./data";

#[derive(Debug, Clone)]
pub(crate) struct ServerConfig {
    pub(crate) bind_addr: String,
    pub(crate) data_dir: PathBuf,
}

impl ServerConfig {
    pub(crate) fn from_env() -> Self {
        Self {
            bind_addr: read_env_string("API_BIND_ADDR", DEFAULT_BIND_ADDR),
            data_dir: PathBuf::from(read_env_string("DATA_DIR", DEFAULT_DATA_DIR)),
        }
    }
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) scores: Arc<ScoreStore>,
}

pub(crate) fn read_env_string(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
