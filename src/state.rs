use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub build: BuildStamp,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            config,
            build: BuildStamp::capture(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildStamp {
    pub hash: String,
    pub timestamp: String,
    pub epoch: i64,
}

impl BuildStamp {
    /// Reads what `build.rs` exported; falls back to "now" for builds without
    /// git metadata.
    pub fn capture() -> Self {
        Self::from_parts(option_env!("BUILD_HASH"), option_env!("BUILD_EPOCH"))
    }

    fn from_parts(hash: Option<&str>, epoch: Option<&str>) -> Self {
        let now = Utc::now();
        let built_at = epoch
            .and_then(|v| v.parse::<i64>().ok())
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .unwrap_or(now);
        let hash = hash
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("unknown")
            .to_string();

        Self {
            hash,
            timestamp: built_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            epoch: built_at.timestamp(),
        }
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.hash, self.timestamp)
    }
}
