use log::Level;

use crate::intake::{BYTES_PER_MB, DEFAULT_MAX_UPLOAD_BYTES};

pub const ROOT_ELEMENT_ID: &str = "vidshare";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    pub upload_endpoint: String,
    pub register_endpoint: String,
    pub max_upload_bytes: u64,
    pub log_level: Level,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            upload_endpoint: "upload.php".to_string(),
            register_endpoint: "save_url.php".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            log_level: Level::Info,
        }
    }
}

impl WidgetConfig {
    /// Reads `data-*` attributes of the widget root; anything missing or
    /// unparseable keeps its default.
    pub fn from_attributes(attr: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        let read = |name: &str| {
            attr(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(endpoint) = read("data-upload-endpoint") {
            cfg.upload_endpoint = endpoint;
        }
        if let Some(endpoint) = read("data-register-endpoint") {
            cfg.register_endpoint = endpoint;
        }
        if let Some(bytes) = read("data-max-upload-bytes").and_then(|v| v.parse::<u64>().ok()) {
            cfg.max_upload_bytes = bytes.max(BYTES_PER_MB);
        }
        if let Some(level) = read("data-log-level").and_then(|v| v.parse::<Level>().ok()) {
            cfg.log_level = level;
        }

        cfg
    }
}
