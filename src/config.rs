use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

const ENV_PREFIX: &str = "VIDSHARE_";
const BYTES_PER_MB: u64 = 1024 * 1024;
const MAX_UPLOAD_MB_CEILING: u64 = u64::MAX / BYTES_PER_MB;

#[derive(Debug, Clone, Deserialize, Default)]
struct FileConfig {
    bind_addr: Option<String>,
    assets_dir: Option<String>,
    site_title: Option<String>,
    upload_endpoint: Option<String>,
    register_endpoint: Option<String>,
    max_upload_mb: Option<u64>,
    widget_log_level: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct RootConfig {
    #[serde(default, flatten)]
    top: FileConfig,
    vidshare: Option<FileConfig>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub assets_dir: String,
    pub site_title: String,
    /// Where the widget posts files; served by an external upload handler.
    pub upload_endpoint: String,
    /// Where the widget posts remote video URLs.
    pub register_endpoint: String,
    pub max_upload_mb: u64,
    pub widget_log_level: String,
    pub config_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            assets_dir: "frontend/dist".to_string(),
            site_title: "VidShare".to_string(),
            upload_endpoint: "upload.php".to_string(),
            register_endpoint: "save_url.php".to_string(),
            max_upload_mb: 500,
            widget_log_level: "info".to_string(),
            config_path: PathBuf::from("vidshare.toml"),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let config_path = find_config_file().unwrap_or_else(|| config_search_paths()[0].clone());
        let mut cfg = Self::load_from(&config_path)?;
        cfg.apply_env(|key| env::var(key).ok());
        Ok(cfg)
    }

    /// Defaults overlaid with the file at `path`, if it exists. A
    /// `[vidshare]` table wins over top-level keys.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut cfg = Self {
            config_path: path.to_path_buf(),
            ..Self::default()
        };

        let RootConfig { top, vidshare } = load_root_config(path)?;
        cfg.apply_file(top);
        if let Some(section) = vidshare {
            cfg.apply_file(section);
        }
        Ok(cfg)
    }

    fn apply_file(&mut self, file_cfg: FileConfig) {
        set_opt(&mut self.bind_addr, file_cfg.bind_addr);
        set_opt(&mut self.assets_dir, file_cfg.assets_dir);
        set_opt(&mut self.site_title, file_cfg.site_title);
        set_opt(&mut self.upload_endpoint, file_cfg.upload_endpoint);
        set_opt(&mut self.register_endpoint, file_cfg.register_endpoint);
        set_opt_u64_clamped(
            &mut self.max_upload_mb,
            file_cfg.max_upload_mb,
            1,
            MAX_UPLOAD_MB_CEILING,
        );
        set_opt(&mut self.widget_log_level, file_cfg.widget_log_level);
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        let env_cfg = FileConfig {
            bind_addr: var("BIND_ADDR"),
            assets_dir: var("ASSETS_DIR"),
            site_title: var("SITE_TITLE"),
            upload_endpoint: var("UPLOAD_ENDPOINT"),
            register_endpoint: var("REGISTER_ENDPOINT"),
            max_upload_mb: var("MAX_UPLOAD_MB").and_then(|v| v.parse().ok()),
            widget_log_level: var("WIDGET_LOG_LEVEL"),
        };
        self.apply_file(env_cfg);
    }

    pub fn assets_dir(&self) -> PathBuf {
        PathBuf::from(&self.assets_dir)
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb.saturating_mul(BYTES_PER_MB)
    }
}

pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("vidshare.toml"), PathBuf::from("config.toml")];
    if let Some(home) = dirs_home() {
        paths.push(home.join(".config").join("vidshare").join("config.toml"));
    }
    paths
}

pub fn find_config_file() -> Option<PathBuf> {
    config_search_paths().into_iter().find(|path| path.exists())
}

fn dirs_home() -> Option<PathBuf> {
    env::var("HOME").ok().map(PathBuf::from)
}

fn load_root_config(path: &Path) -> Result<RootConfig> {
    if !path.exists() {
        return Ok(RootConfig::default());
    }
    let raw = fs::read_to_string(path).with_context(|| format!("failed reading {path:?}"))?;
    toml::from_str::<RootConfig>(&raw).with_context(|| format!("failed parsing {path:?}"))
}

fn set_opt<T>(dst: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *dst = v;
    }
}

fn set_opt_u64_clamped(dst: &mut u64, value: Option<u64>, min: u64, max: u64) {
    if let Some(v) = value {
        *dst = v.clamp(min, max);
    }
}
