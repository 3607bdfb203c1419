//! Application configuration: a JSON file plus environment overrides.
//!
//! Precedence, lowest to highest: built-in defaults, the config file, `GLOWUP_*` variables.
//!
//! ```json
//! {
//!   "data_dir": "/home/me/.local/share/glowup",
//!   "public_base_url": "http://localhost:54321",
//!   "font_dir": "/usr/share/fonts/truetype/dejavu",
//!   "sticker_seed": 42
//! }
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    foundation::error::{GlowupError, GlowupResult},
    gateway::LocalGateway,
    render::FontBook,
};

pub const ENV_DATA_DIR: &str = "GLOWUP_DATA_DIR";
pub const ENV_PUBLIC_URL: &str = "GLOWUP_PUBLIC_URL";
pub const ENV_FONT_DIR: &str = "GLOWUP_FONT_DIR";

pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:54321";

/// Platform data directory for GlowUp (`~/.local/share/glowup` on Linux).
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("glowup"))
        .unwrap_or_else(|| PathBuf::from(".glowup"))
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Root of the local gateway: database plus `storage/photos/`.
    pub data_dir: PathBuf,
    /// Prefix for public object URLs.
    pub public_base_url: String,
    /// Extra fonts searched before the system fonts.
    pub font_dir: Option<PathBuf>,
    /// Fixed seed for sticker placement.
    pub sticker_seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            public_base_url: DEFAULT_PUBLIC_URL.to_string(),
            font_dir: None,
            sticker_seed: None,
        }
    }
}

impl AppConfig {
    pub fn from_json_str(s: &str) -> GlowupResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| GlowupError::validation(format!("invalid config: {e}")))
    }

    pub fn from_path(path: &Path) -> GlowupResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Defaults or `path`, then the process environment on top.
    pub fn load(path: Option<&Path>) -> GlowupResult<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_path(p)?,
            None => Self::default(),
        };
        cfg.apply_env_with(|key| std::env::var(key).ok());
        tracing::debug!(?cfg, "configuration loaded");
        Ok(cfg)
    }

    /// Override fields from `lookup`; empty values are ignored.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = get(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_PUBLIC_URL) {
            self.public_base_url = v;
        }
        if let Some(v) = get(ENV_FONT_DIR) {
            self.font_dir = Some(PathBuf::from(v));
        }
    }

    pub fn open_gateway(&self) -> GlowupResult<LocalGateway> {
        LocalGateway::open(&self.data_dir, &self.public_base_url)
    }

    /// Fonts from `font_dir` when set, completed by the system fonts.
    pub fn font_book(&self) -> GlowupResult<FontBook> {
        match &self.font_dir {
            Some(dir) => FontBook::from_dir(dir),
            None => Ok(FontBook::system()),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
