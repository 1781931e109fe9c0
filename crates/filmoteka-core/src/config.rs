use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::NoticeKind;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub ui: UiConfig,
    pub palette: Palette,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub base_url: String,
    /// Where auth failures on reads send the user.
    pub login_path: String,
    pub csrf_cookie: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub toast_hold_ms: u64,
    pub toast_fade_ms: u64,
    pub calendar_page_size: u32,
    /// Answer `favorite` on an already-favorite card locally instead of
    /// asking the server.
    pub favorite_short_circuit: bool,
    pub reload_delay_ms: u64,
}

impl UiConfig {
    pub fn toast_hold(&self) -> Duration {
        Duration::from_millis(self.toast_hold_ms)
    }

    pub fn toast_fade(&self) -> Duration {
        Duration::from_millis(self.toast_fade_ms)
    }

    pub fn reload_delay(&self) -> Duration {
        Duration::from_millis(self.reload_delay_ms)
    }
}

/// Toast colors, one per notice kind. Fixed once a channel is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub success: String,
    pub error: String,
    pub info: String,
    pub favorite: String,
    pub plan: String,
}

impl Palette {
    pub fn color_for(&self, kind: NoticeKind) -> &str {
        match kind {
            NoticeKind::Success => &self.success,
            NoticeKind::Error => &self.error,
            NoticeKind::Info => &self.info,
            NoticeKind::Favorite => &self.favorite,
            NoticeKind::Plan => &self.plan,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        AppConfig::default().palette
    }
}

impl AppConfig {
    /// Load config: the user file (if it exists) merged over built-in defaults.
    pub fn load() -> Result<Self, CoreError> {
        let user_path = Self::config_path();
        if user_path.exists() {
            tracing::debug!(path = %user_path.display(), "Loading user config");
            Self::load_from(&user_path)
        } else {
            Self::parse(DEFAULT_CONFIG)
        }
    }

    /// Load a user file merged over the built-in defaults.
    pub fn load_from(path: &std::path::Path) -> Result<Self, CoreError> {
        let user_str = std::fs::read_to_string(path)?;
        Self::parse_over_defaults(&user_str)
    }

    /// Parse a possibly partial config; missing keys keep their defaults.
    pub fn parse_over_defaults(source: &str) -> Result<Self, CoreError> {
        let mut base: toml::Table =
            toml::from_str(DEFAULT_CONFIG).map_err(|e| CoreError::Config(e.to_string()))?;
        let overlay: toml::Table =
            toml::from_str(source).map_err(|e| CoreError::Config(e.to_string()))?;
        merge_tables(&mut base, overlay);
        toml::Value::Table(base)
            .try_into()
            .map_err(|e: toml::de::Error| CoreError::Config(e.to_string()))
    }

    pub fn parse(source: &str) -> Result<Self, CoreError> {
        toml::from_str(source).map_err(|e| CoreError::Config(e.to_string()))
    }

    /// Save current config to the user config file.
    pub fn save(&self) -> Result<(), CoreError> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CoreError::Config(e.to_string()))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Absolute login URL derived from the server section.
    pub fn login_url(&self) -> String {
        format!(
            "{}{}",
            self.server.base_url.trim_end_matches('/'),
            self.server.login_path
        )
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "filmoteka")
    }
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(nested)) => {
                merge_tables(existing, nested);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}
