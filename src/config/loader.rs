//! Configuration structures and loading logic.

use crate::config::modes::ContentMode;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub account: AccountConfig,

    #[serde(default)]
    pub target: TargetConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// Session credentials configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Value of the `_session_id` cookie from a logged-in browser.
    #[serde(default)]
    pub session_id: String,

    /// Browser user agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Fan club targeting configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Numeric fan club identifier, as seen in `/fanclubs/{id}`.
    #[serde(default)]
    pub fan_club_id: String,
}

/// Download options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Content mode (photo, file).
    #[serde(default)]
    pub content_mode: ContentMode,

    /// Root directory for downloads. Relative paths are anchored at the
    /// directory holding the configuration file.
    #[serde(default = "default_download_directory")]
    pub download_directory: PathBuf,

    /// Fixed delay before every download.
    #[serde(default = "default_interval")]
    pub download_interval_seconds: u64,

    /// Number of listing pages to crawl; 0 detects it from the pager.
    #[serde(default)]
    pub max_page: u32,

    /// Extensions (with leading dot) that are never downloaded or extracted.
    #[serde(default = "default_denied_extensions")]
    pub denied_extensions: Vec<String>,

    /// Encoding label used to repair archive entry names.
    #[serde(default = "default_archive_name_encoding")]
    pub archive_name_encoding: String,

    /// Platform root URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whether to show download progress.
    #[serde(default = "default_true")]
    pub show_downloads: bool,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            content_mode: ContentMode::default(),
            download_directory: default_download_directory(),
            download_interval_seconds: default_interval(),
            max_page: 0,
            denied_extensions: default_denied_extensions(),
            archive_name_encoding: default_archive_name_encoding(),
            base_url: default_base_url(),
            show_downloads: true,
        }
    }
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            session_id: String::new(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_13_5) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/67.0.3396.99 Safari/537.36".to_string()
}

fn default_download_directory() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_interval() -> u64 {
    3
}

fn default_denied_extensions() -> Vec<String> {
    vec![".psd".to_string(), ".txt".to_string()]
}

fn default_archive_name_encoding() -> String {
    "Shift_JIS".to_string()
}

fn default_base_url() -> String {
    "https://fantia.jp/".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// A relative download directory is rewritten to sit next to the file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}. Create one from config.example.toml",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let mut config: Config = toml::from_str(&content)?;
        if let Some(parent) = path.parent() {
            config.anchor_download_directory(parent);
        }
        Ok(config)
    }

    /// Resolve a relative download directory against `base`.
    pub fn anchor_download_directory(&mut self, base: &Path) {
        if self.options.download_directory.is_relative() {
            self.options.download_directory = base.join(&self.options.download_directory);
        }
    }

    /// Directory that receives everything for the targeted fan club.
    pub fn fan_club_directory(&self) -> PathBuf {
        self.options
            .download_directory
            .join(&self.target.fan_club_id)
    }

    /// Delay applied before each download.
    pub fn download_interval(&self) -> Duration {
        Duration::from_secs(self.options.download_interval_seconds)
    }
}
