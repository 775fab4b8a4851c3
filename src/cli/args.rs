//! Command-line argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{Config, ContentMode};

/// Fantia fan club downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "fantia-downloader",
    version,
    about = "Download photos and files from a Fantia fan club",
    long_about = "Crawls every post of a Fantia fan club and downloads either the original photos \
                  or the attached files.\n\n\
                  Downloaded zip archives are expanded and their contents moved next to the other \
                  files, prefixed with the archive name."
)]
pub struct Args {
    /// Fan club id (the number in /fanclubs/{id}).
    #[arg(short, long = "fan-club")]
    pub fan_club: Option<String>,

    /// Root directory for downloads.
    #[arg(short = 'd', long = "directory")]
    pub download_directory: Option<PathBuf>,

    /// Value of the _session_id cookie.
    #[arg(short, long = "session-id", env = "FANTIA_SESSION_ID")]
    pub session_id: Option<String>,

    /// Browser user agent string.
    #[arg(short = 'a', long = "user-agent", env = "FANTIA_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Content to download.
    #[arg(long, value_enum)]
    pub mode: Option<ContentModeArg>,

    /// Number of listing pages to crawl (0 = detect from the pager).
    #[arg(short = 'p', long)]
    pub max_page: Option<u32>,

    /// Seconds to wait before each download.
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Also write log output to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Hide download progress bars.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI content mode argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ContentModeArg {
    /// Original-resolution photos.
    Photo,
    /// Attached files; zip archives are expanded.
    File,
}

impl From<ContentModeArg> for ContentMode {
    fn from(arg: ContentModeArg) -> Self {
        match arg {
            ContentModeArg::Photo => ContentMode::Photo,
            ContentModeArg::File => ContentMode::File,
        }
    }
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(self, config: &mut Config) {
        if let Some(fan_club) = self.fan_club {
            config.target.fan_club_id = fan_club;
        }

        // Override account settings if provided
        if let Some(session_id) = self.session_id {
            config.account.session_id = session_id;
        }

        if let Some(user_agent) = self.user_agent {
            config.account.user_agent = user_agent;
        }

        // Override options if provided
        if let Some(dir) = self.download_directory {
            config.options.download_directory = dir;
        }

        if let Some(mode) = self.mode {
            config.options.content_mode = mode.into();
        }

        if let Some(max_page) = self.max_page {
            config.options.max_page = max_page;
        }

        if let Some(interval) = self.interval {
            config.options.download_interval_seconds = interval;
        }

        if self.quiet {
            config.options.show_downloads = false;
        }
    }
}
