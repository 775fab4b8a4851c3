//! Fantia Downloader - download a fan club's photos or files
//!
//! This library crawls the post listing of one Fantia fan club, resolves each
//! post's content through the private JSON API and downloads it into a flat
//! per-fan-club directory.
//!
//! # Features
//!
//! - Photo mode: original-resolution images of every post
//! - File mode: attached files, with zip archives expanded in place
//! - Archive entry names repaired from Shift_JIS
//! - Fixed pacing between downloads
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use fantia_downloader::{Config, DownloadState, FantiaClient, download_fan_club};
//! use fantia_downloader::api::Endpoints;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.toml"))?;
//!     let endpoints = Endpoints::new(&config.options.base_url)?;
//!     let client = FantiaClient::new(
//!         &config.account.session_id,
//!         &config.account.user_agent,
//!         endpoints.root(),
//!         true,
//!     )?;
//!
//!     let mut state = DownloadState::new(config.target.fan_club_id.clone());
//!     download_fan_club(&client, &config, &mut state).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod media;
pub mod output;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports for convenience
pub use api::{FantiaClient, Fetcher};
pub use config::{Config, ContentMode};
pub use download::{download_fan_club, DownloadState, Worklist};
pub use error::{Error, Result};
pub use media::ContentItem;
