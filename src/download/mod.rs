//! Download module for fan club content.
//!
//! This module provides:
//! - Listing crawl and post resolution
//! - The ordered download worklist
//! - Paced worklist downloading
//! - The whole-run pipeline
//! - Download state tracking

pub mod crawl;
pub mod fan_club;
pub mod media;
pub mod state;
pub mod worklist;

pub use crawl::{crawl_fan_club, resolve_post, CrawlOptions};
pub use fan_club::download_fan_club;
pub use media::Downloader;
pub use state::DownloadState;
pub use worklist::Worklist;
