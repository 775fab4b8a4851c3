//! Configuration module for the fantia-downloader.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Content mode selection
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{AccountConfig, Config, OptionsConfig, TargetConfig};
pub use modes::ContentMode;
pub use validation::validate_config;
