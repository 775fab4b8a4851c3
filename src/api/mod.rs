//! Fantia API module.
//!
//! This module provides:
//! - Authenticated HTTP access (session cookie + user agent)
//! - URL layout of the public pages and the private JSON API
//! - API response types

pub mod client;
pub mod types;

pub use client::{Endpoints, FantiaClient, Fetcher};
pub use types::*;
