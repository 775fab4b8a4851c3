//! Content mode definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which kind of post content a run resolves and downloads.
///
/// The mode is global for a run: every item in one worklist is of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentMode {
    /// Original-resolution images attached to posts (default).
    #[default]
    Photo,
    /// Downloadable files attached to posts (archives, videos, documents).
    File,
}

impl fmt::Display for ContentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentMode::Photo => write!(f, "photo"),
            ContentMode::File => write!(f, "file"),
        }
    }
}

impl FromStr for ContentMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "photo" => Ok(ContentMode::Photo),
            "file" => Ok(ContentMode::File),
            _ => Err(format!("Unknown content mode: {}", s)),
        }
    }
}
