//! Filesystem module.
//!
//! Provides:
//! - Output directory layout
//! - Filename sanitizing and extension denial
//! - Archive expansion with entry name repair
//! - Consolidation into the fan club directory and cleanup

pub mod archive;
pub mod consolidate;
pub mod naming;
pub mod paths;

pub use archive::{ArchiveExpander, EntryNameDecoder, ExpandSummary};
pub use consolidate::{cleanup, consolidate};
pub use naming::{make_unique_filename, sanitize_filename, ExtensionDenylist};
pub use paths::{ensure_dir, OutputLayout};
