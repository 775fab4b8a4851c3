//! Path and directory management.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;

/// Name of the archive staging directory inside the fan club directory.
pub const STAGING_DIR_NAME: &str = "zip";

/// Name of the archive expansion directory inside the fan club directory.
pub const TEMP_DIR_NAME: &str = "temp";

/// Directories a run writes to.
///
/// `{root}/{fan_club_id}/` holds the final outputs; `zip/` and `temp/` below it
/// exist only while a run is in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    fan_club_dir: PathBuf,
    staging_dir: PathBuf,
    temp_dir: PathBuf,
}

impl OutputLayout {
    /// Layout rooted at a fan club directory.
    pub fn new(fan_club_dir: impl Into<PathBuf>) -> Self {
        let fan_club_dir = fan_club_dir.into();
        Self {
            staging_dir: fan_club_dir.join(STAGING_DIR_NAME),
            temp_dir: fan_club_dir.join(TEMP_DIR_NAME),
            fan_club_dir,
        }
    }

    /// Layout for the fan club targeted by `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.fan_club_directory())
    }

    /// Final output directory.
    pub fn fan_club_dir(&self) -> &Path {
        &self.fan_club_dir
    }

    /// Downloaded archives awaiting expansion.
    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Root of the per-archive expansion directories.
    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Create every directory of the layout.
    pub fn create_all(&self) -> Result<()> {
        ensure_dir(&self.fan_club_dir)?;
        ensure_dir(&self.staging_dir)?;
        ensure_dir(&self.temp_dir)?;
        Ok(())
    }
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_from_config() {
        let mut config = Config::default();
        config.options.download_directory = PathBuf::from("/downloads");
        config.target.fan_club_id = "1096".to_string();

        let layout = OutputLayout::from_config(&config);
        assert_eq!(layout.fan_club_dir(), Path::new("/downloads/1096"));
        assert_eq!(layout.staging_dir(), Path::new("/downloads/1096/zip"));
        assert_eq!(layout.temp_dir(), Path::new("/downloads/1096/temp"));
    }

    #[test]
    fn test_create_all() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path().join("1096"));
        layout.create_all().unwrap();
        assert!(layout.staging_dir().is_dir());
        assert!(layout.temp_dir().is_dir());

        // Existing directories are fine.
        layout.create_all().unwrap();
    }
}
