//! Archive expansion.
//!
//! Every archive in the staging directory is expanded into
//! `{temp}/{archive stem}/`, repairing entry names on the way.

use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, SHIFT_JIS};
use zip::read::ZipFile;
use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::fs::naming::ExtensionDenylist;
use crate::fs::paths::ensure_dir;

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Look up an encoding by WHATWG label, also accepting the Windows codepage
/// names for Japanese (`cp932`, `ms932`). The WHATWG `Shift_JIS` decoder
/// already covers the Windows-31J extensions.
pub fn encoding_for_label(label: &str) -> Option<&'static Encoding> {
    match label.trim().to_ascii_lowercase().as_str() {
        "cp932" | "ms932" | "windows-932" => Some(SHIFT_JIS),
        other => Encoding::for_label(other.as_bytes()),
    }
}

/// Decodes archive entry names.
///
/// Archivers on Japanese systems store names as Shift_JIS bytes without setting
/// the UTF-8 flag, so readers render them through the legacy IBM437 codepage.
/// IBM437 maps every byte, which makes the stored bytes recoverable; they are
/// decoded here with the configured target encoding instead.
#[derive(Debug, Clone, Copy)]
pub struct EntryNameDecoder {
    encoding: &'static Encoding,
}

impl Default for EntryNameDecoder {
    fn default() -> Self {
        Self::new(SHIFT_JIS)
    }
}

impl EntryNameDecoder {
    pub fn new(encoding: &'static Encoding) -> Self {
        Self { encoding }
    }

    /// Decoder for an encoding label such as `Shift_JIS` or `cp932`.
    pub fn for_label(label: &str) -> Result<Self> {
        encoding_for_label(label)
            .map(Self::new)
            .ok_or_else(|| Error::ConfigValidation {
                field: "archive_name_encoding".to_string(),
                message: format!("Unknown encoding label: '{}'", label),
            })
    }

    /// Decode the stored bytes of a legacy (non UTF-8 flagged) entry name.
    ///
    /// Bytes that are not valid in the target encoding fall back to lossy UTF-8.
    pub fn decode(&self, raw: &[u8]) -> String {
        if raw.is_ascii() {
            return String::from_utf8_lossy(raw).into_owned();
        }

        match self
            .encoding
            .decode_without_bom_handling_and_without_replacement(raw)
        {
            Some(name) => name.into_owned(),
            None => String::from_utf8_lossy(raw).into_owned(),
        }
    }

    /// Repaired name of an archive entry.
    fn entry_name(&self, entry: &ZipFile<'_>) -> String {
        // UTF-8 flagged entries are already decoded faithfully.
        if entry.name().as_bytes() == entry.name_raw() {
            entry.name().to_string()
        } else {
            self.decode(entry.name_raw())
        }
    }
}

/// Relative output path of an entry name, using the host separator.
///
/// Both `/` and `\` separate components. Returns `None` for directory entries
/// and for names that would leave the extraction directory.
pub fn entry_relative_path(name: &str) -> Option<PathBuf> {
    if name.ends_with('/') || name.ends_with('\\') {
        return None;
    }

    let mut path = PathBuf::new();
    for component in name.split(['/', '\\']) {
        match component {
            "" | "." => continue,
            ".." => return None,
            c if c.contains(':') => return None,
            c => path.push(c),
        }
    }

    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path)
    }
}

/// Counts from expanding one archive.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExpandOutcome {
    pub extracted: u64,
    pub skipped: u64,
}

/// Counts from expanding the whole staging directory.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExpandSummary {
    pub archives: u64,
    pub corrupt: u64,
    pub extracted: u64,
    pub skipped: u64,
}

/// Expands staged archives into the temporary root.
#[derive(Debug, Clone)]
pub struct ArchiveExpander {
    decoder: EntryNameDecoder,
    denylist: ExtensionDenylist,
}

impl ArchiveExpander {
    pub fn new(decoder: EntryNameDecoder, denylist: ExtensionDenylist) -> Self {
        Self { decoder, denylist }
    }

    /// Expand every file in `staging_dir` into `temp_dir/{stem}`.
    ///
    /// Archives that cannot be read are skipped with a warning; filesystem
    /// failures abort.
    pub fn expand_all(&self, staging_dir: &Path, temp_dir: &Path) -> Result<ExpandSummary> {
        let mut summary = ExpandSummary::default();

        if !staging_dir.is_dir() {
            return Ok(summary);
        }

        let mut archives: Vec<PathBuf> = fs::read_dir(staging_dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();
        archives.sort();

        for archive in archives {
            let stem = match archive.file_stem().and_then(|s| s.to_str()) {
                Some(stem) => stem.to_string(),
                None => {
                    tracing::warn!("Skipping archive with unusable name: {}", archive.display());
                    continue;
                }
            };
            let dest = temp_dir.join(&stem);

            match self.expand_archive(&archive, &dest) {
                Ok(outcome) => {
                    tracing::info!(
                        "unzip {} ({} extracted, {} skipped)",
                        archive.display(),
                        outcome.extracted,
                        outcome.skipped
                    );
                    summary.archives += 1;
                    summary.extracted += outcome.extracted;
                    summary.skipped += outcome.skipped;
                }
                Err(Error::CorruptArchive(reason)) => {
                    tracing::warn!("Skipping corrupt archive {}: {}", archive.display(), reason);
                    summary.corrupt += 1;
                    if dest.exists() {
                        fs::remove_dir_all(&dest)?;
                    }
                }
                Err(e) => return Err(e),
            }
        }

        Ok(summary)
    }

    /// Expand one archive into `dest`.
    pub fn expand_archive(&self, archive: &Path, dest: &Path) -> Result<ExpandOutcome> {
        let file = File::open(archive)?;
        let mut zip = ZipArchive::new(BufReader::new(file))
            .map_err(|e| Error::CorruptArchive(e.to_string()))?;

        let mut outcome = ExpandOutcome::default();

        for index in 0..zip.len() {
            let mut entry = zip
                .by_index(index)
                .map_err(|e| Error::CorruptArchive(e.to_string()))?;

            let name = self.decoder.entry_name(&entry);
            // Directories are created on demand from file paths.
            if name.ends_with('/') || name.ends_with('\\') {
                continue;
            }

            if self.denylist.denies(&name) {
                tracing::debug!("Skipping denied entry: {}", name);
                outcome.skipped += 1;
                continue;
            }

            let relative = match entry_relative_path(&name) {
                Some(path) => path,
                None => {
                    tracing::warn!("Skipping unsafe entry name: {}", name);
                    outcome.skipped += 1;
                    continue;
                }
            };

            let target = dest.join(relative);
            if let Some(parent) = target.parent() {
                ensure_dir(parent)?;
            }
            copy_entry(&mut entry, &target)?;
            outcome.extracted += 1;
        }

        Ok(outcome)
    }
}

/// Copy entry data to `target`, telling archive read failures apart from
/// write failures.
fn copy_entry(entry: &mut ZipFile<'_>, target: &Path) -> Result<()> {
    let mut out = File::create(target)?;
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];

    loop {
        let read = entry
            .read(&mut buffer)
            .map_err(|e| Error::CorruptArchive(format!("{}: {}", entry.name(), e)))?;
        if read == 0 {
            break;
        }
        out.write_all(&buffer[..read])?;
    }

    out.flush()?;
    Ok(())
}
