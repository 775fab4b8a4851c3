//! Filename generation and manipulation.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Validate and sanitize a single file name taken from remote data.
///
/// Path separators and characters invalid on common filesystems become `_`.
/// Returns an error for names that would escape the target directory.
pub fn sanitize_filename(name: &str) -> Result<String> {
    // Reject null bytes
    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed in filename: '{}'",
            name
        )));
    }

    let trimmed = name.trim();
    if trimmed == "." || trimmed == ".." {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    // Reject empty or whitespace-only names
    if sanitized.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Filename cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(sanitized)
}

/// Extensions that are never downloaded or extracted.
#[derive(Debug, Clone, Default)]
pub struct ExtensionDenylist {
    extensions: Vec<String>,
}

impl ExtensionDenylist {
    /// Build a denylist; entries are matched ASCII case-insensitively and a
    /// missing leading dot is added.
    pub fn new<S: AsRef<str>, I: IntoIterator<Item = S>>(extensions: I) -> Self {
        let extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .map(|e| if e.starts_with('.') { e } else { format!(".{}", e) })
            .collect();
        Self { extensions }
    }

    /// Whether a file whose name ends with one of the extensions is denied.
    pub fn denies(&self, name: &str) -> bool {
        let lower = name.to_ascii_lowercase();
        self.extensions.iter().any(|ext| lower.ends_with(ext.as_str()))
    }
}

/// Generate a unique filename by appending a number while `is_taken` reports
/// the candidate as used.
pub fn make_unique_filename(path: &Path, is_taken: impl Fn(&Path) -> bool) -> PathBuf {
    if !is_taken(path) {
        return path.to_path_buf();
    }

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let parent = path.parent().unwrap_or(Path::new("."));

    let mut counter = 1;
    loop {
        let new_name = if ext.is_empty() {
            format!("{}_{}", stem, counter)
        } else {
            format!("{}_{}.{}", stem, counter, ext)
        };

        let new_path = parent.join(&new_name);
        if !is_taken(&new_path) {
            return new_path;
        }

        counter += 1;
        if counter > 1000 {
            // Safety limit
            return new_path;
        }
    }
}
