//! Moving expanded files into the fan club directory, and cleanup.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::Result;
use crate::fs::naming::make_unique_filename;
use crate::fs::paths::OutputLayout;

/// Move every file below `temp_dir` into `output_dir` as
/// `{archive}_{file name}`, where `{archive}` is the directory directly under
/// `temp_dir` the file was found in. Returns the number of files moved.
///
/// Files left by an earlier run are replaced. Only names that clash within
/// this pass get a numbered suffix.
pub fn consolidate(temp_dir: &Path, output_dir: &Path) -> Result<u64> {
    if !temp_dir.is_dir() {
        return Ok(0);
    }

    let mut files = Vec::new();
    collect_files(temp_dir, &mut files)?;
    files.sort();

    let mut claimed: HashSet<PathBuf> = HashSet::new();
    let mut moved = 0;
    for file in files {
        let (archive, name) = match owning_archive(temp_dir, &file) {
            Some(parts) => parts,
            None => {
                tracing::warn!("Leaving file outside any archive folder: {}", file.display());
                continue;
            }
        };

        let target = make_unique_filename(&output_dir.join(format!("{}_{}", archive, name)), |p| {
            claimed.contains(p)
        });
        move_file(&file, &target)?;
        claimed.insert(target.clone());
        tracing::debug!("move {} -> {}", file.display(), target.display());
        moved += 1;
    }

    Ok(moved)
}

/// Archive folder and file name of a file below `temp_dir`.
fn owning_archive(temp_dir: &Path, file: &Path) -> Option<(String, String)> {
    let relative = file.strip_prefix(temp_dir).ok()?;
    let mut components = relative.components();

    // Files directly in temp_dir belong to no archive.
    if relative.components().count() < 2 {
        return None;
    }

    let archive = match components.next()? {
        Component::Normal(name) => name.to_string_lossy().into_owned(),
        _ => return None,
    };
    let name = file.file_name()?.to_string_lossy().into_owned();
    Some((archive, name))
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

/// Rename over any existing file, falling back to copy + delete across
/// filesystems.
fn move_file(from: &Path, to: &Path) -> Result<()> {
    if let Err(e) = fs::rename(from, to) {
        tracing::debug!("rename failed ({}), copying instead", e);
        fs::copy(from, to)?;
        fs::remove_file(from)?;
    }
    Ok(())
}

/// Remove the staging and temporary directories with everything in them.
pub fn cleanup(layout: &OutputLayout) -> Result<()> {
    for dir in [layout.staging_dir(), layout.temp_dir()] {
        match fs::remove_dir_all(dir) {
            Ok(()) => tracing::debug!("removed {}", dir.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
