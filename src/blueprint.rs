//! Blueprint discovery and copying.

use crate::error::{Error, Result};
use crate::ignore::Excludes;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Copies a blueprint tree to a new location.
pub trait BlueprintCopier {
    /// Copies the contents of `source` into `target`, which must not exist.
    /// Excluded entries, and everything below excluded directories, are skipped.
    fn copy_tree(&self, source: &Path, target: &Path, excludes: &Excludes) -> Result<()>;
}

/// Recursive copy built on `walkdir`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeCopier;

impl BlueprintCopier for TreeCopier {
    fn copy_tree(&self, source: &Path, target: &Path, excludes: &Excludes) -> Result<()> {
        let walker = WalkDir::new(source)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !excludes.is_excluded(entry.path()));

        for entry in walker {
            let entry = entry?;
            let relative = entry.path().strip_prefix(source).map_err(|e| Error::ProcessError {
                source_path: entry.path().to_path_buf(),
                e: e.to_string(),
            })?;
            let destination = target.join(relative);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                fs::create_dir_all(&destination)?;
            } else if file_type.is_symlink() {
                copy_symlink(entry.path(), &destination)?;
            } else {
                fs::copy(entry.path(), &destination)?;
            }
            debug!("Copied '{}' to '{}'", entry.path().display(), destination.display());
        }
        Ok(())
    }
}

#[cfg(unix)]
fn copy_symlink(source: &Path, destination: &Path) -> Result<()> {
    let link = fs::read_link(source)?;
    std::os::unix::fs::symlink(link, destination)?;
    Ok(())
}

#[cfg(not(unix))]
fn copy_symlink(source: &Path, destination: &Path) -> Result<()> {
    fs::copy(source, destination)?;
    Ok(())
}

/// Directory of blueprint `plugin_type` inside `collection`.
pub fn blueprint_dir<P: AsRef<Path>>(collection: P, plugin_type: &str) -> PathBuf {
    collection.as_ref().join(plugin_type)
}

/// Names of all blueprints in `collection`, sorted.
pub fn list_blueprints<P: AsRef<Path>>(collection: P, excludes: &Excludes) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(collection.as_ref())? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() || excludes.is_excluded(entry.path()) {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}
