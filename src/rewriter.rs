//! Two phase rewrite of a copied blueprint tree.
//!
//! Phase one renames files and directories whose names contain magic tokens
//! or match a rule. Phase two substitutes tokens and applies the rules to the
//! contents of every text file. Both phases keep going after per-entry
//! failures and collect them in a [`RewriteReport`].

use crate::error::{Error, Result};
use crate::ignore::Excludes;
use crate::rules::RuleSet;
use crate::tokens::{MagicTokens, TokenTable};
use log::{debug, info, warn};
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// Number of leading bytes searched for a NUL byte to detect binary files.
const BINARY_SNIFF_LEN: usize = 8192;

/// A per-entry failure, with the line it occurred on for content issues.
#[derive(Debug)]
pub struct Issue {
    pub path: PathBuf,
    pub line: Option<usize>,
    pub error: Error,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}: {}", self.path.display(), line, self.error),
            None => write!(f, "{}: {}", self.path.display(), self.error),
        }
    }
}

/// Outcome of one rewrite phase.
#[derive(Debug, Default)]
pub struct RewriteReport {
    /// Entries looked at, excluded entries not counted.
    pub visited: usize,
    pub renamed: usize,
    pub rewritten: usize,
    pub skipped_binary: usize,
    pub issues: Vec<Issue>,
}

impl RewriteReport {
    pub fn push<P: Into<PathBuf>>(&mut self, path: P, line: Option<usize>, error: Error) {
        let issue = Issue { path: path.into(), line, error };
        warn!("{issue}");
        self.issues.push(issue);
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Folds `other` into `self`.
    pub fn merge(&mut self, other: RewriteReport) {
        self.visited += other.visited;
        self.renamed += other.renamed;
        self.rewritten += other.rewritten;
        self.skipped_binary += other.skipped_binary;
        self.issues.extend(other.issues);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileOutcome {
    Rewritten,
    Unchanged,
    Binary,
}

/// Splits a file name into stem and extension, keeping the dot with the extension.
///
/// Names starting with dots have no extension unless another dot follows.
///
/// ```
/// use plugwiz::rewriter::split_extension;
///
/// assert_eq!(split_extension("main.tar.gz"), ("main.tar", ".gz"));
/// assert_eq!(split_extension(".gitignore"), (".gitignore", ""));
/// assert_eq!(split_extension("Makefile"), ("Makefile", ""));
/// ```
pub fn split_extension(name: &str) -> (&str, &str) {
    let leading_dots = name.len() - name.trim_start_matches('.').len();
    match name[leading_dots..].rfind('.') {
        Some(index) => name.split_at(leading_dots + index),
        None => (name, ""),
    }
}

fn is_binary(content: &[u8]) -> bool {
    content.iter().take(BINARY_SNIFF_LEN).any(|byte| *byte == 0)
}

/// Replaces `path` with `content` through a temporary file in the same
/// directory, keeping the permissions of the original.
pub fn write_atomically(path: &Path, content: &[u8]) -> Result<()> {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let permissions = fs::metadata(path)?.permissions();

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.flush()?;
    fs::set_permissions(temp.path(), permissions)?;
    temp.persist(path)?;
    Ok(())
}

fn remove_entry(path: &Path) -> Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Whether renaming `path` to `target` would replace a different entry.
///
/// A case-only rename on a case-insensitive file system resolves `target` to
/// `path` itself, so the directory listing decides there.
fn target_exists(path: &Path, target: &Path, name: &str, new_name: &str) -> Result<bool> {
    if fs::symlink_metadata(target).is_err() {
        return Ok(false);
    }
    if new_name.to_lowercase() != name.to_lowercase() {
        return Ok(true);
    }
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    for entry in fs::read_dir(parent)? {
        if entry?.file_name() == new_name {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Applies one token table and one rule set to a tree.
#[derive(Debug, Clone, Copy)]
pub struct Rewriter<'a> {
    table: &'a TokenTable,
    rules: &'a RuleSet,
    tokens: &'a MagicTokens,
    excludes: &'a Excludes,
}

impl<'a> Rewriter<'a> {
    pub fn new(
        table: &'a TokenTable,
        rules: &'a RuleSet,
        tokens: &'a MagicTokens,
        excludes: &'a Excludes,
    ) -> Self {
        Self { table, rules, tokens, excludes }
    }

    /// Computes the new name of an entry, `None` if it keeps its name.
    ///
    /// Rules are applied to the stem first, then tokens are substituted in
    /// the result. The extension is never touched.
    ///
    /// # Errors
    /// * `Error::UnresolvedTokenError` for the first token that cannot be resolved
    /// * `Error::ProcessError` if the new name is empty or contains a path separator
    pub fn rewrite_name(&self, name: &str) -> Result<Option<String>> {
        let (stem, extension) = split_extension(name);
        let (stem, matched) = self.rules.apply_str(stem);

        let substitution = self.tokens.replace(stem.as_bytes(), self.table);
        if let Some(error) = substitution.unresolved.into_iter().next() {
            return Err(error);
        }
        if !matched && substitution.replaced == 0 {
            return Ok(None);
        }

        let new_name = format!("{}{extension}", String::from_utf8_lossy(&substitution.text));
        if new_name == name {
            return Ok(None);
        }
        let invalid = matches!(new_name.as_str(), "" | "." | "..") || new_name.contains(['/', '\\']);
        if invalid {
            return Err(Error::ProcessError {
                source_path: PathBuf::from(name),
                e: format!("'{new_name}' is not a valid file name"),
            });
        }
        Ok(Some(new_name))
    }

    /// Substitutes tokens, then applies the rules, line by line.
    ///
    /// Line endings are preserved. Unresolved tokens are left in place and
    /// returned with their 1-based line number.
    pub fn rewrite_text(&self, text: &[u8]) -> (Vec<u8>, Vec<(usize, Error)>) {
        let mut output = Vec::with_capacity(text.len());
        let mut unresolved = Vec::new();

        for (index, line) in text.split_inclusive(|byte| *byte == b'\n').enumerate() {
            let substitution = self.tokens.replace(line, self.table);
            unresolved.extend(substitution.unresolved.into_iter().map(|e| (index + 1, e)));
            let (line, _) = self.rules.apply(&substitution.text);
            output.extend_from_slice(&line);
        }

        (output, unresolved)
    }

    /// Phase one: renames every entry below `root`, parents before children.
    ///
    /// An existing rename target is replaced when `overwrite` is set and
    /// reported as a conflict otherwise.
    pub fn rewrite_names(&self, root: &Path, overwrite: bool) -> RewriteReport {
        info!("Rewriting names below '{}'", root.display());
        let mut report = RewriteReport::default();
        self.rename_children(root, overwrite, &mut report);
        info!("Renamed {} of {} entries", report.renamed, report.visited);
        report
    }

    fn rename_children(&self, dir: &Path, overwrite: bool, report: &mut RewriteReport) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => return report.push(dir, None, e.into()),
        };

        let mut children = Vec::new();
        for entry in entries {
            match entry.and_then(|entry| Ok((entry.path(), entry.file_type()?.is_dir()))) {
                Ok(child) => children.push(child),
                Err(e) => report.push(dir, None, e.into()),
            }
        }
        children.sort_by(|(a, a_dir), (b, b_dir)| b_dir.cmp(a_dir).then_with(|| a.cmp(b)));

        // Paths created by renames in this directory, their old listing entry is stale.
        let mut created = HashSet::new();
        for (path, is_dir) in children {
            if created.contains(&path) {
                debug!("Skipping '{}', it was replaced by a rename", path.display());
                continue;
            }
            if self.excludes.is_excluded(&path) {
                debug!("Excluded '{}'", path.display());
                continue;
            }
            report.visited += 1;

            let path = match self.rename_entry(&path, overwrite) {
                Ok(Some(target)) => {
                    report.renamed += 1;
                    created.insert(target.clone());
                    target
                }
                Ok(None) => path,
                Err(e) => {
                    report.push(&path, None, e);
                    path
                }
            };

            if is_dir {
                self.rename_children(&path, overwrite, report);
            }
        }
    }

    fn rename_entry(&self, path: &Path, overwrite: bool) -> Result<Option<PathBuf>> {
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            debug!("Skipping non UTF-8 name '{}'", path.display());
            return Ok(None);
        };
        let Some(new_name) = self.rewrite_name(name)? else {
            return Ok(None);
        };

        let target = path.with_file_name(&new_name);
        if target_exists(path, &target, name, &new_name)? {
            if !overwrite {
                return Err(Error::ConflictError { target });
            }
            debug!("Removing existing '{}'", target.display());
            remove_entry(&target)?;
        }

        fs::rename(path, &target)?;
        debug!("Renamed '{}' to '{}'", path.display(), new_name);
        Ok(Some(target))
    }

    /// Phase two: rewrites the contents of every regular file below `root`.
    ///
    /// Files whose name matches `exclude`, and binary files, are left alone.
    /// A file is only written if its contents changed.
    pub fn rewrite_contents(&self, root: &Path, exclude: Option<&Regex>) -> RewriteReport {
        info!("Rewriting contents below '{}'", root.display());
        let mut report = RewriteReport::default();

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.excludes.is_excluded(entry.path()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    report.push(path, None, e.into());
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if exclude.is_some_and(|regex| regex.is_match(&name)) {
                debug!("Contents of '{}' excluded", entry.path().display());
                continue;
            }
            report.visited += 1;

            match self.rewrite_file(entry.path(), &mut report) {
                Ok(FileOutcome::Rewritten) => report.rewritten += 1,
                Ok(FileOutcome::Binary) => report.skipped_binary += 1,
                Ok(FileOutcome::Unchanged) => {}
                Err(e) => report.push(entry.path(), None, e),
            }
        }

        info!(
            "Rewrote {} of {} files ({} binary skipped)",
            report.rewritten, report.visited, report.skipped_binary
        );
        report
    }

    fn rewrite_file(&self, path: &Path, report: &mut RewriteReport) -> Result<FileOutcome> {
        let content = fs::read(path)?;
        if is_binary(&content) {
            debug!("Skipping binary file '{}'", path.display());
            return Ok(FileOutcome::Binary);
        }

        let (rewritten, unresolved) = self.rewrite_text(&content);
        for (line, error) in unresolved {
            report.push(path, Some(line), error);
        }
        if rewritten == content {
            return Ok(FileOutcome::Unchanged);
        }

        write_atomically(path, &rewritten)?;
        debug!("Rewrote '{}'", path.display());
        Ok(FileOutcome::Rewritten)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_extension_edge_cases() {
        assert_eq!(split_extension(""), ("", ""));
        assert_eq!(split_extension("..."), ("...", ""));
        assert_eq!(split_extension(".config.json"), (".config", ".json"));
        assert_eq!(split_extension("name."), ("name", "."));
    }

    #[test]
    fn test_is_binary() {
        assert!(is_binary(b"GIF89a\0\0"));
        assert!(!is_binary("plain text \u{e9}".as_bytes()));
        let mut late_nul = vec![b'a'; BINARY_SNIFF_LEN];
        late_nul.push(0);
        assert!(!is_binary(&late_nul));
    }
}
