//! File and directory exclusion for blueprint copies and rewrites.
//! Entries are matched by base name against the fixed system patterns plus
//! any extra glob patterns from the settings file.

use crate::constants::{DEFAULT_DIR_EXCLUDES, DEFAULT_FILE_EXCLUDES};
use crate::error::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use std::path::Path;

/// Compiled exclusion patterns.
#[derive(Debug, Clone)]
pub struct Excludes {
    set: GlobSet,
    len: usize,
}

impl Excludes {
    /// Builds the default exclusions extended by `extra` glob patterns.
    ///
    /// # Errors
    /// * `Error::GlobError` if a pattern is not a valid glob
    ///
    /// # Example
    /// ```
    /// use plugwiz::ignore::Excludes;
    ///
    /// let excludes = Excludes::new(&["*.orig"]).unwrap();
    /// assert!(excludes.is_excluded_name(".DS_Store"));
    /// assert!(excludes.is_excluded_name("main.c.orig"));
    /// assert!(!excludes.is_excluded_name("main.c"));
    /// ```
    pub fn new<S: AsRef<str>>(extra: &[S]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        let mut len = 0;
        let defaults = DEFAULT_FILE_EXCLUDES.iter().chain(DEFAULT_DIR_EXCLUDES.iter()).copied();
        for pattern in defaults.chain(extra.iter().map(AsRef::as_ref)) {
            builder.add(Glob::new(pattern)?);
            len += 1;
        }
        let set = builder.build()?;
        debug!("Compiled {len} exclusion pattern(s)");
        Ok(Self { set, len })
    }

    /// Only the fixed system patterns.
    pub fn with_defaults() -> Result<Self> {
        Self::new::<&str>(&[])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_excluded_name(&self, name: &str) -> bool {
        self.set.is_match(name)
    }

    /// Matches the base name of `path`. Paths without one are never excluded.
    pub fn is_excluded<P: AsRef<Path>>(&self, path: P) -> bool {
        path.as_ref().file_name().is_some_and(|name| self.set.is_match(Path::new(name)))
    }
}
