//! Error handling for the plugwiz application.
//! Defines the error taxonomy and the result alias used throughout the crate.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for plugwiz operations.
///
/// Fatal variants (configuration, settings, initial copy) unwind to the
/// caller. Per-item variants are collected into a
/// [`RewriteReport`](crate::rewriter::RewriteReport) and never abort a walk.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Missing or invalid required input, or an unusable destination.
    #[error("Configuration error: {0}.")]
    ConfigurationError(String),

    /// A magic token references a datum or form that is not in the token table.
    #[error("Unresolved token: datum '{datum}' has no form '{form}'.")]
    UnresolvedTokenError { datum: String, form: String },

    /// A single line of a rules file could not be turned into a rule.
    #[error("Rule load error in '{}' line {line}: {reason}.", path.display())]
    RuleLoadError { path: PathBuf, line: usize, reason: String },

    /// A rename target already exists and overwriting was not requested.
    #[error("Conflict: '{}' already exists, use -f/--force to overwrite.", target.display())]
    ConflictError { target: PathBuf },

    /// Strict decoding of non UTF-8 input failed.
    #[error("Encoding error: {0}.")]
    EncodingError(String),

    /// Represents errors that occur while loading the settings file
    #[error("Settings error: {0}.")]
    SettingsError(String),

    /// Invalid exclusion pattern.
    #[error("Glob error: {0}.")]
    GlobError(#[from] globset::Error),

    /// Invalid regular expression supplied by the caller.
    #[error("Regex error: {0}.")]
    RegexError(#[from] regex::Error),

    #[error("Directory walk error: {0}.")]
    WalkdirError(#[from] walkdir::Error),

    /// Replacing a rewritten file with its temporary copy failed.
    #[error("Persist error: {0}.")]
    PersistError(#[from] tempfile::PersistError),

    /// Wraps a per-item failure together with the path being processed.
    #[error("Failed to process '{}': {e}", source_path.display())]
    ProcessError { source_path: PathBuf, e: String },
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
