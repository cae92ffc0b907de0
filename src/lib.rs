//! plugwiz creates new plugins from blueprint directories.
//! A blueprint is copied, then magic tokens such as `%!PluginNameAsIdentifier!%`
//! and user defined search/replace rules are substituted in the names and
//! contents of the copy.

/// Blueprint discovery and the copy collaborator
pub mod blueprint;

/// Command-line interface module for the plugwiz application
pub mod cli;

/// Settings file loading and the resolved run configuration
/// Supports JSON and YAML formats (plugwiz.json, plugwiz.yml, plugwiz.yaml)
pub mod config;

pub mod constants;

/// Error types and handling for the plugwiz application
pub mod error;

/// File and directory exclusion patterns
pub mod ignore;

pub mod logger;

/// The two phase name and content rewrite
pub mod rewriter;

/// Rules file location, parsing and application
pub mod rules;

/// Text transformations used to derive datum forms
pub mod text;

/// Token table, datum forms and magic token substitution
pub mod tokens;

/// Orchestration of a run across destinations
pub mod wizard;
