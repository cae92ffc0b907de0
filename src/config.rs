//! Configuration handling for plugwiz.
//! This module loads the optional settings file of a blueprint collection
//! and holds the resolved configuration of one run.

use crate::blueprint::{blueprint_dir, list_blueprints};
use crate::constants::{DEFAULT_PLUGIN_TYPE, PLUGIN_ID_MIN};
use crate::error::{Error, Result};
use crate::ignore::Excludes;
use crate::tokens::Delimiters;
use log::{debug, warn};
use serde::Deserialize;
use std::env;
use std::path::{Component, Path, PathBuf};

/// Defaults stored in `plugwiz.json`, `plugwiz.yml` or `plugwiz.yaml` at the
/// root of a blueprint collection. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub author: Option<String>,
    pub org: Option<String>,
    pub plugin_type: Option<String>,
    pub rules_file: Option<PathBuf>,
    pub excludes: Vec<String>,
}

/// Loads the settings file of a blueprint collection, trying multiple file formats.
///
/// # Arguments
/// * `collection` - Root of the blueprint collection
/// * `settings_files` - List of settings file names to try, in order
///
/// # Returns
/// * `Result<Option<Settings>>` - `None` if the collection has no settings file
///
/// # Errors
/// * `Error::SettingsError` if the first existing file cannot be parsed
pub fn load_settings<P: AsRef<Path>>(
    collection: P,
    settings_files: &[&str],
) -> Result<Option<Settings>> {
    for file in settings_files {
        let settings_path = collection.as_ref().join(file);
        if settings_path.is_file() {
            debug!("Loading settings from {}", settings_path.display());
            let content = std::fs::read_to_string(&settings_path)?;
            return parse_settings(&content).map(Some);
        }
    }

    debug!("No settings file found (tried: {})", settings_files.join(", "));
    Ok(None)
}

/// Parses settings content, trying JSON first and YAML second.
pub fn parse_settings(content: &str) -> Result<Settings> {
    match serde_json::from_str(content) {
        Ok(settings) => Ok(settings),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::SettingsError(format!("invalid settings format: {e}"))),
    }
}

/// Name of the user running the process, as reported by the environment.
pub fn platform_user() -> Option<String> {
    ["USER", "USERNAME"]
        .iter()
        .find_map(|var| env::var(var).ok())
        .filter(|user| !user.trim().is_empty())
}

/// A single plain path component that is not made of dots only.
fn is_directory_name(name: &str) -> bool {
    if name.trim().is_empty() || name.chars().all(|c| c == '.') || name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(component)), None) if component == name
    )
}

/// Fully resolved configuration of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardConfig {
    pub plugin_id: String,
    pub plugin_name: String,
    /// Root of the blueprint collection.
    pub collection: PathBuf,
    /// Blueprint directory name inside the collection.
    pub plugin_type: String,
    /// Parent directories, each receiving a `<PluginName>` copy.
    pub destinations: Vec<PathBuf>,
    pub author: Option<String>,
    pub org: Option<String>,
    pub rules_file: Option<PathBuf>,
    pub overwrite: bool,
    pub create_dirs: bool,
    /// Extra glob patterns excluded from copy and rewrite.
    pub excludes: Vec<String>,
    /// File names matching this regex keep their contents untouched.
    pub content_exclude: Option<String>,
    pub delimiters: Delimiters,
    /// Substitute placeholders for a missing id or name.
    pub testing_fallbacks: bool,
}

impl WizardConfig {
    pub fn new<I, N, C>(plugin_id: I, plugin_name: N, collection: C) -> Self
    where
        I: Into<String>,
        N: Into<String>,
        C: Into<PathBuf>,
    {
        Self {
            plugin_id: plugin_id.into(),
            plugin_name: plugin_name.into(),
            collection: collection.into(),
            plugin_type: DEFAULT_PLUGIN_TYPE.to_string(),
            destinations: vec![PathBuf::from(".")],
            author: None,
            org: None,
            rules_file: None,
            overwrite: false,
            create_dirs: false,
            excludes: Vec::new(),
            content_exclude: None,
            delimiters: Delimiters::default(),
            testing_fallbacks: false,
        }
    }

    /// Fills every value the caller left unset from `settings`.
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        if self.author.is_none() {
            self.author = settings.author.clone();
        }
        if self.org.is_none() {
            self.org = settings.org.clone();
        }
        if self.rules_file.is_none() {
            self.rules_file = settings.rules_file.as_ref().map(|path| {
                if path.is_relative() {
                    self.collection.join(path)
                } else {
                    path.clone()
                }
            });
        }
        self.excludes.extend(settings.excludes.iter().cloned());
        self
    }

    /// Directory holding the selected blueprint.
    pub fn blueprint_dir(&self) -> PathBuf {
        blueprint_dir(&self.collection, &self.plugin_type)
    }

    /// Checks everything that can be checked before touching the file system.
    ///
    /// # Errors
    /// * `Error::ConfigurationError` for a missing id, name, collection or
    ///   blueprint, or a plugin name that cannot be a directory name
    pub fn validate(&self) -> Result<()> {
        if !self.testing_fallbacks {
            if self.plugin_id.trim().is_empty() {
                return Err(Error::ConfigurationError("missing plugin id".to_string()));
            }
            if self.plugin_name.trim().is_empty() {
                return Err(Error::ConfigurationError("missing plugin name".to_string()));
            }
        }
        if !self.plugin_name.is_empty() && !is_directory_name(&self.plugin_name) {
            return Err(Error::ConfigurationError(format!(
                "plugin name '{}' cannot be used as a directory name",
                self.plugin_name
            )));
        }
        if !self.collection.is_dir() {
            return Err(Error::ConfigurationError(format!(
                "blueprint collection '{}' does not exist",
                self.collection.display()
            )));
        }
        if !self.blueprint_dir().is_dir() {
            let available = list_blueprints(&self.collection, &Excludes::with_defaults()?)?;
            let available = if available.is_empty() {
                "none available".to_string()
            } else {
                format!("available: {}", available.join(", "))
            };
            return Err(Error::ConfigurationError(format!(
                "no blueprint named '{}' in '{}' ({available})",
                self.plugin_type,
                self.collection.display()
            )));
        }
        if self.destinations.is_empty() {
            return Err(Error::ConfigurationError("no destination given".to_string()));
        }

        match self.plugin_id.parse::<u64>() {
            Ok(id) if id > PLUGIN_ID_MIN => {}
            _ if self.plugin_id.is_empty() => {}
            _ => warn!(
                "Plugin id '{}' is not a registered id (registered ids are numbers above {PLUGIN_ID_MIN})",
                self.plugin_id
            ),
        }
        Ok(())
    }
}
