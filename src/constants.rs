//! Common constants used throughout the plugwiz application.

/// Magic token start marker.
///
/// Both markers must stay legal in file names on every platform. Windows
/// rejects `\ / : * ? " < > |`, macOS rejects `:`.
pub const TOKEN_START: &str = "%!";

/// Magic token end marker.
pub const TOKEN_END: &str = "!%";

/// Marker pair used by early blueprint collections.
pub const LEGACY_TOKEN_START: &str = "<";
pub const LEGACY_TOKEN_END: &str = ">";

/// Separator between datum name and form name inside a magic token.
pub const FORM_SEPARATOR: &str = "As";

/// Name of the rules file searched for inside a blueprint collection.
pub const RULES_FILE: &str = "rules.txt";

/// Supported settings file names, tried in order at the collection root.
pub const SETTINGS_FILES: [&str; 3] = ["plugwiz.json", "plugwiz.yml", "plugwiz.yaml"];

/// Blueprint used when no type is selected.
pub const DEFAULT_PLUGIN_TYPE: &str = "cmdplugin";

/// Directory name of the blueprint collection when nothing else is configured.
pub const DEFAULT_DATA_DIR: &str = "plugwiz_data";

/// Plugin id used when testing fallbacks are enabled and no id was given.
pub const PLUGIN_ID_TESTING: u64 = 1_000_001;

/// Plugin name used when testing fallbacks are enabled and no name was given.
pub const PLUGIN_NAME_TESTING: &str = "Unnamed Plugin";

/// Registered plugin ids are strictly greater than this value.
pub const PLUGIN_ID_MIN: u64 = 1_000_000;

/// Maximum length of the `Abbreviation` form.
pub const ABBREVIATION_MAX_CHARS: usize = 6;

pub const ENV_DATA: &str = "PLUGWIZ_DATA";
pub const ENV_AUTHOR: &str = "PLUGWIZ_AUTHORNAME";
pub const ENV_ORG: &str = "PLUGWIZ_ORGNAME";
pub const ENV_RULES_FILE: &str = "PLUGWIZ_RULES_FILE";
pub const ENV_OVERWRITE: &str = "PLUGWIZ_OVERWRITE";
pub const ENV_CREATE_DIRS: &str = "PLUGWIZ_CREATE_DIRS";

/// OS junk files that are never copied or rewritten.
pub const DEFAULT_FILE_EXCLUDES: [&str; 4] =
    [".DS_Store", ".hotfiles.btree", "Thumbs.db", "desktop.ini"];

/// Version control and OS metadata directories that are never copied or rewritten.
pub const DEFAULT_DIR_EXCLUDES: [&str; 8] =
    [".git", ".svn", ".hg", "CVS", ".Trash", ".Trashes", ".fseventsd", ".Spotlight-V100"];
