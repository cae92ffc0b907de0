//! Command-line interface implementation for plugwiz.
//! Provides argument parsing and help text formatting using clap.

use crate::config::{platform_user, Settings, WizardConfig};
use crate::constants::{
    DEFAULT_DATA_DIR, DEFAULT_PLUGIN_TYPE, ENV_AUTHOR, ENV_CREATE_DIRS, ENV_DATA, ENV_ORG,
    ENV_OVERWRITE, ENV_RULES_FILE,
};
use clap::{error::ErrorKind, ArgAction, CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments structure for plugwiz.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "plugwiz: create plugins from blueprints with magic tokens and rewrite rules",
    long_about = None
)]
pub struct Args {
    /// Plugin id, registered ids are numbers above 1000000
    #[arg(value_name = "ID")]
    pub id: Option<String>,

    /// Plugin name as entered, e.g. "Super Awesome Plugin"
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// Directory receiving the plugin directory, may be repeated
    #[arg(short, long = "destination", value_name = "DIR", default_value = ".")]
    pub destinations: Vec<PathBuf>,

    /// Root of the blueprint collection
    #[arg(short, long, value_name = "DIR", env = ENV_DATA)]
    pub source_data: Option<PathBuf>,

    /// Blueprint to use [default: cmdplugin]
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub plugin_type: Option<String>,

    /// Rules file overriding the one found in the blueprint collection
    #[arg(short, long, value_name = "FILE", env = ENV_RULES_FILE)]
    pub rules_file: Option<PathBuf>,

    /// Author name, defaults to the current user
    #[arg(short, long, env = ENV_AUTHOR)]
    pub author: Option<String>,

    /// Organization name
    #[arg(short, long, env = ENV_ORG)]
    pub org: Option<String>,

    /// Overwrite an existing plugin directory and conflicting renames
    #[arg(short, long, env = ENV_OVERWRITE)]
    pub force: bool,

    /// Create missing destination directories
    #[arg(short, long, env = ENV_CREATE_DIRS)]
    pub create_dirs: bool,

    /// Print every datum and form available to magic tokens and exit
    #[arg(short, long)]
    pub list_tokens: bool,

    /// Regex of file names whose contents are left untouched
    #[arg(short = 'x', long, value_name = "REGEX")]
    pub exclude: Option<String>,

    /// Increase logging output, may be repeated (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Root of the blueprint collection.
    pub fn collection(&self) -> PathBuf {
        self.source_data.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    /// Resolves the run configuration.
    ///
    /// Flags and their environment variables win over `settings`, which win
    /// over built-in defaults.
    pub fn into_config(self, settings: &Settings) -> WizardConfig {
        let collection = self.collection();
        let plugin_type = self
            .plugin_type
            .or_else(|| settings.plugin_type.clone())
            .unwrap_or_else(|| DEFAULT_PLUGIN_TYPE.to_string());

        let mut config = WizardConfig::new(
            self.id.unwrap_or_default(),
            self.name.unwrap_or_default(),
            collection,
        );
        config.plugin_type = plugin_type;
        config.destinations = self.destinations;
        config.author = self.author;
        config.org = self.org;
        config.rules_file = self.rules_file;
        config.overwrite = self.force;
        config.create_dirs = self.create_dirs;
        config.content_exclude = self.exclude;

        let mut config = config.with_settings(settings);
        if config.author.is_none() {
            config.author = platform_user();
        }
        config
    }
}

/// Parses command line arguments and returns the Args structure.
///
/// # Returns
/// * `Args` - Parsed command line arguments
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}

/// Prints the short help text to stdout.
pub fn print_help() {
    let _ = Args::command()
        .help_template(
            r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
        )
        .print_help();
}
