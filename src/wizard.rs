//! Orchestration of a plugin generation run.
//!
//! A run resolves its token table and rule set once, validates every
//! destination, then for each destination copies the blueprint and rewrites
//! names and contents of the copy.

use crate::blueprint::{BlueprintCopier, TreeCopier};
use crate::config::WizardConfig;
use crate::constants::RULES_FILE;
use crate::error::{Error, Result};
use crate::ignore::Excludes;
use crate::rewriter::{RewriteReport, Rewriter};
use crate::rules::{locate_rules_file, RuleSet};
use crate::tokens::{MagicTokens, TokenTable, TokenTableBuilder, PLUGIN_NAME};
use chrono::{DateTime, FixedOffset, Local};
use log::{debug, info};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Overall result of a run that did not fail fatally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Clean,
    /// Finished with this many per-item diagnostics.
    Degraded(usize),
}

/// What happened at one destination.
#[derive(Debug)]
pub struct DestinationReport {
    /// The generated plugin directory.
    pub target: PathBuf,
    pub names: RewriteReport,
    pub contents: RewriteReport,
}

impl DestinationReport {
    pub fn issue_count(&self) -> usize {
        self.names.issues.len() + self.contents.issues.len()
    }
}

#[derive(Debug, Default)]
pub struct RunReport {
    /// Rules file lines that were skipped.
    pub rule_issues: usize,
    pub destinations: Vec<DestinationReport>,
}

impl RunReport {
    pub fn issue_count(&self) -> usize {
        self.rule_issues + self.destinations.iter().map(DestinationReport::issue_count).sum::<usize>()
    }

    pub fn status(&self) -> RunStatus {
        match self.issue_count() {
            0 => RunStatus::Clean,
            n => RunStatus::Degraded(n),
        }
    }
}

/// A configured run over one or more destinations.
#[derive(Debug)]
pub struct Wizard<C: BlueprintCopier = TreeCopier> {
    config: WizardConfig,
    copier: C,
    table: TokenTable,
    rules: RuleSet,
    rule_issues: Vec<Error>,
    tokens: MagicTokens,
    excludes: Excludes,
    content_exclude: Option<Regex>,
}

impl Wizard<TreeCopier> {
    /// # Errors
    /// * `Error::ConfigurationError` if the configuration is incomplete
    /// * `Error::GlobError` or `Error::RegexError` for invalid exclusions
    /// * `Error::IoError` if the rules file cannot be read
    pub fn new(config: WizardConfig) -> Result<Self> {
        Self::with_copier(config, TreeCopier, Local::now().fixed_offset())
    }
}

impl<C: BlueprintCopier> Wizard<C> {
    /// Like [`Wizard::new`] with a custom copier and a fixed clock.
    pub fn with_copier(config: WizardConfig, copier: C, now: DateTime<FixedOffset>) -> Result<Self> {
        config.validate()?;

        let table = TokenTableBuilder::new(config.plugin_id.as_str(), config.plugin_name.as_str())
            .author(config.author.as_deref())
            .org(config.org.as_deref())
            .clock(now)
            .testing_fallbacks(config.testing_fallbacks)
            .build()?;
        let tokens = MagicTokens::new(config.delimiters.clone())?;
        let excludes = Excludes::new(&config.excludes)?;
        let content_exclude = config.content_exclude.as_deref().map(Regex::new).transpose()?;

        let source = locate_rules_file(
            config.rules_file.as_deref(),
            &config.blueprint_dir(),
            &config.collection,
            RULES_FILE,
        );
        let (rules, rule_issues) = match source {
            Some(source) => {
                info!("Using rules from '{}' ({:?})", source.path.display(), source.origin);
                RuleSet::load(source, now)?
            }
            None => (RuleSet::default(), Vec::new()),
        };

        Ok(Self { config, copier, table, rules, rule_issues, tokens, excludes, content_exclude })
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    pub fn copier(&self) -> &C {
        &self.copier
    }

    pub fn token_table(&self) -> &TokenTable {
        &self.table
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Lines of the rules file that were skipped while loading.
    pub fn rule_issues(&self) -> &[Error] {
        &self.rule_issues
    }

    /// `<destination>/<PluginName>`.
    pub fn target_dir(&self, destination: &Path) -> Result<PathBuf> {
        Ok(destination.join(self.table.get(PLUGIN_NAME, "")?))
    }

    /// Ensures `destination` can receive a plugin without touching anything.
    fn preflight(&self, destination: &Path) -> Result<PathBuf> {
        if !destination.is_dir() {
            if destination.exists() {
                return Err(Error::ConfigurationError(format!(
                    "destination '{}' is not a directory",
                    destination.display()
                )));
            }
            if !self.config.create_dirs {
                return Err(Error::ConfigurationError(format!(
                    "destination '{}' does not exist, use -c/--create-dirs to create it",
                    destination.display()
                )));
            }
        }

        let target = self.target_dir(destination)?;
        if target.exists() && !self.config.overwrite {
            return Err(Error::ConfigurationError(format!(
                "'{}' already exists, use -f/--force to overwrite",
                target.display()
            )));
        }
        Ok(target)
    }

    /// Generates the plugin at every destination, in order.
    ///
    /// All destinations are validated before the first one is written.
    ///
    /// # Errors
    /// * `Error::ConfigurationError` if a destination is unusable
    /// * copy failures, which abort the run
    pub fn run(&self) -> Result<RunReport> {
        let targets = self
            .config
            .destinations
            .iter()
            .map(|destination| self.preflight(destination).map(|target| (destination, target)))
            .collect::<Result<Vec<_>>>()?;

        let mut report = RunReport { rule_issues: self.rule_issues.len(), ..Default::default() };
        for (destination, target) in targets {
            report.destinations.push(self.generate(destination, target)?);
        }
        Ok(report)
    }

    fn generate(&self, destination: &Path, target: PathBuf) -> Result<DestinationReport> {
        if !destination.exists() {
            debug!("Creating destination '{}'", destination.display());
            fs::create_dir_all(destination)?;
        }
        if target.exists() {
            debug!("Removing existing '{}'", target.display());
            fs::remove_dir_all(&target)?;
        }

        let blueprint = self.config.blueprint_dir();
        info!("Copying '{}' to '{}'", blueprint.display(), target.display());
        self.copier.copy_tree(&blueprint, &target, &self.excludes)?;

        let local_rules = target.join(RULES_FILE);
        if blueprint.join(RULES_FILE).is_file() && local_rules.is_file() {
            debug!("Removing copied rules file '{}'", local_rules.display());
            fs::remove_file(&local_rules)?;
        }

        let rewriter = Rewriter::new(&self.table, &self.rules, &self.tokens, &self.excludes);
        let names = rewriter.rewrite_names(&target, self.config.overwrite);
        let contents = rewriter.rewrite_contents(&target, self.content_exclude.as_ref());

        info!("Generated '{}'", target.display());
        Ok(DestinationReport { target, names, contents })
    }
}
