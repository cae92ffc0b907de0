//! Search/replace rules loaded from a rules file.
//!
//! Rules are applied in the order they appear in the file, and every rule
//! sees the output of the rules before it. The order of a rules file is
//! therefore part of its meaning: `'A' = 'B'` followed by `'B' = 'C'` turns
//! `A` into `C`.

use chrono::{DateTime, FixedOffset};
use log::{debug, warn};
use regex::bytes::{NoExpand, Regex};
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::error::{Error, Result};

mod builtins;
mod parser;

pub use builtins::Environment;

static PYTHON_BACKREFERENCE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"\\(?:g<(?P<named>\w+)>|(?P<number>\d{1,2}))").expect("Invalid regex")
});

/// Where the active rules file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulesOrigin {
    /// Path given explicitly by the caller.
    Explicit,
    /// Root of the selected blueprint.
    TypeLocal,
    /// Root of the blueprint collection.
    RepositoryGlobal,
}

/// A located rules file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulesSource {
    pub path: PathBuf,
    pub origin: RulesOrigin,
}

/// Finds the rules file to use, by decreasing precedence:
///
/// 1. `explicit`, if it names an existing file
/// 2. `<blueprint_root>/<file_name>`
/// 3. `<collection_root>/<file_name>`
///
/// Returns `None` if no candidate exists. Rules are optional.
pub fn locate_rules_file(
    explicit: Option<&Path>,
    blueprint_root: &Path,
    collection_root: &Path,
    file_name: &str,
) -> Option<RulesSource> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Some(RulesSource { path: path.to_path_buf(), origin: RulesOrigin::Explicit });
        }
        warn!("Rules file '{}' does not exist, searching the blueprint collection", path.display());
    }

    let candidates = [
        (blueprint_root.join(file_name), RulesOrigin::TypeLocal),
        (collection_root.join(file_name), RulesOrigin::RepositoryGlobal),
    ];
    for (path, origin) in candidates {
        if path.is_file() {
            return Some(RulesSource { path, origin });
        }
    }

    debug!(
        "No rules file found (tried: {}, {})",
        blueprint_root.join(file_name).display(),
        collection_root.join(file_name).display()
    );
    None
}

/// A single compiled search/replace pair.
#[derive(Debug, Clone)]
pub struct Rule {
    search: String,
    pattern: Regex,
    replacement: String,
    literal: bool,
}

impl Rule {
    /// A rule matching `search` verbatim and inserting `replacement` verbatim.
    pub fn literal(search: &str, replacement: &str) -> Result<Self> {
        let pattern = Regex::new(&regex::escape(search))?;
        Ok(Self {
            search: search.to_string(),
            pattern,
            replacement: replacement.to_string(),
            literal: true,
        })
    }

    /// A rule whose `search` is a regular expression.
    ///
    /// `replacement` may reference groups as `$1`, `${name}`, `\1` or `\g<name>`.
    pub fn regex(search: &str, replacement: &str) -> Result<Self> {
        let pattern = Regex::new(search)?;
        let replacement = PYTHON_BACKREFERENCE
            .replace_all(replacement, |caps: &regex::Captures<'_>| {
                let group = caps.name("named").or_else(|| caps.name("number"));
                format!("${{{}}}", group.map_or("", |m| m.as_str()))
            })
            .into_owned();
        Ok(Self { search: search.to_string(), pattern, replacement, literal: false })
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn is_literal(&self) -> bool {
        self.literal
    }

    /// Replaces all matches in `text`. Returns `None` if nothing matched.
    pub fn apply(&self, text: &[u8]) -> Option<Vec<u8>> {
        let replaced = if self.literal {
            self.pattern.replace_all(text, NoExpand(self.replacement.as_bytes()))
        } else {
            self.pattern.replace_all(text, self.replacement.as_bytes())
        };
        match replaced {
            Cow::Owned(replaced) => Some(replaced),
            Cow::Borrowed(_) => None,
        }
    }
}

/// Ordered collection of rules from exactly one rules file.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    source: Option<RulesSource>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules, source: None }
    }

    /// Reads and parses a rules file.
    ///
    /// Lines that cannot be parsed or evaluated are returned as
    /// `Error::RuleLoadError` diagnostics and skipped.
    ///
    /// # Errors
    /// * `Error::IoError` if the file cannot be read
    pub fn load(source: RulesSource, now: DateTime<FixedOffset>) -> Result<(Self, Vec<Error>)> {
        let content = fs::read_to_string(&source.path)?;
        let (mut rules, issues) = Self::parse(&content, &source.path, now);
        debug!(
            "Loaded {} rule(s) from '{}' ({} line(s) skipped)",
            rules.len(),
            source.path.display(),
            issues.len()
        );
        rules.source = Some(source);
        Ok((rules, issues))
    }

    /// Parses rules file `content`. `path` is only used in diagnostics.
    pub fn parse(content: &str, path: &Path, now: DateTime<FixedOffset>) -> (Self, Vec<Error>) {
        let mut environment = Environment::new(now);
        let mut rules = Vec::new();
        let mut issues = Vec::new();

        for (index, line) in content.lines().enumerate() {
            let line_number = index + 1;
            let issue = |reason: String| Error::RuleLoadError {
                path: path.to_path_buf(),
                line: line_number,
                reason,
            };
            match parser::parse_line(line, &environment) {
                Ok(parser::Line::Rule { key, value, regex }) => {
                    let rule =
                        if regex { Rule::regex(&key, &value) } else { Rule::literal(&key, &value) };
                    match rule {
                        Ok(rule) => rules.push(rule),
                        Err(e) => issues.push(issue(e.to_string())),
                    }
                }
                Ok(parser::Line::Import(modules)) => {
                    for module in modules {
                        if let Err(reason) = environment.import(&module) {
                            issues.push(issue(reason));
                        }
                    }
                }
                Ok(parser::Line::Ignored) => {}
                Err(reason) => issues.push(issue(reason)),
            }
        }

        for issue in &issues {
            warn!("{issue}");
        }

        (Self::new(rules), issues)
    }

    pub fn source(&self) -> Option<&RulesSource> {
        self.source.as_ref()
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Applies every rule in order, feeding each rule the previous output.
    ///
    /// Returns the rewritten text and whether any rule matched.
    pub fn apply(&self, text: &[u8]) -> (Vec<u8>, bool) {
        let mut current = text.to_vec();
        let mut matched = false;
        for rule in &self.rules {
            if let Some(next) = rule.apply(&current) {
                current = next;
                matched = true;
            }
        }
        (current, matched)
    }

    /// [`RuleSet::apply`] for text that is known to be UTF-8.
    pub fn apply_str(&self, text: &str) -> (String, bool) {
        let (bytes, matched) = self.apply(text.as_bytes());
        match String::from_utf8(bytes) {
            Ok(text) => (text, matched),
            Err(e) => (String::from_utf8_lossy(e.as_bytes()).into_owned(), matched),
        }
    }
}
