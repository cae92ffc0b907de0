//! The token table: every datum that can be referenced by a magic token,
//! together with the forms it can take.

use crate::constants::FORM_SEPARATOR;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::fmt::Write;

pub mod builder;
pub mod scanner;

pub use builder::TokenTableBuilder;
pub use scanner::{Delimiters, MagicTokens, Substitution};

pub const ID: &str = "ID";
pub const PLUGIN_NAME: &str = "PluginName";
pub const AUTHOR_NAME: &str = "AuthorName";
pub const ORG_NAME: &str = "OrgName";
pub const DATE: &str = "Date";
pub const TIME: &str = "Time";
pub const DATE_TIME: &str = "DateTime";

/// One named piece of metadata and its forms.
///
/// The empty form name is the default form and is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datum {
    name: String,
    forms: IndexMap<String, String>,
}

impl Datum {
    pub fn new<N: Into<String>, V: Into<String>>(name: N, default_value: V) -> Self {
        let mut forms = IndexMap::new();
        forms.insert(String::new(), default_value.into());
        Self { name: name.into(), forms }
    }

    pub fn with_form<F: Into<String>, V: Into<String>>(mut self, form: F, value: V) -> Self {
        self.forms.insert(form.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, form: &str) -> Option<&str> {
        self.forms.get(form).map(String::as_str)
    }

    /// Iterates over `(form, value)` pairs in insertion order, default form first.
    pub fn forms(&self) -> impl Iterator<Item = (&str, &str)> {
        self.forms.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Registry of data available to magic tokens during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenTable {
    data: IndexMap<String, Datum>,
}

impl TokenTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a datum, replacing any previous datum of the same name.
    pub fn insert(&mut self, datum: Datum) {
        self.data.insert(datum.name.clone(), datum);
    }

    /// Resolves `datum` in the requested `form`.
    ///
    /// # Errors
    /// * `Error::UnresolvedTokenError` if either the datum or the form is unknown.
    pub fn get(&self, datum: &str, form: &str) -> Result<&str> {
        self.data.get(datum).and_then(|d| d.get(form)).ok_or_else(|| {
            Error::UnresolvedTokenError { datum: datum.to_string(), form: form.to_string() }
        })
    }

    pub fn datum(&self, name: &str) -> Option<&Datum> {
        self.data.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.data.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Datum> {
        self.data.values()
    }

    /// Renders every datum with its qualified forms, one per line.
    ///
    /// ```text
    /// PluginName:
    ///    PluginNameAsEntered
    ///    PluginNameAsCleaned
    /// ```
    pub fn listing(&self, indent: usize) -> String {
        let spaces = " ".repeat(indent);
        let mut result = String::new();
        for datum in self.data.values() {
            let _ = writeln!(result, "{}:", datum.name);
            for (form, _) in datum.forms().filter(|(form, _)| !form.is_empty()) {
                let _ = writeln!(result, "{spaces}{}{FORM_SEPARATOR}{form}", datum.name);
            }
            result.push('\n');
        }
        result
    }
}
