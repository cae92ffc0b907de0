//! Magic token detection and substitution.
//!
//! A magic token is `START Datum END` or `START DatumAsForm END`, e.g.
//! `%!PluginNameAsIdentifier!%`. Datum and form names are case sensitive.

use regex::bytes::{Captures, Regex};

use super::TokenTable;
use crate::constants::{
    FORM_SEPARATOR, LEGACY_TOKEN_END, LEGACY_TOKEN_START, TOKEN_END, TOKEN_START,
};
use crate::error::{Error, Result};

/// Start and end markers of a magic token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    pub start: String,
    pub end: String,
}

impl Delimiters {
    pub fn new<S: Into<String>, E: Into<String>>(start: S, end: E) -> Self {
        Self { start: start.into(), end: end.into() }
    }

    /// The `<Datum>` markers of early blueprint collections.
    pub fn legacy() -> Self {
        Self::new(LEGACY_TOKEN_START, LEGACY_TOKEN_END)
    }

    /// Wraps a token body in the markers.
    pub fn wrap(&self, body: &str) -> String {
        format!("{}{}{}", self.start, body, self.end)
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::new(TOKEN_START, TOKEN_END)
    }
}

/// Result of substituting the magic tokens of one piece of text.
#[derive(Debug, Default)]
pub struct Substitution {
    pub text: Vec<u8>,
    /// Number of tokens that were replaced.
    pub replaced: usize,
    /// Tokens that could not be resolved. They are left verbatim in `text`.
    pub unresolved: Vec<Error>,
}

/// Compiled magic token matcher for one pair of delimiters.
#[derive(Debug, Clone)]
pub struct MagicTokens {
    delimiters: Delimiters,
    regex: Regex,
}

impl MagicTokens {
    /// # Errors
    /// * `Error::ConfigurationError` if a marker is empty
    pub fn new(delimiters: Delimiters) -> Result<Self> {
        if delimiters.start.is_empty() || delimiters.end.is_empty() {
            return Err(Error::ConfigurationError(
                "magic token markers must not be empty".to_string(),
            ));
        }
        let pattern = format!(
            r"{}(?P<token>\w+?){}",
            regex::escape(&delimiters.start),
            regex::escape(&delimiters.end)
        );
        let regex = Regex::new(&pattern)?;
        Ok(Self { delimiters, regex })
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    /// Splits a token body into datum and form at the first `As`.
    ///
    /// ```
    /// use plugwiz::tokens::MagicTokens;
    ///
    /// assert_eq!(MagicTokens::parse("PluginNameAsIdentifier"), ("PluginName", "Identifier"));
    /// assert_eq!(MagicTokens::parse("Date"), ("Date", ""));
    /// ```
    pub fn parse(body: &str) -> (&str, &str) {
        body.split_once(FORM_SEPARATOR).unwrap_or((body, ""))
    }

    pub fn contains_token(&self, text: &[u8]) -> bool {
        self.regex.is_match(text)
    }

    /// Replaces every resolvable token in `text` using `table`.
    pub fn replace(&self, text: &[u8], table: &TokenTable) -> Substitution {
        let mut replaced = 0;
        let mut unresolved = Vec::new();

        let output = self.regex.replace_all(text, |caps: &Captures<'_>| {
            let whole = caps[0].to_vec();
            let Ok(body) = std::str::from_utf8(&caps["token"]) else {
                return whole;
            };
            let (datum, form) = Self::parse(body);
            match table.get(datum, form) {
                Ok(value) => {
                    replaced += 1;
                    value.as_bytes().to_vec()
                }
                Err(e) => {
                    unresolved.push(e);
                    whole
                }
            }
        });

        Substitution { text: output.into_owned(), replaced, unresolved }
    }
}
