use chrono::{DateTime, FixedOffset, Local};
use cruet::Inflector;
use log::debug;

use super::{Datum, TokenTable, AUTHOR_NAME, DATE, DATE_TIME, ID, ORG_NAME, PLUGIN_NAME, TIME};
use crate::constants::{ABBREVIATION_MAX_CHARS, PLUGIN_ID_TESTING, PLUGIN_NAME_TESTING};
use crate::error::{Error, Result};
use crate::text::{abbreviate, sanitize, to_camel_case, SanitizeOptions};

/// Builds the [`TokenTable`] for one run.
///
/// All clock based data are derived from a single instant so that every
/// token in a run agrees on the date and time.
#[derive(Debug, Clone)]
pub struct TokenTableBuilder {
    plugin_id: String,
    plugin_name: String,
    author: Option<String>,
    org: Option<String>,
    now: Option<DateTime<FixedOffset>>,
    testing_fallbacks: bool,
}

impl TokenTableBuilder {
    pub fn new<I: Into<String>, N: Into<String>>(plugin_id: I, plugin_name: N) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            plugin_name: plugin_name.into(),
            author: None,
            org: None,
            now: None,
            testing_fallbacks: false,
        }
    }

    pub fn author<S: Into<String>>(mut self, author: Option<S>) -> Self {
        self.author = author.map(Into::into);
        self
    }

    pub fn org<S: Into<String>>(mut self, org: Option<S>) -> Self {
        self.org = org.map(Into::into);
        self
    }

    /// Fixes the instant used for `Date`, `Time` and `DateTime`.
    pub fn clock(mut self, now: DateTime<FixedOffset>) -> Self {
        self.now = Some(now);
        self
    }

    /// Substitute placeholder values for a missing id or name instead of failing.
    pub fn testing_fallbacks(mut self, enabled: bool) -> Self {
        self.testing_fallbacks = enabled;
        self
    }

    /// # Errors
    /// * `Error::ConfigurationError` if the plugin id or name is empty and
    ///   testing fallbacks are disabled
    pub fn build(self) -> Result<TokenTable> {
        let plugin_id = required(self.plugin_id, "plugin id", self.testing_fallbacks, || {
            PLUGIN_ID_TESTING.to_string()
        })?;
        let plugin_name = required(self.plugin_name, "plugin name", self.testing_fallbacks, || {
            PLUGIN_NAME_TESTING.to_string()
        })?;
        let now = self.now.unwrap_or_else(|| Local::now().fixed_offset());

        let mut table = TokenTable::new();
        table.insert(Datum::new(ID, plugin_id.as_str()).with_form("Entered", plugin_id.as_str()));
        table.insert(plugin_name_datum(&plugin_name));

        for (name, value) in [(AUTHOR_NAME, self.author), (ORG_NAME, self.org)] {
            match value.filter(|v| !v.trim().is_empty()) {
                Some(value) => table.insert(person_datum(name, &value)),
                None => debug!("No value for '{name}', tokens referencing it stay unresolved"),
            }
        }

        table.insert(date_datum(&now));
        table.insert(time_datum(&now));
        table.insert(date_time_datum(&now));

        Ok(table)
    }
}

fn required<F: FnOnce() -> String>(
    value: String,
    what: &str,
    testing_fallbacks: bool,
    fallback: F,
) -> Result<String> {
    if !value.trim().is_empty() {
        return Ok(value);
    }
    if testing_fallbacks {
        let value = fallback();
        debug!("Missing {what}, using testing fallback '{value}'");
        return Ok(value);
    }
    Err(Error::ConfigurationError(format!("missing {what}")))
}

fn cleaned(value: &str) -> String {
    let options = SanitizeOptions::default().safe_char("").allowed_chars(" ").transliterate_all();
    sanitize(value, &options)
}

/// Separators are dropped entirely from compact date and time forms.
fn compact(value: &str) -> String {
    sanitize(value, &SanitizeOptions::default().safe_char("").allowed_chars(""))
}

fn plugin_name_datum(plugin_name: &str) -> Datum {
    let cleaned = cleaned(plugin_name);
    let identifier = to_camel_case(&cleaned, true);
    Datum::new(PLUGIN_NAME, plugin_name)
        .with_form("Entered", plugin_name)
        .with_form("Cleaned", cleaned.as_str())
        .with_form("Identifier", identifier.as_str())
        .with_form("UppercaseIdentifier", identifier.to_uppercase())
        .with_form("Abbreviation", abbreviate(&cleaned, ABBREVIATION_MAX_CHARS))
        .with_form("SnakeCase", identifier.to_snake_case())
        .with_form("KebabCase", identifier.to_kebab_case())
}

fn person_datum(name: &str, value: &str) -> Datum {
    let cleaned = cleaned(value);
    Datum::new(name, value)
        .with_form("Entered", value)
        .with_form("Cleaned", cleaned.as_str())
        .with_form("Identifier", to_camel_case(&cleaned, true))
        .with_form("Abbreviation", abbreviate(&cleaned, ABBREVIATION_MAX_CHARS))
}

fn date_datum(now: &DateTime<FixedOffset>) -> Datum {
    let iso_separated = now.format("%Y-%m-%d").to_string();
    let locale_separated = now.format("%x").to_string();
    Datum::new(DATE, iso_separated.as_str())
        .with_form("IsoSeparated", iso_separated.as_str())
        .with_form("Iso", now.format("%Y%m%d").to_string())
        .with_form("EnglishDashSeparated", now.format("%m-%d-%y").to_string())
        .with_form("EnglishSeparated", now.format("%m/%d/%y").to_string())
        .with_form("English", now.format("%m%d%y").to_string())
        .with_form("LocaleSeparated", locale_separated.as_str())
        .with_form("Locale", compact(&locale_separated))
        .with_form("NameOfDay", now.format("%A").to_string())
        .with_form("ShortNameOfDay", now.format("%a").to_string())
}

fn time_datum(now: &DateTime<FixedOffset>) -> Datum {
    let locale_separated = now.format("%X").to_string();
    let english_separated = now.format("%I:%M:%S %p").to_string();
    let locale = compact(&locale_separated);
    Datum::new(TIME, locale.as_str())
        .with_form("LocaleSeparated", locale_separated.as_str())
        .with_form("Locale", locale.as_str())
        .with_form("EnglishSeparated", english_separated.as_str())
        .with_form("English", compact(&english_separated))
        .with_form("SecondsSinceEpoch", now.timestamp().to_string())
}

fn date_time_datum(now: &DateTime<FixedOffset>) -> Datum {
    let iso = now.format("%Y-%m-%dT%H:%M:%S").to_string();
    Datum::new(DATE_TIME, iso.as_str())
        .with_form("Iso", iso.as_str())
        .with_form("Locale", now.format("%x %X").to_string())
}
