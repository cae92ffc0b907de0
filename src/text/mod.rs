//! Pure text transformations used to derive datum forms.
//! Covers Unicode normalization, camel casing, abbreviation and
//! sanitization of names for use as identifiers and file names.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

pub mod tables;

static CAMEL_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[_ ]+").expect("Invalid regex"));

static CAMEL_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Lu}+\p{Ll}*").expect("Invalid regex"));

static ABBREVIATION_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\p{Lu})\p{Lu}*\p{Ll}*").expect("Invalid regex"));

/// How decoding failures are handled by [`sanitize_bytes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Invalid sequences become U+FFFD and are later replaced by the safe char.
    #[default]
    Replace,
    /// Invalid sequences are reported as [`Error::EncodingError`].
    Strict,
}

/// Options for [`sanitize`].
///
/// `allowed_chars` is a literal set of characters, not a regex fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizeOptions {
    pub safe_char: String,
    pub replace_umlauts: bool,
    pub replace_diacritics: bool,
    pub replace_greek: bool,
    pub allowed_chars: String,
    pub on_error: ErrorPolicy,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            safe_char: "_".to_string(),
            replace_umlauts: false,
            replace_diacritics: false,
            replace_greek: false,
            allowed_chars: "_-()".to_string(),
            on_error: ErrorPolicy::Replace,
        }
    }
}

impl SanitizeOptions {
    pub fn safe_char<S: Into<String>>(mut self, safe_char: S) -> Self {
        self.safe_char = safe_char.into();
        self
    }

    pub fn allowed_chars<S: Into<String>>(mut self, allowed_chars: S) -> Self {
        self.allowed_chars = allowed_chars.into();
        self
    }

    pub fn umlauts(mut self, enabled: bool) -> Self {
        self.replace_umlauts = enabled;
        self
    }

    pub fn diacritics(mut self, enabled: bool) -> Self {
        self.replace_diacritics = enabled;
        self
    }

    pub fn greek(mut self, enabled: bool) -> Self {
        self.replace_greek = enabled;
        self
    }

    /// Enables umlaut, diacritic and Greek letter replacement at once.
    pub fn transliterate_all(self) -> Self {
        self.umlauts(true).diacritics(true).greek(true)
    }

    pub fn on_error(mut self, policy: ErrorPolicy) -> Self {
        self.on_error = policy;
        self
    }

    fn is_allowed(&self, c: char) -> bool {
        c.is_ascii_alphanumeric() || self.allowed_chars.contains(c) || self.safe_char.contains(c)
    }
}

/// Precomposes character sequences (NFKC when `compatibility`, else NFC).
///
/// `e` followed by U+0301 COMBINING ACUTE ACCENT becomes `é`.
pub fn precompose(word: &str, compatibility: bool) -> String {
    if compatibility {
        word.nfkc().collect()
    } else {
        word.nfc().collect()
    }
}

/// Decomposes character sequences (NFKD when `compatibility`, else NFD).
pub fn decompose(word: &str, compatibility: bool) -> String {
    if compatibility {
        word.nfkd().collect()
    } else {
        word.nfd().collect()
    }
}

fn capitalize_first(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Converts `word` to CamelCase.
///
/// Runs of underscores and spaces separate segments. Every segment after a
/// separator gets its first letter upper-cased; the rest of each segment is
/// kept as is. With `capitalize` the first character of the result is
/// upper-cased too.
///
/// ```
/// use plugwiz::text::to_camel_case;
///
/// assert_eq!(to_camel_case("hot flaming cats", true), "HotFlamingCats");
/// assert_eq!(to_camel_case("höt_fläming_cäts", false), "hötFlämingCäts");
/// ```
pub fn to_camel_case(word: &str, capitalize: bool) -> String {
    let word = word.trim();
    if word.is_empty() {
        return String::new();
    }

    let mut result = String::with_capacity(word.len());
    for (index, segment) in CAMEL_SEPARATORS.split(word).enumerate() {
        if index == 0 {
            result.push_str(segment);
        } else {
            result.push_str(&capitalize_first(segment));
        }
    }

    if capitalize {
        capitalize_first(&result)
    } else {
        result
    }
}

/// Splits a CamelCase string into its words.
///
/// Only runs of uppercase letters followed by lowercase letters are kept, so
/// a leading lowercase run or punctuation is dropped.
pub fn split_camel_case(word: &str) -> Vec<String> {
    CAMEL_WORDS.find_iter(word).map(|m| m.as_str().to_string()).collect()
}

/// Reduces `word` to the leading capitals of its CamelCase runs.
///
/// `AndisSSuper_PluginSTOP` gives `ASPS`. If `max_chars > 0` the result is
/// truncated to that many characters.
pub fn abbreviate(word: &str, max_chars: usize) -> String {
    let letters = ABBREVIATION_RUNS
        .captures_iter(word.trim())
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()));

    if max_chars > 0 {
        letters.take(max_chars).collect()
    } else {
        letters.collect()
    }
}

fn transliterate(word: &str, table: fn(char) -> Option<&'static str>) -> String {
    let mut result = String::with_capacity(word.len());
    for c in word.chars() {
        match table(c) {
            Some(replacement) => result.push_str(replacement),
            None => result.push(c),
        }
    }
    result
}

fn strip_diacritics(word: &str) -> String {
    decompose(word, true)
        .chars()
        .filter(|c| !('\u{0300}'..='\u{036F}').contains(c))
        .collect()
}

/// Sanitizes `word` so it can be used as an identifier or a file name.
///
/// Higher order characters are transliterated first (if enabled) so that
/// `Über` turns into `Ueber` or `Uber` rather than `_ber`. Whatever is left
/// outside of `[A-Za-z0-9]`, the allowed chars and the safe char is replaced
/// by the safe char.
///
/// ```
/// use plugwiz::text::{sanitize, SanitizeOptions};
///
/// let options = SanitizeOptions::default().safe_char("").umlauts(true).diacritics(true);
/// assert_eq!(sanitize("Äsbëst-Shop", &options), "Aesbest-Shop");
/// ```
pub fn sanitize(word: &str, options: &SanitizeOptions) -> String {
    if word.is_empty() {
        return options.safe_char.clone();
    }

    let mut word = if options.is_allowed(' ') {
        word.to_string()
    } else {
        word.replace(' ', &options.safe_char)
    };

    if options.replace_umlauts {
        word = transliterate(&word, tables::umlaut);
    }
    if options.replace_diacritics {
        word = strip_diacritics(&word);
    }
    if options.replace_greek {
        word = transliterate(&word, tables::greek);
    }

    let mut result = String::with_capacity(word.len());
    for c in word.chars() {
        if options.is_allowed(c) {
            result.push(c);
        } else {
            result.push_str(&options.safe_char);
        }
    }
    result
}

/// Decodes `bytes` as UTF-8 according to the error policy, then sanitizes.
pub fn sanitize_bytes(bytes: &[u8], options: &SanitizeOptions) -> Result<String> {
    let word = match options.on_error {
        ErrorPolicy::Strict => std::str::from_utf8(bytes)
            .map_err(|e| Error::EncodingError(e.to_string()))?
            .to_string(),
        ErrorPolicy::Replace => String::from_utf8_lossy(bytes).into_owned(),
    };
    Ok(sanitize(&word, options))
}
