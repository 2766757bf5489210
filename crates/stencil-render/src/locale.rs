//! Locale tags and the formatting conventions derived from them.
//!
//! A [`Locale`] is a language tag plus an optional region (`en`, `en-US`,
//! `de_DE`). It drives three things during a render: the resource-bundle
//! candidate chain for `@` lookups, the numeric symbols used by the `format`
//! modifier's `currency`/`percent` arguments, and whatever caller-registered
//! modifiers choose to do with it.
//!
//! The symbol table is a small built-in covering the common Western European
//! and East Asian conventions; unknown languages fall back to `en-US` symbols.

use std::fmt;

/// A language tag with an optional region, e.g. `en-US`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    language: String,
    region: Option<String>,
}

/// Numeric formatting conventions for a locale.
pub(crate) struct NumberSymbols {
    pub(crate) decimal: char,
    pub(crate) group: char,
    pub(crate) currency: &'static str,
    /// Currency symbol precedes the amount (`$1,234.50`) rather than
    /// trailing it (`1.234,50 €`).
    pub(crate) currency_prefix: bool,
    /// A space separates the amount from the percent sign.
    pub(crate) percent_space: bool,
}

impl Locale {
    /// Creates a locale from a language code and optional region code.
    ///
    /// Codes are case-normalized: language lowercased, region uppercased.
    pub fn new(language: &str, region: Option<&str>) -> Self {
        Self {
            language: language.to_ascii_lowercase(),
            region: region
                .filter(|r| !r.is_empty())
                .map(|r| r.to_ascii_uppercase()),
        }
    }

    /// Parses a tag in `en`, `en-US`, or `en_US` form.
    pub fn parse(tag: &str) -> Self {
        let mut parts = tag.splitn(2, ['-', '_']);
        let language = parts.next().unwrap_or_default();
        Self::new(language, parts.next())
    }

    /// The lowercased language code.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// The uppercased region code, if any.
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Resource-bundle file stems probed in order, most specific first:
    /// `base_lang_REGION`, `base_lang`, `base`.
    pub fn bundle_candidates(&self, base: &str) -> Vec<String> {
        let mut candidates = Vec::with_capacity(3);
        if let Some(region) = &self.region {
            candidates.push(format!("{base}_{}_{region}", self.language));
        }
        candidates.push(format!("{base}_{}", self.language));
        candidates.push(base.to_string());
        candidates
    }

    pub(crate) fn number_symbols(&self) -> NumberSymbols {
        let currency = self.currency_symbol();
        match self.language.as_str() {
            "de" | "es" | "it" | "nl" | "pt" => NumberSymbols {
                decimal: ',',
                group: '.',
                currency,
                currency_prefix: false,
                percent_space: true,
            },
            "fr" | "sv" => NumberSymbols {
                decimal: ',',
                group: ' ',
                currency,
                currency_prefix: false,
                percent_space: true,
            },
            _ => NumberSymbols {
                decimal: '.',
                group: ',',
                currency,
                currency_prefix: true,
                percent_space: false,
            },
        }
    }

    fn currency_symbol(&self) -> &'static str {
        match self.region.as_deref() {
            Some("US") | Some("CA") | Some("AU") | Some("NZ") => "$",
            Some("GB") => "£",
            Some("JP") | Some("CN") => "¥",
            Some("DE") | Some("FR") | Some("ES") | Some("IT") | Some("NL") | Some("PT")
            | Some("IE") | Some("AT") | Some("BE") | Some("FI") | Some("GR") => "€",
            Some("SE") => "kr",
            _ => match self.language.as_str() {
                "ja" | "zh" => "¥",
                "de" | "fr" | "es" | "it" | "nl" | "pt" | "fi" | "el" => "€",
                "sv" => "kr",
                _ => "$",
            },
        }
    }
}

impl Default for Locale {
    /// The process default used when a caller omits the locale.
    fn default() -> Self {
        Self::new("en", Some("US"))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}-{region}", self.language),
            None => f.write_str(&self.language),
        }
    }
}
