//! Locale-scoped message catalogs for `@` lookups.
//!
//! A bundle is a `.properties` file resolved against the template's base
//! directory. Candidates are probed most specific first — for base `messages`
//! under `de-DE`: `messages_de_DE.properties`, `messages_de.properties`,
//! `messages.properties` — and the first file found wins. A missing bundle or
//! a missing key is a hard resource error, unlike dictionary misses which are
//! silent.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::RenderError;
use crate::locale::Locale;

/// A loaded message catalog.
#[derive(Debug, Clone)]
pub struct ResourceBundle {
    base: String,
    entries: HashMap<String, String>,
}

impl ResourceBundle {
    /// Loads the best matching catalog for `base` under `locale` from `dir`.
    pub fn load(dir: &Path, base: &str, locale: &Locale) -> Result<Self, RenderError> {
        for candidate in locale.bundle_candidates(base) {
            let path = dir.join(format!("{candidate}.properties"));
            if path.is_file() {
                log::debug!("loading resource bundle {}", path.display());
                let text = fs::read_to_string(&path)?;
                return Ok(Self {
                    base: base.to_string(),
                    entries: parse_properties(&text),
                });
            }
        }
        Err(RenderError::BundleNotFound {
            base: base.to_string(),
            locale: locale.to_string(),
        })
    }

    /// The base name this bundle was loaded for.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Looks up a message; a missing key is a resource error.
    pub fn get(&self, key: &str) -> Result<&str, RenderError> {
        self.entries
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| RenderError::MissingResource {
                key: key.to_string(),
                base: self.base.clone(),
            })
    }
}

/// Parses `key=value` lines. `#` and `!` start comments; keys are trimmed;
/// `\n`, `\r`, `\t`, and `\\` escapes in values are decoded.
fn parse_properties(text: &str) -> HashMap<String, String> {
    let mut entries = HashMap::new();
    for line in text.lines() {
        let line = line.trim_start();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let Some(split) = line.find(['=', ':']) else {
            continue;
        };
        let key = line[..split].trim();
        if key.is_empty() {
            continue;
        }
        let value = unescape(line[split + 1..].trim_start());
        entries.insert(key.to_string(), value);
    }
    entries
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_properties() {
        let entries = parse_properties(
            "# comment\n\
             ! also a comment\n\
             greeting=hello\n\
             spaced = padded value\n\
             colon: works too\n\
             escaped=line\\nbreak\n\
             \n\
             noseparator\n",
        );
        assert_eq!(entries.get("greeting").map(String::as_str), Some("hello"));
        assert_eq!(entries.get("spaced").map(String::as_str), Some("padded value"));
        assert_eq!(entries.get("colon").map(String::as_str), Some("works too"));
        assert_eq!(entries.get("escaped").map(String::as_str), Some("line\nbreak"));
        assert_eq!(entries.len(), 4);
    }

    #[test]
    fn test_load_locale_chain() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("messages.properties"), "greeting=default").unwrap();
        fs::write(dir.path().join("messages_de.properties"), "greeting=hallo").unwrap();

        let de = ResourceBundle::load(dir.path(), "messages", &Locale::parse("de-DE")).unwrap();
        assert_eq!(de.get("greeting").unwrap(), "hallo");

        let fr = ResourceBundle::load(dir.path(), "messages", &Locale::parse("fr-FR")).unwrap();
        assert_eq!(fr.get("greeting").unwrap(), "default");
    }

    #[test]
    fn test_missing_bundle() {
        let dir = TempDir::new().unwrap();
        let result = ResourceBundle::load(dir.path(), "absent", &Locale::default());
        assert!(matches!(result, Err(RenderError::BundleNotFound { .. })));
    }

    #[test]
    fn test_missing_key() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("messages.properties"), "greeting=hello").unwrap();

        let bundle = ResourceBundle::load(dir.path(), "messages", &Locale::default()).unwrap();
        let result = bundle.get("farewell");
        assert!(matches!(result, Err(RenderError::MissingResource { .. })));
    }
}
