//! The modifier registry.
//!
//! A modifier is a pure function `(value, optional argument, locale) → value`
//! applied to a resolved variable before emission. Markers chain them
//! left-to-right: `{{total:format=currency:^html}}`.
//!
//! The registry is process-wide and seeded with the built-ins (`format`,
//! `^url`, `^html`, `^xml`, `^json`, `^csv`). Callers add their own with
//! [`register_modifier`] before rendering; writes take the lock exclusively
//! while each render works from a cheap snapshot, so registration between
//! renders is safe.
//!
//! ```rust
//! use stencil_render::{register_modifier, Value};
//!
//! register_modifier("upper", |value, _argument, _locale| {
//!     Value::String(value.to_string().to_uppercase())
//! });
//! ```

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;

use crate::format;
use crate::locale::Locale;
use crate::value::Value;

/// A named value transformation.
pub type Modifier = Arc<dyn Fn(&Value, Option<&str>, &Locale) -> Value + Send + Sync>;

/// Mapping from modifier name to implementation.
#[derive(Clone, Default)]
pub struct ModifierRegistry {
    entries: HashMap<String, Modifier>,
}

impl ModifierRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry seeded with the built-in modifiers.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("format", format::format_modifier);
        registry.register("^url", url_escape);
        registry.register("^html", markup_escape);
        registry.register("^xml", markup_escape);
        registry.register("^json", json_escape);
        registry.register("^csv", csv_escape);
        registry
    }

    /// Registers a modifier, replacing any existing one with the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, modifier: F)
    where
        F: Fn(&Value, Option<&str>, &Locale) -> Value + Send + Sync + 'static,
    {
        self.entries.insert(name.into(), Arc::new(modifier));
    }

    /// Looks up a modifier by name.
    pub fn get(&self, name: &str) -> Option<&Modifier> {
        self.entries.get(name)
    }

    /// Returns the number of registered modifiers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no modifiers are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

static MODIFIERS: Lazy<RwLock<ModifierRegistry>> =
    Lazy::new(|| RwLock::new(ModifierRegistry::with_builtins()));

/// Registers a modifier in the process-wide registry.
pub fn register_modifier<F>(name: impl Into<String>, modifier: F)
where
    F: Fn(&Value, Option<&str>, &Locale) -> Value + Send + Sync + 'static,
{
    let mut registry = MODIFIERS.write().unwrap_or_else(PoisonError::into_inner);
    registry.register(name, modifier);
}

/// Returns a snapshot of the process-wide registry.
///
/// The snapshot shares the underlying implementations; a render works from
/// it so concurrent registration cannot change a render mid-flight.
pub fn modifiers() -> ModifierRegistry {
    MODIFIERS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

fn url_escape(value: &Value, _argument: Option<&str>, _locale: &Locale) -> Value {
    Value::String(urlencoding::encode(&value.to_string()).into_owned())
}

fn markup_escape(value: &Value, _argument: Option<&str>, _locale: &Locale) -> Value {
    let mut out = String::new();
    for c in value.to_string().chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    Value::String(out)
}

fn json_escape(value: &Value, _argument: Option<&str>, _locale: &Locale) -> Value {
    let mut out = String::new();
    for c in value.to_string().chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    Value::String(out)
}

fn csv_escape(value: &Value, _argument: Option<&str>, _locale: &Locale) -> Value {
    let mut out = String::new();
    for c in value.to_string().chars() {
        if c == '"' {
            out.push(c);
        }
        out.push(c);
    }
    Value::String(out)
}
