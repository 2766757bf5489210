//! # Stencil — a template encoder
//!
//! `stencil` renders tree-shaped values through marker templates to byte
//! streams. A template is plain text with embedded `{{…}}` markers:
//! variables with modifier chains, sections that repeat per sequence
//! element, includes, and comments. The encoder binds a template file to an
//! output MIME type and charset; every write streams the template through
//! one renderer pass.
//!
//! ## Quick Start
//!
//! ```rust
//! use stencil::{TemplateEncoder, Value};
//! use serde_json::json;
//!
//! let dir = tempfile::tempdir().unwrap();
//! std::fs::write(
//!     dir.path().join("report.txt"),
//!     "{{title}}: {{#items[, ]}}{{name}}{{/}}",
//! )
//! .unwrap();
//!
//! let encoder = TemplateEncoder::new(dir.path().join("report.txt"), "text/plain");
//! let value = Value::from(json!({
//!     "title": "Inventory",
//!     "items": [{"name": "bolt"}, {"name": "washer"}],
//! }));
//!
//! let mut out = Vec::new();
//! encoder.write_value(&value, &mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "Inventory: bolt, washer");
//! ```
//!
//! ## Marker reference
//!
//! | Marker | Meaning |
//! |---|---|
//! | `{{key}}` | variable: dotted path, `$key` (context), `@key` (bundle), or `.` |
//! | `{{key:^html:format=%.2f}}` | modifier chain, applied left to right |
//! | `{{#name}}…{{/}}` | section over the sequence at `name` |
//! | `{{#name[, ]}}…{{/}}` | section with a separator between elements |
//! | `{{>partial.txt}}` | include, relative to the template |
//! | `{{!…}}` | comment |
//!
//! Custom modifiers are registered process-wide with [`register_modifier`];
//! the rendering internals live in [`stencil_render`] and are re-exported
//! here.

pub use stencil_render::{
    modifiers, register_modifier, CharSink, Locale, Modifier, ModifierRegistry, PagedSource,
    RenderError, Renderer, ResourceBundle, Value,
};

mod encoder;

pub use encoder::TemplateEncoder;
