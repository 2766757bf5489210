//! # Stencil Render — streaming marker-template rendering
//!
//! `stencil-render` is the rendering core behind the `stencil` template
//! encoder. It turns a tree-shaped [`Value`] plus a marker template into a
//! character stream, in a single synchronous pass.
//!
//! ## Core Concepts
//!
//! - [`Value`]: the tagged value tree templates render (scalars, date/time
//!   variants, sequences, mappings)
//! - [`PagedSource`]: a character source retaining everything it has read,
//!   with a LIFO mark/reset stack — what lets sections replay their body
//! - [`Renderer`]: the recursive render pass (sections, includes, comments,
//!   variables with modifier chains)
//! - [`register_modifier`] / [`ModifierRegistry`]: named value
//!   transformations applied before emission
//! - [`ResourceBundle`]: locale-scoped message catalogs for `@` lookups
//! - [`Locale`]: language tag driving bundle selection and numeric symbols
//!
//! ## Template syntax
//!
//! Markers open with `{{` and close with `}}`; the first body character
//! selects the kind:
//!
//! ```text
//! {{name}}              variable
//! {{name:^html}}        variable with a modifier chain
//! {{#items[, ]}} … {{/}} section with separator
//! {{>partial.txt}}      include
//! {{!note to self}}     comment
//! ```
//!
//! A lone `{` followed by anything other than `{` is literal text.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::HashMap;
//! use stencil_render::{Locale, PagedSource, Renderer, Value};
//! use serde_json::json;
//!
//! let context = HashMap::new();
//! let mut renderer = Renderer::new(&context, Locale::default());
//! let mut source = PagedSource::from_str("{{#items[, ]}}{{.}}{{/}}");
//! let mut out = String::new();
//!
//! let root = Value::from(json!({"items": ["a", "b", "c"]}));
//! renderer.render(&root, &mut out, &mut source).unwrap();
//! assert_eq!(out, "a, b, c");
//! ```
//!
//! For file-based templates, byte output, and charsets, use the
//! `TemplateEncoder` facade in the `stencil` crate.

pub use encoding_rs;

pub mod bundle;
pub mod error;
pub mod locale;
pub mod modifier;
pub mod render;
pub mod sink;
pub mod source;
pub mod value;

mod format;

pub use bundle::ResourceBundle;
pub use error::RenderError;
pub use locale::Locale;
pub use modifier::{modifiers, register_modifier, Modifier, ModifierRegistry};
pub use render::Renderer;
pub use sink::{CharSink, EncodingSink, NullSink};
pub use source::{CharRead, DecodingReader, EmptyRead, PagedSource};
pub use value::Value;
