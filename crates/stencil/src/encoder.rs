//! The template encoder facade.
//!
//! [`TemplateEncoder`] binds a template file to an output MIME type and
//! charset, and renders value trees through it to byte streams. Each write
//! opens the template, decodes it in the encoder's charset, wraps it in a
//! paged source, and runs one renderer pass; includes and resource bundles
//! resolve against the template's parent directory.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use serde::Serialize;
use stencil_render::encoding_rs::{Encoding, UTF_8};
use stencil_render::{
    DecodingReader, EncodingSink, Locale, PagedSource, RenderError, Renderer, Value,
};

/// Renders value trees through a marker template to byte streams.
///
/// The encoder owns its context mapping and is cheap to keep around; the
/// per-render state (paged source, include caches, scope history) lives in
/// the renderer built for each write. Writes take `&self`, but the encoder
/// makes no internal synchronization promises — give each thread its own.
///
/// # Example
///
/// ```rust
/// use stencil::{TemplateEncoder, Value};
/// use serde_json::json;
///
/// let dir = tempfile::tempdir().unwrap();
/// std::fs::write(dir.path().join("greeting.txt"), "Hello, {{name}}!").unwrap();
///
/// let encoder = TemplateEncoder::new(dir.path().join("greeting.txt"), "text/plain");
/// let mut out = Vec::new();
/// encoder
///     .write_value(&Value::from(json!({"name": "World"})), &mut out)
///     .unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "Hello, World!");
/// ```
pub struct TemplateEncoder {
    path: PathBuf,
    mime_type: String,
    charset: &'static Encoding,
    base_name: Option<String>,
    context: HashMap<String, Value>,
}

impl TemplateEncoder {
    /// Creates an encoder for a template file, producing UTF-8 output.
    pub fn new(path: impl Into<PathBuf>, mime_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mime_type: mime_type.into(),
            charset: UTF_8,
            base_name: None,
            context: HashMap::new(),
        }
    }

    /// Creates an encoder with an explicit charset label (e.g. `ISO-8859-1`).
    ///
    /// The template is decoded and the output encoded in this charset.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnsupportedCharset`] for labels the encoding
    /// table does not know.
    pub fn with_charset(
        path: impl Into<PathBuf>,
        mime_type: impl Into<String>,
        charset: &str,
    ) -> Result<Self, RenderError> {
        let encoding = Encoding::for_label(charset.as_bytes())
            .ok_or_else(|| RenderError::UnsupportedCharset(charset.to_string()))?;
        let mut encoder = Self::new(path, mime_type);
        encoder.charset = encoding;
        Ok(encoder)
    }

    /// The MIME type of the content this template produces.
    ///
    /// The encoder does not attach it anywhere; callers set their own
    /// headers or metadata from it.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The output charset.
    pub fn charset(&self) -> &'static Encoding {
        self.charset
    }

    /// The resource-bundle base name used by `@` lookups, if set.
    pub fn base_name(&self) -> Option<&str> {
        self.base_name.as_deref()
    }

    /// Sets or clears the resource-bundle base name.
    ///
    /// Bundles are `.properties` files next to the template, probed most
    /// specific first for the render locale (`base_de_DE`, `base_de`, `base`).
    pub fn set_base_name(&mut self, base_name: Option<String>) {
        self.base_name = base_name;
    }

    /// The context mapping addressed by `$` markers.
    pub fn context(&self) -> &HashMap<String, Value> {
        &self.context
    }

    /// Mutable access to the context mapping.
    ///
    /// Mutating the context concurrently with a render is undefined; do it
    /// between writes.
    pub fn context_mut(&mut self) -> &mut HashMap<String, Value> {
        &mut self.context
    }

    /// Renders `value` through the template into `out` with the process
    /// default locale.
    pub fn write_value<W: Write>(&self, value: &Value, out: &mut W) -> Result<(), RenderError> {
        self.write_value_locale(value, out, &Locale::default())
    }

    /// Renders `value` through the template into `out` under `locale`.
    ///
    /// A null value emits nothing. Output is raw bytes in the encoder's
    /// charset — no byte-order mark, no envelope — and the sink is flushed
    /// before returning. On error, partial output may already be flushed.
    pub fn write_value_locale<W: Write>(
        &self,
        value: &Value,
        out: &mut W,
        locale: &Locale,
    ) -> Result<(), RenderError> {
        if value.is_null() {
            return Ok(());
        }

        log::debug!("rendering template {}", self.path.display());
        let file = File::open(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => RenderError::TemplateNotFound(self.path.clone()),
            _ => RenderError::Io(e),
        })?;
        let mut source = PagedSource::new(Box::new(DecodingReader::new(file, self.charset)));
        let mut sink = EncodingSink::new(out, self.charset);

        let mut renderer = Renderer::new(&self.context, locale.clone()).with_charset(self.charset);
        if let Some(dir) = self.path.parent() {
            renderer = renderer.with_base_dir(dir);
        }
        if let Some(base) = &self.base_name {
            renderer = renderer.with_bundle(base);
        }

        renderer.render(value, &mut sink, &mut source)?;
        sink.flush()?;
        Ok(())
    }

    /// Serializes `data` into a value tree and renders it.
    ///
    /// Convenience over [`write_value`](Self::write_value) for callers whose
    /// data is already serde-shaped.
    pub fn write<T: Serialize, W: Write>(&self, data: &T, out: &mut W) -> Result<(), RenderError> {
        let value = Value::from_serialize(data)?;
        self.write_value(&value, out)
    }
}
