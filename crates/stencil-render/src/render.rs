//! The recursive marker renderer.
//!
//! A template is literal text with embedded `{{…}}` markers. The renderer
//! streams characters from a [`PagedSource`] to a [`CharSink`], rewriting
//! markers as it goes:
//!
//! | Marker | Meaning |
//! |---|---|
//! | `{{#name}}` / `{{#name[sep]}}` | section start, optional separator |
//! | `{{/…}}` | section end (positional; the body is ignored) |
//! | `{{>path}}` | include, resolved against the base directory |
//! | `{{!…}}` | comment |
//! | `{{key:mod:mod=arg}}` | variable with a modifier chain |
//!
//! Sections re-render their body once per element of the addressed sequence
//! by marking the source before each non-terminal element and resetting after
//! it. An empty (or null) section is consumed once against a null sink so the
//! stream advances past it without output. Include sub-sources are cached per
//! scope and replayed via reset on repeat occurrences.
//!
//! A [`Renderer`] is built fresh for each render; it holds no state that
//! survives the call.
//!
//! ```rust
//! use stencil_render::{Locale, PagedSource, Renderer, Value};
//! use std::collections::HashMap;
//!
//! let context = HashMap::new();
//! let mut renderer = Renderer::new(&context, Locale::default());
//! let mut source = PagedSource::from_str("Hello, {{name}}!");
//! let mut out = String::new();
//!
//! let root = Value::from_serialize(&serde_json::json!({"name": "World"})).unwrap();
//! renderer.render(&root, &mut out, &mut source).unwrap();
//! assert_eq!(out, "Hello, World!");
//! ```

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, UTF_8};

use crate::bundle::ResourceBundle;
use crate::error::RenderError;
use crate::locale::Locale;
use crate::modifier::{self, ModifierRegistry};
use crate::sink::{CharSink, NullSink};
use crate::source::{DecodingReader, PagedSource};
use crate::value::Value;

const RESOURCE_PREFIX: char = '@';
const CONTEXT_PREFIX: char = '$';

#[derive(Debug, PartialEq, Eq)]
enum MarkerKind {
    SectionStart,
    SectionEnd,
    Include,
    Comment,
    Variable,
}

/// The dictionary a marker body resolves against. A non-mapping root is
/// addressable only through the `.` key.
#[derive(Clone, Copy)]
enum Scope<'v> {
    Mapping(&'v HashMap<String, Value>),
    Scalar(&'v Value),
}

impl<'v> Scope<'v> {
    fn of(root: &'v Value) -> Self {
        match root {
            Value::Mapping(entries) => Scope::Mapping(entries),
            other => Scope::Scalar(other),
        }
    }

    fn get(&self, key: &str) -> Option<&'v Value> {
        match *self {
            Scope::Mapping(entries) => entries.get(key),
            Scope::Scalar(value) => (key == ".").then_some(value),
        }
    }
}

/// Per-scope cache of include sub-sources.
///
/// Inside an empty section the table is the `Empty` variant, whose lookup
/// yields a fresh exhausted source — includes consumed there contribute
/// nothing and self-including templates terminate.
enum IncludeTable {
    Map(HashMap<String, PagedSource>),
    Empty,
}

impl Default for IncludeTable {
    fn default() -> Self {
        IncludeTable::Map(HashMap::new())
    }
}

/// One render pass over a template.
///
/// Built fresh per render; the scope history and include caches live here,
/// so the borrowed context and modifier snapshot stay read-only throughout.
pub struct Renderer<'a> {
    modifiers: ModifierRegistry,
    context: &'a HashMap<String, Value>,
    locale: Locale,
    base_dir: Option<&'a Path>,
    bundle_base: Option<&'a str>,
    charset: &'static Encoding,
    includes: IncludeTable,
    history: Vec<IncludeTable>,
    bundle: Option<ResourceBundle>,
}

impl<'a> Renderer<'a> {
    /// Creates a renderer over a context mapping, using a snapshot of the
    /// process-wide modifier registry.
    pub fn new(context: &'a HashMap<String, Value>, locale: Locale) -> Self {
        Self {
            modifiers: modifier::modifiers(),
            context,
            locale,
            base_dir: None,
            bundle_base: None,
            charset: UTF_8,
            includes: IncludeTable::default(),
            history: Vec::new(),
            bundle: None,
        }
    }

    /// Sets the directory includes and resource bundles resolve against.
    pub fn with_base_dir(mut self, dir: &'a Path) -> Self {
        self.base_dir = Some(dir);
        self
    }

    /// Sets the resource-bundle base name used by `@` lookups.
    pub fn with_bundle(mut self, base: &'a str) -> Self {
        self.bundle_base = Some(base);
        self
    }

    /// Sets the charset included templates are decoded in.
    pub fn with_charset(mut self, charset: &'static Encoding) -> Self {
        self.charset = charset;
        self
    }

    /// Replaces the modifier snapshot with an explicit registry.
    pub fn with_modifiers(mut self, modifiers: ModifierRegistry) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Renders `root` over the template in `source`, writing to `sink`.
    pub fn render(
        &mut self,
        root: &Value,
        sink: &mut dyn CharSink,
        source: &mut PagedSource,
    ) -> Result<(), RenderError> {
        self.write_root(root, sink, source)
    }

    fn write_root(
        &mut self,
        root: &Value,
        sink: &mut dyn CharSink,
        source: &mut PagedSource,
    ) -> Result<(), RenderError> {
        let scope = Scope::of(root);

        while let Some(c) = source.read()? {
            if c != '{' {
                sink.write_char(c)?;
                continue;
            }
            match source.read()? {
                Some('{') => {}
                Some(other) => {
                    sink.write_char('{')?;
                    sink.write_char(other)?;
                    continue;
                }
                None => {
                    sink.write_char('{')?;
                    continue;
                }
            }

            let (kind, marker) = read_marker(source)?;
            match kind {
                MarkerKind::SectionStart => {
                    self.write_section(&marker, &scope, sink, source)?;
                }
                // Positional close: returning unwinds to the enclosing
                // section iteration, whatever the marker body says.
                MarkerKind::SectionEnd => return Ok(()),
                MarkerKind::Include => {
                    self.write_include(marker, root, sink)?;
                }
                MarkerKind::Comment => {}
                MarkerKind::Variable => {
                    self.write_variable(&marker, &scope, sink)?;
                }
            }
        }

        Ok(())
    }

    fn write_section(
        &mut self,
        marker: &str,
        scope: &Scope<'_>,
        sink: &mut dyn CharSink,
        source: &mut PagedSource,
    ) -> Result<(), RenderError> {
        let (name, separator) = split_section(marker);

        // Null and missing both read as the empty sequence.
        let items: &[Value] = match scope.get(name) {
            None | Some(Value::Null) => &[],
            Some(Value::Sequence(items)) => items,
            Some(_) => {
                return Err(RenderError::Syntax(format!(
                    "section target is not a sequence: {name}"
                )))
            }
        };

        self.history.push(std::mem::take(&mut self.includes));

        let result = if items.is_empty() {
            self.includes = IncludeTable::Empty;
            // Consume the body from the stream without emitting anything.
            self.write_root(&Value::Mapping(HashMap::new()), &mut NullSink, source)
        } else {
            self.write_elements(items, separator, sink, source)
        };

        self.includes = self.history.pop().unwrap_or_default();
        result
    }

    fn write_elements(
        &mut self,
        items: &[Value],
        separator: Option<&str>,
        sink: &mut dyn CharSink,
        source: &mut PagedSource,
    ) -> Result<(), RenderError> {
        for (i, element) in items.iter().enumerate() {
            let last = i + 1 == items.len();
            if !last {
                source.mark();
            }
            if i > 0 {
                if let Some(separator) = separator {
                    sink.write_str(separator)?;
                }
            }
            self.write_root(element, sink, source)?;
            if !last {
                source.reset();
            }
        }
        Ok(())
    }

    fn write_include(
        &mut self,
        name: String,
        root: &Value,
        sink: &mut dyn CharSink,
    ) -> Result<(), RenderError> {
        let cached = match &mut self.includes {
            IncludeTable::Empty => Some(PagedSource::empty()),
            IncludeTable::Map(map) => map.remove(&name).map(|mut sub| {
                // Replayed occurrence: the mark stack is empty here, so
                // reset rewinds the cached sub-source to its start.
                sub.reset();
                sub
            }),
        };
        let mut sub = match cached {
            Some(sub) => sub,
            None => self.open_include(&name)?,
        };

        self.write_root(root, sink, &mut sub)?;

        if let IncludeTable::Map(map) = &mut self.includes {
            map.insert(name, sub);
        }
        Ok(())
    }

    fn open_include(&self, name: &str) -> Result<PagedSource, RenderError> {
        let Some(dir) = self.base_dir else {
            return Err(RenderError::TemplateNotFound(PathBuf::from(name)));
        };
        let path = dir.join(name);
        log::debug!("opening include {}", path.display());
        let file = fs::File::open(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => RenderError::TemplateNotFound(path.clone()),
            _ => RenderError::Io(e),
        })?;
        Ok(PagedSource::new(Box::new(DecodingReader::new(
            file,
            self.charset,
        ))))
    }

    fn write_variable(
        &mut self,
        marker: &str,
        scope: &Scope<'_>,
        sink: &mut dyn CharSink,
    ) -> Result<(), RenderError> {
        let mut segments = marker.split(':');
        let key = segments.next().unwrap_or(marker);

        let Some(mut value) = self.resolve(key, scope)? else {
            return Ok(());
        };

        for segment in segments {
            let (name, argument) = match segment.find('=') {
                Some(i) => (&segment[..i], Some(&segment[i + 1..])),
                None => (segment, None),
            };
            // Unknown names pass the value through untouched.
            if let Some(modifier) = self.modifiers.get(name) {
                value = modifier(&value, argument, &self.locale);
            }
        }

        sink.write_str(&value.to_string())?;
        Ok(())
    }

    /// Resolves a variable key. `Ok(None)` means a silent miss.
    fn resolve(&mut self, key: &str, scope: &Scope<'_>) -> Result<Option<Value>, RenderError> {
        if let Some(rest) = key.strip_prefix(RESOURCE_PREFIX) {
            return match self.bundle()? {
                Some(bundle) => Ok(Some(Value::String(bundle.get(rest)?.to_string()))),
                None => Ok(None),
            };
        }

        if let Some(rest) = key.strip_prefix(CONTEXT_PREFIX) {
            return Ok(not_null(self.context.get(rest)));
        }

        if key == "." {
            return Ok(not_null(scope.get(key)));
        }

        let mut parts = key.split('.');
        let Some(first) = parts.next() else {
            return Ok(None);
        };
        let Some(mut current) = scope.get(first) else {
            return Ok(None);
        };
        for part in parts {
            match current {
                Value::Mapping(entries) => match entries.get(part) {
                    Some(next) => current = next,
                    None => return Ok(None),
                },
                // A null link short-circuits to a silent miss; anything else
                // non-mapping mid-path is a template defect.
                Value::Null => return Ok(None),
                _ => {
                    return Err(RenderError::Syntax(format!("invalid path: {key}")));
                }
            }
        }
        Ok(not_null(Some(current)))
    }

    fn bundle(&mut self) -> Result<Option<&ResourceBundle>, RenderError> {
        let Some(base) = self.bundle_base else {
            return Ok(None);
        };
        if self.bundle.is_none() {
            let Some(dir) = self.base_dir else {
                return Err(RenderError::BundleNotFound {
                    base: base.to_string(),
                    locale: self.locale.to_string(),
                });
            };
            self.bundle = Some(ResourceBundle::load(dir, base, &self.locale)?);
        }
        Ok(self.bundle.as_ref())
    }
}

fn not_null(value: Option<&Value>) -> Option<Value> {
    value.filter(|v| !v.is_null()).cloned()
}

/// Splits a section marker body into name and optional `[sep]` suffix.
fn split_section(marker: &str) -> (&str, Option<&str>) {
    if marker.ends_with(']') {
        if let Some(i) = marker.rfind('[') {
            return (&marker[..i], Some(&marker[i + 1..marker.len() - 1]));
        }
    }
    (marker, None)
}

/// Reads one marker starting just after the `{{` opener: kind from the first
/// body character, body up to `}`, then exactly one more `}`.
fn read_marker(source: &mut PagedSource) -> Result<(MarkerKind, String), RenderError> {
    let mut c = source.read()?;
    let kind = match c {
        Some('#') => MarkerKind::SectionStart,
        Some('/') => MarkerKind::SectionEnd,
        Some('>') => MarkerKind::Include,
        Some('!') => MarkerKind::Comment,
        _ => MarkerKind::Variable,
    };
    if kind != MarkerKind::Variable {
        c = source.read()?;
    }

    let mut body = String::new();
    loop {
        match c {
            Some('}') => break,
            Some(ch) => body.push(ch),
            None => {
                return Err(RenderError::Syntax(
                    "unexpected end of character stream".to_string(),
                ))
            }
        }
        c = source.read()?;
    }

    if source.read()? != Some('}') {
        return Err(RenderError::Syntax(
            "improperly terminated marker".to_string(),
        ));
    }
    if body.is_empty() {
        return Err(RenderError::Syntax("empty marker".to_string()));
    }

    Ok((kind, body))
}
