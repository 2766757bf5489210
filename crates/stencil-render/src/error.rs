//! Error types for template rendering.
//!
//! This module provides [`RenderError`], the single error type returned by the
//! rendering pipeline. Failures fall into three surfaced groups: template
//! syntax, missing resources, and I/O. Everything else (missing dictionary
//! keys, unknown modifier names, null values at an emission site) is a silent
//! miss that produces empty output and never constructs an error.

use std::path::PathBuf;

/// Error type for template rendering operations.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Template syntax error: unterminated or empty marker, improperly closed
    /// marker, non-iterable section target, or a path traversing a non-mapping.
    #[error("template error: {0}")]
    Syntax(String),

    /// The template or an included template could not be located.
    #[error("template not found: {0}")]
    TemplateNotFound(PathBuf),

    /// No resource bundle file exists for the base name under the locale chain.
    #[error("resource bundle not found: {base} ({locale})")]
    BundleNotFound {
        /// The bundle base name that was requested
        base: String,
        /// The locale the chain was derived from
        locale: String,
    },

    /// A `@` marker named a key the resource bundle does not define.
    #[error("missing resource key \"{key}\" in bundle {base}")]
    MissingResource {
        /// The key that was requested
        key: String,
        /// The bundle base name it was looked up in
        base: String,
    },

    /// The charset label is not recognized by the encoding table.
    #[error("unsupported charset label: {0}")]
    UnsupportedCharset(String),

    /// A caller-supplied value could not be serialized into the value tree.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Upstream read or downstream write failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RenderError::TemplateNotFound(PathBuf::from("missing.txt"));
        assert!(err.to_string().contains("template not found"));
        assert!(err.to_string().contains("missing.txt"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let render_err: RenderError = io_err.into();
        assert!(matches!(render_err, RenderError::Io(_)));
    }

    #[test]
    fn test_missing_resource_display() {
        let err = RenderError::MissingResource {
            key: "greeting".to_string(),
            base: "messages".to_string(),
        };
        assert!(err.to_string().contains("greeting"));
        assert!(err.to_string().contains("messages"));
    }
}
