//! Parser context: the delimiter configuration a template is parsed with.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorKind, TemplateError};

pub const DEFAULT_PREFIX: &str = "#{";
pub const DEFAULT_SUFFIX: &str = "}";

/// Immutable delimiter configuration for one parse.
///
/// When `template` is false, input handed to
/// [`TemplateParser::parse_expression`](crate::template::TemplateParser::parse_expression)
/// is treated as a single raw expression instead of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserContext {
    prefix: String,
    suffix: String,
    template: bool,
}

impl ParserContext {
    /// A template context with custom delimiters.
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
            template: true,
        }
    }

    /// The conventional `#{ ... }` template context.
    pub fn template() -> Self {
        Self::new(DEFAULT_PREFIX, DEFAULT_SUFFIX)
    }

    /// A `${ ... }` template context.
    pub fn dollar() -> Self {
        Self::new("${", "}")
    }

    /// A context whose input is a single raw expression, not a template.
    pub fn raw() -> Self {
        Self {
            template: false,
            ..Self::template()
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn is_template(&self) -> bool {
        self.template
    }

    /// Delimiters must be non-empty; nothing else about them is checked.
    pub fn validate(&self) -> Result<(), TemplateError> {
        if self.prefix.is_empty() {
            return Err(TemplateError::unspanned(ErrorKind::InvalidDelimiter {
                which: "prefix",
            }));
        }
        if self.suffix.is_empty() {
            return Err(TemplateError::unspanned(ErrorKind::InvalidDelimiter {
                which: "suffix",
            }));
        }
        Ok(())
    }

    /// Reads a context from JSON such as `{"prefix": "<%", "suffix": "%>"}`.
    /// Missing fields fall back to the `#{ ... }` template defaults.
    pub fn from_json_str(json: &str) -> Result<Self, TemplateError> {
        let context: Self = serde_json::from_str(json).map_err(|e| {
            TemplateError::unspanned(ErrorKind::InvalidConfig {
                message: e.to_string(),
            })
        })?;
        context.validate()?;
        Ok(context)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, TemplateError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| TemplateError::io(format!("failed to read '{}': {e}", path.display())))?;
        Self::from_json_str(&json)
    }
}

impl Default for ParserContext {
    fn default() -> Self {
        Self::template()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let ctx = ParserContext::template();
        assert_eq!((ctx.prefix(), ctx.suffix()), ("#{", "}"));
        assert!(ctx.is_template());
        assert!(!ParserContext::raw().is_template());
        assert_eq!(ParserContext::dollar().prefix(), "${");
    }

    #[test]
    fn test_empty_delimiters_rejected() {
        let err = ParserContext::new("", "}").validate().unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidDelimiter { which: "prefix" });
        let err = ParserContext::new("${", "").validate().unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidDelimiter { which: "suffix" });
    }

    #[test]
    fn test_from_json_with_defaults() {
        let ctx = ParserContext::from_json_str(r#"{"prefix": "<%", "suffix": "%>"}"#).unwrap();
        assert_eq!(ctx, ParserContext::new("<%", "%>"));
        let ctx = ParserContext::from_json_str(r#"{"suffix": "]]"}"#).unwrap();
        assert_eq!(ctx.prefix(), "#{");
        assert_eq!(ctx.suffix(), "]]");
    }

    #[test]
    fn test_from_json_keeps_template_flag() {
        let ctx = ParserContext::from_json_str(r#"{"template": false}"#).unwrap();
        assert_eq!(ctx, ParserContext::raw());
        let ctx = ctx.with_suffix("]]");
        assert!(!ctx.is_template());
        assert_eq!((ctx.prefix(), ctx.suffix()), ("#{", "]]"));
    }

    #[test]
    fn test_malformed_json_is_a_config_error() {
        let err = ParserContext::from_json_str(r#"{"prefix": "<%""#).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidConfig { .. }));
        let err = ParserContext::from_json_str(r#"{"prefix": 3}"#).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidConfig { .. }));
    }

    #[test]
    fn test_from_json_rejects_empty_prefix() {
        assert!(ParserContext::from_json_str(r#"{"prefix": ""}"#).is_err());
    }
}
