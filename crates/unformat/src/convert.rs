//! Converter contract and the pattern decorator.
//!
//! A [`Converter`] pairs a conversion callable with the metadata the schema
//! compiler needs: the pattern fragment the callable expects to receive, how
//! many capture groups that fragment carries, and an optional registry name.
//! [`with_pattern`] attaches that metadata to free functions, type-associated
//! functions, and closures alike, without changing how the callable is
//! invoked.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::value::Value;

/// Error returned by a converter that rejects the captured text.
///
/// The match engine treats any converter failure as a non-match, so this
/// error never escapes [`Parser::parse`](crate::Parser::parse); it exists for
/// direct [`Converter::convert`] callers and for converter authors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// The captured text does not form a value of the target type.
    #[error("Cannot convert {text:?}: {reason}")]
    Invalid { text: String, reason: String },
    /// The text was well formed but the converter refused the value.
    #[error("Value rejected: {reason}")]
    Rejected { reason: String },
}

impl ConvertError {
    pub fn invalid(text: impl Into<String>, reason: impl Into<String>) -> Self {
        ConvertError::Invalid {
            text: text.into(),
            reason: reason.into(),
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        ConvertError::Rejected {
            reason: reason.into(),
        }
    }
}

type ConvertFn = dyn Fn(&str) -> Result<Value, ConvertError> + Send + Sync;

/// A conversion callable with pattern metadata.
///
/// Cloning is cheap and shares the underlying callable, so one converter may
/// back several parsers at once.
#[derive(Clone)]
pub struct Converter {
    func: Arc<ConvertFn>,
    pattern: Option<String>,
    group_count: usize,
    name: Option<String>,
    identifier: Option<String>,
}

impl Converter {
    /// Wrap a bare callable with no pattern fragment.
    ///
    /// A bare converter can sit in a hand-built type table, but the compiler
    /// rejects it the moment a schema refers to it; see [`with_pattern`] for
    /// the decorated form.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&str) -> Result<Value, ConvertError> + Send + Sync + 'static,
    {
        Converter {
            identifier: callable_identifier::<F>(),
            func: Arc::new(func),
            pattern: None,
            group_count: 0,
            name: None,
        }
    }

    /// Set the registry name, consuming self.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Invoke the wrapped callable on captured text.
    pub fn convert(&self, text: &str) -> Result<Value, ConvertError> {
        (self.func)(text)
    }

    /// The pattern fragment this converter matches, if decorated.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Number of capture groups inside the pattern fragment.
    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// Explicit registry name, if one was set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Identifier of the wrapped callable, captured at wrap time.
    ///
    /// `None` when the callable was a closure or a function pointer;
    /// registry builders then require an explicit name.
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("pattern", &self.pattern)
            .field("group_count", &self.group_count)
            .field("name", &self.name)
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

/// Attach a pattern fragment to a conversion callable.
///
/// Returns a [`WithPattern`] builder; finish it with [`wrap`](WithPattern::wrap),
/// [`apply`](WithPattern::apply), or [`map`](WithPattern::map) depending on
/// the callable's shape. The fragment is plain regex text; it is not
/// validated here but when a schema splices it into a full pattern, so a
/// malformed fragment surfaces as a compile error naming the type.
///
/// ```
/// use unformat::{Value, with_pattern};
///
/// let number = with_pattern(r"\d+").with_name("Number").apply(str::parse::<i64>);
/// assert_eq!(number.pattern(), Some(r"\d+"));
/// assert_eq!(number.convert("42"), Ok(Value::I64(42)));
/// ```
pub fn with_pattern(fragment: impl Into<String>) -> WithPattern {
    WithPattern {
        fragment: fragment.into(),
        group_count: 0,
        name: None,
    }
}

/// Builder returned by [`with_pattern`].
#[derive(Debug, Clone)]
pub struct WithPattern {
    fragment: String,
    group_count: usize,
    name: Option<String>,
}

impl WithPattern {
    /// Declare how many capture groups the fragment carries. Default: 0.
    ///
    /// The compiler cross-checks this count against the fragment, so an
    /// undeclared group cannot silently shift later fields.
    pub fn with_group_count(mut self, count: usize) -> Self {
        self.group_count = count;
        self
    }

    /// Set the registry name. Default: derived from the callable.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Wrap a callable that already speaks the converter contract.
    pub fn wrap<F>(self, func: F) -> Converter
    where
        F: Fn(&str) -> Result<Value, ConvertError> + Send + Sync + 'static,
    {
        Converter {
            identifier: callable_identifier::<F>(),
            func: Arc::new(func),
            pattern: Some(self.fragment),
            group_count: self.group_count,
            name: self.name,
        }
    }

    /// Wrap a fallible callable; errors become [`ConvertError::Invalid`]
    /// carrying the offending text.
    pub fn apply<F, T, E>(self, func: F) -> Converter
    where
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
        T: Into<Value>,
        E: fmt::Display,
    {
        let identifier = callable_identifier::<F>();
        Converter {
            identifier,
            func: Arc::new(move |text| {
                func(text)
                    .map(Into::into)
                    .map_err(|e| ConvertError::invalid(text, e.to_string()))
            }),
            pattern: Some(self.fragment),
            group_count: self.group_count,
            name: self.name,
        }
    }

    /// Wrap an infallible callable.
    pub fn map<F, T>(self, func: F) -> Converter
    where
        F: Fn(&str) -> T + Send + Sync + 'static,
        T: Into<Value>,
    {
        let identifier = callable_identifier::<F>();
        Converter {
            identifier,
            func: Arc::new(move |text| Ok(func(text).into())),
            pattern: Some(self.fragment),
            group_count: self.group_count,
            name: self.name,
        }
    }
}

/// Trailing path segment of the callable's type name.
///
/// Closures and function pointers carry no usable name and yield `None`.
fn callable_identifier<F>() -> Option<String> {
    let full = std::any::type_name::<F>();
    if full.contains("{{closure}}") || full.starts_with("fn(") {
        return None;
    }
    let segment = full.rsplit("::").next().unwrap_or(full);
    Some(segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_digits(text: &str) -> Result<i64, std::num::ParseIntError> {
        text.parse()
    }

    fn shout(text: &str) -> String {
        text.to_uppercase()
    }

    struct Flag;

    impl Flag {
        fn from_text(text: &str) -> Result<bool, String> {
            match text {
                "on" => Ok(true),
                "off" => Ok(false),
                other => Err(format!("not a flag: {other}")),
            }
        }
    }

    #[test]
    fn test_builder_defaults() {
        let conv = with_pattern(r"\d+").apply(parse_digits);
        assert_eq!(conv.pattern(), Some(r"\d+"));
        assert_eq!(conv.group_count(), 0);
        assert_eq!(conv.name(), None);
    }

    #[test]
    fn test_builder_setters() {
        let conv = with_pattern(r"(\d+)-(\d+)")
            .with_group_count(2)
            .with_name("Range")
            .apply(parse_digits);
        assert_eq!(conv.group_count(), 2);
        assert_eq!(conv.name(), Some("Range"));
    }

    #[test]
    fn test_identifier_from_free_function() {
        let conv = with_pattern(r"\d+").apply(parse_digits);
        assert_eq!(conv.identifier(), Some("parse_digits"));
    }

    #[test]
    fn test_identifier_from_associated_function() {
        let conv = with_pattern("on|off").apply(Flag::from_text);
        assert_eq!(conv.identifier(), Some("from_text"));
        assert_eq!(conv.convert("on"), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_closure_has_no_identifier() {
        let conv = with_pattern(r"\w+").map(|s: &str| s.len() as i64);
        assert_eq!(conv.identifier(), None);
        assert_eq!(conv.convert("four"), Ok(Value::I64(4)));
    }

    #[test]
    fn test_apply_error_carries_text() {
        let conv = with_pattern(r"\d+").apply(parse_digits);
        let err = conv.convert("nope").unwrap_err();
        assert!(matches!(err, ConvertError::Invalid { ref text, .. } if text == "nope"));
    }

    #[test]
    fn test_map_never_fails() {
        let conv = with_pattern(r"\w+").map(shout);
        assert_eq!(conv.convert("hey"), Ok(Value::Str("HEY".into())));
    }

    #[test]
    fn test_bare_converter_has_no_pattern() {
        let conv = Converter::new(|text: &str| Ok(Value::Str(text.to_string())));
        assert_eq!(conv.pattern(), None);
        assert_eq!(conv.convert("x"), Ok(Value::Str("x".into())));
    }

    #[test]
    fn test_rename_after_construction() {
        let conv = with_pattern(r"\d+").apply(parse_digits).with_name("Number");
        assert_eq!(conv.name(), Some("Number"));
        assert_eq!(conv.identifier(), Some("parse_digits"));
    }

    #[test]
    fn test_clone_shares_callable() {
        let conv = with_pattern(r"\d+").apply(parse_digits);
        let copy = conv.clone();
        assert_eq!(conv.convert("5"), copy.convert("5"));
        assert_eq!(copy.pattern(), Some(r"\d+"));
    }

    #[test]
    fn test_debug_omits_callable() {
        let conv = with_pattern(r"\d+").with_name("d").apply(parse_digits);
        let rendered = format!("{conv:?}");
        assert!(rendered.contains("\"d\""));
        assert!(rendered.contains(r"\d+"));
    }

    #[test]
    fn test_convert_error_display() {
        let err = ConvertError::invalid("x", "not a digit");
        assert_eq!(err.to_string(), "Cannot convert \"x\": not a digit");
        let err = ConvertError::rejected("too large");
        assert_eq!(err.to_string(), "Value rejected: too large");
    }
}
