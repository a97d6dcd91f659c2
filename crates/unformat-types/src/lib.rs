//! Converter toolkit for unformat schemas
//!
//! This library turns loose collections of converters into the ordered type
//! table a [`Parser`](unformat::Parser) consumes, and builds composite
//! converters (optional, repeated, alternative) out of existing ones.

mod builder;

pub use builder::TypeBuilder;

use thiserror::Error;
use unformat::{Converter, TypeDict};

/// Errors raised while assembling converters into registry material.
///
/// These are programmer errors: a converter missing the metadata a registry
/// or composite needs. They surface immediately from the builder that
/// detected them, before anything reaches a schema compiler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecorationError {
    /// The converter has no pattern fragment, so no schema could splice it.
    #[error("Converter {name:?} has no pattern fragment")]
    MissingPattern { name: String },

    /// No explicit name and no derivable identifier to key the entry by.
    /// Closures always need [`with_name`](unformat::WithPattern::with_name).
    #[error("Converter has neither an explicit name nor a derivable identifier")]
    AnonymousConverter,

    /// Composites splice the inner fragment several times, which would
    /// multiply its capture groups; only flat fragments are accepted.
    #[error("Converter {name:?} declares {group_count} capture groups; composites require flat fragments")]
    CompositeGroupCount { name: String, group_count: usize },

    /// The inner fragment does not compile on its own.
    #[error("Fragment of converter {name:?} does not compile: {message}")]
    CompositeFragment { name: String, message: String },

    /// A variant needs at least one alternative to choose from.
    #[error("Variant needs at least one alternative")]
    EmptyVariant,
}

/// Build an ordered type table from a sequence of converters.
///
/// Each converter is keyed by its explicit name when one was set, and by the
/// identifier captured at wrap time otherwise. Entries keep input order; a
/// repeated key overwrites the earlier converter but keeps its original
/// position, so registration order stays meaningful.
///
/// ```
/// use unformat::{Parser, Value, with_pattern};
/// use unformat_types::build_type_dict;
///
/// fn parse_number(text: &str) -> Result<i64, std::num::ParseIntError> {
///     text.parse()
/// }
///
/// let types = build_type_dict([
///     with_pattern(r"\d+").apply(parse_number),
///     with_pattern("on|off").with_name("Switch").map(|s: &str| s == "on"),
/// ])?;
/// assert_eq!(types.keys().collect::<Vec<_>>(), ["parse_number", "Switch"]);
///
/// let parser = Parser::with_types("{n:parse_number} {s:Switch}", &types)?;
/// let matches = parser.parse("7 on").unwrap();
/// assert_eq!(matches["n"], Value::I64(7));
/// assert_eq!(matches["s"], Value::Bool(true));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn build_type_dict<I>(converters: I) -> Result<TypeDict, DecorationError>
where
    I: IntoIterator<Item = Converter>,
{
    let mut dict = TypeDict::new();
    for converter in converters {
        let key = converter
            .name()
            .or_else(|| converter.identifier())
            .ok_or(DecorationError::AnonymousConverter)?
            .to_string();
        if converter.pattern().is_none() {
            return Err(DecorationError::MissingPattern { name: key });
        }
        dict.insert(key, converter);
    }
    Ok(dict)
}
