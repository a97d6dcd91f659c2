//! Composite converter builders.
//!
//! Wraps existing converters into optional, repeated, and alternative forms.
//! A composite is an ordinary [`Converter`]: it carries a pattern fragment
//! and a conversion callable, registers like any hand-written converter, and
//! flows through schema compilation unchanged.

use regex::Regex;
use unformat::{ConvertError, Converter, Value, with_pattern};

use crate::DecorationError;

/// Builders for composite converters.
///
/// Inner converters must carry a pattern fragment and declare zero capture
/// groups; the fragment is spliced into the composite's own pattern, possibly
/// several times. Composites come out unnamed, so name them before handing
/// them to [`build_type_dict`](crate::build_type_dict).
pub struct TypeBuilder;

impl TypeBuilder {
    /// A converter matching the inner one or empty text.
    ///
    /// Empty text converts to [`Value::Null`]; anything else goes through the
    /// inner conversion.
    pub fn with_optional(inner: &Converter) -> Result<Converter, DecorationError> {
        let fragment = composite_fragment(inner)?;
        let inner = inner.clone();
        Ok(
            with_pattern(format!("(?:{fragment})?")).wrap(move |text: &str| {
                if text.is_empty() {
                    Ok(Value::Null)
                } else {
                    inner.convert(text)
                }
            }),
        )
    }

    /// One or more inner matches separated by `separator`, converted to a
    /// [`Value::List`].
    ///
    /// The match tolerates whitespace around each separator; conversion
    /// splits on the literal separator and trims each piece. A separator
    /// occurring inside an item therefore splits the item, the same way the
    /// original text would be ambiguous to a reader.
    pub fn with_many(inner: &Converter, separator: &str) -> Result<Converter, DecorationError> {
        let fragment = composite_fragment(inner)?;
        let pattern = many_fragment(&fragment, separator);
        Ok(with_pattern(pattern).wrap(convert_items(inner.clone(), separator)))
    }

    /// Zero or more inner matches; empty text converts to an empty list.
    pub fn with_many0(inner: &Converter, separator: &str) -> Result<Converter, DecorationError> {
        let fragment = composite_fragment(inner)?;
        let pattern = format!("(?:{})?", many_fragment(&fragment, separator));
        let convert = convert_items(inner.clone(), separator);
        Ok(with_pattern(pattern).wrap(move |text: &str| {
            if text.is_empty() {
                Ok(Value::List(Vec::new()))
            } else {
                convert(text)
            }
        }))
    }

    /// An alternation over several converters.
    ///
    /// The composite fragment accepts what any alternative accepts.
    /// Conversion re-checks the alternatives in the given order against the
    /// captured text and the first whose fragment matches converts it, so
    /// order expresses priority when alternatives overlap.
    pub fn variant(alternatives: &[Converter]) -> Result<Converter, DecorationError> {
        if alternatives.is_empty() {
            return Err(DecorationError::EmptyVariant);
        }
        let mut fragments = Vec::with_capacity(alternatives.len());
        let mut arms = Vec::with_capacity(alternatives.len());
        for alternative in alternatives {
            let fragment = composite_fragment(alternative)?;
            // Compiled here so a broken alternative fails at build time with
            // its own label, not at schema-compile time under the composite's.
            let probe = Regex::new(&format!(r"\A(?:{fragment})\z")).map_err(|e| {
                DecorationError::CompositeFragment {
                    name: converter_label(alternative),
                    message: e.to_string(),
                }
            })?;
            fragments.push(format!("(?:{fragment})"));
            arms.push((probe, alternative.clone()));
        }
        let pattern = fragments.join("|");
        Ok(with_pattern(pattern).wrap(move |text: &str| {
            for (probe, alternative) in &arms {
                if probe.is_match(text) {
                    return alternative.convert(text);
                }
            }
            Err(ConvertError::rejected("no variant matched"))
        }))
    }
}

fn many_fragment(item: &str, separator: &str) -> String {
    let sep = regex::escape(separator);
    format!(r"(?:{item})(?:\s*{sep}\s*(?:{item}))*")
}

fn convert_items(
    inner: Converter,
    separator: &str,
) -> impl Fn(&str) -> Result<Value, ConvertError> + Send + Sync + 'static {
    let separator = separator.to_string();
    move |text: &str| {
        let mut items = Vec::new();
        for part in text.split(separator.as_str()) {
            items.push(inner.convert(part.trim())?);
        }
        Ok(Value::List(items))
    }
}

fn composite_fragment(inner: &Converter) -> Result<String, DecorationError> {
    let Some(fragment) = inner.pattern() else {
        return Err(DecorationError::MissingPattern {
            name: converter_label(inner),
        });
    };
    if inner.group_count() != 0 {
        return Err(DecorationError::CompositeGroupCount {
            name: converter_label(inner),
            group_count: inner.group_count(),
        });
    }
    Ok(fragment.to_string())
}

fn converter_label(converter: &Converter) -> String {
    converter
        .name()
        .or_else(|| converter.identifier())
        .unwrap_or("<anonymous>")
        .to_string()
}
