//! Schema compilation: placeholder resolution, fragment validation, and
//! assembly of the anchored match pattern.

use regex::Regex;

use crate::convert::Converter;
use crate::error::CompileError;
use crate::registry::{ANY_FRAGMENT, TypeRegistry, any_text};
use crate::template::{self, TemplatePart};

/// A compiled schema: one anchored regex plus ordered field bindings.
#[derive(Debug)]
pub(crate) struct CompiledSchema {
    pub regex: Regex,
    pub bindings: Vec<FieldBinding>,
}

/// One placeholder bound to its converter and capture-group index.
#[derive(Debug)]
pub(crate) struct FieldBinding {
    pub name: Option<String>,
    pub converter: Converter,
    pub group_index: usize,
}

pub(crate) fn compile(
    schema: &str,
    registry: &TypeRegistry,
) -> Result<CompiledSchema, CompileError> {
    let parts = template::scan(schema)?;
    let mut body = String::with_capacity(schema.len() + 16);
    let mut bindings: Vec<FieldBinding> = Vec::new();
    // Group 0 is the whole match; field groups start at 1.
    let mut group_index = 1;

    for part in parts {
        match part {
            TemplatePart::Literal(text) => body.push_str(&regex::escape(&text)),
            TemplatePart::Field(spec) => {
                if let Some(name) = &spec.name
                    && bindings
                        .iter()
                        .any(|b| b.name.as_deref() == Some(name.as_str()))
                {
                    return Err(CompileError::DuplicateField {
                        name: name.clone(),
                        position: spec.position,
                    });
                }

                let (converter, fragment) = match spec.type_name.as_deref() {
                    Some(type_name) => {
                        let converter = registry.get(type_name).cloned().ok_or_else(|| {
                            CompileError::UnknownType {
                                name: type_name.to_string(),
                                position: spec.position,
                            }
                        })?;
                        let fragment = validate_fragment(&converter, type_name, spec.position)?;
                        (converter, fragment)
                    }
                    None => (any_text(), ANY_FRAGMENT.to_string()),
                };

                body.push('(');
                body.push_str(&fragment);
                body.push(')');

                let stride = 1 + converter.group_count();
                bindings.push(FieldBinding {
                    name: spec.name,
                    converter,
                    group_index,
                });
                group_index += stride;
            }
        }
    }

    // Anchored both ends; dot-all so untyped fields can cross newlines.
    let regex = Regex::new(&format!(r"\A(?s:{body})\z")).map_err(|e| CompileError::Pattern {
        message: e.to_string(),
    })?;
    Ok(CompiledSchema { regex, bindings })
}

/// Compile the fragment standalone so a malformed one fails here, naming the
/// type, instead of as an unattributable error on the assembled pattern; then
/// cross-check its real capture-group count against the declared one.
fn validate_fragment(
    converter: &Converter,
    type_name: &str,
    position: usize,
) -> Result<String, CompileError> {
    let Some(fragment) = converter.pattern() else {
        return Err(CompileError::MissingPattern {
            name: type_name.to_string(),
            position,
        });
    };
    let probe = Regex::new(fragment).map_err(|e| CompileError::BadFragment {
        name: type_name.to_string(),
        position,
        message: e.to_string(),
    })?;
    let actual = probe.captures_len() - 1;
    if actual != converter.group_count() {
        return Err(CompileError::GroupCountMismatch {
            name: type_name.to_string(),
            position,
            declared: converter.group_count(),
            actual,
        });
    }
    Ok(fragment.to_string())
}
