//! Schema template scanner.
//!
//! Splits a schema string into literal runs and `{name:type}` placeholders.
//! `{{` and `}}` are escapes for literal braces; any other stray brace is an
//! error. The scanner knows nothing about types, only shapes; resolution
//! happens in the compiler.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::CompileError;

/// One scanned piece of a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TemplatePart {
    /// Literal text with brace escapes already folded.
    Literal(String),
    Field(FieldSpec),
}

/// A placeholder. All four shapes are valid: `{}`, `{name}`, `{:type}`,
/// `{name:type}`. An empty type (`{name:}`) counts as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FieldSpec {
    pub name: Option<String>,
    pub type_name: Option<String>,
    /// Byte offset of the opening brace in the schema.
    pub position: usize,
}

pub(crate) fn scan(schema: &str) -> Result<Vec<TemplatePart>, CompileError> {
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut chars = schema.char_indices().peekable();

    while let Some((at, ch)) = chars.next() {
        match ch {
            '{' => {
                if let Some((_, '{')) = chars.peek() {
                    chars.next();
                    literal.push('{');
                    continue;
                }
                if !literal.is_empty() {
                    parts.push(TemplatePart::Literal(std::mem::take(&mut literal)));
                }
                parts.push(TemplatePart::Field(scan_field(at, &mut chars)?));
            }
            '}' => {
                if let Some((_, '}')) = chars.peek() {
                    chars.next();
                    literal.push('}');
                    continue;
                }
                return Err(CompileError::UnbalancedBrace { position: at });
            }
            _ => literal.push(ch),
        }
    }

    if !literal.is_empty() {
        parts.push(TemplatePart::Literal(literal));
    }
    Ok(parts)
}

/// Scan the inside of a placeholder; `open` is the opening brace's offset.
fn scan_field(
    open: usize,
    chars: &mut Peekable<CharIndices<'_>>,
) -> Result<FieldSpec, CompileError> {
    let mut name = String::new();
    let mut type_name = String::new();
    let mut in_type = false;

    loop {
        match chars.next() {
            Some((_, '}')) => break,
            Some((at, '{')) => return Err(CompileError::UnbalancedBrace { position: at }),
            Some((_, ':')) if !in_type => in_type = true,
            Some((_, ch)) => {
                if in_type {
                    type_name.push(ch);
                } else {
                    name.push(ch);
                }
            }
            None => return Err(CompileError::UnbalancedBrace { position: open }),
        }
    }

    let name = if name.is_empty() {
        None
    } else {
        validate_field_name(&name, open)?;
        Some(name)
    };
    let type_name = if type_name.is_empty() {
        None
    } else {
        Some(type_name)
    };
    Ok(FieldSpec {
        name,
        type_name,
        position: open,
    })
}

fn validate_field_name(name: &str, position: usize) -> Result<(), CompileError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(CompileError::InvalidFieldName {
            name: name.to_string(),
            position,
        })
    }
}
