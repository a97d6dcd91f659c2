//! The parser: a compiled schema plus the match-and-convert engine.

use std::ops::Index;

use indexmap::IndexMap;

use crate::compile::{self, CompiledSchema};
use crate::error::CompileError;
use crate::registry::{TypeDict, TypeRegistry};
use crate::value::Value;

/// A schema compiled and ready to match input text.
///
/// Construction does all validation and pattern assembly up front; a
/// constructed parser is immutable, matching is pure and repeatable, and one
/// parser may be shared across threads freely.
///
/// ```
/// use unformat::{Parser, Value};
///
/// let parser = Parser::new("{name:l} is {age:d}").unwrap();
/// let matches = parser.parse("Alice is 30").unwrap();
/// assert_eq!(matches["name"], Value::Str("Alice".into()));
/// assert_eq!(matches["age"], Value::I64(30));
/// assert_eq!(parser.parse("Alice is nine"), None);
/// ```
#[derive(Debug)]
pub struct Parser {
    schema: String,
    compiled: CompiledSchema,
}

impl Parser {
    /// Compile a schema against the builtin types only.
    pub fn new(schema: &str) -> Result<Self, CompileError> {
        Self::with_registry(schema, TypeRegistry::builtin())
    }

    /// Compile a schema with extra types; extras shadow builtins of the
    /// same name.
    pub fn with_types(schema: &str, extra: &TypeDict) -> Result<Self, CompileError> {
        Self::with_registry(schema, TypeRegistry::builtin().merged_with(extra))
    }

    /// Compile a schema against exactly the given registry.
    pub fn with_registry(schema: &str, registry: TypeRegistry) -> Result<Self, CompileError> {
        let compiled = compile::compile(schema, &registry)?;
        Ok(Parser {
            schema: schema.to_string(),
            compiled,
        })
    }

    /// Match `text` in full and convert every field.
    ///
    /// `None` means no match: either the pattern did not cover the whole
    /// input, or a converter rejected its captured text. Both are expected
    /// outcomes, not errors, and leave no partial results behind.
    pub fn parse(&self, text: &str) -> Option<Matches> {
        let caps = self.compiled.regex.captures(text)?;
        let mut named = IndexMap::new();
        let mut positional = Vec::with_capacity(self.compiled.bindings.len());

        for binding in &self.compiled.bindings {
            let captured = caps.get(binding.group_index)?.as_str();
            let value = match binding.converter.convert(captured) {
                Ok(value) => value,
                Err(_) => return None,
            };
            if let Some(name) = &binding.name {
                named.insert(name.clone(), value.clone());
            }
            positional.push(value);
        }

        Some(Matches { named, positional })
    }

    /// The schema text this parser was compiled from.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// The assembled regex pattern, for diagnostics.
    pub fn pattern(&self) -> &str {
        self.compiled.regex.as_str()
    }

    /// Named fields in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.compiled
            .bindings
            .iter()
            .filter_map(|b| b.name.as_deref())
    }
}

/// Converted values from one successful match.
///
/// Every placeholder appears in the positional sequence in declaration
/// order; named placeholders additionally appear in the named map.
#[derive(Debug, Clone, PartialEq)]
pub struct Matches {
    named: IndexMap<String, Value>,
    positional: Vec<Value>,
}

impl Matches {
    /// Value of a named field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.named.get(name)
    }

    /// Value of the `index`-th placeholder, counting every placeholder in
    /// declaration order from 0.
    pub fn pos(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    /// The named fields, in declaration order.
    pub fn named(&self) -> &IndexMap<String, Value> {
        &self.named
    }

    /// All field values in declaration order.
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// Total number of placeholders.
    pub fn len(&self) -> usize {
        self.positional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty()
    }
}

impl Index<&str> for Matches {
    type Output = Value;

    /// Panics if no field has this name; see [`Matches::get`] for the
    /// fallible form.
    fn index(&self, name: &str) -> &Value {
        &self.named[name]
    }
}

impl Index<usize> for Matches {
    type Output = Value;

    /// Panics if the index is out of range; see [`Matches::pos`] for the
    /// fallible form.
    fn index(&self, index: usize) -> &Value {
        &self.positional[index]
    }
}
