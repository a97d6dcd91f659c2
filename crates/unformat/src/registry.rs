//! Type registry and the builtin converter table.

use std::sync::LazyLock;

use indexmap::IndexMap;
use num_bigint::BigInt;

use crate::convert::{ConvertError, Converter, with_pattern};
use crate::value::Value;

/// Ordered name-to-converter table.
///
/// Insertion order is preserved; inserting an existing key replaces the
/// converter but keeps the original position.
pub type TypeDict = IndexMap<String, Converter>;

/// Fragment for untyped placeholders. Non-greedy; it crosses newlines
/// because the assembled pattern enables dot-all.
pub(crate) const ANY_FRAGMENT: &str = ".+?";

static BUILTIN_TYPES: LazyLock<TypeDict> = LazyLock::new(builtin_table);

static ANY_TEXT: LazyLock<Converter> = LazyLock::new(|| {
    with_pattern(ANY_FRAGMENT)
        .with_name("any")
        .map(str::to_owned)
});

/// Shared converter for untyped placeholders.
pub(crate) fn any_text() -> Converter {
    ANY_TEXT.clone()
}

/// Converter lookup table consulted by the schema compiler.
///
/// Built once per parser by merging the builtin table with user-supplied
/// entries; user entries shadow builtins of the same name. There is no
/// global mutable registry anywhere.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    entries: TypeDict,
}

impl TypeRegistry {
    /// A registry preloaded with the builtin table.
    pub fn builtin() -> Self {
        TypeRegistry {
            entries: BUILTIN_TYPES.clone(),
        }
    }

    /// A registry with no entries, not even the builtins.
    pub fn empty() -> Self {
        TypeRegistry {
            entries: TypeDict::new(),
        }
    }

    /// Insert or shadow one entry; returns the converter it replaced.
    pub fn insert(&mut self, name: impl Into<String>, converter: Converter) -> Option<Converter> {
        self.entries.insert(name.into(), converter)
    }

    /// Shadow entries with everything from `extra`, in its order.
    pub fn merged_with(mut self, extra: &TypeDict) -> Self {
        for (name, converter) in extra {
            self.entries.insert(name.clone(), converter.clone());
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Converter> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// The fixed builtin table. Deliberately unoriginal: single-letter names and
/// fragments follow the long-standing reverse-format conventions. Any entry
/// may be shadowed by a user type of the same name.
fn builtin_table() -> TypeDict {
    [
        ("d", with_pattern(r"[-+]?\d+").with_name("d").wrap(convert_int)),
        (
            "n",
            with_pattern(r"[-+]?\d{1,3}(?:,\d{3})*")
                .with_name("n")
                .wrap(convert_grouped),
        ),
        (
            "b",
            with_pattern(r"[-+]?(?:0[bB])?[01]+")
                .with_name("b")
                .wrap(convert_bin),
        ),
        (
            "o",
            with_pattern(r"[-+]?(?:0[oO])?[0-7]+")
                .with_name("o")
                .wrap(convert_oct),
        ),
        (
            "x",
            with_pattern(r"[-+]?(?:0[xX])?[0-9a-fA-F]+")
                .with_name("x")
                .wrap(convert_hex),
        ),
        (
            "f",
            with_pattern(r"[-+]?\d*\.\d+")
                .with_name("f")
                .wrap(convert_float),
        ),
        (
            "e",
            with_pattern(r"[-+]?\d*\.\d+[eE][-+]?\d+")
                .with_name("e")
                .wrap(convert_float),
        ),
        (
            "g",
            with_pattern(r"[-+]?(?:\d*\.\d+(?:[eE][-+]?\d+)?|\d+)")
                .with_name("g")
                .wrap(convert_general),
        ),
        ("w", with_pattern(r"\w+").with_name("w").map(str::to_owned)),
        ("W", with_pattern(r"\W+").with_name("W").map(str::to_owned)),
        (
            "l",
            with_pattern(r"[A-Za-z]+").with_name("l").map(str::to_owned),
        ),
        ("D", with_pattern(r"\D+").with_name("D").map(str::to_owned)),
        ("s", with_pattern(r"\S+").with_name("s").map(str::to_owned)),
        ("S", with_pattern(r"\s+").with_name("S").map(str::to_owned)),
    ]
    .into_iter()
    .map(|(name, converter)| (name.to_string(), converter))
    .collect()
}

fn convert_int(text: &str) -> Result<Value, ConvertError> {
    if let Ok(n) = text.parse::<i64>() {
        return Ok(Value::I64(n));
    }
    if let Ok(n) = text.parse::<u64>() {
        return Ok(Value::U64(n));
    }
    text.parse::<BigInt>()
        .map(Value::BigInt)
        .map_err(|e| ConvertError::invalid(text, e.to_string()))
}

fn convert_grouped(text: &str) -> Result<Value, ConvertError> {
    let digits: String = text.chars().filter(|c| *c != ',').collect();
    convert_int(&digits)
}

fn convert_bin(text: &str) -> Result<Value, ConvertError> {
    convert_radix(text, 2, &["0b", "0B"])
}

fn convert_oct(text: &str) -> Result<Value, ConvertError> {
    convert_radix(text, 8, &["0o", "0O"])
}

fn convert_hex(text: &str) -> Result<Value, ConvertError> {
    convert_radix(text, 16, &["0x", "0X"])
}

/// Sign-aware parse of a prefixed radix literal. The sign precedes the
/// prefix, so `-0xFF` normalizes to `-FF` before parsing.
fn convert_radix(text: &str, radix: u32, prefixes: &[&str]) -> Result<Value, ConvertError> {
    let (sign, magnitude) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.strip_prefix('+').unwrap_or(text)),
    };
    let digits = prefixes
        .iter()
        .find_map(|p| magnitude.strip_prefix(p))
        .unwrap_or(magnitude);
    let normalized = format!("{sign}{digits}");

    if let Ok(n) = i64::from_str_radix(&normalized, radix) {
        return Ok(Value::I64(n));
    }
    if let Ok(n) = u64::from_str_radix(&normalized, radix) {
        return Ok(Value::U64(n));
    }
    BigInt::parse_bytes(normalized.as_bytes(), radix)
        .map(Value::BigInt)
        .ok_or_else(|| ConvertError::invalid(text, format!("not a base-{radix} integer")))
}

fn convert_float(text: &str) -> Result<Value, ConvertError> {
    text.parse::<f64>()
        .map(Value::F64)
        .map_err(|e| ConvertError::invalid(text, e.to_string()))
}

fn convert_general(text: &str) -> Result<Value, ConvertError> {
    if text.contains(['.', 'e', 'E']) {
        convert_float(text)
    } else {
        convert_int(text)
    }
}
