//! Attaching match metadata to plain conversion functions.
//!
//! A converter can wrap a free function, an associated function, or a
//! closure; wrapping records the pattern fragment and, where one exists, the
//! callable's identifier, without changing how the callable behaves.

use unformat::{Parser, TypeDict, Value, with_pattern};

fn parse_amount(text: &str) -> Result<i64, std::num::ParseIntError> {
    text.parse()
}

#[derive(Debug, PartialEq)]
struct Celsius(f64);

impl Celsius {
    fn from_text(text: &str) -> Result<Celsius, std::num::ParseFloatError> {
        Ok(Celsius(text.trim_end_matches("°C").parse()?))
    }
}

impl From<Celsius> for Value {
    fn from(c: Celsius) -> Value {
        Value::F64(c.0)
    }
}

#[test]
fn test_free_function_keeps_its_identifier() {
    let converter = with_pattern(r"\d+").apply(parse_amount);
    assert_eq!(converter.identifier(), Some("parse_amount"));
    assert_eq!(converter.pattern(), Some(r"\d+"));
    assert_eq!(converter.group_count(), 0);
    assert_eq!(converter.name(), None);
}

#[test]
fn test_associated_function_keeps_its_identifier() {
    let converter = with_pattern(r"-?\d+(?:\.\d+)?°C").apply(Celsius::from_text);
    assert_eq!(converter.identifier(), Some("from_text"));
}

#[test]
fn test_closures_have_no_identifier() {
    let converter = with_pattern(r"\d+")
        .with_name("Count")
        .apply(|text: &str| text.parse::<u64>());
    assert_eq!(converter.identifier(), None);
    assert_eq!(converter.name(), Some("Count"));
}

#[test]
fn test_wrapping_does_not_change_the_callable() {
    let converter = with_pattern(r"\d+").apply(parse_amount);
    // Direct call and wrapped call agree.
    assert_eq!(parse_amount("37"), Ok(37));
    assert_eq!(converter.convert("37"), Ok(Value::I64(37)));
}

#[test]
fn test_conversion_errors_carry_the_input_text() {
    let converter = with_pattern(r"\w+").apply(parse_amount);
    let err = converter.convert("oops").unwrap_err();
    let shown = err.to_string();
    assert!(shown.contains("\"oops\""), "{shown}");
}

#[test]
fn test_custom_value_types_flow_through_into() {
    let converter = with_pattern(r"-?\d+(?:\.\d+)?°C")
        .with_name("Temperature")
        .apply(Celsius::from_text);
    assert_eq!(converter.convert("21.5°C"), Ok(Value::F64(21.5)));
}

#[test]
fn test_decorated_function_drives_a_parser() {
    let temperature = with_pattern(r"-?\d+(?:\.\d+)?°C")
        .with_name("Temperature")
        .apply(Celsius::from_text);
    let types = TypeDict::from_iter([("Temperature".to_string(), temperature)]);
    let parser = Parser::with_types("outside: {temp:Temperature}", &types).unwrap();

    let matches = parser.parse("outside: -3.5°C").unwrap();
    assert_eq!(matches["temp"], Value::F64(-3.5));
    assert_eq!(parser.parse("outside: -3.5"), None);
}

#[test]
fn test_group_count_declaration_is_kept() {
    let converter = with_pattern(r"(\d+)/(\d+)")
        .with_group_count(2)
        .map(str::to_owned);
    assert_eq!(converter.group_count(), 2);
}

#[test]
fn test_map_wraps_infallible_functions() {
    let converter = with_pattern(r"[a-z]+").map(str::to_uppercase);
    assert_eq!(converter.convert("abc"), Ok(Value::Str("ABC".into())));
}

#[test]
fn test_cloned_converters_share_the_callable() {
    let original = with_pattern(r"\d+").with_name("Number").apply(parse_amount);
    let clone = original.clone();
    assert_eq!(clone.convert("12"), Ok(Value::I64(12)));
    assert_eq!(clone.name(), original.name());
    assert_eq!(clone.pattern(), original.pattern());
}
