//! Schema compilation failures: every error names the offending token
//! and the byte position where it went wrong.

use unformat::{CompileError, Converter, Parser, TypeDict, with_pattern};

#[test]
fn test_stray_closing_brace_reports_its_position() {
    let err = Parser::new("a } b").unwrap_err();
    assert_eq!(err, CompileError::UnbalancedBrace { position: 2 });
}

#[test]
fn test_unterminated_field_reports_the_opening_brace() {
    let err = Parser::new("head {name").unwrap_err();
    assert_eq!(err, CompileError::UnbalancedBrace { position: 5 });
}

#[test]
fn test_nested_opening_brace_is_rejected() {
    let err = Parser::new("{a{b}}").unwrap_err();
    assert_eq!(err, CompileError::UnbalancedBrace { position: 2 });
}

#[test]
fn test_field_names_must_be_identifiers() {
    for schema in ["{9lives}", "{a b}", "{a-b}", "{a.b:d}"] {
        match Parser::new(schema) {
            Err(CompileError::InvalidFieldName { .. }) => {}
            other => panic!("{schema:?}: expected InvalidFieldName, got {other:?}"),
        }
    }
}

#[test]
fn test_invalid_field_name_carries_the_name() {
    let err = Parser::new("x {9lives} y").unwrap_err();
    assert_eq!(
        err,
        CompileError::InvalidFieldName {
            name: "9lives".to_string(),
            position: 2,
        }
    );
}

#[test]
fn test_duplicate_names_are_rejected_at_compile_time() {
    let err = Parser::new("{x} and {x}").unwrap_err();
    assert_eq!(
        err,
        CompileError::DuplicateField {
            name: "x".to_string(),
            position: 8,
        }
    );
}

#[test]
fn test_unknown_type_names_the_missing_entry() {
    let err = Parser::new("value {v:Missing}").unwrap_err();
    assert_eq!(
        err,
        CompileError::UnknownType {
            name: "Missing".to_string(),
            position: 6,
        }
    );
}

#[test]
fn test_converter_without_pattern_cannot_be_compiled() {
    // A raw converter carries no fragment, so nothing can be spliced in.
    let bare = Converter::new(|text: &str| Ok(text.into()));
    let types = TypeDict::from_iter([("Bare".to_string(), bare)]);
    let err = Parser::with_types("{v:Bare}", &types).unwrap_err();
    assert_eq!(
        err,
        CompileError::MissingPattern {
            name: "Bare".to_string(),
            position: 0,
        }
    );
}

#[test]
fn test_malformed_fragment_is_caught_before_splicing() {
    let broken = with_pattern("[unclosed").map(str::to_owned);
    let types = TypeDict::from_iter([("Broken".to_string(), broken)]);
    let err = Parser::with_types("ok {v:Broken}", &types).unwrap_err();
    match err {
        CompileError::BadFragment { name, position, .. } => {
            assert_eq!(name, "Broken");
            assert_eq!(position, 3);
        }
        other => panic!("expected BadFragment, got {other:?}"),
    }
}

#[test]
fn test_undeclared_capture_groups_are_rejected() {
    let sneaky = with_pattern(r"(\d+)\.(\d+)").map(str::to_owned);
    let types = TypeDict::from_iter([("Pair".to_string(), sneaky)]);
    let err = Parser::with_types("{v:Pair}", &types).unwrap_err();
    assert_eq!(
        err,
        CompileError::GroupCountMismatch {
            name: "Pair".to_string(),
            position: 0,
            declared: 0,
            actual: 2,
        }
    );
}

#[test]
fn test_error_messages_read_well() {
    let err = Parser::new("value {v:Missing}").unwrap_err();
    assert_eq!(err.to_string(), "Unknown type \"Missing\" at byte 6");

    let err = Parser::new("a } b").unwrap_err();
    assert_eq!(err.to_string(), "Unbalanced brace at byte 2");
}
