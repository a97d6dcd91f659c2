use thiserror::Error;

/// Errors surfaced while compiling a schema into a match pattern.
///
/// Every variant names the offending token and its byte position in the
/// schema where one exists. Compilation is the only fallible phase; matching
/// itself reports non-matches as `None`, never as an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A `{` or `}` without a partner; literal braces are written `{{` / `}}`.
    #[error("Unbalanced brace at byte {position}")]
    UnbalancedBrace { position: usize },

    /// Field names are `[A-Za-z_][A-Za-z0-9_]*`.
    #[error("Invalid field name {name:?} at byte {position}")]
    InvalidFieldName { name: String, position: usize },

    /// One schema may bind each field name once.
    #[error("Field {name:?} bound twice, second use at byte {position}")]
    DuplicateField { name: String, position: usize },

    /// The placeholder's type is in neither the builtin table nor the
    /// supplied extra types.
    #[error("Unknown type {name:?} at byte {position}")]
    UnknownType { name: String, position: usize },

    /// The resolved converter was never given a pattern fragment.
    #[error("Type {name:?} at byte {position} has no pattern fragment")]
    MissingPattern { name: String, position: usize },

    /// The converter's fragment is not valid regex text on its own.
    #[error("Invalid pattern fragment for type {name:?} at byte {position}: {message}")]
    BadFragment {
        name: String,
        position: usize,
        message: String,
    },

    /// The fragment's real capture-group count disagrees with the declared
    /// one; accepting it would silently shift every later field.
    #[error(
        "Type {name:?} at byte {position} declares {declared} capture groups but its fragment has {actual}"
    )]
    GroupCountMismatch {
        name: String,
        position: usize,
        declared: usize,
        actual: usize,
    },

    /// The assembled whole-schema pattern failed to compile.
    #[error("Assembled pattern failed to compile: {message}")]
    Pattern { message: String },
}
