use thiserror::Error;

/// Domain errors shared across the lexnet crates.
#[derive(Error, Debug)]
pub enum LexError {
    /// An id did not resolve to a node in the graph or overlay.
    #[error("id not found: {0}")]
    IdNotFound(String),

    /// More than one edit-log record claims the same raw id.
    #[error("more than one annotation record found for raw id {0}")]
    AmbiguousRawId(String),

    /// A query form the evaluator does not implement.
    #[error("unsupported query form: {0}")]
    Unsupported(String),

    /// The external query parser rejected its input.
    #[error("query parse error: {0}")]
    Parse(String),

    #[error("invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
