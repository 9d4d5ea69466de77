use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Raised when the garden map text cannot be turned into a rectangular [`Map`](crate::map::Map).
#[derive(Debug, Error, Diagnostic)]
pub enum FormatError {
    #[error("Garden map is empty")]
    #[diagnostic(
        code(day12::empty_map),
        help("Input must contain at least one row of plot labels")
    )]
    Empty,

    #[error("Row {row} has {found} plots, expected {expected}")]
    #[diagnostic(
        code(day12::ragged_row),
        help("Every row of the garden map must have the same number of plots")
    )]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
        #[source_code]
        src: String,
        #[label("this row")]
        span: SourceSpan,
    },

    #[error("Failed to parse garden map")]
    #[diagnostic(
        code(day12::parse_error),
        help("Rows are separated by line breaks")
    )]
    Parse {
        #[source_code]
        src: String,
        #[label("Parse error occurred here")]
        span: SourceSpan,
    },
}
