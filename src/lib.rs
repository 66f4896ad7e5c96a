//! Line-oriented CSV parsing with optional per-row schema validation.
//!
//! Lines are tokenized one physical line at a time, then handed to a
//! [`RowSchema`]. Use [`parse_batch`] to collect a whole input or
//! [`parse_stream`] to pull rows lazily.
pub mod csv;
mod errors;

pub use crate::csv::{
    columns::{ColumnType, RecordSchema, TupleSchema},
    options::{ErrorMode, ParseOptions},
    report::format_failure,
    source::{lines_from_reader, open_path, parse_file_batch, parse_file_stream},
    tokenize::{tokenize, TokenizeError},
    validate::{
        Issue, IssueCode, Passthrough, PathSegment, Record, RowSchema, UntypedRow,
        ValidationOutcome,
    },
    batch::{parse_batch, Batch},
    stream::{parse_stream, RowStream},
};
pub use crate::errors::{CsvError, ParseError, Result, RowError};

/// A location in the input: 1-based physical line and 1-based character column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}
