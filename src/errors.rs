use crate::csv::report;
use crate::csv::validate::Issue;
use crate::Position;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CsvError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Unterminated quote ({0})")]
    UnterminatedQuote(Position),

    #[error("{0}")]
    Validation(Box<ParseError>),

    #[error("Invalid options: {0}")]
    Config(String),
}

impl From<io::Error> for CsvError {
    fn from(error: io::Error) -> Self {
        CsvError::Io(error.to_string())
    }
}

impl From<ParseError> for CsvError {
    fn from(error: ParseError) -> Self {
        CsvError::Validation(Box::new(error))
    }
}

impl CsvError {
    /// The located validation failure, if this is one.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            CsvError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CsvError>;

/// A row that failed schema validation, with enough context to point at the
/// offending cell.
///
/// `row_number` is the physical line number when headers are enabled and the
/// 1-based data row otherwise; `row_index` is always `row_number - 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    row_number: usize,
    row_index: usize,
    raw_line: String,
    issues: Vec<Issue>,
    file_path: Option<PathBuf>,
    delimiter: char,
    message: String,
}

impl ParseError {
    pub(crate) fn new(
        row_number: usize,
        raw_line: String,
        issues: Vec<Issue>,
        file_path: Option<PathBuf>,
        delimiter: char,
        header: Option<&[String]>,
    ) -> Self {
        let message = report::format_failure(
            row_number,
            &raw_line,
            &issues,
            file_path.as_deref(),
            delimiter,
            header,
        );
        Self {
            row_number,
            row_index: row_number.saturating_sub(1),
            raw_line,
            issues,
            file_path,
            delimiter,
            message,
        }
    }

    pub fn row_number(&self) -> usize {
        self.row_number
    }

    pub fn row_index(&self) -> usize {
        self.row_index
    }

    pub fn raw_line(&self) -> &str {
        &self.raw_line
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ParseError {}

/// A validation failure kept aside in [`ErrorMode::Collect`](crate::ErrorMode::Collect).
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

impl From<&ParseError> for RowError {
    fn from(error: &ParseError) -> Self {
        RowError {
            row: error.row_number(),
            message: error.message().to_string(),
        }
    }
}
