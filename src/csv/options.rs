use crate::errors::{CsvError, Result};
use std::path::PathBuf;

/// What a driver does with a row that fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Abort the parse with a located [`ParseError`](crate::ParseError).
    #[default]
    FailFast,
    /// Record a [`RowError`](crate::RowError) and keep going. Batch only;
    /// streams always fail fast.
    Collect,
}

/// Settings for one parse call.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    /// Field separator. Default: `','`.
    pub delimiter: char,
    /// Treat the first physical line as the header. Default: `false`.
    pub has_headers: bool,
    /// Default: [`ErrorMode::FailFast`].
    pub error_mode: ErrorMode,
    /// Drop whitespace-only lines before tokenizing. Default: `false`.
    pub skip_blank_lines: bool,
    /// Reported in diagnostics. Default: `None`.
    pub file_path: Option<PathBuf>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_headers: false,
            error_mode: ErrorMode::FailFast,
            skip_blank_lines: false,
            file_path: None,
        }
    }
}

impl ParseOptions {
    /// The forgiving call shape: collect row errors and ignore blank lines.
    pub fn lenient() -> Self {
        Self {
            error_mode: ErrorMode::Collect,
            skip_blank_lines: true,
            ..Self::default()
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    pub fn with_error_mode(mut self, error_mode: ErrorMode) -> Self {
        self.error_mode = error_mode;
        self
    }

    pub fn with_skip_blank_lines(mut self, skip: bool) -> Self {
        self.skip_blank_lines = skip;
        self
    }

    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.delimiter == '"' {
            return Err(CsvError::Config(
                "the quote character cannot be used as a delimiter".into(),
            ));
        }
        if self.delimiter == '\n' || self.delimiter == '\r' {
            return Err(CsvError::Config(
                "line endings cannot be used as a delimiter".into(),
            ));
        }
        Ok(())
    }
}
