//! Eager, whole-input parsing.
use crate::csv::options::{ErrorMode, ParseOptions};
use crate::csv::stream::parse_stream;
use crate::csv::validate::RowSchema;
use crate::errors::{CsvError, Result, RowError};
use std::io;
use tracing::{debug, warn};

/// Everything a batch parse produced.
///
/// `header` is `Some` exactly when header mode was on (an empty input gives
/// an empty header). `errors` is only ever filled in [`ErrorMode::Collect`].
#[derive(Debug, Clone, PartialEq)]
pub struct Batch<T> {
    pub header: Option<Vec<String>>,
    pub data: Vec<T>,
    pub errors: Vec<RowError>,
}

/// Read every line, validating each row through `schema`.
///
/// In [`ErrorMode::FailFast`] the first invalid row aborts the call with a
/// located [`CsvError::Validation`]. I/O and tokenizing errors are fatal in
/// every mode.
pub fn parse_batch<L, S>(
    lines: L,
    schema: S,
    options: ParseOptions,
) -> Result<Batch<S::Output>>
where
    L: IntoIterator<Item = io::Result<String>>,
    S: RowSchema,
{
    let error_mode = options.error_mode;
    let has_headers = options.has_headers;
    let mut rows = parse_stream(lines, schema, options)?;
    let mut data = Vec::new();
    let mut errors = Vec::new();

    while let Some(step) = rows.next_row() {
        match step? {
            Ok(value) => data.push(value),
            Err(rejected) if error_mode == ErrorMode::Collect => {
                warn!(row = rejected.row_number(), "skipping invalid row");
                errors.push(RowError::from(&rejected));
            }
            Err(rejected) => return Err(CsvError::from(rejected)),
        }
    }

    let header = has_headers.then(|| {
        rows.header()
            .map(<[String]>::to_vec)
            .unwrap_or_default()
    });
    debug!(rows = data.len(), errors = errors.len(), "batch parse finished");
    Ok(Batch {
        header,
        data,
        errors,
    })
}
