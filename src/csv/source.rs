//! Line sources: anything yielding `io::Result<String>` one physical line at a time.
use crate::csv::batch::{parse_batch, Batch};
use crate::csv::options::ParseOptions;
use crate::csv::stream::{parse_stream, RowStream};
use crate::csv::validate::RowSchema;
use crate::errors::Result;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Split a reader into lines, dropping `\n` and `\r\n` terminators.
pub fn lines_from_reader<R: BufRead>(reader: R) -> impl Iterator<Item = io::Result<String>> {
    reader.lines()
}

/// Open `path` for reading line by line.
pub fn open_path(path: &Path) -> Result<impl Iterator<Item = io::Result<String>>> {
    let file = File::open(path)?;
    debug!(path = %path.display(), "opened csv source");
    Ok(lines_from_reader(BufReader::new(file)))
}

/// Parse a whole file. The path is recorded in any diagnostics.
pub fn parse_file_batch<S: RowSchema>(
    path: impl AsRef<Path>,
    schema: S,
    options: ParseOptions,
) -> Result<Batch<S::Output>> {
    let path = path.as_ref();
    parse_batch(open_path(path)?, schema, options.with_file_path(path))
}

/// Stream a file row by row. The file is closed when the stream ends,
/// fails, or is dropped.
pub fn parse_file_stream<S: RowSchema>(
    path: impl AsRef<Path>,
    schema: S,
    options: ParseOptions,
) -> Result<RowStream<impl Iterator<Item = io::Result<String>>, S>> {
    let path = path.as_ref();
    parse_stream(open_path(path)?, schema, options.with_file_path(path))
}
