//! Lazy, one-row-at-a-time parsing.
use crate::csv::options::ParseOptions;
use crate::csv::tokenize::{tokenize, TokenizeError};
use crate::csv::validate::{Issue, Record, RowSchema, UntypedRow, ValidationOutcome};
use crate::errors::{CsvError, ParseError, Result};
use crate::Position;
use std::io;
use tracing::{debug, trace};

/// Rows parsed on demand from a line source.
///
/// Each call to `next` reads exactly as many lines as it needs to produce one
/// row (a header line is consumed without yielding). The first error of any
/// kind ends the stream and drops the line source, as does dropping the
/// stream itself. Streams always fail fast, whatever
/// [`ErrorMode`](crate::ErrorMode) the options carry.
pub struct RowStream<I, S> {
    lines: Option<I>,
    schema: S,
    options: ParseOptions,
    header: Option<Vec<String>>,
    line_number: usize,
    row_number: usize,
}

/// Start streaming `lines` through `schema`.
pub fn parse_stream<L, S>(
    lines: L,
    schema: S,
    options: ParseOptions,
) -> Result<RowStream<L::IntoIter, S>>
where
    L: IntoIterator<Item = io::Result<String>>,
    S: RowSchema,
{
    options.validate()?;
    debug!(
        delimiter = ?options.delimiter,
        has_headers = options.has_headers,
        "starting parse"
    );
    Ok(RowStream {
        lines: Some(lines.into_iter()),
        schema,
        options,
        header: None,
        line_number: 0,
        row_number: 0,
    })
}

impl<I, S> RowStream<I, S>
where
    I: Iterator<Item = io::Result<String>>,
    S: RowSchema,
{
    /// The header, once the first line has been read in header mode.
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    /// Stop reading and release the line source.
    pub fn close(&mut self) {
        self.lines = None;
    }

    /// Advance to the next data row.
    ///
    /// The outer `Result` carries fatal errors (I/O, tokenizing); the inner one
    /// carries a validation failure, which the batch driver may choose to keep
    /// going past.
    pub(crate) fn next_row(
        &mut self,
    ) -> Option<Result<std::result::Result<S::Output, ParseError>>> {
        loop {
            let line = match self.lines.as_mut()?.next() {
                Some(Ok(line)) => line,
                Some(Err(err)) => return Some(Err(err.into())),
                None => {
                    self.close();
                    return None;
                }
            };
            self.line_number += 1;
            if self.options.skip_blank_lines && line.trim().is_empty() {
                continue;
            }

            let fields = match tokenize(&line, self.options.delimiter) {
                Ok(fields) => fields,
                Err(TokenizeError::UnterminatedQuote { column }) => {
                    return Some(Err(CsvError::UnterminatedQuote(Position {
                        line: self.line_number,
                        column,
                    })));
                }
            };
            trace!(line = self.line_number, fields = fields.len(), "tokenized line");

            if self.options.has_headers && self.header.is_none() {
                debug!(line = self.line_number, header = ?fields, "captured header");
                self.header = Some(fields);
                continue;
            }
            self.row_number += 1;

            let row = match &self.header {
                Some(header) => UntypedRow::Named(Record::new(header, &fields)),
                None => UntypedRow::Positional(&fields),
            };
            return Some(Ok(match self.schema.validate(&row) {
                ValidationOutcome::Valid(value) => Ok(value),
                ValidationOutcome::Invalid(issues) => Err(self.reject(line, issues)),
            }));
        }
    }

    fn reject(&self, line: String, issues: Vec<Issue>) -> ParseError {
        let row_number = if self.options.has_headers {
            self.line_number
        } else {
            self.row_number
        };
        ParseError::new(
            row_number,
            line,
            issues,
            self.options.file_path.clone(),
            self.options.delimiter,
            self.header.as_deref(),
        )
    }
}

impl<I, S> Iterator for RowStream<I, S>
where
    I: Iterator<Item = io::Result<String>>,
    S: RowSchema,
{
    type Item = Result<S::Output>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = match self.next_row()? {
            Ok(Ok(value)) => return Some(Ok(value)),
            Ok(Err(rejected)) => CsvError::from(rejected),
            Err(err) => err,
        };
        debug!(error = %item, "stream stopped");
        self.close();
        Some(Err(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::columns::TupleSchema;
    use crate::csv::source::lines_from_reader;
    use crate::csv::validate::Passthrough;
    use serde_json::json;
    use std::io::Cursor;

    fn lines(input: &'static str) -> impl Iterator<Item = io::Result<String>> {
        lines_from_reader(Cursor::new(input))
    }

    #[test]
    fn test_stream_raw_rows() {
        let mut iter = parse_stream(
            lines("name,age\nAlice,23\nBob,thirty\n"),
            Passthrough,
            ParseOptions::default(),
        )
        .unwrap();
        assert_eq!(iter.next().unwrap().unwrap(), vec!["name", "age"]);
        assert_eq!(iter.next().unwrap().unwrap(), vec!["Alice", "23"]);
        assert_eq!(iter.next().unwrap().unwrap(), vec!["Bob", "thirty"]);
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_stream_skips_header() {
        let schema: TupleSchema = "text,number,text".parse().unwrap();
        let mut iter = parse_stream(
            lines("name,age,city\nAlice,23,\"New York, NY\"\nBob,30,Seattle\n"),
            schema,
            ParseOptions::default().with_headers(true),
        )
        .unwrap();
        assert_eq!(iter.header(), None);
        assert_eq!(
            iter.next().unwrap().unwrap(),
            json!(["Alice", 23, "New York, NY"])
        );
        assert_eq!(
            iter.header(),
            Some(&["name".to_string(), "age".to_string(), "city".to_string()][..])
        );
        assert_eq!(iter.next().unwrap().unwrap(), json!(["Bob", 30, "Seattle"]));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_stream_fails_fast_and_fuses() {
        let schema: TupleSchema = "text,number".parse().unwrap();
        let mut iter = parse_stream(
            lines("name,age\nAlice,23\nBob,thirty\nCharlie,25\n"),
            schema,
            ParseOptions::default().with_headers(true),
        )
        .unwrap();
        assert!(iter.next().unwrap().is_ok());
        let err = iter.next().unwrap().unwrap_err();
        let parse_error = err.parse_error().unwrap();
        assert_eq!(parse_error.row_number(), 3);
        assert_eq!(parse_error.row_index(), 2);
        assert_eq!(parse_error.raw_line(), "Bob,thirty");
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_stream_unterminated_quote() {
        let mut iter = parse_stream(
            lines("a,b\n\"open,c\nd,e\n"),
            Passthrough,
            ParseOptions::default(),
        )
        .unwrap();
        assert!(iter.next().unwrap().is_ok());
        assert_eq!(
            iter.next().unwrap().unwrap_err(),
            CsvError::UnterminatedQuote(Position { line: 2, column: 1 })
        );
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_stream_reads_lazily() {
        let pulled = std::cell::Cell::new(0);
        let source = ["a", "b", "c"].into_iter().map(|line| {
            pulled.set(pulled.get() + 1);
            Ok(line.to_string())
        });
        let mut iter = parse_stream(source, Passthrough, ParseOptions::default()).unwrap();
        assert_eq!(iter.next().unwrap().unwrap(), vec!["a"]);
        assert_eq!(pulled.get(), 1);
        drop(iter);
        assert_eq!(pulled.get(), 1);
    }

    #[test]
    fn test_stream_propagates_read_errors() {
        let source = vec![
            Ok("a".to_string()),
            Err(io::Error::new(io::ErrorKind::InvalidData, "bad bytes")),
        ];
        let mut iter = parse_stream(source, Passthrough, ParseOptions::default()).unwrap();
        assert!(iter.next().unwrap().is_ok());
        assert_eq!(
            iter.next().unwrap().unwrap_err(),
            CsvError::Io("bad bytes".to_string())
        );
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_stream_rejects_bad_options() {
        let options = ParseOptions::default().with_delimiter('"');
        assert!(parse_stream(lines("a"), Passthrough, options).is_err());
    }
}
