//! Human-readable diagnostics for rows that fail validation.
use crate::csv::tokenize::tokenize;
use crate::csv::validate::{Issue, IssueCode, PathSegment};
use itertools::Itertools;
use std::path::Path;

/// Render a failed row as a three-line diagnostic.
///
/// The raw line is tokenized again so each issue can quote the cell exactly
/// as it appeared in the file rather than a coerced value.
pub fn format_failure(
    row_number: usize,
    raw_line: &str,
    issues: &[Issue],
    file_path: Option<&Path>,
    delimiter: char,
    header: Option<&[String]>,
) -> String {
    let cells = tokenize(raw_line, delimiter).unwrap_or_default();
    let problems = issues
        .iter()
        .map(|issue| describe_issue(issue, &cells, header))
        .join("; ");
    let location = match file_path {
        Some(path) => format!(" in file \"{}\"", path.display()),
        None => String::new(),
    };
    format!(
        "CSV validation failed at row {row_number}{location}\nRaw data: \"{raw_line}\"\nProblem: {problems}"
    )
}

fn describe_issue(issue: &Issue, cells: &[String], header: Option<&[String]>) -> String {
    let column = issue.column().and_then(|segment| column_index(segment, header));
    let column_number = column.map_or_else(|| "unknown".to_string(), |i| (i + 1).to_string());

    if matches!(issue.code, IssueCode::InvalidType { .. }) && issue.message.contains("number") {
        let cell = match column {
            Some(i) => cells
                .get(i)
                .filter(|cell| !cell.is_empty())
                .map_or("empty", String::as_str),
            None => "unknown",
        };
        return format!(
            "Column {column_number}: Expected a number, but got \"{cell}\" (non-numeric text)"
        );
    }
    format!("Column {column_number}: {}", simplify(&issue.message))
}

/// Map an issue path segment to a 0-based column.
fn column_index(segment: &PathSegment, header: Option<&[String]>) -> Option<usize> {
    match segment {
        PathSegment::Index(i) => Some(*i),
        PathSegment::Key(key) => header?.iter().position(|name| name == key),
    }
}

fn simplify(message: &str) -> String {
    message
        .replacen("Invalid input: expected ", "Expected ", 1)
        .replacen(", received ", ", but got ", 1)
}
