//! The seam between tokenized rows and whatever validates them.
use std::fmt;

/// One step of an issue path: a column position or a header name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(index) => write!(f, "{index}"),
            PathSegment::Key(key) => f.write_str(key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueCode {
    InvalidType { expected: String, received: String },
    TooSmall,
    TooBig,
    Custom,
}

/// A single validation complaint, addressed by path into the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub code: IssueCode,
    pub path: Vec<PathSegment>,
    pub message: String,
}

impl Issue {
    pub fn new(code: IssueCode, path: Vec<PathSegment>, message: impl Into<String>) -> Self {
        Self {
            code,
            path,
            message: message.into(),
        }
    }

    /// An `invalid_type` issue with the usual `Invalid input: expected X, received Y` message.
    pub fn invalid_type(
        path: impl Into<PathSegment>,
        expected: impl Into<String>,
        received: impl Into<String>,
    ) -> Self {
        let expected = expected.into();
        let received = received.into();
        let message = format!("Invalid input: expected {expected}, received {received}");
        Self::new(
            IssueCode::InvalidType { expected, received },
            vec![path.into()],
            message,
        )
    }

    pub fn custom(path: impl Into<PathSegment>, message: impl Into<String>) -> Self {
        Self::new(IssueCode::Custom, vec![path.into()], message)
    }

    /// The first path segment, which names the column.
    pub fn column(&self) -> Option<&PathSegment> {
        self.path.first()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome<T> {
    Valid(T),
    Invalid(Vec<Issue>),
}

impl<T> ValidationOutcome<T> {
    pub fn into_result(self) -> Result<T, Vec<Issue>> {
        match self {
            ValidationOutcome::Valid(value) => Ok(value),
            ValidationOutcome::Invalid(issues) => Err(issues),
        }
    }
}

impl<T> From<Result<T, Vec<Issue>>> for ValidationOutcome<T> {
    fn from(result: Result<T, Vec<Issue>>) -> Self {
        match result {
            Ok(value) => ValidationOutcome::Valid(value),
            Err(issues) => ValidationOutcome::Invalid(issues),
        }
    }
}

/// A data row keyed by the header captured from the first line.
///
/// Header names without a matching cell map to `None`; extra cells past the
/// header width are only reachable through [`Record::fields`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record<'a> {
    header: &'a [String],
    fields: &'a [String],
}

impl<'a> Record<'a> {
    pub fn new(header: &'a [String], fields: &'a [String]) -> Self {
        Self { header, fields }
    }

    pub fn get(&self, name: &str) -> Option<&'a str> {
        let index = self.header.iter().position(|h| h == name)?;
        self.fields.get(index).map(String::as_str)
    }

    pub fn header(&self) -> &'a [String] {
        self.header
    }

    pub fn fields(&self) -> &'a [String] {
        self.fields
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, Option<&'a str>)> + 'a {
        let fields = self.fields;
        self.header
            .iter()
            .enumerate()
            .map(move |(i, name)| (name.as_str(), fields.get(i).map(String::as_str)))
    }
}

/// The untyped shape handed to a schema: positional without headers,
/// name-keyed with them.
#[derive(Debug, Clone, PartialEq)]
pub enum UntypedRow<'a> {
    Positional(&'a [String]),
    Named(Record<'a>),
}

impl<'a> UntypedRow<'a> {
    /// The row's cells in file order, whichever shape it was handed over in.
    pub fn fields(&self) -> &'a [String] {
        match self {
            UntypedRow::Positional(fields) => fields,
            UntypedRow::Named(record) => record.fields(),
        }
    }

    pub fn record(&self) -> Option<&Record<'a>> {
        match self {
            UntypedRow::Positional(_) => None,
            UntypedRow::Named(record) => Some(record),
        }
    }
}

pub trait RowSchema {
    type Output;

    fn validate(&self, row: &UntypedRow<'_>) -> ValidationOutcome<Self::Output>;
}

impl<F, T> RowSchema for F
where
    F: Fn(&UntypedRow<'_>) -> ValidationOutcome<T>,
{
    type Output = T;

    fn validate(&self, row: &UntypedRow<'_>) -> ValidationOutcome<T> {
        self(row)
    }
}

/// Accepts every row and hands back its raw cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl RowSchema for Passthrough {
    type Output = Vec<String>;

    fn validate(&self, row: &UntypedRow<'_>) -> ValidationOutcome<Vec<String>> {
        ValidationOutcome::Valid(row.fields().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_record_maps_header_names() {
        let header = strings(&["name", "age", "city"]);
        let fields = strings(&["Alice", "23"]);
        let record = Record::new(&header, &fields);
        assert_eq!(record.get("name"), Some("Alice"));
        assert_eq!(record.get("age"), Some("23"));
        assert_eq!(record.get("city"), None);
        assert_eq!(record.get("zip"), None);
        assert_eq!(
            record.iter().collect::<Vec<_>>(),
            vec![("name", Some("Alice")), ("age", Some("23")), ("city", None)]
        );
    }

    #[test]
    fn test_passthrough_returns_fields_in_both_shapes() {
        let header = strings(&["a", "b"]);
        let fields = strings(&["1", "2", "3"]);
        let positional = UntypedRow::Positional(&fields);
        let named = UntypedRow::Named(Record::new(&header, &fields));
        assert_eq!(Passthrough.validate(&positional), ValidationOutcome::Valid(fields.clone()));
        assert_eq!(Passthrough.validate(&named), ValidationOutcome::Valid(fields.clone()));
    }

    fn first_cell_len(row: &UntypedRow<'_>) -> ValidationOutcome<usize> {
        match row.fields().first() {
            Some(cell) if !cell.is_empty() => ValidationOutcome::Valid(cell.len()),
            _ => ValidationOutcome::Invalid(vec![Issue::custom(0usize, "Required")]),
        }
    }

    #[test]
    fn test_function_schema() {
        let schema = first_cell_len;
        let good = strings(&["abc"]);
        let bad = strings(&[""]);
        assert_eq!(schema.validate(&UntypedRow::Positional(&good)), ValidationOutcome::Valid(3));
        assert!(matches!(
            schema.validate(&UntypedRow::Positional(&bad)),
            ValidationOutcome::Invalid(issues) if issues[0].column() == Some(&PathSegment::Index(0))
        ));
    }

    #[test]
    fn test_outcome_result_conversions() {
        let valid: ValidationOutcome<u8> = Ok(7).into();
        assert_eq!(valid, ValidationOutcome::Valid(7));
        let issues = vec![Issue::custom("name", "Required")];
        let invalid: ValidationOutcome<u8> = Err(issues.clone()).into();
        assert_eq!(invalid.into_result(), Err(issues));
    }

    #[test]
    fn test_invalid_type_message() {
        let issue = Issue::invalid_type(1usize, "number", "NaN");
        assert_eq!(issue.message, "Invalid input: expected number, received NaN");
        assert_eq!(
            issue.code,
            IssueCode::InvalidType {
                expected: "number".into(),
                received: "NaN".into()
            }
        );
    }
}
