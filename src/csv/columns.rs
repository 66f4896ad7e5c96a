//! A small column-typed schema engine for the common case of flat rows.
//!
//! [`TupleSchema`] checks cells by position and yields a JSON array;
//! [`RecordSchema`] checks cells by header name and yields a JSON object.
//! Issues use the familiar `Invalid input: expected X, received Y` phrasing.
use crate::csv::validate::{
    Issue, IssueCode, PathSegment, RowSchema, UntypedRow, ValidationOutcome,
};
use crate::errors::CsvError;
use itertools::Itertools;
use serde_json::{Map, Number, Value};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Number,
    Integer,
    Boolean,
    /// Missing or empty cells become `null`; anything else must match the inner type.
    Optional(Box<ColumnType>),
}

impl ColumnType {
    /// Coerce one cell, reporting problems against `path`.
    pub fn coerce(&self, cell: Option<&str>, path: PathSegment) -> Result<Value, Issue> {
        let cell = match (self, cell) {
            (ColumnType::Optional(inner), Some(c)) if !c.is_empty() => {
                return inner.coerce(Some(c), path)
            }
            (ColumnType::Optional(_), _) => return Ok(Value::Null),
            (_, None) => return Err(Issue::invalid_type(path, self.expected(), "undefined")),
            (_, Some(c)) => c,
        };
        let coerced = match self {
            ColumnType::Number => parse_number(cell),
            ColumnType::Integer => cell.trim().parse::<i64>().ok().map(Value::from),
            ColumnType::Boolean => match cell.trim().to_ascii_lowercase().as_str() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            ColumnType::Text | ColumnType::Optional(_) => Some(Value::String(cell.to_string())),
        };
        let received = match self {
            ColumnType::Number => "NaN",
            _ => "string",
        };
        coerced.ok_or_else(|| Issue::invalid_type(path, self.expected(), received))
    }

    fn expected(&self) -> &'static str {
        match self {
            ColumnType::Text => "string",
            ColumnType::Number => "number",
            ColumnType::Integer => "integer",
            ColumnType::Boolean => "boolean",
            ColumnType::Optional(inner) => inner.expected(),
        }
    }
}

fn parse_number(cell: &str) -> Option<Value> {
    let cell = cell.trim();
    if let Ok(int) = cell.parse::<i64>() {
        return Some(Value::from(int));
    }
    let float = cell.parse::<f64>().ok()?;
    Number::from_f64(float).map(Value::Number)
}

impl FromStr for ColumnType {
    type Err = CsvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(inner) = s.strip_suffix('?') {
            return Ok(ColumnType::Optional(Box::new(inner.parse()?)));
        }
        match s {
            "text" | "string" => Ok(ColumnType::Text),
            "number" => Ok(ColumnType::Number),
            "integer" | "int" => Ok(ColumnType::Integer),
            "boolean" | "bool" => Ok(ColumnType::Boolean),
            other => Err(CsvError::Config(format!("unknown column type {other:?}"))),
        }
    }
}

/// Validates cells by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleSchema {
    columns: Vec<ColumnType>,
}

impl TupleSchema {
    pub fn new(columns: Vec<ColumnType>) -> Self {
        Self { columns }
    }
}

impl FromStr for TupleSchema {
    type Err = CsvError;

    /// Parse `"text,number,bool?"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let columns = s
            .split(',')
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(columns))
    }
}

impl RowSchema for TupleSchema {
    type Output = Value;

    fn validate(&self, row: &UntypedRow<'_>) -> ValidationOutcome<Value> {
        let fields = row.fields();
        let (values, mut issues): (Vec<_>, Vec<_>) = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| column.coerce(fields.get(i).map(String::as_str), i.into()))
            .partition_result();
        if fields.len() > self.columns.len() {
            issues.push(Issue::new(
                IssueCode::TooBig,
                Vec::new(),
                format!(
                    "Too big: expected array to have <={} items",
                    self.columns.len()
                ),
            ));
        }
        if issues.is_empty() {
            ValidationOutcome::Valid(Value::Array(values))
        } else {
            ValidationOutcome::Invalid(issues)
        }
    }
}

/// Validates cells by header name. Rows without a header never pass.
///
/// The output object keeps the declared column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    columns: Vec<(String, ColumnType)>,
}

impl RecordSchema {
    pub fn new(columns: Vec<(String, ColumnType)>) -> Self {
        Self { columns }
    }
}

impl FromStr for RecordSchema {
    type Err = CsvError;

    /// Parse `"name:text,age:number"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let columns = s
            .split(',')
            .map(|entry| {
                let (name, ty) = entry.split_once(':').ok_or_else(|| {
                    CsvError::Config(format!("expected name:type, got {entry:?}"))
                })?;
                Ok((name.trim().to_string(), ty.parse()?))
            })
            .collect::<Result<Vec<_>, CsvError>>()?;
        Ok(Self::new(columns))
    }
}

impl RowSchema for RecordSchema {
    type Output = Value;

    fn validate(&self, row: &UntypedRow<'_>) -> ValidationOutcome<Value> {
        let Some(record) = row.record() else {
            return ValidationOutcome::Invalid(vec![Issue::new(
                IssueCode::InvalidType {
                    expected: "object".into(),
                    received: "array".into(),
                },
                Vec::new(),
                "Invalid input: expected object, received array",
            )]);
        };
        let mut object = Map::new();
        let mut issues = Vec::new();
        for (name, column) in &self.columns {
            match column.coerce(record.get(name), name.as_str().into()) {
                Ok(value) => {
                    object.insert(name.clone(), value);
                }
                Err(issue) => issues.push(issue),
            }
        }
        if issues.is_empty() {
            ValidationOutcome::Valid(Value::Object(object))
        } else {
            ValidationOutcome::Invalid(issues)
        }
    }
}
