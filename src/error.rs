//! Failure values produced while decoding and validating strategy definitions.
//!
//! [`DecodeError`] describes a structurally malformed document; it never
//! mentions strategy rules. [`ValidationError`] is the closed taxonomy of
//! business-rule violations, one variant per rule.

use serde_json::Value;
use thiserror::Error;

use crate::{definition::StrategyType, schema::ColumnType};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{path}: missing field '{field}'")]
    MissingField { path: String, field: String },
    #[error("{path}: expected {expected}, found {found}")]
    WrongType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("{path}: {reason}")]
    InvalidValue { path: String, reason: String },
    /// Every candidate shape failed; errors are kept in the order the shapes were tried.
    #[error("document matched none of the accepted shapes ({})", render_all(.0))]
    NoMatchingShape(Vec<DecodeError>),
}

impl DecodeError {
    pub fn missing_field(path: &str, field: &str) -> Self {
        DecodeError::MissingField {
            path: path.to_string(),
            field: field.to_string(),
        }
    }

    pub fn wrong_type(path: &str, expected: &'static str, found: &Value) -> Self {
        DecodeError::WrongType {
            path: path.to_string(),
            expected,
            found: json_kind(found),
        }
    }

    pub fn invalid(path: &str, reason: impl ToString) -> Self {
        DecodeError::InvalidValue {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}

fn render_all(errors: &[DecodeError]) -> String {
    errors
        .iter()
        .map(|err| err.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Wrong strategy type: received '{received}', expected '{expected}'")]
    WrongStrategyType {
        received: StrategyType,
        expected: StrategyType,
    },
    #[error("Wrong target column type: received {received}, expected {expected}")]
    WrongTargetColumnType {
        received: ColumnType,
        expected: ColumnType,
    },
    #[error(
        "Source column '{column_name}' has type {received}, expected {expected}"
    )]
    WrongSourceColumnType {
        column_name: String,
        received: ColumnType,
        expected: ColumnType,
    },
    #[error("Wrong number of source columns: received {received}, expected {expected}")]
    WrongNumberOfSourceColumns { received: usize, expected: usize },
    #[error("Unknown source column '{0}'")]
    UnknownSourceColumn(String),
    #[error("Source columns are required for strategy type '{0}'")]
    MissingSourceColumns(StrategyType),
    #[error("Parameters are required; expected fields: {}", .required.join(", "))]
    MissingParameters { required: Vec<String> },
    #[error("Missing parameter field '{0}'")]
    MissingParameterField(String),
    #[error("Invalid strategy parameters: {0}")]
    InvalidStrategyParameters(#[source] DecodeError),
}

impl ValidationError {
    pub fn unknown_column(name: impl ToString) -> Self {
        ValidationError::UnknownSourceColumn(name.to_string())
    }
}
