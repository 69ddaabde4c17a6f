//! Column data types and column references.
//!
//! [`ColumnType`] names the declared type of a dataset column, using the
//! lowercase type tokens datasets expose (`text`, `number`, `point`, ...).
//! [`ColumnName`] is the user-facing reference to a column and [`ColumnId`]
//! the internal, stable one; a strategy definition carries one or the other.

use std::{borrow::Borrow, fmt, str::FromStr};

use anyhow::{Result, anyhow};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnType {
    Text,
    Number,
    Double,
    Money,
    Boolean,
    FixedTimestamp,
    FloatingTimestamp,
    Date,
    Time,
    Id,
    Version,
    Point,
    MultiPoint,
    Line,
    MultiLine,
    Polygon,
    MultiPolygon,
    Location,
    Url,
    Json,
    Blob,
    Photo,
    Document,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Number => "number",
            ColumnType::Double => "double",
            ColumnType::Money => "money",
            ColumnType::Boolean => "boolean",
            ColumnType::FixedTimestamp => "fixed_timestamp",
            ColumnType::FloatingTimestamp => "floating_timestamp",
            ColumnType::Date => "date",
            ColumnType::Time => "time",
            ColumnType::Id => "id",
            ColumnType::Version => "version",
            ColumnType::Point => "point",
            ColumnType::MultiPoint => "multipoint",
            ColumnType::Line => "line",
            ColumnType::MultiLine => "multiline",
            ColumnType::Polygon => "polygon",
            ColumnType::MultiPolygon => "multipolygon",
            ColumnType::Location => "location",
            ColumnType::Url => "url",
            ColumnType::Json => "json",
            ColumnType::Blob => "blob",
            ColumnType::Photo => "photo",
            ColumnType::Document => "document",
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &[
            "text",
            "number",
            "double",
            "money",
            "boolean",
            "fixed_timestamp",
            "floating_timestamp",
            "date",
            "time",
            "id",
            "version",
            "point",
            "multipoint",
            "line",
            "multiline",
            "polygon",
            "multipolygon",
            "location",
            "url",
            "json",
            "blob",
            "photo",
            "document",
        ]
    }

    pub fn is_geometry(&self) -> bool {
        matches!(
            self,
            ColumnType::Point
                | ColumnType::MultiPoint
                | ColumnType::Line
                | ColumnType::MultiLine
                | ColumnType::Polygon
                | ColumnType::MultiPolygon
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "text" | "string" => Ok(ColumnType::Text),
            "number" | "numeric" => Ok(ColumnType::Number),
            "double" | "float" => Ok(ColumnType::Double),
            "money" | "currency" => Ok(ColumnType::Money),
            "boolean" | "bool" | "checkbox" => Ok(ColumnType::Boolean),
            "fixed_timestamp" | "timestamp" => Ok(ColumnType::FixedTimestamp),
            "floating_timestamp" | "calendar_date" => Ok(ColumnType::FloatingTimestamp),
            "date" => Ok(ColumnType::Date),
            "time" => Ok(ColumnType::Time),
            "id" | "row_identifier" => Ok(ColumnType::Id),
            "version" | "row_version" => Ok(ColumnType::Version),
            "point" => Ok(ColumnType::Point),
            "multipoint" => Ok(ColumnType::MultiPoint),
            "line" | "linestring" => Ok(ColumnType::Line),
            "multiline" | "multilinestring" => Ok(ColumnType::MultiLine),
            "polygon" => Ok(ColumnType::Polygon),
            "multipolygon" => Ok(ColumnType::MultiPolygon),
            "location" => Ok(ColumnType::Location),
            "url" => Ok(ColumnType::Url),
            "json" => Ok(ColumnType::Json),
            "blob" => Ok(ColumnType::Blob),
            "photo" => Ok(ColumnType::Photo),
            "document" => Ok(ColumnType::Document),
            _ => Err(anyhow!(
                "Unknown column type '{value}'. Supported types: {}",
                ColumnType::variants().join(", ")
            )),
        }
    }
}

impl Serialize for ColumnType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ColumnType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        ColumnType::from_str(&token).map_err(|err| de::Error::custom(err.to_string()))
    }
}

/// User-facing column reference, as written in an incoming definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnName(String);

impl ColumnName {
    pub fn new(name: impl Into<String>) -> Self {
        ColumnName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// `Hash`/`Eq` of the wrapper match those of `str`, so maps keyed by
// `ColumnName` can be queried with the plain names found in parameters.
impl Borrow<str> for ColumnName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ColumnName {
    fn from(value: &str) -> Self {
        ColumnName(value.to_string())
    }
}

impl From<String> for ColumnName {
    fn from(value: String) -> Self {
        ColumnName(value)
    }
}

/// Internal column identifier assigned by the dataset store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ColumnId(pub u64);

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
