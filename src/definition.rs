use std::{fmt, str::FromStr};

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured, strategy-specific configuration carried through undecoded.
pub type JsonObject = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StrategyType {
    #[serde(rename = "geocoding")]
    Geocoding,
    #[serde(rename = "georegion_match_on_point")]
    GeoRegionMatchOnPoint,
    /// Legacy tag for [`StrategyType::GeoRegionMatchOnPoint`].
    #[serde(rename = "georegion")]
    GeoRegion,
    #[serde(rename = "georegion_match_on_string")]
    GeoRegionMatchOnString,
    #[serde(rename = "test")]
    Test,
}

impl StrategyType {
    pub const ALL: [StrategyType; 5] = [
        StrategyType::Geocoding,
        StrategyType::GeoRegionMatchOnPoint,
        StrategyType::GeoRegion,
        StrategyType::GeoRegionMatchOnString,
        StrategyType::Test,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyType::Geocoding => "geocoding",
            StrategyType::GeoRegionMatchOnPoint => "georegion_match_on_point",
            StrategyType::GeoRegion => "georegion",
            StrategyType::GeoRegionMatchOnString => "georegion_match_on_string",
            StrategyType::Test => "test",
        }
    }

    pub fn is_legacy_alias(&self) -> bool {
        matches!(self, StrategyType::GeoRegion)
    }
}

impl fmt::Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        StrategyType::ALL
            .iter()
            .copied()
            .find(|candidate| candidate.as_str() == value)
            .ok_or_else(|| {
                let known = StrategyType::ALL
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                anyhow!("Unknown strategy type '{value}'. Supported types: {known}")
            })
    }
}

/// How a computed column derives its values, with column references of type `C`.
///
/// Incoming definitions use [`crate::schema::ColumnName`]; after
/// [`crate::registry::transform`] the same shape carries internal ids.
/// `Deserialize` lives in [`crate::codec`] because it accepts two wire shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyDefinition<C> {
    #[serde(rename = "type")]
    pub typ: StrategyType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_columns: Option<Vec<C>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<JsonObject>,
}

impl<C> StrategyDefinition<C> {
    pub fn new(typ: StrategyType) -> Self {
        StrategyDefinition {
            typ,
            source_columns: None,
            parameters: None,
        }
    }

    pub fn with_source_columns<I>(mut self, columns: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<C>,
    {
        self.source_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_parameters(mut self, parameters: JsonObject) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// Source columns as a slice; absent columns read as empty.
    pub fn source_column_slice(&self) -> &[C] {
        self.source_columns.as_deref().unwrap_or(&[])
    }

    /// Converts into the required-field form consumed downstream.
    pub fn into_info(self) -> ComputationStrategyInfo<C> {
        ComputationStrategyInfo {
            strategy_type: self.typ,
            source_column_ids: self.source_columns.unwrap_or_default(),
            parameters: self.parameters.unwrap_or_default(),
        }
    }
}

/// Post-transform representation with every field present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputationStrategyInfo<C> {
    pub strategy_type: StrategyType,
    pub source_column_ids: Vec<C>,
    pub parameters: JsonObject,
}
