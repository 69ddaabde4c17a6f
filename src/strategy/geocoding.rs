//! Geocoding: derives a point from address-like source columns.
//!
//! The parameters name which source column supplies each address component
//! (`sources`) and the constant used when a component has no column
//! (`defaults`). Every source column must be referenced from `sources`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    ColumnRename, ColumnTypes, ComputationStrategy, ParameterSchema, check_source_column_count,
    check_source_column_type, decode_parameters, require_source_columns,
};
use crate::{
    definition::{JsonObject, StrategyDefinition, StrategyType},
    error::{DecodeError, ValidationError},
    schema::{ColumnName, ColumnType},
};

pub const SUPPORTED_VERSIONS: &[&str] = &["v1"];
const DEFAULT_COUNTRY: &str = "US";
const SOURCES_FIELD: &str = "sources";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeocodingSources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subregion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl GeocodingSources {
    /// `(component, column)` pairs for every component bound to a column.
    pub fn components(&self) -> Vec<(&'static str, &str)> {
        [
            ("address", &self.address),
            ("locality", &self.locality),
            ("subregion", &self.subregion),
            ("region", &self.region),
            ("postal_code", &self.postal_code),
            ("country", &self.country),
        ]
        .into_iter()
        .filter_map(|(component, column)| column.as_deref().map(|c| (component, c)))
        .collect()
    }

    /// Distinct referenced column names, in component order.
    pub fn referenced_columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = Vec::new();
        for (_, column) in self.components() {
            if !columns.contains(&column) {
                columns.push(column);
            }
        }
        columns
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeocodingDefaults {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub subregion: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

impl Default for GeocodingDefaults {
    fn default() -> Self {
        GeocodingDefaults {
            address: None,
            locality: None,
            subregion: None,
            region: None,
            postal_code: None,
            country: default_country(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodingParameters {
    pub sources: GeocodingSources,
    #[serde(default)]
    pub defaults: GeocodingDefaults,
    pub version: String,
}

impl ParameterSchema for GeocodingParameters {
    const REQUIRED_FIELDS: &'static [&'static str] = &["sources", "version"];
}

impl GeocodingParameters {
    fn check_version(&self) -> Result<(), ValidationError> {
        if SUPPORTED_VERSIONS.contains(&self.version.as_str()) {
            return Ok(());
        }
        Err(ValidationError::InvalidStrategyParameters(DecodeError::invalid(
            "$.parameters.version",
            format!(
                "unsupported geocoding version '{}', expected one of: {}",
                self.version,
                SUPPORTED_VERSIONS.join(", ")
            ),
        )))
    }
}

fn accepted_types(component: &str) -> &'static [ColumnType] {
    match component {
        "postal_code" => &[ColumnType::Text, ColumnType::Number],
        _ => &[ColumnType::Text],
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GeocodingStrategy;

impl ComputationStrategy for GeocodingStrategy {
    fn strategy_type(&self) -> StrategyType {
        StrategyType::Geocoding
    }

    fn target_column_type(&self) -> ColumnType {
        ColumnType::Point
    }

    fn validate_definition(
        &self,
        definition: &StrategyDefinition<ColumnName>,
        columns: Option<&ColumnTypes>,
    ) -> Result<(), ValidationError> {
        self.check_strategy_type(definition)?;
        let parameters: GeocodingParameters = decode_parameters(definition)?;
        parameters.check_version()?;

        let Some(columns) = columns else {
            return Ok(());
        };
        let sources = require_source_columns(definition)?;
        let referenced = parameters.sources.referenced_columns();
        check_source_column_count(sources.len(), referenced.len())?;
        for (component, column) in parameters.sources.components() {
            if !sources.iter().any(|source| source.as_str() == column) {
                return Err(ValidationError::unknown_column(column));
            }
            check_source_column_type(column, columns, accepted_types(component))?;
        }
        Ok(())
    }

    fn transform_parameters(
        &self,
        parameters: Option<JsonObject>,
        rename: &ColumnRename<'_>,
    ) -> Result<Option<JsonObject>, ValidationError> {
        let Some(mut parameters) = parameters else {
            return Ok(None);
        };
        if let Some(Value::Object(sources)) = parameters.get_mut(SOURCES_FIELD) {
            for column in sources.values_mut() {
                if let Value::String(name) = column {
                    *column = rename(name)?;
                }
            }
        }
        Ok(Some(parameters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn definition(sources: &[&str], parameters: Value) -> StrategyDefinition<ColumnName> {
        StrategyDefinition::new(StrategyType::Geocoding)
            .with_source_columns(sources.iter().copied())
            .with_parameters(parameters.as_object().cloned().unwrap_or_default())
    }

    fn columns() -> ColumnTypes {
        ColumnTypes::from([
            (ColumnName::new("street"), ColumnType::Text),
            (ColumnName::new("city"), ColumnType::Text),
            (ColumnName::new("zip"), ColumnType::Number),
            (ColumnName::new("flag"), ColumnType::Boolean),
        ])
    }

    #[test]
    fn defaults_fill_country() {
        let parameters: GeocodingParameters =
            serde_json::from_value(json!({"sources": {}, "version": "v1"})).unwrap();
        assert_eq!(parameters.defaults.country, "US");
    }

    #[test]
    fn accepts_numeric_postal_code() {
        let definition = definition(
            &["street", "zip"],
            json!({"sources": {"address": "street", "postal_code": "zip"}, "version": "v1"}),
        );
        assert_eq!(GeocodingStrategy.validate_with_columns(&definition, &columns()), Ok(()));
    }

    #[test]
    fn rejects_unsupported_version() {
        let definition = definition(&["street"], json!({"sources": {"address": "street"}, "version": "v9"}));
        let err = GeocodingStrategy.validate(&definition).unwrap_err();
        assert!(err.to_string().contains("unsupported geocoding version 'v9'"));
    }

    #[test]
    fn source_count_follows_referenced_columns() {
        let definition = definition(
            &["street", "city"],
            json!({"sources": {"address": "street"}, "version": "v1"}),
        );
        assert_eq!(
            GeocodingStrategy.validate_with_columns(&definition, &columns()),
            Err(ValidationError::WrongNumberOfSourceColumns {
                received: 2,
                expected: 1
            })
        );
    }

    #[test]
    fn referenced_column_must_be_a_source() {
        let definition = definition(
            &["street"],
            json!({"sources": {"locality": "city"}, "version": "v1"}),
        );
        assert_eq!(
            GeocodingStrategy.validate_with_columns(&definition, &columns()),
            Err(ValidationError::UnknownSourceColumn("city".to_string()))
        );
    }

    #[test]
    fn address_component_must_be_text() {
        let definition = definition(
            &["flag"],
            json!({"sources": {"address": "flag"}, "version": "v1"}),
        );
        assert_eq!(
            GeocodingStrategy.validate_with_columns(&definition, &columns()),
            Err(ValidationError::WrongSourceColumnType {
                column_name: "flag".to_string(),
                received: ColumnType::Boolean,
                expected: ColumnType::Text,
            })
        );
    }

    #[test]
    fn shared_column_counts_once() {
        let sources: GeocodingSources =
            serde_json::from_value(json!({"address": "street", "locality": "street"})).unwrap();
        assert_eq!(sources.referenced_columns(), vec!["street"]);
        assert_eq!(sources.components().len(), 2);
    }

    #[test]
    fn unknown_source_component_is_invalid() {
        let definition = definition(&[], json!({"sources": {"planet": "earth"}, "version": "v1"}));
        assert!(matches!(
            GeocodingStrategy.validate(&definition),
            Err(ValidationError::InvalidStrategyParameters(_))
        ));
    }
}
