//! Region matching: resolves which feature of a region dataset contains a
//! point, or carries a given string, and yields that feature's key.

use serde::{Deserialize, Serialize};

use super::{
    ColumnTypes, ComputationStrategy, ParameterSchema, check_source_column_count,
    check_source_column_type, decode_parameters, require_non_blank, require_source_columns,
};
use crate::{
    definition::{StrategyDefinition, StrategyType},
    error::ValidationError,
    schema::{ColumnName, ColumnType},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionMatchOnPointParameters {
    /// Resource name of the region dataset.
    pub region: String,
    pub primary_key: String,
}

impl ParameterSchema for RegionMatchOnPointParameters {
    const REQUIRED_FIELDS: &'static [&'static str] = &["region", "primary_key"];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionMatchOnStringParameters {
    pub region: String,
    /// Column of the region dataset compared against the source value.
    pub column: String,
    pub primary_key: String,
}

impl ParameterSchema for RegionMatchOnStringParameters {
    const REQUIRED_FIELDS: &'static [&'static str] = &["region", "column", "primary_key"];
}

/// Both region strategies read exactly one source column of a fixed type.
fn check_single_source(
    definition: &StrategyDefinition<ColumnName>,
    columns: &ColumnTypes,
    expected: ColumnType,
) -> Result<(), ValidationError> {
    let sources = require_source_columns(definition)?;
    check_source_column_count(sources.len(), 1)?;
    check_source_column_type(sources[0].as_str(), columns, &[expected])
}

/// Registered for `georegion_match_on_point` and its legacy tag `georegion`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionMatchOnPointStrategy;

impl ComputationStrategy for RegionMatchOnPointStrategy {
    fn strategy_type(&self) -> StrategyType {
        StrategyType::GeoRegionMatchOnPoint
    }

    fn accepts_strategy_type(&self, candidate: StrategyType) -> bool {
        matches!(
            candidate,
            StrategyType::GeoRegionMatchOnPoint | StrategyType::GeoRegion
        )
    }

    fn target_column_type(&self) -> ColumnType {
        ColumnType::Number
    }

    fn validate_definition(
        &self,
        definition: &StrategyDefinition<ColumnName>,
        columns: Option<&ColumnTypes>,
    ) -> Result<(), ValidationError> {
        self.check_strategy_type(definition)?;
        let parameters: RegionMatchOnPointParameters = decode_parameters(definition)?;
        require_non_blank("region", &parameters.region)?;
        require_non_blank("primary_key", &parameters.primary_key)?;
        match columns {
            Some(columns) => check_single_source(definition, columns, ColumnType::Point),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RegionMatchOnStringStrategy;

impl ComputationStrategy for RegionMatchOnStringStrategy {
    fn strategy_type(&self) -> StrategyType {
        StrategyType::GeoRegionMatchOnString
    }

    fn target_column_type(&self) -> ColumnType {
        ColumnType::Number
    }

    fn validate_definition(
        &self,
        definition: &StrategyDefinition<ColumnName>,
        columns: Option<&ColumnTypes>,
    ) -> Result<(), ValidationError> {
        self.check_strategy_type(definition)?;
        let parameters: RegionMatchOnStringParameters = decode_parameters(definition)?;
        require_non_blank("region", &parameters.region)?;
        require_non_blank("column", &parameters.column)?;
        require_non_blank("primary_key", &parameters.primary_key)?;
        match columns {
            Some(columns) => check_single_source(definition, columns, ColumnType::Text),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn definition(typ: StrategyType, sources: &[&str], parameters: Value) -> StrategyDefinition<ColumnName> {
        StrategyDefinition::new(typ)
            .with_source_columns(sources.iter().copied())
            .with_parameters(parameters.as_object().cloned().unwrap_or_default())
    }

    fn columns() -> ColumnTypes {
        ColumnTypes::from([
            (ColumnName::new("location"), ColumnType::Point),
            (ColumnName::new("ward_name"), ColumnType::Text),
        ])
    }

    #[test]
    fn point_strategy_accepts_legacy_tag() {
        let definition = definition(
            StrategyType::GeoRegion,
            &["location"],
            json!({"region": "_wards", "primary_key": "_feature_id"}),
        );
        assert_eq!(
            RegionMatchOnPointStrategy.validate_with_columns(&definition, &columns()),
            Ok(())
        );
    }

    #[test]
    fn point_strategy_rejects_string_tag() {
        let definition = definition(
            StrategyType::GeoRegionMatchOnString,
            &["location"],
            json!({"region": "_wards", "primary_key": "_feature_id"}),
        );
        assert_eq!(
            RegionMatchOnPointStrategy.validate(&definition),
            Err(ValidationError::WrongStrategyType {
                received: StrategyType::GeoRegionMatchOnString,
                expected: StrategyType::GeoRegionMatchOnPoint,
            })
        );
    }

    #[test]
    fn point_strategy_requires_single_point_column() {
        let parameters = json!({"region": "_wards", "primary_key": "_feature_id"});
        let two = definition(
            StrategyType::GeoRegionMatchOnPoint,
            &["location", "ward_name"],
            parameters.clone(),
        );
        assert_eq!(
            RegionMatchOnPointStrategy.validate_with_columns(&two, &columns()),
            Err(ValidationError::WrongNumberOfSourceColumns {
                received: 2,
                expected: 1
            })
        );

        let text = definition(StrategyType::GeoRegionMatchOnPoint, &["ward_name"], parameters);
        assert_eq!(
            RegionMatchOnPointStrategy.validate_with_columns(&text, &columns()),
            Err(ValidationError::WrongSourceColumnType {
                column_name: "ward_name".to_string(),
                received: ColumnType::Text,
                expected: ColumnType::Point,
            })
        );
    }

    #[test]
    fn string_strategy_reports_missing_column_field() {
        let definition = definition(
            StrategyType::GeoRegionMatchOnString,
            &["ward_name"],
            json!({"region": "_wards", "primary_key": "_feature_id"}),
        );
        assert_eq!(
            RegionMatchOnStringStrategy.validate(&definition),
            Err(ValidationError::MissingParameterField("column".to_string()))
        );
    }

    #[test]
    fn blank_region_is_invalid() {
        let definition = definition(
            StrategyType::GeoRegionMatchOnString,
            &["ward_name"],
            json!({"region": "  ", "column": "name", "primary_key": "_feature_id"}),
        );
        let err = RegionMatchOnStringStrategy.validate(&definition).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid strategy parameters: $.parameters.region: must not be blank"
        );
    }
}
