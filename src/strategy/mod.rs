//! The contract every computation strategy implements, plus the shared
//! checks concrete strategies compose into their validation hook.

pub mod geocoding;
pub mod region_match;
pub mod test_strategy;

use std::{borrow::Borrow, collections::HashMap, fmt::Display, hash::Hash};

use log::trace;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    columns::{lookup, lookup_optional},
    definition::{JsonObject, StrategyDefinition, StrategyType},
    error::{DecodeError, ValidationError},
    schema::{ColumnName, ColumnType},
};

pub use geocoding::GeocodingStrategy;
pub use region_match::{RegionMatchOnPointStrategy, RegionMatchOnStringStrategy};
pub use test_strategy::TestStrategy;

/// Declared types of the columns a definition may reference, keyed by name.
pub type ColumnTypes = HashMap<ColumnName, ColumnType>;

/// Maps a column name embedded in parameters to its serialized identifier.
pub type ColumnRename<'a> = dyn Fn(&str) -> Result<Value, ValidationError> + 'a;

/// Parameter shape of a strategy, decoded from the definition's `parameters`.
pub trait ParameterSchema: DeserializeOwned {
    /// Fields that must be present in the parameters object.
    const REQUIRED_FIELDS: &'static [&'static str];

    fn required_fields() -> Vec<String> {
        Self::REQUIRED_FIELDS.iter().map(|f| f.to_string()).collect()
    }
}

pub trait ComputationStrategy: Send + Sync {
    /// Canonical tag this strategy is registered under.
    fn strategy_type(&self) -> StrategyType;

    fn accepts_strategy_type(&self, candidate: StrategyType) -> bool {
        candidate == self.strategy_type()
    }

    /// Type the computed column must be declared with.
    fn target_column_type(&self) -> ColumnType;

    /// Validates without knowledge of the dataset's columns.
    fn validate(&self, definition: &StrategyDefinition<ColumnName>) -> Result<(), ValidationError> {
        self.validate_definition(definition, None)
    }

    /// Validates, additionally checking source columns against their declared types.
    fn validate_with_columns(
        &self,
        definition: &StrategyDefinition<ColumnName>,
        columns: &ColumnTypes,
    ) -> Result<(), ValidationError> {
        self.validate_definition(definition, Some(columns))
    }

    /// Strategy-specific checks. Column-count and column-type checks run only
    /// when `columns` is present; the first failure is returned.
    fn validate_definition(
        &self,
        definition: &StrategyDefinition<ColumnName>,
        columns: Option<&ColumnTypes>,
    ) -> Result<(), ValidationError>;

    /// Rewrites column references embedded in parameters. Parameters without
    /// column references pass through unchanged.
    fn transform_parameters(
        &self,
        parameters: Option<JsonObject>,
        _rename: &ColumnRename<'_>,
    ) -> Result<Option<JsonObject>, ValidationError> {
        Ok(parameters)
    }

    fn check_strategy_type<C>(&self, definition: &StrategyDefinition<C>) -> Result<(), ValidationError>
    where
        Self: Sized,
    {
        if self.accepts_strategy_type(definition.typ) {
            Ok(())
        } else {
            Err(ValidationError::WrongStrategyType {
                received: definition.typ,
                expected: self.strategy_type(),
            })
        }
    }
}

/// Replaces column names with identifiers in a definition handled by `strategy`.
///
/// Source columns are rewritten first, failing on the first name absent from
/// `columns`; parameters are then handed to the strategy's parameter hook.
pub fn transform<CN, CI>(
    strategy: &dyn ComputationStrategy,
    definition: StrategyDefinition<CN>,
    columns: &HashMap<CN, CI>,
) -> Result<StrategyDefinition<CI>, ValidationError>
where
    CN: Borrow<str> + Eq + Hash + Display,
    CI: Clone + Serialize,
{
    let StrategyDefinition {
        typ,
        source_columns,
        parameters,
    } = definition;

    let source_columns = lookup_optional(source_columns.as_deref(), columns, |name: &CN| {
        ValidationError::unknown_column(name)
    })?;

    let rename = |name: &str| -> Result<Value, ValidationError> {
        let id = lookup(name, columns, |missing: &str| {
            ValidationError::unknown_column(missing)
        })?;
        trace!("Renaming parameter column reference '{name}'");
        serde_json::to_value(id).map_err(|err| {
            ValidationError::InvalidStrategyParameters(DecodeError::invalid("$.parameters", err))
        })
    };
    let parameters = strategy.transform_parameters(parameters, &rename)?;

    Ok(StrategyDefinition {
        typ,
        source_columns,
        parameters,
    })
}

/// Decodes the definition's parameters into `P`.
///
/// Absent parameters report the whole schema; a required field that is
/// absent or null reports that field; anything else that fails to decode is
/// an invalid-parameters error.
pub fn decode_parameters<P, C>(definition: &StrategyDefinition<C>) -> Result<P, ValidationError>
where
    P: ParameterSchema,
{
    let Some(parameters) = definition.parameters.as_ref() else {
        return Err(ValidationError::MissingParameters {
            required: P::required_fields(),
        });
    };
    if let Some(missing) = P::REQUIRED_FIELDS
        .iter()
        .find(|field| parameters.get(**field).is_none_or(Value::is_null))
    {
        return Err(ValidationError::MissingParameterField(missing.to_string()));
    }
    serde_json::from_value(Value::Object(parameters.clone())).map_err(|err| {
        ValidationError::InvalidStrategyParameters(DecodeError::invalid("$.parameters", err))
    })
}

/// Returns the supplied source columns, treating an absent or empty list as missing.
pub fn require_source_columns(
    definition: &StrategyDefinition<ColumnName>,
) -> Result<&[ColumnName], ValidationError> {
    match definition.source_columns.as_deref() {
        Some(sources) if !sources.is_empty() => Ok(sources),
        _ => Err(ValidationError::MissingSourceColumns(definition.typ)),
    }
}

pub fn check_source_column_count(received: usize, expected: usize) -> Result<(), ValidationError> {
    if received == expected {
        Ok(())
    } else {
        Err(ValidationError::WrongNumberOfSourceColumns { received, expected })
    }
}

/// Checks that `name` is declared with one of the `accepted` types.
///
/// Names missing from `columns` are reported as unknown rather than looked up.
/// The first accepted type is the one named in a mismatch.
pub fn check_source_column_type(
    name: &str,
    columns: &ColumnTypes,
    accepted: &[ColumnType],
) -> Result<(), ValidationError> {
    let declared = columns
        .get(name)
        .copied()
        .ok_or_else(|| ValidationError::unknown_column(name))?;
    if accepted.contains(&declared) {
        return Ok(());
    }
    Err(ValidationError::WrongSourceColumnType {
        column_name: name.to_string(),
        received: declared,
        expected: accepted.first().copied().unwrap_or(declared),
    })
}

pub(crate) fn require_non_blank(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::InvalidStrategyParameters(
            DecodeError::invalid(&format!("$.parameters.{field}"), "must not be blank"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[allow(dead_code)]
        region: String,
        #[serde(default)]
        #[allow(dead_code)]
        label: Option<String>,
    }

    impl ParameterSchema for Probe {
        const REQUIRED_FIELDS: &'static [&'static str] = &["region"];
    }

    fn definition(parameters: Option<Value>) -> StrategyDefinition<ColumnName> {
        let mut definition = StrategyDefinition::new(StrategyType::Test);
        definition.parameters = parameters.and_then(|p| p.as_object().cloned());
        definition
    }

    #[test]
    fn absent_parameters_report_schema() {
        let err = decode_parameters::<Probe, _>(&definition(None)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingParameters {
                required: vec!["region".to_string()]
            }
        );
    }

    #[test]
    fn null_required_field_is_missing() {
        let err = decode_parameters::<Probe, _>(&definition(Some(json!({"region": null}))))
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingParameterField("region".to_string()));
    }

    #[test]
    fn malformed_parameters_wrap_decode_error() {
        let err = decode_parameters::<Probe, _>(&definition(Some(json!({"region": 5}))))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidStrategyParameters(_)));
    }

    #[test]
    fn empty_source_list_counts_as_missing() {
        let definition = definition(None).with_source_columns(Vec::<ColumnName>::new());
        assert_eq!(
            require_source_columns(&definition),
            Err(ValidationError::MissingSourceColumns(StrategyType::Test))
        );
    }

    #[test]
    fn source_column_type_reports_first_accepted_type() {
        let columns = ColumnTypes::from([(ColumnName::new("zip"), ColumnType::Boolean)]);
        let err = check_source_column_type("zip", &columns, &[ColumnType::Text, ColumnType::Number])
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::WrongSourceColumnType {
                column_name: "zip".to_string(),
                received: ColumnType::Boolean,
                expected: ColumnType::Text,
            }
        );
        assert_eq!(
            check_source_column_type("street", &columns, &[ColumnType::Text]),
            Err(ValidationError::UnknownSourceColumn("street".to_string()))
        );
    }
}
