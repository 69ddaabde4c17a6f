//! Test strategy: concatenates text source columns with a fixed suffix.
//! Used to exercise the computation pipeline without external services.

use serde::{Deserialize, Serialize};

use super::{
    ColumnTypes, ComputationStrategy, ParameterSchema, check_source_column_type,
    decode_parameters, require_source_columns,
};
use crate::{
    definition::{StrategyDefinition, StrategyType},
    error::ValidationError,
    schema::{ColumnName, ColumnType},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestParameters {
    pub concat_text: String,
}

impl ParameterSchema for TestParameters {
    const REQUIRED_FIELDS: &'static [&'static str] = &["concat_text"];
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TestStrategy;

impl ComputationStrategy for TestStrategy {
    fn strategy_type(&self) -> StrategyType {
        StrategyType::Test
    }

    fn target_column_type(&self) -> ColumnType {
        ColumnType::Text
    }

    fn validate_definition(
        &self,
        definition: &StrategyDefinition<ColumnName>,
        columns: Option<&ColumnTypes>,
    ) -> Result<(), ValidationError> {
        self.check_strategy_type(definition)?;
        decode_parameters::<TestParameters, _>(definition)?;

        if let Some(columns) = columns {
            for source in require_source_columns(definition)? {
                check_source_column_type(source.as_str(), columns, &[ColumnType::Text])?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn definition(sources: Option<&[&str]>) -> StrategyDefinition<ColumnName> {
        let mut definition = StrategyDefinition::new(StrategyType::Test)
            .with_parameters(json!({"concat_text": "-suffix"}).as_object().cloned().unwrap());
        if let Some(sources) = sources {
            definition = definition.with_source_columns(sources.iter().copied());
        }
        definition
    }

    #[test]
    fn any_number_of_text_columns_is_accepted() {
        let columns = ColumnTypes::from([
            (ColumnName::new("a"), ColumnType::Text),
            (ColumnName::new("b"), ColumnType::Text),
            (ColumnName::new("c"), ColumnType::Text),
        ]);
        assert_eq!(
            TestStrategy.validate_with_columns(&definition(Some(&["a", "b", "c"][..])), &columns),
            Ok(())
        );
    }

    #[test]
    fn missing_sources_only_reported_with_columns() {
        let definition = definition(None);
        assert_eq!(TestStrategy.validate(&definition), Ok(()));
        assert_eq!(
            TestStrategy.validate_with_columns(&definition, &ColumnTypes::new()),
            Err(ValidationError::MissingSourceColumns(StrategyType::Test))
        );
    }

    #[test]
    fn unlisted_column_is_unknown_not_a_panic() {
        let columns = ColumnTypes::from([(ColumnName::new("a"), ColumnType::Text)]);
        assert_eq!(
            TestStrategy.validate_with_columns(&definition(Some(&["a", "ghost"][..])), &columns),
            Err(ValidationError::UnknownSourceColumn("ghost".to_string()))
        );
    }
}
