//! Fixed table from [`StrategyType`] to the strategy that handles it, and the
//! crate-level entry points that dispatch through it.
//!
//! The table is total over [`StrategyType`]: the legacy `georegion` tag
//! resolves to the same instance as `georegion_match_on_point`.

use std::{borrow::Borrow, collections::HashMap, fmt::Display, hash::Hash};

use log::debug;
use serde::Serialize;

use crate::{
    definition::{StrategyDefinition, StrategyType},
    error::ValidationError,
    schema::{ColumnName, ColumnType},
    strategy::{
        self, ColumnTypes, ComputationStrategy, GeocodingStrategy, RegionMatchOnPointStrategy,
        RegionMatchOnStringStrategy, TestStrategy,
    },
};

static GEOCODING: GeocodingStrategy = GeocodingStrategy;
static REGION_MATCH_ON_POINT: RegionMatchOnPointStrategy = RegionMatchOnPointStrategy;
static REGION_MATCH_ON_STRING: RegionMatchOnStringStrategy = RegionMatchOnStringStrategy;
static TEST: TestStrategy = TestStrategy;

pub fn strategy_for(typ: StrategyType) -> &'static dyn ComputationStrategy {
    match typ {
        StrategyType::Geocoding => &GEOCODING,
        StrategyType::GeoRegionMatchOnPoint | StrategyType::GeoRegion => &REGION_MATCH_ON_POINT,
        StrategyType::GeoRegionMatchOnString => &REGION_MATCH_ON_STRING,
        StrategyType::Test => &TEST,
    }
}

/// Every registered tag with its strategy, aliases included.
pub fn registered() -> impl Iterator<Item = (StrategyType, &'static dyn ComputationStrategy)> {
    StrategyType::ALL
        .into_iter()
        .map(|typ| (typ, strategy_for(typ)))
}

fn dispatch(typ: StrategyType) -> &'static dyn ComputationStrategy {
    let strategy = strategy_for(typ);
    debug!(
        "Dispatching '{typ}' definition to '{}' strategy",
        strategy.strategy_type()
    );
    strategy
}

pub fn validate(definition: &StrategyDefinition<ColumnName>) -> Result<(), ValidationError> {
    dispatch(definition.typ).validate(definition)
}

pub fn validate_with_columns(
    definition: &StrategyDefinition<ColumnName>,
    columns: &ColumnTypes,
) -> Result<(), ValidationError> {
    dispatch(definition.typ).validate_with_columns(definition, columns)
}

pub fn transform<CN, CI>(
    definition: StrategyDefinition<CN>,
    columns: &HashMap<CN, CI>,
) -> Result<StrategyDefinition<CI>, ValidationError>
where
    CN: Borrow<str> + Eq + Hash + Display,
    CI: Clone + Serialize,
{
    strategy::transform(dispatch(definition.typ), definition, columns)
}

/// Checks the declared type of the column a definition computes.
pub fn check_target_column_type<C>(
    definition: &StrategyDefinition<C>,
    declared: ColumnType,
) -> Result<(), ValidationError> {
    let expected = strategy_for(definition.typ).target_column_type();
    if declared == expected {
        Ok(())
    } else {
        Err(ValidationError::WrongTargetColumnType {
            received: declared,
            expected,
        })
    }
}
