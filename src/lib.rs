//! Validation and rewriting of computed-column strategy definitions.
//!
//! A [`StrategyDefinition`] says how a column's values are derived from other
//! columns. [`codec`] reads definitions from either wire shape,
//! [`registry`] validates them against the rules of their strategy, and
//! [`registry::transform`] swaps user-facing column names for internal ids.
//!
//! ```
//! use std::collections::HashMap;
//!
//! use computation_strategies::{ColumnId, ColumnName, codec, registry};
//!
//! let definition = codec::from_json_str::<ColumnName>(
//!     r#"{"strategy_type": "test", "source_columns": ["name"], "parameters": {"concat_text": "!"}}"#,
//! )?;
//! registry::validate(&definition)?;
//!
//! let ids = HashMap::from([(ColumnName::new("name"), ColumnId(4))]);
//! let transformed = registry::transform(definition, &ids)?;
//! assert_eq!(transformed.source_columns, Some(vec![ColumnId(4)]));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod codec;
pub mod columns;
pub mod definition;
pub mod error;
pub mod registry;
pub mod schema;
pub mod strategy;

pub use definition::{ComputationStrategyInfo, JsonObject, StrategyDefinition, StrategyType};
pub use error::{DecodeError, ValidationError};
pub use schema::{ColumnId, ColumnName, ColumnType};
pub use strategy::{ColumnTypes, ComputationStrategy, ParameterSchema};
