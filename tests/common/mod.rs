#![allow(dead_code)]

use std::sync::OnceLock;

use computation_strategies::{ColumnName, ColumnType, ColumnTypes, JsonObject};
use serde_json::Value;

static LOGGER: OnceLock<()> = OnceLock::new();

/// Installs `env_logger` once per test binary; `RUST_LOG` controls verbosity.
pub fn init_logging() {
    LOGGER.get_or_init(|| {
        let _ = env_logger::Builder::from_env(env_logger::Env::default())
            .is_test(true)
            .format_timestamp_millis()
            .try_init();
    });
}

/// Unwraps a `json!` object literal into parameters.
pub fn object(value: Value) -> JsonObject {
    match value {
        Value::Object(map) => map,
        other => panic!("Expected a JSON object, got {other}"),
    }
}

/// Column types of a small address dataset used across tests.
pub fn dataset_columns() -> ColumnTypes {
    [
        ("street", ColumnType::Text),
        ("city", ColumnType::Text),
        ("state", ColumnType::Text),
        ("zip", ColumnType::Number),
        ("location", ColumnType::Point),
        ("ward", ColumnType::Text),
        ("opened", ColumnType::FloatingTimestamp),
    ]
    .into_iter()
    .map(|(name, ty)| (ColumnName::new(name), ty))
    .collect()
}
