//! Wire codec for [`StrategyDefinition`].
//!
//! Two historical conventions name the strategy tag differently: the
//! canonical shape uses `type`, the older one `strategy_type`. Both shapes are
//! tried in that order and the first match wins; when neither matches, the
//! returned [`DecodeError::NoMatchingShape`] carries both failures. Encoding
//! always emits the canonical shape.

use log::debug;
use serde::{Deserialize, Deserializer, Serialize, de, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    definition::{StrategyDefinition, StrategyType},
    error::DecodeError,
};

/// Tag field names, in matching order.
pub const TAG_FIELDS: [&str; 2] = ["type", "strategy_type"];
pub const SOURCE_COLUMNS_FIELD: &str = "source_columns";
pub const PARAMETERS_FIELD: &str = "parameters";

const ROOT: &str = "$";

/// Decodes a document, reading column references with `decode_column`.
///
/// The decoder receives each element of `source_columns` together with its
/// path, so its errors point at the offending entry.
pub fn decode_with<C, F>(document: &Value, decode_column: F) -> Result<StrategyDefinition<C>, DecodeError>
where
    F: Fn(&Value, &str) -> Result<C, DecodeError>,
{
    let mut failures = Vec::with_capacity(TAG_FIELDS.len());
    for (position, tag_field) in TAG_FIELDS.iter().enumerate() {
        match decode_shape(document, tag_field, &decode_column) {
            Ok(definition) => {
                if position > 0 {
                    debug!(
                        "Decoded '{}' strategy definition using legacy tag field '{tag_field}'",
                        definition.typ
                    );
                }
                return Ok(definition);
            }
            Err(err) => failures.push(err),
        }
    }
    Err(DecodeError::NoMatchingShape(failures))
}

/// Decodes a document whose column references deserialize with serde.
pub fn decode<C: DeserializeOwned>(document: &Value) -> Result<StrategyDefinition<C>, DecodeError> {
    decode_with(document, deserialize_column)
}

pub fn from_json_str<C: DeserializeOwned>(input: &str) -> Result<StrategyDefinition<C>, DecodeError> {
    let document: Value =
        serde_json::from_str(input).map_err(|err| DecodeError::invalid(ROOT, err))?;
    decode(&document)
}

pub fn from_yaml_str<C: DeserializeOwned>(input: &str) -> Result<StrategyDefinition<C>, DecodeError> {
    let document: Value =
        serde_yaml::from_str(input).map_err(|err| DecodeError::invalid(ROOT, err))?;
    decode(&document)
}

/// Encodes using the canonical field names, omitting absent optional fields.
pub fn encode<C: Serialize>(definition: &StrategyDefinition<C>) -> serde_json::Result<Value> {
    serde_json::to_value(definition)
}

pub fn to_json_string<C: Serialize>(definition: &StrategyDefinition<C>) -> serde_json::Result<String> {
    serde_json::to_string(definition)
}

fn deserialize_column<C: DeserializeOwned>(value: &Value, path: &str) -> Result<C, DecodeError> {
    C::deserialize(value).map_err(|err| DecodeError::invalid(path, err))
}

fn decode_shape<C, F>(
    document: &Value,
    tag_field: &str,
    decode_column: &F,
) -> Result<StrategyDefinition<C>, DecodeError>
where
    F: Fn(&Value, &str) -> Result<C, DecodeError>,
{
    let object = document
        .as_object()
        .ok_or_else(|| DecodeError::wrong_type(ROOT, "object", document))?;

    let tag_path = format!("{ROOT}.{tag_field}");
    let typ = match object.get(tag_field) {
        None | Some(Value::Null) => return Err(DecodeError::missing_field(ROOT, tag_field)),
        Some(Value::String(tag)) => tag
            .parse::<StrategyType>()
            .map_err(|err| DecodeError::invalid(&tag_path, err))?,
        Some(other) => return Err(DecodeError::wrong_type(&tag_path, "string", other)),
    };

    let columns_path = format!("{ROOT}.{SOURCE_COLUMNS_FIELD}");
    let source_columns = match object.get(SOURCE_COLUMNS_FIELD) {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .enumerate()
                .map(|(idx, item)| decode_column(item, &format!("{columns_path}[{idx}]")))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Some(other) => return Err(DecodeError::wrong_type(&columns_path, "array", other)),
    };

    let parameters = match object.get(PARAMETERS_FIELD) {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(map.clone()),
        Some(other) => {
            return Err(DecodeError::wrong_type(
                &format!("{ROOT}.{PARAMETERS_FIELD}"),
                "object",
                other,
            ));
        }
    };

    Ok(StrategyDefinition {
        typ,
        source_columns,
        parameters,
    })
}

impl<'de, C: DeserializeOwned> Deserialize<'de> for StrategyDefinition<C> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let document = Value::deserialize(deserializer)?;
        decode(&document).map_err(de::Error::custom)
    }
}
