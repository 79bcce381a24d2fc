//! The structural contract of an OpenWeather current-weather response.

use std::{fmt, sync::LazyLock};

use jsonschema::Validator;
use serde_json::{Value, json};

/// One way in which a body breaks the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// JSON pointer to the offending value; empty for the document root.
    pub path: String,
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { self.path.as_str() };
        write!(f, "{path}: {}", self.message)
    }
}

/// Raw JSON Schema document for the current-weather payload.
pub fn current_weather_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "coord": {
                "type": "object",
                "properties": {
                    "lon": {"type": "number"},
                    "lat": {"type": "number"}
                }
            },
            "weather": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "integer"},
                        "main": {"type": "string"},
                        "description": {"type": "string"}
                    }
                }
            },
            "name": {"type": "string"},
            "cod": {"type": "integer"}
        },
        "required": ["coord", "weather", "name", "cod"]
    })
}

static VALIDATOR: LazyLock<Result<Validator, String>> = LazyLock::new(|| {
    jsonschema::validator_for(&current_weather_schema()).map_err(|e| e.to_string())
});

/// Validate `instance` against the current-weather schema, returning every violation.
pub fn check(instance: &Value) -> Vec<SchemaViolation> {
    match VALIDATOR.as_ref() {
        Ok(validator) => validator
            .iter_errors(instance)
            .map(|e| SchemaViolation {
                path: e.instance_path.to_string(),
                message: e.to_string(),
            })
            .collect(),
        Err(reason) => vec![SchemaViolation {
            path: String::new(),
            message: format!("schema failed to compile: {reason}"),
        }],
    }
}
