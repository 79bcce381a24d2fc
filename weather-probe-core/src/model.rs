use std::{fmt, time::Duration};

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::ProbeError;

/// Parameters of one current-weather request.
#[derive(Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    city: String,
    api_key: String,
}

impl ProbeRequest {
    /// Both values are trimmed and must be non-empty.
    pub fn new(city: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ProbeError> {
        let city = city.into().trim().to_string();
        let api_key = api_key.into().trim().to_string();

        if city.is_empty() {
            return Err(ProbeError::InvalidRequest("city must not be empty".into()));
        }
        if api_key.is_empty() {
            return Err(ProbeError::InvalidRequest("API key must not be empty".into()));
        }

        Ok(Self { city, api_key })
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

// The key is a secret; keep it out of logs and panic messages.
impl fmt::Debug for ProbeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeRequest")
            .field("city", &self.city)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// A completed HTTP response, as seen by the validator.
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub status: u16,
    pub elapsed: Duration,
    pub body: String,
    pub received_at: DateTime<Utc>,
}

impl ProbeResponse {
    pub fn new(status: u16, elapsed: Duration, body: impl Into<String>) -> Self {
        Self { status, elapsed, body: body.into(), received_at: Utc::now() }
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.body)
    }
}

/// The subset of the current-weather payload the probe reports on.
///
/// Every field is optional so that a partial body still yields whatever
/// values it does carry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherSnapshot {
    pub name: Option<String>,
    pub cod: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub main: Option<String>,
    pub description: Option<String>,
}

impl WeatherSnapshot {
    pub fn from_json(body: &Value) -> Self {
        let first = body.pointer("/weather/0");

        Self {
            name: body.get("name").and_then(Value::as_str).map(str::to_owned),
            cod: body.get("cod").and_then(Value::as_i64),
            latitude: body.pointer("/coord/lat").and_then(Value::as_f64),
            longitude: body.pointer("/coord/lon").and_then(Value::as_f64),
            main: first
                .and_then(|w| w.get("main"))
                .and_then(Value::as_str)
                .map(str::to_owned),
            description: first
                .and_then(|w| w.get("description"))
                .and_then(Value::as_str)
                .map(str::to_owned),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_rejects_blank_city_and_key() {
        let err = ProbeRequest::new("  ", "KEY").unwrap_err();
        assert!(err.to_string().contains("city must not be empty"));

        let err = ProbeRequest::new("London", "").unwrap_err();
        assert!(err.to_string().contains("API key must not be empty"));
    }

    #[test]
    fn request_debug_hides_api_key() {
        let req = ProbeRequest::new("London", "super-secret").unwrap();
        let dbg = format!("{req:?}");

        assert!(dbg.contains("London"));
        assert!(!dbg.contains("super-secret"));
    }

    #[test]
    fn snapshot_extracts_known_fields() {
        let body = json!({
            "coord": {"lon": -0.1257, "lat": 51.5085},
            "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds"}],
            "name": "London",
            "cod": 200
        });

        let snap = WeatherSnapshot::from_json(&body);
        assert_eq!(snap.name.as_deref(), Some("London"));
        assert_eq!(snap.cod, Some(200));
        assert_eq!(snap.latitude, Some(51.5085));
        assert_eq!(snap.main.as_deref(), Some("Clouds"));
        assert_eq!(snap.description.as_deref(), Some("broken clouds"));
    }

    #[test]
    fn snapshot_of_partial_body_is_sparse() {
        let snap = WeatherSnapshot::from_json(&json!({"cod": "404", "message": "city not found"}));
        assert_eq!(snap, WeatherSnapshot::default());
    }
}
