use std::{fmt, time::Duration};

use serde_json::Value;
use tracing::warn;

use crate::{
    error::{AssertionError, ProbeError},
    model::ProbeResponse,
    schema::{self, SchemaViolation},
};

pub const DEFAULT_CITY: &str = "London";
pub const DEFAULT_MAX_LATENCY: Duration = Duration::from_secs(10);

static NULL: Value = Value::Null;

/// What a healthy response is expected to look like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectations {
    pub city: String,
    pub status: u16,
    pub cod: i64,
    pub max_latency: Duration,
}

impl Default for Expectations {
    fn default() -> Self {
        Self {
            city: DEFAULT_CITY.to_string(),
            status: 200,
            cod: 200,
            max_latency: DEFAULT_MAX_LATENCY,
        }
    }
}

impl Expectations {
    pub fn for_city(city: impl Into<String>) -> Self {
        Self { city: city.into().trim().to_string(), ..Self::default() }
    }

    pub fn with_max_latency(mut self, max_latency: Duration) -> Self {
        self.max_latency = max_latency;
        self
    }
}

/// The individual checks, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    Status,
    Latency,
    Schema,
    CityName,
    Cod,
    Latitude,
    Longitude,
    WeatherMain,
    WeatherDescription,
}

impl Check {
    pub const fn all() -> &'static [Check] {
        &[
            Check::Status,
            Check::Latency,
            Check::Schema,
            Check::CityName,
            Check::Cod,
            Check::Latitude,
            Check::Longitude,
            Check::WeatherMain,
            Check::WeatherDescription,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Check::Status => "status",
            Check::Latency => "latency",
            Check::Schema => "schema",
            Check::CityName => "name",
            Check::Cod => "cod",
            Check::Latitude => "coord.lat",
            Check::Longitude => "coord.lon",
            Check::WeatherMain => "weather[0].main",
            Check::WeatherDescription => "weather[0].description",
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub check: Check,
    pub result: Result<(), AssertionError>,
}

/// Every check's outcome for one response; nothing short-circuits.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    outcomes: Vec<CheckOutcome>,
}

impl ValidationReport {
    pub fn outcomes(&self) -> &[CheckOutcome] {
        &self.outcomes
    }

    pub fn failures(&self) -> impl Iterator<Item = &AssertionError> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }

    pub fn outcome(&self, check: Check) -> Option<&Result<(), AssertionError>> {
        self.outcomes.iter().find(|o| o.check == check).map(|o| &o.result)
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    pub fn into_result(self) -> Result<Self, ProbeError> {
        if self.is_success() { Ok(self) } else { Err(ProbeError::Assertions(self)) }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            match &outcome.result {
                Ok(()) => writeln!(f, "PASS  {}", outcome.check)?,
                Err(AssertionError::SchemaValidation { violations }) => {
                    writeln!(f, "FAIL  {}", outcome.check)?;
                    for v in violations {
                        writeln!(f, "        {v}")?;
                    }
                }
                Err(err) => writeln!(f, "FAIL  {}: {err}", outcome.check)?,
            }
        }
        Ok(())
    }
}

/// Evaluates a [`ProbeResponse`] against fixed [`Expectations`].
#[derive(Debug, Clone, Default)]
pub struct ResponseValidator {
    expectations: Expectations,
}

impl ResponseValidator {
    pub fn new(expectations: Expectations) -> Self {
        Self { expectations }
    }

    pub fn expectations(&self) -> &Expectations {
        &self.expectations
    }

    pub fn validate(&self, response: &ProbeResponse) -> ValidationReport {
        // An unparseable body still runs every check; field checks then report missing fields.
        let parsed = response.json();
        let body = parsed.as_ref().unwrap_or(&NULL);

        let schema = match &parsed {
            Ok(body) => self.check_schema(body),
            Err(e) => Err(AssertionError::SchemaValidation {
                violations: vec![SchemaViolation {
                    path: String::new(),
                    message: format!("body is not valid JSON: {e}"),
                }],
            }),
        };

        let outcomes = Check::all()
            .iter()
            .map(|&check| {
                let result = match check {
                    Check::Status => self.check_status(response.status),
                    Check::Latency => self.check_latency(response.elapsed),
                    Check::Schema => schema.clone(),
                    Check::CityName => self.check_city(body),
                    Check::Cod => self.check_cod(body),
                    Check::Latitude => require_present(body, "/coord/lat", "coord.lat"),
                    Check::Longitude => require_present(body, "/coord/lon", "coord.lon"),
                    Check::WeatherMain => {
                        require_present(body, "/weather/0/main", "weather[0].main")
                    }
                    Check::WeatherDescription => {
                        require_present(body, "/weather/0/description", "weather[0].description")
                    }
                };
                if let Err(err) = &result {
                    warn!(%check, %err, "check failed");
                }
                CheckOutcome { check, result }
            })
            .collect();

        ValidationReport { outcomes }
    }

    fn check_status(&self, status: u16) -> Result<(), AssertionError> {
        let expected = self.expectations.status;
        if status == expected {
            Ok(())
        } else {
            Err(AssertionError::UnexpectedStatus { expected, actual: status })
        }
    }

    fn check_latency(&self, elapsed: Duration) -> Result<(), AssertionError> {
        let limit = self.expectations.max_latency;
        if elapsed < limit {
            Ok(())
        } else {
            Err(AssertionError::LatencyExceeded { elapsed, limit })
        }
    }

    fn check_schema(&self, body: &Value) -> Result<(), AssertionError> {
        let violations = schema::check(body);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(AssertionError::SchemaValidation { violations })
        }
    }

    fn check_city(&self, body: &Value) -> Result<(), AssertionError> {
        let expected = &self.expectations.city;
        match body.get("name") {
            None | Some(Value::Null) => Err(AssertionError::MissingField { field: "name" }),
            Some(Value::String(name)) if name == expected => Ok(()),
            Some(other) => Err(AssertionError::FieldMismatch {
                field: "name",
                expected: format!("{expected:?}"),
                actual: other.to_string(),
            }),
        }
    }

    fn check_cod(&self, body: &Value) -> Result<(), AssertionError> {
        let expected = self.expectations.cod;
        match body.get("cod") {
            None | Some(Value::Null) => Err(AssertionError::MissingField { field: "cod" }),
            Some(cod) if integer_eq(cod, expected) => Ok(()),
            Some(other) => Err(AssertionError::FieldMismatch {
                field: "cod",
                expected: expected.to_string(),
                actual: other.to_string(),
            }),
        }
    }
}

// `200.0` is an integer as far as the schema is concerned.
fn integer_eq(value: &Value, expected: i64) -> bool {
    match value.as_i64() {
        Some(n) => n == expected,
        None => value.as_f64().is_some_and(|f| f.fract() == 0.0 && f == expected as f64),
    }
}

fn require_present(body: &Value, pointer: &str, field: &'static str) -> Result<(), AssertionError> {
    match body.pointer(pointer) {
        None | Some(Value::Null) => Err(AssertionError::MissingField { field }),
        Some(_) => Ok(()),
    }
}
