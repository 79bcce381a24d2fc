//! Core library for the `weather-probe` API check.
//!
//! This crate defines:
//! - The request/response model and the transport abstraction over HTTP
//! - The fixed current-weather schema and the response validator
//! - Configuration & credentials handling
//!
//! It is used by `weather-probe-cli`, but the validator can be driven by any
//! [`Transport`], including a canned [`FixedTransport`] in tests.

pub mod config;
pub mod error;
pub mod model;
pub mod probe;
pub mod schema;
pub mod transport;
pub mod validator;

pub use config::Config;
pub use error::{AssertionError, ProbeError, TransportError};
pub use model::{ProbeRequest, ProbeResponse, WeatherSnapshot};
pub use probe::run_probe;
pub use transport::{FixedTransport, OpenWeatherTransport, Transport};
pub use validator::{Check, CheckOutcome, Expectations, ResponseValidator, ValidationReport};
