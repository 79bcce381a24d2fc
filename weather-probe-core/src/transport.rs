use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::TransportError,
    model::{ProbeRequest, ProbeResponse},
};

pub mod fixed;
pub mod openweather;

pub use fixed::FixedTransport;
pub use openweather::{DEFAULT_BASE_URL, OpenWeatherTransport};

/// Source of current-weather responses.
///
/// Implementations hand back whatever status and body the server produced;
/// judging them is the validator's job. Only failures to obtain a response at
/// all are errors here.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn fetch(&self, request: &ProbeRequest) -> Result<ProbeResponse, TransportError>;
}
