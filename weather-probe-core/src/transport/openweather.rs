use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, instrument};

use crate::{
    error::TransportError,
    model::{ProbeRequest, ProbeResponse},
};

use super::Transport;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Live transport against the OpenWeather current-weather endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherTransport {
    base_url: String,
    http: Client,
}

impl OpenWeatherTransport {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Point the transport at another endpoint, e.g. a mock server.
    pub fn with_base_url(base_url: &str) -> Result<Self, TransportError> {
        let parsed = Url::parse(base_url).map_err(|e| TransportError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TransportError::InvalidUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(Self { base_url: parsed.into(), http: Client::new() })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for OpenWeatherTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for OpenWeatherTransport {
    #[instrument(skip_all, fields(city = %request.city(), endpoint = %self.base_url))]
    async fn fetch(&self, request: &ProbeRequest) -> Result<ProbeResponse, TransportError> {
        let started = Instant::now();

        let res = self
            .http
            .get(self.base_url.as_str())
            .query(&[("q", request.city()), ("appid", request.api_key())])
            .send()
            .await
            .map_err(TransportError::from_send)?;

        let status = res.status();
        let body = res.text().await.map_err(TransportError::from_body)?;
        let elapsed = started.elapsed();

        debug!(status = status.as_u16(), elapsed_ms = elapsed.as_millis() as u64, "received response");

        Ok(ProbeResponse::new(status.as_u16(), elapsed, body))
    }
}
