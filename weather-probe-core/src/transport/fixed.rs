use std::time::Duration;

use async_trait::async_trait;

use crate::{
    error::TransportError,
    model::{ProbeRequest, ProbeResponse},
};

use super::Transport;

/// Replays one canned response for every request.
#[derive(Debug, Clone)]
pub struct FixedTransport {
    status: u16,
    elapsed: Duration,
    body: String,
}

impl FixedTransport {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, elapsed: Duration::ZERO, body: body.into() }
    }

    /// Report this duration as the response time.
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }
}

#[async_trait]
impl Transport for FixedTransport {
    async fn fetch(&self, _request: &ProbeRequest) -> Result<ProbeResponse, TransportError> {
        Ok(ProbeResponse::new(self.status, self.elapsed, self.body.clone()))
    }
}
