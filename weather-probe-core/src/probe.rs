use tracing::{debug, info};

use crate::{
    error::ProbeError,
    model::{ProbeRequest, WeatherSnapshot},
    transport::Transport,
    validator::{ResponseValidator, ValidationReport},
};

/// Fetch one response and validate it.
///
/// Network failures come back as [`ProbeError::Network`]. A response that
/// arrives always produces a report, even when checks fail; use
/// [`ValidationReport::into_result`] to turn failures into an error.
pub async fn run_probe(
    transport: &dyn Transport,
    request: &ProbeRequest,
    validator: &ResponseValidator,
) -> Result<ValidationReport, ProbeError> {
    let response = transport.fetch(request).await?;

    debug!(body = %response.body, "raw response body");
    info!(
        status = response.status,
        elapsed_ms = response.elapsed.as_millis() as u64,
        received_at = %response.received_at,
        "response received"
    );

    if let Ok(body) = response.json() {
        let snap = WeatherSnapshot::from_json(&body);
        info!(
            name = ?snap.name,
            cod = ?snap.cod,
            latitude = ?snap.latitude,
            longitude = ?snap.longitude,
            weather = ?snap.main,
            description = ?snap.description,
            "extracted values"
        );
    }

    Ok(validator.validate(&response))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        error::AssertionError,
        transport::FixedTransport,
        validator::{Check, Expectations},
    };

    const LONDON: &str = r#"{
        "coord": {"lon": -0.1257, "lat": 51.5085},
        "weather": [{"id": 500, "main": "Rain", "description": "light rain"}],
        "name": "London",
        "cod": 200
    }"#;

    fn request() -> ProbeRequest {
        ProbeRequest::new("London", "KEY").unwrap()
    }

    #[tokio::test]
    async fn passes_on_healthy_response() {
        let transport = FixedTransport::new(200, LONDON).with_elapsed(Duration::from_millis(120));

        let report = run_probe(&transport, &request(), &ResponseValidator::default())
            .await
            .unwrap();

        assert!(report.is_success(), "{report}");
    }

    #[tokio::test]
    async fn slow_mock_response_fails_latency_only() {
        let transport = FixedTransport::new(200, LONDON).with_elapsed(Duration::from_secs(12));

        let report = run_probe(&transport, &request(), &ResponseValidator::default())
            .await
            .unwrap();

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert!(matches!(failures[0], AssertionError::LatencyExceeded { .. }));
    }

    #[tokio::test]
    async fn unexpected_city_surfaces_as_assertion_error() {
        let transport = FixedTransport::new(200, LONDON);
        let validator = ResponseValidator::new(Expectations::for_city("Paris"));

        let err = run_probe(&transport, &request(), &validator)
            .await
            .unwrap()
            .into_result()
            .unwrap_err();

        assert!(err.is_assertion_failure());
        match err {
            ProbeError::Assertions(report) => assert!(matches!(
                report.outcome(Check::CityName),
                Some(Err(AssertionError::FieldMismatch { field: "name", .. }))
            )),
            other => panic!("unexpected error: {other}"),
        }
    }
}
