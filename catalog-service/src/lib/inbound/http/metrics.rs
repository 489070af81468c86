use std::time::Duration;

use prometheus::Encoder;
use prometheus::IntCounter;
use prometheus::IntCounterVec;
use prometheus::IntGauge;
use prometheus::Opts;
use prometheus::Registry;
use prometheus::TextEncoder;

/// Request and response counters for the HTTP pipeline.
///
/// Each instance owns its registry, so several servers in one process keep
/// separate counts.
#[derive(Clone)]
pub struct HttpMetrics {
    registry: Registry,
    requests_received: IntCounter,
    responses_sent: IntCounter,
    responses_by_status: IntCounterVec,
    processing_time_us: IntCounter,
    in_flight: IntGauge,
}

impl HttpMetrics {
    /// # Errors
    /// * `prometheus::Error` - A metric could not be created or registered
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("catalog".to_string()), None)?;

        let requests_received =
            IntCounter::new("http_requests_received_total", "Requests received")?;
        let responses_sent = IntCounter::new("http_responses_sent_total", "Responses sent")?;
        let responses_by_status = IntCounterVec::new(
            Opts::new(
                "http_responses_sent_by_status_total",
                "Responses sent by status code",
            ),
            &["status"],
        )?;
        let processing_time_us = IntCounter::new(
            "http_processing_time_microseconds_total",
            "Cumulative request processing time",
        )?;
        let in_flight = IntGauge::new("http_requests_in_flight", "Requests being processed")?;

        registry.register(Box::new(requests_received.clone()))?;
        registry.register(Box::new(responses_sent.clone()))?;
        registry.register(Box::new(responses_by_status.clone()))?;
        registry.register(Box::new(processing_time_us.clone()))?;
        registry.register(Box::new(in_flight.clone()))?;

        Ok(Self {
            registry,
            requests_received,
            responses_sent,
            responses_by_status,
            processing_time_us,
            in_flight,
        })
    }

    pub fn request_started(&self) {
        self.requests_received.inc();
        self.in_flight.inc();
    }

    pub fn response_sent(&self, status: u16, elapsed: Duration) {
        self.in_flight.dec();
        self.responses_sent.inc();
        self.responses_by_status
            .with_label_values(&[&status.to_string()])
            .inc();
        self.processing_time_us
            .inc_by(u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX));
    }

    pub fn requests_received(&self) -> u64 {
        self.requests_received.get()
    }

    pub fn responses_with_status(&self, status: u16) -> u64 {
        self.responses_by_status
            .with_label_values(&[&status.to_string()])
            .get()
    }

    /// Encode every metric in the Prometheus text format.
    ///
    /// # Errors
    /// * `prometheus::Error` - Encoding failed
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
