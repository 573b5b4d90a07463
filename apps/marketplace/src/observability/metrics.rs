//! Prometheus metrics for the marketplace.
//!
//! Counters for the money-moving flows (checkout, payment, top-ups, imports)
//! and a latency histogram for HTTP-facing use cases.
//!
//! # Example
//!
//! ```ignore
//! use marketplace::observability::{init_metrics, MetricsConfig};
//!
//! let config = MetricsConfig::default();
//! init_metrics(&config)?;
//!
//! record_order_placed(3);
//! ```

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use rust_decimal::prelude::ToPrimitive;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Instant;

use crate::domain::shared::Money;

/// Configuration for the metrics exporter.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Address to bind the metrics HTTP listener.
    pub listen_addr: SocketAddr,
    /// Histogram buckets for latency measurements (in seconds).
    pub latency_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 9090)),
            // Latency buckets from 100us to 1s
            latency_buckets: vec![
                0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
            ],
        }
    }
}

impl MetricsConfig {
    /// Create a new metrics configuration with custom address.
    #[must_use]
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            listen_addr: addr,
            ..Default::default()
        }
    }
}

/// Initialize the Prometheus metrics exporter.
///
/// This starts an HTTP server that exposes metrics at `/metrics`.
///
/// # Errors
///
/// Returns an error if the metrics exporter fails to start (e.g., port already in use).
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .set_buckets(&config.latency_buckets)
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(
        addr = %config.listen_addr,
        "Prometheus metrics exporter started"
    );

    Ok(())
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to configure metrics exporter.
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

fn as_f64(amount: Money) -> f64 {
    amount.amount().to_f64().unwrap_or_default()
}

// ============================================================================
// Order Metrics
// ============================================================================

/// Record a placed order.
///
/// # Arguments
///
/// * `lines` - Number of ordered-item rows created
pub fn record_order_placed(lines: usize) {
    counter!("orders_placed_total").increment(1);
    counter!("ordered_items_total").increment(lines as u64);
}

/// Record a paid order and the amount debited.
pub fn record_order_paid(debited: Money) {
    counter!("orders_paid_total").increment(1);
    histogram!("order_payment_amount").record(as_f64(debited));
}

/// Record a rejected payment.
///
/// # Arguments
///
/// * `reason` - Error reason (e.g., `"INSUFFICIENT_FUNDS"`)
pub fn record_payment_rejection(reason: &str) {
    counter!(
        "payment_rejections_total",
        "reason" => reason.to_string()
    )
    .increment(1);
}

// ============================================================================
// Account and Catalog Metrics
// ============================================================================

/// Record a funds top-up.
pub fn record_funds_replenished(amount: Money) {
    counter!("funds_replenished_total").increment(1);
    histogram!("funds_replenished_amount").record(as_f64(amount));
}

/// Record a CSV import.
///
/// # Arguments
///
/// * `status` - `"ok"` or `"rejected"`
/// * `rows` - Rows applied (zero when rejected)
pub fn record_items_imported(status: &str, rows: u32) {
    counter!("item_imports_total", "status" => status.to_string()).increment(1);
    counter!("items_imported_total").increment(u64::from(rows));
}

/// Record a showcase cache lookup.
pub fn record_showcase_cache(hit: bool) {
    let outcome = if hit { "hit" } else { "miss" };
    counter!("showcase_cache_lookups_total", "outcome" => outcome).increment(1);
}

// ============================================================================
// Use Case Metrics
// ============================================================================

/// Record a use case execution.
///
/// # Arguments
///
/// * `use_case` - Use case name (e.g., `"pay_order"`)
/// * `status` - `"ok"` or `"error"`
/// * `latency_seconds` - Execution time in seconds
pub fn record_use_case(use_case: &'static str, status: &'static str, latency_seconds: f64) {
    counter!(
        "use_case_requests_total",
        "use_case" => use_case,
        "status" => status
    )
    .increment(1);

    histogram!(
        "use_case_latency_seconds",
        "use_case" => use_case
    )
    .record(latency_seconds);
}

/// Times a use case and records it on drop.
pub struct UseCaseTimer {
    use_case: &'static str,
    start: Instant,
    ok: bool,
}

impl UseCaseTimer {
    /// Start timing `use_case`.
    #[must_use]
    pub fn start(use_case: &'static str) -> Self {
        Self {
            use_case,
            start: Instant::now(),
            ok: false,
        }
    }

    /// Mark the execution as successful.
    pub fn succeed(&mut self) {
        self.ok = true;
    }

    /// Pass a result through, marking success on `Ok`.
    pub fn finish<T, E>(mut self, result: Result<T, E>) -> Result<T, E> {
        if result.is_ok() {
            self.succeed();
        }
        result
    }
}

impl Drop for UseCaseTimer {
    fn drop(&mut self) {
        let status = if self.ok { "ok" } else { "error" };
        record_use_case(self.use_case, status, self.start.elapsed().as_secs_f64());
    }
}
