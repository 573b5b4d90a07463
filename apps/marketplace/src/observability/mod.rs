//! Observability module for metrics.
//!
//! Prometheus counters and histograms for the marketplace flows. Tracing
//! setup lives in [`crate::telemetry`].

mod metrics;

pub use metrics::{
    MetricsConfig, MetricsError, UseCaseTimer, init_metrics, record_funds_replenished,
    record_items_imported, record_order_paid, record_order_placed, record_payment_rejection,
    record_showcase_cache, record_use_case,
};
