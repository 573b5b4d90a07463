//! Logging and OpenTelemetry Tracing Setup
//!
//! Installs a `tracing` subscriber writing JSON or human-readable lines, and
//! optionally exports spans over OTLP.
//!
//! # Configuration
//!
//! - `RUST_LOG`: overrides `observability.logging.level`
//! - `OTEL_ENABLED`: set to `true` to export spans (default: disabled)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP gRPC endpoint (default: `http://localhost:4317`)
//! - `OTEL_SERVICE_NAME`: service name for traces (default: `marketplace`)
//!
//! # Usage
//!
//! ```rust,ignore
//! use marketplace::telemetry::init_telemetry;
//!
//! #[tokio::main]
//! async fn main() {
//!     let _guard = init_telemetry(&config.observability.logging);
//!     // ... application code
//! }
//! ```

use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

const DEFAULT_ENDPOINT: &str = "http://localhost:4317";
const DEFAULT_SERVICE_NAME: &str = "marketplace";

/// Guard that shuts down the tracer provider on drop.
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("Error shutting down tracer provider: {e:?}");
        }
    }
}

fn flag_enabled(value: Option<&str>) -> bool {
    value.is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
}

fn build_provider(endpoint: &str) -> Result<SdkTracerProvider, String> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| format!("{e:?}"))?;

    Ok(SdkTracerProvider::builder()
        .with_simple_exporter(exporter)
        .build())
}

/// Initialize logging and, when `OTEL_ENABLED=true`, OTLP span export.
///
/// Returns a guard that will shut down the tracer provider when dropped.
///
/// # Panics
///
/// Panics if a global tracing subscriber is already installed.
#[must_use]
pub fn init_telemetry(logging: &LoggingConfig) -> TelemetryGuard {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let json = logging.format == "json";
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
    });
    let pretty_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_target(true));

    let otel_enabled = flag_enabled(std::env::var("OTEL_ENABLED").ok().as_deref());
    let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
    let service_name =
        std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string());

    let (provider, export_error) = if otel_enabled {
        match build_provider(&endpoint) {
            Ok(provider) => (Some(provider), None),
            Err(e) => (None, Some(e)),
        }
    } else {
        (None, None)
    };

    let otel_layer = provider.as_ref().map(|provider| {
        tracing_opentelemetry::layer().with_tracer(provider.tracer(service_name.clone()))
    });

    Registry::default()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .with(otel_layer)
        .init();

    if let Some(error) = export_error {
        tracing::warn!(%error, %endpoint, "Failed to create OTLP exporter, logging only");
    } else if provider.is_some() {
        tracing::info!(
            service_name = %service_name,
            endpoint = %endpoint,
            "OpenTelemetry initialized"
        );
    } else {
        tracing::debug!("OpenTelemetry disabled, logging only");
    }

    TelemetryGuard { provider }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(None, false ; "unset")]
    #[test_case(Some("true"), true ; "true")]
    #[test_case(Some("TRUE"), true ; "uppercase")]
    #[test_case(Some("1"), true ; "one")]
    #[test_case(Some("false"), false ; "false")]
    #[test_case(Some(""), false ; "empty")]
    fn test_otel_flag(value: Option<&str>, expected: bool) {
        assert_eq!(flag_enabled(value), expected);
    }
}
