//! Observability: logging, distributed tracing and metrics.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use opentelemetry_otlp::WithExportConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Initialize logging and, when an OTLP endpoint is configured, trace export.
///
/// `RUST_LOG` takes precedence over the configured log level.
pub fn init(service_name: &str, config: &ObservabilityConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;

    let telemetry = match config.otlp_endpoint.as_deref() {
        Some(endpoint) => {
            let tracer = opentelemetry_otlp::new_pipeline()
                .tracing()
                .with_exporter(
                    opentelemetry_otlp::new_exporter()
                        .tonic()
                        .with_endpoint(endpoint),
                )
                .with_trace_config(
                    opentelemetry_sdk::trace::config().with_resource(
                        opentelemetry_sdk::Resource::new(vec![opentelemetry::KeyValue::new(
                            "service.name",
                            service_name.to_string(),
                        )]),
                    ),
                )
                .install_batch(opentelemetry_sdk::runtime::Tokio)?;
            Some(tracing_opentelemetry::layer().with_tracer(tracer))
        }
        None => None,
    };

    let json = config.json_logging.then(|| fmt::layer().json());
    let pretty = (!config.json_logging).then(|| fmt::layer());

    tracing_subscriber::registry()
        .with(filter)
        .with(telemetry)
        .with(json)
        .with(pretty)
        .try_init()?;

    Ok(())
}

/// Install the global Prometheus recorder and describe the service metrics.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    metrics::register_metrics();
    Ok(handle)
}

/// Flush and stop trace export.
pub fn shutdown() {
    opentelemetry::global::shutdown_tracer_provider();
}

/// Metric names and descriptions.
pub mod metrics {
    use metrics::describe_counter;

    pub fn register_metrics() {
        describe_counter!(
            "auth_success_total",
            "Requests carrying a valid session token"
        );
        describe_counter!(
            "auth_errors_total",
            "Requests rejected during authentication, by error type"
        );
        describe_counter!(
            "permission_decisions_total",
            "Permission checks, by decision, action and resource"
        );
        describe_counter!(
            "saas_errors_total",
            "Errors returned to clients, by code and category"
        );
    }
}
