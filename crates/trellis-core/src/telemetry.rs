//! Logging and tracing bootstrap.
//!
//! Always installs a `tracing-subscriber` registry with an `EnvFilter` and a
//! console layer (pretty or JSON). With the `telemetry` feature an
//! OpenTelemetry layer exporting over OTLP is added when enabled in config.

#[cfg(feature = "telemetry")]
use opentelemetry::trace::TracerProvider;
#[cfg(feature = "telemetry")]
use opentelemetry::KeyValue;
#[cfg(feature = "telemetry")]
use opentelemetry_otlp::WithExportConfig;
#[cfg(feature = "telemetry")]
use opentelemetry_sdk::{
    runtime,
    trace::{RandomIdGenerator, Sampler},
    Resource,
};
#[cfg(feature = "telemetry")]
use opentelemetry_semantic_conventions::resource::SERVICE_NAME;

use crate::{TrellisError, TrellisResult};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Console log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-field lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Default filter directive when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Console log format.
    #[serde(default)]
    pub log_format: LogFormat,

    /// Whether to enable console output.
    #[serde(default = "default_console_output")]
    pub console_output: bool,

    /// Whether OpenTelemetry export is enabled.
    #[serde(default)]
    pub enabled: bool,

    /// Service name for tracing.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// OTLP endpoint URL (e.g., "http://localhost:4317").
    #[serde(default)]
    pub otlp_endpoint: Option<String>,

    /// Sampling ratio (0.0 to 1.0).
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

fn default_log_level() -> String {
    "info,trellis=debug".to_string()
}

fn default_service_name() -> String {
    "trellis".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

fn default_console_output() -> bool {
    true
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            console_output: default_console_output(),
            enabled: false,
            service_name: default_service_name(),
            otlp_endpoint: None,
            sampling_ratio: default_sampling_ratio(),
        }
    }
}

fn env_filter(config: &TelemetryConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
}

/// Initialize logging and, when enabled, OpenTelemetry tracing.
#[cfg(feature = "telemetry")]
pub fn init_telemetry(config: &TelemetryConfig) -> TrellisResult<()> {
    let tracer = if config.enabled {
        Some(build_tracer(config)?)
    } else {
        None
    };

    let json = config.console_output && config.log_format == LogFormat::Json;
    let pretty = config.console_output && config.log_format == LogFormat::Pretty;

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_target(true)))
        .with(pretty.then(|| tracing_subscriber::fmt::layer().with_target(true)))
        .with(tracer.map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer)))
        .try_init()
        .map_err(|e| TrellisError::Internal(format!("Failed to install subscriber: {}", e)))?;

    tracing::info!(
        service_name = %config.service_name,
        sampling_ratio = %config.sampling_ratio,
        otlp_endpoint = ?config.otlp_endpoint,
        otel = config.enabled,
        "Telemetry initialized"
    );

    Ok(())
}

#[cfg(feature = "telemetry")]
fn build_tracer(config: &TelemetryConfig) -> TrellisResult<opentelemetry_sdk::trace::Tracer> {
    let sampler = if config.sampling_ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if config.sampling_ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(config.sampling_ratio)
    };

    let resource = Resource::new(vec![KeyValue::new(SERVICE_NAME, config.service_name.clone())]);

    let mut builder = opentelemetry_sdk::trace::TracerProvider::builder()
        .with_sampler(sampler)
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource);

    if let Some(endpoint) = &config.otlp_endpoint {
        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()
            .map_err(|e| TrellisError::Internal(format!("Failed to create OTLP exporter: {}", e)))?;
        builder = builder.with_batch_exporter(exporter, runtime::Tokio);
    }

    let provider = builder.build();
    let tracer = provider.tracer("trellis");
    opentelemetry::global::set_tracer_provider(provider);

    Ok(tracer)
}

/// Initialize logging. OpenTelemetry export needs the `telemetry` feature.
#[cfg(not(feature = "telemetry"))]
pub fn init_telemetry(config: &TelemetryConfig) -> TrellisResult<()> {
    if config.enabled {
        tracing::warn!("OpenTelemetry export requested but the `telemetry` feature is off");
    }

    let json = config.console_output && config.log_format == LogFormat::Json;
    let pretty = config.console_output && config.log_format == LogFormat::Pretty;

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_target(true)))
        .with(pretty.then(|| tracing_subscriber::fmt::layer().with_target(true)))
        .try_init()
        .map_err(|e| TrellisError::Internal(format!("Failed to install subscriber: {}", e)))
}

/// Shutdown telemetry, flushing any pending spans.
#[cfg(feature = "telemetry")]
pub fn shutdown_telemetry() {
    opentelemetry::global::shutdown_tracer_provider();
    tracing::info!("Telemetry shutdown complete");
}

/// No spans to flush without the `telemetry` feature.
#[cfg(not(feature = "telemetry"))]
pub fn shutdown_telemetry() {}
