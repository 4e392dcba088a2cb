use anyhow::{Result, anyhow};
use once_cell::sync::OnceCell;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{Resource, trace::SdkTracerProvider};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: OnceCell<()> = OnceCell::new();
static PROVIDER: OnceCell<SdkTracerProvider> = OnceCell::new();

const DEFAULT_FILTER: &str = "info,sqlx=warn,sea_orm=warn";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Plain
        }
    }
}

/// Configuration for tracing initialization.
#[derive(Clone, Debug)]
pub struct ObsConfig {
    pub service_name: String,
    pub env_filter: Option<String>,
    pub otlp_endpoint: Option<String>,
    pub format: LogFormat,
}

impl Default for ObsConfig {
    fn default() -> Self {
        Self {
            service_name: "org-directory".to_string(),
            env_filter: None,
            otlp_endpoint: None,
            format: LogFormat::Plain,
        }
    }
}

impl ObsConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads `SERVICE_NAME`, `RUST_LOG`, `OTLP_ENDPOINT` and `LOG_FORMAT`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            service_name: non_empty("SERVICE_NAME").unwrap_or(defaults.service_name),
            env_filter: non_empty("RUST_LOG"),
            otlp_endpoint: non_empty("OTLP_ENDPOINT"),
            format: non_empty("LOG_FORMAT")
                .map(|raw| LogFormat::parse(&raw))
                .unwrap_or_default(),
        }
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_tracing(config: ObsConfig) -> Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let filter = config
        .env_filter
        .unwrap_or_else(|| DEFAULT_FILTER.to_string());
    let env_filter = EnvFilter::try_new(filter)?;

    let json = config.format == LogFormat::Json;
    let plain_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_target(false));
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().with_current_span(true));

    let otel_layer = match config.otlp_endpoint {
        Some(endpoint) => {
            let exporter = SpanExporter::builder()
                .with_http()
                .with_protocol(Protocol::HttpBinary)
                .with_endpoint(endpoint)
                .build()?;
            let resource = Resource::builder()
                .with_service_name(config.service_name.clone())
                .build();
            let provider = SdkTracerProvider::builder()
                .with_resource(resource)
                .with_batch_exporter(exporter)
                .build();
            let tracer = provider.tracer(config.service_name);
            let _ = PROVIDER.set(provider);
            Some(tracing_opentelemetry::layer().with_tracer(tracer))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(plain_layer)
        .with(json_layer)
        .with(otel_layer)
        .try_init()?;

    INIT.set(())
        .map_err(|_| anyhow!("tracing already initialized"))?;
    Ok(())
}

/// Flush and stop the OTLP exporter, if one was installed.
pub fn shutdown_tracing() {
    if let Some(provider) = PROVIDER.get() {
        if let Err(err) = provider.shutdown() {
            eprintln!("failed to flush spans: {err}");
        }
    }
}
