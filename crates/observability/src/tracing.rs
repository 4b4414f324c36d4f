//! Process-wide `tracing` subscriber for the catalog service.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info";

/// Output encoding, chosen by `LOG_FORMAT`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable lines for local runs.
    Pretty,
}

impl LogFormat {
    /// Unknown values fall back to JSON.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("pretty") | Some("text") => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

/// Install the subscriber using `RUST_LOG` and `LOG_FORMAT`.
pub fn init() {
    let format = LogFormat::parse(std::env::var("LOG_FORMAT").ok().as_deref());
    init_with(format);
}

/// Install the subscriber. Only the first call in a process takes effect.
pub fn init_with(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    let installed = match format {
        LogFormat::Json => builder.json().try_init().is_ok(),
        LogFormat::Pretty => builder.pretty().try_init().is_ok(),
    };
    if installed {
        ::tracing::debug!(?format, "tracing initialized");
    }
}
