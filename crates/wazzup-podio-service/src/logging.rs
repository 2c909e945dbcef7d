//! Tracing subscriber setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wazzup_podio_api::LoggingConfig;

/// Crates whose logs are enabled at the configured level
const CRATE_TARGETS: &[&str] = &[
    "wazzup_podio_service",
    "wazzup_podio_api",
    "wazzup_podio_clients",
    "wazzup_podio_core",
];

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(level: &str) -> String {
    let mut directives: Vec<String> = CRATE_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect();
    directives.push("tower_http=debug".to_string());
    directives.join(",")
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(&config.level)));

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_format {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Verify the default filter covers every crate and tower-http.
    #[test]
    fn test_default_filter() {
        assert_eq!(
            default_filter("info"),
            "wazzup_podio_service=info,wazzup_podio_api=info,wazzup_podio_clients=info,\
             wazzup_podio_core=info,tower_http=debug"
        );
    }

    /// Verify the configured level is applied to the crate targets.
    #[test]
    fn test_default_filter_uses_level() {
        let filter = default_filter("debug");
        assert!(filter.starts_with("wazzup_podio_service=debug,"));
        assert!(filter.ends_with("tower_http=debug"));
    }
}
