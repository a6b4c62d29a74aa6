//! Tracing subscriber setup.
//!
//! Output format follows the `logging.format` setting: `json` for deployed
//! instances, anything else falls back to the pretty console format used in
//! development. `RUST_LOG` overrides the configured level when set.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggingConfig;

/// Installs the global tracing subscriber. Call once at startup.
pub fn init_logging(config: &LoggingConfig) {
    let directives = resolve_directives(std::env::var("RUST_LOG").ok(), &config.level);
    let subscriber = tracing_subscriber::registry().with(EnvFilter::new(directives));

    match config.format.as_str() {
        "json" => {
            let json_layer = fmt::layer()
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_current_span(true)
                .with_target(true);
            subscriber.with(json_layer).init();
        }
        _ => {
            let pretty_layer = fmt::layer()
                .pretty()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(true);
            subscriber.with(pretty_layer).init();
        }
    }
}

fn resolve_directives(env_override: Option<String>, configured_level: &str) -> String {
    env_override
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| configured_level.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_level_used_without_override() {
        assert_eq!(resolve_directives(None, "info"), "info");
    }

    #[test]
    fn test_env_override_wins() {
        let directives =
            resolve_directives(Some("eventhub_api=debug,sqlx=warn".to_string()), "info");
        assert_eq!(directives, "eventhub_api=debug,sqlx=warn");
    }

    #[test]
    fn test_blank_env_override_is_ignored() {
        assert_eq!(resolve_directives(Some("  ".to_string()), "warn"), "warn");
    }
}
