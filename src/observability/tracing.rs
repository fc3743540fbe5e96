use thiserror::Error;
use tracing::info;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Initialize structured logging
///
/// `RUST_LOG` wins over `log_level` when set. Log lines go to stderr so
/// command output on stdout stays clean.
pub fn init_observability(
    service_name: &str,
    log_level: &str,
    enable_json_logging: bool,
) -> Result<(), ObservabilityError> {
    let env_filter = build_env_filter(
        service_name,
        log_level,
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
    )?;

    let result = if enable_json_logging {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false)
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_span_events(FmtSpan::NONE),
            )
            .try_init()
    } else {
        // Human-readable formatter for interactive use
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_writer(std::io::stderr)
                    .with_span_events(FmtSpan::NONE),
            )
            .try_init()
    };

    result.map_err(|e| ObservabilityError::TracingInit(e.to_string()))?;

    info!("Observability initialized for {}", service_name);
    Ok(())
}

/// `env_directives` holds the value of `RUST_LOG`, if any
fn build_env_filter(
    service_name: &str,
    log_level: &str,
    env_directives: Option<String>,
) -> Result<EnvFilter, ObservabilityError> {
    if let Some(filter) = env_directives.and_then(|d| EnvFilter::try_new(d).ok()) {
        return Ok(filter);
    }

    EnvFilter::try_new(format!(
        "{}={},reqwest=warn,hyper=warn",
        service_name.replace('-', "_"),
        log_level
    ))
    .map_err(|e| ObservabilityError::Config(format!("Invalid log level '{}': {}", log_level, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_env_filter_accepts_levels() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            assert!(build_env_filter("rocketshoes-cart", level, None).is_ok());
        }
    }

    #[test]
    fn test_build_env_filter_rejects_garbage() {
        let result = build_env_filter("rocketshoes-cart", "verbose", None);
        assert!(matches!(result, Err(ObservabilityError::Config(_))));
    }

    #[test]
    fn test_env_directives_take_precedence() {
        let filter =
            build_env_filter("rocketshoes-cart", "verbose", Some("rocketshoes_cart=debug".to_string()))
                .unwrap();
        assert_eq!(filter.to_string(), "rocketshoes_cart=debug");
    }

    #[test]
    fn test_unparsable_env_directives_fall_back_to_level() {
        let filter =
            build_env_filter("rocketshoes-cart", "info", Some("rocketshoes_cart=loudest".to_string())).unwrap();
        assert!(filter.to_string().contains("rocketshoes_cart=info"));
    }

    #[test]
    fn test_second_init_fails_cleanly() {
        let _ = init_observability("rocketshoes-cart", "info", false);
        let second = init_observability("rocketshoes-cart", "info", true);
        assert!(matches!(second, Err(ObservabilityError::TracingInit(_))));
    }
}
