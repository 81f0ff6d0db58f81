use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// 默认日志过滤规则
pub const DEFAULT_LOG_FILTER: &str = "caseshift_lib=debug,caseshift=debug,warn";

/// Initialize logging with tracing
///
/// - Reads filter from RUST_LOG environment variable if available
/// - Falls back to [`DEFAULT_LOG_FILTER`] if RUST_LOG is not set
/// - Uses a formatted output layer
///
/// Safe to call more than once; later calls are no-ops.
///
/// # Example
///
/// ```no_run
/// use caseshift_lib::utils::logging::init_logging;
///
/// init_logging();
/// ```
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let installed = tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(version = env!("CARGO_PKG_VERSION"), "CaseShift logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }

    #[test]
    fn test_init_twice_is_noop() {
        init_logging();
        init_logging();
    }
}
