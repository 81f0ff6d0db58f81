#[cfg(test)]
mod tests {
    use super::super::logging::{init_logging, DEFAULT_LOG_FILTER};

    #[test]
    fn test_logging_initialization_is_idempotent() {
        init_logging();
        init_logging();
    }

    #[test]
    fn test_default_filter_parses() {
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }
}
