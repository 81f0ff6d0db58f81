/// Logging utilities
pub mod logging;

/// Global error handling
pub mod error;

/// Bounded retry with exponential backoff
pub mod retry;

// Re-export commonly used types
pub use error::{AppError, AppResult, ErrorContext, ErrorKind};
pub use retry::{with_retry, with_retry_if, RetryError, RetryPolicy};

#[cfg(test)]
mod logging_test;
