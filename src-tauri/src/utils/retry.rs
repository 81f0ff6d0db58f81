//! 重试工具
//!
//! 为可能瞬时失败的操作（剪贴板读写、粘贴、网络请求）提供有界重试。
//!
//! # 退避策略
//!
//! 第 n 次尝试失败后等待 `base_delay * multiplier^(n-1)`，不加随机抖动。
//! 最后一次尝试失败后不再等待，直接返回 [`RetryError::Exhausted`]。
//!
//! # 使用示例
//!
//! ```no_run
//! use std::time::Duration;
//! use caseshift_lib::utils::retry::{with_retry, RetryPolicy};
//!
//! # async fn example() {
//! let policy = RetryPolicy::new(3, Duration::from_millis(100), 2.0);
//! let result: Result<u32, _> = with_retry(&policy, "example", || async {
//!     Err::<u32, String>("not yet".to_string())
//! })
//! .await;
//! assert!(result.is_err());
//! # }
//! ```

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// 单次退避等待的上限
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// 重试策略
///
/// 运行期间不可变，由配置构造
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    backoff_multiplier: f64,
}

impl RetryPolicy {
    /// 创建重试策略
    ///
    /// # Arguments
    ///
    /// * `max_attempts` - 最大尝试次数，小于 1 时按 1 处理
    /// * `base_delay` - 首次失败后的等待时间
    /// * `backoff_multiplier` - 退避倍数，负数或非有限值按 1.0 处理
    pub fn new(max_attempts: u32, base_delay: Duration, backoff_multiplier: f64) -> Self {
        let backoff_multiplier = if backoff_multiplier.is_finite() && backoff_multiplier >= 0.0 {
            backoff_multiplier
        } else {
            1.0
        };

        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            backoff_multiplier,
        }
    }

    /// 只尝试一次、不重试的策略
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO, 1.0)
    }

    /// 最大尝试次数
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// 基础等待时间
    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// 退避倍数
    pub fn backoff_multiplier(&self) -> f64 {
        self.backoff_multiplier
    }

    /// 第 `attempt` 次尝试（从 1 开始）失败后的等待时间
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.base_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);

        if !secs.is_finite() || secs >= MAX_RETRY_DELAY.as_secs_f64() {
            return MAX_RETRY_DELAY;
        }

        Duration::try_from_secs_f64(secs).unwrap_or(MAX_RETRY_DELAY)
    }

    /// 所有等待时间（共 `max_attempts - 1` 个）
    pub fn delays(&self) -> Vec<Duration> {
        (1..self.max_attempts).map(|attempt| self.delay_for(attempt)).collect()
    }

    /// 全部尝试失败时的总等待时间
    pub fn total_backoff(&self) -> Duration {
        self.delays().into_iter().sum()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(100), 2.0)
    }
}

/// 重试失败
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RetryError<E> {
    /// 所有尝试均失败
    #[error("Gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: E },

    /// 不可重试的错误，立即返回
    #[error("{0}")]
    Permanent(E),
}

impl<E> RetryError<E> {
    /// 取出底层错误
    pub fn into_inner(self) -> E {
        match self {
            Self::Exhausted { last, .. } => last,
            Self::Permanent(err) => err,
        }
    }

    /// 底层错误的引用
    pub fn inner(&self) -> &E {
        match self {
            Self::Exhausted { last, .. } => last,
            Self::Permanent(err) => err,
        }
    }

    /// 是否因为次数耗尽而失败
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }

    /// 次数耗尽时的尝试次数，不可重试错误返回 None
    pub fn attempts(&self) -> Option<u32> {
        match self {
            Self::Exhausted { attempts, .. } => Some(*attempts),
            Self::Permanent(_) => None,
        }
    }
}

/// 按策略重试异步操作，所有错误都视为可重试
///
/// # Arguments
///
/// * `policy` - 重试策略
/// * `operation` - 操作名称（仅用于日志）
/// * `op` - 每次尝试调用一次的闭包，返回新的 future
///
/// # Errors
///
/// 全部尝试失败时返回 [`RetryError::Exhausted`]，携带尝试次数和最后一个错误
pub async fn with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    op: F,
) -> Result<T, RetryError<E>>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    with_retry_if(policy, operation, op, |_| true).await
}

/// 按策略重试异步操作，`should_retry` 返回 false 的错误立即以
/// [`RetryError::Permanent`] 返回
pub async fn with_retry_if<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    operation: &str,
    mut op: F,
    should_retry: P,
) -> Result<T, RetryError<E>>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let mut attempt: u32 = 1;

    loop {
        match op().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::debug!(operation, attempt, "Operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) if !should_retry(&err) => {
                tracing::debug!(operation, attempt, error = %err, "Operation failed permanently");
                return Err(RetryError::Permanent(err));
            }
            Err(err) => {
                if attempt >= policy.max_attempts() {
                    tracing::warn!(
                        operation,
                        attempts = attempt,
                        error = %err,
                        "Retry attempts exhausted"
                    );
                    return Err(RetryError::Exhausted {
                        attempts: attempt,
                        last: err,
                    });
                }

                let delay = policy.delay_for(attempt);
                tracing::debug!(
                    operation,
                    attempt,
                    max_attempts = policy.max_attempts(),
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Operation failed; retrying"
                );
                tokio::time::sleep(delay).await;
                attempt = attempt.saturating_add(1);
            }
        }
    }
}
