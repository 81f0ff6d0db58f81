//! 更新检查错误类型

use thiserror::Error;

/// 更新检查错误
#[derive(Error, Debug)]
pub enum UpdateError {
    /// 网络或响应解析失败
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GitHub 返回非成功状态码
    #[error("GitHub API returned status {status} for {url}")]
    Status { status: u16, url: String },

    /// 版本号无法解析
    #[error("Invalid version string: {0}")]
    InvalidVersion(String),

    /// 仓库配置不是 owner/name 形式
    #[error("Invalid repository '{0}', expected 'owner/name'")]
    InvalidRepository(String),
}

impl UpdateError {
    /// 是否值得重试：网络错误和 5xx
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::InvalidVersion(_) | Self::InvalidRepository(_) => false,
        }
    }
}

/// 更新模块的结果类型
pub type UpdateResult<T> = Result<T, UpdateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transience() {
        let server = UpdateError::Status {
            status: 502,
            url: "u".to_string(),
        };
        let missing = UpdateError::Status {
            status: 404,
            url: "u".to_string(),
        };
        assert!(server.is_transient());
        assert!(!missing.is_transient());
        assert!(!UpdateError::InvalidRepository("x".to_string()).is_transient());
    }
}
