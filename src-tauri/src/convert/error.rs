//! 转换错误类型

use thiserror::Error;

/// 大小写转换错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// 输入文本为空
    #[error("Input text is empty")]
    EmptyInput,
}

/// 转换模块的结果类型
pub type ConvertResult<T> = Result<T, ConvertError>;
