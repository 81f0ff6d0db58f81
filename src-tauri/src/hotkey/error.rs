//! 热键相关错误类型

use thiserror::Error;

use crate::convert::ConversionMode;

/// 热键相关错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HotkeyError {
    /// 无效的热键格式
    #[error("Invalid hotkey format: {0}")]
    InvalidFormat(String),

    /// 两个模式绑定了同一个组合键
    #[error("Hotkey '{hotkey}' is already bound to {existing}, cannot bind it to {requested}")]
    Conflict {
        hotkey: String,
        existing: ConversionMode,
        requested: ConversionMode,
    },

    /// 热键注册失败
    #[error("Failed to register hotkey '{hotkey}': {reason}")]
    RegistrationFailed { hotkey: String, reason: String },

    /// 热键注销失败
    #[error("Failed to unregister hotkey '{hotkey}': {reason}")]
    UnregistrationFailed { hotkey: String, reason: String },
}

/// 热键模块的结果类型
pub type HotkeyResult<T> = Result<T, HotkeyError>;
