//! 输入模块错误类型
//!
//! 定义剪贴板、焦点窗口和按键模拟相关的错误类型

use thiserror::Error;

/// 输入操作错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// 剪贴板中没有文本
    #[error("No text in clipboard")]
    ClipboardEmpty,

    /// 剪贴板系统调用失败
    #[error("Clipboard access failed: {0}")]
    ClipboardAccess(String),

    /// 文本超过允许的最大长度
    #[error("Text too large: {length} characters (max {max})")]
    TextTooLarge { length: usize, max: usize },

    /// 辅助功能权限被拒绝
    #[error("Accessibility permission denied")]
    PermissionDenied,

    /// 窗口检测失败
    #[error("Window detection failed: {0}")]
    WindowDetectionFailed(String),

    /// 无法把焦点还给原窗口
    #[error("Failed to restore focus: {0}")]
    FocusRestoreFailed(String),

    /// 键盘模拟失败
    #[error("Keyboard simulation failed: {0}")]
    KeyboardSimulationFailed(String),

    /// 粘贴失败，粘贴键没有送达
    #[error("Paste failed: {0}")]
    PasteFailed(String),

    /// 粘贴键已送达，但之后松开修饰键失败
    #[error("Paste sent but left keys pressed: {0}")]
    PasteIncomplete(String),
}

impl InputError {
    /// 是否值得重试
    ///
    /// 剪贴板为空、文本过大和权限问题重试也不会改变结果；
    /// 粘贴键已送达时重试会重复粘贴
    pub fn is_transient(&self) -> bool {
        !matches!(
            self,
            Self::ClipboardEmpty
                | Self::TextTooLarge { .. }
                | Self::PermissionDenied
                | Self::PasteIncomplete(_)
        )
    }
}

/// 输入操作结果类型
pub type InputResult<T> = Result<T, InputError>;
