//! 全局错误处理模块
//!
//! 提供统一的应用错误类型和用户友好的错误消息
//!
//! # 功能
//!
//! - 统一的 `AppError` 类型，聚合所有模块错误
//! - `ErrorKind` 错误分类，用于转换结果、通知和前端事件
//! - 用户友好的错误消息
//! - 错误恢复建议
//!
//! # 使用示例
//!
//! ```
//! use caseshift_lib::convert::ConvertError;
//! use caseshift_lib::utils::error::{AppError, ErrorKind};
//!
//! let err = AppError::from(ConvertError::EmptyInput);
//! assert_eq!(err.kind(), ErrorKind::EmptyInput);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::convert::ConvertError;
use crate::hotkey::HotkeyError;
use crate::input::error::InputError;
use crate::state::config::ConfigError;
use crate::state::StateError;
use crate::update::UpdateError;
use crate::utils::retry::RetryError;

/// 应用错误类型
///
/// 聚合所有模块的错误类型，提供统一的错误处理接口
#[derive(Error, Debug)]
pub enum AppError {
    /// 转换错误
    #[error("Conversion error: {0}")]
    Convert(#[from] ConvertError),

    /// 输入错误（剪贴板、焦点、按键）
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// 热键错误
    #[error("Hotkey error: {0}")]
    Hotkey(#[from] HotkeyError),

    /// 配置错误
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// 更新检查错误
    #[error("Update error: {0}")]
    Update(#[from] UpdateError),

    /// 状态机错误
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// 重试次数耗尽
    #[error("Gave up after {attempts} attempts: {last}")]
    RetryExhausted { attempts: u32, last: Box<AppError> },

    /// 已有转换正在进行
    #[error("A conversion is already in progress")]
    ConversionInProgress,

    /// 内部错误
    #[error("Internal error: {0}")]
    Internal(String),
}

/// 错误分类
///
/// 转换结果、通知和前端事件只携带分类，不携带底层错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// 输入文本为空
    EmptyInput,
    /// 剪贴板中没有文本
    ClipboardEmpty,
    /// 剪贴板访问失败
    ClipboardAccess,
    /// 文本过大
    TextTooLarge,
    /// 重试次数耗尽
    RetryExhausted,
    /// 热键冲突
    HotkeyConflict,
    /// 热键格式无效
    InvalidHotkey,
    /// 热键注册失败
    HotkeyRegistration,
    /// 自动粘贴失败
    Paste,
    /// 已有转换正在进行
    ConversionInProgress,
    /// 缺少辅助功能权限
    PermissionDenied,
    /// 配置错误
    Config,
    /// 更新检查失败
    Update,
    /// 内部错误
    Internal,
}

impl ErrorKind {
    /// 分类名称（用于日志）
    pub fn name(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::ClipboardEmpty => "clipboard_empty",
            Self::ClipboardAccess => "clipboard_access",
            Self::TextTooLarge => "text_too_large",
            Self::RetryExhausted => "retry_exhausted",
            Self::HotkeyConflict => "hotkey_conflict",
            Self::InvalidHotkey => "invalid_hotkey",
            Self::HotkeyRegistration => "hotkey_registration",
            Self::Paste => "paste",
            Self::ConversionInProgress => "conversion_in_progress",
            Self::PermissionDenied => "permission_denied",
            Self::Config => "config",
            Self::Update => "update",
            Self::Internal => "internal",
        }
    }

    /// 通知标题
    pub fn title(&self) -> &'static str {
        match self {
            Self::EmptyInput | Self::ClipboardEmpty => "剪贴板为空",
            Self::ClipboardAccess | Self::RetryExhausted => "剪贴板错误",
            Self::TextTooLarge => "文本过大",
            Self::HotkeyConflict | Self::InvalidHotkey | Self::HotkeyRegistration => "热键错误",
            Self::Paste => "粘贴失败",
            Self::ConversionInProgress => "正在转换",
            Self::PermissionDenied => "需要权限",
            Self::Config => "配置错误",
            Self::Update => "检查更新失败",
            Self::Internal => "内部错误",
        }
    }
}

/// 错误上下文信息
///
/// 提供用户友好的错误信息和恢复建议
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// 错误分类
    pub kind: ErrorKind,
    /// 用户友好的错误消息
    pub message: String,
    /// 详细错误信息（用于日志）
    pub detail: Option<String>,
    /// 恢复建议
    pub recovery_hint: Option<String>,
    /// 是否可恢复
    pub recoverable: bool,
}

impl ErrorContext {
    /// 创建新的错误上下文
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
            recovery_hint: None,
            recoverable: true,
        }
    }

    /// 设置详细信息
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// 设置恢复建议
    pub fn with_recovery_hint(mut self, hint: impl Into<String>) -> Self {
        self.recovery_hint = Some(hint.into());
        self
    }

    /// 标记为不可恢复
    pub fn not_recoverable(mut self) -> Self {
        self.recoverable = false;
        self
    }
}

impl AppError {
    /// 获取错误分类
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Convert(ConvertError::EmptyInput) => ErrorKind::EmptyInput,

            AppError::Input(InputError::ClipboardEmpty) => ErrorKind::ClipboardEmpty,
            AppError::Input(InputError::ClipboardAccess(_)) => ErrorKind::ClipboardAccess,
            AppError::Input(InputError::TextTooLarge { .. }) => ErrorKind::TextTooLarge,
            AppError::Input(InputError::PermissionDenied) => ErrorKind::PermissionDenied,
            AppError::Input(_) => ErrorKind::Paste,

            AppError::Hotkey(HotkeyError::Conflict { .. }) => ErrorKind::HotkeyConflict,
            AppError::Hotkey(HotkeyError::InvalidFormat(_)) => ErrorKind::InvalidHotkey,
            AppError::Hotkey(_) => ErrorKind::HotkeyRegistration,

            AppError::Config(_) => ErrorKind::Config,
            AppError::Update(_) => ErrorKind::Update,
            AppError::State(_) => ErrorKind::Internal,
            AppError::RetryExhausted { .. } => ErrorKind::RetryExhausted,
            AppError::ConversionInProgress => ErrorKind::ConversionInProgress,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// 去掉重试包装后的底层错误
    pub fn root(&self) -> &AppError {
        match self {
            AppError::RetryExhausted { last, .. } => last.root(),
            other => other,
        }
    }

    /// 获取用户友好的错误消息
    ///
    /// 返回适合直接显示给用户的错误消息
    pub fn user_message(&self) -> String {
        match self {
            AppError::Convert(ConvertError::EmptyInput) => "没有可转换的文本".to_string(),

            AppError::Input(InputError::ClipboardEmpty) => {
                "剪贴板中没有文本，请先复制要转换的内容".to_string()
            }
            AppError::Input(InputError::ClipboardAccess(_)) => "无法访问剪贴板".to_string(),
            AppError::Input(InputError::TextTooLarge { length, max }) => {
                format!("文本过大（{} 个字符，上限 {}）", length, max)
            }
            AppError::Input(InputError::PermissionDenied) => {
                "需要辅助功能权限才能自动粘贴".to_string()
            }
            AppError::Input(InputError::FocusRestoreFailed(_)) => {
                "无法切换回原窗口，结果已复制到剪贴板".to_string()
            }
            AppError::Input(_) => "自动粘贴失败，结果已复制到剪贴板".to_string(),

            AppError::Hotkey(HotkeyError::Conflict { hotkey, .. }) => {
                format!("热键 {} 被重复绑定", hotkey)
            }
            AppError::Hotkey(HotkeyError::InvalidFormat(hotkey)) => {
                format!("热键格式无效: {}", hotkey)
            }
            AppError::Hotkey(_) => "热键注册失败，可能已被其他应用占用".to_string(),

            AppError::Config(ConfigError::Json(_)) => "配置文件格式错误".to_string(),
            AppError::Config(_) => "无法读取或保存配置文件".to_string(),

            AppError::Update(_) => "检查更新失败，请稍后重试".to_string(),

            AppError::State(_) => "内部状态错误，请重试".to_string(),

            AppError::RetryExhausted { attempts, last } => {
                format!("{}（已尝试 {} 次）", last.user_message(), attempts)
            }
            AppError::ConversionInProgress => "上一次转换尚未完成".to_string(),
            AppError::Internal(msg) => format!("内部错误: {}", msg),
        }
    }

    /// 获取完整的错误上下文
    pub fn context(&self) -> ErrorContext {
        let mut ctx =
            ErrorContext::new(self.kind(), self.user_message()).with_detail(self.to_string());

        ctx.recovery_hint = self.recovery_hint();

        if !self.is_recoverable() {
            ctx = ctx.not_recoverable();
        }

        ctx
    }

    /// 获取恢复建议
    pub fn recovery_hint(&self) -> Option<String> {
        match self.root() {
            AppError::Input(InputError::ClipboardEmpty) => {
                Some("复制一段文本后再按下热键".to_string())
            }
            AppError::Input(InputError::ClipboardAccess(_)) => {
                Some("请关闭正在占用剪贴板的应用后重试".to_string())
            }
            AppError::Input(InputError::TextTooLarge { .. }) => {
                Some("请分段转换，或在设置中提高最大文本长度".to_string())
            }
            AppError::Input(InputError::PermissionDenied) => {
                Some("请在系统设置中为 CaseShift 开启辅助功能权限".to_string())
            }
            AppError::Input(_) => Some("请手动粘贴转换结果".to_string()),
            AppError::Hotkey(HotkeyError::Conflict { .. }) => {
                Some("请在配置文件中为每种模式设置不同的热键".to_string())
            }
            AppError::Hotkey(_) => Some("请在配置文件中更换热键".to_string()),
            _ => None,
        }
    }

    /// 检查错误是否可恢复
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AppError::Config(_) | AppError::Internal(_))
    }

    /// 检查是否是权限错误
    pub fn is_permission_error(&self) -> bool {
        matches!(self.root(), AppError::Input(InputError::PermissionDenied))
    }
}

/// 应用结果类型
pub type AppResult<T> = Result<T, AppError>;

impl<E: Into<AppError>> From<RetryError<E>> for AppError {
    fn from(err: RetryError<E>) -> Self {
        match err {
            RetryError::Exhausted { attempts, last } => AppError::RetryExhausted {
                attempts,
                last: Box::new(last.into()),
            },
            RetryError::Permanent(err) => err.into(),
        }
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Internal(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }
}
