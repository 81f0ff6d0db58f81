//! 转换请求与结果

use serde::Serialize;

use crate::convert::ConversionMode;
use crate::input::WindowInfo;
use crate::utils::ErrorKind;

/// 触发来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerOrigin {
    /// 全局热键
    Hotkey,
    /// 托盘菜单
    Tray,
    /// 程序调用
    Manual,
}

/// 一次转换的触发信息
///
/// `focus` 是触发瞬间的焦点窗口，自动粘贴时用来恢复焦点
#[derive(Debug, Clone)]
pub struct Trigger {
    pub mode: ConversionMode,
    pub origin: TriggerOrigin,
    pub focus: Option<WindowInfo>,
}

impl Trigger {
    pub fn new(mode: ConversionMode, origin: TriggerOrigin) -> Self {
        Self {
            mode,
            origin,
            focus: None,
        }
    }

    /// 附带焦点窗口
    pub fn with_focus(mut self, focus: Option<WindowInfo>) -> Self {
        self.focus = focus;
        self
    }
}

/// 转换请求
///
/// 读到源文本后构造，立即消费，不持久化
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub mode: ConversionMode,
    pub source_text: String,
}

impl ConversionRequest {
    pub fn new(mode: ConversionMode, source_text: impl Into<String>) -> Self {
        Self {
            mode,
            source_text: source_text.into(),
        }
    }
}

/// 转换结果
///
/// 每次运行产生一个，交给通知接收器后丢弃。
/// 序列化时不包含输出文本。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    pub mode: ConversionMode,
    pub success: bool,
    #[serde(skip)]
    pub output_text: Option<String>,
    /// 输出字符数
    pub char_count: usize,
    pub duration_ms: u64,
    pub error: Option<ErrorKind>,
    /// 面向用户的错误描述
    pub message: Option<String>,
    /// 是否已自动粘贴
    pub pasted: bool,
    /// 剪贴板已更新但粘贴失败
    pub degraded: bool,
}

impl ConversionResult {
    /// 成功结果
    pub fn success(
        mode: ConversionMode,
        output_text: String,
        duration_ms: u64,
        pasted: bool,
    ) -> Self {
        Self {
            mode,
            success: true,
            char_count: output_text.chars().count(),
            output_text: Some(output_text),
            duration_ms,
            error: None,
            message: None,
            pasted,
            degraded: false,
        }
    }

    /// 降级成功：剪贴板已更新，但自动粘贴失败
    pub fn degraded(
        mode: ConversionMode,
        output_text: String,
        duration_ms: u64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: Some(ErrorKind::Paste),
            message: Some(message.into()),
            degraded: true,
            ..Self::success(mode, output_text, duration_ms, false)
        }
    }

    /// 失败结果
    pub fn failure(
        mode: ConversionMode,
        error: ErrorKind,
        message: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            mode,
            success: false,
            output_text: None,
            char_count: 0,
            duration_ms,
            error: Some(error),
            message: Some(message.into()),
            pasted: false,
            degraded: false,
        }
    }

    /// 因已有转换在进行而被拒绝
    pub fn busy(mode: ConversionMode) -> Self {
        Self::failure(
            mode,
            ErrorKind::ConversionInProgress,
            "已有转换正在进行，请稍后再试",
            0,
        )
    }

    /// 本次结果的结局名称（用于日志）
    pub fn outcome(&self) -> &'static str {
        match (self.success, self.degraded) {
            (true, false) => "done",
            (true, true) => "degraded",
            (false, _) if self.error == Some(ErrorKind::ConversionInProgress) => "rejected",
            (false, _) => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_outcomes() {
        let mode = ConversionMode::Lowercase;
        assert_eq!(ConversionResult::success(mode, "a".into(), 1, true).outcome(), "done");
        assert_eq!(ConversionResult::degraded(mode, "a".into(), 1, "x").outcome(), "degraded");
        assert_eq!(ConversionResult::busy(mode).outcome(), "rejected");
        assert_eq!(
            ConversionResult::failure(mode, ErrorKind::ClipboardEmpty, "x", 1).outcome(),
            "failed"
        );
    }

    #[test]
    fn test_degraded_result_keeps_output() {
        let result = ConversionResult::degraded(ConversionMode::Uppercase, "ABC".into(), 5, "x");
        assert!(result.success);
        assert!(!result.pasted);
        assert_eq!(result.output_text.as_deref(), Some("ABC"));
        assert_eq!(result.error, Some(ErrorKind::Paste));
    }

    #[test]
    fn test_serialized_result_omits_text() {
        let result = ConversionResult::success(ConversionMode::Uppercase, "SECRET".into(), 3, false);
        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("SECRET"));
        assert!(json.contains("\"char_count\":6"));
    }
}
