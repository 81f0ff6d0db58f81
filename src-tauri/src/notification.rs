//! 转换结果通知
//!
//! [`NotificationSink`] 接收每次转换的 [`ConversionResult`]，实现不得阻塞。
//! [`TauriNotifier`] 把通知作为 `conversion:notification` 事件发给前端，
//! 同时更新托盘提示文字。

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tauri::{AppHandle, Emitter, Runtime};

use crate::pipeline::ConversionResult;
use crate::utils::ErrorKind;

/// 通知事件名
pub const NOTIFICATION_EVENT: &str = "conversion:notification";

/// 托盘图标 ID
pub const TRAY_ID: &str = "main";

/// 相同通知的抑制窗口
const DUPLICATE_WINDOW: Duration = Duration::from_secs(5);

/// 通知样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStyle {
    /// 只显示警告和错误的标题
    Minimal,
    /// 标题 + 描述
    #[default]
    Standard,
    /// 额外显示耗时和字符数
    Detailed,
    /// 不显示
    None,
}

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

/// 一条待显示的通知
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: Option<String>,
}

impl Notification {
    /// 按样式把转换结果格式化为通知
    ///
    /// 样式为 `None`，或 `Minimal` 下的成功结果，返回 None
    pub fn for_result(result: &ConversionResult, style: NotificationStyle) -> Option<Self> {
        let level = if !result.success {
            match result.error {
                Some(ErrorKind::ConversionInProgress) => NotificationLevel::Warning,
                _ => NotificationLevel::Error,
            }
        } else if result.degraded {
            NotificationLevel::Warning
        } else {
            NotificationLevel::Success
        };

        let title = match level {
            NotificationLevel::Success => format!("已转换为 {}", result.mode.display_name()),
            NotificationLevel::Warning if result.degraded => "已复制，未能自动粘贴".to_string(),
            _ => result
                .error
                .map(|kind| kind.title().to_string())
                .unwrap_or_else(|| "转换失败".to_string()),
        };

        let message = match style {
            NotificationStyle::None => return None,
            NotificationStyle::Minimal if level == NotificationLevel::Success => return None,
            NotificationStyle::Minimal => None,
            NotificationStyle::Standard => Self::standard_message(result),
            NotificationStyle::Detailed => {
                let detail = format!("{} 字符，耗时 {} ms", result.char_count, result.duration_ms);
                match Self::standard_message(result) {
                    Some(message) => Some(format!("{}\n{}", message, detail)),
                    None => Some(detail),
                }
            }
        };

        Some(Self {
            level,
            title,
            message,
        })
    }

    fn standard_message(result: &ConversionResult) -> Option<String> {
        if let Some(message) = &result.message {
            return Some(message.clone());
        }
        if result.pasted {
            Some("结果已粘贴".to_string())
        } else {
            Some("结果已复制到剪贴板".to_string())
        }
    }

    /// 托盘提示文字
    pub fn tooltip(&self) -> String {
        match &self.message {
            Some(message) => {
                let first_line = message.lines().next().unwrap_or("");
                format!("CaseShift - {}: {}", self.title, first_line)
            }
            None => format!("CaseShift - {}", self.title),
        }
    }
}

/// 通知接收器
pub trait NotificationSink: Send + Sync {
    /// 接收一次转换结果，不得阻塞
    fn notify(&self, result: &ConversionResult);
}

/// 丢弃所有通知
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl NotificationSink for NullNotifier {
    fn notify(&self, _result: &ConversionResult) {}
}

/// 基于 Tauri 事件和托盘提示的通知
pub struct TauriNotifier<R: Runtime> {
    app: AppHandle<R>,
    style: Box<dyn Fn() -> NotificationStyle + Send + Sync>,
    recent: Mutex<HashMap<String, Instant>>,
}

impl<R: Runtime> TauriNotifier<R> {
    /// 创建通知器
    ///
    /// # Arguments
    ///
    /// * `app` - Tauri 应用句柄
    /// * `style` - 每次通知时读取当前样式，配置修改后无需重建
    pub fn new(
        app: AppHandle<R>,
        style: impl Fn() -> NotificationStyle + Send + Sync + 'static,
    ) -> Self {
        Self {
            app,
            style: Box::new(style),
            recent: Mutex::new(HashMap::new()),
        }
    }

    /// 5 秒内重复的通知只显示一次
    fn is_duplicate(&self, notification: &Notification) -> bool {
        let message = notification.message.as_deref().unwrap_or("");
        let key = format!("{}:{}", notification.title, message);
        let now = Instant::now();

        let Ok(mut recent) = self.recent.lock() else {
            return false;
        };
        recent.retain(|_, shown| now.duration_since(*shown) < DUPLICATE_WINDOW);

        if recent.contains_key(&key) {
            return true;
        }
        recent.insert(key, now);
        false
    }
}

impl<R: Runtime> NotificationSink for TauriNotifier<R> {
    fn notify(&self, result: &ConversionResult) {
        let Some(notification) = Notification::for_result(result, (self.style)()) else {
            return;
        };

        if self.is_duplicate(&notification) {
            tracing::trace!(title = %notification.title, "Duplicate notification suppressed");
            return;
        }

        if let Some(tray) = self.app.tray_by_id(TRAY_ID) {
            if let Err(e) = tray.set_tooltip(Some(notification.tooltip())) {
                tracing::debug!(error = %e, "Failed to update tray tooltip");
            }
        }

        if let Err(e) = self.app.emit(NOTIFICATION_EVENT, &notification) {
            tracing::warn!(error = %e, "Failed to emit notification event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::ConversionMode;

    fn ok_result() -> ConversionResult {
        ConversionResult::success(ConversionMode::Uppercase, "HELLO".into(), 12, true)
    }

    #[test]
    fn test_none_style_is_silent() {
        assert!(Notification::for_result(&ok_result(), NotificationStyle::None).is_none());
    }

    #[test]
    fn test_minimal_hides_success_but_shows_errors() {
        assert!(Notification::for_result(&ok_result(), NotificationStyle::Minimal).is_none());

        let failed = ConversionResult::failure(
            ConversionMode::Uppercase,
            ErrorKind::ClipboardEmpty,
            "剪贴板为空",
            3,
        );
        let n = Notification::for_result(&failed, NotificationStyle::Minimal).unwrap();
        assert_eq!(n.level, NotificationLevel::Error);
        assert!(n.message.is_none());
    }

    #[test]
    fn test_standard_success() {
        let n = Notification::for_result(&ok_result(), NotificationStyle::Standard).unwrap();
        assert_eq!(n.level, NotificationLevel::Success);
        assert!(n.title.contains("UPPERCASE"));
        assert_eq!(n.message.as_deref(), Some("结果已粘贴"));
    }

    #[test]
    fn test_detailed_includes_metrics() {
        let n = Notification::for_result(&ok_result(), NotificationStyle::Detailed).unwrap();
        let message = n.message.unwrap();
        assert!(message.contains("5 字符"));
        assert!(message.contains("12 ms"));
    }

    #[test]
    fn test_degraded_and_busy_are_warnings() {
        let degraded =
            ConversionResult::degraded(ConversionMode::Lowercase, "x".into(), 1, "粘贴失败");
        let n = Notification::for_result(&degraded, NotificationStyle::Standard).unwrap();
        assert_eq!(n.level, NotificationLevel::Warning);

        let busy = ConversionResult::busy(ConversionMode::Lowercase);
        let n = Notification::for_result(&busy, NotificationStyle::Minimal).unwrap();
        assert_eq!(n.level, NotificationLevel::Warning);
    }

    #[test]
    fn test_style_serde() {
        let style: NotificationStyle = serde_json::from_str("\"detailed\"").unwrap();
        assert_eq!(style, NotificationStyle::Detailed);
        assert_eq!(NotificationStyle::default(), NotificationStyle::Standard);
    }
}
