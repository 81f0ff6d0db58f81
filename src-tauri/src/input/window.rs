//! 窗口检测模块
//!
//! 记录触发热键时的焦点窗口，并在自动粘贴前确认焦点没有被转移
//!
//! # 平台说明
//!
//! - **Windows**: 使用 Windows API 获取和激活窗口
//! - **macOS**: 需要屏幕录制权限才能获取窗口标题
//! - **Linux (X11)**: 直接支持，激活窗口依赖 `xdotool`
//! - **Linux (GNOME > 41)**: 需要安装并启用 x-win 扩展

use serde::Serialize;

use super::error::{InputError, InputResult};
use super::platform;

/// 窗口信息
///
/// 包含当前活动窗口的基本信息
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowInfo {
    /// 应用程序名称
    pub app_name: String,
    /// 窗口标题
    pub title: String,
    /// 进程 ID
    pub process_id: u32,
    /// 可执行文件名称
    pub exec_name: String,
    /// 窗口 ID
    pub window_id: u32,
}

impl WindowInfo {
    /// 是否与另一个窗口是同一个窗口
    ///
    /// 只比较进程和窗口 ID，标题可能随内容变化
    pub fn same_window(&self, other: &WindowInfo) -> bool {
        self.process_id == other.process_id && self.window_id == other.window_id
    }
}

/// 焦点窗口跟踪
///
/// 生产环境使用 [`SystemFocusTracker`]
pub trait FocusTracker: Send + Sync {
    /// 获取当前焦点窗口
    fn focused_window(&self) -> InputResult<WindowInfo>;

    /// 把焦点切换到指定窗口
    fn activate(&self, window: &WindowInfo) -> InputResult<()>;
}

/// 基于 x-win 和平台 API 的焦点跟踪
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFocusTracker;

impl FocusTracker for SystemFocusTracker {
    fn focused_window(&self) -> InputResult<WindowInfo> {
        get_focused_window()
    }

    fn activate(&self, window: &WindowInfo) -> InputResult<()> {
        platform::activate_window(window)
    }
}

/// 获取当前焦点窗口信息
///
/// # Errors
///
/// - `InputError::WindowDetectionFailed` - 窗口检测失败
pub fn get_focused_window() -> InputResult<WindowInfo> {
    match x_win::get_active_window() {
        Ok(active_window) => {
            let info = WindowInfo {
                app_name: active_window.info.name.clone(),
                title: active_window.title.clone(),
                process_id: active_window.info.process_id,
                exec_name: active_window.info.exec_name.clone(),
                window_id: active_window.id,
            };

            tracing::debug!(
                app = %info.app_name,
                pid = info.process_id,
                window_id = info.window_id,
                "Got focused window"
            );

            Ok(info)
        }
        Err(e) => {
            tracing::warn!(error = ?e, "Failed to get active window");
            Err(InputError::WindowDetectionFailed(format!("{:?}", e)))
        }
    }
}

/// 获取当前焦点窗口，失败时返回 None 并记录日志
pub fn capture_focus(tracker: &dyn FocusTracker) -> Option<WindowInfo> {
    match tracker.focused_window() {
        Ok(window) => Some(window),
        Err(e) => {
            tracing::debug!(error = %e, "Could not capture focused window");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(pid: u32, id: u32, title: &str) -> WindowInfo {
        WindowInfo {
            app_name: "TextEdit".to_string(),
            title: title.to_string(),
            process_id: pid,
            exec_name: "TextEdit".to_string(),
            window_id: id,
        }
    }

    #[test]
    fn test_same_window_ignores_title() {
        let a = window(10, 1, "Untitled");
        let b = window(10, 1, "Untitled (Edited)");
        assert!(a.same_window(&b));
    }

    #[test]
    fn test_different_windows() {
        assert!(!window(10, 1, "a").same_window(&window(10, 2, "a")));
        assert!(!window(10, 1, "a").same_window(&window(11, 1, "a")));
    }

    struct FailingTracker;

    impl FocusTracker for FailingTracker {
        fn focused_window(&self) -> InputResult<WindowInfo> {
            Err(InputError::WindowDetectionFailed("headless".to_string()))
        }

        fn activate(&self, _window: &WindowInfo) -> InputResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_capture_focus_swallows_detection_failure() {
        assert!(capture_focus(&FailingTracker).is_none());
    }
}
