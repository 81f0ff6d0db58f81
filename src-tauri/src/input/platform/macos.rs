//! macOS 平台特定实现
//!
//! macOS 要求应用获得辅助功能权限才能模拟键盘输入和监听全局热键

#![cfg(target_os = "macos")]

use std::process::Command;

use crate::input::error::{InputError, InputResult};

/// 检查辅助功能权限，不显示对话框
pub fn check_accessibility_permission() -> bool {
    macos_accessibility_client::accessibility::application_is_trusted()
}

/// 请求辅助功能权限
///
/// 如果应用未被信任，会显示系统权限请求对话框。
/// 用户授权后需要重启应用才能生效。
pub fn request_accessibility_permission() -> bool {
    macos_accessibility_client::accessibility::application_is_trusted_with_prompt()
}

/// 打开"隐私与安全性" > "辅助功能"面板
pub fn open_accessibility_settings() {
    if let Err(e) = Command::new("open")
        .arg("x-apple.systempreferences:com.apple.preference.security?Privacy_Accessibility")
        .spawn()
    {
        tracing::warn!(error = %e, "Failed to open accessibility settings");
    }
}

/// 把指定进程的应用切换到前台
pub fn activate_process(pid: u32) -> InputResult<()> {
    let script = format!(
        "tell application \"System Events\" to set frontmost of (first process whose unix id is {}) to true",
        pid
    );

    let output = Command::new("osascript")
        .arg("-e")
        .arg(script)
        .output()
        .map_err(|e| InputError::FocusRestoreFailed(format!("Failed to run osascript: {}", e)))?;

    if output.status.success() {
        Ok(())
    } else {
        Err(InputError::FocusRestoreFailed(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }
}
