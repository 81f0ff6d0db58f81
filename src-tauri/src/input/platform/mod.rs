//! 平台特定实现模块
//!
//! 提供跨平台的系统交互功能，包括：
//! - 辅助功能权限检测（macOS）
//! - 把焦点还给指定窗口
//!
//! # 架构
//!
//! ```text
//! platform/
//! ├── mod.rs          - 平台抽象
//! ├── macos.rs        - macOS 特定实现
//! ├── linux.rs        - Linux 特定实现
//! └── windows.rs      - Windows 特定实现
//! ```

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(target_os = "windows")]
pub mod windows;

use serde::{Deserialize, Serialize};

use super::error::{InputError, InputResult};
use super::window::WindowInfo;

/// 平台类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Windows
    Windows,
    /// macOS
    MacOS,
    /// Linux
    Linux,
    /// 未知平台
    Unknown,
}

impl Platform {
    /// 获取当前平台
    pub fn current() -> Self {
        #[cfg(target_os = "windows")]
        return Platform::Windows;

        #[cfg(target_os = "macos")]
        return Platform::MacOS;

        #[cfg(target_os = "linux")]
        return Platform::Linux;

        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        return Platform::Unknown;
    }

    /// 获取平台名称
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Windows => "Windows",
            Platform::MacOS => "macOS",
            Platform::Linux => "Linux",
            Platform::Unknown => "Unknown",
        }
    }

    /// 粘贴快捷键的显示名称
    pub fn paste_shortcut(&self) -> &'static str {
        match self {
            Platform::MacOS => "Cmd+V",
            _ => "Ctrl+V",
        }
    }
}

/// 权限状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    /// 已授权
    Granted,
    /// 被拒绝
    Denied,
    /// 不适用（平台不需要此权限）
    NotApplicable,
}

impl PermissionStatus {
    /// 是否可以模拟按键
    pub fn allows_input(&self) -> bool {
        !matches!(self, PermissionStatus::Denied)
    }
}

/// 检查辅助功能权限
pub fn check_accessibility_permission() -> PermissionStatus {
    #[cfg(target_os = "macos")]
    {
        if macos::check_accessibility_permission() {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }

    #[cfg(not(target_os = "macos"))]
    {
        PermissionStatus::NotApplicable
    }
}

/// 请求辅助功能权限
///
/// 在 macOS 上会显示系统权限请求对话框
pub fn request_accessibility_permission() -> bool {
    #[cfg(target_os = "macos")]
    {
        macos::request_accessibility_permission()
    }

    #[cfg(not(target_os = "macos"))]
    {
        true
    }
}

/// 启动时检查权限，缺失时提示用户
///
/// # Errors
///
/// 权限被拒绝时返回 [`InputError::PermissionDenied`]
pub fn ensure_input_permission() -> InputResult<()> {
    let status = check_accessibility_permission();
    tracing::info!(platform = Platform::current().name(), ?status, "Accessibility permission");

    if status.allows_input() {
        return Ok(());
    }

    if request_accessibility_permission() {
        return Ok(());
    }

    open_permission_settings();
    Err(InputError::PermissionDenied)
}

/// 打开系统权限设置
pub fn open_permission_settings() {
    #[cfg(target_os = "macos")]
    {
        macos::open_accessibility_settings();
    }

    #[cfg(target_os = "windows")]
    {
        windows::open_settings();
    }

    #[cfg(target_os = "linux")]
    {
        tracing::info!("Linux does not require special permission settings");
    }
}

/// 把焦点切换到指定窗口
///
/// # Errors
///
/// - `InputError::FocusRestoreFailed` - 平台调用失败
pub fn activate_window(window: &WindowInfo) -> InputResult<()> {
    tracing::debug!(pid = window.process_id, window_id = window.window_id, "Activating window");

    #[cfg(target_os = "macos")]
    {
        macos::activate_process(window.process_id)
    }

    #[cfg(target_os = "linux")]
    {
        linux::activate_window(window.window_id)
    }

    #[cfg(target_os = "windows")]
    {
        windows::activate_window(window.window_id)
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        Err(InputError::FocusRestoreFailed(format!(
            "Unsupported platform: {}",
            Platform::current().name()
        )))
    }
}
