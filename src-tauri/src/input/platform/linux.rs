//! Linux 平台特定实现
//!
//! # 显示服务器
//!
//! - X11: 完全支持，激活窗口依赖 `xdotool`
//! - Wayland: 合成器不允许应用抢占焦点，无法恢复焦点

#![cfg(target_os = "linux")]

use std::process::Command;

use serde::{Deserialize, Serialize};

use crate::input::error::{InputError, InputResult};

/// 显示服务器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayServer {
    /// X11 显示服务器
    X11,
    /// Wayland 合成器
    Wayland,
    /// 未知或未检测到
    Unknown,
}

impl DisplayServer {
    /// 获取显示服务器名称
    pub fn name(&self) -> &'static str {
        match self {
            DisplayServer::X11 => "X11",
            DisplayServer::Wayland => "Wayland",
            DisplayServer::Unknown => "Unknown",
        }
    }
}

/// 检测当前显示服务器
///
/// 依次检查 `WAYLAND_DISPLAY`、`XDG_SESSION_TYPE` 和 `DISPLAY`
pub fn detect_display_server() -> DisplayServer {
    if std::env::var("WAYLAND_DISPLAY").is_ok() {
        return DisplayServer::Wayland;
    }

    if let Ok(session_type) = std::env::var("XDG_SESSION_TYPE") {
        match session_type.to_lowercase().as_str() {
            "wayland" => return DisplayServer::Wayland,
            "x11" => return DisplayServer::X11,
            _ => {}
        }
    }

    if std::env::var("DISPLAY").is_ok() {
        return DisplayServer::X11;
    }

    DisplayServer::Unknown
}

/// 通过 `xdotool` 激活窗口
pub fn activate_window(window_id: u32) -> InputResult<()> {
    let server = detect_display_server();
    if server != DisplayServer::X11 {
        return Err(InputError::FocusRestoreFailed(format!(
            "Window activation is not supported on {}",
            server.name()
        )));
    }

    let status = Command::new("xdotool")
        .arg("windowactivate")
        .arg(window_id.to_string())
        .status()
        .map_err(|e| InputError::FocusRestoreFailed(format!("Failed to run xdotool: {}", e)))?;

    if status.success() {
        Ok(())
    } else {
        Err(InputError::FocusRestoreFailed(format!(
            "xdotool exited with {}",
            status
        )))
    }
}
