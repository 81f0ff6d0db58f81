//! Windows 平台特定实现

#![cfg(target_os = "windows")]

use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::SetForegroundWindow;

use crate::input::error::{InputError, InputResult};

/// 打开 Windows 设置
pub fn open_settings() {
    if let Err(e) = std::process::Command::new("cmd")
        .args(["/C", "start", "ms-settings:"])
        .spawn()
    {
        tracing::warn!(error = %e, "Failed to open settings");
    }
}

/// 把窗口切换到前台
pub fn activate_window(window_id: u32) -> InputResult<()> {
    let hwnd = HWND(window_id as usize as *mut core::ffi::c_void);

    // SAFETY: SetForegroundWindow 只读取句柄值，句柄失效时返回 FALSE
    let ok = unsafe { SetForegroundWindow(hwnd) };

    if ok.as_bool() {
        Ok(())
    } else {
        Err(InputError::FocusRestoreFailed(format!(
            "SetForegroundWindow rejected window {}",
            window_id
        )))
    }
}
