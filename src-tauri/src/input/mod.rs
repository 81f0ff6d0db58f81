//! 输入模块
//!
//! 提供剪贴板访问、焦点窗口检测、键盘模拟和自动粘贴功能
//!
//! # 子模块
//!
//! - [`error`] - 错误类型定义
//! - [`clipboard`] - 剪贴板读写与校验
//! - [`window`] - 焦点窗口检测
//! - [`keyboard`] - 键盘模拟
//! - [`autopaste`] - 自动粘贴触发器（整合窗口和键盘）
//! - [`platform`] - 平台特定功能
//!
//! 所有系统能力都通过 trait 暴露（[`ClipboardAccess`]、[`FocusTracker`]、
//! [`PasteKeystroke`]），转换流水线可以在测试中替换为假实现。
//!
//! # 平台支持
//!
//! | 平台 | 窗口检测 | 键盘模拟 | 剪贴板 |
//! |------|----------|----------|--------|
//! | Windows | ✅ | ✅ | ✅ |
//! | macOS | ✅ * | ✅ * | ✅ |
//! | Linux (X11) | ✅ | ✅ | ✅ |
//! | Linux (Wayland) | ⚠️ | ⚠️ | ✅ |
//!
//! * macOS 需要辅助功能权限

pub mod autopaste;
pub mod clipboard;
pub mod error;
pub mod keyboard;
pub mod platform;
pub mod window;

pub use autopaste::{AutoPaster, PasteReport};
pub use clipboard::{ClipboardAccess, ClipboardAccessor, SystemClipboard};
pub use error::{InputError, InputResult};
pub use keyboard::{EnigoKeystroke, KeyboardSimulator, PasteKeystroke};
pub use window::{capture_focus, get_focused_window, FocusTracker, SystemFocusTracker, WindowInfo};
