//! 热键管理模块
//!
//! 把全局组合键绑定到转换模式：
//!
//! - [`combo`] - 组合键解析与规范化
//! - [`registry`] - 绑定表与冲突检测
//! - [`register`] - 系统注册（Tauri 全局快捷键插件）
//! - [`handlers`] - 按下后触发转换流水线
//!
//! # 使用方法
//!
//! ```ignore
//! use caseshift_lib::hotkey::{conversion_callback, HotkeyListener, TauriHotkeyBackend};
//!
//! let mut listener = HotkeyListener::new(TauriHotkeyBackend::new(app.handle().clone()));
//! listener.bind_all(&config.hotkeys, conversion_callback(pipeline))?;
//! ```

pub mod combo;
mod config;
mod error;
mod handlers;
pub mod register;
pub mod registry;

pub use combo::{KeyCombo, Modifier};
pub use config::{HotkeyBinding, HotkeyConfig};
pub use error::{HotkeyError, HotkeyResult};
pub use handlers::conversion_callback;
pub use register::{HotkeyBackend, HotkeyCallback, HotkeyListener, TauriHotkeyBackend};
pub use registry::HotkeyRegistry;
