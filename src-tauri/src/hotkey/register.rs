//! 热键注册模块
//!
//! [`HotkeyListener`] 先用 [`HotkeyRegistry`] 做冲突检测，
//! 全部通过后才交给 [`HotkeyBackend`] 向系统注册

use std::sync::Arc;

use tauri::{AppHandle, Runtime};
use tauri_plugin_global_shortcut::{GlobalShortcutExt, Shortcut, ShortcutState};

use super::combo::KeyCombo;
use super::config::HotkeyConfig;
use super::error::{HotkeyError, HotkeyResult};
use super::registry::HotkeyRegistry;
use crate::convert::ConversionMode;

/// 热键按下时的回调，参数为绑定的转换模式
pub type HotkeyCallback = Arc<dyn Fn(ConversionMode) + Send + Sync>;

/// 系统热键后端
pub trait HotkeyBackend: Send + Sync {
    /// 注册一个组合键，按下时以 `mode` 调用 `callback`
    fn register(
        &self,
        combo: &KeyCombo,
        mode: ConversionMode,
        callback: HotkeyCallback,
    ) -> HotkeyResult<()>;

    /// 注销本应用注册的所有热键
    fn unregister_all(&self) -> HotkeyResult<()>;
}

/// 基于 tauri-plugin-global-shortcut 的后端
pub struct TauriHotkeyBackend<R: Runtime> {
    app: AppHandle<R>,
}

impl<R: Runtime> TauriHotkeyBackend<R> {
    pub fn new(app: AppHandle<R>) -> Self {
        Self { app }
    }
}

impl<R: Runtime> HotkeyBackend for TauriHotkeyBackend<R> {
    fn register(
        &self,
        combo: &KeyCombo,
        mode: ConversionMode,
        callback: HotkeyCallback,
    ) -> HotkeyResult<()> {
        let accelerator = combo.to_accelerator();
        let shortcut = parse_shortcut(&accelerator)?;

        self.app
            .global_shortcut()
            .on_shortcut(shortcut, move |_app, _shortcut, event| {
                if event.state == ShortcutState::Pressed {
                    callback(mode);
                }
            })
            .map_err(|e| HotkeyError::RegistrationFailed {
                hotkey: accelerator,
                reason: e.to_string(),
            })
    }

    fn unregister_all(&self) -> HotkeyResult<()> {
        self.app
            .global_shortcut()
            .unregister_all()
            .map_err(|e| HotkeyError::UnregistrationFailed {
                hotkey: "*".to_string(),
                reason: e.to_string(),
            })
    }
}

/// 解析加速键字符串为 Shortcut
fn parse_shortcut(accelerator: &str) -> HotkeyResult<Shortcut> {
    accelerator
        .parse::<Shortcut>()
        .map_err(|_| HotkeyError::InvalidFormat(accelerator.to_string()))
}

/// 热键监听器
///
/// 持有当前生效的绑定表
///
/// # Examples
///
/// ```ignore
/// use std::sync::Arc;
/// use caseshift_lib::hotkey::{HotkeyConfig, HotkeyListener, TauriHotkeyBackend};
///
/// let mut listener = HotkeyListener::new(TauriHotkeyBackend::new(app.handle().clone()));
/// listener.bind_all(&HotkeyConfig::default(), Arc::new(|mode| println!("{mode}")))?;
/// ```
pub struct HotkeyListener<B: HotkeyBackend> {
    backend: B,
    registry: HotkeyRegistry,
}

impl<B: HotkeyBackend> HotkeyListener<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            registry: HotkeyRegistry::new(),
        }
    }

    /// 当前生效的绑定
    pub fn registry(&self) -> &HotkeyRegistry {
        &self.registry
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// 注册配置中所有启用的热键
    ///
    /// 冲突和格式错误在注册任何系统热键之前返回。
    /// 系统注册中途失败时，已注册的热键会被清理。
    ///
    /// # Returns
    ///
    /// 注册成功的热键数量
    ///
    /// # Errors
    ///
    /// - [`HotkeyError::InvalidFormat`] / [`HotkeyError::Conflict`] - 配置问题
    /// - [`HotkeyError::RegistrationFailed`] - 系统拒绝注册（通常被其他应用占用）
    pub fn bind_all(
        &mut self,
        config: &HotkeyConfig,
        callback: HotkeyCallback,
    ) -> HotkeyResult<usize> {
        let registry = HotkeyRegistry::from_config(config)?;

        for (combo, mode) in registry.iter() {
            if let Err(e) = self.backend.register(combo, mode, Arc::clone(&callback)) {
                tracing::error!(
                    hotkey = %combo,
                    mode = %mode,
                    error = %e,
                    "Failed to register hotkey"
                );
                if let Err(cleanup) = self.backend.unregister_all() {
                    tracing::warn!(
                        error = %cleanup,
                        "Failed to clean up partially registered hotkeys"
                    );
                }
                self.registry = HotkeyRegistry::new();
                return Err(e);
            }

            tracing::info!(
                hotkey = %combo,
                label = %combo.symbol_label(),
                mode = %mode,
                "Registered hotkey"
            );
        }

        let count = registry.len();
        self.registry = registry;
        tracing::info!(count, "All global hotkeys registered");
        Ok(count)
    }

    /// 注销全部热键
    pub fn unbind_all(&mut self) -> HotkeyResult<()> {
        self.backend.unregister_all()?;
        self.registry = HotkeyRegistry::new();
        tracing::info!("All global hotkeys unregistered");
        Ok(())
    }

    /// 用新配置重新绑定
    ///
    /// 新配置无效时保留原有绑定
    pub fn rebind(
        &mut self,
        config: &HotkeyConfig,
        callback: HotkeyCallback,
    ) -> HotkeyResult<usize> {
        HotkeyRegistry::from_config(config)?;
        self.unbind_all()?;
        self.bind_all(config, callback)
    }
}
