//! 设置文件的打开与热重载
//!
//! 设置没有独立窗口：托盘菜单用系统默认程序打开 `config.json`，
//! 用户编辑后选择“重新加载设置”即可生效，无需重启。

use std::sync::{Arc, Mutex};

use tauri::{AppHandle, Manager, Wry};

use crate::hotkey::{conversion_callback, HotkeyListener, TauriHotkeyBackend};
use crate::pipeline::{ConversionPipeline, PipelineSettings};
use crate::state::{ConfigError, ConfigManager, GlobalConfig};
use crate::utils::{AppError, AppResult};

/// 托管在应用状态中的热键监听器
pub type ManagedListener = Mutex<HotkeyListener<TauriHotkeyBackend<Wry>>>;

/// 打开设置文件
///
/// 文件不存在时先写入当前配置，保证用户打开的是完整的设置
///
/// # Errors
///
/// - `AppError::Config` - 无法确定配置目录或写入失败
/// - `AppError::Internal` - 配置未初始化
pub fn open_settings_file(app: &AppHandle<Wry>) -> AppResult<()> {
    let path = ConfigManager::config_path(app)?;

    if !path.exists() {
        let config = managed::<Arc<GlobalConfig>>(app)?;
        ConfigManager::save(app, &config.get())?;
    }

    tracing::info!(path = %path.display(), "Opening settings file");
    crate::tray::open_external(app, &path.to_string_lossy());
    Ok(())
}

/// 从磁盘重新加载设置
///
/// 新设置无效时不做任何修改；有效时依次更新全局配置、流水线参数和热键绑定。
/// 返回重新注册的热键数量。
///
/// # Errors
///
/// - `AppError::Config` - 设置无效
/// - `AppError::Hotkey` - 热键重新注册失败
pub fn reload_settings(app: &AppHandle<Wry>) -> AppResult<usize> {
    let config = ConfigManager::load(app)?;

    let issues = config.validate();
    if !issues.is_empty() {
        return Err(ConfigError::Invalid(issues).into());
    }

    let global = managed::<Arc<GlobalConfig>>(app)?;
    let pipeline = managed::<Arc<ConversionPipeline>>(app)?;
    let listener = managed::<ManagedListener>(app)?;

    global.update(config.clone());
    pipeline.update_settings(PipelineSettings::from_config(&config));

    let mut listener = listener
        .lock()
        .map_err(|_| AppError::Internal("Hotkey listener lock poisoned".to_string()))?;
    let callback = conversion_callback(Arc::clone(pipeline.inner()));
    let count = listener.rebind(&config.hotkeys, callback)?;

    tracing::info!(
        hotkeys = count,
        auto_paste = config.behavior.auto_paste,
        "Settings reloaded"
    );
    Ok(count)
}

fn managed<T: Send + Sync + 'static>(app: &AppHandle<Wry>) -> AppResult<tauri::State<'_, T>> {
    app.try_state::<T>().ok_or_else(|| {
        AppError::Internal(format!("{} is not initialized", std::any::type_name::<T>()))
    })
}
