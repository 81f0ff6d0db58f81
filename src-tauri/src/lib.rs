/// Case transformation
pub mod convert;

/// Global hotkeys
pub mod hotkey;

/// Clipboard, focus tracking and auto-paste
pub mod input;

/// Conversion result notifications
pub mod notification;

/// Read → transform → write → paste state machine
pub mod pipeline;

/// Settings file access and hot reload
pub mod settings;

/// Pipeline state and configuration
pub mod state;

/// In-memory usage statistics
pub mod stats;

/// System tray
pub mod tray;

/// Release checks
pub mod update;

/// Utility modules
pub mod utils;

use std::sync::{Arc, Mutex};

use anyhow::Context;
use tauri::{AppHandle, Emitter, Manager, Wry};

use crate::hotkey::{conversion_callback, HotkeyListener, TauriHotkeyBackend};
use crate::input::{AutoPaster, EnigoKeystroke, SystemClipboard, SystemFocusTracker};
use crate::notification::TauriNotifier;
use crate::pipeline::{ConversionPipeline, PipelineSettings};
use crate::state::{config::init_config, StateEventEmitter, StateManager};
use crate::utils::AppError;

/// 应用错误事件名
pub const APP_ERROR_EVENT: &str = "app:error";

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    utils::logging::init_logging();

    tauri::Builder::default()
        .plugin(tauri_plugin_global_shortcut::Builder::new().build())
        .plugin(tauri_plugin_shell::init())
        .setup(|app| {
            #[cfg(target_os = "macos")]
            app.set_activation_policy(tauri::ActivationPolicy::Accessory);

            setup(app.handle())?;
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

/// 按依赖顺序初始化：配置 → 状态 → 流水线 → 托盘 → 热键 → 更新检查
fn setup(app: &AppHandle<Wry>) -> anyhow::Result<()> {
    let config = init_config(app).context("Failed to initialize config")?;
    let snapshot = config.get();

    if snapshot.behavior.auto_paste {
        if let Err(e) = input::platform::ensure_input_permission() {
            report_error(app, AppError::from(e));
        }
    }

    let state_manager = Arc::new(StateManager::new());
    app.manage(Arc::clone(&state_manager));

    let emitter = tauri::async_runtime::block_on(StateEventEmitter::start(
        app,
        Arc::clone(&state_manager),
    ));
    app.manage(emitter);

    let notifier = {
        let config = Arc::clone(&config);
        TauriNotifier::new(app.clone(), move || {
            config.get().notifications.effective_style()
        })
    };

    let paster = AutoPaster::new(
        Arc::new(SystemFocusTracker),
        Arc::new(EnigoKeystroke),
        snapshot.behavior.key_release_delay(),
    );

    let pipeline = Arc::new(
        ConversionPipeline::new(
            Arc::new(SystemClipboard::new()),
            state_manager,
            PipelineSettings::from_config(&snapshot),
        )
        .with_paster(paster)
        .with_notifier(Arc::new(notifier)),
    );
    app.manage(Arc::clone(&pipeline));

    tray::setup_tray(app, &snapshot.hotkeys).context("Failed to set up tray")?;

    // 热键失败不退出，托盘菜单仍可手动转换
    let mut listener = HotkeyListener::new(TauriHotkeyBackend::new(app.clone()));
    if let Err(e) = listener.bind_all(&snapshot.hotkeys, conversion_callback(pipeline)) {
        report_error(app, AppError::from(e));
    }
    app.manage(Mutex::new(listener));

    if snapshot.updates.check_on_startup {
        tray::spawn_update_check(app.clone(), false);
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "CaseShift started");
    Ok(())
}

/// 记录错误并通过 `app:error` 事件上报
pub(crate) fn report_error(app: &AppHandle<Wry>, err: AppError) {
    tracing::error!(kind = err.kind().name(), error = %err, "Application error");

    if let Err(e) = app.emit(APP_ERROR_EVENT, err.context()) {
        tracing::warn!(error = %e, "Failed to emit app error");
    }
}
