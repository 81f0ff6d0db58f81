//! 系统托盘模块
//!
//! 托盘菜单：每种转换模式一项（手动触发）、使用统计、设置文件、检查更新、退出。
//! 使用统计和更新检查的结果通过事件（`stats:summary`、`update:status`）
//! 和托盘提示反馈。

use std::sync::Arc;

use serde::Serialize;
use tauri::{
    image::Image,
    menu::{Menu, MenuItem, PredefinedMenuItem},
    tray::TrayIconBuilder,
    AppHandle, Emitter, Manager, Runtime, Wry,
};
use tauri_plugin_shell::ShellExt;
use thiserror::Error;

use crate::convert::ConversionMode;
use crate::hotkey::{HotkeyConfig, KeyCombo};
use crate::notification::TRAY_ID;
use crate::pipeline::{ConversionPipeline, Trigger, TriggerOrigin};
use crate::settings;
use crate::state::GlobalConfig;
use crate::stats::STATS_EVENT;
use crate::update::{AvailableUpdate, UpdateChecker, Version};
use crate::utils::AppError;

/// 更新检查结果事件名
pub const UPDATE_EVENT: &str = "update:status";

/// 托盘错误类型
#[derive(Error, Debug)]
pub enum TrayError {
    /// Tauri 错误
    #[error("Tauri error: {0}")]
    Tauri(#[from] tauri::Error),

    /// 菜单创建失败
    #[error("Failed to create menu: {0}")]
    MenuCreation(String),

    /// 托盘图标创建失败
    #[error("Failed to create tray icon: {0}")]
    TrayCreation(String),

    /// 图标加载失败
    #[error("Failed to load icon: {0}")]
    IconLoad(String),
}

/// 托盘结果类型
pub type TrayResult<T> = Result<T, TrayError>;

/// 托盘菜单项 ID
pub mod menu_ids {
    pub const CONVERT_PREFIX: &str = "convert:";
    pub const SHOW_STATISTICS: &str = "show_statistics";
    pub const OPEN_SETTINGS: &str = "open_settings";
    pub const RELOAD_SETTINGS: &str = "reload_settings";
    pub const CHECK_UPDATES: &str = "check_updates";
    pub const QUIT: &str = "quit";
}

/// 菜单动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayAction {
    Convert(ConversionMode),
    ShowStatistics,
    OpenSettings,
    ReloadSettings,
    CheckUpdates,
    Quit,
}

impl TrayAction {
    /// 菜单项 ID
    pub fn menu_id(&self) -> String {
        match self {
            Self::Convert(mode) => format!("{}{}", menu_ids::CONVERT_PREFIX, mode.name()),
            Self::ShowStatistics => menu_ids::SHOW_STATISTICS.to_string(),
            Self::OpenSettings => menu_ids::OPEN_SETTINGS.to_string(),
            Self::ReloadSettings => menu_ids::RELOAD_SETTINGS.to_string(),
            Self::CheckUpdates => menu_ids::CHECK_UPDATES.to_string(),
            Self::Quit => menu_ids::QUIT.to_string(),
        }
    }

    /// 从菜单项 ID 解析
    pub fn from_menu_id(id: &str) -> Option<Self> {
        if let Some(mode) = id.strip_prefix(menu_ids::CONVERT_PREFIX) {
            return mode.parse().ok().map(Self::Convert);
        }
        match id {
            menu_ids::SHOW_STATISTICS => Some(Self::ShowStatistics),
            menu_ids::OPEN_SETTINGS => Some(Self::OpenSettings),
            menu_ids::RELOAD_SETTINGS => Some(Self::ReloadSettings),
            menu_ids::CHECK_UPDATES => Some(Self::CheckUpdates),
            menu_ids::QUIT => Some(Self::Quit),
            _ => None,
        }
    }
}

/// 转换菜单项文字，附带已绑定的热键
pub fn menu_label(mode: ConversionMode, hotkeys: &HotkeyConfig) -> String {
    let binding = hotkeys.binding(mode);
    let combo = binding
        .enabled
        .then(|| KeyCombo::parse(&binding.shortcut).ok())
        .flatten();

    match combo {
        Some(combo) if cfg!(target_os = "macos") => {
            format!("{}    {}", mode.display_name(), combo.symbol_label())
        }
        Some(combo) => format!("{}    ({})", mode.display_name(), combo),
        None => mode.display_name().to_string(),
    }
}

/// 设置系统托盘
///
/// # Arguments
///
/// * `app` - Tauri 应用句柄
/// * `hotkeys` - 用于在菜单项上显示热键
pub fn setup_tray(app: &AppHandle<Wry>, hotkeys: &HotkeyConfig) -> TrayResult<()> {
    tracing::info!("Setting up system tray");

    let mut convert_items = Vec::with_capacity(ConversionMode::ALL.len());
    for mode in ConversionMode::ALL {
        let item = MenuItem::with_id(
            app,
            TrayAction::Convert(mode).menu_id(),
            menu_label(mode, hotkeys),
            true,
            None::<&str>,
        )
        .map_err(|e| TrayError::MenuCreation(e.to_string()))?;
        convert_items.push(item);
    }

    let separator = PredefinedMenuItem::separator(app)
        .map_err(|e| TrayError::MenuCreation(e.to_string()))?;

    let show_statistics = MenuItem::with_id(
        app,
        menu_ids::SHOW_STATISTICS,
        "Show Statistics",
        true,
        None::<&str>,
    )
    .map_err(|e| TrayError::MenuCreation(e.to_string()))?;

    let open_settings = MenuItem::with_id(
        app,
        menu_ids::OPEN_SETTINGS,
        "Open Settings File…",
        true,
        None::<&str>,
    )
    .map_err(|e| TrayError::MenuCreation(e.to_string()))?;

    let reload_settings = MenuItem::with_id(
        app,
        menu_ids::RELOAD_SETTINGS,
        "Reload Settings",
        true,
        None::<&str>,
    )
    .map_err(|e| TrayError::MenuCreation(e.to_string()))?;

    let second_separator = PredefinedMenuItem::separator(app)
        .map_err(|e| TrayError::MenuCreation(e.to_string()))?;

    let check_updates = MenuItem::with_id(
        app,
        menu_ids::CHECK_UPDATES,
        "Check for Updates…",
        true,
        None::<&str>,
    )
    .map_err(|e| TrayError::MenuCreation(e.to_string()))?;

    let quit = MenuItem::with_id(app, menu_ids::QUIT, "Quit CaseShift", true, None::<&str>)
        .map_err(|e| TrayError::MenuCreation(e.to_string()))?;

    let menu = Menu::new(app).map_err(|e| TrayError::MenuCreation(e.to_string()))?;
    for item in &convert_items {
        menu.append(item)
            .map_err(|e| TrayError::MenuCreation(e.to_string()))?;
    }
    menu.append_items(&[
        &separator,
        &show_statistics,
        &open_settings,
        &reload_settings,
        &second_separator,
        &check_updates,
        &quit,
    ])
        .map_err(|e| TrayError::MenuCreation(e.to_string()))?;

    let icon = get_tray_icon(app)?;

    TrayIconBuilder::with_id(TRAY_ID)
        .icon(icon)
        .menu(&menu)
        .show_menu_on_left_click(true)
        .tooltip("CaseShift - Clipboard Case Converter")
        .on_menu_event(move |app, event| {
            handle_menu_event(app, event.id.as_ref());
        })
        .build(app)
        .map_err(|e| TrayError::TrayCreation(e.to_string()))?;

    tracing::info!("System tray setup complete");
    Ok(())
}

/// 处理菜单事件
fn handle_menu_event(app: &AppHandle<Wry>, menu_id: &str) {
    tracing::debug!(menu_id = %menu_id, "Tray menu event");

    match TrayAction::from_menu_id(menu_id) {
        Some(TrayAction::Convert(mode)) => match app.try_state::<Arc<ConversionPipeline>>() {
            Some(pipeline) => pipeline.spawn(Trigger::new(mode, TriggerOrigin::Tray)),
            None => tracing::warn!("Pipeline not available, ignoring tray conversion"),
        },
        Some(TrayAction::ShowStatistics) => show_statistics(app),
        Some(TrayAction::OpenSettings) => {
            if let Err(e) = settings::open_settings_file(app) {
                crate::report_error(app, e);
            }
        }
        Some(TrayAction::ReloadSettings) => match settings::reload_settings(app) {
            Ok(_) => set_tooltip(app, "CaseShift - 设置已重新加载".to_string()),
            Err(e) => {
                set_tooltip(app, format!("CaseShift - {}", e.user_message()));
                crate::report_error(app, e);
            }
        },
        Some(TrayAction::CheckUpdates) => spawn_update_check(app.clone(), true),
        Some(TrayAction::Quit) => {
            tracing::info!("User requested quit from tray menu");
            app.exit(0);
        }
        None => {
            tracing::warn!(menu_id = %menu_id, "Unknown menu event");
        }
    }
}

/// 在托盘提示中显示使用统计，并发送统计事件
fn show_statistics(app: &AppHandle<Wry>) {
    let Some(pipeline) = app.try_state::<Arc<ConversionPipeline>>() else {
        tracing::warn!("Pipeline not available, no statistics to show");
        return;
    };

    let summary = pipeline.stats().summary();
    tracing::info!(
        total = summary.total,
        successful = summary.successful,
        failed = summary.failed,
        rejected = summary.rejected,
        "Usage statistics requested"
    );

    set_tooltip(app, summary.tooltip());
    if let Err(e) = app.emit(STATS_EVENT, &summary) {
        tracing::warn!(error = %e, "Failed to emit usage statistics");
    }
}

/// 获取托盘图标
fn get_tray_icon(app: &AppHandle<Wry>) -> TrayResult<Image<'static>> {
    match app.default_window_icon() {
        Some(icon) => {
            let rgba = icon.rgba().to_vec();
            Ok(Image::new_owned(rgba, icon.width(), icon.height()))
        }
        None => Err(TrayError::IconLoad("No default icon available".to_string())),
    }
}

/// 更新检查结果
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpdateStatus {
    Available(AvailableUpdate),
    UpToDate { current: String },
    Failed { message: String },
}

/// 在后台检查更新
///
/// `manual` 为 true 时（托盘触发）发现更新会直接打开发布页面，
/// 没有更新或失败时也会反馈；启动时的自动检查只在有更新时提示
pub fn spawn_update_check<R: Runtime>(app: AppHandle<R>, manual: bool) {
    let Some(config) = app.try_state::<Arc<GlobalConfig>>() else {
        tracing::warn!("Config not available, skipping update check");
        return;
    };
    let updates = config.get().updates.clone();

    tauri::async_runtime::spawn(async move {
        let status = match UpdateChecker::new(&updates, Version::current()) {
            Ok(checker) => match checker.check().await {
                Ok(Some(update)) => UpdateStatus::Available(update),
                Ok(None) => UpdateStatus::UpToDate {
                    current: checker.current_version().to_string(),
                },
                Err(e) => {
                    let err = AppError::from(e);
                    tracing::warn!(error = %err, "Update check failed");
                    UpdateStatus::Failed {
                        message: err.user_message(),
                    }
                }
            },
            Err(e) => {
                let err = AppError::from(e);
                tracing::warn!(error = %err, "Update checker unavailable");
                UpdateStatus::Failed {
                    message: err.user_message(),
                }
            }
        };

        report_update_status(&app, &status, manual);
    });
}

fn report_update_status<R: Runtime>(app: &AppHandle<R>, status: &UpdateStatus, manual: bool) {
    if !manual && !matches!(status, UpdateStatus::Available(_)) {
        return;
    }

    let tooltip = match status {
        UpdateStatus::Available(update) => {
            format!("CaseShift - 新版本 {} 可用", update.version)
        }
        UpdateStatus::UpToDate { current } => format!("CaseShift {} 已是最新版本", current),
        UpdateStatus::Failed { message } => format!("CaseShift - {}", message),
    };

    set_tooltip(app, tooltip);

    if let Err(e) = app.emit(UPDATE_EVENT, status) {
        tracing::warn!(error = %e, "Failed to emit update status");
    }

    if let (true, UpdateStatus::Available(update)) = (manual, status) {
        open_external(app, &update.release.html_url);
    }
}

fn set_tooltip<R: Runtime>(app: &AppHandle<R>, tooltip: String) {
    if let Some(tray) = app.tray_by_id(TRAY_ID) {
        if let Err(e) = tray.set_tooltip(Some(tooltip)) {
            tracing::debug!(error = %e, "Failed to update tray tooltip");
        }
    }
}

/// 用系统默认程序打开网址或文件
#[allow(deprecated)]
pub(crate) fn open_external<R: Runtime>(app: &AppHandle<R>, target: &str) {
    if let Err(e) = app.shell().open(target, None) {
        tracing::warn!(error = %e, target = %target, "Failed to open with system handler");
    }
}
