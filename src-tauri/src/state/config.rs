//! 应用配置模块
//!
//! 提供应用程序配置的加载、保存和管理功能
//!
//! # 配置存储位置
//!
//! - Windows: `%APPDATA%/com.caseshift.app/config.json`
//! - macOS: `~/Library/Application Support/com.caseshift.app/config.json`
//! - Linux: `~/.config/com.caseshift.app/config.json`
//!
//! 保存时先把旧文件移动为 `config.backup.json`；主文件损坏时依次回退到备份和默认值。
//!
//! # 使用示例
//!
//! ```ignore
//! use caseshift_lib::state::config::{AppConfig, ConfigManager};
//!
//! // 加载配置
//! let mut config = ConfigManager::load(&app_handle)?;
//!
//! // 修改配置
//! config.behavior.auto_paste = false;
//!
//! // 保存配置
//! ConfigManager::save(&app_handle, &config)?;
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use tauri::{AppHandle, Manager, Runtime};
use thiserror::Error;

use crate::hotkey::{HotkeyConfig, HotkeyRegistry};
use crate::notification::NotificationStyle;
use crate::utils::retry::RetryPolicy;

/// 配置文件名
pub const CONFIG_FILE_NAME: &str = "config.json";

/// 备份文件名
pub const BACKUP_FILE_NAME: &str = "config.backup.json";

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 序列化/反序列化错误
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 路径错误
    #[error("Path error: {0}")]
    Path(String),

    /// 配置内容无效
    #[error("Invalid config: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// 配置结果类型
pub type ConfigResult<T> = Result<T, ConfigError>;

/// 应用配置
///
/// 包含所有应用程序设置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 热键配置
    pub hotkeys: HotkeyConfig,
    /// 行为配置
    pub behavior: BehaviorConfig,
    /// 重试配置
    pub retry: RetryConfig,
    /// 通知配置
    pub notifications: NotificationConfig,
    /// 更新检查配置
    pub updates: UpdateConfig,
}

impl AppConfig {
    /// 校验配置，返回所有问题的描述
    ///
    /// 空列表表示配置有效
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if let Err(e) = HotkeyRegistry::from_config(&self.hotkeys) {
            issues.push(e.to_string());
        }

        if self.behavior.max_text_length == 0 {
            issues.push("Max text length must be positive".to_string());
        }

        if self.retry.max_attempts == 0 {
            issues.push("Retry attempts must be at least 1".to_string());
        }

        if !self.retry.backoff_multiplier.is_finite() || self.retry.backoff_multiplier < 0.0 {
            issues.push(format!(
                "Backoff multiplier must be a non-negative number, got {}",
                self.retry.backoff_multiplier
            ));
        }

        if self.updates.parse_repository().is_none() {
            issues.push(format!(
                "Update repository must look like 'owner/name', got '{}'",
                self.updates.repository
            ));
        }

        issues
    }

    /// 是否有效
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

/// 行为配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// 写入剪贴板后是否自动粘贴
    pub auto_paste: bool,
    /// 自动粘贴前的等待时间（毫秒）
    pub paste_delay_ms: u64,
    /// 释放修饰键后的等待时间（毫秒）
    pub key_release_delay_ms: u64,
    /// 允许转换的最大字符数
    pub max_text_length: usize,
}

impl BehaviorConfig {
    /// 自动粘贴前的等待时间
    pub fn paste_delay(&self) -> Duration {
        Duration::from_millis(self.paste_delay_ms)
    }

    /// 释放修饰键后的等待时间
    pub fn key_release_delay(&self) -> Duration {
        Duration::from_millis(self.key_release_delay_ms)
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            auto_paste: true,
            paste_delay_ms: 50,
            key_release_delay_ms: 20,
            max_text_length: 1_000_000,
        }
    }
}

/// 重试配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// 最大尝试次数
    pub max_attempts: u32,
    /// 首次失败后的等待时间（毫秒）
    pub base_delay_ms: u64,
    /// 退避倍数
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    /// 构造重试策略
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.base_delay_ms),
            self.backoff_multiplier,
        )
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 100,
            backoff_multiplier: 2.0,
        }
    }
}

/// 通知配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// 是否显示通知
    pub enabled: bool,
    /// 通知样式
    pub style: NotificationStyle,
}

impl NotificationConfig {
    /// 实际生效的样式（关闭通知等价于 `None` 样式）
    pub fn effective_style(&self) -> NotificationStyle {
        if self.enabled {
            self.style
        } else {
            NotificationStyle::None
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            style: NotificationStyle::Standard,
        }
    }
}

/// 更新检查配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    /// 启动时检查更新
    pub check_on_startup: bool,
    /// 是否包含预发布版本
    pub include_prereleases: bool,
    /// GitHub 仓库（owner/name）
    pub repository: String,
}

impl UpdateConfig {
    /// 拆分仓库为 (owner, name)
    pub fn parse_repository(&self) -> Option<(&str, &str)> {
        let (owner, name) = self.repository.split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some((owner, name))
    }
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            check_on_startup: true,
            include_prereleases: false,
            repository: "caseshift/caseshift".to_string(),
        }
    }
}

/// 配置管理器
///
/// 提供配置的加载、保存和管理功能
pub struct ConfigManager;

impl ConfigManager {
    /// 加载配置
    ///
    /// 从应用配置目录加载，文件不存在时返回默认配置
    pub fn load<R: Runtime>(app: &AppHandle<R>) -> ConfigResult<AppConfig> {
        let dir = Self::config_dir(app)?;
        Ok(Self::load_from(&dir))
    }

    /// 保存配置到应用配置目录
    pub fn save<R: Runtime>(app: &AppHandle<R>, config: &AppConfig) -> ConfigResult<()> {
        let dir = Self::config_dir(app)?;
        Self::save_to(&dir, config)
    }

    /// 从指定目录加载配置
    ///
    /// 依次尝试主文件、备份文件，最后回退到默认配置。
    /// 此方法不会失败，所有问题都记录到日志。
    ///
    /// # Arguments
    ///
    /// * `dir` - 配置目录
    pub fn load_from(dir: &Path) -> AppConfig {
        let path = dir.join(CONFIG_FILE_NAME);

        if !path.exists() {
            tracing::info!(path = %path.display(), "Config file not found, using defaults");
            return AppConfig::default();
        }

        match Self::read_file(&path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "Config loaded successfully");
                Self::log_issues(&config);
                return config;
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to load config");
            }
        }

        let backup = dir.join(BACKUP_FILE_NAME);
        if backup.exists() {
            match Self::read_file(&backup) {
                Ok(config) => {
                    tracing::info!(path = %backup.display(), "Config loaded from backup");
                    Self::log_issues(&config);
                    return config;
                }
                Err(e) => {
                    tracing::error!(path = %backup.display(), error = %e, "Failed to load backup config");
                }
            }
        }

        tracing::warn!("Using default config due to load failure");
        AppConfig::default()
    }

    /// 保存配置到指定目录
    ///
    /// 已存在的配置文件先移动为备份文件
    ///
    /// # Errors
    ///
    /// - `ConfigError::Io` - 目录创建或文件写入失败
    /// - `ConfigError::Json` - 序列化失败
    pub fn save_to(dir: &Path, config: &AppConfig) -> ConfigResult<()> {
        let path = dir.join(CONFIG_FILE_NAME);

        tracing::debug!(path = %path.display(), "Saving config");

        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
        }

        let content = serde_json::to_string_pretty(config)?;

        if path.exists() {
            std::fs::rename(&path, dir.join(BACKUP_FILE_NAME))?;
        }

        std::fs::write(&path, content)?;

        tracing::info!(path = %path.display(), "Config saved successfully");
        Ok(())
    }

    /// 导出配置到任意文件
    pub fn export_to(path: &Path, config: &AppConfig) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(config)?;
        std::fs::write(path, content)?;
        tracing::info!(path = %path.display(), "Config exported");
        Ok(())
    }

    /// 从任意文件导入配置
    ///
    /// # Errors
    ///
    /// 文件无法解析或配置无效时返回错误，不修改当前配置
    pub fn import_from(path: &Path) -> ConfigResult<AppConfig> {
        let config = Self::read_file(path)?;
        let issues = config.validate();
        if !issues.is_empty() {
            return Err(ConfigError::Invalid(issues));
        }
        tracing::info!(path = %path.display(), "Config imported");
        Ok(config)
    }

    /// 获取配置文件路径
    pub fn config_path<R: Runtime>(app: &AppHandle<R>) -> ConfigResult<PathBuf> {
        Ok(Self::config_dir(app)?.join(CONFIG_FILE_NAME))
    }

    /// 获取配置目录路径
    pub fn config_dir<R: Runtime>(app: &AppHandle<R>) -> ConfigResult<PathBuf> {
        app.path()
            .app_config_dir()
            .map_err(|e| ConfigError::Path(e.to_string()))
    }

    /// 重置为默认配置
    pub fn reset<R: Runtime>(app: &AppHandle<R>) -> ConfigResult<AppConfig> {
        let config = AppConfig::default();
        Self::save(app, &config)?;
        tracing::info!("Config reset to defaults");
        Ok(config)
    }

    fn read_file(path: &Path) -> ConfigResult<AppConfig> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn log_issues(config: &AppConfig) {
        for issue in config.validate() {
            tracing::warn!(issue = %issue, "Config validation issue");
        }
    }
}

/// 全局配置状态
///
/// 使用 ArcSwap 实现无锁读取
pub struct GlobalConfig {
    config: ArcSwap<AppConfig>,
}

impl GlobalConfig {
    /// 创建新的全局配置
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: ArcSwap::new(Arc::new(config)),
        }
    }

    /// 获取当前配置
    pub fn get(&self) -> Arc<AppConfig> {
        self.config.load_full()
    }

    /// 更新配置
    pub fn update(&self, config: AppConfig) {
        self.config.store(Arc::new(config));
    }

    /// 当前重试策略
    pub fn retry_policy(&self) -> RetryPolicy {
        self.config.load().retry.to_policy()
    }

    /// 当前热键配置
    pub fn hotkeys(&self) -> HotkeyConfig {
        self.config.load().hotkeys.clone()
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

/// 初始化配置系统
///
/// 加载配置并注册到应用状态
pub fn init_config<R: Runtime>(app: &AppHandle<R>) -> ConfigResult<Arc<GlobalConfig>> {
    tracing::info!("Initializing config system");

    let config = ConfigManager::load(app)?;
    let global_config = Arc::new(GlobalConfig::new(config));

    app.manage(Arc::clone(&global_config));

    tracing::info!("Config system initialized");
    Ok(global_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();

        assert!(config.behavior.auto_paste);
        assert_eq!(config.behavior.paste_delay_ms, 50);
        assert_eq!(config.behavior.max_text_length, 1_000_000);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.base_delay_ms, 100);
        assert_eq!(config.notifications.style, NotificationStyle::Standard);
        assert!(config.is_valid());
    }

    #[test]
    fn test_retry_policy_from_config() {
        let policy = RetryConfig::default().to_policy();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.base_delay(), Duration::from_millis(100));
        assert_eq!(policy.backoff_multiplier(), 2.0);
    }

    #[test]
    fn test_config_partial_json() {
        let json = r#"{
            "behavior": { "auto_paste": false }
        }"#;

        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert!(!config.behavior.auto_paste);
        assert_eq!(config.behavior.paste_delay_ms, 50);
        assert_eq!(config.retry, RetryConfig::default());
        assert_eq!(config.hotkeys, HotkeyConfig::default());
    }

    #[test]
    fn test_validate_reports_every_issue() {
        let mut config = AppConfig::default();
        config.behavior.max_text_length = 0;
        config.retry.max_attempts = 0;
        config.retry.backoff_multiplier = f64::INFINITY;
        config.updates.repository = "no-slash".to_string();

        let issues = config.validate();
        assert_eq!(issues.len(), 4, "issues: {:?}", issues);
    }

    #[test]
    fn test_validate_detects_hotkey_conflict() {
        let mut config = AppConfig::default();
        config.hotkeys.lowercase.shortcut = config.hotkeys.uppercase.shortcut.clone();

        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("already bound"));
    }

    #[test]
    fn test_effective_notification_style() {
        let mut notifications = NotificationConfig::default();
        assert_eq!(notifications.effective_style(), NotificationStyle::Standard);

        notifications.enabled = false;
        assert_eq!(notifications.effective_style(), NotificationStyle::None);
    }

    #[test]
    fn test_parse_repository() {
        let mut updates = UpdateConfig::default();
        assert_eq!(updates.parse_repository(), Some(("caseshift", "caseshift")));

        updates.repository = "a/b/c".to_string();
        assert!(updates.parse_repository().is_none());

        updates.repository = "/b".to_string();
        assert!(updates.parse_repository().is_none());
    }

    #[test]
    fn test_global_config_update() {
        let global = GlobalConfig::default();

        let mut new_config = AppConfig::default();
        new_config.retry.max_attempts = 5;
        global.update(new_config);

        assert_eq!(global.retry_policy().max_attempts(), 5);
        assert_eq!(global.get().retry.max_attempts, 5);
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Path("test error".to_string());
        assert!(err.to_string().contains("test error"));

        let err = ConfigError::Invalid(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "Invalid config: a; b");
    }
}
