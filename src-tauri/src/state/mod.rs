//! 状态管理模块
//!
//! 提供转换流水线状态机、应用配置和状态事件
//!
//! # 模块结构
//!
//! - `app_state` - 流水线状态定义和状态管理器
//! - `config` - 应用配置的加载、保存和校验
//! - `error` - 状态相关错误类型
//! - `transitions` - 状态变更事件发射

mod app_state;
pub mod config;
mod error;
mod transitions;

pub use app_state::{PipelineState, StateManager};
pub use config::{AppConfig, ConfigError, ConfigManager, GlobalConfig};
pub use error::{StateError, StateResult};
pub use transitions::{StateChangeEvent, StateEventEmitter, STATE_CHANGED_EVENT};
