//! 状态事件发射模块
//!
//! 把流水线状态变更转发为 Tauri 事件，供托盘和前端使用

use std::sync::Arc;

use serde::Serialize;
use tauri::{AppHandle, Emitter, Runtime};
use tokio::sync::mpsc;

use super::{PipelineState, StateManager};
use crate::utils::error::ErrorKind;

/// 状态变更事件名
pub const STATE_CHANGED_EVENT: &str = "pipeline:state_changed";

/// 状态变更事件载荷
#[derive(Debug, Clone, Serialize)]
pub struct StateChangeEvent {
    /// 状态名称
    pub state: String,
    /// 是否有转换正在进行
    pub is_busy: bool,
    /// 是否为终止状态
    pub is_terminal: bool,
    /// 是否降级完成（剪贴板已更新但未粘贴）
    pub degraded: bool,
    /// 失败原因（如果有）
    pub error: Option<ErrorKind>,
}

impl From<&PipelineState> for StateChangeEvent {
    fn from(state: &PipelineState) -> Self {
        Self {
            state: state.name().to_string(),
            is_busy: state.is_busy(),
            is_terminal: state.is_terminal(),
            degraded: matches!(state, PipelineState::Done { degraded: true }),
            error: state.error(),
        }
    }
}

/// 状态事件发射器
///
/// 监听 StateManager 的状态变更并发射 Tauri 事件
pub struct StateEventEmitter {
    /// 停止信号发送器
    stop_tx: Option<mpsc::Sender<()>>,
}

impl StateEventEmitter {
    /// 创建并启动状态事件发射器
    ///
    /// # Arguments
    ///
    /// * `app` - Tauri 应用句柄
    /// * `state_manager` - 状态管理器引用
    pub async fn start<R: Runtime>(app: &AppHandle<R>, state_manager: Arc<StateManager>) -> Self {
        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
        let mut state_rx = state_manager.subscribe().await;
        let app_handle = app.clone();

        tauri::async_runtime::spawn(async move {
            loop {
                tokio::select! {
                    Some(new_state) = state_rx.recv() => {
                        Self::emit_state_change(&app_handle, &new_state);
                    }
                    _ = stop_rx.recv() => {
                        tracing::debug!("StateEventEmitter stopped");
                        break;
                    }
                }
            }
        });

        tracing::info!("StateEventEmitter started");
        Self {
            stop_tx: Some(stop_tx),
        }
    }

    fn emit_state_change<R: Runtime>(app: &AppHandle<R>, state: &PipelineState) {
        let event = StateChangeEvent::from(state);

        if let Err(e) = app.emit(STATE_CHANGED_EVENT, &event) {
            tracing::warn!(error = %e, "Failed to emit state change event");
        }

        tracing::debug!(state = %state.name(), "Emitted state change event");
    }

    /// 停止事件发射器
    pub async fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(()).await;
        }
    }
}

impl Drop for StateEventEmitter {
    fn drop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.try_send(());
        }
    }
}
