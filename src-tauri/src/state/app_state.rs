use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::Serialize;
use tokio::sync::mpsc;

use super::error::{StateError, StateResult};
use crate::utils::error::ErrorKind;

/// 转换流水线状态
///
/// ```text
/// Idle ─► Reading ─► Transforming ─► Writing ─┬─► Pasting ─► Done
///           │             │             │     └──────────────► Done
///           └─────────────┴─────────────┴──────────────────► Failed
/// ```
///
/// Done 和 Failed 是终止状态，可以直接开始下一次转换
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PipelineState {
    /// 空闲，等待触发
    Idle,

    /// 正在读取剪贴板
    Reading,

    /// 正在转换文本
    Transforming,

    /// 正在写回剪贴板
    Writing,

    /// 正在自动粘贴
    Pasting,

    /// 完成
    Done {
        /// 剪贴板已更新但自动粘贴失败
        degraded: bool,
    },

    /// 失败
    Failed {
        /// 失败原因
        error: ErrorKind,
    },
}

impl PipelineState {
    /// 创建完成状态
    pub fn done(degraded: bool) -> Self {
        Self::Done { degraded }
    }

    /// 创建失败状态
    pub fn failed(error: ErrorKind) -> Self {
        Self::Failed { error }
    }

    /// 检查是否为空闲状态
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// 检查是否为终止状态（Done 或 Failed）
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Failed { .. })
    }

    /// 检查是否可以开始新的转换
    pub fn can_start(&self) -> bool {
        self.is_idle() || self.is_terminal()
    }

    /// 检查是否有转换正在进行
    pub fn is_busy(&self) -> bool {
        !self.can_start()
    }

    /// 获取失败原因（如果处于失败状态）
    pub fn error(&self) -> Option<ErrorKind> {
        match self {
            Self::Failed { error } => Some(*error),
            _ => None,
        }
    }

    /// 获取状态名称（用于日志和调试）
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Reading => "Reading",
            Self::Transforming => "Transforming",
            Self::Writing => "Writing",
            Self::Pasting => "Pasting",
            Self::Done { degraded: false } => "Done",
            Self::Done { degraded: true } => "Done::Degraded",
            Self::Failed { .. } => "Failed",
        }
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::Idle
    }
}

/// 状态管理器
///
/// 负责管理流水线状态的转换和通知监听者
pub struct StateManager {
    /// 当前状态（使用 ArcSwap 实现无锁读取）
    state: ArcSwap<PipelineState>,

    /// 状态变更监听器列表
    listeners: Arc<tokio::sync::Mutex<Vec<mpsc::Sender<PipelineState>>>>,
}

impl StateManager {
    /// 创建新的状态管理器
    ///
    /// # Examples
    ///
    /// ```
    /// use caseshift_lib::state::StateManager;
    ///
    /// let manager = StateManager::new();
    /// assert!(manager.current().is_idle());
    /// ```
    pub fn new() -> Self {
        Self {
            state: ArcSwap::new(Arc::new(PipelineState::Idle)),
            listeners: Arc::new(tokio::sync::Mutex::new(Vec::new())),
        }
    }

    /// 获取当前状态
    ///
    /// 此方法是无锁的，可以在任何线程安全地调用
    pub fn current(&self) -> PipelineState {
        **self.state.load()
    }

    /// 转换到新状态
    ///
    /// 验证状态转换的合法性，如果合法则更新状态并通知所有监听者
    ///
    /// # Errors
    ///
    /// 如果状态转换不合法，返回 [`StateError::InvalidTransition`]
    ///
    /// # Examples
    ///
    /// ```
    /// use caseshift_lib::state::{PipelineState, StateManager};
    ///
    /// let manager = StateManager::new();
    ///
    /// // 合法转换
    /// assert!(manager.transition(PipelineState::Reading).is_ok());
    ///
    /// // 非法转换
    /// assert!(manager.transition(PipelineState::Pasting).is_err());
    /// ```
    pub fn transition(&self, new_state: PipelineState) -> StateResult<()> {
        let current = self.current();

        if !Self::is_valid_transition(&current, &new_state) {
            return Err(StateError::InvalidTransition {
                from: current,
                to: new_state,
            });
        }

        self.state.store(Arc::new(new_state));
        tracing::trace!(from = current.name(), to = new_state.name(), "Pipeline state changed");

        self.notify_listeners(new_state);

        Ok(())
    }

    /// 添加状态变更监听器
    ///
    /// 返回的接收器将接收所有状态变更通知
    pub async fn subscribe(&self) -> mpsc::Receiver<PipelineState> {
        let (tx, rx) = mpsc::channel(32);
        let mut listeners = self.listeners.lock().await;
        listeners.push(tx);
        rx
    }

    /// 移除所有已关闭的监听器
    pub async fn cleanup_listeners(&self) {
        let mut listeners = self.listeners.lock().await;
        listeners.retain(|tx| !tx.is_closed());
    }

    /// 获取当前监听器数量
    pub async fn listener_count(&self) -> usize {
        self.listeners.lock().await.len()
    }

    /// 强制设置状态（跳过验证）
    ///
    /// **警告**: 此方法跳过状态转换验证，仅用于错误恢复
    pub fn force_set(&self, new_state: PipelineState) {
        self.state.store(Arc::new(new_state));
        self.notify_listeners(new_state);
    }

    /// 重置为空闲状态
    pub fn reset(&self) {
        self.force_set(PipelineState::Idle);
    }

    /// 通知所有监听者状态变更
    ///
    /// 如果有 tokio 运行时，异步通知；否则静默跳过
    fn notify_listeners(&self, new_state: PipelineState) {
        let listeners = Arc::clone(&self.listeners);

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                let listeners_guard = listeners.lock().await;
                for listener in listeners_guard.iter() {
                    // 使用 try_send 避免阻塞
                    let _ = listener.try_send(new_state);
                }
            });
        }
    }

    /// 验证状态转换是否合法
    pub fn is_valid_transition(from: &PipelineState, to: &PipelineState) -> bool {
        use PipelineState::*;

        match (from, to) {
            // 空闲或终止状态可以开始新的转换
            (Idle | Done { .. } | Failed { .. }, Reading) => true,

            (Reading, Transforming) => true,
            (Transforming, Writing) => true,

            // 写入后根据是否自动粘贴分支
            (Writing, Pasting) => true,
            (Writing, Done { degraded: false }) => true,

            // 粘贴失败仍然是完成（降级）
            (Pasting, Done { .. }) => true,

            (Reading | Transforming | Writing, Failed { .. }) => true,

            // 终止状态可以回到空闲
            (Done { .. } | Failed { .. }, Idle) => true,

            _ => false,
        }
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_state_predicates() {
        assert!(PipelineState::Idle.can_start());
        assert!(PipelineState::done(false).is_terminal());
        assert!(PipelineState::failed(ErrorKind::ClipboardEmpty).can_start());
        assert!(PipelineState::Writing.is_busy());
        assert_eq!(
            PipelineState::failed(ErrorKind::TextTooLarge).error(),
            Some(ErrorKind::TextTooLarge)
        );
        assert_eq!(PipelineState::done(true).name(), "Done::Degraded");
    }

    #[test]
    fn test_state_manager_creation() {
        let manager = StateManager::new();
        assert!(manager.current().is_idle());
    }

    #[test]
    fn test_full_run_with_paste() {
        let manager = StateManager::new();

        assert!(manager.transition(PipelineState::Reading).is_ok());
        assert!(manager.transition(PipelineState::Transforming).is_ok());
        assert!(manager.transition(PipelineState::Writing).is_ok());
        assert!(manager.transition(PipelineState::Pasting).is_ok());
        assert!(manager.transition(PipelineState::done(false)).is_ok());

        // 终止状态可以直接开始下一次
        assert!(manager.transition(PipelineState::Reading).is_ok());
    }

    #[test]
    fn test_run_without_paste() {
        let manager = StateManager::new();

        manager.transition(PipelineState::Reading).unwrap();
        manager.transition(PipelineState::Transforming).unwrap();
        manager.transition(PipelineState::Writing).unwrap();
        assert!(manager.transition(PipelineState::done(false)).is_ok());
    }

    #[test]
    fn test_degraded_done_only_after_pasting() {
        let manager = StateManager::new();

        manager.transition(PipelineState::Reading).unwrap();
        manager.transition(PipelineState::Transforming).unwrap();
        manager.transition(PipelineState::Writing).unwrap();
        assert!(manager.transition(PipelineState::done(true)).is_err());

        manager.transition(PipelineState::Pasting).unwrap();
        assert!(manager.transition(PipelineState::done(true)).is_ok());
    }

    #[test]
    fn test_invalid_transitions() {
        let manager = StateManager::new();

        let result = manager.transition(PipelineState::Writing);
        assert!(matches!(result, Err(StateError::InvalidTransition { .. })));

        // Idle 不能直接失败
        assert!(manager.transition(PipelineState::failed(ErrorKind::Internal)).is_err());

        manager.transition(PipelineState::Reading).unwrap();

        // 正在读取时不能开始另一次读取
        assert!(manager.transition(PipelineState::Reading).is_err());

        // 粘贴不能失败（只能降级完成）
        manager.force_set(PipelineState::Pasting);
        assert!(manager.transition(PipelineState::failed(ErrorKind::Paste)).is_err());
    }

    #[test]
    fn test_failure_from_each_active_stage() {
        for stage in [
            PipelineState::Reading,
            PipelineState::Transforming,
            PipelineState::Writing,
        ] {
            assert!(StateManager::is_valid_transition(
                &stage,
                &PipelineState::failed(ErrorKind::ClipboardAccess)
            ));
        }
    }

    #[test]
    fn test_force_set_and_reset() {
        let manager = StateManager::new();

        manager.force_set(PipelineState::Pasting);
        assert_eq!(manager.current(), PipelineState::Pasting);

        manager.reset();
        assert!(manager.current().is_idle());
    }

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_string(&PipelineState::failed(ErrorKind::ClipboardEmpty)).unwrap();
        assert_eq!(json, r#"{"state":"failed","error":"CLIPBOARD_EMPTY"}"#);

        let json = serde_json::to_string(&PipelineState::Reading).unwrap();
        assert_eq!(json, r#"{"state":"reading"}"#);
    }

    #[tokio::test]
    async fn test_state_listener_receives_changes() {
        let manager = StateManager::new();
        let mut rx = manager.subscribe().await;

        manager.transition(PipelineState::Reading).unwrap();

        let received = tokio::time::timeout(std::time::Duration::from_millis(200), rx.recv())
            .await
            .expect("listener timed out");
        assert_eq!(received, Some(PipelineState::Reading));
    }

    #[tokio::test]
    async fn test_listener_count() {
        let manager = StateManager::new();

        assert_eq!(manager.listener_count().await, 0);

        let rx1 = manager.subscribe().await;
        let _rx2 = manager.subscribe().await;
        assert_eq!(manager.listener_count().await, 2);

        drop(rx1);
        manager.cleanup_listeners().await;
        assert_eq!(manager.listener_count().await, 1);
    }
}
