//! 自动粘贴
//!
//! 剪贴板已经写入转换结果后，把结果粘贴回用户原来所在的窗口：
//!
//! 1. 等待 `delay`，让热键按键完全结束
//! 2. 焦点被转移时，重新激活触发时记录的窗口
//! 3. 释放修饰键并短暂等待
//! 4. 发送平台粘贴快捷键
//!
//! 任何一步失败都只报告错误，不回滚剪贴板

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use super::error::{InputError, InputResult};
use super::keyboard::PasteKeystroke;
use super::window::{FocusTracker, WindowInfo};

/// 一次粘贴的结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PasteReport {
    /// 是否重新激活了原窗口
    pub focus_restored: bool,
}

/// 自动粘贴触发器
#[derive(Clone)]
pub struct AutoPaster {
    focus: Arc<dyn FocusTracker>,
    keys: Arc<dyn PasteKeystroke>,
    key_release_delay: Duration,
}

impl AutoPaster {
    /// 创建自动粘贴触发器
    ///
    /// # Arguments
    ///
    /// * `focus` - 焦点窗口跟踪
    /// * `keys` - 粘贴按键后端
    /// * `key_release_delay` - 释放修饰键后、发送粘贴前的等待时间
    pub fn new(
        focus: Arc<dyn FocusTracker>,
        keys: Arc<dyn PasteKeystroke>,
        key_release_delay: Duration,
    ) -> Self {
        Self {
            focus,
            keys,
            key_release_delay,
        }
    }

    /// 焦点跟踪器（热键回调用它记录触发时的窗口）
    pub fn focus_tracker(&self) -> &Arc<dyn FocusTracker> {
        &self.focus
    }

    /// 等待后粘贴
    ///
    /// # Arguments
    ///
    /// * `delay` - 开始前的等待时间
    /// * `original` - 触发时的焦点窗口，未知时为 None（跳过焦点检查）
    ///
    /// # Errors
    ///
    /// - `InputError::FocusRestoreFailed` - 无法重新激活原窗口
    /// - `InputError::PasteFailed` - 粘贴按键没有送达
    /// - `InputError::PasteIncomplete` - 粘贴已送达，但修饰键没有松开
    /// - `InputError::PermissionDenied` - 没有辅助功能权限
    pub async fn paste_after(
        &self,
        delay: Duration,
        original: Option<&WindowInfo>,
    ) -> InputResult<PasteReport> {
        tokio::time::sleep(delay).await;

        let mut report = PasteReport::default();

        if let Some(original) = original {
            report.focus_restored = self.restore_focus(original)?;
        }

        if let Err(e) = self.keys.release_modifiers() {
            tracing::warn!(error = %e, "Failed to release modifier keys");
        }
        tokio::time::sleep(self.key_release_delay).await;

        self.keys.simulate_paste().map_err(|e| match e {
            InputError::PasteFailed(_)
            | InputError::PasteIncomplete(_)
            | InputError::PermissionDenied => e,
            other => InputError::PasteFailed(other.to_string()),
        })?;

        tracing::debug!(focus_restored = report.focus_restored, "Auto-paste sent");
        Ok(report)
    }

    /// 焦点被转移时重新激活原窗口，返回是否执行了激活
    fn restore_focus(&self, original: &WindowInfo) -> InputResult<bool> {
        match self.focus.focused_window() {
            Ok(current) if current.same_window(original) => Ok(false),
            Ok(current) => {
                tracing::info!(
                    from_pid = current.process_id,
                    to_pid = original.process_id,
                    "Focus moved since trigger; restoring"
                );
                self.focus.activate(original).map_err(|e| match e {
                    InputError::FocusRestoreFailed(_) => e,
                    other => InputError::FocusRestoreFailed(other.to_string()),
                })?;
                Ok(true)
            }
            Err(e) => {
                // 无法判断焦点时直接粘贴到当前窗口
                tracing::debug!(error = %e, "Cannot read focus before paste");
                Ok(false)
            }
        }
    }
}

impl std::fmt::Debug for AutoPaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoPaster")
            .field("key_release_delay", &self.key_release_delay)
            .finish_non_exhaustive()
    }
}
