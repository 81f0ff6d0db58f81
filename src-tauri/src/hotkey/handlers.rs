//! 热键处理器模块
//!
//! 热键回调在系统事件线程上执行，只记录焦点窗口并把转换交给异步运行时

use std::sync::Arc;

use super::register::HotkeyCallback;
use crate::input::capture_focus;
use crate::pipeline::{ConversionPipeline, Trigger, TriggerOrigin};

/// 构造触发转换的热键回调
///
/// 开启自动粘贴时，按下瞬间记录焦点窗口，粘贴前用于恢复焦点
pub fn conversion_callback(pipeline: Arc<ConversionPipeline>) -> HotkeyCallback {
    Arc::new(move |mode| {
        tracing::debug!(mode = %mode, "Hotkey pressed");

        let focus = if pipeline.settings().auto_paste {
            pipeline
                .paster()
                .and_then(|paster| capture_focus(paster.focus_tracker().as_ref()))
        } else {
            None
        };

        pipeline.spawn(Trigger::new(mode, TriggerOrigin::Hotkey).with_focus(focus));
    })
}
