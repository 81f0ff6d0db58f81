//! 转换流水线
//!
//! 一次运行的状态路径：
//!
//! ```text
//! Idle/Done/Failed → Reading → Transforming → Writing ─┬→ Done
//!                       │           │            │     └→ Pasting → Done / Done(degraded)
//!                       └───────────┴────────────┴→ Failed(kind)
//! ```
//!
//! 同一时间最多一次运行，运行中到达的触发直接拒绝，不读写剪贴板。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;

use super::request::{ConversionRequest, ConversionResult, Trigger};
use crate::convert::transform;
use crate::input::platform::Platform;
use crate::input::{AutoPaster, ClipboardAccess, ClipboardAccessor, InputError};
use crate::notification::{NotificationSink, NullNotifier};
use crate::state::{AppConfig, PipelineState, StateManager};
use crate::stats::UsageStats;
use crate::utils::{with_retry_if, AppError, AppResult, RetryError, RetryPolicy};

/// 流水线运行参数
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub retry_policy: RetryPolicy,
    pub auto_paste: bool,
    pub paste_delay: Duration,
    pub max_text_length: usize,
}

impl PipelineSettings {
    /// 从应用配置提取
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            retry_policy: config.retry.to_policy(),
            auto_paste: config.behavior.auto_paste,
            paste_delay: config.behavior.paste_delay(),
            max_text_length: config.behavior.max_text_length,
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// 运行标记，离开作用域时释放
struct RunGuard<'a>(&'a AtomicBool);

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// 剪贴板大小写转换流水线
pub struct ConversionPipeline {
    clipboard: Arc<dyn ClipboardAccess>,
    paster: Option<AutoPaster>,
    notifier: Arc<dyn NotificationSink>,
    state: Arc<StateManager>,
    settings: ArcSwap<PipelineSettings>,
    stats: Arc<UsageStats>,
    in_flight: AtomicBool,
}

impl ConversionPipeline {
    /// 创建流水线
    ///
    /// 默认不自动粘贴、不发送通知，分别通过 [`with_paster`](Self::with_paster)
    /// 和 [`with_notifier`](Self::with_notifier) 接入
    ///
    /// # Arguments
    ///
    /// * `clipboard` - 剪贴板后端
    /// * `state` - 共享的状态管理器
    /// * `settings` - 初始运行参数
    pub fn new(
        clipboard: Arc<dyn ClipboardAccess>,
        state: Arc<StateManager>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            clipboard,
            paster: None,
            notifier: Arc::new(NullNotifier),
            state,
            settings: ArcSwap::from_pointee(settings),
            stats: Arc::new(UsageStats::new()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// 接入自动粘贴
    pub fn with_paster(mut self, paster: AutoPaster) -> Self {
        self.paster = Some(paster);
        self
    }

    /// 接入通知接收器
    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = notifier;
        self
    }

    /// 使用统计
    pub fn stats(&self) -> &Arc<UsageStats> {
        &self.stats
    }

    /// 状态管理器
    pub fn state(&self) -> &Arc<StateManager> {
        &self.state
    }

    /// 自动粘贴触发器
    pub fn paster(&self) -> Option<&AutoPaster> {
        self.paster.as_ref()
    }

    /// 当前运行参数
    pub fn settings(&self) -> Arc<PipelineSettings> {
        self.settings.load_full()
    }

    /// 替换运行参数，下一次运行生效
    pub fn update_settings(&self, settings: PipelineSettings) {
        self.settings.store(Arc::new(settings));
    }

    /// 是否有运行在进行
    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// 在异步运行时上执行一次转换，立即返回
    pub fn spawn(self: &Arc<Self>, trigger: Trigger) {
        let pipeline = Arc::clone(self);
        tauri::async_runtime::spawn(async move {
            pipeline.run(trigger).await;
        });
    }

    /// 执行一次转换
    ///
    /// 结果总会计入使用统计并交给通知接收器。
    /// 日志只记录模式、耗时、结局和长度，不记录文本。
    pub async fn run(&self, trigger: Trigger) -> ConversionResult {
        let mode = trigger.mode;

        let Some(_guard) = RunGuard::acquire(&self.in_flight) else {
            tracing::warn!(
                mode = %mode,
                origin = ?trigger.origin,
                state = self.state.current().name(),
                "Conversion already in progress; trigger rejected"
            );
            let result = ConversionResult::busy(mode);
            self.stats.record(&result, trigger.origin);
            self.notifier.notify(&result);
            return result;
        };

        let settings = self.settings.load_full();
        let started = Instant::now();

        tracing::debug!(mode = %mode, origin = ?trigger.origin, "Conversion started");
        self.advance(PipelineState::Reading);

        let result = match self.execute(&trigger, &settings, started).await {
            Ok(result) => result,
            Err(err) => {
                let kind = err.kind();
                self.advance(PipelineState::failed(kind));
                tracing::debug!(error = %err, "Conversion aborted");
                ConversionResult::failure(mode, kind, err.user_message(), elapsed_ms(started))
            }
        };

        tracing::info!(
            mode = %mode,
            origin = ?trigger.origin,
            outcome = result.outcome(),
            duration_ms = result.duration_ms,
            output_len = result.char_count,
            error = ?result.error,
            "Conversion finished"
        );

        self.stats.record(&result, trigger.origin);
        self.notifier.notify(&result);
        result
    }

    async fn execute(
        &self,
        trigger: &Trigger,
        settings: &PipelineSettings,
        started: Instant,
    ) -> AppResult<ConversionResult> {
        let policy = &settings.retry_policy;
        let accessor = ClipboardAccessor::new(Arc::clone(&self.clipboard), settings.max_text_length);

        let source = with_retry_if(
            policy,
            "clipboard_read",
            || async { accessor.read() },
            InputError::is_transient,
        )
        .await?;

        // 长度上限已在读取时检查
        let request = ConversionRequest::new(trigger.mode, source);
        tracing::debug!(input_bytes = request.source_text.len(), "Clipboard text read");

        self.advance(PipelineState::Transforming);
        let output = transform(&request.source_text, request.mode)?;

        self.advance(PipelineState::Writing);
        with_retry_if(
            policy,
            "clipboard_write",
            || async { accessor.write(&output) },
            InputError::is_transient,
        )
        .await?;

        let paster = match &self.paster {
            Some(paster) if settings.auto_paste => paster,
            _ => {
                self.advance(PipelineState::done(false));
                return Ok(ConversionResult::success(
                    request.mode,
                    output,
                    elapsed_ms(started),
                    false,
                ));
            }
        };

        self.advance(PipelineState::Pasting);
        let pasted = with_retry_if(
            policy,
            "auto_paste",
            || paster.paste_after(settings.paste_delay, trigger.focus.as_ref()),
            InputError::is_transient,
        )
        .await
        .map_err(RetryError::into_inner);

        match pasted {
            Ok(report) => {
                tracing::debug!(focus_restored = report.focus_restored, "Auto-paste completed");
                self.advance(PipelineState::done(false));
                Ok(ConversionResult::success(request.mode, output, elapsed_ms(started), true))
            }
            Err(InputError::PasteIncomplete(reason)) => {
                // 粘贴已送达，不能再发一次
                tracing::warn!(reason = %reason, "Paste delivered but modifier keys may be held");
                self.advance(PipelineState::done(false));
                Ok(ConversionResult::success(request.mode, output, elapsed_ms(started), true))
            }
            Err(err) => {
                // 剪贴板已更新，粘贴失败只降级为警告
                let err = AppError::from(err);
                tracing::warn!(error = %err, "Auto-paste failed; result left on clipboard");
                self.advance(PipelineState::done(true));
                let message = format!(
                    "{}，请手动粘贴 ({})",
                    err.user_message(),
                    Platform::current().paste_shortcut()
                );
                Ok(ConversionResult::degraded(
                    request.mode,
                    output,
                    elapsed_ms(started),
                    message,
                ))
            }
        }
    }

    /// 推进状态；状态机与运行标记不同步时强制写入
    fn advance(&self, next: PipelineState) {
        if let Err(e) = self.state.transition(next) {
            tracing::warn!(error = %e, "Pipeline state out of sync; forcing");
            self.state.force_set(next);
        }
    }
}

impl std::fmt::Debug for ConversionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionPipeline")
            .field("auto_paste_available", &self.paster.is_some())
            .field("settings", &*self.settings.load_full())
            .field("in_flight", &self.is_running())
            .finish()
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
