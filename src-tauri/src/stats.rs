//! 使用统计
//!
//! 只在内存中累计本次启动以来的转换结果，不落盘，不记录文本。
//! 托盘的“使用统计”项读取 [`UsageSummary`]，更新提示文字并发送
//! `stats:summary` 事件。

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use serde::Serialize;

use crate::convert::ConversionMode;
use crate::pipeline::{ConversionResult, TriggerOrigin};
use crate::utils::ErrorKind;

/// 统计摘要事件名
pub const STATS_EVENT: &str = "stats:summary";

#[derive(Debug, Default)]
struct Counters {
    successful: u64,
    failed: u64,
    degraded: u64,
    rejected: u64,
    hotkey_activations: u64,
    total_duration_ms: u64,
    by_mode: HashMap<ConversionMode, u64>,
    errors: HashMap<ErrorKind, u64>,
}

/// 使用统计累加器
#[derive(Debug)]
pub struct UsageStats {
    counters: Mutex<Counters>,
    started: Instant,
}

impl UsageStats {
    pub fn new() -> Self {
        Self {
            counters: Mutex::new(Counters::default()),
            started: Instant::now(),
        }
    }

    /// 记录一次运行的结果
    ///
    /// 因已有运行而被拒绝的触发只计入 `rejected`，不计入转换总数
    pub fn record(&self, result: &ConversionResult, origin: TriggerOrigin) {
        let mut counters = self.lock();

        if origin == TriggerOrigin::Hotkey {
            counters.hotkey_activations += 1;
        }

        if result.error == Some(ErrorKind::ConversionInProgress) {
            counters.rejected += 1;
            return;
        }

        if result.success {
            counters.successful += 1;
            counters.total_duration_ms += result.duration_ms;
            *counters.by_mode.entry(result.mode).or_default() += 1;
        } else {
            counters.failed += 1;
        }

        if result.degraded {
            counters.degraded += 1;
        }

        if let Some(kind) = result.error {
            *counters.errors.entry(kind).or_default() += 1;
        }
    }

    /// 当前摘要
    pub fn summary(&self) -> UsageSummary {
        let counters = self.lock();

        let total = counters.successful + counters.failed;
        let success_rate = if total == 0 {
            0.0
        } else {
            round1(counters.successful as f64 * 100.0 / total as f64)
        };
        let average_duration_ms = if counters.successful == 0 {
            0.0
        } else {
            round1(counters.total_duration_ms as f64 / counters.successful as f64)
        };

        // 次数相同时按 ConversionMode::ALL 的顺序取第一个
        let most_used_mode = ConversionMode::ALL
            .into_iter()
            .filter_map(|mode| counters.by_mode.get(&mode).map(|&n| (mode, n)))
            .fold(None, |best: Option<(ConversionMode, u64)>, (mode, n)| match best {
                Some((_, best_n)) if best_n >= n => best,
                _ => Some((mode, n)),
            })
            .map(|(mode, _)| mode);

        let mut errors: Vec<ErrorCount> = counters
            .errors
            .iter()
            .map(|(&kind, &count)| ErrorCount { kind, count })
            .collect();
        errors.sort_by(|a, b| b.count.cmp(&a.count).then(a.kind.name().cmp(b.kind.name())));

        UsageSummary {
            total,
            successful: counters.successful,
            failed: counters.failed,
            degraded: counters.degraded,
            rejected: counters.rejected,
            hotkey_activations: counters.hotkey_activations,
            success_rate,
            average_duration_ms,
            most_used_mode,
            errors,
            session_minutes: self.started.elapsed().as_secs() / 60,
        }
    }

    /// 清零所有计数
    pub fn reset(&self) {
        *self.lock() = Counters::default();
    }

    fn lock(&self) -> MutexGuard<'_, Counters> {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for UsageStats {
    fn default() -> Self {
        Self::new()
    }
}

/// 某类错误出现的次数
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorCount {
    pub kind: ErrorKind,
    pub count: u64,
}

/// 评级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Excellent,
    Good,
    Poor,
}

/// 统计摘要
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageSummary {
    /// 成功 + 失败
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
    /// 成功但未能自动粘贴
    pub degraded: u64,
    /// 运行中被拒绝的触发
    pub rejected: u64,
    pub hotkey_activations: u64,
    /// 百分比，保留一位小数
    pub success_rate: f64,
    /// 成功运行的平均耗时
    pub average_duration_ms: f64,
    pub most_used_mode: Option<ConversionMode>,
    /// 按次数降序
    pub errors: Vec<ErrorCount>,
    pub session_minutes: u64,
}

impl UsageSummary {
    /// 出现最多的错误
    pub fn most_common_error(&self) -> Option<ErrorKind> {
        self.errors.first().map(|e| e.kind)
    }

    /// 速度评级：100 ms 以内为优，500 ms 以内为良
    pub fn speed_rating(&self) -> Rating {
        match self.average_duration_ms {
            ms if ms < 100.0 => Rating::Excellent,
            ms if ms < 500.0 => Rating::Good,
            _ => Rating::Poor,
        }
    }

    /// 成功率评级：95% 以上为优，80% 以上为良
    pub fn reliability_rating(&self) -> Rating {
        match self.success_rate {
            rate if rate > 95.0 => Rating::Excellent,
            rate if rate > 80.0 => Rating::Good,
            _ => Rating::Poor,
        }
    }

    /// 托盘提示文字
    pub fn tooltip(&self) -> String {
        if self.total == 0 {
            return "CaseShift - 暂无转换记录".to_string();
        }

        let mut text = format!(
            "CaseShift - 转换 {} 次，成功率 {}%，平均 {} ms",
            self.total, self.success_rate, self.average_duration_ms
        );
        if let Some(mode) = self.most_used_mode {
            text.push_str(&format!("，最常用 {}", mode.display_name()));
        }
        text
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(mode: ConversionMode, ms: u64) -> ConversionResult {
        ConversionResult::success(mode, "X".to_string(), ms, false)
    }

    #[test]
    fn test_empty_summary() {
        let summary = UsageStats::new().summary();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.success_rate, 0.0);
        assert_eq!(summary.most_used_mode, None);
        assert_eq!(summary.most_common_error(), None);
        assert_eq!(summary.tooltip(), "CaseShift - 暂无转换记录");
    }

    #[test]
    fn test_counts_and_rates() {
        let stats = UsageStats::new();
        stats.record(&ok(ConversionMode::Uppercase, 10), TriggerOrigin::Hotkey);
        stats.record(&ok(ConversionMode::Lowercase, 20), TriggerOrigin::Tray);
        stats.record(&ok(ConversionMode::Lowercase, 30), TriggerOrigin::Hotkey);
        stats.record(
            &ConversionResult::failure(ConversionMode::Uppercase, ErrorKind::ClipboardEmpty, "x", 1),
            TriggerOrigin::Hotkey,
        );

        let summary = stats.summary();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.successful, 3);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.success_rate, 75.0);
        assert_eq!(summary.average_duration_ms, 20.0);
        assert_eq!(summary.hotkey_activations, 3);
        assert_eq!(summary.most_used_mode, Some(ConversionMode::Lowercase));
        assert_eq!(summary.most_common_error(), Some(ErrorKind::ClipboardEmpty));
        assert_eq!(summary.reliability_rating(), Rating::Poor);
        assert_eq!(summary.speed_rating(), Rating::Excellent);
    }

    #[test]
    fn test_busy_rejection_is_not_a_conversion() {
        let stats = UsageStats::new();
        stats.record(&ConversionResult::busy(ConversionMode::Capitalize), TriggerOrigin::Hotkey);

        let summary = stats.summary();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.hotkey_activations, 1);
        assert!(summary.errors.is_empty());
    }

    #[test]
    fn test_degraded_counts_as_success_with_error() {
        let stats = UsageStats::new();
        stats.record(
            &ConversionResult::degraded(ConversionMode::Uppercase, "A".into(), 40, "x"),
            TriggerOrigin::Manual,
        );

        let summary = stats.summary();
        assert_eq!(summary.successful, 1);
        assert_eq!(summary.degraded, 1);
        assert_eq!(summary.errors, vec![ErrorCount { kind: ErrorKind::Paste, count: 1 }]);
    }

    #[test]
    fn test_most_used_tie_prefers_mode_order() {
        let stats = UsageStats::new();
        stats.record(&ok(ConversionMode::Capitalize, 1), TriggerOrigin::Tray);
        stats.record(&ok(ConversionMode::Uppercase, 1), TriggerOrigin::Tray);
        assert_eq!(stats.summary().most_used_mode, Some(ConversionMode::Uppercase));
    }

    #[test]
    fn test_reset() {
        let stats = UsageStats::new();
        stats.record(&ok(ConversionMode::Uppercase, 1), TriggerOrigin::Tray);
        stats.reset();
        assert_eq!(stats.summary().total, 0);
    }

    #[test]
    fn test_summary_serialization() {
        let stats = UsageStats::new();
        stats.record(&ok(ConversionMode::Capitalize, 120), TriggerOrigin::Tray);
        let json = serde_json::to_value(stats.summary()).unwrap();
        assert_eq!(json["most_used_mode"], "capitalize");
        assert_eq!(json["success_rate"], 100.0);
    }
}
