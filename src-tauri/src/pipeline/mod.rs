//! 转换流水线模块
//!
//! - [`request`] - 触发、请求与结果类型
//! - [`runner`] - 读取 → 转换 → 写入 → 粘贴 的状态机

pub mod request;
pub mod runner;

pub use request::{ConversionRequest, ConversionResult, Trigger, TriggerOrigin};
pub use runner::{ConversionPipeline, PipelineSettings};
