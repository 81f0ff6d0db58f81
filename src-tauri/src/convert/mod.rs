//! 大小写转换模块
//!
//! 提供纯函数式的文本大小写转换
//!
//! # 功能
//!
//! - 全部大写：与区域设置无关的 Unicode 大写映射
//! - 全部小写：与区域设置无关的 Unicode 小写映射
//! - 首字母大写：按空白切分单词，保留原始空白
//!
//! # 使用示例
//!
//! ```
//! use caseshift_lib::convert::{transform, ConversionMode};
//!
//! let output = transform("hello world", ConversionMode::Capitalize).unwrap();
//! assert_eq!(output, "Hello World");
//! ```

mod error;
mod mode;
mod transform;

pub use error::{ConvertError, ConvertResult};
pub use mode::ConversionMode;
pub use transform::{capitalize_words, transform};
