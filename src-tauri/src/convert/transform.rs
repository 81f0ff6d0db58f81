use super::error::{ConvertError, ConvertResult};
use super::mode::ConversionMode;

/// 按指定模式转换文本
///
/// 纯函数，不修改输入，不访问任何外部资源
///
/// # Arguments
///
/// * `text` - 源文本
/// * `mode` - 转换模式
///
/// # Errors
///
/// 输入为空字符串时返回 [`ConvertError::EmptyInput`]
///
/// # Example
///
/// ```
/// use caseshift_lib::convert::{transform, ConversionMode};
///
/// assert_eq!(transform("Test123", ConversionMode::Uppercase).unwrap(), "TEST123");
/// assert!(transform("", ConversionMode::Lowercase).is_err());
/// ```
pub fn transform(text: &str, mode: ConversionMode) -> ConvertResult<String> {
    if text.is_empty() {
        return Err(ConvertError::EmptyInput);
    }

    let output = match mode {
        ConversionMode::Uppercase => text.to_uppercase(),
        ConversionMode::Lowercase => text.to_lowercase(),
        ConversionMode::Capitalize => capitalize_words(text),
    };

    Ok(output)
}

/// 每个单词首字母大写，其余字母小写
///
/// 单词是连续的非空白字符。空白字符原样保留（包括连续空白、制表符和换行）。
/// 单词中第一个字母字符转为大写，其它字符转为小写；
/// 单词开头的数字或标点不计为首字母。
pub fn capitalize_words(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut seen_alpha = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            seen_alpha = false;
            output.push(ch);
        } else if !seen_alpha && ch.is_alphabetic() {
            seen_alpha = true;
            output.extend(ch.to_uppercase());
        } else {
            output.extend(ch.to_lowercase());
        }
    }

    output
}
