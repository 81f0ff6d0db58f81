use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 转换模式
///
/// 固定的三种大小写转换方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionMode {
    /// 全部大写
    Uppercase,
    /// 全部小写
    Lowercase,
    /// 每个单词首字母大写
    Capitalize,
}

impl ConversionMode {
    /// 所有模式，按菜单顺序排列
    pub const ALL: [ConversionMode; 3] = [Self::Uppercase, Self::Lowercase, Self::Capitalize];

    /// 模式标识符（用于配置、事件和托盘菜单 ID）
    pub fn name(&self) -> &'static str {
        match self {
            Self::Uppercase => "uppercase",
            Self::Lowercase => "lowercase",
            Self::Capitalize => "capitalize",
        }
    }

    /// 面向用户的显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Uppercase => "UPPERCASE",
            Self::Lowercase => "lowercase",
            Self::Capitalize => "Capitalize Words",
        }
    }
}

impl fmt::Display for ConversionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConversionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uppercase" | "upper" => Ok(Self::Uppercase),
            "lowercase" | "lower" => Ok(Self::Lowercase),
            "capitalize" | "title" => Ok(Self::Capitalize),
            other => Err(format!("Unknown conversion mode: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_names_are_unique() {
        let names: std::collections::HashSet<_> =
            ConversionMode::ALL.iter().map(|m| m.name()).collect();
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("upper".parse::<ConversionMode>(), Ok(ConversionMode::Uppercase));
        assert_eq!(" Lowercase ".parse::<ConversionMode>(), Ok(ConversionMode::Lowercase));
        assert_eq!("title".parse::<ConversionMode>(), Ok(ConversionMode::Capitalize));
        assert!("snake".parse::<ConversionMode>().is_err());
    }

    #[test]
    fn test_mode_serialization() {
        let json = serde_json::to_string(&ConversionMode::Capitalize).unwrap();
        assert_eq!(json, "\"capitalize\"");

        let mode: ConversionMode = serde_json::from_str("\"uppercase\"").unwrap();
        assert_eq!(mode, ConversionMode::Uppercase);
    }
}
