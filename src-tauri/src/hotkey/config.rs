//! 热键配置模块
//!
//! 每个转换模式一个绑定，默认值使用 `CommandOrControl+Shift+<字母>`

use serde::{Deserialize, Serialize};

use crate::convert::ConversionMode;

/// 单个热键绑定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotkeyBinding {
    /// 热键描述，例如 "CommandOrControl+Shift+U"
    pub shortcut: String,

    /// 是否启用，禁用的绑定不会注册
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl HotkeyBinding {
    /// 创建启用的绑定
    pub fn new(shortcut: impl Into<String>) -> Self {
        Self {
            shortcut: shortcut.into(),
            enabled: true,
        }
    }

    /// 创建禁用的绑定
    pub fn disabled(shortcut: impl Into<String>) -> Self {
        Self {
            shortcut: shortcut.into(),
            enabled: false,
        }
    }
}

/// 热键配置
///
/// # Examples
///
/// ```
/// use caseshift_lib::convert::ConversionMode;
/// use caseshift_lib::hotkey::HotkeyConfig;
///
/// let config = HotkeyConfig::default()
///     .with_shortcut(ConversionMode::Uppercase, "Alt+Shift+U");
/// assert_eq!(config.binding(ConversionMode::Uppercase).shortcut, "Alt+Shift+U");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyConfig {
    /// 转为大写
    pub uppercase: HotkeyBinding,
    /// 转为小写
    pub lowercase: HotkeyBinding,
    /// 单词首字母大写
    pub capitalize: HotkeyBinding,
}

impl HotkeyConfig {
    /// 获取某个模式的绑定
    pub fn binding(&self, mode: ConversionMode) -> &HotkeyBinding {
        match mode {
            ConversionMode::Uppercase => &self.uppercase,
            ConversionMode::Lowercase => &self.lowercase,
            ConversionMode::Capitalize => &self.capitalize,
        }
    }

    /// 获取某个模式的可变绑定
    pub fn binding_mut(&mut self, mode: ConversionMode) -> &mut HotkeyBinding {
        match mode {
            ConversionMode::Uppercase => &mut self.uppercase,
            ConversionMode::Lowercase => &mut self.lowercase,
            ConversionMode::Capitalize => &mut self.capitalize,
        }
    }

    /// 按固定模式顺序列出所有绑定
    pub fn entries(&self) -> impl Iterator<Item = (ConversionMode, &HotkeyBinding)> {
        ConversionMode::ALL
            .iter()
            .map(move |&mode| (mode, self.binding(mode)))
    }

    /// 替换某个模式的热键
    pub fn with_shortcut(mut self, mode: ConversionMode, shortcut: impl Into<String>) -> Self {
        self.binding_mut(mode).shortcut = shortcut.into();
        self
    }
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            uppercase: HotkeyBinding::new("CommandOrControl+Shift+U"),
            lowercase: HotkeyBinding::new("CommandOrControl+Shift+L"),
            capitalize: HotkeyBinding::new("CommandOrControl+Shift+C"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let config = HotkeyConfig::default();
        assert_eq!(config.uppercase.shortcut, "CommandOrControl+Shift+U");
        assert_eq!(config.lowercase.shortcut, "CommandOrControl+Shift+L");
        assert_eq!(config.capitalize.shortcut, "CommandOrControl+Shift+C");
        assert!(config.entries().all(|(_, b)| b.enabled));
    }

    #[test]
    fn test_entries_order() {
        let config = HotkeyConfig::default();
        let modes: Vec<_> = config.entries().map(|(m, _)| m).collect();
        assert_eq!(modes, ConversionMode::ALL.to_vec());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "lowercase": { "shortcut": "Alt+L" } }"#;
        let config: HotkeyConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.lowercase, HotkeyBinding::new("Alt+L"));
        assert_eq!(config.uppercase, HotkeyConfig::default().uppercase);
    }

    #[test]
    fn test_binding_mut() {
        let mut config = HotkeyConfig::default();
        config.binding_mut(ConversionMode::Capitalize).enabled = false;
        assert!(!config.capitalize.enabled);
    }
}
