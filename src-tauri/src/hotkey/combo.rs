//! 组合键描述
//!
//! 把用户书写的热键字符串规范化为 [`KeyCombo`]，
//! 使 `Cmd+Shift+U`、`shift+command+u` 和 `CommandOrControl+Shift+U`（macOS）
//! 得到同一个值，冲突检测只需比较相等性。

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::{HotkeyError, HotkeyResult};

/// 修饰键
///
/// 排序决定规范化输出中的顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Modifier {
    /// Cmd (macOS) / Win (Windows) / Super (Linux)
    Super,
    /// Ctrl
    Control,
    /// Option (macOS) / Alt
    Alt,
    /// Shift
    Shift,
}

impl Modifier {
    /// 解析修饰键名称（不区分大小写）
    ///
    /// `CommandOrControl` 在 macOS 上解析为 Super，其余平台为 Control
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "cmd" | "command" | "super" | "meta" | "win" | "windows" => Some(Self::Super),
            "ctrl" | "control" => Some(Self::Control),
            "alt" | "option" | "opt" => Some(Self::Alt),
            "shift" => Some(Self::Shift),
            "commandorcontrol" | "cmdorctrl" | "cmdorcontrol" | "commandorctrl" => {
                Some(Self::command_or_control())
            }
            _ => None,
        }
    }

    /// 当前平台的主修饰键
    pub fn command_or_control() -> Self {
        if cfg!(target_os = "macos") {
            Self::Super
        } else {
            Self::Control
        }
    }

    /// 加速键字符串中的名称
    pub fn accelerator_name(&self) -> &'static str {
        match self {
            Self::Super => "Super",
            Self::Control => "Control",
            Self::Alt => "Alt",
            Self::Shift => "Shift",
        }
    }

    /// macOS 菜单符号
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Super => "⌘",
            Self::Control => "⌃",
            Self::Alt => "⌥",
            Self::Shift => "⇧",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.accelerator_name())
    }
}

/// 规范化的组合键：修饰键集合 + 一个基础键
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct KeyCombo {
    modifiers: BTreeSet<Modifier>,
    key: String,
}

impl KeyCombo {
    /// 由修饰键和基础键构造
    ///
    /// # Errors
    ///
    /// 基础键不是可识别的按键时返回 [`HotkeyError::InvalidFormat`]
    pub fn new(modifiers: impl IntoIterator<Item = Modifier>, key: &str) -> HotkeyResult<Self> {
        let key = normalize_key(key).ok_or_else(|| HotkeyError::InvalidFormat(key.to_string()))?;
        Ok(Self {
            modifiers: modifiers.into_iter().collect(),
            key,
        })
    }

    /// 解析热键字符串
    ///
    /// 以 `+` 分隔，最后一个非修饰键为基础键，修饰键顺序和大小写无关
    ///
    /// # Errors
    ///
    /// 空字符串、缺少基础键、多个基础键或未知按键返回 [`HotkeyError::InvalidFormat`]
    ///
    /// # Example
    ///
    /// ```
    /// use caseshift_lib::hotkey::KeyCombo;
    ///
    /// let a = KeyCombo::parse("Cmd+Shift+U").unwrap();
    /// let b = KeyCombo::parse("shift+command+u").unwrap();
    /// assert_eq!(a, b);
    /// ```
    pub fn parse(descriptor: &str) -> HotkeyResult<Self> {
        let invalid = || HotkeyError::InvalidFormat(descriptor.to_string());

        let mut modifiers = BTreeSet::new();
        let mut key: Option<String> = None;

        for token in descriptor.split('+').map(str::trim) {
            if token.is_empty() {
                return Err(invalid());
            }

            if let Some(modifier) = Modifier::parse(token) {
                modifiers.insert(modifier);
                continue;
            }

            if key.is_some() {
                return Err(invalid());
            }
            key = Some(normalize_key(token).ok_or_else(invalid)?);
        }

        let key = key.ok_or_else(invalid)?;
        Ok(Self { modifiers, key })
    }

    /// 修饰键集合
    pub fn modifiers(&self) -> &BTreeSet<Modifier> {
        &self.modifiers
    }

    /// 基础键
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Tauri 全局快捷键插件可解析的加速键字符串
    pub fn to_accelerator(&self) -> String {
        self.to_string()
    }

    /// macOS 风格的符号标签，例如 `⌘⇧U`
    pub fn symbol_label(&self) -> String {
        let mut label: String = self.modifiers.iter().map(Modifier::symbol).collect();
        label.push_str(&self.key);
        label
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier)?;
        }
        f.write_str(&self.key)
    }
}

impl FromStr for KeyCombo {
    type Err = HotkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

const NAMED_KEYS: &[&str] = &[
    "Space", "Enter", "Tab", "Escape", "Backspace", "Delete", "Insert", "Home", "End", "PageUp",
    "PageDown", "Up", "Down", "Left", "Right",
];

/// 规范化基础键，无法识别时返回 None
fn normalize_key(token: &str) -> Option<String> {
    let mut chars = token.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return (ch.is_ascii_alphanumeric() || ".,;/\\'`[]-=".contains(ch))
            .then(|| ch.to_ascii_uppercase().to_string());
    }

    let lower = token.to_ascii_lowercase();

    // 兼容 W3C 代码名：KeyU、Digit1
    if let Some(rest) = lower.strip_prefix("key").filter(|r| r.len() == 1) {
        return normalize_key(rest).filter(|k| k.chars().all(|c| c.is_ascii_alphabetic()));
    }
    if let Some(rest) = lower.strip_prefix("digit").filter(|r| r.len() == 1) {
        return normalize_key(rest).filter(|k| k.chars().all(|c| c.is_ascii_digit()));
    }

    if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        return (1..=24).contains(&n).then(|| format!("F{}", n));
    }

    let alias = match lower.as_str() {
        "esc" => "escape",
        "return" => "enter",
        "arrowup" => "up",
        "arrowdown" => "down",
        "arrowleft" => "left",
        "arrowright" => "right",
        other => other,
    };

    NAMED_KEYS
        .iter()
        .find(|name| name.eq_ignore_ascii_case(alias))
        .map(|name| name.to_string())
}
