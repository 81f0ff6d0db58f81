//! 热键冲突检测
//!
//! 在向系统注册之前，先把所有绑定放进以 [`KeyCombo`] 为键的表里。
//! 规范化后相同的组合键会在这里被拒绝，不会触及操作系统。

use std::collections::BTreeMap;

use super::combo::KeyCombo;
use super::config::HotkeyConfig;
use super::error::{HotkeyError, HotkeyResult};
use crate::convert::ConversionMode;

/// 组合键到转换模式的映射
#[derive(Debug, Clone, Default)]
pub struct HotkeyRegistry {
    bindings: BTreeMap<KeyCombo, ConversionMode>,
}

impl HotkeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由配置构建，跳过禁用的绑定
    ///
    /// # Errors
    ///
    /// 第一个无效或冲突的绑定
    pub fn from_config(config: &HotkeyConfig) -> HotkeyResult<Self> {
        let mut registry = Self::new();

        for (mode, binding) in config.entries() {
            if !binding.enabled {
                tracing::debug!(mode = %mode, "Hotkey binding disabled, skipping");
                continue;
            }
            registry.bind(&binding.shortcut, mode)?;
        }

        Ok(registry)
    }

    /// 绑定一个组合键
    ///
    /// # Arguments
    ///
    /// * `descriptor` - 热键描述字符串
    /// * `mode` - 触发的转换模式
    ///
    /// # Errors
    ///
    /// - 描述无效时返回 [`HotkeyError::InvalidFormat`]
    /// - 组合键已被占用时返回 [`HotkeyError::Conflict`]，原绑定保持不变
    pub fn bind(&mut self, descriptor: &str, mode: ConversionMode) -> HotkeyResult<KeyCombo> {
        let combo = KeyCombo::parse(descriptor)?;

        if let Some(&existing) = self.bindings.get(&combo) {
            return Err(HotkeyError::Conflict {
                hotkey: combo.to_string(),
                existing,
                requested: mode,
            });
        }

        self.bindings.insert(combo.clone(), mode);
        Ok(combo)
    }

    /// 查询组合键对应的模式
    pub fn mode_for(&self, combo: &KeyCombo) -> Option<ConversionMode> {
        self.bindings.get(combo).copied()
    }

    /// 查询某个模式绑定的组合键
    pub fn combo_for(&self, mode: ConversionMode) -> Option<&KeyCombo> {
        self.bindings
            .iter()
            .find(|&(_, &m)| m == mode)
            .map(|(combo, _)| combo)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&KeyCombo, ConversionMode)> {
        self.bindings.iter().map(|(combo, &mode)| (combo, mode))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
