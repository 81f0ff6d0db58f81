//! 键盘模拟模块
//!
//! 提供自动粘贴需要的两个动作：
//!
//! - 释放热键残留的修饰键，避免与粘贴快捷键叠加
//! - 模拟粘贴：Cmd+V (macOS) 或 Ctrl+V (Windows/Linux)
//!
//! # 平台支持
//!
//! | 平台 | 粘贴操作 | 备注 |
//! |------|----------|------|
//! | Windows | ✅ | 无需特殊权限 |
//! | macOS | ✅ | 需要辅助功能权限 |
//! | Linux (X11) | ✅ | 需要 X11 |
//! | Linux (Wayland) | ⚠️ | 受限支持 |

use super::error::{InputError, InputResult};
use enigo::{Direction, Enigo, Key, Keyboard, Settings};

/// 热键中可能仍处于按下状态的修饰键
const HELD_MODIFIERS: [Key; 4] = [Key::Meta, Key::Control, Key::Alt, Key::Shift];

/// 粘贴按键后端
///
/// 生产环境使用 [`EnigoKeystroke`]，测试中使用记录调用的假实现
pub trait PasteKeystroke: Send + Sync {
    /// 释放所有修饰键
    fn release_modifiers(&self) -> InputResult<()>;

    /// 发送平台粘贴快捷键
    ///
    /// 只有粘贴键确实没有送达时才返回 [`InputError::PasteFailed`]；
    /// 送达之后的失败返回 [`InputError::PasteIncomplete`]，调用方不得重试
    fn simulate_paste(&self) -> InputResult<()>;
}

/// 键盘模拟器
///
/// 封装 enigo 库，提供跨平台的键盘模拟功能
pub struct KeyboardSimulator {
    enigo: Enigo,
}

impl KeyboardSimulator {
    /// 创建新的键盘模拟器
    ///
    /// # Errors
    ///
    /// - `InputError::KeyboardSimulationFailed` - 初始化失败
    pub fn new() -> InputResult<Self> {
        let enigo = Enigo::new(&Settings::default()).map_err(|e| {
            InputError::KeyboardSimulationFailed(format!("Failed to initialize: {}", e))
        })?;

        tracing::debug!("Keyboard simulator initialized");

        Ok(Self { enigo })
    }

    /// 释放修饰键
    ///
    /// 用户触发热键后可能仍按着 Cmd/Shift，直接发送 Cmd+V 会变成 Cmd+Shift+V
    pub fn release_modifiers(&mut self) -> InputResult<()> {
        for key in HELD_MODIFIERS {
            self.enigo.key(key, Direction::Release).map_err(|e| {
                InputError::KeyboardSimulationFailed(format!(
                    "Failed to release {:?}: {}",
                    key, e
                ))
            })?;
        }

        tracing::trace!("Modifier keys released");
        Ok(())
    }

    /// 模拟粘贴操作
    ///
    /// 根据平台发送相应的粘贴快捷键：
    /// - Windows/Linux: Ctrl+V
    /// - macOS: Cmd+V
    ///
    /// # Errors
    ///
    /// - `InputError::PasteFailed` - 'v' 没有送达，可以安全重试
    /// - `InputError::PasteIncomplete` - 'v' 已送达，但修饰键没有松开
    pub fn paste(&mut self) -> InputResult<()> {
        tracing::debug!("Simulating paste operation");

        let modifier = Self::paste_modifier();

        self.enigo
            .key(modifier, Direction::Press)
            .map_err(|e| InputError::PasteFailed(format!("Failed to press {:?}: {}", modifier, e)))?;

        let click = self.enigo.key(Key::Unicode('v'), Direction::Click);

        // 无论 'v' 是否成功都要松开修饰键
        let release = self.enigo.key(modifier, Direction::Release);

        click.map_err(|e| InputError::PasteFailed(format!("Failed to click 'v': {}", e)))?;
        release.map_err(|e| {
            InputError::PasteIncomplete(format!("Failed to release {:?}: {}", modifier, e))
        })?;

        tracing::debug!("Paste operation completed");
        Ok(())
    }

    /// 当前平台的粘贴修饰键
    pub fn paste_modifier() -> Key {
        if cfg!(target_os = "macos") {
            Key::Meta
        } else {
            Key::Control
        }
    }
}

/// 基于 enigo 的粘贴按键实现
///
/// enigo 实例不跨线程保存，每次调用时重新创建
#[derive(Debug, Default, Clone, Copy)]
pub struct EnigoKeystroke;

impl PasteKeystroke for EnigoKeystroke {
    fn release_modifiers(&self) -> InputResult<()> {
        KeyboardSimulator::new()?.release_modifiers()
    }

    fn simulate_paste(&self) -> InputResult<()> {
        KeyboardSimulator::new()
            .map_err(|e| InputError::PasteFailed(e.to_string()))?
            .paste()
    }
}
