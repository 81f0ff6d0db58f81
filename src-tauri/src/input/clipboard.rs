//! 剪贴板访问模块
//!
//! 系统剪贴板是进程外的共享资源，这里只提供一个窄接口：
//!
//! - [`ClipboardAccess`] - 读写纯文本的后端抽象
//! - [`SystemClipboard`] - 基于 arboard 的系统剪贴板实现
//! - [`ClipboardAccessor`] - 在后端之上做非空和长度校验
//!
//! # 注意事项
//!
//! - 读取只是一次快照，其他进程随时可能修改剪贴板
//! - 日志只记录长度，不记录剪贴板内容

use std::sync::Arc;

use super::error::{InputError, InputResult};

/// 剪贴板后端
///
/// 生产环境使用 [`SystemClipboard`]，测试中使用内存实现
pub trait ClipboardAccess: Send + Sync {
    /// 读取剪贴板文本
    ///
    /// 剪贴板中没有文本时返回 [`InputError::ClipboardEmpty`]
    fn read_text(&self) -> InputResult<String>;

    /// 写入文本，成功后剪贴板内容恰好为 `text`
    fn write_text(&self, text: &str) -> InputResult<()>;
}

/// 系统剪贴板
///
/// 每次操作都新建 `arboard::Clipboard`，不在线程之间共享句柄
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }

    fn open() -> InputResult<arboard::Clipboard> {
        arboard::Clipboard::new()
            .map_err(|e| InputError::ClipboardAccess(format!("Failed to open clipboard: {}", e)))
    }
}

impl ClipboardAccess for SystemClipboard {
    fn read_text(&self) -> InputResult<String> {
        let mut clipboard = Self::open()?;

        match clipboard.get_text() {
            Ok(text) => Ok(text),
            Err(arboard::Error::ContentNotAvailable) => Err(InputError::ClipboardEmpty),
            Err(e) => Err(InputError::ClipboardAccess(format!("Failed to read: {}", e))),
        }
    }

    fn write_text(&self, text: &str) -> InputResult<()> {
        let mut clipboard = Self::open()?;

        clipboard
            .set_text(text)
            .map_err(|e| InputError::ClipboardAccess(format!("Failed to write: {}", e)))
    }
}

/// 带校验的剪贴板访问器
///
/// 读取时拒绝空文本（包括只有空白的文本）和超长文本
#[derive(Clone)]
pub struct ClipboardAccessor {
    backend: Arc<dyn ClipboardAccess>,
    max_text_length: usize,
}

impl ClipboardAccessor {
    /// 创建访问器
    ///
    /// # Arguments
    ///
    /// * `backend` - 剪贴板后端
    /// * `max_text_length` - 允许的最大字符数
    pub fn new(backend: Arc<dyn ClipboardAccess>, max_text_length: usize) -> Self {
        Self {
            backend,
            max_text_length,
        }
    }

    /// 允许的最大字符数
    pub fn max_text_length(&self) -> usize {
        self.max_text_length
    }

    /// 读取并校验剪贴板文本
    ///
    /// # Errors
    ///
    /// - `InputError::ClipboardEmpty` - 没有文本，或只有空白
    /// - `InputError::TextTooLarge` - 字符数超过上限
    /// - `InputError::ClipboardAccess` - 系统调用失败
    pub fn read(&self) -> InputResult<String> {
        let text = self.backend.read_text()?;

        if text.trim().is_empty() {
            tracing::debug!(raw_len = text.len(), "Clipboard holds no usable text");
            return Err(InputError::ClipboardEmpty);
        }

        let length = text.chars().count();
        if length > self.max_text_length {
            tracing::warn!(length, max = self.max_text_length, "Clipboard text too large");
            return Err(InputError::TextTooLarge {
                length,
                max: self.max_text_length,
            });
        }

        tracing::debug!(length, "Read clipboard text");
        Ok(text)
    }

    /// 写入文本
    ///
    /// # Errors
    ///
    /// - `InputError::ClipboardAccess` - 系统调用失败
    pub fn write(&self, text: &str) -> InputResult<()> {
        self.backend.write_text(text)?;
        tracing::debug!(length = text.chars().count(), "Wrote clipboard text");
        Ok(())
    }
}

impl std::fmt::Debug for ClipboardAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipboardAccessor")
            .field("max_text_length", &self.max_text_length)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryClipboard {
        content: Mutex<Option<String>>,
    }

    impl ClipboardAccess for MemoryClipboard {
        fn read_text(&self) -> InputResult<String> {
            self.content
                .lock()
                .unwrap()
                .clone()
                .ok_or(InputError::ClipboardEmpty)
        }

        fn write_text(&self, text: &str) -> InputResult<()> {
            *self.content.lock().unwrap() = Some(text.to_string());
            Ok(())
        }
    }

    fn accessor_with(content: Option<&str>, max: usize) -> (Arc<MemoryClipboard>, ClipboardAccessor) {
        let backend = Arc::new(MemoryClipboard {
            content: Mutex::new(content.map(str::to_string)),
        });
        let accessor = ClipboardAccessor::new(backend.clone(), max);
        (backend, accessor)
    }

    #[test]
    fn test_read_returns_text() {
        let (_, accessor) = accessor_with(Some("Test123"), 100);
        assert_eq!(accessor.read().unwrap(), "Test123");
    }

    #[test]
    fn test_read_empty_clipboard() {
        let (_, accessor) = accessor_with(None, 100);
        assert_eq!(accessor.read(), Err(InputError::ClipboardEmpty));
    }

    #[test]
    fn test_read_whitespace_only_is_empty() {
        let (_, accessor) = accessor_with(Some(" \n\t "), 100);
        assert_eq!(accessor.read(), Err(InputError::ClipboardEmpty));
    }

    #[test]
    fn test_read_rejects_oversized_text() {
        let (_, accessor) = accessor_with(Some("abcdef"), 5);
        assert_eq!(
            accessor.read(),
            Err(InputError::TextTooLarge { length: 6, max: 5 })
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let (_, accessor) = accessor_with(Some("ééééé"), 5);
        assert_eq!(accessor.read().unwrap(), "ééééé");
    }

    #[test]
    fn test_write_replaces_content() {
        let (backend, accessor) = accessor_with(Some("old"), 100);
        accessor.write("new").unwrap();
        assert_eq!(backend.read_text().unwrap(), "new");
    }
}
