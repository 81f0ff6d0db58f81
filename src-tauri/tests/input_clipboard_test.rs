//! 剪贴板访问集成测试
//!
//! 系统剪贴板在无头环境中不可用，这里通过假后端测试校验逻辑

mod common;

use std::sync::Arc;

use caseshift_lib::input::{ClipboardAccess, ClipboardAccessor, InputError};
use common::FakeClipboard;

fn accessor(clipboard: &Arc<FakeClipboard>, max: usize) -> ClipboardAccessor {
    ClipboardAccessor::new(Arc::clone(clipboard) as Arc<dyn ClipboardAccess>, max)
}

// ==================== 读取 ====================

#[test]
fn test_read_returns_text_unchanged() {
    let clipboard = FakeClipboard::with_text("  Keep Spacing  ");
    assert_eq!(
        accessor(&clipboard, 100).read().unwrap(),
        "  Keep Spacing  "
    );
}

#[test]
fn test_read_empty_clipboard() {
    let clipboard = FakeClipboard::empty();
    assert_eq!(
        accessor(&clipboard, 100).read(),
        Err(InputError::ClipboardEmpty)
    );
}

#[test]
fn test_read_whitespace_only() {
    let clipboard = FakeClipboard::with_text("\n \t");
    assert_eq!(
        accessor(&clipboard, 100).read(),
        Err(InputError::ClipboardEmpty)
    );
}

#[test]
fn test_read_limit_counts_chars() {
    let clipboard = FakeClipboard::with_text("ÄÖÜ");
    assert!(accessor(&clipboard, 3).read().is_ok());
    assert_eq!(
        accessor(&clipboard, 2).read(),
        Err(InputError::TextTooLarge { length: 3, max: 2 })
    );
}

#[test]
fn test_read_access_failure_passes_through() {
    let clipboard = FakeClipboard::with_text("x");
    clipboard.fail_reads(1);
    assert!(matches!(
        accessor(&clipboard, 10).read(),
        Err(InputError::ClipboardAccess(_))
    ));
    assert!(accessor(&clipboard, 10).read().is_ok());
}

// ==================== 写入 ====================

#[test]
fn test_write_replaces_content() {
    let clipboard = FakeClipboard::with_text("old");
    accessor(&clipboard, 10).write("new").unwrap();
    assert_eq!(clipboard.text().as_deref(), Some("new"));
}

#[test]
fn test_oversized_text_is_read_once() {
    let clipboard = FakeClipboard::with_text("abcdef");
    let strict = accessor(&clipboard, 3);

    assert_eq!(strict.max_text_length(), 3);
    assert!(matches!(strict.read(), Err(InputError::TextTooLarge { .. })));
    assert_eq!(clipboard.reads(), 1);
}

// ==================== 错误类型 ====================

#[test]
fn test_transient_errors() {
    assert!(InputError::ClipboardAccess("locked".to_string()).is_transient());
    assert!(InputError::PasteFailed("x".to_string()).is_transient());
    assert!(!InputError::ClipboardEmpty.is_transient());
    assert!(!InputError::TextTooLarge { length: 2, max: 1 }.is_transient());
    assert!(!InputError::PermissionDenied.is_transient());
}

#[test]
fn test_error_display() {
    let err = InputError::TextTooLarge {
        length: 2_000_000,
        max: 1_000_000,
    };
    let msg = err.to_string();
    assert!(msg.contains("2000000"));
    assert!(msg.contains("1000000"));
}
