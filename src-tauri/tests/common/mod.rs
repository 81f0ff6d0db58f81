//! 集成测试共用的假实现

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use caseshift_lib::convert::ConversionMode;
use caseshift_lib::hotkey::{HotkeyBackend, HotkeyCallback, HotkeyError, HotkeyResult, KeyCombo};
use caseshift_lib::input::{
    AutoPaster, ClipboardAccess, FocusTracker, InputError, InputResult, PasteKeystroke, WindowInfo,
};
use caseshift_lib::notification::NotificationSink;
use caseshift_lib::pipeline::ConversionResult;

/// 内存剪贴板，可以注入失败
#[derive(Default)]
pub struct FakeClipboard {
    content: Mutex<Option<String>>,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
    read_failures: AtomicUsize,
    write_failures: AtomicUsize,
}

impl FakeClipboard {
    pub fn with_text(text: &str) -> Arc<Self> {
        let clipboard = Self::default();
        *clipboard.content.lock().unwrap() = Some(text.to_string());
        Arc::new(clipboard)
    }

    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// 接下来 `n` 次读取返回 ClipboardAccess
    pub fn fail_reads(&self, n: usize) {
        self.read_failures.store(n, Ordering::SeqCst);
    }

    /// 接下来 `n` 次写入返回 ClipboardAccess
    pub fn fail_writes(&self, n: usize) {
        self.write_failures.store(n, Ordering::SeqCst);
    }

    pub fn text(&self) -> Option<String> {
        self.content.lock().unwrap().clone()
    }

    pub fn set_text(&self, text: &str) {
        *self.content.lock().unwrap() = Some(text.to_string());
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn take_failure(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl ClipboardAccess for FakeClipboard {
    fn read_text(&self) -> InputResult<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if Self::take_failure(&self.read_failures) {
            return Err(InputError::ClipboardAccess("busy".to_string()));
        }
        self.text().ok_or(InputError::ClipboardEmpty)
    }

    fn write_text(&self, text: &str) -> InputResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if Self::take_failure(&self.write_failures) {
            return Err(InputError::ClipboardAccess("busy".to_string()));
        }
        self.set_text(text);
        Ok(())
    }
}

pub fn window(pid: u32, id: u32) -> WindowInfo {
    WindowInfo {
        app_name: format!("app-{}", pid),
        title: "Untitled".to_string(),
        process_id: pid,
        exec_name: format!("app-{}", pid),
        window_id: id,
    }
}

/// 焦点和按键的假实现
pub struct FakeDesktop {
    focused: Mutex<WindowInfo>,
    pub activations: AtomicUsize,
    pub pastes: AtomicUsize,
    paste_calls: AtomicUsize,
    fail_paste: AtomicBool,
    paste_error: Mutex<Option<InputError>>,
}

impl FakeDesktop {
    pub fn new(focused: WindowInfo) -> Arc<Self> {
        Arc::new(Self {
            focused: Mutex::new(focused),
            activations: AtomicUsize::new(0),
            pastes: AtomicUsize::new(0),
            paste_calls: AtomicUsize::new(0),
            fail_paste: AtomicBool::new(false),
            paste_error: Mutex::new(None),
        })
    }

    pub fn focus(&self, window: WindowInfo) {
        *self.focused.lock().unwrap() = window;
    }

    pub fn focused(&self) -> WindowInfo {
        self.focused.lock().unwrap().clone()
    }

    pub fn set_paste_failure(&self, fail: bool) {
        self.fail_paste.store(fail, Ordering::SeqCst);
    }

    /// 下一次粘贴送达后仍返回 PasteIncomplete
    pub fn fail_next_paste_after_delivery(&self) {
        *self.paste_error.lock().unwrap() =
            Some(InputError::PasteIncomplete("modifier stuck".to_string()));
    }

    /// 下一次粘贴因缺少权限失败，不送达
    pub fn deny_next_paste(&self) {
        *self.paste_error.lock().unwrap() = Some(InputError::PermissionDenied);
    }

    /// 送达的粘贴次数
    pub fn pastes(&self) -> usize {
        self.pastes.load(Ordering::SeqCst)
    }

    /// 包括失败在内的粘贴调用次数
    pub fn paste_calls(&self) -> usize {
        self.paste_calls.load(Ordering::SeqCst)
    }

    pub fn activations(&self) -> usize {
        self.activations.load(Ordering::SeqCst)
    }

    /// 以自身作为焦点和按键后端的自动粘贴器
    pub fn paster(self: &Arc<Self>) -> AutoPaster {
        AutoPaster::new(
            Arc::clone(self) as Arc<dyn FocusTracker>,
            Arc::clone(self) as Arc<dyn PasteKeystroke>,
            Duration::from_millis(1),
        )
    }
}

impl FocusTracker for FakeDesktop {
    fn focused_window(&self) -> InputResult<WindowInfo> {
        Ok(self.focused())
    }

    fn activate(&self, window: &WindowInfo) -> InputResult<()> {
        self.activations.fetch_add(1, Ordering::SeqCst);
        self.focus(window.clone());
        Ok(())
    }
}

impl PasteKeystroke for FakeDesktop {
    fn release_modifiers(&self) -> InputResult<()> {
        Ok(())
    }

    fn simulate_paste(&self) -> InputResult<()> {
        self.paste_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_paste.load(Ordering::SeqCst) {
            return Err(InputError::PasteFailed("no event tap".to_string()));
        }
        match self.paste_error.lock().unwrap().take() {
            Some(InputError::PermissionDenied) => Err(InputError::PermissionDenied),
            Some(err) => {
                self.pastes.fetch_add(1, Ordering::SeqCst);
                Err(err)
            }
            None => {
                self.pastes.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }
    }
}

/// 记录所有结果的通知接收器
#[derive(Default)]
pub struct RecordingNotifier {
    results: Mutex<Vec<ConversionResult>>,
}

impl RecordingNotifier {
    pub fn results(&self) -> Vec<ConversionResult> {
        self.results.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, result: &ConversionResult) {
        self.results.lock().unwrap().push(result.clone());
    }
}

/// 记录注册的热键后端，可以拒绝指定按键
#[derive(Default)]
pub struct FakeBackend {
    registered: Mutex<Vec<(KeyCombo, ConversionMode, HotkeyCallback)>>,
    unregister_calls: Mutex<usize>,
    reject: Option<String>,
}

impl FakeBackend {
    pub fn rejecting(key: &str) -> Self {
        Self {
            reject: Some(key.to_string()),
            ..Self::default()
        }
    }

    pub fn registered_count(&self) -> usize {
        self.registered.lock().unwrap().len()
    }

    pub fn unregister_calls(&self) -> usize {
        *self.unregister_calls.lock().unwrap()
    }

    /// 模拟按下某个组合键
    pub fn press(&self, descriptor: &str) -> bool {
        let combo = KeyCombo::parse(descriptor).unwrap();
        let registered = self.registered.lock().unwrap();
        match registered.iter().find(|(c, _, _)| *c == combo) {
            Some((_, mode, callback)) => {
                callback(*mode);
                true
            }
            None => false,
        }
    }
}

impl HotkeyBackend for FakeBackend {
    fn register(
        &self,
        combo: &KeyCombo,
        mode: ConversionMode,
        callback: HotkeyCallback,
    ) -> HotkeyResult<()> {
        if self.reject.as_deref() == Some(combo.key()) {
            return Err(HotkeyError::RegistrationFailed {
                hotkey: combo.to_string(),
                reason: "taken by another app".to_string(),
            });
        }
        self.registered
            .lock()
            .unwrap()
            .push((combo.clone(), mode, callback));
        Ok(())
    }

    fn unregister_all(&self) -> HotkeyResult<()> {
        self.registered.lock().unwrap().clear();
        *self.unregister_calls.lock().unwrap() += 1;
        Ok(())
    }
}

/// 记录每次回调模式的热键回调
pub fn recorder() -> (HotkeyCallback, Arc<Mutex<Vec<ConversionMode>>>) {
    let pressed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&pressed);
    let callback: HotkeyCallback = Arc::new(move |mode| sink.lock().unwrap().push(mode));
    (callback, pressed)
}
