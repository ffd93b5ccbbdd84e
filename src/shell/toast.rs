/// 컨트롤러가 만들고 셸이 비우는 알림 큐
// region:    --- Imports
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

// endregion: --- Imports

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct Toasts {
    queue: Arc<Mutex<VecDeque<Toast>>>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, kind: ToastKind, title: impl Into<String>, message: impl Into<String>) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(Toast {
                kind,
                title: title.into(),
                message: message.into(),
            });
        }
    }

    pub fn success(&self, title: impl Into<String>, message: impl Into<String>) {
        self.push(ToastKind::Success, title, message);
    }

    pub fn error(&self, title: impl Into<String>, message: impl Into<String>) {
        self.push(ToastKind::Error, title, message);
    }

    pub fn info(&self, title: impl Into<String>, message: impl Into<String>) {
        self.push(ToastKind::Info, title, message);
    }

    /// 쌓인 알림을 모두 꺼낸다
    pub fn drain(&self) -> Vec<Toast> {
        self.queue
            .lock()
            .map(|mut q| q.drain(..).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().map(|q| q.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
