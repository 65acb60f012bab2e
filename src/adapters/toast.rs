use crate::domain::ports::{Toast, ToastLevel, ToastSink};
use std::sync::{Arc, Mutex};

/// 直接印到終端的 toast
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleToasts;

impl ToastSink for ConsoleToasts {
    fn push(&self, toast: Toast) {
        match toast.level {
            ToastLevel::Success => {
                tracing::debug!("toast: {}", toast.message);
                println!("✅ {}", toast.message);
            }
            ToastLevel::Info => {
                tracing::debug!("toast: {}", toast.message);
                println!("ℹ️  {}", toast.message);
            }
            ToastLevel::Error => {
                tracing::warn!("toast: {}", toast.message);
                eprintln!("❌ {}", toast.message);
            }
        }
    }
}

/// 收集 toast 的記錄器，clone 之間共享同一份清單
#[derive(Debug, Clone, Default)]
pub struct ToastLog {
    toasts: Arc<Mutex<Vec<Toast>>>,
}

impl ToastLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<Toast> {
        self.toasts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.snapshot()
            .into_iter()
            .filter(|t| t.level == ToastLevel::Error)
            .map(|t| t.message)
            .collect()
    }

    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.toasts.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl ToastSink for ToastLog {
    fn push(&self, toast: Toast) {
        self.toasts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(toast);
    }
}
