//! Transient notifications.
//!
//! Each toast schedules its own removal: it holds, fades, then disappears.
//! There is no queue, so several toasts can be on screen at once.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::broadcast;

use filmoteka_core::config::{Palette, UiConfig};
use filmoteka_core::models::NoticeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Visible,
    Fading,
}

/// A single toast notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: NoticeKind,
    pub color: String,
    pub phase: ToastPhase,
}

struct Inner {
    palette: Palette,
    hold: Duration,
    fade: Duration,
    next_id: AtomicU64,
    toasts: Mutex<Vec<Toast>>,
    shown: broadcast::Sender<Toast>,
}

/// Cloneable handle to the notification surface.
#[derive(Clone)]
pub struct Notifier {
    inner: Arc<Inner>,
}

impl Notifier {
    pub fn new(palette: Palette, hold: Duration, fade: Duration) -> Self {
        let (shown, _) = broadcast::channel(32);
        Self {
            inner: Arc::new(Inner {
                palette,
                hold,
                fade,
                next_id: AtomicU64::new(1),
                toasts: Mutex::new(Vec::new()),
                shown,
            }),
        }
    }

    pub fn from_config(ui: &UiConfig, palette: Palette) -> Self {
        Self::new(palette, ui.toast_hold(), ui.toast_fade())
    }

    /// Show a toast and schedule its removal. Never blocks.
    ///
    /// Must be called from within a tokio runtime.
    pub fn notify(&self, message: impl Into<String>, kind: NoticeKind) -> u64 {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let toast = Toast {
            id,
            message: message.into(),
            kind,
            color: self.inner.palette.color_for(kind).to_string(),
            phase: ToastPhase::Visible,
        };
        tracing::debug!(id, %kind, message = %toast.message, "Toast shown");

        self.toasts().push(toast.clone());
        // No subscribers is fine: the toast still lives in `visible()`.
        let _ = self.inner.shown.send(toast);

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.hold).await;
            if let Some(t) = lock(&inner.toasts).iter_mut().find(|t| t.id == id) {
                t.phase = ToastPhase::Fading;
            }
            tokio::time::sleep(inner.fade).await;
            lock(&inner.toasts).retain(|t| t.id != id);
        });

        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.notify(message, NoticeKind::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.notify(message, NoticeKind::Error)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.notify(message, NoticeKind::Info)
    }

    /// Toasts currently on screen, oldest first.
    pub fn visible(&self) -> Vec<Toast> {
        self.toasts().clone()
    }

    /// Stream of newly shown toasts, for front ends that render them.
    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.inner.shown.subscribe()
    }

    fn toasts(&self) -> std::sync::MutexGuard<'_, Vec<Toast>> {
        lock(&self.inner.toasts)
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notifier() -> Notifier {
        Notifier::new(
            Palette::default(),
            Duration::from_millis(3000),
            Duration::from_millis(300),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_toast_lifecycle() {
        let n = notifier();
        let id = n.success("Готово");
        assert_eq!(n.visible().len(), 1);
        assert_eq!(n.visible()[0].id, id);
        assert_eq!(n.visible()[0].color, "#198754");

        tokio::time::sleep(Duration::from_millis(3100)).await;
        assert_eq!(n.visible()[0].phase, ToastPhase::Fading);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(n.visible().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_toasts_have_independent_timers() {
        let n = notifier();
        n.info("first");
        tokio::time::sleep(Duration::from_millis(2000)).await;
        n.error("second");
        assert_eq!(n.visible().len(), 2);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        let visible = n.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].message, "second");
        assert_eq!(visible[0].kind, NoticeKind::Error);
    }

    #[tokio::test]
    async fn test_subscribers_see_new_toasts() {
        let n = notifier();
        let mut rx = n.subscribe();
        n.notify("📅 Запланировано", NoticeKind::Plan);
        let toast = rx.recv().await.unwrap();
        assert_eq!(toast.kind, NoticeKind::Plan);
        assert_eq!(toast.color, "#6f42c1");
    }
}
