//! Yes/no gate in front of destructive actions.
//!
//! Only one dialog exists at a time, under a reserved element id. Opening a
//! new one retires the previous dialog, whose caller then sees `false`.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::task::{Context, Poll};

use tokio::sync::{oneshot, watch};

use filmoteka_core::models::FilmAction;

/// Element id reserved for the confirmation overlay.
pub const DIALOG_ID: &str = "confirmModal";

/// Question shown in the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog {
    pub title: String,
    pub message: String,
    pub confirm_label: String,
}

impl ConfirmDialog {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_label: "Подтвердить".into(),
        }
    }

    fn confirm_with(mut self, label: &str) -> Self {
        self.confirm_label = label.into();
        self
    }

    /// Wording for a film-card action, or `None` when the action needs no gate.
    pub fn for_action(action: FilmAction, film_title: &str) -> Option<Self> {
        match action {
            FilmAction::Delete => Some(
                Self::new(
                    "Удалить фильм?",
                    format!(
                        "«{film_title}» будет удалён из ваших фильмов вместе с отзывом и оценкой."
                    ),
                )
                .confirm_with("Удалить"),
            ),
            FilmAction::DeleteWatched => Some(
                Self::new(
                    "Убрать из просмотренного?",
                    format!("Отзыв и оценка фильма «{film_title}» будут удалены безвозвратно."),
                )
                .confirm_with("Убрать"),
            ),
            FilmAction::Unfavorite => Some(
                Self::new(
                    "Убрать из любимого?",
                    format!("«{film_title}» исчезнет из списка любимых фильмов."),
                )
                .confirm_with("Убрать"),
            ),
            FilmAction::Plan | FilmAction::Watch | FilmAction::Favorite => None,
        }
    }

    pub fn block_user() -> Self {
        Self::new(
            "Заблокировать пользователя?",
            "Пользователь будет немедленно заблокирован и все его сессии завершены.",
        )
    }

    pub fn unblock_user() -> Self {
        Self::new(
            "Разблокировать пользователя?",
            "Пользователь снова получит доступ к системе.",
        )
    }

    pub fn cancel_event(film_title: &str) -> Self {
        Self::new(
            "Отменить просмотр?",
            format!("Запланированный просмотр «{film_title}» будет удалён из календаря."),
        )
        .confirm_with("Отменить просмотр")
    }

    pub fn delete_review(film_title: &str) -> Self {
        Self::new(
            "Удалить отзыв?",
            format!("Отзыв на «{film_title}» и все оценки будут удалены."),
        )
        .confirm_with("Удалить")
    }
}

/// The dialog currently attached to the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownDialog {
    pub element_id: &'static str,
    pub generation: u64,
    pub dialog: ConfirmDialog,
}

struct Slot {
    generation: u64,
    reply: Option<oneshot::Sender<bool>>,
}

pub struct ConfirmationGate {
    slot: Mutex<Slot>,
    next_generation: AtomicU64,
    shown: watch::Sender<Option<ShownDialog>>,
}

impl Default for ConfirmationGate {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfirmationGate {
    pub fn new() -> Self {
        let (shown, _) = watch::channel(None);
        Self {
            slot: Mutex::new(Slot {
                generation: 0,
                reply: None,
            }),
            next_generation: AtomicU64::new(1),
            shown,
        }
    }

    /// Attach a dialog and return the pending answer.
    pub fn open(&self, dialog: ConfirmDialog) -> Confirmation {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();

        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.reply.take().is_some() {
            // Dropping the old sender resolves its Confirmation to `false`.
            tracing::debug!(retired = slot.generation, "Retiring previous confirmation dialog");
        }
        slot.generation = generation;
        slot.reply = Some(tx);

        self.shown.send_replace(Some(ShownDialog {
            element_id: DIALOG_ID,
            generation,
            dialog,
        }));

        Confirmation { rx }
    }

    /// Show a dialog and wait for the user's choice.
    pub async fn confirm(&self, dialog: ConfirmDialog) -> bool {
        self.open(dialog).await
    }

    /// Resolve the open dialog. Returns `false` when nothing was open.
    pub fn answer(&self, confirmed: bool) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(reply) = slot.reply.take() else {
            return false;
        };
        self.shown.send_replace(None);
        // The waiting caller may have gone away; nothing to undo then.
        let _ = reply.send(confirmed);
        true
    }

    /// Close without confirming.
    pub fn dismiss(&self) -> bool {
        self.answer(false)
    }

    pub fn current(&self) -> Option<ShownDialog> {
        self.shown.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<ShownDialog>> {
        self.shown.subscribe()
    }
}

/// Pending answer from the gate. Resolves exactly once: `true` only if the
/// user confirmed this very dialog.
pub struct Confirmation {
    rx: oneshot::Receiver<bool>,
}

impl Future for Confirmation {
    type Output = bool;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<bool> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|answer| answer.unwrap_or(false))
    }
}
