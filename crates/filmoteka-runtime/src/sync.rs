//! Film card status synchronization.
//!
//! A click on a card control becomes one request. The server's answer is
//! authoritative: on success the card's whole badge set is rebuilt from it,
//! on failure the card is left exactly as it was.

use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};

use filmoteka_api::types::{StatusKind, StatusResponse};
use filmoteka_api::{ApiError, FilmBackend, FilmRef};
use filmoteka_core::models::{FilmAction, NoticeKind};
use filmoteka_core::reconcile::{success_notice, ControlSlot};

use crate::bus::AppEvent;
use crate::confirm::{ConfirmDialog, ConfirmationGate};
use crate::grid::{FilmGrid, GridKind};
use crate::navigator::{Navigation, Navigator};
use crate::toast::Notifier;

/// How one gesture on a card ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Badges rebuilt from the server's answer.
    Updated,
    /// The card left the grid.
    Removed,
    /// The server asked for a page change instead.
    Redirected(String),
    /// Answered locally, no request sent.
    ShortCircuited,
    /// The user declined the confirmation.
    Declined,
    /// Unknown tag, unknown card, or a control already busy.
    Ignored,
    Failed(String),
}

/// What the server said, reduced to what the card needs.
enum Reply {
    Status(StatusResponse),
    Deleted,
}

pub struct StatusSyncController<B, N> {
    backend: Arc<B>,
    navigator: Arc<N>,
    gate: Arc<ConfirmationGate>,
    notifier: Notifier,
    grid: Arc<RwLock<FilmGrid>>,
    favorite_short_circuit: bool,
}

impl<B: FilmBackend, N: Navigator> StatusSyncController<B, N> {
    pub fn new(
        backend: Arc<B>,
        navigator: Arc<N>,
        gate: Arc<ConfirmationGate>,
        notifier: Notifier,
        grid: FilmGrid,
    ) -> Self {
        Self {
            backend,
            navigator,
            gate,
            notifier,
            grid: Arc::new(RwLock::new(grid)),
            favorite_short_circuit: false,
        }
    }

    /// Answer `favorite` on an already-favorite card without the server.
    pub fn with_favorite_short_circuit(mut self, enabled: bool) -> Self {
        self.favorite_short_circuit = enabled;
        self
    }

    /// Shared handle to the grid this controller reconciles.
    pub fn grid(&self) -> Arc<RwLock<FilmGrid>> {
        Arc::clone(&self.grid)
    }

    /// Route a click by its action tag (the control's `data-action`).
    pub async fn dispatch(&self, film_id: u64, tag: &str) -> SyncOutcome {
        match tag.parse::<FilmAction>() {
            Ok(action) => self.handle(film_id, action).await,
            Err(e) => {
                tracing::warn!(film_id, error = %e, "Ignoring click");
                SyncOutcome::Ignored
            }
        }
    }

    #[tracing::instrument(name = "film_action", skip(self, action), fields(action = %action))]
    pub async fn handle(&self, film_id: u64, action: FilmAction) -> SyncOutcome {
        let slot = ControlSlot::of(action);

        let (title, kind) = {
            let grid = self.grid.read().await;
            let Some(card) = grid.card(film_id) else {
                tracing::warn!("No card for film");
                return SyncOutcome::Ignored;
            };
            if card.control(slot).is_some_and(|c| c.disabled) {
                tracing::debug!("Control busy, ignoring click");
                return SyncOutcome::Ignored;
            }

            if action == FilmAction::Plan && card.state.shows_planned() {
                self.notifier
                    .notify("📅 Фильм уже запланирован", NoticeKind::Info);
                return SyncOutcome::ShortCircuited;
            }
            if action == FilmAction::Favorite
                && self.favorite_short_circuit
                && card.state.is_favorite
            {
                self.notifier.notify("🔥 Фильм уже в любимом", NoticeKind::Info);
                return SyncOutcome::ShortCircuited;
            }

            (card.title.clone(), grid.kind())
        };

        if action.requires_confirmation(kind == GridKind::Favorites) {
            if let Some(dialog) = ConfirmDialog::for_action(action, &title) {
                if !self.gate.confirm(dialog).await {
                    tracing::debug!("Confirmation declined");
                    return SyncOutcome::Declined;
                }
            }
        }

        let original_label = {
            let mut grid = self.grid.write().await;
            match grid.card_mut(film_id).and_then(|c| c.begin_pending(slot)) {
                Some(label) => label,
                None => return SyncOutcome::Ignored,
            }
        };

        let reply = match action {
            FilmAction::Delete => self.backend.delete_film(film_id).await.map(|()| Reply::Deleted),
            _ => self
                .backend
                .update_status(FilmRef::Tmdb(film_id), action)
                .await
                .and_then(|resp| match resp.status {
                    StatusKind::Error => Err(ApiError::Rejected(
                        resp.message.unwrap_or_else(|| "Неизвестная ошибка".into()),
                    )),
                    StatusKind::Success | StatusKind::Redirect => Ok(Reply::Status(resp)),
                }),
        };

        match reply {
            Ok(reply) => self.reconcile(film_id, action, slot, original_label, reply).await,
            Err(e) => {
                tracing::error!(error = %e, "Status update failed");
                if let Some(card) = self.grid.write().await.card_mut(film_id) {
                    card.end_pending(slot, original_label);
                }
                let message = e.user_message();
                self.notifier.error(format!("❌ Ошибка: {message}"));
                SyncOutcome::Failed(message)
            }
        }
    }

    async fn reconcile(
        &self,
        film_id: u64,
        action: FilmAction,
        slot: ControlSlot,
        original_label: String,
        reply: Reply,
    ) -> SyncOutcome {
        let resp = match reply {
            Reply::Deleted => {
                self.grid.write().await.remove(film_id);
                let (kind, text) = success_notice(action);
                self.notifier.notify(text, kind);
                return SyncOutcome::Removed;
            }
            Reply::Status(resp) => resp,
        };

        if resp.status == StatusKind::Redirect {
            if let Some(card) = self.grid.write().await.card_mut(film_id) {
                card.end_pending(slot, original_label);
            }
            return match resp.url {
                Some(url) => {
                    tracing::debug!(%url, "Server redirected");
                    self.navigator.navigate(Navigation::Goto(url.clone()));
                    SyncOutcome::Redirected(url)
                }
                None => {
                    self.notifier.error("❌ Ошибка: нет адреса перехода");
                    SyncOutcome::Failed("missing redirect url".into())
                }
            };
        }

        let flags = resp.flags();
        let (kind, default_text) = success_notice(action);
        let text = resp.message.unwrap_or_else(|| default_text.to_string());

        let outcome = {
            let mut grid = self.grid.write().await;
            let leaves_view = resp.removed
                || (grid.kind() == GridKind::Favorites && !flags.favorite);
            if leaves_view {
                grid.remove(film_id);
                SyncOutcome::Removed
            } else if let Some(card) = grid.card_mut(film_id) {
                card.state.apply(&flags);
                card.render();
                SyncOutcome::Updated
            } else {
                // Removed by another gesture while this one was in flight.
                SyncOutcome::Ignored
            }
        };

        self.notifier.notify(text, kind);
        outcome
    }

    /// React to changes made in other views.
    pub async fn apply_event(&self, event: &AppEvent) {
        let (film_tmdb_id, film_id, planned) = match *event {
            AppEvent::CalendarEventDeleted {
                film_tmdb_id,
                film_id,
                ..
            } => (film_tmdb_id, film_id, false),
            AppEvent::CalendarEventCreated {
                film_tmdb_id,
                film_id,
                ..
            } => (film_tmdb_id, film_id, true),
        };

        let mut grid = self.grid.write().await;
        let target = match film_tmdb_id {
            Some(tmdb) => grid.card_mut(tmdb),
            None => grid.card_mut_by_local(film_id),
        };
        if let Some(card) = target {
            if card.state.is_planned != planned {
                card.state.is_planned = planned;
                card.render();
            }
        }
    }

    /// Keep applying bus events until the bus closes.
    pub async fn follow(&self, mut events: broadcast::Receiver<AppEvent>) {
        loop {
            match events.recv().await {
                Ok(event) => self.apply_event(&event).await,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Film grid lagged behind app events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}
