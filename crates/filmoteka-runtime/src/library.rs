//! Search results "add to library" buttons and the review list.

use std::sync::Arc;

use tokio::sync::RwLock;

use filmoteka_api::types::AddStatus;
use filmoteka_api::{ApiError, FilmBackend};

use crate::confirm::{ConfirmDialog, ConfirmationGate};
use crate::toast::Notifier;

const BUSY_LABEL: &str = "Добавляем...";

/// What replaces the add button once the film is in the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryBadge {
    Added,
    AlreadyThere,
}

impl LibraryBadge {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Added => "В моей библиотеке",
            Self::AlreadyThere => "Уже в библиотеке",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddControl {
    Button { label: String, disabled: bool },
    Badge(LibraryBadge),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub tmdb_id: u64,
    pub title: String,
    pub control: AddControl,
}

impl SearchResult {
    pub fn new(tmdb_id: u64, title: impl Into<String>) -> Self {
        Self {
            tmdb_id,
            title: title.into(),
            control: AddControl::Button {
                label: "Добавить".into(),
                disabled: false,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyInLibrary,
    Ignored,
    Failed(String),
}

pub struct SearchResults<B> {
    backend: Arc<B>,
    notifier: Notifier,
    results: RwLock<Vec<SearchResult>>,
}

impl<B: FilmBackend> SearchResults<B> {
    pub fn new(backend: Arc<B>, notifier: Notifier, results: Vec<SearchResult>) -> Self {
        Self {
            backend,
            notifier,
            results: RwLock::new(results),
        }
    }

    pub async fn results(&self) -> Vec<SearchResult> {
        self.results.read().await.clone()
    }

    pub async fn add_film(&self, tmdb_id: u64) -> AddOutcome {
        let original = {
            let mut results = self.results.write().await;
            let Some(result) = results.iter_mut().find(|r| r.tmdb_id == tmdb_id) else {
                return AddOutcome::Ignored;
            };
            match &mut result.control {
                AddControl::Button { label, disabled } if !*disabled => {
                    *disabled = true;
                    std::mem::replace(label, BUSY_LABEL.into())
                }
                _ => return AddOutcome::Ignored,
            }
        };

        let reply = self.backend.add_film(tmdb_id).await.and_then(|resp| match resp.status {
            AddStatus::Added => Ok(LibraryBadge::Added),
            AddStatus::Exists => Ok(LibraryBadge::AlreadyThere),
            AddStatus::Error => Err(ApiError::Rejected(
                resp.message.unwrap_or_else(|| "Неизвестная ошибка".into()),
            )),
        });

        let mut results = self.results.write().await;
        let slot = results.iter_mut().find(|r| r.tmdb_id == tmdb_id);
        match reply {
            Ok(badge) => {
                if let Some(result) = slot {
                    result.control = AddControl::Badge(badge);
                }
                match badge {
                    LibraryBadge::Added => {
                        self.notifier.success("✅ Фильм добавлен!");
                        AddOutcome::Added
                    }
                    LibraryBadge::AlreadyThere => {
                        self.notifier.info("ℹ️ Фильм уже есть");
                        AddOutcome::AlreadyInLibrary
                    }
                }
            }
            Err(e) => {
                tracing::error!(tmdb_id, error = %e, "Failed to add film");
                if let Some(result) = slot {
                    result.control = AddControl::Button {
                        label: original,
                        disabled: false,
                    };
                }
                let message = e.user_message();
                self.notifier.error(format!("❌ Ошибка: {message}"));
                AddOutcome::Failed(message)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEntry {
    pub review_id: i64,
    pub film_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    Deleted,
    Declined,
    Ignored,
    Failed(String),
}

pub struct ReviewList<B> {
    backend: Arc<B>,
    gate: Arc<ConfirmationGate>,
    notifier: Notifier,
    entries: RwLock<Vec<ReviewEntry>>,
}

impl<B: FilmBackend> ReviewList<B> {
    pub fn new(
        backend: Arc<B>,
        gate: Arc<ConfirmationGate>,
        notifier: Notifier,
        entries: Vec<ReviewEntry>,
    ) -> Self {
        Self {
            backend,
            gate,
            notifier,
            entries: RwLock::new(entries),
        }
    }

    pub async fn entries(&self) -> Vec<ReviewEntry> {
        self.entries.read().await.clone()
    }

    pub async fn delete_review(&self, review_id: i64) -> ReviewOutcome {
        let title = self
            .entries
            .read()
            .await
            .iter()
            .find(|e| e.review_id == review_id)
            .map(|e| e.film_title.clone());
        let Some(title) = title else {
            return ReviewOutcome::Ignored;
        };

        if !self.gate.confirm(ConfirmDialog::delete_review(&title)).await {
            return ReviewOutcome::Declined;
        }

        match self.backend.delete_review(review_id).await {
            Ok(()) => {
                self.entries
                    .write()
                    .await
                    .retain(|e| e.review_id != review_id);
                self.notifier.success("🗑️ Отзыв удалён");
                ReviewOutcome::Deleted
            }
            Err(e) => {
                tracing::error!(review_id, error = %e, "Failed to delete review");
                let message = e.user_message();
                self.notifier.error(format!("❌ Ошибка: {message}"));
                ReviewOutcome::Failed(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filmoteka_api::types::AddFilmResponse;
    use filmoteka_core::config::Palette;
    use filmoteka_core::models::NoticeKind;
    use std::time::Duration;

    use crate::testing::{Call, ScriptedBackend};

    fn notifier() -> Notifier {
        Notifier::new(Palette::default(), Duration::from_secs(3), Duration::from_millis(300))
    }

    fn search(backend: &Arc<ScriptedBackend>, n: &Notifier) -> SearchResults<ScriptedBackend> {
        SearchResults::new(
            Arc::clone(backend),
            n.clone(),
            vec![SearchResult::new(603, "Матрица"), SearchResult::new(604, "Матрица 2")],
        )
    }

    #[tokio::test]
    async fn test_add_film_replaces_button_with_badge() {
        let backend = Arc::new(ScriptedBackend::new());
        let n = notifier();
        let results = search(&backend, &n);
        backend.push_add(Ok(AddFilmResponse {
            status: AddStatus::Added,
            message: None,
        }));

        assert_eq!(results.add_film(603).await, AddOutcome::Added);
        let list = results.results().await;
        assert_eq!(list[0].control, AddControl::Badge(LibraryBadge::Added));
        assert_eq!(list[1], SearchResult::new(604, "Матрица 2"));
        assert_eq!(n.visible()[0].kind, NoticeKind::Success);
        assert_eq!(backend.calls(), vec![Call::AddFilm(603)]);
    }

    #[tokio::test]
    async fn test_add_existing_film() {
        let backend = Arc::new(ScriptedBackend::new());
        let n = notifier();
        let results = search(&backend, &n);
        backend.push_add(Ok(AddFilmResponse {
            status: AddStatus::Exists,
            message: None,
        }));

        assert_eq!(results.add_film(603).await, AddOutcome::AlreadyInLibrary);
        assert_eq!(
            results.results().await[0].control,
            AddControl::Badge(LibraryBadge::AlreadyThere)
        );
        assert_eq!(LibraryBadge::AlreadyThere.label(), "Уже в библиотеке");
    }

    #[tokio::test]
    async fn test_add_failure_restores_button() {
        let backend = Arc::new(ScriptedBackend::new());
        let n = notifier();
        let results = search(&backend, &n);
        let before = results.results().await;
        backend.push_add(Ok(AddFilmResponse {
            status: AddStatus::Error,
            message: Some("Фильм не найден в TMDB".into()),
        }));

        assert_eq!(
            results.add_film(603).await,
            AddOutcome::Failed("Фильм не найден в TMDB".into())
        );
        assert_eq!(results.results().await, before);
        assert_eq!(n.visible()[0].message, "❌ Ошибка: Фильм не найден в TMDB");
    }

    #[tokio::test]
    async fn test_add_after_badge_is_ignored() {
        let backend = Arc::new(ScriptedBackend::new());
        let n = notifier();
        let results = search(&backend, &n);
        backend.push_add(Ok(AddFilmResponse {
            status: AddStatus::Added,
            message: None,
        }));

        results.add_film(603).await;
        assert_eq!(results.add_film(603).await, AddOutcome::Ignored);
        assert_eq!(results.add_film(1).await, AddOutcome::Ignored);
        assert_eq!(backend.calls().len(), 1);
    }

    fn reviews(backend: &Arc<ScriptedBackend>, gate: &Arc<ConfirmationGate>, n: &Notifier) -> Arc<ReviewList<ScriptedBackend>> {
        Arc::new(ReviewList::new(
            Arc::clone(backend),
            Arc::clone(gate),
            n.clone(),
            vec![
                ReviewEntry {
                    review_id: 1,
                    film_title: "Сталкер".into(),
                },
                ReviewEntry {
                    review_id: 2,
                    film_title: "Солярис".into(),
                },
            ],
        ))
    }

    #[tokio::test]
    async fn test_delete_review_after_confirmation() {
        let backend = Arc::new(ScriptedBackend::new());
        let gate = Arc::new(ConfirmationGate::new());
        let n = notifier();
        let list = reviews(&backend, &gate, &n);
        backend.push_unit(Ok(()));
        let mut shown = gate.subscribe();

        let task = {
            let list = Arc::clone(&list);
            tokio::spawn(async move { list.delete_review(1).await })
        };
        shown.wait_for(Option::is_some).await.unwrap();
        assert!(gate.current().unwrap().dialog.message.contains("Сталкер"));
        gate.answer(true);

        assert_eq!(task.await.unwrap(), ReviewOutcome::Deleted);
        assert_eq!(backend.calls(), vec![Call::DeleteReview(1)]);
        let left = list.entries().await;
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].review_id, 2);
    }

    #[tokio::test]
    async fn test_delete_review_declined() {
        let backend = Arc::new(ScriptedBackend::new());
        let gate = Arc::new(ConfirmationGate::new());
        let n = notifier();
        let list = reviews(&backend, &gate, &n);
        let mut shown = gate.subscribe();

        let task = {
            let list = Arc::clone(&list);
            tokio::spawn(async move { list.delete_review(2).await })
        };
        shown.wait_for(Option::is_some).await.unwrap();
        gate.dismiss();

        assert_eq!(task.await.unwrap(), ReviewOutcome::Declined);
        assert!(backend.calls().is_empty());
        assert_eq!(list.entries().await.len(), 2);
        assert!(n.visible().is_empty());
    }
}
