pub mod bus;
pub mod calendar;
pub mod confirm;
pub mod grid;
pub mod library;
pub mod moderation;
pub mod navigator;
pub mod sync;
pub mod toast;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use filmoteka_api::{CsrfSource, FilmBackend, HttpBackend};
use filmoteka_core::config::AppConfig;

use bus::EventBus;
use calendar::CalendarView;
use confirm::ConfirmationGate;
use grid::{FilmCard, FilmGrid, GridKind};
use library::{ReviewEntry, ReviewList, SearchResult, SearchResults};
use moderation::UserModeration;
use navigator::Navigator;
use sync::StatusSyncController;
use toast::Notifier;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(String),
}

/// One signed-in page session: the backend plus the shared dialog, toast
/// and event surfaces every controller on the page uses.
pub struct Session<B, N> {
    config: AppConfig,
    backend: Arc<B>,
    navigator: Arc<N>,
    gate: Arc<ConfirmationGate>,
    notifier: Notifier,
    bus: EventBus,
}

impl<N: Navigator + 'static> Session<HttpBackend, N> {
    /// Connect to the configured server.
    ///
    /// `page_html`, when given, is scanned for an embedded CSRF form field;
    /// otherwise the token is read from the session cookie.
    pub fn connect(
        config: AppConfig,
        cookies: Option<String>,
        page_html: Option<&str>,
        navigator: N,
    ) -> Result<Self, RuntimeError> {
        let csrf = match page_html {
            Some(html) => CsrfSource::from_form_html(html),
            None => CsrfSource::Cookie(config.server.csrf_cookie.clone()),
        };
        let mut backend = HttpBackend::new(&config.server.base_url, csrf)
            .map_err(|e| RuntimeError::Config(e.to_string()))?;
        if let Some(cookies) = cookies {
            backend = backend.with_cookies(cookies);
        }
        tracing::debug!(base_url = %config.server.base_url, "Session connected");
        Ok(Self::new(config, backend, navigator))
    }
}

impl<B: FilmBackend, N: Navigator + 'static> Session<B, N> {
    pub fn new(config: AppConfig, backend: B, navigator: N) -> Self {
        let notifier = Notifier::from_config(&config.ui, config.palette.clone());
        Self {
            config,
            backend: Arc::new(backend),
            navigator: Arc::new(navigator),
            gate: Arc::new(ConfirmationGate::new()),
            notifier,
            bus: EventBus::default(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn gate(&self) -> Arc<ConfirmationGate> {
        Arc::clone(&self.gate)
    }

    pub fn notifier(&self) -> Notifier {
        self.notifier.clone()
    }

    pub fn bus(&self) -> EventBus {
        self.bus.clone()
    }

    pub fn film_grid(&self, kind: GridKind, cards: Vec<FilmCard>) -> StatusSyncController<B, N> {
        StatusSyncController::new(
            Arc::clone(&self.backend),
            Arc::clone(&self.navigator),
            Arc::clone(&self.gate),
            self.notifier.clone(),
            FilmGrid::new(kind, cards),
        )
        .with_favorite_short_circuit(self.config.ui.favorite_short_circuit)
    }

    pub fn calendar(&self) -> CalendarView<B, N> {
        CalendarView::new(
            Arc::clone(&self.backend),
            Arc::clone(&self.navigator),
            Arc::clone(&self.gate),
            self.notifier.clone(),
            self.bus.clone(),
            self.config.login_url(),
            self.config.ui.calendar_page_size,
        )
    }

    pub fn search_results(&self, results: Vec<SearchResult>) -> SearchResults<B> {
        SearchResults::new(Arc::clone(&self.backend), self.notifier.clone(), results)
    }

    pub fn reviews(&self, entries: Vec<ReviewEntry>) -> ReviewList<B> {
        ReviewList::new(
            Arc::clone(&self.backend),
            Arc::clone(&self.gate),
            self.notifier.clone(),
            entries,
        )
    }

    pub fn moderation(&self) -> UserModeration<B, N> {
        UserModeration::new(
            Arc::clone(&self.backend),
            Arc::clone(&self.navigator),
            Arc::clone(&self.gate),
            self.notifier.clone(),
            self.config.ui.reload_delay(),
        )
    }
}
