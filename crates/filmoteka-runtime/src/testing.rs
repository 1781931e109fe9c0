//! Scripted backend and navigator for controller tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use filmoteka_api::types::{AddFilmResponse, Page, StatusKind, StatusResponse};
use filmoteka_api::{ApiError, FilmBackend, FilmRef};
use filmoteka_core::models::{CalendarTab, FilmAction, NewPlannedEvent, PlannedEvent};

use crate::navigator::{Navigation, Navigator};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    AddFilm(u64),
    UpdateStatus(FilmRef, FilmAction),
    DeleteFilm(u64),
    DeleteReview(i64),
    ListEvents(CalendarTab, u32),
    CreateEvent(NewPlannedEvent),
    DeleteEvent(i64),
    SetBlocked(i64, bool),
}

/// Answers queued per endpoint family. An empty queue answers with a 500.
#[derive(Default)]
pub struct ScriptedBackend {
    calls: Mutex<Vec<Call>>,
    add: Mutex<VecDeque<Result<AddFilmResponse, ApiError>>>,
    status: Mutex<VecDeque<Result<StatusResponse, ApiError>>>,
    pages: Mutex<VecDeque<Result<Page<PlannedEvent>, ApiError>>>,
    created: Mutex<VecDeque<Result<PlannedEvent, ApiError>>>,
    unit: Mutex<VecDeque<Result<(), ApiError>>>,
    /// When set, status updates park until notified.
    hold: Mutex<Option<Arc<Notify>>>,
    /// Parks only the next listing call.
    hold_page: Mutex<Option<Arc<Notify>>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_add(&self, r: Result<AddFilmResponse, ApiError>) -> &Self {
        self.add.lock().unwrap().push_back(r);
        self
    }

    pub fn push_status(&self, r: Result<StatusResponse, ApiError>) -> &Self {
        self.status.lock().unwrap().push_back(r);
        self
    }

    pub fn push_page(&self, r: Result<Page<PlannedEvent>, ApiError>) -> &Self {
        self.pages.lock().unwrap().push_back(r);
        self
    }

    pub fn push_created(&self, r: Result<PlannedEvent, ApiError>) -> &Self {
        self.created.lock().unwrap().push_back(r);
        self
    }

    pub fn push_unit(&self, r: Result<(), ApiError>) -> &Self {
        self.unit.lock().unwrap().push_back(r);
        self
    }

    pub fn hold_status(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.hold.lock().unwrap() = Some(Arc::clone(&notify));
        notify
    }

    pub fn hold_next_page(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.hold_page.lock().unwrap() = Some(Arc::clone(&notify));
        notify
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next<T>(queue: &Mutex<VecDeque<Result<T, ApiError>>>) -> Result<T, ApiError> {
        queue.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(ApiError::Api {
                status: 500,
                message: "unscripted call".into(),
            })
        })
    }
}

impl FilmBackend for ScriptedBackend {
    async fn add_film(&self, tmdb_id: u64) -> Result<AddFilmResponse, ApiError> {
        self.record(Call::AddFilm(tmdb_id));
        Self::next(&self.add)
    }

    async fn update_status(
        &self,
        film: FilmRef,
        action: FilmAction,
    ) -> Result<StatusResponse, ApiError> {
        self.record(Call::UpdateStatus(film, action));
        let hold = self.hold.lock().unwrap().clone();
        if let Some(notify) = hold {
            notify.notified().await;
        }
        Self::next(&self.status)
    }

    async fn delete_film(&self, tmdb_id: u64) -> Result<(), ApiError> {
        self.record(Call::DeleteFilm(tmdb_id));
        Self::next(&self.unit)
    }

    async fn delete_review(&self, review_id: i64) -> Result<(), ApiError> {
        self.record(Call::DeleteReview(review_id));
        Self::next(&self.unit)
    }

    async fn list_events(&self, tab: CalendarTab, page: u32) -> Result<Page<PlannedEvent>, ApiError> {
        self.record(Call::ListEvents(tab, page));
        let answer = Self::next(&self.pages);
        let hold = self.hold_page.lock().unwrap().take();
        if let Some(notify) = hold {
            notify.notified().await;
        }
        answer
    }

    async fn create_event(&self, event: &NewPlannedEvent) -> Result<PlannedEvent, ApiError> {
        self.record(Call::CreateEvent(event.clone()));
        Self::next(&self.created)
    }

    async fn delete_event(&self, event_id: i64) -> Result<(), ApiError> {
        self.record(Call::DeleteEvent(event_id));
        Self::next(&self.unit)
    }

    async fn set_user_blocked(&self, user_id: i64, blocked: bool) -> Result<(), ApiError> {
        self.record(Call::SetBlocked(user_id, blocked));
        Self::next(&self.unit)
    }
}

pub fn status_ok(watched: bool, planned: bool, favorite: bool) -> StatusResponse {
    StatusResponse {
        status: StatusKind::Success,
        is_watched: watched,
        is_planned: planned,
        is_favorite: favorite,
        user_rating: None,
        has_review: None,
        removed: false,
        url: None,
        message: None,
    }
}

pub fn status_redirect(url: &str) -> StatusResponse {
    StatusResponse {
        status: StatusKind::Redirect,
        url: Some(url.into()),
        ..status_ok(false, false, false)
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<Navigation>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<Navigation> {
        self.visits.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, to: Navigation) {
        self.visits.lock().unwrap().push(to);
    }
}
