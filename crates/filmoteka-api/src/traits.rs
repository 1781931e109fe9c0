//! The backend contract the client layer calls into.
//!
//! `HttpBackend` talks to the real server; controllers are generic over this
//! trait so they can run against a scripted backend in tests.

use std::future::Future;

use filmoteka_core::models::{CalendarTab, FilmAction, NewPlannedEvent, PlannedEvent};

use crate::error::ApiError;
use crate::types::{AddFilmResponse, Page, StatusResponse};

/// How a film is identified in a status-change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilmRef {
    /// External catalog id, sent as `tmdb_id`.
    Tmdb(u64),
    /// Local database key, sent as `film_id`.
    Local(i64),
}

impl FilmRef {
    pub fn form_field(&self) -> (&'static str, String) {
        match self {
            Self::Tmdb(id) => ("tmdb_id", id.to_string()),
            Self::Local(id) => ("film_id", id.to_string()),
        }
    }
}

pub trait FilmBackend: Send + Sync {
    /// Add a catalog film to the user's library.
    fn add_film(
        &self,
        tmdb_id: u64,
    ) -> impl Future<Output = Result<AddFilmResponse, ApiError>> + Send;

    /// Send one status-change action. Returns the raw response, including
    /// `status: "error"` bodies.
    fn update_status(
        &self,
        film: FilmRef,
        action: FilmAction,
    ) -> impl Future<Output = Result<StatusResponse, ApiError>> + Send;

    /// Remove a film (and its review) from the library.
    fn delete_film(&self, tmdb_id: u64) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn delete_review(&self, review_id: i64) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// One page of planned events for a calendar tab.
    fn list_events(
        &self,
        tab: CalendarTab,
        page: u32,
    ) -> impl Future<Output = Result<Page<PlannedEvent>, ApiError>> + Send;

    fn create_event(
        &self,
        event: &NewPlannedEvent,
    ) -> impl Future<Output = Result<PlannedEvent, ApiError>> + Send;

    fn delete_event(&self, event_id: i64) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Block (`true`) or unblock a user from the manager panel.
    fn set_user_blocked(
        &self,
        user_id: i64,
        blocked: bool,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}
