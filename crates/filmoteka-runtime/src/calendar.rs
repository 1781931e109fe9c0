//! Calendar of planned viewings.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::sync::RwLock;

use filmoteka_api::{ApiError, FilmBackend};
use filmoteka_core::calendar::{format_date, group_by_date, Pagination};
use filmoteka_core::models::{CalendarTab, NewPlannedEvent, NoticeKind, PlannedEvent};

use crate::bus::{AppEvent, EventBus};
use crate::confirm::{ConfirmDialog, ConfirmationGate};
use crate::navigator::{Navigation, Navigator};
use crate::toast::Notifier;

/// Events of one date, with the heading shown above them.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedGroup {
    pub date: NaiveDate,
    pub label: String,
    pub events: Vec<PlannedEvent>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CalendarBody {
    Loading,
    Empty,
    Groups(Vec<RenderedGroup>),
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarState {
    pub tab: CalendarTab,
    pub pagination: Pagination,
    pub body: CalendarBody,
}

impl Default for CalendarState {
    fn default() -> Self {
        Self {
            tab: CalendarTab::Active,
            pagination: Pagination {
                current_page: 1,
                total_pages: 1,
            },
            body: CalendarBody::Loading,
        }
    }
}

impl CalendarState {
    fn find_event(&self, event_id: i64) -> Option<&PlannedEvent> {
        match &self.body {
            CalendarBody::Groups(groups) => groups
                .iter()
                .flat_map(|g| g.events.iter())
                .find(|e| e.event_id == event_id),
            _ => None,
        }
    }

    /// Drop one event, and its date group if that was the last entry.
    fn remove_event(&mut self, event_id: i64) -> Option<PlannedEvent> {
        let CalendarBody::Groups(groups) = &mut self.body else {
            return None;
        };
        let (gi, ei) = groups.iter().enumerate().find_map(|(gi, g)| {
            g.events
                .iter()
                .position(|e| e.event_id == event_id)
                .map(|ei| (gi, ei))
        })?;
        let removed = groups[gi].events.remove(ei);
        if groups[gi].events.is_empty() {
            groups.remove(gi);
        }
        if groups.is_empty() {
            self.body = CalendarBody::Empty;
        }
        Some(removed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// A newer load started while this one was in flight.
    Superseded,
    /// No page in that direction.
    Unchanged,
    /// 401/403: the user was sent to the login page.
    LoginRequired,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled,
    Declined,
    Ignored,
    Failed(String),
}

/// The "plan a viewing" form.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanDialog {
    pub film: i64,
    pub film_tmdb_id: Option<u64>,
    pub film_title: String,
    pub planned_date: Option<NaiveDate>,
    pub note: String,
    pub open: bool,
    /// Message shown inside the form.
    pub error: Option<String>,
}

impl PlanDialog {
    pub fn open(film: i64, film_tmdb_id: Option<u64>, film_title: impl Into<String>) -> Self {
        Self {
            film,
            film_tmdb_id,
            film_title: film_title.into(),
            planned_date: None,
            note: String::new(),
            open: true,
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
    Created(PlannedEvent),
    /// Rejected by the client or the server; the form stays open.
    Invalid(String),
    Failed(String),
}

pub struct CalendarView<B, N> {
    backend: Arc<B>,
    navigator: Arc<N>,
    gate: Arc<ConfirmationGate>,
    notifier: Notifier,
    bus: EventBus,
    login_url: String,
    page_size: u32,
    today: fn() -> NaiveDate,
    generation: AtomicU64,
    state: RwLock<CalendarState>,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl<B: FilmBackend, N: Navigator> CalendarView<B, N> {
    pub fn new(
        backend: Arc<B>,
        navigator: Arc<N>,
        gate: Arc<ConfirmationGate>,
        notifier: Notifier,
        bus: EventBus,
        login_url: impl Into<String>,
        page_size: u32,
    ) -> Self {
        Self {
            backend,
            navigator,
            gate,
            notifier,
            bus,
            login_url: login_url.into(),
            page_size,
            today: local_today,
            generation: AtomicU64::new(0),
            state: RwLock::new(CalendarState::default()),
        }
    }

    /// Replace the clock used for "today" labels and past-date checks.
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub async fn snapshot(&self) -> CalendarState {
        self.state.read().await.clone()
    }

    /// Fetch one page of the current tab and render it.
    ///
    /// Only the latest load may render: an answer that arrives after a newer
    /// load started is dropped.
    pub async fn load(&self, page: u32) -> LoadOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let tab = {
            let mut state = self.state.write().await;
            state.body = CalendarBody::Loading;
            state.tab
        };
        tracing::debug!(%tab, page, "Loading calendar");

        let result = self.backend.list_events(tab, page).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(%tab, page, "Dropping superseded calendar page");
            return LoadOutcome::Superseded;
        }

        match result {
            Ok(listing) => {
                let today = (self.today)();
                let mut state = self.state.write().await;
                state.pagination = Pagination::from_links(
                    listing.count,
                    listing.next.as_deref(),
                    listing.previous.as_deref(),
                    self.page_size,
                );
                state.body = if listing.results.is_empty() {
                    CalendarBody::Empty
                } else {
                    CalendarBody::Groups(
                        group_by_date(listing.results)
                            .into_iter()
                            .map(|g| RenderedGroup {
                                label: format_date(g.date, today),
                                date: g.date,
                                events: g.events,
                            })
                            .collect(),
                    )
                };
                LoadOutcome::Loaded
            }
            Err(e) if e.is_auth() => {
                tracing::info!("Calendar requires login, redirecting");
                self.navigator
                    .navigate(Navigation::Goto(self.login_url.clone()));
                LoadOutcome::LoginRequired
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load calendar");
                self.state.write().await.body =
                    CalendarBody::Error("Не удалось загрузить запланированные просмотры".into());
                LoadOutcome::Failed(e.user_message())
            }
        }
    }

    /// Switch between active and archive. Always starts again at page 1.
    pub async fn switch_tab(&self, tab: CalendarTab) -> LoadOutcome {
        self.state.write().await.tab = tab;
        self.load(1).await
    }

    pub async fn next_page(&self) -> LoadOutcome {
        let pagination = self.state.read().await.pagination;
        if !pagination.has_next() {
            return LoadOutcome::Unchanged;
        }
        self.load(pagination.current_page + 1).await
    }

    pub async fn previous_page(&self) -> LoadOutcome {
        let pagination = self.state.read().await.pagination;
        if !pagination.has_previous() {
            return LoadOutcome::Unchanged;
        }
        self.load(pagination.current_page - 1).await
    }

    /// Cancel a planned viewing after confirmation.
    pub async fn cancel_event(&self, event_id: i64) -> CancelOutcome {
        let Some(event) = self.state.read().await.find_event(event_id).cloned() else {
            tracing::warn!(event_id, "No such calendar event on screen");
            return CancelOutcome::Ignored;
        };

        if !self
            .gate
            .confirm(ConfirmDialog::cancel_event(&event.film_title))
            .await
        {
            return CancelOutcome::Declined;
        }

        if let Err(e) = self.backend.delete_event(event_id).await {
            tracing::error!(event_id, error = %e, "Failed to cancel calendar event");
            let message = e.user_message();
            self.notifier.error(format!("❌ Ошибка: {message}"));
            return CancelOutcome::Failed(message);
        }

        if self.state.write().await.remove_event(event_id).is_none() {
            tracing::debug!(event_id, "Cancelled event no longer on screen");
        }
        self.bus.publish(AppEvent::CalendarEventDeleted {
            event_id,
            film_id: event.film,
            film_tmdb_id: event.film_tmdb_id,
        });
        self.notifier.info("Просмотр отменён");
        CancelOutcome::Cancelled
    }

    /// Submit the plan form. The form closes only when the server accepts it.
    pub async fn submit_plan(&self, dialog: &mut PlanDialog) -> PlanOutcome {
        let Some(planned_date) = dialog.planned_date else {
            return reject(dialog, "Укажите дату просмотра".into());
        };
        let request = NewPlannedEvent {
            film: dialog.film,
            planned_date,
            note: dialog.note.trim().to_string(),
        };
        if let Err(message) = request.validate((self.today)()) {
            return reject(dialog, message.into());
        }

        match self.backend.create_event(&request).await {
            Ok(event) => {
                dialog.open = false;
                dialog.error = None;
                self.notifier
                    .notify(format!("📅 «{}» запланирован", dialog.film_title), NoticeKind::Plan);
                self.bus.publish(AppEvent::CalendarEventCreated {
                    event_id: event.event_id,
                    film_id: event.film,
                    film_tmdb_id: event.film_tmdb_id.or(dialog.film_tmdb_id),
                });
                let page = self.state.read().await.pagination.current_page;
                self.load(page).await;
                PlanOutcome::Created(event)
            }
            Err(ApiError::Validation(message)) => {
                self.notifier.error(message.clone());
                reject(dialog, message)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to plan viewing");
                let message = e.user_message();
                self.notifier.error(format!("❌ Ошибка: {message}"));
                PlanOutcome::Failed(message)
            }
        }
    }
}

fn reject(dialog: &mut PlanDialog, message: String) -> PlanOutcome {
    dialog.error = Some(message.clone());
    PlanOutcome::Invalid(message)
}
