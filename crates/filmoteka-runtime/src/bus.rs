//! Cross-view broadcast, so one view can react to changes made in another.

use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A planned viewing was cancelled from the calendar.
    CalendarEventDeleted {
        event_id: i64,
        film_id: i64,
        film_tmdb_id: Option<u64>,
    },
    /// A viewing was planned from the plan dialog.
    CalendarEventCreated {
        event_id: i64,
        film_id: i64,
        film_tmdb_id: Option<u64>,
    },
}

#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AppEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish to every current listener. Returns how many received it.
    pub fn publish(&self, event: AppEvent) -> usize {
        tracing::debug!(?event, "Publishing app event");
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }
}
