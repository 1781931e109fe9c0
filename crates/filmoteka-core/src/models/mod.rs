mod calendar;
mod film;
mod notice;

pub use calendar::{CalendarTab, NewPlannedEvent, PlannedEvent};
pub use film::{Badge, FilmAction, FilmCardState, StatusFlags};
pub use notice::NoticeKind;
