//! Rules that map a confirmed card state onto its controls and feedback.
//!
//! A card carries three controls. The watch slot cycles
//! plan → watch → delete-watched as the film moves through the library, the
//! favorite slot toggles, and the delete slot never changes.

use crate::models::{FilmAction, FilmCardState, NoticeKind};

/// Label shown on a control while its request is in flight.
pub const PENDING_LABEL: &str = "...";

/// Position of a control in a card's action row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlSlot {
    Watch,
    Favorite,
    Delete,
}

impl ControlSlot {
    pub const ALL: &[ControlSlot] = &[Self::Watch, Self::Favorite, Self::Delete];

    /// Slot that carries a given action.
    pub fn of(action: FilmAction) -> Self {
        match action {
            FilmAction::Plan | FilmAction::Watch | FilmAction::DeleteWatched => Self::Watch,
            FilmAction::Favorite | FilmAction::Unfavorite => Self::Favorite,
            FilmAction::Delete => Self::Delete,
        }
    }
}

/// What a control shows and sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlFace {
    pub action: FilmAction,
    pub label: &'static str,
    pub title: &'static str,
}

pub fn face_for(slot: ControlSlot, state: &FilmCardState) -> ControlFace {
    match slot {
        ControlSlot::Watch if state.is_watched => ControlFace {
            action: FilmAction::DeleteWatched,
            label: "👁️✕",
            title: "Убрать из просмотренного",
        },
        ControlSlot::Watch if state.is_planned => ControlFace {
            action: FilmAction::Watch,
            label: "🍿",
            title: "Добавить в Просмотрено",
        },
        ControlSlot::Watch => ControlFace {
            action: FilmAction::Plan,
            label: "📅",
            title: "Запланировать",
        },
        ControlSlot::Favorite if state.is_favorite => ControlFace {
            action: FilmAction::Unfavorite,
            label: "⛔",
            title: "Убрать из Любимого",
        },
        ControlSlot::Favorite => ControlFace {
            action: FilmAction::Favorite,
            label: "🔥",
            title: "Добавить в Любимое",
        },
        ControlSlot::Delete => ControlFace {
            action: FilmAction::Delete,
            label: "🗑️",
            title: "Удалить из моих фильмов",
        },
    }
}

/// Toast shown after the server accepts an action, unless it sent its own message.
pub fn success_notice(action: FilmAction) -> (NoticeKind, &'static str) {
    match action {
        FilmAction::Plan => (NoticeKind::Plan, "📅 Фильм запланирован"),
        FilmAction::Watch => (NoticeKind::Success, "🍿 Фильм отмечен как просмотренный"),
        FilmAction::Favorite => (NoticeKind::Favorite, "🔥 Добавлено в любимое"),
        FilmAction::Unfavorite => (NoticeKind::Info, "Убрано из любимого"),
        FilmAction::Delete => (NoticeKind::Success, "🗑️ Фильм удалён"),
        FilmAction::DeleteWatched => (NoticeKind::Info, "Отзыв и оценка удалены"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_slot_cycles_with_state() {
        let mut state = FilmCardState::new(1);
        assert_eq!(face_for(ControlSlot::Watch, &state).action, FilmAction::Plan);

        state.is_planned = true;
        assert_eq!(face_for(ControlSlot::Watch, &state).action, FilmAction::Watch);

        state.is_watched = true;
        assert_eq!(
            face_for(ControlSlot::Watch, &state).action,
            FilmAction::DeleteWatched
        );
    }

    #[test]
    fn test_favorite_slot_toggles() {
        let mut state = FilmCardState::new(1);
        assert_eq!(face_for(ControlSlot::Favorite, &state).action, FilmAction::Favorite);
        state.is_favorite = true;
        assert_eq!(face_for(ControlSlot::Favorite, &state).action, FilmAction::Unfavorite);
    }

    #[test]
    fn test_slot_of_every_action_shows_it_in_some_state() {
        for action in FilmAction::ALL {
            let slot = ControlSlot::of(*action);
            let states = [
                FilmCardState::new(1),
                FilmCardState {
                    is_planned: true,
                    ..FilmCardState::new(1)
                },
                FilmCardState {
                    is_watched: true,
                    is_favorite: true,
                    ..FilmCardState::new(1)
                },
            ];
            assert!(
                states.iter().any(|s| face_for(slot, s).action == *action),
                "{action} never shown"
            );
        }
    }

    #[test]
    fn test_success_notice_kinds() {
        assert_eq!(success_notice(FilmAction::Plan).0, NoticeKind::Plan);
        assert_eq!(success_notice(FilmAction::Favorite).0, NoticeKind::Favorite);
    }
}
