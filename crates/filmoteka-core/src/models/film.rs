use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A status-change intent sent to the server for one film.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilmAction {
    Plan,
    Watch,
    Favorite,
    Unfavorite,
    Delete,
    DeleteWatched,
}

impl FilmAction {
    pub const ALL: &[FilmAction] = &[
        Self::Plan,
        Self::Watch,
        Self::Favorite,
        Self::Unfavorite,
        Self::Delete,
        Self::DeleteWatched,
    ];

    /// Value of the `action` form field and of the `data-action` attribute.
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            Self::Plan => "plan",
            Self::Watch => "watch",
            Self::Favorite => "favorite",
            Self::Unfavorite => "unfavorite",
            Self::Delete => "delete",
            Self::DeleteWatched => "delete-watched",
        }
    }

    pub fn from_wire_str(s: &str) -> Option<Self> {
        match s {
            "plan" => Some(Self::Plan),
            "watch" => Some(Self::Watch),
            "favorite" => Some(Self::Favorite),
            "unfavorite" => Some(Self::Unfavorite),
            "delete" => Some(Self::Delete),
            "delete-watched" => Some(Self::DeleteWatched),
            _ => None,
        }
    }

    /// Whether the user must confirm before the request goes out.
    ///
    /// `unfavorite` only loses data on a favorites-only view, where the card
    /// disappears with the flag.
    pub fn requires_confirmation(&self, favorites_view: bool) -> bool {
        match self {
            Self::Delete | Self::DeleteWatched => true,
            Self::Unfavorite => favorites_view,
            Self::Plan | Self::Watch | Self::Favorite => false,
        }
    }
}

impl FromStr for FilmAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire_str(s).ok_or_else(|| CoreError::UnknownAction(s.to_string()))
    }
}

impl std::fmt::Display for FilmAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire_str())
    }
}

/// Status flags as reported by the server after a status change.
///
/// Missing flags are `false`: the response is the whole truth, not a delta.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatusFlags {
    pub watched: bool,
    pub planned: bool,
    pub favorite: bool,
    pub user_rating: Option<f32>,
}

/// One indicator above a film poster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Badge {
    Watched,
    Planned,
    Favorite,
    Rating(f32),
}

impl Badge {
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Watched => "🍿",
            Self::Planned => "📅",
            Self::Favorite => "🔥",
            Self::Rating(_) => "⭐",
        }
    }

    pub fn title(&self) -> String {
        match self {
            Self::Watched => "Просмотрено".into(),
            Self::Planned => "Запланировано".into(),
            Self::Favorite => "Любимое".into(),
            Self::Rating(r) => format!("Оценка {r:.1}"),
        }
    }
}

/// The user's relationship to one film, as last confirmed by the server.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilmCardState {
    /// External catalog id (TMDB).
    pub film_id: u64,
    /// Local database key, once the film exists locally.
    pub local_film_id: Option<i64>,
    pub is_watched: bool,
    pub is_planned: bool,
    pub is_favorite: bool,
    pub user_rating: Option<f32>,
}

impl FilmCardState {
    pub fn new(film_id: u64) -> Self {
        Self {
            film_id,
            ..Default::default()
        }
    }

    /// Replace every status field with the server's answer.
    pub fn apply(&mut self, flags: &StatusFlags) {
        self.is_watched = flags.watched;
        self.is_planned = flags.planned;
        self.is_favorite = flags.favorite;
        self.user_rating = flags.user_rating;
    }

    pub fn flags(&self) -> StatusFlags {
        StatusFlags {
            watched: self.is_watched,
            planned: self.is_planned,
            favorite: self.is_favorite,
            user_rating: self.user_rating,
        }
    }

    /// Badges to render, in display order.
    ///
    /// Watched and planned are exclusive on screen; watched wins.
    pub fn badges(&self) -> Vec<Badge> {
        let mut badges = Vec::with_capacity(4);
        if self.is_watched {
            badges.push(Badge::Watched);
        } else if self.is_planned {
            badges.push(Badge::Planned);
        }
        if self.is_favorite {
            badges.push(Badge::Favorite);
        }
        if let Some(rating) = self.user_rating {
            badges.push(Badge::Rating(rating));
        }
        badges
    }

    pub fn shows_planned(&self) -> bool {
        self.is_planned && !self.is_watched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_roundtrip() {
        for action in FilmAction::ALL {
            assert_eq!(FilmAction::from_wire_str(action.as_wire_str()), Some(*action));
        }
        assert_eq!("delete-watched".parse::<FilmAction>().unwrap(), FilmAction::DeleteWatched);
    }

    #[test]
    fn test_unknown_action_is_an_error() {
        let err = "edit-review".parse::<FilmAction>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownAction(tag) if tag == "edit-review"));
    }

    #[test]
    fn test_confirmation_policy() {
        assert!(FilmAction::Delete.requires_confirmation(false));
        assert!(FilmAction::DeleteWatched.requires_confirmation(false));
        assert!(!FilmAction::Unfavorite.requires_confirmation(false));
        assert!(FilmAction::Unfavorite.requires_confirmation(true));
        assert!(!FilmAction::Plan.requires_confirmation(true));
    }

    #[test]
    fn test_apply_replaces_every_flag() {
        let mut state = FilmCardState {
            film_id: 603,
            local_film_id: Some(7),
            is_watched: false,
            is_planned: true,
            is_favorite: true,
            user_rating: Some(8.0),
        };
        state.apply(&StatusFlags {
            watched: true,
            ..Default::default()
        });
        assert!(state.is_watched);
        assert!(!state.is_planned);
        assert!(!state.is_favorite);
        assert_eq!(state.user_rating, None);
        assert_eq!(state.local_film_id, Some(7));
    }

    #[test]
    fn test_badges_watched_hides_planned() {
        let state = FilmCardState {
            is_watched: true,
            is_planned: true,
            is_favorite: true,
            user_rating: Some(7.5),
            ..FilmCardState::new(1)
        };
        assert_eq!(
            state.badges(),
            vec![Badge::Watched, Badge::Favorite, Badge::Rating(7.5)]
        );
        assert!(!state.shows_planned());
    }

    #[test]
    fn test_rating_badge_title() {
        assert_eq!(Badge::Rating(8.0).title(), "Оценка 8.0");
    }
}
