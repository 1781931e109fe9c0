//! View model of a film card grid.

use filmoteka_core::models::{Badge, FilmAction, FilmCardState};
use filmoteka_core::reconcile::{face_for, ControlSlot, PENDING_LABEL};

/// Which listing a grid shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridKind {
    #[default]
    Library,
    /// Only favorites: a card leaves the grid once it stops being one.
    Favorites,
}

/// One button in a card's action row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub slot: ControlSlot,
    pub action: FilmAction,
    pub label: String,
    pub title: String,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilmCard {
    pub title: String,
    pub state: FilmCardState,
    pub badges: Vec<Badge>,
    pub controls: Vec<Control>,
}

impl FilmCard {
    /// Render a card from a server-supplied snapshot.
    pub fn new(title: impl Into<String>, state: FilmCardState) -> Self {
        let mut card = Self {
            title: title.into(),
            state,
            badges: Vec::new(),
            controls: Vec::new(),
        };
        card.render();
        card
    }

    pub fn film_id(&self) -> u64 {
        self.state.film_id
    }

    /// Rebuild badges and controls from `state`. Clears pending markers.
    pub fn render(&mut self) {
        self.badges = self.state.badges();
        self.controls = ControlSlot::ALL
            .iter()
            .map(|&slot| {
                let face = face_for(slot, &self.state);
                Control {
                    slot,
                    action: face.action,
                    label: face.label.to_string(),
                    title: face.title.to_string(),
                    disabled: false,
                }
            })
            .collect();
    }

    pub fn control(&self, slot: ControlSlot) -> Option<&Control> {
        self.controls.iter().find(|c| c.slot == slot)
    }

    /// Disable a control and show the interim label. Returns the label it
    /// had, or `None` if the control is already busy.
    pub(crate) fn begin_pending(&mut self, slot: ControlSlot) -> Option<String> {
        let control = self.controls.iter_mut().find(|c| c.slot == slot)?;
        if control.disabled {
            return None;
        }
        control.disabled = true;
        Some(std::mem::replace(&mut control.label, PENDING_LABEL.to_string()))
    }

    /// Put a control back the way it was before the request.
    pub(crate) fn end_pending(&mut self, slot: ControlSlot, original_label: String) {
        if let Some(control) = self.controls.iter_mut().find(|c| c.slot == slot) {
            control.disabled = false;
            control.label = original_label;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilmGrid {
    kind: GridKind,
    cards: Vec<FilmCard>,
}

impl FilmGrid {
    pub fn new(kind: GridKind, cards: Vec<FilmCard>) -> Self {
        Self { kind, cards }
    }

    pub fn kind(&self) -> GridKind {
        self.kind
    }

    pub fn cards(&self) -> &[FilmCard] {
        &self.cards
    }

    pub fn card(&self, film_id: u64) -> Option<&FilmCard> {
        self.cards.iter().find(|c| c.film_id() == film_id)
    }

    pub fn card_mut(&mut self, film_id: u64) -> Option<&mut FilmCard> {
        self.cards.iter_mut().find(|c| c.film_id() == film_id)
    }

    /// Find a card by the server's own film id rather than the TMDB id.
    pub fn card_mut_by_local(&mut self, local_film_id: i64) -> Option<&mut FilmCard> {
        self.cards
            .iter_mut()
            .find(|c| c.state.local_film_id == Some(local_film_id))
    }

    /// Add a card at the end, replacing any card for the same film.
    pub fn push(&mut self, card: FilmCard) {
        match self.card_mut(card.film_id()) {
            Some(existing) => *existing = card,
            None => self.cards.push(card),
        }
    }

    pub fn remove(&mut self, film_id: u64) -> Option<FilmCard> {
        let idx = self.cards.iter().position(|c| c.film_id() == film_id)?;
        Some(self.cards.remove(idx))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
