//! Wiring of the form, the repository and the renderer.
//!
//! Every user event follows the same order: mutate the repository (which
//! writes through to the store), then redraw from the full collection.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::error::{RepositoryError, StoreError};
use crate::model::Card;
use crate::render::{BoardView, DeleteTrigger, render};
use crate::repository::{CardRepository, ClearOutcome, Confirm};
use crate::store::{CardStore, Slot};
use crate::validate::{FormInput, Validation};

#[derive(Debug, Error)]
pub enum SubmitError {
    /// Nothing was added; show the per-field messages.
    #[error("submission rejected: {0}")]
    Invalid(Validation),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug)]
pub struct Board<S: Slot> {
    repo: CardRepository<S>,
}

impl<S: Slot> Board<S> {
    pub fn open(store: CardStore<S>) -> Self {
        Self { repo: CardRepository::open(store) }
    }

    pub fn repository(&self) -> &CardRepository<S> {
        &self.repo
    }

    pub fn cards(&self) -> &[Card] {
        self.repo.cards()
    }

    /// Validate the form and, if it passes, add a new card.
    ///
    /// On [`SubmitError::Repository`] with a store failure the card is still
    /// on the board for this session.
    pub fn submit(&mut self, input: &FormInput, now: DateTime<Utc>) -> Result<Card, SubmitError> {
        let card = input.to_card(now).map_err(SubmitError::Invalid)?;
        self.repo.add(card.clone())?;
        Ok(card)
    }

    pub fn delete(&mut self, id: &str) -> Result<Option<Card>, StoreError> {
        self.repo.delete_by_id(id)
    }

    pub fn clear(&mut self, confirm: &mut dyn Confirm) -> Result<ClearOutcome, StoreError> {
        self.repo.clear(confirm)
    }

    pub fn render(&self, now: DateTime<Utc>) -> BoardView {
        render(self.repo.cards(), now)
    }

    /// Periodic redraw for relative times. `None` while the board is empty.
    pub fn refresh(&self, now: DateTime<Utc>) -> Option<BoardView> {
        if self.repo.is_empty() {
            return None;
        }
        debug!(count = self.repo.len(), "refreshing card times");
        Some(self.render(now))
    }
}

impl DeleteTrigger {
    /// Delete the bound card from `board` and return the redraw.
    pub fn fire<S: Slot>(
        &self,
        board: &mut Board<S>,
        now: DateTime<Utc>,
    ) -> Result<BoardView, StoreError> {
        board.delete(self.id())?;
        Ok(board.render(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldError;
    use crate::store::{CARDS_KEY, MemorySlot};
    use crate::validate::Field;

    fn board() -> Board<MemorySlot> {
        Board::open(CardStore::new(MemorySlot::new()))
    }

    fn form(city: &str) -> FormInput {
        FormInput { city: city.into(), unit: "C".into(), ..Default::default() }
    }

    #[test]
    fn rejected_submission_adds_nothing() {
        let mut board = board();

        let err = board.submit(&form(""), Utc::now()).unwrap_err();
        match err {
            SubmitError::Invalid(v) => {
                assert_eq!(v.error(Field::City), Some(FieldError::RequiredFieldMissing));
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = board
            .submit(&FormInput { wind: "breezy".into(), ..form("Cork") }, Utc::now())
            .unwrap_err();
        assert!(matches!(err, SubmitError::Invalid(_)));

        assert!(board.cards().is_empty());
        assert_eq!(board.repository().store().slot().writes(), 0);
    }

    #[test]
    fn newest_submission_comes_first() {
        let mut board = board();
        let a = board.submit(&form("Galway"), Utc::now()).expect("submit a");
        let b = board.submit(&form("Sligo"), Utc::now()).expect("submit b");

        assert_eq!(board.cards()[0].id, b.id);
        assert_eq!(board.cards()[1].id, a.id);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn delete_trigger_removes_card_and_redraws() {
        let mut board = board();
        let now = Utc::now();
        let a = board.submit(&form("Galway"), now).expect("submit a");
        board.submit(&form("Sligo"), now).expect("submit b");

        let trigger = board.render(now).cards()[1].delete.clone();
        assert_eq!(trigger.id(), a.id);

        let view = trigger.fire(&mut board, now).expect("delete");
        assert_eq!(view.cards().len(), 1);
        assert_eq!(view.cards()[0].city, "Sligo");

        let view = trigger.fire(&mut board, now).expect("second delete is a no-op");
        assert_eq!(view.cards().len(), 1);
    }

    #[test]
    fn refresh_is_noop_when_empty() {
        let mut board = board();
        assert!(board.refresh(Utc::now()).is_none());

        board.submit(&form("Ennis"), Utc::now()).expect("submit");
        let view = board.refresh(Utc::now()).expect("refresh");
        assert_eq!(view.cards()[0].last_updated, "just now");
    }

    #[test]
    fn extreme_stored_timestamps_render_without_age() {
        let slot = MemorySlot::new().with_entry(
            CARDS_KEY,
            r#"[{"id":"a","city":"Oslo","updatedAt":-1e300},
                {"id":"b","city":"Bergen","updatedAt":-9223372036854775808}]"#,
        );
        let board = Board::open(CardStore::new(slot));

        let view = board.render(Utc::now());
        assert_eq!(view.cards().len(), 2);
        assert!(view.cards().iter().all(|c| c.last_updated.is_empty()));
        assert!(board.refresh(Utc::now()).is_some());
    }

    #[test]
    fn submit_surfaces_write_failure_but_keeps_card() {
        let mut slot = MemorySlot::new();
        slot.set_fail_writes(true);
        let mut board = Board::open(CardStore::new(slot));

        let err = board.submit(&form("Tralee"), Utc::now()).unwrap_err();
        assert!(matches!(err, SubmitError::Repository(RepositoryError::Store(_))));
        assert_eq!(board.cards().len(), 1);
    }
}
