//! The authoritative in-memory card collection, written through to a store.

use tracing::{debug, info, warn};

use crate::error::{RepositoryError, StoreError};
use crate::model::Card;
use crate::store::{CardStore, Slot};

/// Prompt shown before every card is removed.
pub const CLEAR_PROMPT: &str = "Clear all weather cards? This action cannot be undone.";

/// Blocking yes/no question asked before destructive operations.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// What [`CardRepository::clear`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// There were no cards; nobody was asked and nothing was written.
    NothingToClear,
    Declined,
    Cleared(usize),
}

/// Newest-first card collection owned for the session.
///
/// Every mutation updates memory first and then saves the whole collection.
/// When the save fails the mutation is kept and the [`StoreError`] is returned
/// so the caller can warn that the slot is stale.
#[derive(Debug)]
pub struct CardRepository<S: Slot> {
    store: CardStore<S>,
    cards: Vec<Card>,
}

impl<S: Slot> CardRepository<S> {
    /// Seed the collection from the store.
    pub fn open(store: CardStore<S>) -> Self {
        let cards = store.load();
        Self { store, cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn store(&self) -> &CardStore<S> {
        &self.store
    }

    /// Insert `card` in front of all existing cards.
    pub fn add(&mut self, card: Card) -> Result<(), RepositoryError> {
        if self.get(&card.id).is_some() {
            return Err(RepositoryError::DuplicateId(card.id));
        }

        info!(id = %card.id, city = %card.city, "adding card");
        self.cards.insert(0, card);
        self.persist()?;
        Ok(())
    }

    /// Remove the card with `id`, returning it. Unknown ids are a no-op.
    pub fn delete_by_id(&mut self, id: &str) -> Result<Option<Card>, StoreError> {
        let removed = self
            .cards
            .iter()
            .position(|c| c.id == id)
            .map(|index| self.cards.remove(index));

        match &removed {
            Some(card) => info!(id, city = %card.city, "deleted card"),
            None => debug!(id, "no card to delete"),
        }

        self.persist()?;
        Ok(removed)
    }

    /// Remove every card once `confirm` agrees.
    ///
    /// With no cards present the prompt is skipped and nothing is written.
    pub fn clear(&mut self, confirm: &mut dyn Confirm) -> Result<ClearOutcome, StoreError> {
        if self.cards.is_empty() {
            return Ok(ClearOutcome::NothingToClear);
        }
        if !confirm.confirm(CLEAR_PROMPT) {
            debug!("clear declined");
            return Ok(ClearOutcome::Declined);
        }

        let count = self.cards.len();
        self.cards.clear();
        info!(count, "cleared all cards");

        self.persist()?;
        Ok(ClearOutcome::Cleared(count))
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        self.store.save(&self.cards).inspect_err(|e| {
            warn!(error = %e, "failed to persist cards, keeping in-memory state");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CARDS_KEY, MemorySlot};

    fn card(id: &str) -> Card {
        Card {
            id: id.into(),
            city: format!("City {id}"),
            country: String::new(),
            unit: Default::default(),
            temperature: None,
            feels: None,
            condition: String::new(),
            humidity: None,
            wind: None,
            updated_at: 1,
        }
    }

    fn repo() -> CardRepository<MemorySlot> {
        CardRepository::open(CardStore::new(MemorySlot::new()))
    }

    fn persisted(repo: &CardRepository<MemorySlot>) -> Vec<Card> {
        repo.store().load()
    }

    #[test]
    fn open_seeds_from_store() {
        let slot = MemorySlot::new().with_entry(CARDS_KEY, r#"[{"id":"x","city":"Oslo"}]"#);
        let repo = CardRepository::open(CardStore::new(slot));

        assert_eq!(repo.len(), 1);
        assert_eq!(repo.cards()[0].city, "Oslo");
    }

    #[test]
    fn add_prepends_and_persists() {
        let mut repo = repo();
        repo.add(card("a")).expect("add a");
        repo.add(card("b")).expect("add b");

        let ids: Vec<&str> = repo.cards().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(persisted(&repo), repo.cards());
    }

    #[test]
    fn add_rejects_duplicate_id_without_writing() {
        let mut repo = repo();
        repo.add(card("a")).expect("add a");
        let writes = repo.store().slot().writes();

        let err = repo.add(card("a")).unwrap_err();
        assert!(matches!(err, RepositoryError::DuplicateId(id) if id == "a"));
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.store().slot().writes(), writes);
    }

    #[test]
    fn delete_by_id_is_idempotent() {
        let mut repo = repo();
        repo.add(card("a")).expect("add a");
        repo.add(card("b")).expect("add b");

        let first = repo.delete_by_id("a").expect("delete");
        assert_eq!(first.map(|c| c.id), Some("a".to_string()));

        let second = repo.delete_by_id("a").expect("delete again");
        assert!(second.is_none());
        assert_eq!(repo.len(), 1);
        assert_eq!(persisted(&repo), repo.cards());
    }

    #[test]
    fn clear_with_no_cards_skips_prompt_and_write() {
        let mut repo = repo();
        let mut asked = false;

        let outcome = repo
            .clear(&mut |_: &str| {
                asked = true;
                true
            })
            .expect("clear");

        assert_eq!(outcome, ClearOutcome::NothingToClear);
        assert!(!asked);
        assert_eq!(repo.store().slot().writes(), 0);
    }

    #[test]
    fn clear_declined_keeps_cards() {
        let mut repo = repo();
        repo.add(card("a")).expect("add a");

        let outcome = repo.clear(&mut |_: &str| false).expect("clear");
        assert_eq!(outcome, ClearOutcome::Declined);
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn clear_confirmed_empties_and_persists() {
        let mut repo = repo();
        repo.add(card("a")).expect("add a");
        repo.add(card("b")).expect("add b");

        let mut prompt = String::new();
        let outcome = repo
            .clear(&mut |message: &str| {
                prompt = message.to_string();
                true
            })
            .expect("clear");

        assert_eq!(outcome, ClearOutcome::Cleared(2));
        assert_eq!(prompt, CLEAR_PROMPT);
        assert!(repo.is_empty());
        assert!(persisted(&repo).is_empty());
    }

    #[test]
    fn write_failure_keeps_in_memory_mutation() {
        let mut slot = MemorySlot::new();
        slot.set_fail_writes(true);
        let mut repo = CardRepository::open(CardStore::new(slot));

        let err = repo.add(card("a")).unwrap_err();
        assert!(matches!(err, RepositoryError::Store(StoreError::Write { .. })));
        assert_eq!(repo.len(), 1);
        assert!(persisted(&repo).is_empty());
    }
}
