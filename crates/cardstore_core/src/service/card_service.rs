//! Business card use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for UI-facing callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Service layer remains storage-agnostic and holds no cached cards;
//!   callers re-read with `list_cards` after each mutation.

use crate::model::card::{BusinessCard, CardId};
use crate::repo::card_repo::{CardRepository, RepoResult};

/// Form input for a new card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardFields {
    pub name: String,
    pub title: String,
    pub phone: String,
    pub email: String,
    pub location: String,
}

impl From<CardFields> for BusinessCard {
    fn from(fields: CardFields) -> Self {
        BusinessCard::new(
            fields.name,
            fields.title,
            fields.phone,
            fields.email,
            fields.location,
        )
    }
}

/// Use-case service wrapper for card CRUD operations.
pub struct CardService<R: CardRepository> {
    repo: R,
}

impl<R: CardRepository> CardService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists a card and returns its store-assigned id.
    pub fn create_card(&self, card: &BusinessCard) -> RepoResult<CardId> {
        self.repo.create_card(card)
    }

    /// Persists a card built from raw form fields.
    pub fn create_card_from_fields(&self, fields: CardFields) -> RepoResult<CardId> {
        let card = BusinessCard::from(fields);
        self.repo.create_card(&card)
    }

    /// Returns a fresh snapshot of every stored card.
    pub fn list_cards(&self) -> RepoResult<Vec<BusinessCard>> {
        self.repo.list_cards()
    }

    /// Replaces the content of the card with `card.id`.
    ///
    /// Returns `0` when no such card exists.
    pub fn update_card(&self, card: &BusinessCard) -> RepoResult<usize> {
        self.repo.update_card(card)
    }

    /// Deletes the card with `card.id`. Deleting twice returns `0`.
    pub fn delete_card(&self, card: &BusinessCard) -> RepoResult<usize> {
        self.repo.delete_card(card)
    }
}
