//! Business card domain model.
//!
//! # Responsibility
//! - Define the one record shape shared by storage and UI callers.
//! - Distinguish transient (unsaved) values from persisted ones.
//!
//! # Invariants
//! - `id` is assigned by the store on create and never changes afterward.
//! - Ids are never reused, even after the row is deleted.
//! - Content fields are free-form and may be empty.

use serde::{Deserialize, Serialize};

/// Store-assigned card identifier (SQLite rowid).
pub type CardId = i64;

/// Placeholder id carried by cards that have not been created yet.
pub const UNSAVED_CARD_ID: CardId = 0;

/// One business card record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusinessCard {
    /// `UNSAVED_CARD_ID` until the store assigns one.
    pub id: CardId,
    pub name: String,
    pub title: String,
    pub phone: String,
    pub email: String,
    pub location: String,
}

impl BusinessCard {
    /// Creates a transient card, typically from form input.
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: UNSAVED_CARD_ID,
            name: name.into(),
            title: title.into(),
            phone: phone.into(),
            email: email.into(),
            location: location.into(),
        }
    }

    /// Returns a copy of this card carrying a store-assigned id.
    ///
    /// Used by edit flows that already know which row they target.
    pub fn with_id(mut self, id: CardId) -> Self {
        self.id = id;
        self
    }

    /// Returns whether this value refers to a stored row.
    pub fn is_persisted(&self) -> bool {
        self.id != UNSAVED_CARD_ID
    }

    /// Returns whether both cards carry the same content, ignoring `id`.
    pub fn same_content(&self, other: &Self) -> bool {
        self.name == other.name
            && self.title == other.title
            && self.phone == other.phone
            && self.email == other.email
            && self.location == other.location
    }
}
