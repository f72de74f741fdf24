//! Domain model for the business card store.
//!
//! # Invariants
//! - Card identity is an integer assigned by the store, never by callers.
//! - A card with `id == UNSAVED_CARD_ID` has not been persisted yet.

pub mod card;
