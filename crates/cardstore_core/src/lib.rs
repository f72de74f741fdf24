//! Core storage logic for the business card store.
//! This crate owns the card table, its schema version and the CRUD contract.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult, DATABASE_FILE_NAME};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::card::{BusinessCard, CardId, UNSAVED_CARD_ID};
pub use repo::card_repo::{CardRepository, RepoError, RepoResult, SqliteCardRepository};
pub use service::card_service::{CardFields, CardService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Returns the card schema version this binary writes.
pub fn schema_version() -> u32 {
    db::migrations::latest_version()
}
