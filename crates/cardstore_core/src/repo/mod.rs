//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the card data access contract.
//! - Isolate SQLite query details from service/UI orchestration.
//!
//! # Invariants
//! - Repositories only wrap connections whose schema is current.
//! - "Not found" is a count of `0`, never an error; errors mean the storage
//!   engine failed or the connection is not usable.

pub mod card_repo;
