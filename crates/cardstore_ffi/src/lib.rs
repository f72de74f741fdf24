//! Flutter-facing bindings for the business card store.

pub mod api;
