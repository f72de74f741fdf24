//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `cardstore_core` linkage without any UI runtime.
//! - Run one create/list/update/delete pass on an in-memory store.
//! - Keep output deterministic for quick local sanity checks.

use cardstore_core::{open_db_in_memory, BusinessCard, CardService, SqliteCardRepository};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("cardstore_core version={}", cardstore_core::core_version());
    println!(
        "cardstore_core schema_version={}",
        cardstore_core::schema_version()
    );

    match smoke_round_trip() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("cardstore smoke failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn smoke_round_trip() -> Result<(), Box<dyn Error>> {
    let conn = open_db_in_memory()?;
    let service = CardService::new(SqliteCardRepository::try_new(&conn)?);

    let id = service.create_card(&BusinessCard::new(
        "Smoke",
        "Tester",
        "000",
        "smoke@example.invalid",
        "local",
    ))?;
    println!("create id={id} cards={}", service.list_cards()?.len());

    let mut card = BusinessCard::default().with_id(id);
    card.name = "Smoke".to_string();
    card.title = "Tester (edited)".to_string();
    let updated = service.update_card(&card)?;
    println!("update affected={updated}");

    let deleted = service.delete_card(&card)?;
    let repeated = service.delete_card(&card)?;
    println!(
        "delete affected={deleted} repeat_affected={repeated} cards={}",
        service.list_cards()?.len()
    );
    Ok(())
}
