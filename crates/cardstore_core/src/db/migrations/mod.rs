//! Card schema registry and destructive upgrade executor.
//!
//! # Responsibility
//! - Register card table schemas in strictly increasing version order.
//! - Bring an outdated database to the latest schema atomically.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Upgrades are destructive: the card table is dropped and recreated empty.
//! - The applied version is mirrored to `PRAGMA user_version` in the same
//!   transaction as the table rebuild.

use crate::db::{DbError, DbResult};
use log::{info, warn};
use rusqlite::{Connection, TransactionBehavior};

/// Name of the only table owned by the card store.
pub const CARD_TABLE: &str = "business_card";

#[derive(Debug, Clone, Copy)]
struct Schema {
    version: u32,
    create_sql: &'static str,
}

const SCHEMAS: &[Schema] = &[Schema {
    version: 1,
    create_sql: include_str!("0001_business_card.sql"),
}];

/// Returns the latest schema version known by this binary.
pub fn latest_version() -> u32 {
    SCHEMAS.last().map_or(0, |schema| schema.version)
}

/// Reads the schema version stamped on the connection.
///
/// SQLite keeps `user_version` as a signed 32-bit value, so foreign files may
/// carry negative stamps.
pub fn current_version(conn: &Connection) -> DbResult<i64> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, i64>(0))?;
    Ok(version)
}

/// Reconciles the stored schema version with `latest_version()`.
///
/// - stored == latest: no-op, data is preserved.
/// - stored < latest (negative stamps included): drops the card table, rows
///   included, recreates it from the latest schema, then stamps the latest
///   version.
/// - stored > latest: `DbError::UnsupportedSchemaVersion`, nothing is changed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let Some(schema) = SCHEMAS.last() else {
        return Ok(());
    };

    if check_version(current_version(conn)?)? == Gate::Current {
        return Ok(());
    }

    // Another connection may have upgraded the file since the check above;
    // re-read under the write lock before dropping anything.
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let current = current_version(&tx)?;
    if check_version(current)? == Gate::Current {
        return Ok(());
    }

    let dropped_rows = if card_table_exists(&tx)? {
        tx.query_row(&format!("SELECT COUNT(*) FROM {CARD_TABLE};"), [], |row| {
            row.get::<_, i64>(0)
        })?
    } else {
        0
    };

    tx.execute_batch(&format!("DROP TABLE IF EXISTS {CARD_TABLE};"))?;
    tx.execute_batch(schema.create_sql)?;
    tx.execute_batch(&format!("PRAGMA user_version = {};", schema.version))?;
    tx.commit()?;

    if dropped_rows > 0 {
        warn!(
            "event=db_migrate module=db status=ok from_version={} to_version={} dropped_rows={}",
            current, schema.version, dropped_rows
        );
    } else {
        info!(
            "event=db_migrate module=db status=ok from_version={} to_version={} dropped_rows=0",
            current, schema.version
        );
    }

    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Gate {
    Current,
    Outdated,
}

fn check_version(stored: i64) -> DbResult<Gate> {
    let latest = latest_version();
    if stored > i64::from(latest) {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: stored,
            latest_supported: latest,
        });
    }
    if stored == i64::from(latest) {
        Ok(Gate::Current)
    } else {
        Ok(Gate::Outdated)
    }
}

fn card_table_exists(conn: &Connection) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [CARD_TABLE],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

#[cfg(test)]
mod tests {
    use super::{
        apply_migrations, check_version, current_version, latest_version, Gate, CARD_TABLE,
    };
    use crate::db::DbError;
    use rusqlite::Connection;

    #[test]
    fn versions_are_strictly_increasing() {
        let versions: Vec<u32> = super::SCHEMAS.iter().map(|schema| schema.version).collect();
        assert!(versions.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(latest_version() > 0);
    }

    #[test]
    fn fresh_connection_gets_latest_version() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        assert_eq!(current_version(&conn).unwrap(), i64::from(latest_version()));

        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {CARD_TABLE};"), [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn check_version_orders_negative_stamps_below_latest() {
        let latest = i64::from(latest_version());

        assert_eq!(check_version(latest).unwrap(), Gate::Current);
        assert_eq!(check_version(0).unwrap(), Gate::Outdated);
        assert_eq!(check_version(-1).unwrap(), Gate::Outdated);
        assert_eq!(check_version(i64::from(i32::MIN)).unwrap(), Gate::Outdated);
        assert!(matches!(
            check_version(latest + 1),
            Err(DbError::UnsupportedSchemaVersion { db_version, .. }) if db_version == latest + 1
        ));
    }
}
