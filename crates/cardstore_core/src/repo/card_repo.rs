//! Business card repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the four CRUD operations over the `business_card` table.
//! - Translate between table rows and `BusinessCard` values.
//!
//! # Invariants
//! - Writes never bind the caller's `id` on insert; SQLite assigns it.
//! - Update/delete report a missing row as `0`, not as an error.
//! - Reads are fully materialized before returning (all-or-nothing).
//! - Strings are stored as given; NULL columns read back as empty strings.

use crate::db::migrations::{current_version, latest_version, CARD_TABLE};
use crate::db::DbError;
use crate::model::card::{BusinessCard, CardId};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CARD_COLUMNS: [&str; 6] = ["id", "name", "title", "phone", "email", "location"];

const CARD_SELECT_SQL: &str = "SELECT
    id,
    name,
    title,
    phone,
    email,
    location
FROM business_card";

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from card repository operations.
#[derive(Debug)]
pub enum RepoError {
    /// The backing SQLite engine could not complete the read or write.
    Storage(DbError),
    /// Connection schema is not at the version this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: i64,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted row cannot be converted to a valid card.
    InvalidData(String),
}

impl RepoError {
    /// Returns whether this error came from the storage engine itself.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "card storage failure: {err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "card repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "card repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "card repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted card data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Storage(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(DbError::Sqlite(value))
    }
}

/// Repository interface for business card CRUD.
pub trait CardRepository {
    /// Inserts the card's content and returns the newly assigned id.
    /// The incoming `card.id` is ignored.
    fn create_card(&self, card: &BusinessCard) -> RepoResult<CardId>;
    /// Returns every stored card in storage order.
    fn list_cards(&self) -> RepoResult<Vec<BusinessCard>>;
    /// Replaces all content fields of the row with `card.id`.
    /// Returns the number of rows changed (0 or 1).
    fn update_card(&self, card: &BusinessCard) -> RepoResult<usize>;
    /// Removes the row with `card.id`. Returns the number of rows removed
    /// (0 or 1).
    fn delete_card(&self, card: &BusinessCard) -> RepoResult<usize>;
}

/// SQLite-backed card repository.
pub struct SqliteCardRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCardRepository<'conn> {
    /// Wraps a connection that has already been through `open_db`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `user_version` is not the latest.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the card table
    ///   does not have the expected shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_card_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CardRepository for SqliteCardRepository<'_> {
    fn create_card(&self, card: &BusinessCard) -> RepoResult<CardId> {
        self.conn.execute(
            "INSERT INTO business_card (
                name,
                title,
                phone,
                email,
                location
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                card.name.as_str(),
                card.title.as_str(),
                card.phone.as_str(),
                card.email.as_str(),
                card.location.as_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn list_cards(&self) -> RepoResult<Vec<BusinessCard>> {
        let mut stmt = self.conn.prepare(&format!("{CARD_SELECT_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut cards = Vec::new();

        while let Some(row) = rows.next()? {
            cards.push(parse_card_row(row)?);
        }

        Ok(cards)
    }

    fn update_card(&self, card: &BusinessCard) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "UPDATE business_card
             SET
                name = ?1,
                title = ?2,
                phone = ?3,
                email = ?4,
                location = ?5
             WHERE id = ?6;",
            params![
                card.name.as_str(),
                card.title.as_str(),
                card.phone.as_str(),
                card.email.as_str(),
                card.location.as_str(),
                card.id,
            ],
        )?;

        Ok(changed)
    }

    fn delete_card(&self, card: &BusinessCard) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM business_card WHERE id = ?1;", [card.id])?;
        Ok(removed)
    }
}

fn parse_card_row(row: &Row<'_>) -> RepoResult<BusinessCard> {
    let id: CardId = row.get("id")?;
    if id <= 0 {
        return Err(RepoError::InvalidData(format!(
            "invalid id value `{id}` in business_card.id"
        )));
    }

    Ok(BusinessCard {
        id,
        name: text_or_empty(row, "name")?,
        title: text_or_empty(row, "title")?,
        phone: text_or_empty(row, "phone")?,
        email: text_or_empty(row, "email")?,
        location: text_or_empty(row, "location")?,
    })
}

fn text_or_empty(row: &Row<'_>, column: &str) -> RepoResult<String> {
    Ok(row.get::<_, Option<String>>(column)?.unwrap_or_default())
}

fn ensure_card_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version != i64::from(expected_version) {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, CARD_TABLE)? {
        return Err(RepoError::MissingRequiredTable(CARD_TABLE));
    }

    for column in CARD_COLUMNS {
        if !table_has_column(conn, CARD_TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: CARD_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
