//! FFI use-case API for the card list screen.
//!
//! # Responsibility
//! - Expose the card CRUD contract to Dart via FRB as sync calls.
//! - Hand the UI a fresh card snapshot after every mutation.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - A mutation response carries `cards = Some(..)` only when both the
//!   mutation and the follow-up read succeeded; on `None` the UI keeps the
//!   list it already shows.
//! - Card contents are never logged.

use cardstore_core::{
    core_version as core_version_inner, default_log_level as default_log_level_inner,
    init_logging as init_logging_inner, open_db, schema_version as schema_version_inner,
    BusinessCard, CardFields, CardId, CardService, RepoResult, SqliteCardRepository,
    DATABASE_FILE_NAME,
};
use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;

const DB_PATH_ENV: &str = "CARDSTORE_DB_PATH";
static CARD_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Exposes core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Exposes the card schema version this binary writes.
#[flutter_rust_bridge::frb(sync)]
pub fn schema_version() -> u32 {
    schema_version_inner()
}

/// Log level the host should pass to `init_logging` when it has no override.
#[flutter_rust_bridge::frb(sync)]
pub fn default_log_level() -> String {
    default_log_level_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One card as shown by the list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardItem {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub phone: String,
    pub email: String,
    pub location: String,
}

impl From<BusinessCard> for CardItem {
    fn from(card: BusinessCard) -> Self {
        Self {
            id: card.id,
            name: card.name,
            title: card.title,
            phone: card.phone,
            email: card.email,
            location: card.location,
        }
    }
}

/// Response envelope for `card_list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardListResponse {
    /// Whether the read succeeded.
    pub ok: bool,
    /// Full snapshot; empty on failure.
    pub items: Vec<CardItem>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Response envelope for create/update/delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardActionResponse {
    /// Whether the mutation itself succeeded.
    pub ok: bool,
    /// Created card id (create only).
    pub card_id: Option<i64>,
    /// Rows touched by the mutation (0 means no such card).
    pub affected: u32,
    /// Snapshot read right after the mutation, `None` if unavailable.
    pub cards: Option<Vec<CardItem>>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl CardActionResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            card_id: None,
            affected: 0,
            cards: None,
            message: message.into(),
        }
    }
}

/// Creates a card from the add-card form.
///
/// # FFI contract
/// - Sync call, DB-backed execution; run off the UI thread.
/// - Field values are stored exactly as given (no trimming).
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn card_create(
    name: String,
    title: String,
    phone: String,
    email: String,
    location: String,
) -> CardActionResponse {
    let fields = CardFields {
        name,
        title,
        phone,
        email,
        location,
    };
    match mutate_and_refresh("card_create", |service| service.create_card_from_fields(fields)) {
        Ok((id, cards)) => CardActionResponse {
            ok: true,
            card_id: Some(id),
            affected: 1,
            cards,
            message: "Card created.".to_string(),
        },
        Err(message) => CardActionResponse::failure(message),
    }
}

/// Returns every stored card.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - All-or-nothing: on failure `items` is empty and `ok` is false.
#[flutter_rust_bridge::frb(sync)]
pub fn card_list() -> CardListResponse {
    match with_card_service(|service| service.list_cards()) {
        Ok(cards) => {
            let message = format!("Loaded {} card(s).", cards.len());
            CardListResponse {
                ok: true,
                items: cards.into_iter().map(CardItem::from).collect(),
                message,
            }
        }
        Err(err) => {
            warn!("event=card_list module=ffi status=error error={err}");
            CardListResponse {
                ok: false,
                items: Vec::new(),
                message: format!("card_list failed: {err}"),
            }
        }
    }
}

/// Replaces all content fields of the card with `id`.
///
/// # FFI contract
/// - `affected == 0` with `ok == true` means no card had that id.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn card_update(
    id: i64,
    name: String,
    title: String,
    phone: String,
    email: String,
    location: String,
) -> CardActionResponse {
    let card = BusinessCard::new(name, title, phone, email, location).with_id(id);
    match mutate_and_refresh("card_update", |service| service.update_card(&card)) {
        Ok((affected, cards)) => count_response(affected, cards, "Card updated.", id),
        Err(message) => CardActionResponse::failure(message),
    }
}

/// Deletes the card with `id`. Deleting a missing card is not an error.
#[flutter_rust_bridge::frb(sync)]
pub fn card_delete(id: i64) -> CardActionResponse {
    let card = BusinessCard::default().with_id(id);
    match mutate_and_refresh("card_delete", |service| service.delete_card(&card)) {
        Ok((affected, cards)) => count_response(affected, cards, "Card deleted.", id),
        Err(message) => CardActionResponse::failure(message),
    }
}

fn count_response(
    affected: usize,
    cards: Option<Vec<CardItem>>,
    done_message: &str,
    id: CardId,
) -> CardActionResponse {
    let message = if affected == 0 {
        format!("No card with id {id}.")
    } else {
        done_message.to_string()
    };
    CardActionResponse {
        ok: true,
        card_id: None,
        affected: u32::try_from(affected).unwrap_or(u32::MAX),
        cards,
        message,
    }
}

fn resolve_card_db_path() -> PathBuf {
    CARD_DB_PATH
        .get_or_init(|| db_path_from(std::env::var(DB_PATH_ENV).ok()))
        .clone()
}

/// `CARDSTORE_DB_PATH` when set and non-blank, else `<temp>/businesscard.db`.
fn db_path_from(raw: Option<String>) -> PathBuf {
    match raw.as_deref().map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => PathBuf::from(trimmed),
        _ => std::env::temp_dir().join(DATABASE_FILE_NAME),
    }
}

fn with_card_service<T>(
    f: impl FnOnce(&CardService<SqliteCardRepository<'_>>) -> RepoResult<T>,
) -> Result<T, String> {
    let db_path = resolve_card_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("card DB open failed: {err}"))?;
    let repo = SqliteCardRepository::try_new(&conn)
        .map_err(|err| format!("card repo init failed: {err}"))?;
    let service = CardService::new(repo);
    f(&service).map_err(|err| err.to_string())
}

/// Runs one mutation, then re-reads the table on the same connection.
///
/// A failed re-read does not turn a committed mutation into a failure; it
/// only leaves the snapshot empty.
fn mutate_and_refresh<T>(
    event: &'static str,
    f: impl FnOnce(&CardService<SqliteCardRepository<'_>>) -> RepoResult<T>,
) -> Result<(T, Option<Vec<CardItem>>), String> {
    let outcome = with_card_service(|service| {
        let value = f(service)?;
        let cards = match service.list_cards() {
            Ok(cards) => Some(cards.into_iter().map(CardItem::from).collect::<Vec<_>>()),
            Err(err) => {
                warn!("event={event} module=ffi status=refresh_failed error={err}");
                None
            }
        };
        Ok((value, cards))
    });

    outcome.map_err(|err| {
        warn!("event={event} module=ffi status=error error={err}");
        format!("{event} failed: {err}")
    })
}

#[cfg(test)]
mod tests {
    use super::{
        card_create, card_delete, card_list, card_update, core_version, default_log_level,
        db_path_from, init_logging, resolve_card_db_path, schema_version, CardItem, CARD_DB_PATH,
    };
    use cardstore_core::{open_db, DATABASE_FILE_NAME};
    use std::path::PathBuf;
    use std::sync::OnceLock;
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEST_DB_DIR: OnceLock<tempfile::TempDir> = OnceLock::new();

    /// Pins the process-wide card DB path to a per-run temp file, as a host
    /// would through `CARDSTORE_DB_PATH`.
    fn use_isolated_db() -> PathBuf {
        let dir = TEST_DB_DIR.get_or_init(|| tempfile::tempdir().expect("create test db dir"));
        let raw = dir.path().join(DATABASE_FILE_NAME).display().to_string();
        let path = CARD_DB_PATH
            .get_or_init(|| db_path_from(Some(raw)))
            .clone();
        assert!(
            path.starts_with(dir.path()),
            "card DB path was resolved before test isolation: {}",
            path.display()
        );
        path
    }

    #[test]
    fn db_path_prefers_non_blank_override() {
        assert_eq!(
            db_path_from(Some("  /data/cards.db ".to_string())),
            PathBuf::from("/data/cards.db")
        );
        assert_eq!(
            db_path_from(Some("   ".to_string())),
            std::env::temp_dir().join(DATABASE_FILE_NAME)
        );
        assert_eq!(
            db_path_from(None),
            std::env::temp_dir().join(DATABASE_FILE_NAME)
        );
    }

    #[test]
    fn card_calls_use_isolated_db_file() {
        let path = use_isolated_db();
        assert_eq!(resolve_card_db_path(), path);
        assert_ne!(path, std::env::temp_dir().join(DATABASE_FILE_NAME));

        let created = card_create(
            unique_token("isolated"),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        );
        assert!(created.ok, "{}", created.message);
        assert!(path.exists());
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
        assert!(schema_version() >= 1);
    }

    #[test]
    fn default_log_level_is_accepted_level() {
        assert!(["debug", "info"].contains(&default_log_level().as_str()));
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/cardstore-logs".to_string());
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn card_create_returns_id_and_refreshed_snapshot() {
        use_isolated_db();
        let token = unique_token("create");
        let response = card_create(
            token.clone(),
            "Eng".to_string(),
            "1".to_string(),
            "a@x.com".to_string(),
            "NY".to_string(),
        );
        assert!(response.ok, "{}", response.message);
        let id = response.card_id.expect("create should return card_id");

        let snapshot = response.cards.expect("refresh should succeed");
        let created: Vec<&CardItem> = snapshot.iter().filter(|item| item.id == id).collect();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].name, token);
        assert_eq!(created[0].location, "NY");

        let listed = card_list();
        assert!(listed.ok, "{}", listed.message);
        assert!(listed.items.iter().any(|item| item.id == id));
    }

    #[test]
    fn card_create_keeps_whitespace_and_empty_fields() {
        use_isolated_db();
        let token = unique_token("  padded  ");
        let response = card_create(
            token.clone(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        );
        assert!(response.ok, "{}", response.message);
        let id = response.card_id.unwrap();

        let conn = open_db(use_isolated_db()).expect("open db");
        let (name, title): (String, Option<String>) = conn
            .query_row(
                "SELECT name, title FROM business_card WHERE id = ?1",
                [id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .expect("query card row");
        assert_eq!(name, token);
        assert_eq!(title.as_deref(), Some(""));
    }

    #[test]
    fn card_update_replaces_content_and_reports_missing_ids() {
        use_isolated_db();
        let created = card_create(
            unique_token("update"),
            "Mgr".to_string(),
            "2".to_string(),
            "b@x.com".to_string(),
            "SF".to_string(),
        );
        let id = created.card_id.expect("create should return card_id");

        let updated = card_update(
            id,
            "Bob".to_string(),
            "VP".to_string(),
            "2".to_string(),
            "b@x.com".to_string(),
            "SF".to_string(),
        );
        assert!(updated.ok, "{}", updated.message);
        assert_eq!(updated.affected, 1);
        let snapshot = updated.cards.expect("refresh should succeed");
        let item = snapshot.iter().find(|item| item.id == id).unwrap();
        assert_eq!(item.title, "VP");

        let missing = card_update(
            -1,
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        );
        assert!(missing.ok);
        assert_eq!(missing.affected, 0);
        assert!(missing.message.contains("No card"));
    }

    #[test]
    fn card_delete_is_idempotent() {
        use_isolated_db();
        let created = card_create(
            unique_token("delete"),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        );
        let id = created.card_id.expect("create should return card_id");

        let first = card_delete(id);
        assert!(first.ok, "{}", first.message);
        assert_eq!(first.affected, 1);
        assert!(first
            .cards
            .expect("refresh should succeed")
            .iter()
            .all(|item| item.id != id));

        let second = card_delete(id);
        assert!(second.ok);
        assert_eq!(second.affected, 0);
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
