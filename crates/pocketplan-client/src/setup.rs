use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::migrations::{
    EXPECTED_USER_VERSION, REQUIRED_META_KEYS, SCHEMA_VERSION_KEY, run_pending,
};
use crate::state::{StoreLocation, map_sqlite_error};
use crate::{ClientError, ClientResult};

const INTERNAL_META_COLUMNS: [&str; 2] = ["key", "value"];
const SALARIES_COLUMNS: [&str; 4] = ["period_key", "amount", "source", "updated_at"];
const EXPENSES_COLUMNS: [&str; 8] = [
    "expense_id",
    "category",
    "subcategory",
    "amount",
    "note",
    "created_at",
    "updated_at",
    "import_batch_id",
];

const REQUIRED_CORE_TABLES: [(&str, &[&str]); 3] = [
    ("internal_meta", &INTERNAL_META_COLUMNS),
    ("salaries", &SALARIES_COLUMNS),
    ("expenses", &EXPENSES_COLUMNS),
];

#[derive(Debug, Clone)]
pub struct SetupContext {
    pub home: PathBuf,
    pub db_path: PathBuf,
    pub schema_version: String,
}

/// An initialized store plus an open connection to it.
#[derive(Debug)]
pub struct OpenStore {
    pub context: SetupContext,
    pub connection: Connection,
}

pub fn ensure_initialized_at(home_override: &Path) -> ClientResult<SetupContext> {
    open_store(Some(home_override)).map(|store| store.context)
}

/// Resolves the store home, applies pending migrations, and verifies the
/// schema before handing back a usable connection.
pub fn open_store(home_override: Option<&Path>) -> ClientResult<OpenStore> {
    let location = StoreLocation::resolve(home_override)?;
    location.prepare()?;
    let mut connection = location.connect()?;
    let StoreLocation { home, db_path } = location;

    run_pending(&mut connection).map_err(|error| map_migration_error(&db_path, &error))?;

    verify_core_tables(&connection, &db_path)?;
    repair_meta(&connection, &db_path)?;
    let schema_version = verify_meta(&connection, &db_path)?;
    debug!(db_path = %db_path.display(), schema_version = %schema_version, "budget store ready");

    Ok(OpenStore {
        context: SetupContext {
            home,
            db_path,
            schema_version,
        },
        connection,
    })
}

fn map_migration_error(db_path: &Path, error: &rusqlite_migration::Error) -> ClientError {
    if let rusqlite_migration::Error::RusqliteError { err, .. } = error {
        let mapped = map_sqlite_error(db_path, err);
        if matches!(
            mapped.code.as_str(),
            "store_locked" | "store_corrupt" | "store_init_permission_denied"
        ) {
            return mapped;
        }
    }
    ClientError::migration_failed(db_path, &error.to_string())
}

fn verify_core_tables(connection: &Connection, db_path: &Path) -> ClientResult<()> {
    let mut statement = connection
        .prepare("SELECT name FROM pragma_table_info(?1)")
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    for (table_name, required_columns) in REQUIRED_CORE_TABLES {
        let columns = statement
            .query_map([table_name], |row| row.get::<_, String>(0))
            .map_err(|error| map_sqlite_error(db_path, &error))?
            .collect::<Result<Vec<String>, _>>()
            .map_err(|error| map_sqlite_error(db_path, &error))?;

        // A missing table reports no columns at all.
        let complete = required_columns
            .iter()
            .all(|required| columns.iter().any(|column| column == required));
        if !complete {
            debug!(table = table_name, "core table missing or incomplete");
            return Err(ClientError::store_corrupt(db_path));
        }
    }

    Ok(())
}

fn repair_meta(connection: &Connection, db_path: &Path) -> ClientResult<()> {
    // Insert-only: missing keys are restored, drifted values fail verification.
    for (meta_key, default_value) in REQUIRED_META_KEYS {
        connection
            .execute(
                "INSERT OR IGNORE INTO internal_meta (key, value) VALUES (?1, ?2)",
                params![meta_key, default_value],
            )
            .map_err(|error| map_sqlite_error(db_path, &error))?;
    }
    Ok(())
}

/// Checks `user_version` and every required meta value, returning the
/// stored schema version.
fn verify_meta(connection: &Connection, db_path: &Path) -> ClientResult<String> {
    let user_version = connection
        .query_row("PRAGMA user_version", [], |row| row.get::<_, i64>(0))
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    if user_version != EXPECTED_USER_VERSION {
        return Err(ClientError::store_corrupt(db_path));
    }

    let mut schema_version = None;
    for (meta_key, expected_value) in REQUIRED_META_KEYS {
        let value = connection
            .query_row(
                "SELECT value FROM internal_meta WHERE key = ?1 LIMIT 1",
                [meta_key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|error| map_sqlite_error(db_path, &error))?;

        if value.as_deref() != Some(expected_value) {
            debug!(key = meta_key, found = ?value, "store metadata drifted");
            return Err(ClientError::store_corrupt(db_path));
        }
        if meta_key == SCHEMA_VERSION_KEY {
            schema_version = value;
        }
    }

    schema_version.ok_or_else(|| ClientError::store_corrupt(db_path))
}
