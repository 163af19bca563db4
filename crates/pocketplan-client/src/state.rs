use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, Error as SqliteError, ffi::ErrorCode};
use tracing::trace;

use crate::{ClientError, ClientResult};

pub const HOME_ENV_VAR: &str = "POCKETPLAN_HOME";
const DEFAULT_DIR_NAME: &str = ".pocketplan";
const DB_FILE_NAME: &str = "budget.db";
const BUSY_TIMEOUT: Duration = Duration::from_millis(250);

/// Where the budget store lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLocation {
    pub home: PathBuf,
    pub db_path: PathBuf,
}

impl StoreLocation {
    /// Precedence: explicit override, then `POCKETPLAN_HOME`, then `~/.pocketplan`.
    pub fn resolve(home_override: Option<&Path>) -> ClientResult<Self> {
        let candidate = match home_override {
            Some(path) => path.to_path_buf(),
            None => default_home()?,
        };
        let home = absolutize(&candidate)?;
        let db_path = home.join(DB_FILE_NAME);
        Ok(Self { home, db_path })
    }

    pub fn prepare(&self) -> ClientResult<()> {
        fs::create_dir_all(&self.home).map_err(|error| map_io_error(&self.home, &error))?;
        restrict_to_owner(&self.home);
        Ok(())
    }

    pub fn connect(&self) -> ClientResult<Connection> {
        trace!(db_path = %self.db_path.display(), "opening budget store");
        let connection = Connection::open(&self.db_path)
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;
        Ok(connection)
    }
}

fn default_home() -> ClientResult<PathBuf> {
    if let Some(from_env) = std::env::var_os(HOME_ENV_VAR).filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(from_env));
    }
    home::home_dir()
        .map(|user_home| user_home.join(DEFAULT_DIR_NAME))
        .ok_or_else(|| {
            ClientError::store_init_failed(
                Path::new("."),
                "Could not resolve a home directory for the budget store.",
            )
        })
}

fn absolutize(path: &Path) -> ClientResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir()
        .map_err(|error| ClientError::store_init_failed(path, &error.to_string()))?;
    Ok(cwd.join(path))
}

pub fn map_io_error(path: &Path, error: &std::io::Error) -> ClientError {
    match error.kind() {
        std::io::ErrorKind::PermissionDenied => {
            ClientError::store_init_permission_denied(path, &error.to_string())
        }
        _ => ClientError::store_init_failed(path, &error.to_string()),
    }
}

pub fn map_sqlite_error(path: &Path, error: &SqliteError) -> ClientError {
    match error.sqlite_error_code() {
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => ClientError::store_locked(path),
        Some(ErrorCode::NotADatabase | ErrorCode::DatabaseCorrupt) => {
            ClientError::store_corrupt(path)
        }
        Some(ErrorCode::CannotOpen | ErrorCode::ReadOnly | ErrorCode::PermissionDenied) => {
            ClientError::store_init_permission_denied(path, &error.to_string())
        }
        _ => ClientError::store_init_failed(path, &error.to_string()),
    }
}

#[cfg(unix)]
fn restrict_to_owner(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o700));
}

#[cfg(not(unix))]
fn restrict_to_owner(_path: &Path) {}
