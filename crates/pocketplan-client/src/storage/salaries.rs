use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use tracing::{debug, warn};

use crate::ClientResult;
use crate::budget::period::Period;
use crate::budget::salary::SalaryStore;
use crate::state::map_sqlite_error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SalarySource {
    Saved,
    CarriedForward,
}

impl SalarySource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::CarriedForward => "carried_forward",
        }
    }

    fn from_column(value: &str) -> Option<Self> {
        match value {
            "saved" => Some(Self::Saved),
            "carried_forward" => Some(Self::CarriedForward),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryEntry {
    pub period: Period,
    pub amount: f64,
    pub source: SalarySource,
    pub updated_at: String,
}

/// `salaries` table adapter. Saves record `saved`; anchoring writes record
/// `carried_forward`.
#[derive(Debug)]
pub struct SqliteSalaryStore<'a> {
    connection: &'a Connection,
    db_path: &'a Path,
}

impl<'a> SqliteSalaryStore<'a> {
    pub fn new(connection: &'a Connection, db_path: &'a Path) -> Self {
        Self {
            connection,
            db_path,
        }
    }

    /// Stored rows with their provenance, oldest period first.
    pub fn entries(&self) -> ClientResult<Vec<SalaryEntry>> {
        let mut statement = self
            .connection
            .prepare(
                "SELECT period_key, amount, source, updated_at
                 FROM salaries
                 ORDER BY period_key ASC",
            )
            .map_err(|error| map_sqlite_error(self.db_path, &error))?;

        let rows = statement
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(|error| map_sqlite_error(self.db_path, &error))?;

        let mut entries = Vec::new();
        for row in rows {
            let (period_key, amount, source, updated_at) =
                row.map_err(|error| map_sqlite_error(self.db_path, &error))?;
            let (Some(period), Some(source)) = (
                Period::from_key(&period_key),
                SalarySource::from_column(&source),
            ) else {
                warn!(period_key = %period_key, "skipping unreadable salary row");
                continue;
            };
            entries.push(SalaryEntry {
                period,
                amount,
                source,
                updated_at,
            });
        }
        Ok(entries)
    }

    fn write(&self, period: Period, value: f64, source: SalarySource) -> ClientResult<usize> {
        let sql = match source {
            SalarySource::Saved => {
                "INSERT INTO salaries (period_key, amount, source, updated_at)
                 VALUES (?1, ?2, ?3, strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
                 ON CONFLICT (period_key) DO UPDATE SET
                    amount = excluded.amount,
                    source = excluded.source,
                    updated_at = excluded.updated_at"
            }
            SalarySource::CarriedForward => {
                "INSERT OR IGNORE INTO salaries (period_key, amount, source)
                 VALUES (?1, ?2, ?3)"
            }
        };
        self.connection
            .execute(sql, params![period.key(), value, source.as_str()])
            .map_err(|error| map_sqlite_error(self.db_path, &error))
    }
}

impl SalaryStore for SqliteSalaryStore<'_> {
    fn get(&self, period: Period) -> ClientResult<Option<f64>> {
        self.connection
            .query_row(
                "SELECT amount FROM salaries WHERE period_key = ?1 LIMIT 1",
                [period.key()],
                |row| row.get::<_, f64>(0),
            )
            .optional()
            .map_err(|error| map_sqlite_error(self.db_path, &error))
    }

    fn set(&mut self, period: Period, value: f64) -> ClientResult<()> {
        self.write(period, value, SalarySource::Saved)?;
        debug!(period = %period, "salary row upserted");
        Ok(())
    }

    fn set_if_absent(&mut self, period: Period, value: f64) -> ClientResult<bool> {
        let changed = self.write(period, value, SalarySource::CarriedForward)?;
        Ok(changed > 0)
    }

    fn list_periods(&self) -> ClientResult<Vec<Period>> {
        Ok(self
            .entries()?
            .into_iter()
            .map(|entry| entry.period)
            .collect())
    }
}
