use std::path::Path;

use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior, params};
use tracing::{debug, warn};

use crate::budget::period::Period;
use crate::budget::taxonomy::Category;
use crate::budget::types::{Expense, format_timestamp, parse_timestamp};
use crate::state::map_sqlite_error;
use crate::{ClientError, ClientResult};

const SELECT_COLUMNS: &str =
    "SELECT expense_id, category, subcategory, amount, note, created_at FROM expenses";

type RawExpenseRow = (String, String, String, f64, Option<String>, String);

/// `expenses` table adapter. Reads hand back snapshots; the aggregation
/// layer never touches the connection.
#[derive(Debug)]
pub struct ExpenseStore<'a> {
    connection: &'a Connection,
    db_path: &'a Path,
}

impl<'a> ExpenseStore<'a> {
    pub fn new(connection: &'a Connection, db_path: &'a Path) -> Self {
        Self {
            connection,
            db_path,
        }
    }

    pub fn insert(&self, expense: &Expense) -> ClientResult<()> {
        insert_row(self.connection, self.db_path, expense, None)?;
        debug!(expense_id = %expense.id, "expense inserted");
        Ok(())
    }

    /// Replaces every mutable column of an existing expense.
    pub fn update(&self, expense: &Expense) -> ClientResult<()> {
        let changed = self
            .connection
            .execute(
                "UPDATE expenses
                 SET category = ?2,
                     subcategory = ?3,
                     amount = ?4,
                     note = ?5,
                     created_at = ?6,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
                 WHERE expense_id = ?1",
                params![
                    &expense.id,
                    expense.category.as_str(),
                    &expense.subcategory,
                    expense.amount,
                    &expense.note,
                    format_timestamp(&expense.created_at)
                ],
            )
            .map_err(|error| map_sqlite_error(self.db_path, &error))?;
        if changed == 0 {
            return Err(ClientError::expense_not_found(&expense.id));
        }
        debug!(expense_id = %expense.id, "expense updated");
        Ok(())
    }

    pub fn delete(&self, expense_id: &str) -> ClientResult<()> {
        let changed = self
            .connection
            .execute("DELETE FROM expenses WHERE expense_id = ?1", [expense_id])
            .map_err(|error| map_sqlite_error(self.db_path, &error))?;
        if changed == 0 {
            return Err(ClientError::expense_not_found(expense_id));
        }
        debug!(expense_id, "expense deleted");
        Ok(())
    }

    pub fn get(&self, expense_id: &str) -> ClientResult<Option<Expense>> {
        let raw = self
            .connection
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE expense_id = ?1 LIMIT 1"),
                [expense_id],
                read_raw_row,
            )
            .optional()
            .map_err(|error| map_sqlite_error(self.db_path, &error))?;
        Ok(raw.and_then(decode_row))
    }

    /// The full snapshot, oldest first.
    pub fn list_all(&self) -> ClientResult<Vec<Expense>> {
        self.query(
            &format!("{SELECT_COLUMNS} ORDER BY created_at ASC, expense_id ASC"),
            None,
        )
    }

    pub fn list_for_period(&self, period: Period) -> ClientResult<Vec<Expense>> {
        self.query(
            &format!(
                "{SELECT_COLUMNS} WHERE substr(created_at, 1, 7) = ?1 \
                 ORDER BY created_at ASC, expense_id ASC"
            ),
            Some(period.key()),
        )
    }

    fn query(&self, sql: &str, period_key: Option<String>) -> ClientResult<Vec<Expense>> {
        let mut statement = self
            .connection
            .prepare(sql)
            .map_err(|error| map_sqlite_error(self.db_path, &error))?;

        let rows = match period_key {
            Some(key) => statement.query_map([key], read_raw_row),
            None => statement.query_map([], read_raw_row),
        }
        .map_err(|error| map_sqlite_error(self.db_path, &error))?;

        let mut expenses = Vec::new();
        for row in rows {
            let raw = row.map_err(|error| map_sqlite_error(self.db_path, &error))?;
            if let Some(expense) = decode_row(raw) {
                expenses.push(expense);
            }
        }
        Ok(expenses)
    }
}

/// Writes a validated batch in one immediate transaction; any failure rolls
/// back the whole batch.
pub fn insert_expense_batch(
    connection: &mut Connection,
    db_path: &Path,
    expenses: &[Expense],
    batch_id: &str,
) -> ClientResult<usize> {
    let transaction = connection
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    for expense in expenses {
        insert_row(&transaction, db_path, expense, Some(batch_id))?;
    }

    transaction
        .commit()
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    debug!(batch_id, inserted = expenses.len(), "expense batch committed");
    Ok(expenses.len())
}

fn insert_row(
    connection: &Connection,
    db_path: &Path,
    expense: &Expense,
    batch_id: Option<&str>,
) -> ClientResult<()> {
    connection
        .execute(
            "INSERT INTO expenses (
                expense_id,
                category,
                subcategory,
                amount,
                note,
                created_at,
                import_batch_id
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &expense.id,
                expense.category.as_str(),
                &expense.subcategory,
                expense.amount,
                &expense.note,
                format_timestamp(&expense.created_at),
                batch_id
            ],
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    Ok(())
}

fn read_raw_row(row: &Row<'_>) -> rusqlite::Result<RawExpenseRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn decode_row(raw: RawExpenseRow) -> Option<Expense> {
    let (id, category, subcategory, amount, note, created_at) = raw;
    let Some(category) = Category::parse(&category) else {
        warn!(expense_id = %id, category = %category, "skipping expense with unknown category");
        return None;
    };
    let Some(created_at) = parse_timestamp(&created_at) else {
        warn!(expense_id = %id, created_at = %created_at, "skipping expense with unreadable timestamp");
        return None;
    };
    Some(Expense {
        id,
        category,
        subcategory,
        amount,
        note,
        created_at,
    })
}
