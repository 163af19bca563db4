pub(crate) mod input;
pub(crate) mod parse;
pub(crate) mod validate;

use std::path::Path;

use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde_json::json;
use tracing::info;
use ulid::Ulid;

use crate::contracts::types::ImportSummary;
use crate::error::IMPORT_HELP_COMMAND;
use crate::storage::insert_expense_batch;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub(crate) struct ImportExecutionResult {
    pub dry_run: bool,
    pub import_id: Option<String>,
    pub message: String,
    pub summary: ImportSummary,
    pub source_used: &'static str,
}

/// Reads, parses and validates an expense snapshot, then writes it in one
/// transaction unless `dry_run` is set.
pub(crate) fn execute(
    connection: &mut Connection,
    db_path: &Path,
    path: Option<&str>,
    dry_run: bool,
    stdin_override: Option<String>,
    default_created_at: NaiveDateTime,
) -> ClientResult<ImportExecutionResult> {
    let source = input::resolve_source(path, stdin_override)?;
    let parsed_rows = parse::parse_source(&source.content)?;
    let validated = validate::validate_rows(parsed_rows, default_created_at)?;

    if dry_run {
        return Ok(ImportExecutionResult {
            dry_run: true,
            import_id: None,
            message: "Validation passed. No expenses were written.".to_string(),
            summary: validated.summary,
            source_used: source.kind.as_str(),
        });
    }

    let import_id = format!("imp_{}", Ulid::new());
    let inserted = insert_expense_batch(connection, db_path, &validated.rows, &import_id)?;
    info!(import_id = %import_id, inserted, "expense import committed");

    Ok(ImportExecutionResult {
        dry_run: false,
        import_id: Some(import_id),
        message: format!("Imported {inserted} expenses."),
        summary: ImportSummary {
            inserted: inserted as i64,
            ..validated.summary
        },
        source_used: source.kind.as_str(),
    })
}

pub(crate) fn invalid_input_error(message: &str) -> ClientError {
    ClientError::invalid_argument_with_recovery(
        message,
        vec![
            "Provide a JSON array or CSV input via path or stdin.".to_string(),
            format!("Run `{IMPORT_HELP_COMMAND}` to confirm import field requirements."),
        ],
    )
    .with_data(json!({
        "help_command": IMPORT_HELP_COMMAND,
    }))
}
