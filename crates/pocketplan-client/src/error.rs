use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

use crate::contracts::types::{ImportIssue, ImportSummary};

pub(crate) const IMPORT_HELP_COMMAND: &str = "pocketplan expense import --help";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `pocketplan {cmd} --help` for usage."),
            None => "Run `pocketplan --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    /// Rejects a salary or expense amount before it can reach aggregation.
    pub fn invalid_amount(field: &str, received: f64) -> Self {
        Self::new(
            "invalid_amount",
            &format!("Enter a valid {field}: amount must be a number greater than zero."),
            vec![format!(
                "Retry with a positive {field}, for example `50000` or `1250.50`."
            )],
        )
        .with_data(json!({
            "field": field,
            "received": received.to_string(),
        }))
    }

    pub fn taxonomy_mismatch(category: &str, subcategory: &str) -> Self {
        Self::new(
            "taxonomy_mismatch",
            &format!("Subcategory `{subcategory}` does not belong to category `{category}`."),
            vec![
                "Run `pocketplan categories` to list every category with its subcategories."
                    .to_string(),
                "Retry with a subcategory listed under the chosen category.".to_string(),
            ],
        )
        .with_data(json!({
            "category": category,
            "subcategory": subcategory,
        }))
    }

    pub fn unknown_category(received: &str) -> Self {
        Self::new(
            "taxonomy_mismatch",
            &format!("Unknown category `{received}`."),
            vec![
                "Use one of: fixed, variable, periodic.".to_string(),
                "Run `pocketplan categories` to see the full taxonomy.".to_string(),
            ],
        )
        .with_data(json!({
            "category": received,
        }))
    }

    pub fn expense_not_found(expense_id: &str) -> Self {
        Self::new(
            "expense_not_found",
            &format!("Expense id `{expense_id}` was not found."),
            vec![
                "Run `pocketplan expense list` to find a valid expense id.".to_string(),
                "Retry with that id.".to_string(),
            ],
        )
        .with_data(json!({
            "expense_id": expense_id,
        }))
    }

    pub fn invalid_import_format(message: &str, received_format: &str) -> Self {
        Self::new(
            "invalid_import_format",
            message,
            vec![
                "Provide a supported import format (JSON array or CSV).".to_string(),
                format!("Run `{IMPORT_HELP_COMMAND}` to confirm field requirements."),
            ],
        )
        .with_data(json!({
            "received_format": received_format,
            "supported_formats": ["json_array", "csv"],
            "help_command": IMPORT_HELP_COMMAND,
        }))
    }

    pub fn import_schema_mismatch(
        expected_headers: Vec<String>,
        actual_headers: Vec<String>,
    ) -> Self {
        Self::new(
            "import_schema_mismatch",
            "CSV headers do not satisfy the expense import schema.",
            vec![
                "Include category, subcategory and amount headers.".to_string(),
                "Optional headers are note and created_at; do not include unknown headers."
                    .to_string(),
                "Rerun `pocketplan expense import --dry-run <path>`.".to_string(),
            ],
        )
        .with_data(json!({
            "expected_headers": expected_headers,
            "actual_headers": actual_headers,
            "help_command": IMPORT_HELP_COMMAND,
        }))
    }

    pub fn import_validation_failed(summary: ImportSummary, issues: Vec<ImportIssue>) -> Self {
        let issue_count = summary.rows_invalid;
        Self::new(
            "import_validation_failed",
            &format!(
                "Import failed validation: {issue_count} rows need fixes. No expenses were written."
            ),
            vec![
                "Fix the listed issues in your source file.".to_string(),
                "Rerun pocketplan expense import --dry-run <path>.".to_string(),
                "Then rerun pocketplan expense import <path>.".to_string(),
            ],
        )
        .with_data(json!({
            "summary": summary,
            "issues": issues,
        }))
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }

    pub fn store_init_permission_denied(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_init_permission_denied",
            &format!("Cannot initialize budget store at `{location}`: {detail}"),
            vec![format!(
                "Grant write access to `{location}` or set `POCKETPLAN_HOME` to a writable directory."
            )],
        )
    }

    pub fn store_locked(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_locked",
            &format!("Budget database is locked at `{location}`."),
            vec![format!(
                "Close other processes using `{location}` so the lock is released."
            )],
        )
    }

    pub fn store_corrupt(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_corrupt",
            &format!("Budget database appears corrupt at `{location}`."),
            vec![format!(
                "Replace `{location}` with a valid SQLite budget file or restore from backup."
            )],
        )
    }

    pub fn migration_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "migration_failed",
            &format!("Budget store migration failed at `{location}`: {detail}"),
            vec!["Resolve conflicting schema objects referenced in the error details.".to_string()],
        )
    }

    pub fn store_init_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_init_failed",
            &format!("Budget store initialization failed at `{location}`: {detail}"),
            Vec::new(),
        )
    }

    /// Store-level failures are operational problems rather than user input mistakes.
    pub fn is_internal(&self) -> bool {
        self.code.starts_with("internal_")
            || matches!(
                self.code.as_str(),
                "store_init_permission_denied"
                    | "store_locked"
                    | "store_corrupt"
                    | "migration_failed"
                    | "store_init_failed"
            )
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
