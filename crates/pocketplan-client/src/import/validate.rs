use std::collections::HashSet;

use chrono::NaiveDateTime;
use ulid::Ulid;

use crate::budget::types::{Expense, classify_input, parse_date_or_timestamp};
use crate::contracts::types::{ImportIssue, ImportSummary};
use crate::import::parse::ParsedRow;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub(crate) struct ValidatedRows {
    pub(crate) rows: Vec<Expense>,
    pub(crate) summary: ImportSummary,
}

/// Turns every parsed row into an expense or a list of issues. Any issue
/// fails the whole batch.
pub(crate) fn validate_rows(
    parsed_rows: Vec<ParsedRow>,
    default_created_at: NaiveDateTime,
) -> ClientResult<ValidatedRows> {
    let total_rows = parsed_rows.len();
    let mut rows = Vec::new();
    let mut issues = Vec::new();

    for raw in parsed_rows {
        let mut row_issues = Vec::new();

        let category = required(raw.row, "category", raw.category, &mut row_issues);
        let subcategory = required(raw.row, "subcategory", raw.subcategory, &mut row_issues);
        let classification = match (category, subcategory) {
            (Some(category), Some(subcategory)) => {
                match classify_input(&category, &subcategory) {
                    Ok(pair) => Some(pair),
                    Err(error) => {
                        row_issues.push(ImportIssue {
                            row: raw.row,
                            field: "subcategory".to_string(),
                            code: "taxonomy_mismatch".to_string(),
                            description: error.message,
                            expected: Some(
                                "a pair listed by `pocketplan categories`".to_string(),
                            ),
                            received: Some(format!("{category} / {subcategory}")),
                        });
                        None
                    }
                }
            }
            _ => None,
        };
        let amount = validate_amount(raw.row, raw.amount, &mut row_issues);
        let created_at = validate_created_at(raw.row, raw.created_at, &mut row_issues);

        if let (true, Some(pair), Some(amount)) = (row_issues.is_empty(), classification, amount) {
            rows.push(Expense {
                id: format!("exp_{}", Ulid::new()),
                category: pair.category,
                subcategory: pair.name.to_string(),
                amount,
                note: normalize_optional(raw.note),
                created_at: created_at.unwrap_or(default_created_at),
            });
        } else {
            issues.extend(row_issues);
        }
    }

    let summary = ImportSummary {
        rows_read: total_rows as i64,
        rows_valid: rows.len() as i64,
        rows_invalid: issues
            .iter()
            .map(|issue| issue.row)
            .collect::<HashSet<i64>>()
            .len() as i64,
        inserted: 0,
    };

    if !issues.is_empty() {
        return Err(ClientError::import_validation_failed(summary, issues));
    }

    Ok(ValidatedRows { rows, summary })
}

fn required(
    row: i64,
    field: &str,
    value: Option<String>,
    issues: &mut Vec<ImportIssue>,
) -> Option<String> {
    let normalized = normalize_optional(value);
    if normalized.is_none() {
        issues.push(ImportIssue {
            row,
            field: field.to_string(),
            code: "missing_required_field".to_string(),
            description: format!("{field} must be present and non-empty."),
            expected: Some("non-empty string".to_string()),
            received: Some(String::new()),
        });
    }
    normalized
}

fn validate_amount(row: i64, value: Option<String>, issues: &mut Vec<ImportIssue>) -> Option<f64> {
    let Some(candidate) = normalize_optional(value) else {
        issues.push(ImportIssue {
            row,
            field: "amount".to_string(),
            code: "missing_required_field".to_string(),
            description: "amount must be present and non-empty.".to_string(),
            expected: Some("number greater than zero (e.g. 42.15)".to_string()),
            received: Some(String::new()),
        });
        return None;
    };

    match candidate.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount > 0.0 => Some(amount),
        Ok(_) => {
            issues.push(ImportIssue {
                row,
                field: "amount".to_string(),
                code: "invalid_amount".to_string(),
                description: format!("amount must be greater than zero; got \"{candidate}\""),
                expected: Some("number greater than zero (e.g. 42.15)".to_string()),
                received: Some(candidate),
            });
            None
        }
        Err(_) => {
            issues.push(ImportIssue {
                row,
                field: "amount".to_string(),
                code: "invalid_number".to_string(),
                description: format!("amount must be numeric; got \"{candidate}\""),
                expected: Some("number greater than zero (e.g. 42.15)".to_string()),
                received: Some(candidate),
            });
            None
        }
    }
}

fn validate_created_at(
    row: i64,
    value: Option<String>,
    issues: &mut Vec<ImportIssue>,
) -> Option<NaiveDateTime> {
    let candidate = normalize_optional(value)?;
    let parsed = parse_date_or_timestamp(&candidate);
    if parsed.is_none() {
        issues.push(ImportIssue {
            row,
            field: "created_at".to_string(),
            code: "invalid_date".to_string(),
            description: format!(
                "created_at must be YYYY-MM-DD, YYYY-MM-DDTHH:MM:SS or RFC 3339; got \"{candidate}\""
            ),
            expected: Some("YYYY-MM-DD".to_string()),
            received: Some(candidate),
        });
    }
    parsed
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    let raw = value?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}
