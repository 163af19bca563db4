use std::collections::HashMap;

use serde_json::Value;

use crate::import::invalid_input_error;
use crate::{ClientError, ClientResult};

pub(crate) const REQUIRED_FIELDS: [&str; 3] = ["category", "subcategory", "amount"];
pub(crate) const OPTIONAL_FIELDS: [&str; 2] = ["note", "created_at"];

/// One source row with every field still as raw text.
#[derive(Debug, Clone, Default)]
pub(crate) struct ParsedRow {
    pub(crate) row: i64,
    pub(crate) category: Option<String>,
    pub(crate) subcategory: Option<String>,
    pub(crate) amount: Option<String>,
    pub(crate) note: Option<String>,
    pub(crate) created_at: Option<String>,
}

pub(crate) fn parse_source(content: &str) -> ClientResult<Vec<ParsedRow>> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(invalid_input_error("Import source is empty."));
    }

    if trimmed.starts_with('[') {
        return parse_json_array(trimmed);
    }

    if serde_json::from_str::<Value>(trimmed).is_ok() {
        return Err(ClientError::invalid_import_format(
            "JSON input must be a top-level array of expense objects.",
            "json_non_array",
        ));
    }

    if looks_like_csv(trimmed) {
        return parse_csv(trimmed);
    }

    Err(ClientError::invalid_import_format(
        "Unsupported import format. Provide a JSON array or CSV with headers.",
        "unknown",
    ))
}

fn parse_json_array(content: &str) -> ClientResult<Vec<ParsedRow>> {
    let parsed = serde_json::from_str::<Value>(content)
        .map_err(|_| invalid_input_error("Invalid JSON input. Provide a valid JSON array."))?;

    let Some(items) = parsed.as_array() else {
        return Err(invalid_input_error(
            "JSON input must be a top-level array of expense objects.",
        ));
    };

    let mut rows = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let Some(object) = item.as_object() else {
            return Err(invalid_input_error(
                "JSON array entries must all be objects with expense fields.",
            ));
        };

        rows.push(ParsedRow {
            row: (index as i64) + 1,
            category: read_optional_string(object.get("category")),
            subcategory: read_optional_string(object.get("subcategory")),
            amount: read_optional_string(object.get("amount")),
            note: read_optional_string(object.get("note")),
            created_at: read_optional_string(
                object.get("created_at").or_else(|| object.get("createdAt")),
            ),
        });
    }

    Ok(rows)
}

fn parse_csv(content: &str) -> ClientResult<Vec<ParsedRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|_| invalid_input_error("CSV header row is missing or unreadable."))?
        .iter()
        .map(|value| value.to_ascii_lowercase())
        .collect::<Vec<String>>();

    if !headers_are_valid(&headers) {
        return Err(ClientError::import_schema_mismatch(
            expected_headers(),
            headers,
        ));
    }

    let index_by_name = headers
        .iter()
        .enumerate()
        .map(|(index, name)| (name.clone(), index))
        .collect::<HashMap<String, usize>>();

    let mut rows = Vec::new();
    for (row_index, result_row) in reader.records().enumerate() {
        let record =
            result_row.map_err(|_| invalid_input_error("CSV rows are malformed or not UTF-8."))?;

        rows.push(ParsedRow {
            row: (row_index as i64) + 1,
            category: value_for(&record, &index_by_name, "category"),
            subcategory: value_for(&record, &index_by_name, "subcategory"),
            amount: value_for(&record, &index_by_name, "amount"),
            note: value_for(&record, &index_by_name, "note"),
            created_at: value_for(&record, &index_by_name, "created_at"),
        });
    }

    Ok(rows)
}

fn value_for(
    record: &csv::StringRecord,
    index_by_name: &HashMap<String, usize>,
    field_name: &str,
) -> Option<String> {
    let index = index_by_name.get(field_name)?;
    record.get(*index).map(str::to_string)
}

fn read_optional_string(value: Option<&Value>) -> Option<String> {
    let current = value?;
    match current {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}

fn looks_like_csv(content: &str) -> bool {
    content
        .lines()
        .find(|line| !line.trim().is_empty())
        .is_some_and(|first_line| first_line.contains(','))
}

fn headers_are_valid(actual_headers: &[String]) -> bool {
    let has_required = REQUIRED_FIELDS
        .iter()
        .all(|required| actual_headers.iter().any(|header| header == required));
    let all_known = actual_headers.iter().all(|header| {
        REQUIRED_FIELDS.contains(&header.as_str()) || OPTIONAL_FIELDS.contains(&header.as_str())
    });
    has_required && all_known
}

fn expected_headers() -> Vec<String> {
    REQUIRED_FIELDS
        .iter()
        .chain(OPTIONAL_FIELDS.iter())
        .map(|value| value.to_string())
        .collect()
}
