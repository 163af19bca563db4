use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Timelike};

use crate::budget::period::Period;
use crate::budget::taxonomy::{self, Category, SubcategoryRef};
use crate::{ClientError, ClientResult};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A snapshot of one recorded expense.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: String,
    pub category: Category,
    pub subcategory: String,
    pub amount: f64,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Expense {
    pub fn period(&self) -> Period {
        Period::of_datetime(&self.created_at)
    }

    /// The taxonomy pair this expense belongs to, if the pair exists.
    pub fn classification(&self) -> Option<SubcategoryRef> {
        taxonomy::lookup(self.category, &self.subcategory)
    }
}

/// Boundary check for user-entered salary and expense amounts.
pub fn validate_positive_amount(value: f64, field: &str) -> ClientResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ClientError::invalid_amount(field, value));
    }
    Ok(value)
}

/// Resolves user-entered category and subcategory text to a taxonomy pair.
pub fn classify_input(category: &str, subcategory: &str) -> ClientResult<SubcategoryRef> {
    let parsed = Category::parse(category).ok_or_else(|| ClientError::unknown_category(category))?;
    taxonomy::resolve_input(parsed, subcategory)
        .ok_or_else(|| ClientError::taxonomy_mismatch(parsed.as_str(), subcategory.trim()))
}

/// Accepts a local `YYYY-MM-DDTHH:MM:SS` timestamp, a bare `YYYY-MM-DD`
/// date (midnight), or an RFC 3339 instant such as `2024-01-15T09:30:00.000Z`,
/// which is shifted to local time with sub-seconds dropped.
pub fn parse_date_or_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    parse_timestamp(trimmed)
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .or_else(|| parse_rfc3339_as_local(trimmed))
}

fn parse_rfc3339_as_local(value: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(value)
        .ok()?
        .with_timezone(&Local)
        .naive_local()
        .with_nanosecond(0)
}

pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).ok()
}
