use std::path::Path;

use chrono::{NaiveDateTime, Timelike};
use ulid::Ulid;

use crate::budget::aggregate::{classified_total, find_taxonomy_mismatches};
use crate::budget::period::Period;
use crate::budget::types::{
    Expense, classify_input, parse_date_or_timestamp, validate_positive_amount,
};
use crate::clock::{Clock, clock_or_system};
use crate::commands::common::open;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{ExpenseData, ExpenseDeleteData, ExpenseListData, ExpenseRecord};
use crate::storage::ExpenseStore;
use crate::{ClientError, ClientResult};

const AMOUNT_FIELD: &str = "expense amount";

#[derive(Debug, Default)]
pub struct ExpenseAddOptions<'a> {
    pub category: String,
    pub subcategory: String,
    pub amount: f64,
    pub note: Option<String>,
    /// `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`; defaults to the clock's now.
    pub date: Option<String>,
    pub home_override: Option<&'a Path>,
    pub clock: Option<&'a dyn Clock>,
}

/// Fields left as `None` keep their stored value. An empty `note` clears it.
#[derive(Debug, Default)]
pub struct ExpenseUpdateOptions<'a> {
    pub expense_id: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub amount: Option<f64>,
    pub note: Option<String>,
    pub date: Option<String>,
    pub home_override: Option<&'a Path>,
}

#[derive(Debug, Default)]
pub struct ExpenseDeleteOptions<'a> {
    pub expense_id: String,
    pub home_override: Option<&'a Path>,
}

#[derive(Debug, Default)]
pub struct ExpenseListOptions<'a> {
    pub period: Option<String>,
    pub home_override: Option<&'a Path>,
}

pub fn add(
    category: String,
    subcategory: String,
    amount: f64,
    note: Option<String>,
    date: Option<String>,
) -> ClientResult<SuccessEnvelope> {
    add_with_options(ExpenseAddOptions {
        category,
        subcategory,
        amount,
        note,
        date,
        ..ExpenseAddOptions::default()
    })
}

#[doc(hidden)]
pub fn add_with_options(options: ExpenseAddOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let pair = classify_input(&options.category, &options.subcategory)?;
    let amount = validate_positive_amount(options.amount, AMOUNT_FIELD)?;
    let created_at = match options.date.as_deref() {
        Some(value) => parse_created_at(value, "expense add")?,
        None => whole_seconds(clock_or_system(options.clock).now()),
    };

    let expense = Expense {
        id: format!("exp_{}", Ulid::new()),
        category: pair.category,
        subcategory: pair.name.to_string(),
        amount,
        note: normalize_note(options.note),
        created_at,
    };

    let store = open(options.home_override)?;
    ExpenseStore::new(&store.connection, &store.context.db_path).insert(&expense)?;

    success(
        "expense add",
        ExpenseData {
            expense: ExpenseRecord::from(&expense),
        },
    )
}

pub fn update_with_options(options: ExpenseUpdateOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let nothing_to_change = options.category.is_none()
        && options.subcategory.is_none()
        && options.amount.is_none()
        && options.note.is_none()
        && options.date.is_none();
    if nothing_to_change {
        return Err(ClientError::invalid_argument_for_command(
            "Provide at least one of --category, --subcategory, --amount, --note or --date.",
            Some("expense update"),
        ));
    }

    let store = open(options.home_override)?;
    let expenses = ExpenseStore::new(&store.connection, &store.context.db_path);
    let Some(mut expense) = expenses.get(&options.expense_id)? else {
        return Err(ClientError::expense_not_found(&options.expense_id));
    };

    if options.category.is_some() || options.subcategory.is_some() {
        let category = options
            .category
            .unwrap_or_else(|| expense.category.as_str().to_string());
        let subcategory = options
            .subcategory
            .unwrap_or_else(|| expense.subcategory.clone());
        let pair = classify_input(&category, &subcategory)?;
        expense.category = pair.category;
        expense.subcategory = pair.name.to_string();
    }
    if let Some(amount) = options.amount {
        expense.amount = validate_positive_amount(amount, AMOUNT_FIELD)?;
    }
    if let Some(note) = options.note {
        expense.note = normalize_note(Some(note));
    }
    if let Some(date) = options.date.as_deref() {
        expense.created_at = parse_created_at(date, "expense update")?;
    }

    expenses.update(&expense)?;

    success(
        "expense update",
        ExpenseData {
            expense: ExpenseRecord::from(&expense),
        },
    )
}

pub fn delete(expense_id: String) -> ClientResult<SuccessEnvelope> {
    delete_with_options(ExpenseDeleteOptions {
        expense_id,
        home_override: None,
    })
}

#[doc(hidden)]
pub fn delete_with_options(options: ExpenseDeleteOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let store = open(options.home_override)?;
    ExpenseStore::new(&store.connection, &store.context.db_path).delete(&options.expense_id)?;
    success(
        "expense delete",
        ExpenseDeleteData {
            expense_id: options.expense_id,
            deleted: true,
        },
    )
}

pub fn list(period: Option<String>) -> ClientResult<SuccessEnvelope> {
    list_with_options(ExpenseListOptions {
        period,
        home_override: None,
    })
}

#[doc(hidden)]
pub fn list_with_options(options: ExpenseListOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let period = options
        .period
        .as_deref()
        .map(|value| Period::parse(value, "expense list"))
        .transpose()?;

    let store = open(options.home_override)?;
    let expenses = ExpenseStore::new(&store.connection, &store.context.db_path);
    let rows = match period {
        Some(value) => expenses.list_for_period(value)?,
        None => expenses.list_all()?,
    };

    success(
        "expense list",
        ExpenseListData {
            period: period.map(|value| value.key()),
            total: classified_total(&rows),
            expenses: rows.iter().map(ExpenseRecord::from).collect(),
            mismatches: find_taxonomy_mismatches(&rows),
        },
    )
}

fn parse_created_at(value: &str, command: &str) -> ClientResult<NaiveDateTime> {
    parse_date_or_timestamp(value).ok_or_else(|| {
        ClientError::invalid_argument_for_command(
            &format!("`date` must be YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS; got `{value}`."),
            Some(command),
        )
    })
}

fn normalize_note(note: Option<String>) -> Option<String> {
    note.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn whole_seconds(timestamp: NaiveDateTime) -> NaiveDateTime {
    timestamp.with_nanosecond(0).unwrap_or(timestamp)
}
