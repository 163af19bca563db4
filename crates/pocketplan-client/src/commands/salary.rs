use std::path::Path;

use crate::ClientResult;
use crate::budget::salary::{CARRY_FORWARD_LIMIT, SalaryLedger};
use crate::clock::{Clock, clock_or_system};
use crate::commands::common::{open, period_or_current};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{SalaryListData, SalarySetData, SalaryShowData};
use crate::storage::{SalarySource, SqliteSalaryStore};

#[derive(Debug, Default)]
pub struct SalarySetOptions<'a> {
    pub amount: f64,
    pub period: Option<String>,
    pub home_override: Option<&'a Path>,
    pub clock: Option<&'a dyn Clock>,
}

#[derive(Debug, Default)]
pub struct SalaryShowOptions<'a> {
    pub period: Option<String>,
    pub home_override: Option<&'a Path>,
    pub clock: Option<&'a dyn Clock>,
}

#[derive(Debug, Default)]
pub struct SalaryListOptions<'a> {
    pub home_override: Option<&'a Path>,
}

pub fn set(amount: f64, period: Option<String>) -> ClientResult<SuccessEnvelope> {
    set_with_options(SalarySetOptions {
        amount,
        period,
        ..SalarySetOptions::default()
    })
}

#[doc(hidden)]
pub fn set_with_options(options: SalarySetOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let clock = clock_or_system(options.clock);
    let period = period_or_current(options.period.as_deref(), "salary set", clock)?;
    let store = open(options.home_override)?;

    let mut ledger = SalaryLedger::new(SqliteSalaryStore::new(
        &store.connection,
        &store.context.db_path,
    ));
    let amount = ledger.set(period, options.amount)?;

    success(
        "salary set",
        SalarySetData {
            period: period.key(),
            amount,
            source: SalarySource::Saved.as_str().to_string(),
        },
    )
}

pub fn show(period: Option<String>) -> ClientResult<SuccessEnvelope> {
    show_with_options(SalaryShowOptions {
        period,
        ..SalaryShowOptions::default()
    })
}

/// Resolves the salary for a period, anchoring a carried-forward value.
#[doc(hidden)]
pub fn show_with_options(options: SalaryShowOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let clock = clock_or_system(options.clock);
    let period = period_or_current(options.period.as_deref(), "salary show", clock)?;
    let store = open(options.home_override)?;

    let mut ledger = SalaryLedger::new(SqliteSalaryStore::new(
        &store.connection,
        &store.context.db_path,
    ));
    let resolved = ledger.resolve(period)?;

    success(
        "salary show",
        SalaryShowData {
            period: period.key(),
            salary: resolved.map(|value| value.value),
            was_carried_forward: resolved.is_some_and(|value| value.was_carried_forward),
            source_period: resolved
                .and_then(|value| value.source_period)
                .map(|source| source.key()),
            carry_forward_limit: CARRY_FORWARD_LIMIT,
        },
    )
}

pub fn list() -> ClientResult<SuccessEnvelope> {
    list_with_options(SalaryListOptions::default())
}

#[doc(hidden)]
pub fn list_with_options(options: SalaryListOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let store = open(options.home_override)?;
    let salaries = SqliteSalaryStore::new(&store.connection, &store.context.db_path).entries()?;
    success("salary list", SalaryListData { salaries })
}
