use std::path::Path;

use crate::ClientResult;
use crate::budget::aggregate::{find_taxonomy_mismatches, totals_by_period};
use crate::budget::salary::SalaryLedger;
use crate::budget::savings::savings_report;
use crate::commands::common::open;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::SavingsData;
use crate::storage::{ExpenseStore, SqliteSalaryStore};

#[derive(Debug, Default)]
pub struct SavingsOptions<'a> {
    pub home_override: Option<&'a Path>,
}

pub fn run() -> ClientResult<SuccessEnvelope> {
    run_with_options(SavingsOptions::default())
}

/// Read-only: unlike `budget`, no period is resolved so nothing is anchored.
#[doc(hidden)]
pub fn run_with_options(options: SavingsOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let store = open(options.home_override)?;
    let db_path = store.context.db_path.as_path();

    let salaries = SalaryLedger::new(SqliteSalaryStore::new(&store.connection, db_path)).all()?;
    let expenses = ExpenseStore::new(&store.connection, db_path).list_all()?;
    let report = savings_report(&salaries, &totals_by_period(&expenses));

    success(
        "savings",
        SavingsData {
            periods: report.periods,
            total: report.total,
            mismatches: find_taxonomy_mismatches(&expenses),
        },
    )
}
