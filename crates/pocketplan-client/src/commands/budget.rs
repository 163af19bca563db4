use std::path::Path;

use tracing::debug;

use crate::ClientResult;
use crate::budget::aggregate::{aggregate_period, totals_by_period};
use crate::budget::evaluate::build_snapshot;
use crate::budget::policy::{ALLOCATION_POLICY_V1, ALLOCATION_POLICY_VERSION};
use crate::budget::salary::SalaryLedger;
use crate::budget::savings::cumulative_savings;
use crate::clock::{Clock, clock_or_system};
use crate::commands::common::{open, period_or_current};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::BudgetData;
use crate::storage::{ExpenseStore, SqliteSalaryStore};

#[derive(Debug, Default)]
pub struct BudgetOptions<'a> {
    pub period: Option<String>,
    pub home_override: Option<&'a Path>,
    pub clock: Option<&'a dyn Clock>,
}

pub fn run(period: Option<String>) -> ClientResult<SuccessEnvelope> {
    run_with_options(BudgetOptions {
        period,
        ..BudgetOptions::default()
    })
}

/// The dashboard view for one period: resolved salary, recommended vs actual
/// per category, subcategory breakdown, remaining and savings figures.
#[doc(hidden)]
pub fn run_with_options(options: BudgetOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let clock = clock_or_system(options.clock);
    let period = period_or_current(options.period.as_deref(), "budget", clock)?;
    let store = open(options.home_override)?;
    let db_path = store.context.db_path.as_path();

    // Resolve first so an anchored salary is part of the savings walk.
    let mut ledger = SalaryLedger::new(SqliteSalaryStore::new(&store.connection, db_path));
    let resolved = ledger.resolve(period)?;
    let salaries = ledger.all()?;
    let expenses = ExpenseStore::new(&store.connection, db_path).list_all()?;

    let aggregate = aggregate_period(&expenses, period);
    let snapshot = build_snapshot(
        resolved.map(|value| value.value),
        &aggregate.category_totals,
        ALLOCATION_POLICY_V1,
    );
    let savings = cumulative_savings(&salaries, &totals_by_period(&expenses));
    debug!(
        period = %period,
        expenses = expenses.len(),
        salaries = salaries.len(),
        "budget computed"
    );

    success(
        "budget",
        BudgetData {
            period: period.key(),
            policy_version: ALLOCATION_POLICY_VERSION.to_string(),
            salary: snapshot.salary,
            salary_carried_forward: resolved.is_some_and(|value| value.was_carried_forward),
            salary_source_period: resolved
                .and_then(|value| value.source_period)
                .map(|source| source.key()),
            over_budget: snapshot.over_budget_categories().collect(),
            categories: snapshot.categories,
            subcategories: aggregate.subcategories,
            total_spent: snapshot.total_spent,
            remaining: snapshot.remaining,
            suggested_savings: snapshot.suggested_savings,
            cumulative_savings: savings,
            mismatches: aggregate.mismatches,
        },
    )
}
