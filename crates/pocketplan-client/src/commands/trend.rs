use std::path::Path;

use crate::ClientResult;
use crate::budget::aggregate::find_taxonomy_mismatches;
use crate::budget::trend::trend;
use crate::commands::common::open;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::TrendData;
use crate::storage::ExpenseStore;

#[derive(Debug, Default)]
pub struct TrendOptions<'a> {
    pub home_override: Option<&'a Path>,
}

pub fn run() -> ClientResult<SuccessEnvelope> {
    run_with_options(TrendOptions::default())
}

#[doc(hidden)]
pub fn run_with_options(options: TrendOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let store = open(options.home_override)?;
    let expenses = ExpenseStore::new(&store.connection, &store.context.db_path).list_all()?;
    let points = trend(&expenses);

    success(
        "trend",
        TrendData {
            total: points.iter().map(|point| point.total).sum(),
            points,
            mismatches: find_taxonomy_mismatches(&expenses),
        },
    )
}
