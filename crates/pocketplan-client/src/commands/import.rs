use std::path::Path;

use chrono::Timelike;

use crate::ClientResult;
use crate::clock::{Clock, clock_or_system};
use crate::commands::common::open;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::ImportData;
use crate::import;

#[derive(Debug, Default)]
pub struct ImportRunOptions<'a> {
    pub path: Option<String>,
    pub dry_run: bool,
    pub home_override: Option<&'a Path>,
    pub stdin_override: Option<String>,
    /// Timestamp for rows without `created_at`.
    pub clock: Option<&'a dyn Clock>,
}

pub fn run(path: Option<String>, dry_run: bool) -> ClientResult<SuccessEnvelope> {
    run_with_options(ImportRunOptions {
        path,
        dry_run,
        ..ImportRunOptions::default()
    })
}

#[doc(hidden)]
pub fn run_with_options(options: ImportRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let now = clock_or_system(options.clock).now();
    let default_created_at = now.with_nanosecond(0).unwrap_or(now);

    let mut store = open(options.home_override)?;
    let execution = import::execute(
        &mut store.connection,
        &store.context.db_path,
        options.path.as_deref(),
        options.dry_run,
        options.stdin_override,
        default_created_at,
    )?;

    success(
        "expense import",
        ImportData {
            dry_run: execution.dry_run,
            path: options.path,
            import_id: execution.import_id,
            message: execution.message,
            source_used: execution.source_used.to_string(),
            summary: execution.summary,
            issues: Vec::new(),
        },
    )
}
