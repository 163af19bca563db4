use std::path::Path;

use crate::ClientResult;
use crate::budget::period::Period;
use crate::clock::Clock;
use crate::setup::{OpenStore, open_store};

pub(crate) fn open(home_override: Option<&Path>) -> ClientResult<OpenStore> {
    open_store(home_override)
}

/// `--period` when given, otherwise the clock's current month.
pub(crate) fn period_or_current(
    period: Option<&str>,
    command: &str,
    clock: &dyn Clock,
) -> ClientResult<Period> {
    match period {
        Some(value) => Period::parse(value, command),
        None => Ok(clock.current_period()),
    }
}
