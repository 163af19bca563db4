use std::fmt;

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::budget::period::Period;

/// Source of "now" for period resolution and default expense timestamps.
pub trait Clock: fmt::Debug {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }

    fn current_period(&self) -> Period {
        Period::of_date(self.today())
    }
}

/// Wall clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Noon on the given date, or `None` for an impossible date.
    pub fn on(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

pub(crate) static SYSTEM_CLOCK: SystemClock = SystemClock;

pub(crate) fn clock_or_system<'a>(clock: Option<&'a dyn Clock>) -> &'a dyn Clock {
    clock.unwrap_or(&SYSTEM_CLOCK)
}
