use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::ClientResult;
use crate::budget::period::Period;
use crate::budget::types::validate_positive_amount;

/// How far back `resolve` looks for a salary to carry forward.
pub const CARRY_FORWARD_LIMIT: usize = 12;

/// Key-value persistence for one salary scalar per period.
///
/// `set` is an authoritative save. `set_if_absent` is the anchoring write and
/// must only store when the period has no value yet, returning whether it
/// wrote.
pub trait SalaryStore {
    fn get(&self, period: Period) -> ClientResult<Option<f64>>;
    fn set(&mut self, period: Period, value: f64) -> ClientResult<()>;
    fn set_if_absent(&mut self, period: Period, value: f64) -> ClientResult<bool>;
    /// Every period holding a value, oldest first.
    fn list_periods(&self) -> ClientResult<Vec<Period>>;
}

#[derive(Debug, Default, Clone)]
pub struct MemorySalaryStore {
    values: BTreeMap<Period, f64>,
}

impl MemorySalaryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SalaryStore for MemorySalaryStore {
    fn get(&self, period: Period) -> ClientResult<Option<f64>> {
        Ok(self.values.get(&period).copied())
    }

    fn set(&mut self, period: Period, value: f64) -> ClientResult<()> {
        self.values.insert(period, value);
        Ok(())
    }

    fn set_if_absent(&mut self, period: Period, value: f64) -> ClientResult<bool> {
        if self.values.contains_key(&period) {
            return Ok(false);
        }
        self.values.insert(period, value);
        Ok(true)
    }

    fn list_periods(&self) -> ClientResult<Vec<Period>> {
        Ok(self.values.keys().copied().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedSalary {
    pub period: Period,
    pub value: f64,
    pub was_carried_forward: bool,
    /// The period the value was copied from when carried forward.
    pub source_period: Option<Period>,
}

/// Salary rules layered over a [`SalaryStore`].
#[derive(Debug)]
pub struct SalaryLedger<S> {
    store: S,
}

impl<S: SalaryStore> SalaryLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn get(&self, period: Period) -> ClientResult<Option<f64>> {
        self.store.get(period)
    }

    /// Saves an authoritative salary for `period`, rejecting non-positive values.
    pub fn set(&mut self, period: Period, value: f64) -> ClientResult<f64> {
        let amount = validate_positive_amount(value, "salary")?;
        self.store.set(period, amount)?;
        debug!(period = %period, amount, "saved salary");
        Ok(amount)
    }

    /// Reads the salary for `period`, anchoring the nearest prior value when
    /// the period has none. Absent when nothing exists within
    /// [`CARRY_FORWARD_LIMIT`] prior periods.
    pub fn resolve(&mut self, period: Period) -> ClientResult<Option<ResolvedSalary>> {
        if let Some(value) = self.store.get(period)? {
            return Ok(Some(ResolvedSalary {
                period,
                value,
                was_carried_forward: false,
                source_period: None,
            }));
        }

        let mut candidate = period;
        for _ in 0..CARRY_FORWARD_LIMIT {
            candidate = candidate.previous();
            let Some(value) = self.store.get(candidate)? else {
                continue;
            };

            if self.store.set_if_absent(period, value)? {
                info!(
                    period = %period,
                    from = %candidate,
                    amount = value,
                    "carried salary forward"
                );
                return Ok(Some(ResolvedSalary {
                    period,
                    value,
                    was_carried_forward: true,
                    source_period: Some(candidate),
                }));
            }

            // Another writer anchored the period first; its value wins.
            return Ok(self.store.get(period)?.map(|stored| ResolvedSalary {
                period,
                value: stored,
                was_carried_forward: false,
                source_period: None,
            }));
        }

        debug!(period = %period, "no salary within carry-forward window");
        Ok(None)
    }

    /// Every stored salary keyed by period.
    pub fn all(&self) -> ClientResult<BTreeMap<Period, f64>> {
        let mut values = BTreeMap::new();
        for period in self.store.list_periods()? {
            if let Some(value) = self.store.get(period)? {
                values.insert(period, value);
            }
        }
        Ok(values)
    }
}
