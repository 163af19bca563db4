use serde::Serialize;

use crate::budget::aggregate::monthly_totals;
use crate::budget::types::Expense;

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub label: &'static str,
    pub total: f64,
}

/// Twelve calendar-month totals, January first, with years merged.
pub fn trend(expenses: &[Expense]) -> [TrendPoint; 12] {
    let totals = monthly_totals(expenses);
    std::array::from_fn(|index| TrendPoint {
        label: MONTH_LABELS[index],
        total: totals[index],
    })
}
