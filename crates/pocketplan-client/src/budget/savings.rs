use std::collections::BTreeMap;

use serde::Serialize;

use crate::budget::period::Period;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodSurplus {
    pub period: Period,
    pub salary: f64,
    pub spent: f64,
    pub surplus: f64,
    /// Only positive surpluses feed the cumulative figure.
    pub counted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsReport {
    pub periods: Vec<PeriodSurplus>,
    pub total: f64,
}

/// Per-period surplus for every period that has a salary, oldest first.
///
/// Deficits are floored at zero per period rather than netted against other
/// months; periods with spend but no salary are ignored.
pub fn savings_report(
    salaries: &BTreeMap<Period, f64>,
    spend_by_period: &BTreeMap<Period, f64>,
) -> SavingsReport {
    let periods = salaries
        .iter()
        .map(|(period, salary)| {
            let spent = spend_by_period.get(period).copied().unwrap_or(0.0);
            let surplus = salary - spent;
            PeriodSurplus {
                period: *period,
                salary: *salary,
                spent,
                surplus,
                counted: surplus > 0.0,
            }
        })
        .collect::<Vec<PeriodSurplus>>();

    let total = periods
        .iter()
        .filter(|row| row.counted)
        .map(|row| row.surplus)
        .sum();

    SavingsReport { periods, total }
}

pub fn cumulative_savings(
    salaries: &BTreeMap<Period, f64>,
    spend_by_period: &BTreeMap<Period, f64>,
) -> f64 {
    savings_report(salaries, spend_by_period).total
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    use super::{cumulative_savings, savings_report};
    use crate::budget::aggregate::totals_by_period;
    use crate::budget::period::Period;
    use crate::budget::taxonomy::Category;
    use crate::budget::types::Expense;

    fn period(year: i32, month: u32) -> Period {
        match Period::new(year, month) {
            Some(value) => value,
            None => panic!("invalid test period {year}-{month}"),
        }
    }

    fn expense(id: &str, year: i32, month: u32, amount: f64) -> Expense {
        let created_at =
            NaiveDate::from_ymd_opt(year, month, 10).and_then(|d| d.and_hms_opt(9, 0, 0));
        match created_at {
            Some(created_at) => Expense {
                id: id.to_string(),
                category: Category::Variable,
                subcategory: "Food".to_string(),
                amount,
                note: None,
                created_at,
            },
            None => panic!("invalid test date {year}-{month}"),
        }
    }

    #[test]
    fn deficits_are_excluded_not_netted() {
        let salaries = BTreeMap::from([(period(2024, 1), 30000.0), (period(2024, 2), 30000.0)]);
        let spend = BTreeMap::from([(period(2024, 1), 40000.0), (period(2024, 2), 10000.0)]);
        assert_eq!(cumulative_savings(&salaries, &spend), 20000.0);

        let report = savings_report(&salaries, &spend);
        assert_eq!(report.periods.len(), 2);
        assert!(!report.periods[0].counted);
        assert_eq!(report.periods[0].surplus, -10000.0);
        assert!(report.periods[1].counted);
    }

    #[test]
    fn salary_without_spend_counts_in_full_and_spend_without_salary_is_ignored() {
        let salaries = BTreeMap::from([(period(2024, 3), 1000.0)]);
        let spend = BTreeMap::from([(period(2024, 4), 5000.0), (period(2023, 1), 10.0)]);
        let report = savings_report(&salaries, &spend);
        assert_eq!(report.total, 1000.0);
        assert_eq!(report.periods.len(), 1);
        assert_eq!(report.periods[0].spent, 0.0);
    }

    #[test]
    fn result_is_independent_of_expense_order() {
        let mut expenses = vec![
            expense("a", 2024, 2, 300.0),
            expense("b", 2023, 11, 200.5),
            expense("c", 2023, 12, 1000.0),
            expense("d", 2023, 11, 0.25),
            expense("e", 2023, 12, 500.0),
        ];
        let salaries = BTreeMap::from([
            (period(2023, 11), 1200.5),
            (period(2024, 1), 800.25),
            (period(2023, 12), 999.75),
            (period(2024, 2), 100.0),
        ]);

        let baseline = cumulative_savings(&salaries, &totals_by_period(&expenses));
        assert_eq!(baseline, 999.75 + 800.25);

        // Every rotation of the raw snapshot feeds the same surplus set.
        for _ in 0..expenses.len() {
            expenses.rotate_left(1);
            let spend = totals_by_period(&expenses);
            assert_eq!(cumulative_savings(&salaries, &spend), baseline);
        }
        expenses.reverse();
        assert_eq!(cumulative_savings(&salaries, &totals_by_period(&expenses)), baseline);
    }

    #[test]
    fn no_salaries_means_no_savings() {
        let spend = BTreeMap::from([(period(2024, 1), 50.0)]);
        assert_eq!(cumulative_savings(&BTreeMap::new(), &spend), 0.0);
    }
}
