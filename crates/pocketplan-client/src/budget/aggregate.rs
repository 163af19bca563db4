use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::budget::period::Period;
use crate::budget::taxonomy::{self, Category, SubcategoryRef};
use crate::budget::types::Expense;

pub type CategoryAmounts = BTreeMap<Category, f64>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubcategoryTotal {
    pub category: Category,
    pub subcategory: &'static str,
    pub total: f64,
}

/// An expense whose (category, subcategory) pair is not in the taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxonomyMismatch {
    pub expense_id: String,
    pub category: Category,
    pub subcategory: String,
    pub amount: f64,
}

/// Everything the budget view needs for a single period.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodAggregate {
    pub period: Period,
    pub category_totals: CategoryAmounts,
    pub subcategories: Vec<SubcategoryTotal>,
    pub total_spent: f64,
    pub mismatches: Vec<TaxonomyMismatch>,
}

pub fn total_for_subcategory(
    expenses: &[Expense],
    subcategory: SubcategoryRef,
    period: Period,
) -> f64 {
    expenses
        .iter()
        .filter(|expense| subcategory.matches(expense.category, &expense.subcategory))
        .filter(|expense| period.contains(&expense.created_at))
        .map(|expense| expense.amount)
        .sum()
}

pub fn total_for_category(expenses: &[Expense], category: Category, period: Period) -> f64 {
    category
        .subcategory_refs()
        .map(|subcategory| total_for_subcategory(expenses, subcategory, period))
        .sum()
}

pub fn category_totals(expenses: &[Expense], period: Period) -> CategoryAmounts {
    Category::ALL
        .into_iter()
        .map(|category| (category, total_for_category(expenses, category, period)))
        .collect()
}

/// Non-zero subcategory totals for `period`, in taxonomy order.
pub fn subcategory_breakdown(expenses: &[Expense], period: Period) -> Vec<SubcategoryTotal> {
    taxonomy::all_subcategories()
        .filter_map(|subcategory| {
            let total = total_for_subcategory(expenses, subcategory, period);
            if total > 0.0 {
                Some(SubcategoryTotal {
                    category: subcategory.category,
                    subcategory: subcategory.name,
                    total,
                })
            } else {
                None
            }
        })
        .collect()
}

/// Classified spend per period across the whole collection.
pub fn totals_by_period(expenses: &[Expense]) -> BTreeMap<Period, f64> {
    let mut totals = BTreeMap::new();
    for expense in classified(expenses) {
        *totals.entry(expense.period()).or_insert(0.0) += expense.amount;
    }
    totals
}

/// Classified spend per calendar month, merging every year into the same slot.
pub fn monthly_totals(expenses: &[Expense]) -> [f64; 12] {
    let mut totals = [0.0; 12];
    for expense in classified(expenses) {
        totals[expense.period().month_index()] += expense.amount;
    }
    totals
}

/// Lists expenses excluded from aggregation, logging each one.
pub fn find_taxonomy_mismatches(expenses: &[Expense]) -> Vec<TaxonomyMismatch> {
    report_mismatches(expenses.iter())
}

/// Sum of every expense whose pair is in the taxonomy.
pub fn classified_total(expenses: &[Expense]) -> f64 {
    classified(expenses).map(|expense| expense.amount).sum()
}

pub fn aggregate_period(expenses: &[Expense], period: Period) -> PeriodAggregate {
    let category_totals = category_totals(expenses, period);
    let total_spent = category_totals.values().sum();
    PeriodAggregate {
        period,
        subcategories: subcategory_breakdown(expenses, period),
        category_totals,
        total_spent,
        mismatches: report_mismatches(
            expenses
                .iter()
                .filter(|expense| period.contains(&expense.created_at)),
        ),
    }
}

fn report_mismatches<'a>(expenses: impl Iterator<Item = &'a Expense>) -> Vec<TaxonomyMismatch> {
    expenses
        .filter(|expense| expense.classification().is_none())
        .map(|expense| {
            warn!(
                expense_id = %expense.id,
                category = expense.category.as_str(),
                subcategory = %expense.subcategory,
                "expense subcategory is not part of its category; excluded from totals"
            );
            TaxonomyMismatch {
                expense_id: expense.id.clone(),
                category: expense.category,
                subcategory: expense.subcategory.clone(),
                amount: expense.amount,
            }
        })
        .collect()
}

fn classified(expenses: &[Expense]) -> impl Iterator<Item = &Expense> {
    expenses
        .iter()
        .filter(|expense| expense.classification().is_some())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::{
        aggregate_period, category_totals, classified_total, find_taxonomy_mismatches,
        monthly_totals, subcategory_breakdown, total_for_category, total_for_subcategory,
        totals_by_period,
    };
    use crate::budget::period::Period;
    use crate::budget::taxonomy::{self, Category};
    use crate::budget::types::Expense;

    fn period(year: i32, month: u32) -> Period {
        match Period::new(year, month) {
            Some(value) => value,
            None => panic!("invalid test period {year}-{month}"),
        }
    }

    fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
        match NaiveDate::from_ymd_opt(year, month, day).and_then(|d| d.and_hms_opt(10, 0, 0)) {
            Some(value) => value,
            None => panic!("invalid test date"),
        }
    }

    fn expense(
        id: &str,
        category: Category,
        subcategory: &str,
        amount: f64,
        created_at: NaiveDateTime,
    ) -> Expense {
        Expense {
            id: id.to_string(),
            category,
            subcategory: subcategory.to_string(),
            amount,
            note: None,
            created_at,
        }
    }

    fn sample() -> Vec<Expense> {
        vec![
            expense("e1", Category::Fixed, "Housing", 20000.0, at(2024, 1, 3)),
            expense("e2", Category::Variable, "Food", 6000.0, at(2024, 1, 10)),
            expense("e3", Category::Variable, "Food", 4000.0, at(2024, 1, 25)),
            expense("e4", Category::Periodic, "Travel and vacations", 5000.0, at(2024, 1, 31)),
            expense("e5", Category::Variable, "Food", 999.0, at(2024, 2, 1)),
            expense("e6", Category::Fixed, "Transportation", 300.0, at(2024, 1, 5)),
            expense("e7", Category::Variable, "Transportation", 200.0, at(2024, 1, 6)),
        ]
    }

    #[test]
    fn empty_collection_aggregates_to_zero() {
        let jan = period(2024, 1);
        let totals = category_totals(&[], jan);
        assert!(totals.values().all(|value| *value == 0.0));
        assert_eq!(monthly_totals(&[]), [0.0; 12]);
        assert!(totals_by_period(&[]).is_empty());
        let aggregate = aggregate_period(&[], jan);
        assert_eq!(aggregate.total_spent, 0.0);
        assert!(aggregate.subcategories.is_empty());
    }

    #[test]
    fn subcategory_totals_respect_period_boundaries() {
        let expenses = sample();
        let food = taxonomy::lookup(Category::Variable, "Food");
        assert!(food.is_some());
        if let Some(food_ref) = food {
            let jan = total_for_subcategory(&expenses, food_ref, period(2024, 1));
            let feb = total_for_subcategory(&expenses, food_ref, period(2024, 2));
            let prior_year = total_for_subcategory(&expenses, food_ref, period(2023, 1));
            assert_eq!(jan, 10000.0);
            assert_eq!(feb, 999.0);
            assert_eq!(prior_year, 0.0);
        }
    }

    #[test]
    fn shared_subcategory_names_are_not_double_counted() {
        let expenses = sample();
        let jan = period(2024, 1);
        assert_eq!(total_for_category(&expenses, Category::Fixed, jan), 20300.0);
        assert_eq!(total_for_category(&expenses, Category::Variable, jan), 10200.0);
    }

    #[test]
    fn subcategories_sum_to_categories_and_categories_sum_to_total() {
        let expenses = sample();
        let jan = period(2024, 1);
        let aggregate = aggregate_period(&expenses, jan);

        for category in Category::ALL {
            let from_subcategories: f64 = category
                .subcategory_refs()
                .map(|subcategory| total_for_subcategory(&expenses, subcategory, jan))
                .sum();
            assert_eq!(
                Some(&from_subcategories),
                aggregate.category_totals.get(&category)
            );
        }

        let from_categories: f64 = aggregate.category_totals.values().sum();
        assert_eq!(from_categories, aggregate.total_spent);
        assert_eq!(aggregate.total_spent, 35500.0);
        assert_eq!(totals_by_period(&expenses).get(&jan), Some(&35500.0));
    }

    #[test]
    fn breakdown_lists_only_non_zero_subcategories_in_taxonomy_order() {
        let breakdown = subcategory_breakdown(&sample(), period(2024, 1));
        let names = breakdown
            .iter()
            .map(|row| (row.category, row.subcategory))
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                (Category::Fixed, "Housing"),
                (Category::Fixed, "Transportation"),
                (Category::Variable, "Food"),
                (Category::Variable, "Transportation"),
                (Category::Periodic, "Travel and vacations"),
            ]
        );
    }

    #[test]
    fn mismatched_expenses_are_excluded_and_reported() {
        let mut expenses = sample();
        expenses.push(expense("bad", Category::Fixed, "Food", 777.0, at(2024, 1, 12)));
        let jan = period(2024, 1);

        let aggregate = aggregate_period(&expenses, jan);
        assert_eq!(aggregate.total_spent, 35500.0);
        assert_eq!(aggregate.mismatches.len(), 1);
        assert_eq!(aggregate.mismatches[0].expense_id, "bad");
        assert_eq!(totals_by_period(&expenses).get(&jan), Some(&35500.0));
        assert_eq!(monthly_totals(&expenses)[0], 35500.0);
        assert_eq!(classified_total(&expenses), 36499.0);
    }

    #[test]
    fn period_aggregate_only_reports_its_own_mismatches() {
        let mut expenses = sample();
        expenses.push(expense("bad", Category::Fixed, "Food", 777.0, at(2024, 1, 12)));

        let february = aggregate_period(&expenses, period(2024, 2));
        assert!(february.mismatches.is_empty());
        assert_eq!(february.total_spent, 999.0);
        assert_eq!(find_taxonomy_mismatches(&expenses).len(), 1);
    }

    #[test]
    fn monthly_totals_merge_years_into_same_month() {
        let expenses = vec![
            expense("a", Category::Variable, "Food", 100.0, at(2023, 3, 1)),
            expense("b", Category::Variable, "Food", 50.0, at(2024, 3, 15)),
            expense("c", Category::Fixed, "Housing", 10.0, at(2024, 12, 31)),
        ];
        let totals = monthly_totals(&expenses);
        assert_eq!(totals[2], 150.0);
        assert_eq!(totals[11], 10.0);
        assert_eq!(totals.iter().sum::<f64>(), 160.0);
    }
}
