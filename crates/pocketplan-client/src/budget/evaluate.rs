use serde::Serialize;

use crate::budget::aggregate::CategoryAmounts;
use crate::budget::policy::AllocationPolicy;
use crate::budget::taxonomy::Category;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryEvaluation {
    pub category: Category,
    pub actual: f64,
    pub recommended: f64,
    pub over_budget: bool,
}

/// Recommended-vs-actual comparison for one salary and one set of totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetSnapshot {
    pub salary: Option<f64>,
    pub categories: Vec<CategoryEvaluation>,
    pub total_spent: f64,
    pub remaining: f64,
    pub suggested_savings: f64,
}

impl BudgetSnapshot {
    pub fn over_budget_categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.categories
            .iter()
            .filter(|row| row.over_budget)
            .map(|row| row.category)
    }
}

/// Pairs actual and recommended amounts for every category; missing entries count as zero.
pub fn evaluate(
    actual: &CategoryAmounts,
    recommended: &CategoryAmounts,
) -> Vec<CategoryEvaluation> {
    Category::ALL
        .into_iter()
        .map(|category| {
            let actual_value = actual.get(&category).copied().unwrap_or(0.0);
            let recommended_value = recommended.get(&category).copied().unwrap_or(0.0);
            CategoryEvaluation {
                category,
                actual: actual_value,
                recommended: recommended_value,
                over_budget: actual_value > recommended_value,
            }
        })
        .collect()
}

/// May be negative; overspending is a displayable state.
pub fn remaining(salary: Option<f64>, total_spent: f64) -> f64 {
    salary.unwrap_or(0.0) - total_spent
}

pub fn suggested_savings(remaining: f64) -> f64 {
    remaining.max(0.0)
}

pub fn build_snapshot(
    salary: Option<f64>,
    actual: &CategoryAmounts,
    policy: AllocationPolicy,
) -> BudgetSnapshot {
    let recommended = policy.recommended_budget(salary);
    let categories = evaluate(actual, &recommended);
    let total_spent = categories.iter().map(|row| row.actual).sum();
    let remaining_value = remaining(salary, total_spent);
    BudgetSnapshot {
        salary,
        categories,
        total_spent,
        remaining: remaining_value,
        suggested_savings: suggested_savings(remaining_value),
    }
}
