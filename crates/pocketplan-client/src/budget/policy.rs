use crate::budget::aggregate::CategoryAmounts;
use crate::budget::taxonomy::Category;

/// Allocation policy identifier, emitted with budget results and stored in
/// the budget store meta table.
pub const ALLOCATION_POLICY_VERSION: &str = "allocation/v1";

/// Share of salary recommended for each expense category.
///
/// Ratios are fixed policy input, not a forecast; they are not user-editable.
#[derive(Debug, Clone, Copy)]
pub struct AllocationPolicy {
    pub fixed_ratio: f64,
    pub variable_ratio: f64,
    pub periodic_ratio: f64,
}

impl AllocationPolicy {
    pub const fn ratio(self, category: Category) -> f64 {
        match category {
            Category::Fixed => self.fixed_ratio,
            Category::Variable => self.variable_ratio,
            Category::Periodic => self.periodic_ratio,
        }
    }

    /// `salary * ratio` per category. Absent or non-positive salary yields zeros.
    pub fn recommended_budget(self, salary: Option<f64>) -> CategoryAmounts {
        let base = salary.filter(|value| *value > 0.0).unwrap_or(0.0);
        Category::ALL
            .into_iter()
            .map(|category| (category, base * self.ratio(category)))
            .collect()
    }
}

pub const ALLOCATION_POLICY_V1: AllocationPolicy = AllocationPolicy {
    fixed_ratio: 0.5,
    variable_ratio: 0.3,
    periodic_ratio: 0.2,
};
