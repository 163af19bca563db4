use serde::Serialize;

use crate::budget::aggregate::{SubcategoryTotal, TaxonomyMismatch};
use crate::budget::evaluate::CategoryEvaluation;
use crate::budget::savings::PeriodSurplus;
use crate::budget::taxonomy::Category;
use crate::budget::trend::TrendPoint;
use crate::budget::types::{Expense, format_timestamp};
use crate::storage::SalaryEntry;

#[derive(Debug, Clone, Serialize)]
pub struct SalarySetData {
    pub period: String,
    pub amount: f64,
    pub source: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalaryShowData {
    pub period: String,
    pub salary: Option<f64>,
    pub was_carried_forward: bool,
    pub source_period: Option<String>,
    pub carry_forward_limit: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalaryListData {
    pub salaries: Vec<SalaryEntry>,
}

/// Wire shape of one expense.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseRecord {
    pub expense_id: String,
    pub category: Category,
    pub subcategory: String,
    pub amount: f64,
    pub note: Option<String>,
    pub created_at: String,
    pub period: String,
}

impl From<&Expense> for ExpenseRecord {
    fn from(expense: &Expense) -> Self {
        Self {
            expense_id: expense.id.clone(),
            category: expense.category,
            subcategory: expense.subcategory.clone(),
            amount: expense.amount,
            note: expense.note.clone(),
            created_at: format_timestamp(&expense.created_at),
            period: expense.period().key(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpenseData {
    pub expense: ExpenseRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpenseDeleteData {
    pub expense_id: String,
    pub deleted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpenseListData {
    pub period: Option<String>,
    pub expenses: Vec<ExpenseRecord>,
    /// Excludes `mismatches`, matching every budget aggregate.
    pub total: f64,
    pub mismatches: Vec<TaxonomyMismatch>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportIssue {
    pub row: i64,
    pub field: String,
    pub code: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub rows_read: i64,
    pub rows_valid: i64,
    pub rows_invalid: i64,
    pub inserted: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportData {
    pub dry_run: bool,
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_id: Option<String>,
    pub message: String,
    pub source_used: String,
    pub summary: ImportSummary,
    pub issues: Vec<ImportIssue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryEntry {
    pub category: Category,
    pub label: String,
    pub allocation_ratio: f64,
    pub subcategories: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoriesData {
    pub policy_version: String,
    pub categories: Vec<CategoryEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetData {
    pub period: String,
    pub policy_version: String,
    pub salary: Option<f64>,
    pub salary_carried_forward: bool,
    pub salary_source_period: Option<String>,
    pub categories: Vec<CategoryEvaluation>,
    pub over_budget: Vec<Category>,
    pub subcategories: Vec<SubcategoryTotal>,
    pub total_spent: f64,
    pub remaining: f64,
    pub suggested_savings: f64,
    pub cumulative_savings: f64,
    pub mismatches: Vec<TaxonomyMismatch>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SavingsData {
    pub periods: Vec<PeriodSurplus>,
    pub total: f64,
    pub mismatches: Vec<TaxonomyMismatch>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendData {
    pub points: [TrendPoint; 12],
    pub total: f64,
    pub mismatches: Vec<TaxonomyMismatch>,
}
