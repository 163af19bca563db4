pub mod expenses;
pub mod salaries;

pub use expenses::{ExpenseStore, insert_expense_batch};
pub use salaries::{SalaryEntry, SalarySource, SqliteSalaryStore};
