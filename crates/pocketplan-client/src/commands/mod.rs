pub mod budget;
pub mod categories;
pub mod common;
pub mod expense;
pub mod import;
pub mod salary;
pub mod savings;
pub mod trend;
