pub mod aggregate;
pub mod evaluate;
pub mod period;
pub mod policy;
pub mod salary;
pub mod savings;
pub mod taxonomy;
pub mod trend;
pub mod types;
