use std::path::{Path, PathBuf};

use pocketplan_client::commands::budget::{self, BudgetOptions};
use pocketplan_client::commands::expense::{self, ExpenseAddOptions};
use pocketplan_client::commands::salary::{self, SalaryListOptions, SalarySetOptions};
use pocketplan_client::commands::savings::{self, SavingsOptions};
use pocketplan_client::commands::trend::{self, TrendOptions};
use pocketplan_client::{ClientResult, FixedClock, SuccessEnvelope};
use rusqlite::Connection;
use serde_json::Value;
use tempfile::tempdir;

fn temp_home() -> std::io::Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempdir()?;
    let home = dir.path().join("pocketplan-home");
    Ok((dir, home))
}

fn set_salary(home: &Path, period: &str, amount: f64) {
    let saved = salary::set_with_options(SalarySetOptions {
        amount,
        period: Some(period.to_string()),
        home_override: Some(home),
        clock: None,
    });
    assert!(saved.is_ok());
}

fn add_expense(home: &Path, category: &str, subcategory: &str, amount: f64, date: &str) {
    let added = expense::add_with_options(ExpenseAddOptions {
        category: category.to_string(),
        subcategory: subcategory.to_string(),
        amount,
        note: None,
        date: Some(date.to_string()),
        home_override: Some(home),
        clock: None,
    });
    assert!(added.is_ok());
}

fn insert_raw_expense(home: &Path, id: &str, category: &str, subcategory: &str, amount: f64) {
    let connection = Connection::open(home.join("budget.db"));
    assert!(connection.is_ok());
    if let Ok(conn) = connection {
        let inserted = conn.execute(
            "INSERT INTO expenses (expense_id, category, subcategory, amount, created_at)
             VALUES (?1, ?2, ?3, ?4, '2024-01-15T09:00:00')",
            rusqlite::params![id, category, subcategory, amount],
        );
        assert!(inserted.is_ok());
    }
}

fn run_budget(home: &Path, period: &str) -> ClientResult<SuccessEnvelope> {
    budget::run_with_options(BudgetOptions {
        period: Some(period.to_string()),
        home_override: Some(home),
        clock: None,
    })
}

fn category_row<'a>(data: &'a Value, category: &str) -> Option<&'a Value> {
    data["categories"]
        .as_array()?
        .iter()
        .find(|row| row["category"] == category)
}

#[test]
fn budget_compares_actuals_with_the_fifty_thirty_twenty_split() {
    let setup = temp_home();
    assert!(setup.is_ok());
    if let Ok((_dir, home)) = setup {
        set_salary(&home, "2024-01", 50000.0);
        add_expense(&home, "fixed", "Housing", 20000.0, "2024-01-01");
        add_expense(&home, "variable", "Food", 10000.0, "2024-01-10");
        add_expense(&home, "periodic", "Travel and vacations", 5000.0, "2024-01-20");
        add_expense(&home, "variable", "Food", 999.0, "2024-02-01");

        let result = run_budget(&home, "2024-01");
        assert!(result.is_ok());
        if let Ok(envelope) = result {
            let data = &envelope.data;
            assert_eq!(envelope.command, "budget");
            assert_eq!(data["period"], "2024-01");
            assert_eq!(data["policy_version"], "allocation/v1");
            assert_eq!(data["salary"], 50000.0);
            assert_eq!(data["salary_carried_forward"], false);
            assert_eq!(data["total_spent"], 35000.0);
            assert_eq!(data["remaining"], 15000.0);
            assert_eq!(data["suggested_savings"], 15000.0);
            assert_eq!(data["over_budget"], serde_json::json!([]));

            for (category, actual, recommended) in [
                ("fixed", 20000.0, 25000.0),
                ("variable", 10000.0, 15000.0),
                ("periodic", 5000.0, 10000.0),
            ] {
                let row = category_row(data, category);
                assert!(row.is_some());
                if let Some(row) = row {
                    assert_eq!(row["actual"], actual);
                    assert_eq!(row["recommended"], recommended);
                    assert_eq!(row["over_budget"], false);
                }
            }

            let subcategories = data["subcategories"].as_array().cloned().unwrap_or_default();
            assert_eq!(subcategories.len(), 3);
            assert_eq!(subcategories[0]["subcategory"], "Housing");
        }
    }
}

#[test]
fn budget_flags_overspent_categories_and_negative_remaining() {
    let setup = temp_home();
    assert!(setup.is_ok());
    if let Ok((_dir, home)) = setup {
        set_salary(&home, "2024-01", 10000.0);
        add_expense(&home, "variable", "Entertainment", 8000.0, "2024-01-05");
        add_expense(&home, "fixed", "Housing", 4000.0, "2024-01-01");

        let result = run_budget(&home, "2024-01");
        assert!(result.is_ok());
        if let Ok(envelope) = result {
            assert_eq!(envelope.data["over_budget"], serde_json::json!(["variable"]));
            assert_eq!(envelope.data["remaining"], -2000.0);
            assert_eq!(envelope.data["suggested_savings"], 0.0);
        }
    }
}

#[test]
fn budget_without_any_salary_recommends_zero() {
    let setup = temp_home();
    assert!(setup.is_ok());
    if let Ok((_dir, home)) = setup {
        add_expense(&home, "variable", "Food", 300.0, "2024-01-05");

        let result = run_budget(&home, "2024-01");
        assert!(result.is_ok());
        if let Ok(envelope) = result {
            assert!(envelope.data["salary"].is_null());
            assert_eq!(envelope.data["remaining"], -300.0);
            let variable = category_row(&envelope.data, "variable");
            assert!(matches!(variable, Some(row) if row["recommended"] == 0.0));
        }
    }
}

#[test]
fn budget_carries_salary_forward_from_the_clock_period() {
    let setup = temp_home();
    let clock = FixedClock::on(2024, 2, 10);
    assert!(setup.is_ok());
    assert!(clock.is_some());
    if let (Ok((_dir, home)), Some(clock)) = (setup, clock) {
        set_salary(&home, "2024-01", 50000.0);
        add_expense(&home, "variable", "Food", 20000.0, "2024-01-10");
        add_expense(&home, "variable", "Food", 10000.0, "2024-02-03");

        let result = budget::run_with_options(BudgetOptions {
            period: None,
            home_override: Some(&home),
            clock: Some(&clock),
        });
        assert!(result.is_ok());
        if let Ok(envelope) = result {
            assert_eq!(envelope.data["period"], "2024-02");
            assert_eq!(envelope.data["salary"], 50000.0);
            assert_eq!(envelope.data["salary_carried_forward"], true);
            assert_eq!(envelope.data["salary_source_period"], "2024-01");
            // January surplus 30000 plus the anchored February surplus 40000.
            assert_eq!(envelope.data["cumulative_savings"], 70000.0);
        }

        let listed = salary::list_with_options(SalaryListOptions {
            home_override: Some(&home),
        });
        assert!(matches!(
            listed,
            Ok(envelope) if envelope.data["salaries"].as_array().map(Vec::len) == Some(2)
        ));
    }
}

#[test]
fn mismatched_expenses_are_reported_and_left_out_of_totals() {
    let setup = temp_home();
    assert!(setup.is_ok());
    if let Ok((_dir, home)) = setup {
        set_salary(&home, "2024-01", 50000.0);
        add_expense(&home, "fixed", "Housing", 20000.0, "2024-01-01");
        insert_raw_expense(&home, "exp_mismatch", "fixed", "Food", 7000.0);

        let result = run_budget(&home, "2024-01");
        assert!(result.is_ok());
        if let Ok(envelope) = result {
            assert_eq!(envelope.data["total_spent"], 20000.0);
            let mismatches = envelope.data["mismatches"].as_array().cloned().unwrap_or_default();
            assert_eq!(mismatches.len(), 1);
            assert_eq!(mismatches[0]["expense_id"], "exp_mismatch");
            assert_eq!(mismatches[0]["subcategory"], "Food");
        }

        let february = run_budget(&home, "2024-02");
        assert!(matches!(
            february,
            Ok(envelope) if envelope.data["mismatches"].as_array().is_some_and(Vec::is_empty)
        ));

        let trend_result = trend::run_with_options(TrendOptions {
            home_override: Some(&home),
        });
        assert!(matches!(trend_result, Ok(envelope) if envelope.data["total"] == 20000.0));
    }
}

#[test]
fn savings_floors_each_deficit_instead_of_netting_it() {
    let setup = temp_home();
    assert!(setup.is_ok());
    if let Ok((_dir, home)) = setup {
        set_salary(&home, "2024-03", 30000.0);
        set_salary(&home, "2024-04", 30000.0);
        add_expense(&home, "fixed", "Housing", 40000.0, "2024-03-01");
        add_expense(&home, "fixed", "Housing", 10000.0, "2024-04-01");

        let result = savings::run_with_options(SavingsOptions {
            home_override: Some(&home),
        });
        assert!(result.is_ok());
        if let Ok(envelope) = result {
            assert_eq!(envelope.command, "savings");
            assert_eq!(envelope.data["total"], 20000.0);
            let periods = envelope.data["periods"].as_array().cloned().unwrap_or_default();
            assert_eq!(periods.len(), 2);
            assert_eq!(periods[0]["period"], "2024-03");
            assert_eq!(periods[0]["surplus"], -10000.0);
            assert_eq!(periods[0]["counted"], false);
            assert_eq!(periods[1]["counted"], true);
        }
    }
}

#[test]
fn savings_does_not_anchor_any_salary() {
    let setup = temp_home();
    assert!(setup.is_ok());
    if let Ok((_dir, home)) = setup {
        set_salary(&home, "2024-01", 30000.0);
        add_expense(&home, "variable", "Food", 500.0, "2024-03-01");

        let result = savings::run_with_options(SavingsOptions {
            home_override: Some(&home),
        });
        assert!(matches!(result, Ok(envelope) if envelope.data["total"] == 30000.0));

        let listed = salary::list_with_options(SalaryListOptions {
            home_override: Some(&home),
        });
        assert!(matches!(
            listed,
            Ok(envelope) if envelope.data["salaries"].as_array().map(Vec::len) == Some(1)
        ));
    }
}

#[test]
fn trend_merges_years_into_twelve_calendar_months() {
    let setup = temp_home();
    assert!(setup.is_ok());
    if let Ok((_dir, home)) = setup {
        add_expense(&home, "variable", "Food", 100.0, "2023-03-15");
        add_expense(&home, "variable", "Food", 250.0, "2024-03-02");
        add_expense(&home, "fixed", "Housing", 900.0, "2024-12-31T23:59:59");

        let result = trend::run_with_options(TrendOptions {
            home_override: Some(&home),
        });
        assert!(result.is_ok());
        if let Ok(envelope) = result {
            let points = envelope.data["points"].as_array().cloned().unwrap_or_default();
            assert_eq!(points.len(), 12);
            assert_eq!(points[0]["label"], "Jan");
            assert_eq!(points[2]["label"], "Mar");
            assert_eq!(points[2]["total"], 350.0);
            assert_eq!(points[11]["total"], 900.0);
            assert_eq!(points[5]["total"], 0.0);
            assert_eq!(envelope.data["total"], 1250.0);
        }
    }
}
