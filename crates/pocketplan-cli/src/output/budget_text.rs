use std::io;

use serde_json::Value;

use super::format::{self, Align, Column, field_f64, field_str};

pub fn render_budget(data: &Value) -> io::Result<String> {
    let categories = data
        .get("categories")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("budget output requires categories"))?;
    let period = field_str(data, "period");

    let salary = match data.get("salary").and_then(Value::as_f64) {
        Some(value)
            if data
                .get("salary_carried_forward")
                .and_then(Value::as_bool)
                .unwrap_or(false) =>
        {
            format!(
                "{} (carried forward from {})",
                format::money(value),
                field_str(data, "salary_source_period")
            )
        }
        Some(value) => format::money(value),
        None => "not set".to_string(),
    };

    let mut lines = vec![format!("Budget for {period}:"), String::new()];
    lines.extend(format::key_value_rows(
        &[
            ("Salary:", salary),
            ("Total spent:", format::money(field_f64(data, "total_spent"))),
            ("Remaining:", format::money(field_f64(data, "remaining"))),
            (
                "Suggested savings:",
                format::money(field_f64(data, "suggested_savings")),
            ),
            (
                "Cumulative savings:",
                format::money(field_f64(data, "cumulative_savings")),
            ),
        ],
        2,
    ));

    let columns = [
        Column {
            name: "Category",
            align: Align::Left,
        },
        Column {
            name: "Actual",
            align: Align::Right,
        },
        Column {
            name: "Recommended",
            align: Align::Right,
        },
        Column {
            name: "Status",
            align: Align::Left,
        },
    ];
    let table_rows = categories
        .iter()
        .map(|row| {
            let over = row
                .get("over_budget")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            vec![
                field_str(row, "category").to_string(),
                format::money(field_f64(row, "actual")),
                format::money(field_f64(row, "recommended")),
                if over { "OVER BUDGET" } else { "ok" }.to_string(),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    lines.push(String::new());
    lines.push("Categories:".to_string());
    lines.extend(format::render_table_or_blocks(
        &columns,
        &table_rows,
        format::terminal_width(),
        "Category",
    ));

    let subcategories = data
        .get("subcategories")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    if !subcategories.is_empty() {
        lines.push(String::new());
        lines.push("Spending by subcategory:".to_string());
        let entries = subcategories
            .iter()
            .map(|row| {
                (
                    field_str(row, "subcategory"),
                    format::money(field_f64(row, "total")),
                )
            })
            .collect::<Vec<(&str, String)>>();
        lines.extend(format::key_value_rows(&entries, 2));
    }

    lines.extend(render_mismatches(data));
    if data.get("salary").is_none_or(Value::is_null) {
        lines.push(String::new());
        lines.push("Recommendations are zero until a salary is saved:".to_string());
        lines.push(format!("  pocketplan salary set <amount> --period {period}"));
    }

    Ok(lines.join("\n"))
}

pub fn render_savings(data: &Value) -> io::Result<String> {
    let periods = data
        .get("periods")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("savings output requires periods"))?;

    if periods.is_empty() {
        return Ok([
            "No salaries saved yet, so there is nothing to save from.",
            "",
            "Save one first:",
            "  pocketplan salary set <amount>",
        ]
        .join("\n"));
    }

    let columns = [
        Column {
            name: "Period",
            align: Align::Left,
        },
        Column {
            name: "Salary",
            align: Align::Right,
        },
        Column {
            name: "Spent",
            align: Align::Right,
        },
        Column {
            name: "Surplus",
            align: Align::Right,
        },
    ];
    let table_rows = periods
        .iter()
        .map(|row| {
            let counted = row
                .get("counted")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            let surplus = format::money(field_f64(row, "surplus"));
            vec![
                field_str(row, "period").to_string(),
                format::money(field_f64(row, "salary")),
                format::money(field_f64(row, "spent")),
                if counted {
                    surplus
                } else {
                    format!("{surplus} (not counted)")
                },
            ]
        })
        .collect::<Vec<Vec<String>>>();

    let mut lines = vec!["Savings by month:".to_string()];
    lines.extend(format::render_table_or_blocks(
        &columns,
        &table_rows,
        format::terminal_width(),
        "Month",
    ));
    lines.push(String::new());
    lines.extend(format::key_value_rows(
        &[(
            "Cumulative savings:",
            format::money(field_f64(data, "total")),
        )],
        2,
    ));
    lines.extend(render_mismatches(data));
    Ok(lines.join("\n"))
}

pub fn render_trend(data: &Value) -> io::Result<String> {
    let points = data
        .get("points")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("trend output requires points"))?;

    let mut lines = vec![
        "Spending by calendar month (all years combined):".to_string(),
        String::new(),
    ];
    let entries = points
        .iter()
        .map(|point| {
            (
                field_str(point, "label"),
                format::money(field_f64(point, "total")),
            )
        })
        .collect::<Vec<(&str, String)>>();
    lines.extend(format::key_value_rows(&entries, 2));
    lines.push(String::new());
    lines.extend(format::key_value_rows(
        &[("Total", format::money(field_f64(data, "total")))],
        2,
    ));
    lines.extend(render_mismatches(data));
    Ok(lines.join("\n"))
}

pub fn render_categories(data: &Value) -> io::Result<String> {
    let categories = data
        .get("categories")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("categories output requires categories"))?;

    let mut lines = vec![format!(
        "Expense categories (policy {}):",
        field_str(data, "policy_version")
    )];
    for category in categories {
        lines.push(String::new());
        lines.push(format!(
            "{} [{}], {} of salary",
            field_str(category, "label"),
            field_str(category, "category"),
            format::percent(field_f64(category, "allocation_ratio"))
        ));
        for subcategory in category
            .get("subcategories")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
        {
            lines.push(format!("  - {}", subcategory.as_str().unwrap_or("")));
        }
    }
    Ok(lines.join("\n"))
}

pub(super) fn render_mismatches(data: &Value) -> Vec<String> {
    let Some(rows) = data
        .get("mismatches")
        .and_then(Value::as_array)
        .filter(|rows| !rows.is_empty())
    else {
        return Vec::new();
    };

    let mut lines = vec![
        String::new(),
        format!(
            "Excluded from totals ({} expenses whose subcategory is not in their category):",
            rows.len()
        ),
    ];
    for row in rows {
        lines.push(format!(
            "  {}  {} / {}  {}",
            field_str(row, "expense_id"),
            field_str(row, "category"),
            field_str(row, "subcategory"),
            format::money(field_f64(row, "amount"))
        ));
    }
    lines.push("  Fix them with `pocketplan expense update <id> --subcategory <s>`.".to_string());
    lines
}
