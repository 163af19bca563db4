use std::io;

use serde_json::Value;

use super::budget_text::render_mismatches;
use super::format::{self, Align, Column, field_f64, field_str};

pub fn render_expense(command: &str, data: &Value) -> io::Result<String> {
    let expense = data
        .get("expense")
        .ok_or_else(|| io::Error::other("expense output requires expense"))?;

    let heading = if command == "expense update" {
        "Expense updated."
    } else {
        "Expense recorded."
    };

    let mut lines = vec![heading.to_string(), String::new()];
    lines.extend(format::key_value_rows(
        &[
            ("Expense ID:", field_str(expense, "expense_id").to_string()),
            ("Category:", field_str(expense, "category").to_string()),
            ("Subcategory:", field_str(expense, "subcategory").to_string()),
            ("Amount:", format::money(field_f64(expense, "amount"))),
            ("Date:", field_str(expense, "created_at").to_string()),
            ("Note:", field_str(expense, "note").to_string()),
        ],
        2,
    ));
    Ok(lines.join("\n"))
}

pub fn render_expense_delete(data: &Value) -> io::Result<String> {
    Ok(format!(
        "Expense {} deleted.",
        field_str(data, "expense_id")
    ))
}

pub fn render_expense_list(data: &Value) -> io::Result<String> {
    let rows = data
        .get("expenses")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("expense list output requires expenses"))?;
    let scope = data
        .get("period")
        .and_then(Value::as_str)
        .map(|period| format!(" in {period}"))
        .unwrap_or_default();

    if rows.is_empty() {
        return Ok([
            format!("No expenses found{scope}."),
            String::new(),
            "Record one:".to_string(),
            "  pocketplan expense add --category <c> --subcategory <s> --amount <a>".to_string(),
            "Or load a file:".to_string(),
            "  pocketplan expense import --help".to_string(),
        ]
        .join("\n"));
    }

    let count_label = if rows.len() == 1 {
        format!("1 expense found{scope}.")
    } else {
        format!("{} expenses found{scope}.", rows.len())
    };

    let columns = [
        Column {
            name: "Date",
            align: Align::Left,
        },
        Column {
            name: "Category",
            align: Align::Left,
        },
        Column {
            name: "Subcategory",
            align: Align::Left,
        },
        Column {
            name: "Amount",
            align: Align::Right,
        },
        Column {
            name: "Note",
            align: Align::Left,
        },
        Column {
            name: "Expense ID",
            align: Align::Left,
        },
    ];
    let table_rows = rows
        .iter()
        .map(|row| {
            vec![
                field_str(row, "created_at")
                    .split('T')
                    .next()
                    .unwrap_or("")
                    .to_string(),
                field_str(row, "category").to_string(),
                field_str(row, "subcategory").to_string(),
                format::money(field_f64(row, "amount")),
                field_str(row, "note").to_string(),
                field_str(row, "expense_id").to_string(),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    let mut lines = vec![count_label, String::new()];
    lines.extend(format::render_table_or_blocks(
        &columns,
        &table_rows,
        format::terminal_width(),
        "Expense",
    ));
    lines.push(String::new());
    lines.extend(format::key_value_rows(
        &[("Total:", format::money(field_f64(data, "total")))],
        2,
    ));
    lines.extend(render_mismatches(data));
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{render_expense, render_expense_list};

    #[test]
    fn update_uses_its_own_heading() {
        let rendered = render_expense(
            "expense update",
            &json!({
                "expense": {
                    "expense_id": "exp_1",
                    "category": "variable",
                    "subcategory": "Food",
                    "amount": 650.0,
                    "note": null,
                    "created_at": "2024-03-02T00:00:00",
                    "period": "2024-03"
                }
            }),
        );
        assert!(matches!(rendered, Ok(text) if text.starts_with("Expense updated.")));
    }

    #[test]
    fn list_shows_dates_and_total() {
        let rendered = render_expense_list(&json!({
            "period": "2024-03",
            "total": 9400.0,
            "expenses": [
                {"expense_id": "exp_1", "category": "fixed", "subcategory": "Housing", "amount": 9000.0, "note": null, "created_at": "2024-03-01T00:00:00", "period": "2024-03"},
                {"expense_id": "exp_2", "category": "variable", "subcategory": "Food", "amount": 400.0, "note": "market", "created_at": "2024-03-02T00:00:00", "period": "2024-03"}
            ]
        }));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("2 expenses found in 2024-03."));
            assert!(text.contains("2024-03-01"));
            assert!(text.contains("9,400.00"));
            assert!(!text.contains("Excluded from totals"));
        }
    }

    #[test]
    fn list_calls_out_rows_left_out_of_the_total() {
        let rendered = render_expense_list(&json!({
            "period": "2024-01",
            "total": 300.0,
            "expenses": [
                {"expense_id": "exp_1", "category": "fixed", "subcategory": "Housing", "amount": 300.0, "note": null, "created_at": "2024-01-03T00:00:00", "period": "2024-01"},
                {"expense_id": "exp_bad", "category": "fixed", "subcategory": "Food", "amount": 777.0, "note": null, "created_at": "2024-01-05T00:00:00", "period": "2024-01"}
            ],
            "mismatches": [{"expense_id": "exp_bad", "category": "fixed", "subcategory": "Food", "amount": 777.0}]
        }));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("Total:  300.00"));
            assert!(text.contains("Excluded from totals (1 expenses"));
            assert!(text.contains("exp_bad  fixed / Food"));
        }
    }

    #[test]
    fn empty_list_points_at_add_and_import() {
        let rendered = render_expense_list(&json!({ "period": null, "total": 0.0, "expenses": [] }));
        assert!(matches!(
            rendered,
            Ok(text) if text.starts_with("No expenses found.") && text.contains("expense import --help")
        ));
    }
}
