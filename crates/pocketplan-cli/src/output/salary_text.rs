use std::io;

use serde_json::Value;

use super::format::{self, Align, Column, field_f64, field_str};

pub fn render_salary_set(data: &Value) -> io::Result<String> {
    let period = field_str(data, "period");
    let mut lines = vec![format!("Salary saved for {period}."), String::new()];
    lines.extend(format::key_value_rows(
        &[
            ("Period:", period.to_string()),
            ("Amount:", format::money(field_f64(data, "amount"))),
        ],
        2,
    ));
    Ok(lines.join("\n"))
}

pub fn render_salary_show(data: &Value) -> io::Result<String> {
    let period = field_str(data, "period");
    let Some(salary) = data.get("salary").and_then(Value::as_f64) else {
        let limit = data
            .get("carry_forward_limit")
            .and_then(Value::as_u64)
            .unwrap_or(12);
        return Ok([
            format!("No salary found for {period} or the {limit} months before it."),
            String::new(),
            "Save one first:".to_string(),
            format!("  pocketplan salary set <amount> --period {period}"),
        ]
        .join("\n"));
    };

    let source = if data
        .get("was_carried_forward")
        .and_then(Value::as_bool)
        .unwrap_or(false)
    {
        format!("carried forward from {}", field_str(data, "source_period"))
    } else {
        "stored for this month".to_string()
    };

    let mut lines = vec![format!("Salary for {period}:"), String::new()];
    lines.extend(format::key_value_rows(
        &[
            ("Amount:", format::money(salary)),
            ("Source:", source),
        ],
        2,
    ));
    Ok(lines.join("\n"))
}

pub fn render_salary_list(data: &Value) -> io::Result<String> {
    let rows = data
        .get("salaries")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("salary list output requires salaries"))?;

    if rows.is_empty() {
        return Ok([
            "No salaries saved yet.",
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
            name: "Amount",
            align: Align::Right,
        },
        Column {
            name: "Source",
            align: Align::Left,
        },
    ];
    let table_rows = rows
        .iter()
        .map(|row| {
            vec![
                field_str(row, "period").to_string(),
                format::money(field_f64(row, "amount")),
                field_str(row, "source").replace('_', " "),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    let mut lines = vec!["Salaries:".to_string()];
    lines.extend(format::render_table_or_blocks(
        &columns,
        &table_rows,
        format::terminal_width(),
        "Salary",
    ));
    Ok(lines.join("\n"))
}
