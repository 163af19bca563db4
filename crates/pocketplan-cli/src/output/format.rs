use std::cmp;

use serde_json::Value;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub name: &'a str,
    pub align: Align,
}

const INDENT: usize = 2;
const COLUMN_GAP: usize = 2;
const MIN_TABLE_COLUMN_WIDTH: usize = 8;
const DEFAULT_TERMINAL_WIDTH: usize = 120;
const MIN_TERMINAL_WIDTH: usize = 40;

/// Two decimals with thousands separators: `-12,345.60`.
pub fn money(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{cents}")
}

pub fn field_f64(value: &Value, key: &str) -> f64 {
    value.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

pub fn field_str<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("")
}

pub fn percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

pub fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .map_or(DEFAULT_TERMINAL_WIDTH, |width| cmp::max(width, MIN_TERMINAL_WIDTH))
}

pub fn key_value_rows(entries: &[(&str, String)], indent: usize) -> Vec<String> {
    let label_width = entries.iter().map(|(label, _)| width_of(label)).max().unwrap_or(0);
    entries
        .iter()
        .map(|(label, value)| {
            format!("{}{}  {value}", " ".repeat(indent), pad(label, label_width, Align::Left))
        })
        .collect()
}

/// Renders a header row and wrapped data rows, or one labelled block per row
/// when the columns cannot fit into `max_width`.
pub fn render_table_or_blocks(
    columns: &[Column<'_>],
    rows: &[Vec<String>],
    max_width: usize,
    block_label: &str,
) -> Vec<String> {
    if columns.is_empty() {
        return Vec::new();
    }

    let minimums = columns
        .iter()
        .map(|column| cmp::max(width_of(column.name), MIN_TABLE_COLUMN_WIDTH))
        .collect::<Vec<usize>>();
    let budget = max_width
        .saturating_sub(INDENT)
        .saturating_sub(COLUMN_GAP * (columns.len() - 1));

    let mut natural = columns.iter().map(|column| width_of(column.name)).collect::<Vec<_>>();
    for row in rows {
        for (slot, cell) in natural.iter_mut().zip(row) {
            *slot = cmp::max(*slot, width_of(cell));
        }
    }

    match fit_widths_to_budget(&natural, &minimums, budget) {
        Some(widths) => render_table(columns, rows, &widths),
        None => render_blocks(columns, rows, block_label),
    }
}

/// Shrinks the widest column one character at a time until the total fits,
/// never going below a column's minimum.
fn fit_widths_to_budget(
    natural: &[usize],
    minimums: &[usize],
    budget: usize,
) -> Option<Vec<usize>> {
    if natural.len() != minimums.len() || minimums.iter().sum::<usize>() > budget {
        return None;
    }

    let mut widths = natural.to_vec();
    let mut total = widths.iter().sum::<usize>();
    while total > budget {
        let widest = widths
            .iter()
            .zip(minimums)
            .enumerate()
            .filter(|(_, (width, minimum))| width > minimum)
            .max_by(|(left_index, (left, _)), (right_index, (right, _))| {
                left.cmp(right).then(right_index.cmp(left_index))
            })
            .map(|(index, _)| index)?;
        widths[widest] -= 1;
        total -= 1;
    }
    Some(widths)
}

fn render_table(columns: &[Column<'_>], rows: &[Vec<String>], widths: &[usize]) -> Vec<String> {
    let header = columns.iter().map(|column| column.name.to_string()).collect::<Vec<_>>();
    let mut output = vec![format_row(columns, &header, widths)];

    for row in rows {
        let wrapped = widths
            .iter()
            .enumerate()
            .map(|(index, width)| wrap_text(row.get(index).map_or("", String::as_str), *width))
            .collect::<Vec<Vec<String>>>();
        let height = wrapped.iter().map(Vec::len).max().unwrap_or(1);

        for line in 0..height {
            let cells = wrapped
                .iter()
                .map(|chunks| chunks.get(line).cloned().unwrap_or_default())
                .collect::<Vec<String>>();
            output.push(format_row(columns, &cells, widths));
        }
    }
    output
}

fn format_row(columns: &[Column<'_>], cells: &[String], widths: &[usize]) -> String {
    let pieces = columns
        .iter()
        .zip(widths)
        .zip(cells)
        .map(|((column, width), cell)| pad(cell, *width, column.align))
        .collect::<Vec<String>>();
    format!("{}{}", " ".repeat(INDENT), pieces.join(&" ".repeat(COLUMN_GAP)))
        .trim_end()
        .to_string()
}

fn render_blocks(columns: &[Column<'_>], rows: &[Vec<String>], block_label: &str) -> Vec<String> {
    let labels = columns
        .iter()
        .map(|column| format!("{}:", column.name))
        .collect::<Vec<String>>();
    let label_width = labels.iter().map(|label| width_of(label)).max().unwrap_or(0);

    let mut output = Vec::new();
    for (row_index, row) in rows.iter().enumerate() {
        if row_index > 0 {
            output.push(String::new());
        }
        output.push(format!("  {block_label} {}:", row_index + 1));
        for (label, value) in labels.iter().zip(row) {
            output.push(format!("    {}  {value}", pad(label, label_width, Align::Left)));
        }
    }
    output
}

/// Greedy word wrap. Words longer than `width` are split by characters.
fn wrap_text(value: &str, width: usize) -> Vec<String> {
    if width == 0 || width_of(value) <= width {
        return vec![value.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in value.split_whitespace() {
        let pieces = if width_of(word) > width {
            split_long_token(word, width)
        } else {
            vec![word.to_string()]
        };
        for piece in pieces {
            if current.is_empty() {
                current = piece;
            } else if width_of(&current) + 1 + width_of(&piece) <= width {
                current.push(' ');
                current.push_str(&piece);
            } else {
                lines.push(std::mem::replace(&mut current, piece));
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn split_long_token(token: &str, width: usize) -> Vec<String> {
    let characters = token.chars().collect::<Vec<char>>();
    characters
        .chunks(cmp::max(width, 1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn width_of(text: &str) -> usize {
    text.chars().count()
}

fn pad(text: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(width_of(text)));
    match align {
        Align::Left => format!("{text}{fill}"),
        Align::Right => format!("{fill}{text}"),
    }
}
