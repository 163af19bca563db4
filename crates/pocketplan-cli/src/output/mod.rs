mod budget_text;
mod error_text;
mod expense_text;
mod format;
mod import_text;
mod json;
mod mode;
mod salary_text;

use std::io;

use pocketplan_client::{ClientError, SuccessEnvelope};

use crate::stdout_io::write_stdout_line;

pub use mode::{OutputMode, mode_for_command};

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Text => render_text_success(success)?,
        OutputMode::Json => json::render_success_json(success)?,
    };
    write_stdout_line(&body)
}

pub fn print_failure(error: &ClientError, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Json => json::render_error_json(error)?,
        OutputMode::Text => error_text::render_error(error),
    };
    write_stdout_line(&body)
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "salary set" => salary_text::render_salary_set(&success.data),
        "salary show" => salary_text::render_salary_show(&success.data),
        "salary list" => salary_text::render_salary_list(&success.data),
        "expense add" | "expense update" => {
            expense_text::render_expense(&success.command, &success.data)
        }
        "expense delete" => expense_text::render_expense_delete(&success.data),
        "expense list" => expense_text::render_expense_list(&success.data),
        "expense import" => import_text::render_import_run(&success.data),
        "categories" => budget_text::render_categories(&success.data),
        "budget" => budget_text::render_budget(&success.data),
        "savings" => budget_text::render_savings(&success.data),
        "trend" => budget_text::render_trend(&success.data),
        _ => Err(io::Error::other(format!(
            "unsupported text output command `{}`",
            success.command
        ))),
    }
}
