use pocketplan_client::commands;
use pocketplan_client::commands::expense::ExpenseUpdateOptions;
use pocketplan_client::{ClientResult, SuccessEnvelope};

use crate::cli::{Cli, Commands, ExpenseCommand, PeriodArg, SalaryCommand};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Salary { command } => match command {
            SalaryCommand::Set { amount, period, .. } => {
                commands::salary::set(*amount, period_string(period))
            }
            SalaryCommand::Show { period, .. } => commands::salary::show(period_string(period)),
            SalaryCommand::List { .. } => commands::salary::list(),
        },
        Commands::Expense { command } => match command {
            ExpenseCommand::Add {
                category,
                subcategory,
                amount,
                note,
                date,
                ..
            } => commands::expense::add(
                category.clone(),
                subcategory.clone(),
                *amount,
                note.clone(),
                date.clone(),
            ),
            ExpenseCommand::Update {
                expense_id,
                category,
                subcategory,
                amount,
                note,
                date,
                ..
            } => commands::expense::update_with_options(ExpenseUpdateOptions {
                expense_id: expense_id.clone(),
                category: category.clone(),
                subcategory: subcategory.clone(),
                amount: *amount,
                note: note.clone(),
                date: date.clone(),
                home_override: None,
            }),
            ExpenseCommand::Delete { expense_id, .. } => {
                commands::expense::delete(expense_id.clone())
            }
            ExpenseCommand::List { period, .. } => commands::expense::list(period_string(period)),
            ExpenseCommand::Import { dry_run, path, .. } => {
                commands::import::run(path.clone(), *dry_run)
            }
        },
        Commands::Categories { .. } => commands::categories::run(),
        Commands::Budget { period, .. } => commands::budget::run(period_string(period)),
        Commands::Savings { .. } => commands::savings::run(),
        Commands::Trend { .. } => commands::trend::run(),
    }
}

fn period_string(period: &Option<PeriodArg>) -> Option<String> {
    period.clone().map(PeriodArg::into_string)
}

#[cfg(test)]
mod tests {
    use crate::cli::parse_from;

    use super::dispatch;

    #[test]
    fn categories_dispatches_without_a_store() {
        let parsed = parse_from(["pocketplan", "categories", "--json"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            let response = dispatch(&cli);
            assert!(response.is_ok());
            if let Ok(success) = response {
                assert_eq!(success.command, "categories");
            }
        }
    }

    #[test]
    fn update_without_fields_fails_before_touching_the_store() {
        let parsed = parse_from(["pocketplan", "expense", "update", "exp_1"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            let response = dispatch(&cli);
            assert!(matches!(response, Err(error) if error.code == "invalid_argument"));
        }
    }
}
