use crate::cli::{Commands, ExpenseCommand, SalaryCommand};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    let json = match command {
        Commands::Salary { command } => match command {
            SalaryCommand::Set { json, .. }
            | SalaryCommand::Show { json, .. }
            | SalaryCommand::List { json } => *json,
        },
        Commands::Expense { command } => match command {
            ExpenseCommand::Add { json, .. }
            | ExpenseCommand::Update { json, .. }
            | ExpenseCommand::Delete { json, .. }
            | ExpenseCommand::List { json, .. }
            | ExpenseCommand::Import { json, .. } => *json,
        },
        Commands::Categories { json }
        | Commands::Budget { json, .. }
        | Commands::Savings { json }
        | Commands::Trend { json } => *json,
    };

    if json {
        OutputMode::Json
    } else {
        OutputMode::Text
    }
}
