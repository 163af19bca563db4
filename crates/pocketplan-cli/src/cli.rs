use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodArg(pub String);

impl PeriodArg {
    pub fn into_string(self) -> String {
        self.0
    }
}

/// `YYYY-MM` with a real month; the client re-validates but clap gives the
/// earlier, friendlier error.
pub fn parse_period(value: &str) -> Result<PeriodArg, String> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 7
        && bytes[4] == b'-'
        && [0usize, 1, 2, 3, 5, 6]
            .iter()
            .all(|index| bytes[*index].is_ascii_digit());
    if !shaped {
        return Err("period must use YYYY-MM format".to_string());
    }

    if NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d").is_err() {
        return Err("period must use a month between 01 and 12".to_string());
    }

    Ok(PeriodArg(value.to_string()))
}

/// Extended help shown after `pocketplan expense import --help`.
pub const EXPENSE_IMPORT_AFTER_HELP: &str = "\
How import works:
  One call loads one snapshot of expenses. Every row is validated first;
  if any row fails, nothing is written and each issue is listed.

  Accepted formats:
    JSON: one top-level array of expense objects
    CSV:  one header row with the field names below

  <path> is a local file path. Use `-` (or omit it) to read stdin.
  Example: cat march.csv | pocketplan expense import --dry-run -

What to do next:
  1. Run `pocketplan categories` to see every valid category/subcategory pair.
  2. Run `pocketplan expense import --dry-run <path>` and fix any reported issues.
  3. Run `pocketplan expense import <path>` once the dry run passes.

Import schema:
  JSON example:
  [
    {
      \"category\": \"variable\",
      \"subcategory\": \"Food\",
      \"amount\": 450.75,
      \"note\": \"groceries\",
      \"created_at\": \"2024-03-04\"
    }
  ]

  CSV example:
  category,subcategory,amount,note,created_at
  fixed,Housing,12000,rent,2024-03-01
  variable,Food,450.75,groceries,2024-03-04T18:30:00

Field rules:
  category (required):     fixed, variable or periodic
  subcategory (required):  must be listed under the category
  amount (required):       a number greater than zero
  note (optional):         free text
  created_at (optional):   YYYY-MM-DD, YYYY-MM-DDTHH:MM:SS or RFC 3339; defaults to now
";

#[derive(Debug, Parser)]
#[command(
    name = "pocketplan",
    version,
    about = "personal budget planner",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Save and inspect monthly salaries
    #[command(arg_required_else_help = true)]
    Salary {
        #[command(subcommand)]
        command: SalaryCommand,
    },
    /// Record, edit, list and import expenses
    #[command(arg_required_else_help = true)]
    Expense {
        #[command(subcommand)]
        command: ExpenseCommand,
    },
    /// List expense categories, their subcategories and allocation ratios
    Categories {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Show the budget dashboard for one month
    Budget {
        /// Month to show (YYYY-MM); defaults to the current month
        #[arg(long, value_parser = parse_period)]
        period: Option<PeriodArg>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Show per-month surplus and cumulative savings
    Savings {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Show spending totals per calendar month
    Trend {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum SalaryCommand {
    /// Save the salary for a month, replacing any carried-forward value
    Set {
        /// Salary amount, greater than zero
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        /// Month to save (YYYY-MM); defaults to the current month
        #[arg(long, value_parser = parse_period)]
        period: Option<PeriodArg>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Show the salary in effect for a month, carrying forward if needed
    Show {
        /// Month to show (YYYY-MM); defaults to the current month
        #[arg(long, value_parser = parse_period)]
        period: Option<PeriodArg>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// List every stored salary with its source
    List {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ExpenseCommand {
    /// Record one expense
    Add {
        /// fixed, variable or periodic
        #[arg(long)]
        category: String,
        /// A subcategory listed under the category
        #[arg(long)]
        subcategory: String,
        /// Amount spent, greater than zero
        #[arg(long, allow_negative_numbers = true)]
        amount: f64,
        /// Optional free-text note
        #[arg(long)]
        note: Option<String>,
        /// YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS; defaults to now
        #[arg(long)]
        date: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Change fields of an existing expense
    Update {
        /// The expense id (e.g. exp_01J...)
        expense_id: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        subcategory: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        amount: Option<f64>,
        /// Pass an empty string to clear the note
        #[arg(long)]
        note: Option<String>,
        #[arg(long)]
        date: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Delete an expense
    Delete {
        /// The expense id (e.g. exp_01J...)
        expense_id: String,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// List expenses, optionally for one month
    List {
        /// Month to list (YYYY-MM); lists everything when omitted
        #[arg(long, value_parser = parse_period)]
        period: Option<PeriodArg>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Bulk-load expenses from a JSON or CSV snapshot
    #[command(after_long_help = EXPENSE_IMPORT_AFTER_HELP)]
    Import {
        /// Validate the snapshot without writing any expense
        #[arg(long)]
        dry_run: bool,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
        /// Path to a JSON or CSV file (use `-` for stdin)
        path: Option<String>,
    },
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::{Commands, ExpenseCommand, PeriodArg, SalaryCommand, parse_from, parse_period};

    #[test]
    fn parse_command_paths() {
        let cases: [Vec<&str>; 18] = [
            vec!["pocketplan", "salary", "set", "50000"],
            vec!["pocketplan", "salary", "set", "50000", "--period", "2024-01"],
            vec!["pocketplan", "salary", "show"],
            vec!["pocketplan", "salary", "show", "--period", "2024-02", "--json"],
            vec!["pocketplan", "salary", "list", "--json"],
            vec![
                "pocketplan",
                "expense",
                "add",
                "--category",
                "variable",
                "--subcategory",
                "Food",
                "--amount",
                "42.5",
            ],
            vec!["pocketplan", "expense", "update", "exp_1", "--amount", "10"],
            vec!["pocketplan", "expense", "update", "exp_1", "--note", ""],
            vec!["pocketplan", "expense", "delete", "exp_1", "--json"],
            vec!["pocketplan", "expense", "list"],
            vec!["pocketplan", "expense", "list", "--period", "2024-03"],
            vec!["pocketplan", "expense", "import"],
            vec!["pocketplan", "expense", "import", "--dry-run", "rows.csv"],
            vec!["pocketplan", "expense", "import", "-", "--json"],
            vec!["pocketplan", "categories"],
            vec!["pocketplan", "budget", "--period", "2024-01", "--json"],
            vec!["pocketplan", "savings"],
            vec!["pocketplan", "trend", "--json"],
        ];

        for case in cases {
            let parsed = parse_from(case.clone());
            assert!(parsed.is_ok(), "failed to parse: {case:?}");
        }
    }

    #[test]
    fn parse_salary_set_keeps_amount_and_period() {
        let parsed = parse_from(["pocketplan", "salary", "set", "50000", "--period", "2024-01"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert!(matches!(
                cli.command,
                Commands::Salary {
                    command: SalaryCommand::Set {
                        amount,
                        period: Some(PeriodArg(ref period)),
                        json: false,
                    },
                } if amount == 50000.0 && period == "2024-01"
            ));
        }
    }

    #[test]
    fn negative_amounts_reach_the_client_for_validation() {
        let salary = parse_from(["pocketplan", "salary", "set", "-5"]);
        assert!(salary.is_ok());

        let expense = parse_from([
            "pocketplan",
            "expense",
            "add",
            "--category",
            "fixed",
            "--subcategory",
            "Housing",
            "--amount",
            "-100",
        ]);
        assert!(expense.is_ok());
    }

    #[test]
    fn non_numeric_amount_is_rejected() {
        let parsed = parse_from(["pocketplan", "salary", "set", "lots"]);
        assert!(parsed.is_err());
        if let Err(err) = parsed {
            assert_eq!(err.kind(), ErrorKind::ValueValidation);
        }
    }

    #[test]
    fn period_parser_rejects_bad_shapes_and_months() {
        assert!(parse_period("2024-01").is_ok());
        assert!(parse_period("2024-1").is_err());
        assert!(parse_period("2024-13").is_err());
        assert!(parse_period("24-01-01").is_err());

        let parsed = parse_from(["pocketplan", "budget", "--period", "2024-00"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn expense_add_requires_category_subcategory_and_amount() {
        let parsed = parse_from(["pocketplan", "expense", "add", "--category", "fixed"]);
        assert!(parsed.is_err());
        if let Err(err) = parsed {
            assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        }
    }

    #[test]
    fn dry_run_and_json_both_accepted_on_import() {
        let parsed = parse_from([
            "pocketplan",
            "expense",
            "import",
            "--dry-run",
            "rows.csv",
            "--json",
        ]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert!(matches!(
                cli.command,
                Commands::Expense {
                    command: ExpenseCommand::Import {
                        dry_run: true,
                        json: true,
                        path: Some(_),
                    },
                }
            ));
        }
    }

    #[test]
    fn bare_groups_show_help() {
        for group in ["salary", "expense"] {
            let parsed = parse_from(["pocketplan", group]);
            assert!(parsed.is_err());
            if let Err(err) = parsed {
                assert_eq!(
                    err.kind(),
                    ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                );
            }
        }
    }

    #[test]
    fn help_subcommand_is_rejected() {
        let parsed = parse_from(["pocketplan", "help"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn import_help_uses_clap_display_help() {
        let parsed = parse_from(["pocketplan", "expense", "import", "--help"]);
        assert!(parsed.is_err());
        if let Err(err) = parsed {
            assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        }
    }

    #[test]
    fn group_commands_reject_json_without_a_subcommand() {
        let parsed = parse_from(["pocketplan", "salary", "--json"]);
        assert!(parsed.is_err());
    }
}
