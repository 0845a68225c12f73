use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use crate::application::LedgerService;
use crate::domain::{
    CategoryId, DATE_FORMAT, Expense, ExpenseUpdate, earliest_storable_date, format_amount,
    format_cents, latest_storable_date, parse_cents,
};

/// Expense Ledger - personal expense tracker
#[derive(Parser)]
#[command(name = "expense-ledger")]
#[command(about = "Record, update and summarize categorized expenses in a local SQLite file")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "expense_tracker.db")]
    pub database: String,

    /// Enable verbose (debug) logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database and default categories (safe to repeat)
    Init,

    /// List categories
    Categories,

    /// Record a new expense
    Add {
        /// Amount spent (e.g., "25.50" or "25")
        amount: String,

        /// Date of the expense (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Category id or name (e.g., "1" or "food")
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Change fields of an existing expense
    Update {
        /// Expense ID
        id: i64,

        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// New category id or name
        #[arg(short, long)]
        category: Option<String>,

        /// New amount; "0" is a valid amount
        #[arg(short, long)]
        amount: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: i64,
    },

    /// List expenses, optionally within a date range (inclusive)
    List {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },

    /// Show total spending per category
    Summary {
        /// Output format: table, json, csv
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Export expenses to CSV or JSON
    Export {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Format: csv, json
        #[arg(short, long, default_value = "csv")]
        format: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                let service = LedgerService::init(&self.database).await?;
                let categories = service.list_categories().await?;
                println!(
                    "Database initialized: {} ({} categories)",
                    self.database,
                    categories.len()
                );
                service.close().await;
            }

            Commands::Categories => {
                let service = connect(&self.database).await?;
                println!("{:>4}  {}", "ID", "CATEGORY");
                println!("{}", "-".repeat(24));
                for category in service.list_categories().await? {
                    println!("{:>4}  {}", category.category_id, category.category_name);
                }
                service.close().await;
            }

            Commands::Add {
                amount,
                date,
                category,
            } => {
                let service = LedgerService::init(&self.database).await?;
                let amount =
                    parse_cents(&amount).context("Invalid amount format. Use '25.50' or '25'")?;
                let date = match date {
                    Some(date_str) => parse_date(&date_str)?,
                    None => Local::now().date_naive(),
                };
                let category_id = match category {
                    Some(category) => Some(resolve_category(&service, &category).await?),
                    None => None,
                };

                let id = service.record_expense(date, category_id, amount).await?;
                println!(
                    "Recorded expense {}: {} on {}",
                    id,
                    format_cents(amount),
                    date.format(DATE_FORMAT)
                );
                service.close().await;
            }

            Commands::Update {
                id,
                date,
                category,
                amount,
            } => {
                let service = LedgerService::init(&self.database).await?;
                let mut update = ExpenseUpdate::new();
                if let Some(date_str) = date {
                    update = update.with_date(parse_date(&date_str)?);
                }
                if let Some(category) = category {
                    update = update.with_category(resolve_category(&service, &category).await?);
                }
                if let Some(amount) = amount {
                    update = update.with_amount(
                        parse_cents(&amount)
                            .context("Invalid amount format. Use '25.50' or '25'")?,
                    );
                }

                if update.is_empty() {
                    println!("Nothing to update (use --date, --category or --amount)");
                } else if service.update_expense(id, update).await? == 0 {
                    println!("No expense with ID {}", id);
                } else {
                    println!("Updated expense {}", id);
                }
                service.close().await;
            }

            Commands::Delete { id } => {
                let service = LedgerService::init(&self.database).await?;
                if service.delete_expense(id).await? == 0 {
                    println!("No expense with ID {}", id);
                } else {
                    println!("Deleted expense {}", id);
                }
                service.close().await;
            }

            Commands::List { from, to } => {
                let service = connect(&self.database).await?;
                let expenses = match parse_date_range(from, to)? {
                    Some((from, to)) => service.get_expenses_by_date_range(from, to).await?,
                    None => service.list_expenses().await?,
                };
                print_expenses(&expenses);
                service.close().await;
            }

            Commands::Summary { format } => {
                let service = connect(&self.database).await?;
                run_summary_command(&service, &format).await?;
                service.close().await;
            }

            Commands::Export {
                from,
                to,
                output,
                format,
            } => {
                let service = connect(&self.database).await?;
                let range = parse_date_range(from, to)?;
                run_export_command(&service, range, output.as_deref(), &format).await?;
                service.close().await;
            }
        }

        Ok(())
    }
}

async fn connect(database: &str) -> Result<LedgerService> {
    LedgerService::connect(database).await.with_context(|| {
        format!(
            "Could not open '{}'. Run 'expense-ledger init' first",
            database
        )
    })
}

/// Accept either a numeric category id or a category name.
async fn resolve_category(service: &LedgerService, value: &str) -> Result<CategoryId> {
    match value.trim().parse::<CategoryId>() {
        Ok(id) => Ok(id),
        Err(_) => Ok(service.get_category_by_name(value).await?.category_id),
    }
}

fn print_expenses(expenses: &[Expense]) {
    if expenses.is_empty() {
        println!("No expenses found.");
        return;
    }

    println!("{:>6}  {:<10}  {:>8}  {:>12}", "ID", "DATE", "CATEGORY", "AMOUNT");
    println!("{}", "-".repeat(42));
    for expense in expenses {
        println!(
            "{:>6}  {:<10}  {:>8}  {:>12}",
            expense.expense_id,
            expense.date.format(DATE_FORMAT),
            expense
                .category_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string()),
            format_amount(expense.amount)
        );
    }
}

async fn run_summary_command(service: &LedgerService, format: &str) -> Result<()> {
    match format {
        "json" => {
            let report = service.get_summary_report().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "csv" => {
            let exporter = crate::io::Exporter::new(service);
            exporter.export_summary_csv(std::io::stdout()).await?;
        }
        "table" => {
            let report = service.get_summary_report().await?;
            if report.categories.is_empty() {
                println!("No categorized expenses.");
                return Ok(());
            }

            println!("{:<20} {:>12} {:>8}", "CATEGORY", "TOTAL", "COUNT");
            println!("{}", "-".repeat(42));
            for total in &report.categories {
                println!(
                    "{:<20} {:>12} {:>8}",
                    total.category_name,
                    format_cents(total.total_amount),
                    total.expense_count
                );
            }
            println!("{}", "-".repeat(42));
            println!("{:<20} {:>12}", "TOTAL", format_cents(report.total));
        }
        other => anyhow::bail!("Invalid format '{}'. Valid formats: table, json, csv", other),
    }
    Ok(())
}

async fn run_export_command(
    service: &LedgerService,
    range: Option<(NaiveDate, NaiveDate)>,
    output: Option<&str>,
    format: &str,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let count = match format {
        "csv" => exporter.export_expenses_csv(writer, range).await?,
        "json" => exporter.export_json(writer, range).await?.expenses.len(),
        other => anyhow::bail!("Invalid export format '{}'. Valid formats: csv, json", other),
    };

    if output.is_some() {
        eprintln!("Exported {} expenses", count);
    }
    Ok(())
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), DATE_FORMAT)
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str))
}

/// Resolve optional bounds into a closed range. With neither bound there is
/// no range; a missing bound is open-ended.
fn parse_date_range(
    from: Option<String>,
    to: Option<String>,
) -> Result<Option<(NaiveDate, NaiveDate)>> {
    if from.is_none() && to.is_none() {
        return Ok(None);
    }

    let from = from
        .map(|s| parse_date(&s))
        .transpose()?
        .unwrap_or_else(earliest_storable_date);
    let to = to
        .map(|s| parse_date(&s))
        .transpose()?
        .unwrap_or_else(latest_storable_date);
    Ok(Some((from, to)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-10-11").unwrap(),
            NaiveDate::from_ymd_opt(2024, 10, 11).unwrap()
        );
        assert!(parse_date("11/10/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn test_parse_date_range_without_bounds() {
        assert!(parse_date_range(None, None).unwrap().is_none());
    }

    #[test]
    fn test_parse_date_range_open_end() {
        let (from, to) = parse_date_range(Some("2024-10-11".into()), None)
            .unwrap()
            .unwrap();
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 10, 11).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(9999, 12, 31).unwrap());
    }

    #[test]
    fn test_cli_parses_update_with_zero_amount() {
        let cli = Cli::try_parse_from(["expense-ledger", "update", "3", "--amount", "0"]).unwrap();
        match cli.command {
            Commands::Update { id, amount, .. } => {
                assert_eq!(id, 3);
                assert_eq!(amount.as_deref(), Some("0"));
            }
            _ => panic!("expected update command"),
        }
    }
}
