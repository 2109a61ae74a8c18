use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use finance_tracker::{
    Amount, MonthlyTotal, Transaction, TransactionId,
    client::{ApiClient, ClientError, FormInput, Ledger, LedgerAction, Submission, TransactionForm},
    format_date, monthly_totals,
};

/// Widest bar drawn by the `chart` command.
const CHART_WIDTH: usize = 40;

/// A command line client for the finance tracker API.
///
/// The API base URL is read from FINANCE_API_URL, e.g. http://localhost:3000/api.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all transactions, most recent first.
    List,
    /// Record a new transaction.
    Add {
        /// The amount in dollars, negative for expenses.
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
        /// The date as YYYY-MM-DD.
        #[arg(long)]
        date: String,
        /// What the transaction was for.
        #[arg(long)]
        description: String,
    },
    /// Change an existing transaction. Fields that are not given keep their value.
    Edit {
        /// The ID of the transaction to edit.
        id: String,
        /// The new amount in dollars.
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<String>,
        /// The new date as YYYY-MM-DD.
        #[arg(long)]
        date: Option<String>,
        /// The new description.
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a transaction.
    Delete {
        /// The ID of the transaction to delete.
        id: String,
    },
    /// Show the monthly totals of the last six months.
    Chart,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let client = ApiClient::from_env();

    match run(args.command, &client).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, client: &ApiClient) -> Result<(), ClientError> {
    let mut ledger = Ledger::new();
    ledger.apply(LedgerAction::Load(client.list_transactions().await?));

    match command {
        Command::List => print_table(&ledger),
        Command::Add {
            amount,
            date,
            description,
        } => {
            let form = TransactionForm::create(client.clone());
            let input = FormInput {
                amount,
                date,
                description,
            };

            if let Submission::Saved(transaction) = form.submit(input).await? {
                println!("Added transaction {}", transaction.id);
                ledger.apply(LedgerAction::Add(transaction));
            }

            print_table(&ledger);
        }
        Command::Edit {
            id,
            amount,
            date,
            description,
        } => {
            let transaction = client.get_transaction(&TransactionId::new(id)).await?;
            let (form, mut input) = TransactionForm::edit(client.clone(), &transaction);
            input.amount = amount.unwrap_or(input.amount);
            input.date = date.unwrap_or(input.date);
            input.description = description.unwrap_or(input.description);

            if let Submission::Saved(transaction) = form.submit(input).await? {
                println!("Updated transaction {}", transaction.id);
                ledger.apply(LedgerAction::Replace(transaction));
            }

            print_table(&ledger);
        }
        Command::Delete { id } => {
            let id = TransactionId::new(id);
            client.delete_transaction(&id).await?;
            println!("Deleted transaction {id}");
            ledger.apply(LedgerAction::Remove(id));

            print_table(&ledger);
        }
        Command::Chart => print_chart(&monthly_totals(ledger.transactions())),
    }

    Ok(())
}

fn print_table(ledger: &Ledger) {
    println!("{}", render_table(ledger));
}

fn render_table(ledger: &Ledger) -> String {
    if ledger.is_empty() {
        return "No transactions found".to_owned();
    }

    let description_width = ledger
        .transactions()
        .iter()
        .map(|transaction| transaction.description.chars().count())
        .max()
        .unwrap_or(0)
        .max("Description".len());

    let mut lines = vec![format!(
        "{:<32}  {:<10}  {:<description_width$}  {:>12}",
        "ID", "Date", "Description", "Amount"
    )];

    for Transaction {
        id,
        amount,
        date,
        description,
    } in ledger.transactions()
    {
        lines.push(format!(
            "{:<32}  {:<10}  {:<description_width$}  {:>12}",
            id.as_str(),
            format_date(*date),
            description,
            amount.to_string()
        ));
    }

    lines.join("\n")
}

fn print_chart(totals: &[MonthlyTotal]) {
    println!("{}", render_chart(totals));
}

fn render_chart(totals: &[MonthlyTotal]) -> String {
    if totals.is_empty() {
        return "No data to display".to_owned();
    }

    let largest = totals
        .iter()
        .map(|month| month.total.cents().unsigned_abs())
        .max()
        .unwrap_or(0);

    let mut lines = vec!["Monthly Expenses".to_owned()];

    for month in totals {
        lines.push(format!(
            "{:<8}  {:>12}  {}",
            month.label(),
            month.total.to_string(),
            bar(month.total, largest)
        ));
    }

    lines.join("\n")
}

/// A bar of '#' for income or '-' for expenses, scaled against `largest` cents.
fn bar(total: Amount, largest: u64) -> String {
    if largest == 0 {
        return String::new();
    }

    let length = (total.cents().unsigned_abs() as f64 / largest as f64 * CHART_WIDTH as f64)
        .round() as usize;
    let symbol = if total < Amount::ZERO { "-" } else { "#" };

    symbol.repeat(length)
}
