use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

use tally_core::{
    CategoryTotal, Correction, RuleStore, RulesError, Session, SessionError, Transaction,
};
use tally_ingest::parse_statement_csv;

mod config;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version,
    about = "Categorize bank statements with a keyword ruleset that learns from corrections"
)]
struct Cli {
    /// Rules file to use instead of ~/.tally/categories.json
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ingest a statement CSV, categorize it, and print the review tables
    Review {
        /// Path to the statement CSV (defaults to ./sample_statement.csv)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Limit rows printed per table (summaries always cover everything)
        #[arg(long)]
        limit: Option<usize>,

        /// Print the whole session as JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Move one transaction to another category and learn its details
    Correct {
        /// Path to the statement CSV (defaults to ./sample_statement.csv)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Transaction id as shown by `tally review` (e.g. txn-0002)
        #[arg(long)]
        id: String,

        /// Target category
        #[arg(long)]
        to: String,
    },

    /// Inspect and edit the category ruleset
    Categories {
        #[command(subcommand)]
        command: CategoriesCommand,
    },

    /// Config file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CategoriesCommand {
    /// List categories in store order with keyword counts
    List,
    /// Create a new empty category
    Add { name: String },
    /// Print the stored keywords of one category
    Show { name: String },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default ~/.tally/config.toml if none exists
    Init,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let rules_path = match cli.rules {
        Some(path) => path,
        None => state::rules_path()?,
    };

    match cli.command {
        Command::Review { csv, limit, json } => {
            let csv = csv.unwrap_or_else(default_statement_csv);
            review(&rules_path, &csv, limit, json)?;
        }

        Command::Correct { csv, id, to } => {
            let csv = csv.unwrap_or_else(default_statement_csv);
            correct(&rules_path, &csv, &id, &to)?;
        }

        Command::Categories { command } => match command {
            CategoriesCommand::List => categories_list(&rules_path)?,
            CategoriesCommand::Add { name } => categories_add(&rules_path, &name)?,
            CategoriesCommand::Show { name } => categories_show(&rules_path, &name)?,
        },

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
        },
    }

    Ok(())
}

fn default_statement_csv() -> PathBuf {
    // Prefer repo-root sample_statement.csv when running from the workspace
    PathBuf::from("sample_statement.csv")
}

fn open_store(rules_path: &Path) -> Result<RuleStore> {
    RuleStore::open(rules_path)
        .with_context(|| format!("loading rules from {}", rules_path.display()))
}

fn open_session(rules_path: &Path, csv: &Path) -> Result<Session> {
    if !csv.exists() {
        bail!("statement not found: {} (pass --csv <path>)", csv.display());
    }

    let store = open_store(rules_path)?;
    let txns = parse_statement_csv(csv).with_context(|| format!("parsing {}", csv.display()))?;

    let mut session = Session::new(store);
    session.load_transactions(txns);
    Ok(session)
}

fn review(rules_path: &Path, csv: &Path, limit: Option<usize>, json: bool) -> Result<()> {
    let config = config::load_config()?;
    let session = open_session(rules_path, csv)?;

    if json {
        return print_json(&session);
    }

    println!(
        "Parsed {} transactions from {}\n",
        session.transactions().len(),
        csv.display()
    );

    let expenses: Vec<&Transaction> = session.expenses().collect();
    let shown = limit.unwrap_or(expenses.len()).min(expenses.len());
    println!("Expenses ({} of {})", shown, expenses.len());
    print_rows(&expenses[..shown], &config.currency);

    println!("\nExpense summary");
    let summary = session.expense_summary();
    let grand: f64 = summary.iter().map(|c| c.total).sum();
    for row in &summary {
        let share = if grand == 0.0 {
            0.0
        } else {
            row.total / grand * 100.0
        };
        println!(
            "  {:<20} {:>14} {:>6.1}%  count={}",
            row.category,
            format!("{:.2} {}", row.total, config.currency),
            share,
            row.count
        );
    }

    let credits: Vec<&Transaction> = session.credits().collect();
    let shown = limit.unwrap_or(credits.len()).min(credits.len());
    println!("\nPayments ({} of {})", shown, credits.len());
    print_rows(&credits[..shown], &config.currency);
    println!(
        "\nTotal payments: {:.2} {}",
        session.credits_total(),
        config.currency
    );

    Ok(())
}

fn print_rows(rows: &[&Transaction], currency: &str) {
    for txn in rows {
        println!(
            "  {:<8}  {}  {:<24} {:>14}  {}",
            txn.id,
            txn.date.format("%d/%m/%Y"),
            truncate(&txn.details, 24),
            format!("{:.2} {}", txn.amount, currency),
            txn.category
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max - 3).collect();
        format!("{cut}...")
    }
}

#[derive(Serialize)]
struct SessionView<'a> {
    transactions: &'a [Transaction],
    expense_summary: Vec<CategoryTotal>,
    payments_total: f64,
    categories: Vec<&'a str>,
}

fn print_json(session: &Session) -> Result<()> {
    let view = SessionView {
        transactions: session.transactions(),
        expense_summary: session.expense_summary(),
        payments_total: session.credits_total(),
        categories: session.store().categories().collect(),
    };
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

fn correct(rules_path: &Path, csv: &Path, id: &str, to: &str) -> Result<()> {
    let mut session = open_session(rules_path, csv)?;

    let details = session
        .transactions()
        .iter()
        .find(|t| t.id == id)
        .map(|t| t.details.trim().to_string());

    match session.correct(id, to) {
        Ok(Correction::Unchanged) => {
            println!("{id} already has category '{to}'; nothing to do");
        }
        Ok(Correction::Applied { keyword_added }) => {
            println!("moved {id} to '{to}'");
            if keyword_added {
                if let Some(details) = details {
                    println!("learned keyword '{details}'");
                }
                println!("rules saved to {}", session.store().path().display());
            } else {
                println!("no new keyword stored (blank or already known)");
            }
        }
        Err(SessionError::Rules(RulesError::CategoryNotFound(name))) => {
            let known: Vec<&str> = session.store().categories().collect();
            bail!(
                "category '{}' does not exist (known: {})",
                name,
                known.join(", ")
            );
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}

fn categories_list(rules_path: &Path) -> Result<()> {
    let store = open_store(rules_path)?;
    println!("Rules: {}", store.path().display());
    for name in store.categories() {
        let count = store.keywords(name).map_or(0, |k| k.len());
        println!("  {:<20} {} keywords", name, count);
    }
    Ok(())
}

fn categories_add(rules_path: &Path, name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("category name is empty");
    }

    let mut store = open_store(rules_path)?;
    if store.add_category(name)? {
        println!("added '{}' ({})", name, store.path().display());
    } else {
        println!("'{name}' already exists");
    }
    Ok(())
}

fn categories_show(rules_path: &Path, name: &str) -> Result<()> {
    let store = open_store(rules_path)?;
    match store.keywords(name) {
        None => {
            let known: Vec<&str> = store.categories().collect();
            bail!(
                "category '{}' does not exist (known: {})",
                name,
                known.join(", ")
            );
        }
        Some(keywords) if keywords.is_empty() => {
            println!("'{name}' has no keywords yet; corrections add them");
        }
        Some(keywords) => {
            for keyword in keywords {
                println!("{keyword}");
            }
        }
    }
    Ok(())
}
