//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Kakeibo - Personal expense tracker
#[derive(Parser)]
#[command(name = "kakeibo")]
#[command(about = "Personal expense tracker with receipt scanning", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "kakeibo.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Receipt rules file (TOML)
    ///
    /// Defaults to ~/.local/share/kakeibo/config/receipt_rules.toml when it
    /// exists, otherwise the built-in Japanese rules.
    #[arg(long, global = true)]
    pub rules: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Record an expense
    Add {
        /// Amount spent
        amount: f64,

        /// Category (e.g. 食費, 交通費)
        #[arg(short, long)]
        category: String,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Free-text description
        #[arg(short = 'm', long, default_value = "")]
        description: String,
    },

    /// List recent expenses
    List {
        /// Maximum number of expenses to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Delete an expense by id
    Delete {
        /// Expense id
        id: i64,
    },

    /// Spending reports
    Report {
        #[command(subcommand)]
        report: ReportType,
    },

    /// Show dashboard summary
    Dashboard {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Scan receipts into expense candidates
    Receipts {
        #[command(subcommand)]
        action: ReceiptsAction,
    },

    /// Export all expenses as a JSON snapshot
    Export {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace all expenses with a JSON snapshot
    Import {
        /// Snapshot file created by `kakeibo export`
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Show the active receipt rules
    Rules,
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Monday-to-Sunday week, compared with the week before
    Weekly {
        /// Any date in the week (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Calendar month, compared with the month before
    Monthly {
        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Month-by-month totals for a year
    Yearly {
        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ReceiptsAction {
    /// Recognize line items on a receipt
    Scan {
        /// Receipt image to run through OCR
        #[arg(required_unless_present = "text")]
        image: Option<PathBuf>,

        /// Already-recognized receipt text (skips OCR)
        #[arg(long, conflicts_with = "image")]
        text: Option<PathBuf>,

        /// Record the candidates as expenses
        #[arg(long)]
        import: bool,

        /// Candidate numbers to record, comma separated (default: all)
        #[arg(long, value_delimiter = ',', requires = "import")]
        select: Vec<usize>,

        /// Date to record the expenses on (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
}
