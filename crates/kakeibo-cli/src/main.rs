//! Kakeibo CLI - Personal expense tracker
//!
//! Usage:
//!   kakeibo init                          Initialize database
//!   kakeibo add 1200 -c 食費 -m ランチ      Record an expense
//!   kakeibo report monthly                Category report for this month
//!   kakeibo receipts scan receipt.jpg     Recognize receipt line items

mod cli;
mod commands;


use anyhow::Result;
use chrono::Datelike;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let today = chrono::Local::now().date_naive();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Add {
            amount,
            category,
            date,
            description,
        } => {
            let db = commands::open_db(&cli.db)?;
            let date = commands::parse_date_or(date.as_deref(), today)?;
            commands::cmd_add(&db, date, &category, amount, &description)
        }
        Commands::List { limit } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_list(&db, limit)
        }
        Commands::Delete { id } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_delete(&db, id)
        }
        Commands::Report { report } => {
            let db = commands::open_db(&cli.db)?;
            match report {
                ReportType::Weekly { date, json } => {
                    let date = commands::parse_date_or(date.as_deref(), today)?;
                    commands::cmd_report_weekly(&db, date, json)
                }
                ReportType::Monthly { month, json } => {
                    let (year, month) = commands::parse_month_or(month.as_deref(), today)?;
                    commands::cmd_report_monthly(&db, year, month, json)
                }
                ReportType::Yearly { year, json } => {
                    let year = year.unwrap_or_else(|| today.year());
                    commands::cmd_report_yearly(&db, year, today, json)
                }
            }
        }
        Commands::Dashboard { json } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_dashboard(&db, today, json)
        }
        Commands::Receipts { action } => match action {
            ReceiptsAction::Scan {
                image,
                text,
                import,
                select,
                date,
            } => {
                let db = commands::open_db(&cli.db)?;
                let rules = commands::load_rules(cli.rules.as_deref())?;
                let date = commands::parse_date_or(date.as_deref(), today)?;
                let source = match (image, text) {
                    (_, Some(text)) => commands::ReceiptSource::Text(text),
                    (Some(image), None) => commands::ReceiptSource::Image(image),
                    (None, None) => anyhow::bail!("Pass a receipt image or --text <file>"),
                };
                let engine = kakeibo_core::TesseractEngine::from_env();
                let options = commands::ScanOptions {
                    import,
                    select,
                    date,
                };
                commands::cmd_receipts_scan(&db, rules, &engine, &source, &options).await
            }
        },
        Commands::Export { output } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_export(&db, output.as_deref())
        }
        Commands::Import { file } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_import(&db, &file)
        }
        Commands::Rules => {
            let rules = commands::load_rules(cli.rules.as_deref())?;
            commands::cmd_rules(&rules)
        }
    }
}
