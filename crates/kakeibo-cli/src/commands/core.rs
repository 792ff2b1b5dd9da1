//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `load_rules` - Shared utility to resolve receipt rules
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use kakeibo_core::{Database, ReceiptRules};

/// Open the expense database, creating it if needed
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .with_context(|| format!("Database path is not valid UTF-8: {}", db_path.display()))?;
    Database::new(path_str).context("Failed to open database")
}

/// Resolve receipt rules from --rules, the data dir or the built-in table
pub fn load_rules(rules_path: Option<&Path>) -> Result<ReceiptRules> {
    ReceiptRules::load(rules_path).context("Failed to load receipt rules")
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;
    println!("   Database file: {}", db.path());
    let count = db.count_expenses().context("Failed to read expenses")?;
    if count > 0 {
        println!("   Existing database with {} expenses", count);
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Record an expense: kakeibo add 1200 -c 食費 -m ランチ");
    println!("  2. Scan a receipt:    kakeibo receipts scan receipt.jpg");
    println!("  3. See this month:    kakeibo report monthly");

    Ok(())
}
