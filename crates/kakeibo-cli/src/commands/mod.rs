//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init) and shared utilities (open_db, load_rules)
//! - `expenses` - Expense commands (add, list, delete)
//! - `export` - Snapshot export/import commands
//! - `receipts` - Receipt scanning and rules commands
//! - `reports` - Weekly/monthly/yearly reports and dashboard

pub mod core;
pub mod expenses;
pub mod export;
pub mod receipts;
pub mod reports;

// Re-export command functions for main.rs
pub use core::*;
pub use expenses::*;
pub use export::*;
pub use receipts::*;
pub use reports::*;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format an amount as whole yen with thousands separators (¥1,234)
pub fn format_yen(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0 {
        format!("-¥{}", grouped)
    } else {
        format!("¥{}", grouped)
    }
}

/// Parse a YYYY-MM-DD date, or fall back to `default`
pub fn parse_date_or(date: Option<&str>, default: NaiveDate) -> Result<NaiveDate> {
    match date {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}' (use YYYY-MM-DD)", d)),
        None => Ok(default),
    }
}

/// Parse a YYYY-MM month into (year, month), or use `default`'s month
pub fn parse_month_or(month: Option<&str>, default: NaiveDate) -> Result<(i32, u32)> {
    let Some(month) = month else {
        return Ok((default.year(), default.month()));
    };

    let first = NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}' (use YYYY-MM)", month))?;
    Ok((first.year(), first.month()))
}
