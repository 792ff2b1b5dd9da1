//! Expense command implementations

use anyhow::{Context, Result};
use chrono::NaiveDate;
use kakeibo_core::{Database, NewExpense};

use super::{format_yen, truncate};

pub fn cmd_add(
    db: &Database,
    date: NaiveDate,
    category: &str,
    amount: f64,
    description: &str,
) -> Result<()> {
    let expense = db
        .add_expense(&NewExpense::new(date, category, amount, description))
        .context("Failed to add expense")?;

    println!(
        "✓ Added expense #{}: {} {} {}",
        expense.id,
        expense.date,
        expense.category,
        format_yen(expense.amount)
    );
    Ok(())
}

pub fn cmd_list(db: &Database, limit: usize) -> Result<()> {
    let expenses = db.list_expenses().context("Failed to list expenses")?;

    if expenses.is_empty() {
        println!("No expenses recorded yet. Add one with 'kakeibo add'.");
        return Ok(());
    }

    println!();
    println!(
        "{:>6}  {:10}  {:10}  {:>10}  Description",
        "ID", "Date", "Category", "Amount"
    );
    println!("{}", "─".repeat(64));

    for expense in expenses.iter().take(limit) {
        println!(
            "{:>6}  {:10}  {:10}  {:>10}  {}",
            expense.id,
            expense.date.to_string(),
            truncate(&expense.category, 10),
            format_yen(expense.amount),
            truncate(&expense.description, 30)
        );
    }

    if expenses.len() > limit {
        println!("   ... and {} more", expenses.len() - limit);
    }
    println!();
    Ok(())
}

pub fn cmd_delete(db: &Database, id: i64) -> Result<()> {
    if db.delete_expense(id).context("Failed to delete expense")? {
        println!("✓ Deleted expense #{}", id);
        Ok(())
    } else {
        anyhow::bail!("Expense #{} not found", id)
    }
}
