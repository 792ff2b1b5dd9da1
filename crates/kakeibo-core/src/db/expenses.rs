//! Expense operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};
use tracing::{debug, info};

use super::{format_datetime, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Expense, NewExpense};

const EXPENSE_COLUMNS: &str = "id, date, category, amount, description, created_at";

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    let date_str: String = row.get(1)?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let created_at: String = row.get(5)?;

    Ok(Expense {
        id: row.get(0)?,
        date,
        category: row.get(2)?,
        amount: row.get(3)?,
        description: row.get(4)?,
        created_at: parse_datetime(&created_at),
    })
}

impl Database {
    /// Insert an expense and return it with its assigned id
    pub fn add_expense(&self, expense: &NewExpense) -> Result<Expense> {
        expense.validate()?;
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO expenses (date, category, amount, description) VALUES (?1, ?2, ?3, ?4)",
            params![
                expense.date.to_string(),
                expense.category.trim(),
                expense.amount,
                expense.description,
            ],
        )?;
        let id = conn.last_insert_rowid();
        info!("Added expense #{} ({} {})", id, expense.category, expense.amount);

        let stored = conn.query_row(
            &format!("SELECT {} FROM expenses WHERE id = ?1", EXPENSE_COLUMNS),
            params![id],
            expense_from_row,
        )?;
        Ok(stored)
    }

    /// Insert several expenses atomically (e.g. confirmed receipt items)
    ///
    /// Nothing is stored if any expense is invalid.
    pub fn add_expenses(&self, expenses: &[NewExpense]) -> Result<Vec<Expense>> {
        for expense in expenses {
            expense.validate()?;
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let mut ids = Vec::with_capacity(expenses.len());

        for expense in expenses {
            tx.execute(
                "INSERT INTO expenses (date, category, amount, description) VALUES (?1, ?2, ?3, ?4)",
                params![
                    expense.date.to_string(),
                    expense.category.trim(),
                    expense.amount,
                    expense.description,
                ],
            )?;
            ids.push(tx.last_insert_rowid());
        }

        let mut stored = Vec::with_capacity(ids.len());
        {
            let mut stmt = tx.prepare(&format!(
                "SELECT {} FROM expenses WHERE id = ?1",
                EXPENSE_COLUMNS
            ))?;
            for id in &ids {
                stored.push(stmt.query_row(params![id], expense_from_row)?);
            }
        }
        tx.commit()?;

        info!("Added {} expenses", stored.len());
        Ok(stored)
    }

    /// Get a single expense by id
    pub fn get_expense(&self, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        let expense = conn
            .query_row(
                &format!("SELECT {} FROM expenses WHERE id = ?1", EXPENSE_COLUMNS),
                params![id],
                expense_from_row,
            )
            .optional()?;
        Ok(expense)
    }

    /// Delete an expense; returns false if no expense had that id
    pub fn delete_expense(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM expenses WHERE id = ?1", params![id])?;
        if deleted > 0 {
            info!("Deleted expense #{}", id);
        } else {
            debug!("No expense #{} to delete", id);
        }
        Ok(deleted > 0)
    }

    /// All expenses, newest date first (ties: newest id first)
    pub fn list_expenses(&self) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses ORDER BY date DESC, id DESC",
            EXPENSE_COLUMNS
        ))?;

        let expenses = stmt
            .query_map([], expense_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(expenses)
    }

    /// Number of stored expenses
    pub fn count_expenses(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Replace every stored expense with `expenses`, keeping their ids
    pub fn replace_all_expenses(&self, expenses: &[Expense]) -> Result<usize> {
        for expense in expenses {
            if !expense.amount.is_finite() || expense.amount < 0.0 {
                return Err(Error::InvalidData(format!(
                    "Expense #{} has invalid amount {}",
                    expense.id, expense.amount
                )));
            }
            if expense.category.trim().is_empty() {
                return Err(Error::InvalidData(format!(
                    "Expense #{} has an empty category",
                    expense.id
                )));
            }
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM expenses", [])?;

        for expense in expenses {
            tx.execute(
                "INSERT INTO expenses (id, date, category, amount, description, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    expense.id,
                    expense.date.to_string(),
                    expense.category.trim(),
                    expense.amount,
                    expense.description,
                    format_datetime(&expense.created_at),
                ],
            )?;
        }
        tx.commit()?;

        info!("Replaced expense store with {} expenses", expenses.len());
        Ok(expenses.len())
    }
}
