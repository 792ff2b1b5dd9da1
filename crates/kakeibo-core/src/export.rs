//! JSON snapshots of the expense store
//!
//! A snapshot holds every expense with its original id, so importing one
//! restores the store exactly (replace-all).

use std::collections::HashSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::Expense;

/// Snapshot metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Application version that created the snapshot
    pub version: String,
    /// When the snapshot was created (RFC 3339)
    pub created_at: String,
    /// Number of expenses in the snapshot
    pub total_records: i64,
}

/// Full expense store snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSnapshot {
    pub metadata: SnapshotMetadata,
    pub expenses: Vec<Expense>,
}

impl ExpenseSnapshot {
    pub fn new(expenses: Vec<Expense>) -> Self {
        Self {
            metadata: SnapshotMetadata {
                version: env!("CARGO_PKG_VERSION").to_string(),
                created_at: Utc::now().to_rfc3339(),
                total_records: expenses.len() as i64,
            },
            expenses,
        }
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the snapshot is internally consistent before it replaces the store
    pub fn validate(&self) -> Result<()> {
        if self.metadata.total_records != self.expenses.len() as i64 {
            return Err(Error::InvalidData(format!(
                "Snapshot says {} records but contains {}",
                self.metadata.total_records,
                self.expenses.len()
            )));
        }

        let mut ids = HashSet::new();
        for expense in &self.expenses {
            if !ids.insert(expense.id) {
                return Err(Error::InvalidData(format!(
                    "Snapshot contains expense #{} more than once",
                    expense.id
                )));
            }
        }
        Ok(())
    }
}

impl Database {
    /// Export every expense as a snapshot
    pub fn export_snapshot(&self) -> Result<ExpenseSnapshot> {
        let expenses = self.list_expenses()?;
        info!("Exporting {} expenses", expenses.len());
        Ok(ExpenseSnapshot::new(expenses))
    }

    /// Replace the whole store with the snapshot's expenses
    ///
    /// Returns the number of expenses imported.
    pub fn import_snapshot(&self, snapshot: &ExpenseSnapshot) -> Result<usize> {
        snapshot.validate()?;
        let imported = self.replace_all_expenses(&snapshot.expenses)?;
        info!(
            "Imported snapshot from version {} ({} expenses)",
            snapshot.metadata.version, imported
        );
        Ok(imported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewExpense;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seeded_db() -> Database {
        let db = Database::in_memory().unwrap();
        db.add_expense(&NewExpense::new(date(2024, 1, 5), "食費", 1200.0, "ランチ"))
            .unwrap();
        db.add_expense(&NewExpense::new(date(2024, 1, 6), "交通費", 300.0, "バス"))
            .unwrap();
        db
    }

    #[test]
    fn test_export_snapshot() {
        let db = seeded_db();
        let snapshot = db.export_snapshot().unwrap();

        assert_eq!(snapshot.metadata.total_records, 2);
        assert_eq!(snapshot.metadata.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(snapshot.expenses, db.list_expenses().unwrap());
    }

    #[test]
    fn test_snapshot_restores_into_fresh_store() {
        let source = seeded_db();
        let json = source.export_snapshot().unwrap().to_json().unwrap();
        assert!(json.contains("\"total_records\": 2"));

        let target = Database::in_memory().unwrap();
        target
            .add_expense(&NewExpense::new(date(2023, 7, 1), "娯楽", 5.0, "stale"))
            .unwrap();

        let snapshot = ExpenseSnapshot::from_json(&json).unwrap();
        assert_eq!(target.import_snapshot(&snapshot).unwrap(), 2);
        assert_eq!(target.list_expenses().unwrap(), source.list_expenses().unwrap());
    }

    #[test]
    fn test_import_rejects_inconsistent_snapshot() {
        let db = seeded_db();
        let mut snapshot = db.export_snapshot().unwrap();

        snapshot.metadata.total_records = 5;
        assert!(matches!(
            db.import_snapshot(&snapshot),
            Err(Error::InvalidData(_))
        ));

        snapshot.metadata.total_records = 3;
        let duplicate = snapshot.expenses[0].clone();
        snapshot.expenses.push(duplicate);
        assert!(db.import_snapshot(&snapshot).is_err());

        assert_eq!(db.count_expenses().unwrap(), 2);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            ExpenseSnapshot::from_json("{not json"),
            Err(Error::Json(_))
        ));
    }
}
