//! Domain models for Kakeibo

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub date: NaiveDate,
    pub category: String,
    pub amount: f64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// New expense for creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub description: String,
}

impl NewExpense {
    pub fn new(
        date: NaiveDate,
        category: impl Into<String>,
        amount: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date,
            category: category.into(),
            amount,
            description: description.into(),
        }
    }

    /// Check the invariants every stored expense must satisfy
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(Error::InvalidData(format!(
                "Amount must be a non-negative number, got {}",
                self.amount
            )));
        }
        if self.category.trim().is_empty() {
            return Err(Error::InvalidData("Category must not be empty".into()));
        }
        Ok(())
    }
}

/// A line item recognized on a receipt, pending user review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateItem {
    pub name: String,
    pub amount: u64,
    /// Inferred category; `None` when no keyword matched
    pub category: Option<String>,
}

impl CandidateItem {
    /// Category to display, falling back to the given label
    pub fn category_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.category.as_deref().unwrap_or(fallback)
    }

    /// Turn a confirmed candidate into an expense recorded on `date`
    pub fn into_new_expense(self, date: NaiveDate, fallback_category: &str) -> NewExpense {
        let category = self
            .category
            .unwrap_or_else(|| fallback_category.to_string());
        NewExpense {
            date,
            category,
            amount: self.amount as f64,
            description: self.name,
        }
    }
}

// ========== Report Models ==========

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered, both ends included
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl std::fmt::Display for DateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ~ {}", self.start, self.end)
    }
}

/// Category name to summed amount, iterated in lexical order
pub type CategoryTotals = BTreeMap<String, f64>;

/// Summed amounts per month of one year, index 0 = January
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MonthlyTotals(pub [f64; 12]);

impl MonthlyTotals {
    /// Amount for a zero-based month index
    pub fn get(&self, month0: usize) -> f64 {
        self.0.get(month0).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(0.0, f64::max)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.0.iter().copied().enumerate()
    }
}

/// One category's share of a period total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: f64,
    pub percentage: f64,
}

/// Direction of a period-over-period change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Flat => "flat",
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Up => "📈",
            Self::Down => "📉",
            Self::Flat => "→",
        }
    }
}

/// Result of comparing a period total against the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Comparison {
    /// Previous period total was zero
    NoBaseline,
    Change { direction: Direction, percent: u64 },
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoBaseline => write!(f, "no baseline"),
            Self::Change { direction, percent } => write!(f, "{} {}%", direction.arrow(), percent),
        }
    }
}

/// Category report for one window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReport {
    pub window: DateWindow,
    pub total: f64,
    pub expense_count: usize,
    pub categories: Vec<CategoryShare>,
}

/// Month-by-month report for one year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearReport {
    pub year: i32,
    pub total: f64,
    pub months: MonthlyTotals,
}
