//! Kakeibo Core Library
//!
//! Shared functionality for the Kakeibo expense tracker:
//! - SQLite expense store with migrations
//! - Weekly/monthly/yearly aggregation and period comparison
//! - Dashboard summary
//! - Receipt text extraction with configurable rules
//! - Pluggable OCR engines (tesseract, mock)
//! - JSON snapshot export/import

pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod ocr;
pub mod receipt;

/// Test utilities: expense fixtures and sample receipt text
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{CategoryRule, ReceiptRules};
pub use dashboard::DashboardSummary;
pub use db::Database;
pub use error::{Error, Result};
pub use export::{ExpenseSnapshot, SnapshotMetadata};
pub use models::{
    CandidateItem, CategoryReport, CategoryShare, CategoryTotals, Comparison, DateWindow,
    Direction, Expense, MonthlyTotals, NewExpense, YearReport,
};
pub use ocr::{scan_receipt, MockEngine, OcrEngine, TesseractEngine};
pub use receipt::ReceiptExtractor;
