//! Test utilities for kakeibo-core
//!
//! Expense fixtures and sample OCR output shared by unit, integration and
//! CLI tests.

use chrono::NaiveDate;

use crate::db::Database;
use crate::models::NewExpense;

/// OCR output of a small convenience-store receipt
pub const SAMPLE_RECEIPT_TEXT: &str = "\
ファミリーストア 駅前店
2024年1月5日 12:30
コーヒー ¥450
パン 180円
サラダ 1,280円
パン 180円
小計 1,910円
消費税 152円
合計 2,062円
お預かり 3,000円
";

/// Calendar date shorthand; panics on an invalid date
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

/// A spread of expenses across two years and several categories
pub fn sample_new_expenses() -> Vec<NewExpense> {
    vec![
        NewExpense::new(date(2023, 12, 28), "食費", 900.0, "忘年会の買い出し"),
        NewExpense::new(date(2024, 1, 1), "食費", 1000.0, "おせち"),
        NewExpense::new(date(2024, 1, 3), "交通費", 300.0, "バス"),
        NewExpense::new(date(2024, 1, 7), "食費", 500.0, "パン"),
        NewExpense::new(date(2024, 1, 8), "娯楽", 1800.0, "映画"),
        NewExpense::new(date(2024, 2, 14), "日用品", 650.0, "洗剤"),
        NewExpense::new(date(2024, 2, 29), "医療費", 2500.0, "病院"),
    ]
}

/// Fresh store seeded with [`sample_new_expenses`]
pub fn seeded_database() -> Database {
    let db = Database::in_memory().expect("create test database");
    db.add_expenses(&sample_new_expenses())
        .expect("seed test database");
    db
}
