//! Integration tests for kakeibo-core
//!
//! These tests exercise the store → report and receipt → store workflows.

use chrono::NaiveDate;
use kakeibo_core::{
    aggregate::{self, compare_periods, weekly_window},
    models::{Comparison, Direction, NewExpense},
    Database, DashboardSummary, ExpenseSnapshot, ReceiptExtractor, ReceiptRules,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Receipt as it comes back from OCR: header noise, items, a repeated item
/// and the totals block
fn receipt_text() -> &'static str {
    "ファミリーストア 駅前店
2024年3月12日 18:04
コーヒー ¥450
パン 180円
野菜サラダ 1,280円
パン 180円
小計 1,910円
消費税 152円
合計 2,062円"
}

fn seed(db: &Database) {
    let expenses = [
        NewExpense::new(date(2024, 2, 10), "食費", 1000.0, "スーパー"),
        NewExpense::new(date(2024, 2, 20), "交通費", 600.0, "電車"),
        NewExpense::new(date(2024, 3, 4), "食費", 800.0, "ランチ"),
        NewExpense::new(date(2024, 3, 11), "娯楽", 1900.0, "映画"),
        NewExpense::new(date(2024, 3, 13), "食費", 500.0, "弁当"),
    ];
    db.add_expenses(&expenses).expect("Failed to seed expenses");
}

// =============================================================================
// Store + Aggregation
// =============================================================================

#[test]
fn test_store_to_monthly_report() {
    let db = Database::in_memory().expect("Failed to create database");
    seed(&db);

    let expenses = db.list_expenses().expect("Failed to list expenses");
    assert_eq!(expenses.len(), 5);

    let march = aggregate::expenses_in_month(&expenses, 2024, 3);
    let february = aggregate::expenses_in_month(&expenses, 2024, 2);
    let march_total = aggregate::total(march.iter().copied());
    let february_total = aggregate::total(february.iter().copied());
    assert_eq!(march_total, 3200.0);
    assert_eq!(february_total, 1600.0);

    assert_eq!(
        compare_periods(march_total, february_total),
        Comparison::Change {
            direction: Direction::Up,
            percent: 100
        }
    );

    let by_category = aggregate::group_by_category(march);
    assert_eq!(by_category["食費"], 1300.0);
    assert_eq!(by_category["娯楽"], 1900.0);
    assert!(!by_category.contains_key("交通費"));

    let months = aggregate::group_by_month(&expenses, 2024);
    assert_eq!(months.total(), 4800.0);
    assert_eq!(months.get(1), 1600.0);
    assert_eq!(months.get(2), 3200.0);
}

#[test]
fn test_deleted_expense_leaves_reports() {
    let db = Database::in_memory().expect("Failed to create database");
    seed(&db);

    let expenses = db.list_expenses().unwrap();
    let movie = expenses
        .iter()
        .find(|e| e.category == "娯楽")
        .expect("seeded movie expense");
    assert!(db.delete_expense(movie.id).unwrap());

    let expenses = db.list_expenses().unwrap();
    let week = aggregate::expenses_in_window(&expenses, weekly_window(date(2024, 3, 13)));
    assert_eq!(aggregate::total(week), 500.0);
}

#[test]
fn test_dashboard_from_store() {
    let db = Database::in_memory().expect("Failed to create database");
    seed(&db);

    let expenses = db.list_expenses().unwrap();
    let summary = DashboardSummary::build(&expenses, date(2024, 3, 13));

    assert_eq!(summary.month_total, 3200.0);
    assert_eq!(summary.week_total, 2400.0);
    assert_eq!(summary.last_week_total, 800.0);
    assert_eq!(summary.year_total, 4800.0);
    assert_eq!(summary.total_count, 5);
    assert_eq!(summary.recent[0].date, date(2024, 3, 13));
    assert_eq!(summary.month_categories[0].category, "娯楽");
}

// =============================================================================
// Receipt → Store
// =============================================================================

#[test]
fn test_receipt_candidates_to_store() {
    let db = Database::in_memory().expect("Failed to create database");
    let rules = ReceiptRules::default();
    let extractor = ReceiptExtractor::new(rules.clone()).expect("Failed to build extractor");

    let candidates = extractor.extract(receipt_text());
    let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["コーヒー", "パン", "野菜サラダ"]);

    let receipt_date = date(2024, 3, 12);
    let confirmed: Vec<NewExpense> = candidates
        .into_iter()
        .map(|c| c.into_new_expense(receipt_date, &rules.uncategorized_label))
        .collect();
    let stored = db.add_expenses(&confirmed).expect("Failed to store receipt");
    assert_eq!(stored.len(), 3);

    let expenses = db.list_expenses().unwrap();
    let totals = aggregate::group_by_category(&expenses);
    assert_eq!(totals["食費"], 1460.0);
    assert_eq!(totals["その他"], 450.0);
}

// =============================================================================
// Snapshot
// =============================================================================

#[test]
fn test_snapshot_roundtrip_preserves_reports() {
    let source = Database::in_memory().expect("Failed to create database");
    seed(&source);
    let json = source.export_snapshot().unwrap().to_json().unwrap();

    let target = Database::in_memory().expect("Failed to create database");
    let snapshot = ExpenseSnapshot::from_json(&json).unwrap();
    assert_eq!(target.import_snapshot(&snapshot).unwrap(), 5);

    let before = aggregate::year_report(&source.list_expenses().unwrap(), 2024);
    let after = aggregate::year_report(&target.list_expenses().unwrap(), 2024);
    assert_eq!(before.months, after.months);
}
