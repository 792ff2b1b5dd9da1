//! Expense aggregation over calendar windows
//!
//! Everything here is pure: functions take a snapshot of expenses and return
//! new values. Mutation goes through [`crate::db::Database`].
//!
//! Weeks run Monday through Sunday. Months are 1-12 at the API boundary and
//! 0-11 inside [`MonthlyTotals`].

use std::cmp::Ordering;

use chrono::{Datelike, Duration, Months, NaiveDate};

use crate::error::{Error, Result};
use crate::models::{
    CategoryReport, CategoryShare, CategoryTotals, Comparison, DateWindow, Direction, Expense,
    MonthlyTotals, YearReport,
};

/// The Monday-to-Sunday week containing `date`
pub fn weekly_window(date: NaiveDate) -> DateWindow {
    // 0 = Sunday .. 6 = Saturday
    let weekday = date.weekday().num_days_from_sunday() as i64;
    let offset = if weekday == 0 { 6 } else { weekday - 1 };
    let start = date - Duration::days(offset);
    DateWindow::new(start, start + Duration::days(6))
}

/// First to last day of a calendar month (`month` is 1-12)
pub fn month_window(year: i32, month: u32) -> Result<DateWindow> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::InvalidData(format!("Invalid month: {}-{}", year, month)))?;
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| Error::InvalidData(format!("Month out of range: {}-{}", year, month)))?;
    Ok(DateWindow::new(start, end))
}

/// January 1st to December 31st of `year`
pub fn year_window(year: i32) -> Result<DateWindow> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| Error::InvalidData(format!("Year out of range: {}", year)))?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31)
        .ok_or_else(|| Error::InvalidData(format!("Year out of range: {}", year)))?;
    Ok(DateWindow::new(start, end))
}

/// Move `date` by `months`, clamping the day to the target month's length
pub fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = match months.cmp(&0) {
        Ordering::Greater => date.checked_add_months(Months::new(months.unsigned_abs())),
        Ordering::Less => date.checked_sub_months(Months::new(months.unsigned_abs())),
        Ordering::Equal => Some(date),
    };
    shifted.unwrap_or(date)
}

/// Expenses dated inside `window`, both ends included
pub fn expenses_in_window(expenses: &[Expense], window: DateWindow) -> Vec<&Expense> {
    expenses.iter().filter(|e| window.contains(e.date)).collect()
}

/// Expenses in the given calendar month (`month` is 1-12)
pub fn expenses_in_month(expenses: &[Expense], year: i32, month: u32) -> Vec<&Expense> {
    expenses
        .iter()
        .filter(|e| e.date.year() == year && e.date.month() == month)
        .collect()
}

/// Expenses in the given calendar year
pub fn expenses_in_year(expenses: &[Expense], year: i32) -> Vec<&Expense> {
    expenses.iter().filter(|e| e.date.year() == year).collect()
}

/// Sum of amounts
pub fn total<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> f64 {
    expenses.into_iter().map(|e| e.amount).sum()
}

/// Sum amounts per category. Categories with no expenses are absent.
pub fn group_by_category<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> CategoryTotals {
    let mut totals = CategoryTotals::new();
    for expense in expenses {
        *totals.entry(expense.category.clone()).or_insert(0.0) += expense.amount;
    }
    totals
}

/// Sum amounts per month of `year`, all twelve months present
///
/// Expenses outside `year` are ignored, so the months always add up to the
/// yearly total.
pub fn group_by_month<'a>(
    expenses: impl IntoIterator<Item = &'a Expense>,
    year: i32,
) -> MonthlyTotals {
    let mut months = MonthlyTotals::default();
    for expense in expenses.into_iter().filter(|e| e.date.year() == year) {
        months.0[expense.date.month0() as usize] += expense.amount;
    }
    months
}

/// Compare a period total against the previous period's total
pub fn compare_periods(current: f64, previous: f64) -> Comparison {
    if previous == 0.0 {
        return Comparison::NoBaseline;
    }

    let diff = current - previous;
    let direction = if diff > 0.0 {
        Direction::Up
    } else if diff < 0.0 {
        Direction::Down
    } else {
        Direction::Flat
    };
    let percent = (diff.abs() / previous * 100.0).round() as u64;

    Comparison::Change { direction, percent }
}

/// Average spend per day of the year, counting Jan 1 through `as_of`
pub fn daily_average(year_total: f64, as_of: NaiveDate) -> f64 {
    year_total / as_of.ordinal() as f64
}

/// Categories ordered by amount (largest first) with their share of the total
pub fn category_breakdown(totals: &CategoryTotals) -> Vec<CategoryShare> {
    let sum: f64 = totals.values().sum();
    let mut shares: Vec<CategoryShare> = totals
        .iter()
        .map(|(category, &amount)| CategoryShare {
            category: category.clone(),
            amount,
            percentage: if sum > 0.0 {
                (amount / sum) * 100.0
            } else {
                0.0
            },
        })
        .collect();

    shares.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(Ordering::Equal));
    shares
}

/// Category report for any window
pub fn category_report(expenses: &[Expense], window: DateWindow) -> CategoryReport {
    let subset = expenses_in_window(expenses, window);
    let totals = group_by_category(subset.iter().copied());

    CategoryReport {
        window,
        total: total(subset.iter().copied()),
        expense_count: subset.len(),
        categories: category_breakdown(&totals),
    }
}

/// Month-by-month totals for a year
pub fn year_report(expenses: &[Expense], year: i32) -> YearReport {
    let months = group_by_month(expenses, year);
    YearReport {
        year,
        total: months.total(),
        months,
    }
}
