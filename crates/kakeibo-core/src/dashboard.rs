//! Dashboard summary
//!
//! One snapshot of the numbers shown on the overview screen, computed from
//! the full expense list and the current date.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::aggregate::{
    category_breakdown, compare_periods, daily_average, expenses_in_month, expenses_in_window,
    expenses_in_year, group_by_category, group_by_month, shift_months, total, weekly_window,
};
use crate::models::{CategoryShare, Comparison, DateWindow, Expense, MonthlyTotals};

/// Number of expenses listed under "recent"
pub const RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub today: NaiveDate,

    pub month_total: f64,
    pub last_month_total: f64,
    pub month_change: Comparison,

    pub week: DateWindow,
    pub week_total: f64,
    pub last_week_total: f64,
    pub week_change: Comparison,

    pub year_total: f64,
    /// Year-to-date spend per day, rounded to the nearest unit
    pub daily_average: f64,
    pub total_count: usize,

    /// This month's categories, largest first
    pub month_categories: Vec<CategoryShare>,
    /// Most recent expenses, newest date first (ties: newest id first)
    pub recent: Vec<Expense>,
    /// Current year, January to December
    pub trend: MonthlyTotals,
}

impl DashboardSummary {
    pub fn build(expenses: &[Expense], today: NaiveDate) -> Self {
        let this_month = expenses_in_month(expenses, today.year(), today.month());
        let last_month_date = shift_months(today, -1);
        let last_month = expenses_in_month(expenses, last_month_date.year(), last_month_date.month());
        let month_total = total(this_month.iter().copied());
        let last_month_total = total(last_month);

        let week = weekly_window(today);
        let last_week = weekly_window(today - Duration::days(7));
        let week_total = total(expenses_in_window(expenses, week));
        let last_week_total = total(expenses_in_window(expenses, last_week));

        let year_total = total(expenses_in_year(expenses, today.year()));

        let mut recent: Vec<Expense> = expenses.to_vec();
        recent.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        recent.truncate(RECENT_LIMIT);

        Self {
            today,
            month_total,
            last_month_total,
            month_change: compare_periods(month_total, last_month_total),
            week,
            week_total,
            last_week_total,
            week_change: compare_periods(week_total, last_week_total),
            year_total,
            daily_average: daily_average(year_total, today).round(),
            total_count: expenses.len(),
            month_categories: category_breakdown(&group_by_category(this_month)),
            recent,
            trend: group_by_month(expenses, today.year()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Direction;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(id: i64, d: NaiveDate, category: &str, amount: f64) -> Expense {
        Expense {
            id,
            date: d,
            category: category.to_string(),
            amount,
            description: String::new(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_empty_dashboard() {
        let summary = DashboardSummary::build(&[], date(2024, 3, 15));

        assert!(summary.is_empty());
        assert_eq!(summary.month_total, 0.0);
        assert_eq!(summary.month_change, Comparison::NoBaseline);
        assert_eq!(summary.week_change, Comparison::NoBaseline);
        assert_eq!(summary.daily_average, 0.0);
        assert!(summary.month_categories.is_empty());
        assert!(summary.recent.is_empty());
        assert_eq!(summary.trend.total(), 0.0);
    }

    #[test]
    fn test_month_and_week_comparisons() {
        // 2024-03-13 is a Wednesday; its week is 03-11..03-17
        let today = date(2024, 3, 13);
        let expenses = vec![
            expense(1, date(2024, 2, 10), "食費", 1000.0),
            expense(2, date(2024, 3, 5), "食費", 600.0),
            expense(3, date(2024, 3, 11), "交通費", 400.0),
            expense(4, date(2024, 3, 12), "食費", 500.0),
            expense(5, date(2024, 3, 20), "娯楽", 0.0),
        ];
        let summary = DashboardSummary::build(&expenses, today);

        assert_eq!(summary.month_total, 1500.0);
        assert_eq!(summary.last_month_total, 1000.0);
        assert_eq!(
            summary.month_change,
            Comparison::Change {
                direction: Direction::Up,
                percent: 50
            }
        );

        assert_eq!(summary.week, DateWindow::new(date(2024, 3, 11), date(2024, 3, 17)));
        assert_eq!(summary.week_total, 900.0);
        assert_eq!(summary.last_week_total, 600.0);
        assert_eq!(
            summary.week_change,
            Comparison::Change {
                direction: Direction::Up,
                percent: 50
            }
        );

        assert_eq!(summary.month_categories[0].category, "食費");
        assert_eq!(summary.month_categories[0].amount, 1100.0);
        assert_eq!(summary.total_count, 5);
    }

    #[test]
    fn test_last_month_clamps_day() {
        // March 31st looks back to February, not an invalid Feb 31st
        let today = date(2024, 3, 31);
        let expenses = vec![expense(1, date(2024, 2, 29), "食費", 800.0)];
        let summary = DashboardSummary::build(&expenses, today);

        assert_eq!(summary.last_month_total, 800.0);
        assert_eq!(
            summary.month_change,
            Comparison::Change {
                direction: Direction::Down,
                percent: 100
            }
        );
    }

    #[test]
    fn test_year_totals_and_rounded_average() {
        let today = date(2024, 1, 3);
        let expenses = vec![
            expense(1, date(2023, 12, 31), "食費", 9999.0),
            expense(2, date(2024, 1, 1), "食費", 500.0),
            expense(3, date(2024, 1, 2), "食費", 500.0),
        ];
        let summary = DashboardSummary::build(&expenses, today);

        assert_eq!(summary.year_total, 1000.0);
        // 1000 / 3 = 333.33..
        assert_eq!(summary.daily_average, 333.0);
        assert_eq!(summary.trend.get(0), 1000.0);
        assert_eq!(summary.trend.total(), summary.year_total);
    }

    #[test]
    fn test_recent_is_limited_and_ordered() {
        let mut expenses = Vec::new();
        for id in 1..=15 {
            expenses.push(expense(id, date(2024, 5, (id % 5 + 1) as u32), "食費", 100.0));
        }
        let summary = DashboardSummary::build(&expenses, date(2024, 5, 31));

        assert_eq!(summary.recent.len(), RECENT_LIMIT);
        let keys: Vec<(NaiveDate, i64)> = summary.recent.iter().map(|e| (e.date, e.id)).collect();
        let mut sorted = keys.clone();
        sorted.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));
        assert_eq!(keys, sorted);
        // ids 4, 9, 14 fall on May 5th
        assert_eq!(summary.recent[0].id, 14);
        assert_eq!(summary.recent[2].id, 4);
    }
}
