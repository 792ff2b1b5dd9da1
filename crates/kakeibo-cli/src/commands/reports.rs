//! Report command implementations

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate};
use kakeibo_core::aggregate::{
    category_report, compare_periods, daily_average, month_window, weekly_window, year_report,
    year_window,
};
use kakeibo_core::models::{CategoryReport, Comparison, MonthlyTotals};
use kakeibo_core::{Database, DashboardSummary};

use super::{format_yen, truncate};

const BAR_WIDTH: usize = 24;

/// Proportional bar for text charts
pub fn bar(amount: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || amount <= 0.0 {
        return String::new();
    }
    let filled = ((amount / max) * width as f64).round() as usize;
    "█".repeat(filled.clamp(1, width))
}

fn print_categories(report: &CategoryReport) {
    println!(
        "   {:12} │ {:>10} │ {:>6}",
        "Category", "Amount", "%"
    );
    println!("   ─────────────┼────────────┼───────");
    for share in &report.categories {
        println!(
            "   {:12} │ {:>10} │ {:>5.1}%",
            truncate(&share.category, 12),
            format_yen(share.amount),
            share.percentage
        );
    }
}

fn print_period_report(title: &str, report: &CategoryReport, previous: f64, change: Comparison) {
    println!();
    println!("📊 {}", title);
    println!("   Period: {}", report.window);
    println!("   ─────────────────────────────────────");

    if report.expense_count == 0 {
        println!("   No expenses in this period.");
        return;
    }

    println!(
        "   Total: {} ({} expenses)",
        format_yen(report.total),
        report.expense_count
    );
    println!("   vs previous: {} ({})", format_yen(previous), change);
    println!();
    print_categories(report);
}

fn print_json(report: &CategoryReport, previous: f64, change: Comparison) -> Result<()> {
    let value = serde_json::json!({
        "report": report,
        "previous_total": previous,
        "change": change,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// Week (Monday to Sunday) containing `date`, vs the week before
pub fn cmd_report_weekly(db: &Database, date: NaiveDate, json: bool) -> Result<()> {
    let expenses = db.list_expenses().context("Failed to load expenses")?;

    let report = category_report(&expenses, weekly_window(date));
    let previous = category_report(&expenses, weekly_window(date - Duration::days(7)));
    let change = compare_periods(report.total, previous.total);

    if json {
        return print_json(&report, previous.total, change);
    }
    print_period_report("Weekly Report", &report, previous.total, change);
    Ok(())
}

/// Calendar month, vs the month before
pub fn cmd_report_monthly(db: &Database, year: i32, month: u32, json: bool) -> Result<()> {
    let expenses = db.list_expenses().context("Failed to load expenses")?;

    let window = month_window(year, month)?;
    let previous_start = window
        .start
        .pred_opt()
        .context("Month out of range")?;
    let previous_window = month_window(previous_start.year(), previous_start.month())?;

    let report = category_report(&expenses, window);
    let previous = category_report(&expenses, previous_window);
    let change = compare_periods(report.total, previous.total);

    if json {
        return print_json(&report, previous.total, change);
    }
    print_period_report(
        &format!("Monthly Report ({}-{:02})", year, month),
        &report,
        previous.total,
        change,
    );
    Ok(())
}

fn print_trend(months: &MonthlyTotals) {
    let max = months.max();
    for (month0, amount) in months.iter() {
        println!(
            "   {:>2}月 │ {:>10} │ {}",
            month0 + 1,
            format_yen(amount),
            bar(amount, max, BAR_WIDTH)
        );
    }
}

/// Month-by-month totals for `year`
///
/// The daily average counts days up to `today` for the current year and the
/// whole year otherwise.
pub fn cmd_report_yearly(db: &Database, year: i32, today: NaiveDate, json: bool) -> Result<()> {
    let expenses = db.list_expenses().context("Failed to load expenses")?;
    let report = year_report(&expenses, year);

    let window = year_window(year)?;
    let as_of = if window.contains(today) {
        today
    } else {
        window.end
    };
    let average = daily_average(report.total, as_of);

    if json {
        let value = serde_json::json!({
            "report": report,
            "daily_average": average.round(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!();
    println!("📈 Yearly Report ({})", year);
    println!("   Period: {}", window);
    println!("   ─────────────────────────────────────");

    if report.total == 0.0 {
        println!("   No expenses in {}.", year);
        return Ok(());
    }

    print_trend(&report.months);
    println!("   ─────────────────────────────────────");
    println!("   Total:         {}", format_yen(report.total));
    println!("   Daily average: {}", format_yen(average));
    Ok(())
}

pub fn cmd_dashboard(db: &Database, today: NaiveDate, json: bool) -> Result<()> {
    let expenses = db.list_expenses().context("Failed to load expenses")?;
    let summary = DashboardSummary::build(&expenses, today);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│          💴 Kakeibo Dashboard           │");
    println!("╰─────────────────────────────────────────╯");
    println!();

    if summary.is_empty() {
        println!("  No expenses recorded yet. Add one with 'kakeibo add'.");
        return Ok(());
    }

    println!(
        "  This month:    {:>10}  ({} vs last month)",
        format_yen(summary.month_total),
        summary.month_change
    );
    println!(
        "  This week:     {:>10}  ({} vs last week)",
        format_yen(summary.week_total),
        summary.week_change
    );
    println!("  This year:     {:>10}", format_yen(summary.year_total));
    println!("  Daily average: {:>10}", format_yen(summary.daily_average));
    println!("  Records:       {:>10}", summary.total_count);

    if !summary.month_categories.is_empty() {
        println!();
        println!("  🗂️  This month by category");
        for share in &summary.month_categories {
            println!(
                "     {:12} {:>10}  {:>5.1}%",
                truncate(&share.category, 12),
                format_yen(share.amount),
                share.percentage
            );
        }
    }

    println!();
    println!("  🧾 Recent expenses");
    for expense in &summary.recent {
        println!(
            "     {}  {:10} {:>10}  {}",
            expense.date,
            truncate(&expense.category, 10),
            format_yen(expense.amount),
            truncate(&expense.description, 24)
        );
    }

    println!();
    println!("  📈 {} trend", today.year());
    print_trend(&summary.trend);
    println!();

    Ok(())
}
