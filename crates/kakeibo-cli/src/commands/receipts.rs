//! Receipt workflow CLI commands

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use kakeibo_core::models::{CandidateItem, NewExpense};
use kakeibo_core::ocr::scan_receipt;
use kakeibo_core::{Database, OcrEngine, ReceiptExtractor, ReceiptRules};

use super::{format_yen, truncate};

/// Where the receipt text comes from
pub enum ReceiptSource {
    /// Image to run through OCR
    Image(PathBuf),
    /// Text that was already recognized elsewhere
    Text(PathBuf),
}

/// What to do with the recognized candidates
pub struct ScanOptions {
    pub import: bool,
    /// 1-based candidate numbers; empty means all
    pub select: Vec<usize>,
    pub date: NaiveDate,
}

/// Pick candidates by their 1-based display numbers (all when `select` is empty)
pub fn select_candidates(
    candidates: Vec<CandidateItem>,
    select: &[usize],
) -> Result<Vec<CandidateItem>> {
    if select.is_empty() {
        return Ok(candidates);
    }

    for &n in select {
        if n == 0 || n > candidates.len() {
            anyhow::bail!(
                "No candidate #{} (choose between 1 and {})",
                n,
                candidates.len()
            );
        }
    }

    Ok(candidates
        .into_iter()
        .enumerate()
        .filter(|(i, _)| select.contains(&(i + 1)))
        .map(|(_, c)| c)
        .collect())
}

async fn recognize(
    extractor: &ReceiptExtractor,
    engine: &dyn OcrEngine,
    source: &ReceiptSource,
) -> Result<Vec<CandidateItem>> {
    match source {
        ReceiptSource::Text(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(extractor.extract(&text))
        }
        ReceiptSource::Image(path) => {
            println!("🔍 Reading {} with {}...", path.display(), engine.name());
            Ok(scan_receipt(engine, extractor, path).await?)
        }
    }
}

/// Recognize receipt line items and optionally record them as expenses
pub async fn cmd_receipts_scan(
    db: &Database,
    rules: ReceiptRules,
    engine: &dyn OcrEngine,
    source: &ReceiptSource,
    options: &ScanOptions,
) -> Result<()> {
    let extractor = ReceiptExtractor::new(rules).context("Failed to compile receipt rules")?;
    let fallback = extractor.rules().uncategorized_label.clone();

    let candidates = recognize(&extractor, engine, source).await.map_err(|e| {
        anyhow!(
            "Could not read the receipt ({:#}). Enter the items manually with 'kakeibo add'.",
            e
        )
    })?;

    if candidates.is_empty() {
        println!("No line items recognized. Enter the items manually with 'kakeibo add'.");
        return Ok(());
    }

    println!();
    println!("🧾 Receipt candidates ({})", candidates.len());
    println!("   ─────────────────────────────────────────────");
    for (i, item) in candidates.iter().enumerate() {
        println!(
            "   {:>2}. {:30} {:>10}  {}",
            i + 1,
            truncate(&item.name, 30),
            format_yen(item.amount as f64),
            item.category_or(&fallback)
        );
    }
    println!();

    if !options.import {
        println!("Record them with --import (optionally --select 1,3 and --date YYYY-MM-DD).");
        return Ok(());
    }

    let chosen = select_candidates(candidates, &options.select)?;
    let expenses: Vec<NewExpense> = chosen
        .into_iter()
        .map(|c| c.into_new_expense(options.date, &fallback))
        .collect();

    let stored = db
        .add_expenses(&expenses)
        .context("Failed to record receipt items")?;
    let total: f64 = stored.iter().map(|e| e.amount).sum();
    println!(
        "✓ Recorded {} expenses on {} ({})",
        stored.len(),
        options.date,
        format_yen(total)
    );

    Ok(())
}

/// Show the active receipt rules
pub fn cmd_rules(rules: &ReceiptRules) -> Result<()> {
    println!();
    println!("🧾 Receipt Rules");
    println!("   ─────────────────────────────────────────────");
    println!(
        "   Line format:   <name> {}<amount>{}",
        rules.currency_mark, rules.unit_suffix
    );
    println!("   Name limit:    {} characters", rules.max_name_chars);
    println!("   Excluded:      {}", rules.excluded_labels.join(", "));
    println!("   Uncategorized: {}", rules.uncategorized_label);
    println!("   OCR language:  {}", rules.ocr_language);
    println!();
    println!("   Categories (first match wins):");
    for rule in &rules.categories {
        println!("     {:10} {}", rule.name, rule.keywords.join(", "));
    }
    println!();
    Ok(())
}
