//! Receipt text extraction
//!
//! Turns raw OCR text into candidate line items. Each line is matched against
//! one grammar rule:
//!
//! ```text
//! <name> <whitespace> [currency mark] <digits and commas> [unit word] <end of line>
//! ```
//!
//! e.g. `コーヒー ¥450` or `パン 180円`. OCR output is noisy, so missed or
//! spurious lines are expected; a person reviews the candidates before
//! anything is stored.

use std::collections::HashSet;

use regex::Regex;
use tracing::debug;

use crate::config::ReceiptRules;
use crate::error::Result;
use crate::models::CandidateItem;

/// Parses OCR text into deduplicated, categorized candidate items
#[derive(Debug, Clone)]
pub struct ReceiptExtractor {
    rules: ReceiptRules,
    line_pattern: Regex,
}

impl ReceiptExtractor {
    /// Build an extractor, compiling the line grammar for the given rules
    pub fn new(rules: ReceiptRules) -> Result<Self> {
        let line_pattern = Regex::new(&line_grammar(&rules))?;
        Ok(Self {
            rules,
            line_pattern,
        })
    }

    pub fn rules(&self) -> &ReceiptRules {
        &self.rules
    }

    /// Extract candidate items from a whole OCR text blob
    ///
    /// Returns an empty list when nothing matches.
    pub fn extract(&self, text: &str) -> Vec<CandidateItem> {
        // Text files saved with a UTF-8 byte order mark
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut seen = HashSet::new();
        let mut items = Vec::new();

        for line in text.lines() {
            let Some(item) = self.parse_line(line) else {
                continue;
            };
            if !seen.insert((item.name.clone(), item.amount)) {
                debug!("Duplicate receipt line skipped: {} {}", item.name, item.amount);
                continue;
            }
            items.push(item);
        }

        debug!("Extracted {} candidate items from receipt text", items.len());
        items
    }

    /// Match one line and turn it into a candidate if it passes validation
    ///
    /// The category is inferred from the full name; the stored name is
    /// truncated afterwards.
    pub fn parse_line(&self, line: &str) -> Option<CandidateItem> {
        let line = line.trim();
        let caps = self.line_pattern.captures(line)?;
        let name = caps.get(1)?.as_str().trim();
        let digits = caps.get(2)?.as_str();

        let amount = match digits.replace(',', "").parse::<u64>() {
            Ok(amount) => amount,
            Err(_) => {
                debug!("Unparseable amount on receipt line: {}", line);
                return None;
            }
        };

        // OCR sometimes reads a stray separator inside a total label
        if self.rules.is_excluded(&name.replace(',', "")) {
            debug!("Excluded receipt line: {}", line);
            return None;
        }
        if name.chars().count() <= 1 || amount == 0 {
            debug!("Rejected receipt line: {}", line);
            return None;
        }

        let category = self.rules.category_for(name).map(str::to_string);
        Some(CandidateItem {
            name: name.chars().take(self.rules.max_name_chars).collect(),
            amount,
            category,
        })
    }
}

/// Regex source for the receipt line grammar
fn line_grammar(rules: &ReceiptRules) -> String {
    format!(
        r"^(.+?)\s+{}([0-9,]+)\s*{}$",
        optional_literal(&rules.currency_mark),
        optional_literal(&rules.unit_suffix)
    )
}

fn optional_literal(text: &str) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!("(?:{})?", regex::escape(text))
    }
}
