//! Receipt extraction rules
//!
//! The exclusion labels and the category keyword table are locale-specific,
//! so they live in a TOML file instead of code.
//!
//! ## Configuration Resolution
//!
//! 1. Explicit path (e.g. `--rules`), when it exists
//! 2. Override in data dir (~/.local/share/kakeibo/config/receipt_rules.toml)
//! 3. Embedded defaults (compiled into binary)
//!
//! Keys missing from a file keep their built-in values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Embedded default rules (compiled into binary)
const DEFAULT_RULES: &str = include_str!("../../../config/receipt_rules.toml");

/// One row of the ordered category table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| !k.is_empty() && text.contains(k.as_str()))
    }
}

/// Everything the receipt extractor needs to know about a locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptRules {
    /// Optional glyph before the amount
    pub currency_mark: String,
    /// Optional unit word after the amount
    pub unit_suffix: String,
    /// Accepted names are cut to this many characters
    pub max_name_chars: usize,
    /// Names containing any of these are totals, not items
    pub excluded_labels: Vec<String>,
    /// Display label for items without a category
    pub uncategorized_label: String,
    /// Language hint for the OCR engine
    pub ocr_language: String,
    /// Tried in order; first match wins
    pub categories: Vec<CategoryRule>,
}

impl Default for ReceiptRules {
    fn default() -> Self {
        Self {
            currency_mark: "¥".to_string(),
            unit_suffix: "円".to_string(),
            max_name_chars: 30,
            excluded_labels: ["合計", "小計", "消費税", "税"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            uncategorized_label: "その他".to_string(),
            ocr_language: "jpn".to_string(),
            categories: vec![
                CategoryRule::new(
                    "食費",
                    &[
                        "食", "飲食", "レストラン", "カフェ", "スーパー", "弁当", "食堂", "パン",
                        "米", "野菜",
                    ],
                ),
                CategoryRule::new(
                    "交通費",
                    &["電車", "バス", "タクシー", "ガソリン", "JR", "駅", "航空"],
                ),
                CategoryRule::new("日用品", &["薬局", "ドラッグストア", "スーパー", "コンビニ"]),
                CategoryRule::new("衣類", &["洋服", "靴", "ファッション", "ショップ"]),
                CategoryRule::new("医療費", &["病院", "診療所", "クリニック", "薬局"]),
                CategoryRule::new("娯楽", &["映画", "シアター", "ゲーム", "エンタメ"]),
            ],
        }
    }
}

impl ReceiptRules {
    /// Resolve rules: explicit path, then data-dir override, then embedded
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let candidates = override_path
            .map(Path::to_path_buf)
            .into_iter()
            .chain(default_rules_path());

        for path in candidates {
            if path.exists() {
                debug!("Loading receipt rules from {}", path.display());
                let content = fs::read_to_string(&path).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                return Self::from_toml(&content);
            }
        }

        if let Some(path) = override_path {
            warn!(
                "Rules file {} not found, using built-in rules",
                path.display()
            );
        }
        Self::embedded()
    }

    /// Rules compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::from_toml(DEFAULT_RULES)
    }

    /// Parse rules from TOML content, filling gaps with defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawRules = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid rules TOML: {}", e)))?;

        let mut rules = ReceiptRules::default();

        if let Some(grammar) = raw.grammar {
            if let Some(mark) = grammar.currency_mark {
                rules.currency_mark = mark;
            }
            if let Some(suffix) = grammar.unit_suffix {
                rules.unit_suffix = suffix;
            }
            if let Some(max) = grammar.max_name_chars {
                if max == 0 {
                    return Err(Error::Config("max_name_chars must be at least 1".into()));
                }
                rules.max_name_chars = max;
            }
        }

        if let Some(labels) = raw.labels {
            if let Some(excluded) = labels.excluded {
                rules.excluded_labels = excluded;
            }
            if let Some(uncategorized) = labels.uncategorized {
                rules.uncategorized_label = uncategorized;
            }
        }

        if let Some(language) = raw.ocr.and_then(|o| o.language) {
            rules.ocr_language = language;
        }

        if let Some(categories) = raw.categories {
            for category in &categories {
                if category.name.trim().is_empty() {
                    return Err(Error::Config("Category name must not be empty".into()));
                }
            }
            rules.categories = categories;
        }

        Ok(rules)
    }

    /// Whether `name` is a receipt total line rather than an item
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded_labels
            .iter()
            .any(|label| !label.is_empty() && name.contains(label.as_str()))
    }

    /// First category whose keywords appear in `name`
    pub fn category_for(&self, name: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|rule| rule.matches(name))
            .map(|rule| rule.name.as_str())
    }
}

/// Default rules override path
pub fn default_rules_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| {
        d.join("kakeibo")
            .join("config")
            .join("receipt_rules.toml")
    })
}

/// Raw rules structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawRules {
    grammar: Option<RawGrammar>,
    labels: Option<RawLabels>,
    ocr: Option<RawOcr>,
    categories: Option<Vec<CategoryRule>>,
}

#[derive(Debug, Deserialize)]
struct RawGrammar {
    currency_mark: Option<String>,
    unit_suffix: Option<String>,
    max_name_chars: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawLabels {
    excluded: Option<Vec<String>>,
    uncategorized: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawOcr {
    language: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_rules_match_builtin_defaults() {
        let rules = ReceiptRules::embedded().unwrap();
        assert_eq!(rules, ReceiptRules::default());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let rules = ReceiptRules::from_toml(
            r#"
            [labels]
            excluded = ["TOTAL", "TAX"]

            [[categories]]
            name = "Groceries"
            keywords = ["MILK", "BREAD"]
            "#,
        )
        .unwrap();

        assert_eq!(rules.excluded_labels, vec!["TOTAL", "TAX"]);
        assert_eq!(rules.categories.len(), 1);
        assert_eq!(rules.currency_mark, "¥");
        assert_eq!(rules.max_name_chars, 30);
        assert_eq!(rules.uncategorized_label, "その他");
    }

    #[test]
    fn test_invalid_rules() {
        assert!(matches!(
            ReceiptRules::from_toml("[grammar\nbroken"),
            Err(Error::Config(_))
        ));
        assert!(ReceiptRules::from_toml("[grammar]\nmax_name_chars = 0").is_err());
        assert!(ReceiptRules::from_toml("[[categories]]\nname = \"\"\nkeywords = []").is_err());
    }

    #[test]
    fn test_category_order_first_match_wins() {
        let rules = ReceiptRules::default();
        // "スーパー" is listed under both 食費 and 日用品
        assert_eq!(rules.category_for("スーパーの袋"), Some("食費"));
        // "薬局" is listed under both 日用品 and 医療費
        assert_eq!(rules.category_for("駅前薬局"), Some("交通費"));
        assert_eq!(rules.category_for("薬局"), Some("日用品"));
        assert_eq!(rules.category_for("コーヒー"), None);
    }

    #[test]
    fn test_is_excluded_matches_substrings() {
        let rules = ReceiptRules::default();
        assert!(rules.is_excluded("合計"));
        assert!(rules.is_excluded("お買上合計"));
        assert!(rules.is_excluded("(内消費税"));
        assert!(!rules.is_excluded("パン"));
    }

    #[test]
    fn test_load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        std::fs::write(&path, "[ocr]\nlanguage = \"eng\"\n").unwrap();

        let rules = ReceiptRules::load(Some(&path)).unwrap();
        assert_eq!(rules.ocr_language, "eng");
    }
}
