//! Free-text intent extraction.
//!
//! Pure and case-insensitive: regions come from the alias table, years from
//! a bounded four-digit pattern, and the target collection from an ordered
//! keyword policy.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::regions;

/// Structured reading of a free-text question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryIntent {
    /// Detected region keys (lower-case), in alias-table order.
    #[serde(rename = "states")]
    pub regions: Vec<String>,
    /// Candidate years in order of appearance; duplicates kept.
    pub years: Vec<i32>,
    pub collection: Option<String>,
    #[serde(rename = "data_type")]
    pub topic: Option<String>,
    #[serde(rename = "original_query")]
    pub raw_text: String,
}

impl QueryIntent {
    /// True when the text names a collection and narrows it by region or year.
    pub fn is_targeted(&self) -> bool {
        self.collection.is_some() && (!self.regions.is_empty() || !self.years.is_empty())
    }
}

/// One entry of the topic policy.
pub struct TopicRule {
    pub keywords: &'static [&'static str],
    pub collection: &'static str,
    pub topic: &'static str,
}

/// Topic policy, evaluated top to bottom; the first rule with any keyword
/// present in the text wins. Crime outranks education, which outranks air
/// quality, which outranks power.
pub const TOPIC_RULES: &[TopicRule] = &[
    TopicRule {
        keywords: &["crime", "murder", "theft", "assault", "fraud"],
        collection: "crimes",
        topic: "crime",
    },
    TopicRule {
        keywords: &["literacy", "education", "literate"],
        collection: "literacy",
        topic: "literacy",
    },
    TopicRule {
        keywords: &["aqi", "air quality", "pollution", "air"],
        collection: "aqi",
        topic: "air quality",
    },
    TopicRule {
        keywords: &["power", "electricity", "energy", "consumption"],
        collection: "power_consumption",
        topic: "power consumption",
    },
];

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(20[0-2][0-9])\b").unwrap());

/// Parse a free-text question into a [`QueryIntent`].
pub fn extract(text: &str) -> QueryIntent {
    let lower = text.to_lowercase();

    let regions = regions::detect(&lower);
    let years = YEAR_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().parse::<i32>().ok())
        .collect();

    let rule = TOPIC_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| lower.contains(kw)));

    QueryIntent {
        regions,
        years,
        collection: rule.map(|r| r.collection.to_string()),
        topic: rule.map(|r| r.topic.to_string()),
        raw_text: text.to_string(),
    }
}
