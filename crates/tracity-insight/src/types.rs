//! Insight and recommendation types.

use serde::{Deserialize, Serialize};

use tracity_core::ChartKind;

/// LLM provider identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LLMProvider {
    OpenAI,
    Anthropic,
    Groq,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Groq => write!(f, "groq"),
        }
    }
}

/// Best-fit chart plus alternatives, derived from a result sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartRecommendation {
    pub recommended: ChartKind,
    pub alternatives: Vec<ChartKind>,
}

/// Overall direction of the data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    #[default]
    Stable,
    Volatile,
}

impl Trend {
    /// Read a trend out of free-form model output such as
    /// `"Increasing"` or `"volatile with a late dip"`. Unrecognized → stable.
    pub fn parse_lenient(s: &str) -> Self {
        let lower = s.to_lowercase();
        if lower.contains("volatile") {
            Self::Volatile
        } else if lower.contains("increas") {
            Self::Increasing
        } else if lower.contains("decreas") {
            Self::Decreasing
        } else {
            Self::Stable
        }
    }
}

/// Structured narrative analysis of a data sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightResult {
    #[serde(rename = "insight")]
    pub narrative: String,
    pub chart_type: String,
    pub key_findings: Vec<String>,
    pub anomalies: Vec<String>,
    pub trend: Trend,
    pub recommendations: Vec<String>,
    pub comparison_insights: String,
    pub temporal_analysis: String,
    pub visualization_notes: String,
}

/// Short insight used by the general chat path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickInsight {
    pub insight: String,
    pub chart_type: Option<ChartKind>,
    pub key_metrics: Vec<String>,
    pub anomalies: Vec<String>,
    pub trend: Trend,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_parse_lenient() {
        assert_eq!(Trend::parse_lenient("Increasing"), Trend::Increasing);
        assert_eq!(Trend::parse_lenient("slowly decreasing"), Trend::Decreasing);
        assert_eq!(Trend::parse_lenient("volatile, increasing late"), Trend::Volatile);
        assert_eq!(Trend::parse_lenient("unclear"), Trend::Stable);
    }

    #[test]
    fn test_insight_wire_shape() {
        let result = InsightResult {
            narrative: "n".into(),
            chart_type: "bar".into(),
            key_findings: vec![],
            anomalies: vec![],
            trend: Trend::Volatile,
            recommendations: vec![],
            comparison_insights: String::new(),
            temporal_analysis: String::new(),
            visualization_notes: String::new(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["insight"], "n");
        assert_eq!(json["trend"], "volatile");
        assert!(json["key_findings"].is_array());
    }
}
