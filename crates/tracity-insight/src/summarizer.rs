//! Insight summarization with a deterministic local fallback.
//!
//! The generator's output is untrusted text. Anything that does not parse
//! into an object with a non-empty `insight` is treated as a failed call.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::prompts;
use crate::providers::TextGenerator;
use crate::types::{InsightResult, QuickInsight, Trend};
use tracity_core::{ChartKind, Record};

const ENHANCED_MAX_TOKENS: usize = 800;
const QUICK_MAX_TOKENS: usize = 500;

pub struct InsightSummarizer {
    generator: Arc<dyn TextGenerator>,
}

impl InsightSummarizer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Full analysis of a sample. Never fails.
    pub async fn summarize(
        &self,
        sample: &[Record],
        collection: &str,
        query: &str,
        chart: ChartKind,
    ) -> InsightResult {
        let system = prompts::enhanced_system_prompt(chart);
        let user = prompts::enhanced_user_prompt(collection, sample, query, chart);

        match self.generator.complete(&system, &user, ENHANCED_MAX_TOKENS).await {
            Ok(text) => match parse_object(&text).and_then(|obj| insight_from(&obj, chart)) {
                Some(result) => {
                    debug!("Generated insight for {} ({} chart)", collection, chart);
                    result
                }
                None => {
                    warn!("Unusable insight response for {}; using fallback", collection);
                    fallback_insight(chart)
                }
            },
            Err(e) => {
                warn!("Insight generation failed for {}: {}", collection, e);
                fallback_insight(chart)
            }
        }
    }

    /// Short insight for the general chat path. Never fails.
    pub async fn quick_insight(&self, sample: &[Record], query: &str) -> QuickInsight {
        let user = prompts::quick_user_prompt(sample, query);

        match self
            .generator
            .complete(prompts::QUICK_SYSTEM_PROMPT, &user, QUICK_MAX_TOKENS)
            .await
        {
            Ok(text) => parse_object(&text)
                .and_then(|obj| quick_from(&obj))
                .unwrap_or_else(|| {
                    warn!("Unusable quick insight response; using fallback");
                    fallback_quick()
                }),
            Err(e) => {
                warn!("Quick insight generation failed: {}", e);
                fallback_quick()
            }
        }
    }
}

/// Static analysis returned whenever the generator cannot be used. The same
/// text serves every collection.
pub fn fallback_insight(chart: ChartKind) -> InsightResult {
    InsightResult {
        narrative: format!(
            "Analysis of the selected data shows various patterns across Indian states. \
             The data provides valuable insights into regional variations and trends over time, \
             optimized for {chart} visualization."
        ),
        chart_type: chart.to_string(),
        key_findings: strings(&[
            "Regional variations observed",
            "Temporal trends identified",
            "Data quality is good",
        ]),
        anomalies: Vec::new(),
        trend: Trend::Stable,
        recommendations: strings(&["Continue monitoring", "Implement targeted policies"]),
        comparison_insights: "Significant differences observed between states".into(),
        temporal_analysis: "Trends show interesting patterns over the analyzed period".into(),
        visualization_notes: format!("{chart} chart effectively displays the data relationships"),
    }
}

pub fn fallback_quick() -> QuickInsight {
    QuickInsight {
        insight: "Data analysis completed. Multiple trends detected in the dataset.".into(),
        chart_type: Some(ChartKind::Bar),
        key_metrics: strings(&["count", "average"]),
        anomalies: Vec::new(),
        trend: Trend::Stable,
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Pull the outermost JSON object out of model text, tolerating code
/// fences and prose around it.
fn parse_object(text: &str) -> Option<Map<String, Value>> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    match serde_json::from_str::<Value>(&text[start..=end]).ok()? {
        Value::Object(obj) => Some(obj),
        _ => None,
    }
}

fn insight_text(obj: &Map<String, Value>) -> Option<String> {
    obj.get("insight")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn text_of(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Arrays become string lists; a bare string becomes a one-item list.
fn list_of(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    match obj.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                Value::String(_) | Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn trend_of(obj: &Map<String, Value>) -> Trend {
    obj.get("trend")
        .and_then(Value::as_str)
        .map(Trend::parse_lenient)
        .unwrap_or_default()
}

fn insight_from(obj: &Map<String, Value>, chart: ChartKind) -> Option<InsightResult> {
    let narrative = insight_text(obj)?;
    let chart_type = obj
        .get("chart_type")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| chart.to_string());

    Some(InsightResult {
        narrative,
        chart_type,
        key_findings: list_of(obj, "key_findings"),
        anomalies: list_of(obj, "anomalies"),
        trend: trend_of(obj),
        recommendations: list_of(obj, "recommendations"),
        comparison_insights: text_of(obj, "comparison_insights"),
        temporal_analysis: text_of(obj, "temporal_analysis"),
        visualization_notes: text_of(obj, "visualization_notes"),
    })
}

fn quick_from(obj: &Map<String, Value>) -> Option<QuickInsight> {
    Some(QuickInsight {
        insight: insight_text(obj)?,
        chart_type: obj.get("chart_type").and_then(Value::as_str).and_then(ChartKind::parse),
        key_metrics: list_of(obj, "key_metrics"),
        anomalies: list_of(obj, "anomalies"),
        trend: trend_of(obj),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;
    use tracity_core::{Error, Result};

    struct Scripted {
        reply: String,
        calls: Mutex<Vec<(String, usize)>>,
    }

    impl Scripted {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for Scripted {
        async fn complete(&self, _system: &str, user: &str, max_tokens: usize) -> Result<String> {
            self.calls.lock().push((user.to_string(), max_tokens));
            Ok(self.reply.clone())
        }
    }

    struct Failing;

    #[async_trait]
    impl TextGenerator for Failing {
        async fn complete(&self, _: &str, _: &str, _: usize) -> Result<String> {
            Err(Error::Upstream("connection reset".into()))
        }
    }

    fn sample() -> Vec<Record> {
        vec![json!({"state": "Delhi", "year": 2021, "cases_reported": 120})
            .as_object()
            .unwrap()
            .clone()]
    }

    #[tokio::test]
    async fn test_failure_uses_fallback() {
        let summarizer = InsightSummarizer::new(Arc::new(Failing));
        let result = summarizer
            .summarize(&sample(), "crimes", "Analyze patterns", ChartKind::Line)
            .await;
        assert_eq!(result.trend, Trend::Stable);
        assert!(!result.narrative.is_empty());
        assert_eq!(result.chart_type, "line");
        assert_eq!(result.key_findings.len(), 3);
        assert!(result.anomalies.is_empty());
    }

    #[tokio::test]
    async fn test_parses_fenced_response() {
        let reply = "```json\n{\"insight\": \"Delhi leads\", \"key_findings\": [\"a\", 2], \
                     \"trend\": \"Increasing sharply\", \"anomalies\": \"one spike\"}\n```";
        let generator = Scripted::new(reply);
        let summarizer = InsightSummarizer::new(generator.clone());
        let result = summarizer
            .summarize(&sample(), "crimes", "q", ChartKind::Bar)
            .await;

        assert_eq!(result.narrative, "Delhi leads");
        assert_eq!(result.key_findings, vec!["a".to_string(), "2".to_string()]);
        assert_eq!(result.anomalies, vec!["one spike".to_string()]);
        assert_eq!(result.trend, Trend::Increasing);
        assert_eq!(result.chart_type, "bar");
        assert_eq!(generator.calls.lock()[0].1, 800);
    }

    #[tokio::test]
    async fn test_missing_insight_is_a_failure() {
        let summarizer = InsightSummarizer::new(Scripted::new(r#"{"trend": "volatile"}"#));
        let result = summarizer
            .summarize(&sample(), "aqi", "q", ChartKind::Pie)
            .await;
        assert_eq!(result, fallback_insight(ChartKind::Pie));
    }

    #[tokio::test]
    async fn test_non_json_is_a_failure() {
        let summarizer = InsightSummarizer::new(Scripted::new("I cannot help with that."));
        let quick = summarizer.quick_insight(&sample(), "q").await;
        assert_eq!(quick, fallback_quick());
    }

    #[tokio::test]
    async fn test_quick_insight_parses() {
        let generator = Scripted::new(
            r#"{"insight": "Stable crime", "chart_type": "Line", "key_metrics": ["total"], "trend": "stable"}"#,
        );
        let summarizer = InsightSummarizer::new(generator.clone());
        let quick = summarizer.quick_insight(&sample(), "q").await;
        assert_eq!(quick.insight, "Stable crime");
        assert_eq!(quick.chart_type, Some(ChartKind::Line));
        assert_eq!(quick.key_metrics, vec!["total".to_string()]);
        assert_eq!(generator.calls.lock()[0].1, 500);
    }
}
