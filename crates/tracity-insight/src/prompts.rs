//! Prompt tables for insight generation.

use tracity_core::{ChartKind, Record};

/// Analysis guidance per chart kind. Kinds without an entry use `bar`'s.
const CHART_GUIDANCE: &[(ChartKind, &str)] = &[
    (
        ChartKind::Bar,
        "Focus on comparative analysis between different states/regions. Highlight top performers and underperformers.",
    ),
    (
        ChartKind::Line,
        "Emphasize trends over time, seasonal patterns, and rate of change. Look for growth or decline patterns.",
    ),
    (
        ChartKind::Pie,
        "Analyze proportional relationships and market share. Focus on distribution and relative contributions.",
    ),
    (
        ChartKind::Doughnut,
        "Similar to pie chart but emphasize the central metric and overall composition.",
    ),
];

pub fn chart_guidance(chart: ChartKind) -> &'static str {
    CHART_GUIDANCE
        .iter()
        .find(|(kind, _)| *kind == chart)
        .or_else(|| CHART_GUIDANCE.first())
        .map(|(_, text)| *text)
        .unwrap_or_default()
}

/// Domain framing for a known collection: (dataset description, checklist).
fn domain(collection: &str) -> Option<(&'static str, [&'static str; 5])> {
    match collection {
        "crimes" => Some((
            "crime data from Indian states",
            [
                "Crime patterns across states",
                "Trends over time",
                "Most affected regions",
                "Crime type distribution",
                "Policy implications",
            ],
        )),
        "power_consumption" => Some((
            "power consumption data from Indian states",
            [
                "Power consumption patterns across states",
                "Energy efficiency trends",
                "Industrial vs residential consumption",
                "Regional energy demands",
                "Infrastructure development indicators",
            ],
        )),
        "covid_stats" => Some((
            "COVID-19 statistics from Indian states",
            [
                "Mortality patterns across states",
                "Timeline of impacts",
                "Regional variations",
                "Public health implications",
                "Recovery patterns",
            ],
        )),
        "aqi" => Some((
            "Air Quality Index data from Indian states",
            [
                "Air pollution levels across states",
                "Trends over time",
                "Most polluted regions",
                "Environmental concerns",
                "Health implications",
            ],
        )),
        "literacy" => Some((
            "literacy rate data from Indian states",
            [
                "Education levels across states",
                "Progress over time",
                "Regional disparities",
                "Socioeconomic factors",
                "Policy effectiveness",
            ],
        )),
        _ => None,
    }
}

/// Collection-specific framing of the analysis request.
pub fn insight_context(collection: &str, sample: &[Record], chart: ChartKind) -> String {
    let Some((description, checklist)) = domain(collection) else {
        return format!(
            "Analyzing data from {} with {} records for {} visualization.",
            collection,
            sample.len(),
            chart
        );
    };

    let fields: Vec<&str> = sample
        .first()
        .map(|r| r.keys().map(String::as_str).collect())
        .unwrap_or_default();

    let mut out = format!(
        "Analyzing {} for {} chart visualization. The dataset contains {} records.\n\
         Key fields: {}\n\n\
         Chart Type Context: {}\n\n\
         Provide insights about:\n",
        description,
        chart,
        sample.len(),
        fields.join(", "),
        chart_guidance(chart),
    );
    for (i, item) in checklist.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, item));
    }
    out
}

/// Compact JSON of the first `n` records.
pub fn sample_json(sample: &[Record], n: usize) -> String {
    let head = &sample[..sample.len().min(n)];
    serde_json::to_string(head).unwrap_or_else(|_| "[]".to_string())
}

pub fn enhanced_system_prompt(chart: ChartKind) -> String {
    format!(
        "You are an expert data analyst specializing in Indian socioeconomic data and {chart} chart visualization. \
         Provide detailed, research-backed insights optimized for {chart} charts."
    )
}

pub fn enhanced_user_prompt(
    collection: &str,
    sample: &[Record],
    query: &str,
    chart: ChartKind,
) -> String {
    format!(
        r#"{context}

User query: "{query}"
Sample data: {data}

Provide a comprehensive analysis optimized for {chart} chart visualization in JSON format:
{{
    "insight": "Detailed analytical insight optimized for {chart} visualization (150-200 words)",
    "chart_type": "{chart}",
    "key_findings": ["Finding 1 relevant to {chart}", "Finding 2", "Finding 3"],
    "anomalies": ["Any unusual patterns detected"],
    "trend": "Overall trend (increasing/decreasing/stable/volatile)",
    "recommendations": ["Policy or action recommendation 1", "Recommendation 2"],
    "comparison_insights": "How different states/regions compare (optimized for {chart})",
    "temporal_analysis": "Analysis of trends over time",
    "visualization_notes": "Specific insights about why {chart} chart is effective for this data"
}}"#,
        context = insight_context(collection, sample, chart),
        data = sample_json(sample, 3),
    )
}

pub const QUICK_SYSTEM_PROMPT: &str = "You are an expert data analyst. Always respond with valid JSON.";

pub fn quick_user_prompt(sample: &[Record], query: &str) -> String {
    format!(
        r#"Analyze this dataset and provide insights for the query: "{query}"

Data sample: {data}

Respond with a JSON object containing:
- insight: A clear, actionable insight (max 100 words)
- chart_type: Recommended chart type (bar, line, pie, scatter, area)
- key_metrics: Array of important metrics found
- anomalies: Array of any unusual patterns or outliers detected
- trend: Overall trend direction (increasing, decreasing, stable, volatile)"#,
        data = sample_json(sample, 5),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Vec<Record> {
        (0..5)
            .map(|i| {
                json!({"state": "Goa", "year": 2020 + i, "aqi": 100 + i})
                    .as_object()
                    .unwrap()
                    .clone()
            })
            .collect()
    }

    #[test]
    fn test_guidance_defaults_to_bar() {
        assert_eq!(chart_guidance(ChartKind::Scatter), chart_guidance(ChartKind::Bar));
        assert_ne!(chart_guidance(ChartKind::Line), chart_guidance(ChartKind::Bar));
    }

    #[test]
    fn test_known_collection_gets_checklist() {
        let ctx = insight_context("aqi", &sample(), ChartKind::Line);
        assert!(ctx.contains("Air Quality Index"));
        assert!(ctx.contains("5. Health implications"));
        assert!(ctx.contains("Key fields: aqi, state, year"));
        assert!(ctx.contains(chart_guidance(ChartKind::Line)));
    }

    #[test]
    fn test_unknown_collection_gets_one_liner() {
        let ctx = insight_context("weather", &sample(), ChartKind::Bar);
        assert_eq!(ctx, "Analyzing data from weather with 5 records for bar visualization.");
    }

    #[test]
    fn test_prompt_carries_three_records() {
        let prompt = enhanced_user_prompt("aqi", &sample(), "q", ChartKind::Bar);
        assert!(prompt.contains("\"year\":2022"));
        assert!(!prompt.contains("\"year\":2023"));
        assert!(prompt.contains("\"visualization_notes\""));
    }
}
