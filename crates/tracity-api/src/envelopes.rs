//! Response envelopes.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tracity_core::{ChartKind, Predicate, Record, SortDirection};
use tracity_insight::{ChartRecommendation, InsightResult, Trend};
use tracity_query::{CollectionMetadata, FilterRequest};

pub const BANNER: &str = "TRACITY API - Your AI Data Companion";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformStats {
    pub total_visualizations: u64,
    pub total_users: u64,
    pub total_datasets: u64,
    pub total_insights: u64,
}

impl PlatformStats {
    /// Dashboard counters derived from the stored record volume.
    pub fn derive(total_datasets: u64, total_records: u64) -> Self {
        Self {
            total_visualizations: total_records / 100 + 7000,
            total_users: 12000 + total_records / 1000,
            total_datasets,
            total_insights: total_records / 50 + 2500,
        }
    }
}

impl Default for PlatformStats {
    fn default() -> Self {
        Self {
            total_visualizations: 7000,
            total_users: 12000,
            total_datasets: 5,
            total_insights: 2500,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetInfo {
    pub name: String,
    pub collection: String,
    pub description: String,
    pub record_count: u64,
    pub last_updated: DateTime<Utc>,
}

/// Echo of the structured filters a request carried.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedFilters {
    pub states: Option<Vec<String>>,
    pub years: Option<Vec<i32>>,
    pub crime_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortDirection>,
}

impl AppliedFilters {
    pub fn of(req: &FilterRequest) -> Self {
        Self {
            states: req.regions.clone(),
            years: req.years.clone(),
            crime_types: req.categorical_filter.clone(),
            sort_by: None,
            sort_order: None,
        }
    }

    /// Includes the sort directive.
    pub fn with_sort(req: &FilterRequest) -> Self {
        Self {
            sort_by: req.sort_field.clone(),
            sort_order: Some(req.sort_direction),
            ..Self::of(req)
        }
    }
}

/// Echo of comma-separated query-string filters, after parsing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CsvFilters {
    pub states: Option<Vec<String>>,
    pub years: Option<Vec<i32>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilteredData {
    pub collection: String,
    pub data: Vec<Record>,
    pub total_count: u64,
    pub returned_count: usize,
    pub chart_recommendations: ChartRecommendation,
    pub applied_filters: AppliedFilters,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnhancedInsights {
    pub collection: String,
    pub total_records: u64,
    pub analyzed_sample: usize,
    pub insights: InsightResult,
    pub applied_filters: AppliedFilters,
    pub generated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Visualization {
    pub collection: String,
    pub data: Vec<Record>,
    pub chart_recommendations: ChartRecommendation,
    pub ai_insights: InsightResult,
    pub total_records: usize,
    pub metadata: CollectionMetadata,
    pub query_used: Predicate,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetInsights {
    pub collection: String,
    pub total_records: u64,
    pub insights: InsightResult,
    pub sample_size: usize,
    pub metadata: CollectionMetadata,
    pub applied_filters: CsvFilters,
    pub generated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub query: String,
    pub results: Vec<ChatResult>,
    pub total_collections_searched: usize,
}

/// One answer inside a chat response.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResult {
    pub collection: String,
    pub insight: String,
    pub chart_type: ChartKind,
    pub data: Vec<Record>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anomalies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_metrics: Option<Vec<String>>,
    pub record_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_info: Option<QueryInfo>,
}

impl ChatResult {
    /// A text-only answer with the general-path fields present but empty.
    pub fn message(collection: &str, insight: impl Into<String>) -> Self {
        Self {
            collection: collection.to_string(),
            insight: insight.into(),
            chart_type: ChartKind::Bar,
            data: Vec::new(),
            anomalies: Some(Vec::new()),
            trend: Some(Trend::Stable),
            key_metrics: Some(Vec::new()),
            record_count: 0,
            query_info: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryInfo {
    pub states: Vec<String>,
    pub years: Vec<i32>,
    pub data_type: Option<String>,
}

pub fn timestamp() -> String {
    Utc::now().to_rfc3339()
}
