//! Response shapes the dashboard depends on.
//!
//! Each envelope is serialized directly (no HTTP server needed) and checked
//! for the wire field names the frontend reads.

use chrono::Utc;
use serde_json::json;

use tracity_api::{
    AppliedFilters, ChatResponse, ChatResult, DatasetInfo, PlatformStats, QueryInfo,
};
use tracity_core::ChartKind;
use tracity_insight::summarizer::fallback_insight;
use tracity_query::{extract, CollectionMetadata, FilterRequest};

#[test]
fn test_stats_shape() {
    let json = serde_json::to_value(PlatformStats::default()).unwrap();
    for key in ["total_visualizations", "total_users", "total_datasets", "total_insights"] {
        assert!(json[key].is_number(), "missing {key}");
    }
}

#[test]
fn test_dataset_info_shape() {
    let info = DatasetInfo {
        name: "Power Consumption".into(),
        collection: "power_consumption".into(),
        description: "Power consumption and energy usage data".into(),
        record_count: 42,
        last_updated: Utc::now(),
    };
    let json = serde_json::to_value(&info).unwrap();
    assert_eq!(json["collection"], "power_consumption");
    assert!(json["last_updated"].is_string());
}

#[test]
fn test_metadata_uses_state_names() {
    let json = serde_json::to_value(CollectionMetadata::empty("aqi")).unwrap();
    assert!(json["available_states"].is_array());
    assert!(json["available_years"].is_array());
    assert!(json["available_fields"].is_array());
    assert!(json["special_filters"].is_object());
}

#[test]
fn test_filter_request_wire_names() {
    let req: FilterRequest = serde_json::from_value(json!({
        "collection": "crimes",
        "states": ["Delhi"],
        "crime_types": ["Theft"],
        "sort_by": "year",
        "sort_order": "desc",
        "limit": -3,
        "chart_type": "doughnut",
    }))
    .unwrap();
    assert_eq!(req.regions, Some(vec!["Delhi".to_string()]));
    assert_eq!(req.effective_limit(), 100);
    assert_eq!(req.chart_type_hint, ChartKind::Doughnut);

    let echo = serde_json::to_value(AppliedFilters::with_sort(&req)).unwrap();
    assert_eq!(echo["crime_types"], json!(["Theft"]));
    assert_eq!(echo["sort_order"], "desc");
}

#[test]
fn test_insight_shape() {
    let json = serde_json::to_value(fallback_insight(ChartKind::Bar)).unwrap();
    for key in [
        "insight",
        "chart_type",
        "key_findings",
        "anomalies",
        "trend",
        "recommendations",
        "comparison_insights",
        "temporal_analysis",
        "visualization_notes",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert_eq!(json["trend"], "stable");
}

#[test]
fn test_chat_shape() {
    let intent = extract("crime rate in Delhi in 2020");
    let response = ChatResponse {
        query: intent.raw_text.clone(),
        results: vec![ChatResult {
            query_info: Some(QueryInfo {
                states: intent.regions.clone(),
                years: intent.years.clone(),
                data_type: intent.topic.clone(),
            }),
            anomalies: None,
            trend: None,
            key_metrics: None,
            ..ChatResult::message("crimes", "summary")
        }],
        total_collections_searched: 1,
    };
    let json = serde_json::to_value(&response).unwrap();
    let result = &json["results"][0];
    assert_eq!(result["chart_type"], "bar");
    assert_eq!(result["query_info"]["data_type"], "crime");
    assert_eq!(result["query_info"]["years"], json!([2020]));
    assert!(result.get("trend").is_none());
    assert!(json["total_collections_searched"].is_number());
}
