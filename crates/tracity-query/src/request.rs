//! Structured filter requests and lenient parsing of loose inputs.

use serde::{Deserialize, Serialize};
use tracing::debug;

use tracity_core::{ChartKind, CompiledQuery, Error, Result, SortDirection};

/// Structured filter request, as posted by the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterRequest {
    pub collection: String,
    #[serde(default, rename = "states")]
    pub regions: Option<Vec<String>>,
    #[serde(default)]
    pub years: Option<Vec<i32>>,
    /// Collection-specific categorical filter (crime types for `crimes`).
    #[serde(default, rename = "crime_types")]
    pub categorical_filter: Option<Vec<String>>,
    #[serde(default, rename = "sort_by")]
    pub sort_field: Option<String>,
    #[serde(default, rename = "sort_order")]
    pub sort_direction: SortDirection,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default, rename = "chart_type")]
    pub chart_type_hint: ChartKind,
}

fn default_limit() -> i64 {
    CompiledQuery::DEFAULT_LIMIT as i64
}

impl FilterRequest {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            limit: default_limit(),
            ..Default::default()
        }
    }

    /// Non-positive limits fall back to the default.
    pub fn effective_limit(&self) -> usize {
        if self.limit > 0 {
            usize::try_from(self.limit).unwrap_or(usize::MAX)
        } else {
            CompiledQuery::DEFAULT_LIMIT
        }
    }
}

/// Split a comma-separated region list, dropping empty fragments.
pub fn parse_regions_csv(csv: Option<&str>) -> Vec<String> {
    csv.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Split a comma-separated year list. Fragments that are not integers are
/// dropped one by one; the rest of the list still applies.
pub fn parse_years_csv(csv: Option<&str>) -> Vec<i32> {
    let Some(csv) = csv else {
        return Vec::new();
    };
    csv.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| match parse_year(part) {
            Ok(year) => Some(year),
            Err(e) => {
                debug!("Ignoring year fragment: {}", e);
                None
            }
        })
        .collect()
}

pub fn parse_year(raw: &str) -> Result<i32> {
    raw.trim()
        .parse()
        .map_err(|_| Error::MalformedInput(format!("year '{}'", raw)))
}

/// Parse a positive row limit.
pub fn parse_limit(raw: &str) -> Result<i64> {
    match raw.trim().parse::<i64>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(Error::MalformedInput(format!("limit '{}'", raw))),
    }
}
