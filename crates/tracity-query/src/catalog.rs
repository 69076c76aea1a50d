//! Metadata catalog: which filter values a collection offers.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use crate::collections::{CollectionProfile, YearEncoding, REGION_FIELD};
use tracity_core::record::IDENTITY_KEY;
use tracity_core::Result;
use tracity_store::DocumentStore;

/// Filter values available for one collection. Regions and years are
/// sorted ascending without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionMetadata {
    pub collection: String,
    #[serde(rename = "available_states")]
    pub available_regions: Vec<String>,
    pub available_years: Vec<i32>,
    pub available_fields: Vec<String>,
    #[serde(default)]
    pub special_filters: BTreeMap<String, Vec<String>>,
}

impl CollectionMetadata {
    /// Well-formed metadata with nothing to filter on.
    pub fn empty(collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            ..Default::default()
        }
    }

    pub fn declares(&self, special_filter: &str) -> bool {
        self.special_filters.contains_key(special_filter)
    }
}

pub struct MetadataCatalog {
    store: Arc<dyn DocumentStore>,
}

impl MetadataCatalog {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Describe a collection. Never fails: store faults are logged and an
    /// empty description is returned, since callers read "no metadata" as
    /// "no filters available".
    pub async fn describe(&self, collection: &str) -> CollectionMetadata {
        match self.try_describe(collection).await {
            Ok(metadata) => metadata,
            Err(e) => {
                error!("Error getting metadata for {}: {}", collection, e);
                CollectionMetadata::empty(collection)
            }
        }
    }

    async fn try_describe(&self, collection: &str) -> Result<CollectionMetadata> {
        let profile = CollectionProfile::for_collection(collection);

        let available_regions = self
            .store
            .distinct_values(collection, REGION_FIELD)
            .await?
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let available_years = match profile.years {
            YearEncoding::Field(field) => {
                let raw = self.store.distinct_values(collection, field).await?;
                years_from_values(&raw)
            }
            YearEncoding::DatePrefix(field) => {
                let raw = self.store.distinct_values(collection, field).await?;
                years_from_dates(&raw)
            }
        };

        let available_fields = self
            .store
            .find_one(collection)
            .await?
            .map(|sample| {
                sample
                    .keys()
                    .filter(|k| k.as_str() != IDENTITY_KEY)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let mut special_filters = BTreeMap::new();
        for filter in profile.special_filters {
            let values: BTreeSet<String> = self
                .store
                .distinct_values(collection, filter.field)
                .await?
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
            special_filters.insert(filter.name.to_string(), values.into_iter().collect());
        }

        Ok(CollectionMetadata {
            collection: collection.to_string(),
            available_regions,
            available_years,
            available_fields,
            special_filters,
        })
    }
}

/// Years from a direct year field. Integral numbers and numeric strings are
/// accepted; anything else is dropped.
pub fn years_from_values(values: &[Value]) -> Vec<i32> {
    values
        .iter()
        .filter_map(|v| match v {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        })
        .filter_map(|y| i32::try_from(y).ok())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Years from ISO date strings: the first four characters, when they are
/// digits. Short or malformed values are discarded.
pub fn years_from_dates(values: &[Value]) -> Vec<i32> {
    values
        .iter()
        .filter_map(Value::as_str)
        .filter_map(|s| {
            let prefix = s.get(..4)?;
            if prefix.bytes().all(|b| b.is_ascii_digit()) {
                prefix.parse::<i32>().ok()
            } else {
                None
            }
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tracity_core::Record;
    use tracity_store::MemoryStore;

    fn records(values: Vec<Value>) -> Vec<Record> {
        values
            .into_iter()
            .map(|v| v.as_object().unwrap().clone())
            .collect()
    }

    async fn catalog() -> MetadataCatalog {
        let store = MemoryStore::new();
        store
            .insert_many(
                "crimes",
                records(vec![
                    json!({"state": "Kerala", "year": 2021, "crime_type": "Theft", "cases_reported": 10}),
                    json!({"state": "Delhi", "year": 2020, "crime_type": "Fraud", "cases_reported": 20}),
                    json!({"state": "Kerala", "year": 2020, "crime_type": "Theft", "cases_reported": 5}),
                ]),
            )
            .await
            .unwrap();
        store
            .insert_many(
                "covid_stats",
                records(vec![
                    json!({"state": "Goa", "date": "2021-01-05", "deaths": 3}),
                    json!({"state": "Goa", "date": "2020-06-01", "deaths": 1}),
                    json!({"state": "Goa", "date": "202", "deaths": 0}),
                    json!({"state": "Goa", "date": "2020-12-31", "deaths": 2}),
                ]),
            )
            .await
            .unwrap();
        MetadataCatalog::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_describe_direct_year_collection() {
        let metadata = catalog().await.describe("crimes").await;
        assert_eq!(metadata.available_regions, vec!["Delhi", "Kerala"]);
        assert_eq!(metadata.available_years, vec![2020, 2021]);
        assert_eq!(
            metadata.available_fields,
            vec!["cases_reported", "crime_type", "state", "year"]
        );
        assert_eq!(
            metadata.special_filters.get("crime_types"),
            Some(&vec!["Fraud".to_string(), "Theft".to_string()])
        );
    }

    #[tokio::test]
    async fn test_describe_date_encoded_collection() {
        let metadata = catalog().await.describe("covid_stats").await;
        assert_eq!(metadata.available_years, vec![2020, 2021]);
        assert!(metadata.special_filters.is_empty());
    }

    #[tokio::test]
    async fn test_missing_collection_is_empty_but_well_formed() {
        let metadata = catalog().await.describe("nothing_here").await;
        assert_eq!(metadata, CollectionMetadata::empty("nothing_here"));
    }

    #[tokio::test]
    async fn test_describe_is_repeatable() {
        let catalog = catalog().await;
        let first = catalog.describe("crimes").await;
        let second = catalog.describe("crimes").await;
        assert_eq!(first, second);
    }

    #[test]
    fn test_years_from_dates_discards_short_values() {
        let values = vec![
            json!("2021-02-01"),
            json!("2020-01-01"),
            json!("20"),
            json!("abcd-01-01"),
            json!(2022),
            json!("2020-05-05"),
        ];
        assert_eq!(years_from_dates(&values), vec![2020, 2021]);
    }

    #[test]
    fn test_years_from_values_is_lenient() {
        let values = vec![json!(2021), json!(2020.0), json!("2019"), json!(2020.5), json!(true)];
        assert_eq!(years_from_values(&values), vec![2019, 2020, 2021]);
    }
}
