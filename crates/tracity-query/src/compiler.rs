//! Filter compilation: structured requests or free-text intents become a
//! backend-neutral [`CompiledQuery`].
//!
//! Dimensions combine with AND. Within the year dimension of a
//! date-encoded collection the per-year prefix clauses combine with OR.
//! Compilation is total: an empty filter yields the match-all predicate.

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::debug;

use crate::catalog::CollectionMetadata;
use crate::collections::{CollectionProfile, YearEncoding, REGION_FIELD};
use crate::intent::QueryIntent;
use crate::regions;
use crate::request::FilterRequest;
use tracity_core::{CompiledQuery, Predicate, SortSpec};

/// Normalized filter dimensions, whatever the request's origin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    /// Canonical stored region values.
    pub regions: Vec<String>,
    pub years: Vec<i32>,
    pub categories: Vec<String>,
    pub sort: Option<SortSpec>,
    pub limit: usize,
}

impl FilterSpec {
    pub fn from_request(req: &FilterRequest) -> Self {
        Self {
            regions: req.regions.clone().unwrap_or_default(),
            years: req.years.clone().unwrap_or_default(),
            categories: req.categorical_filter.clone().unwrap_or_default(),
            sort: req
                .sort_field
                .as_ref()
                .filter(|f| !f.trim().is_empty())
                .map(|field| SortSpec {
                    field: field.clone(),
                    direction: req.sort_direction,
                }),
            limit: req.effective_limit(),
        }
    }

    /// Intent regions are alias keys; they are canonicalized (with fan-out)
    /// here so the predicate only ever sees stored values.
    pub fn from_intent(intent: &QueryIntent, limit: usize) -> Self {
        Self {
            regions: regions::expand(&intent.regions),
            years: intent.years.clone(),
            categories: Vec::new(),
            sort: None,
            limit: limit.max(1),
        }
    }
}

/// Compile a filter against a collection's quirks. When metadata is supplied,
/// a categorical filter applies only if the metadata declares it.
pub fn compile(
    collection: &str,
    spec: &FilterSpec,
    metadata: Option<&CollectionMetadata>,
) -> CompiledQuery {
    let profile = CollectionProfile::for_collection(collection);
    let mut clauses = Vec::new();

    let regions = dedup(&spec.regions);
    if !regions.is_empty() {
        clauses.push(Predicate::In {
            field: REGION_FIELD.to_string(),
            values: regions.into_iter().map(Value::String).collect(),
        });
    }

    if let Some(years) = year_predicate(&profile, &spec.years) {
        clauses.push(years);
    }

    if !spec.categories.is_empty() {
        let declared = profile
            .primary_special_filter()
            .filter(|f| metadata.map_or(true, |m| m.declares(f.name)));
        match declared {
            Some(filter) => clauses.push(Predicate::In {
                field: filter.field.to_string(),
                values: dedup(&spec.categories).into_iter().map(Value::String).collect(),
            }),
            None => debug!(
                "Ignoring categorical filter for {}: not a supported dimension",
                collection
            ),
        }
    }

    let query = CompiledQuery {
        predicate: Predicate::and(clauses),
        sort: spec.sort.clone(),
        limit: spec.limit.max(1),
    };
    debug!("Compiled query for {}: {:?}", collection, query);
    query
}

pub fn compile_request(req: &FilterRequest, metadata: Option<&CollectionMetadata>) -> CompiledQuery {
    compile(&req.collection, &FilterSpec::from_request(req), metadata)
}

/// Compile an intent. Without a detected collection the generic
/// direct-year rules apply.
pub fn compile_intent(intent: &QueryIntent, limit: usize) -> CompiledQuery {
    let collection = intent.collection.as_deref().unwrap_or_default();
    compile(collection, &FilterSpec::from_intent(intent, limit), None)
}

/// Year clause for a collection, or `None` when no years were requested.
pub fn year_predicate(profile: &CollectionProfile, years: &[i32]) -> Option<Predicate> {
    let years: BTreeSet<i32> = years.iter().copied().collect();
    if years.is_empty() {
        return None;
    }
    Some(match profile.years {
        YearEncoding::Field(field) => Predicate::In {
            field: field.to_string(),
            values: years.into_iter().map(Value::from).collect(),
        },
        YearEncoding::DatePrefix(field) => Predicate::or(
            years
                .into_iter()
                .map(|year| Predicate::StartsWith {
                    field: field.to_string(),
                    prefix: format!("{}-", year),
                })
                .collect(),
        ),
    })
}

fn dedup(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values {
        if !out.contains(v) {
            out.push(v.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::extract;
    use serde_json::json;
    use tracity_core::{Record, SortDirection};

    fn record(v: Value) -> Record {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn test_empty_request_matches_all() {
        let query = compile_request(&FilterRequest::new("crimes"), None);
        assert!(query.predicate.is_all());
        assert_eq!(query.limit, 100);
        assert!(query.sort.is_none());
    }

    #[test]
    fn test_region_only() {
        let mut req = FilterRequest::new("literacy");
        req.regions = Some(vec!["Kerala".into()]);
        let query = compile_request(&req, None);

        assert!(query.predicate.matches(&record(json!({"state": "Kerala", "year": 2011}))));
        assert!(!query.predicate.matches(&record(json!({"state": "Goa", "year": 2011}))));
        assert!(!query.predicate.matches(&record(json!({"year": 2011}))));
    }

    #[test]
    fn test_date_encoded_years() {
        let mut req = FilterRequest::new("covid_stats");
        req.years = Some(vec![2020, 2021]);
        let query = compile_request(&req, None);

        assert!(query.predicate.matches(&record(json!({"date": "2020-03-01"}))));
        assert!(query.predicate.matches(&record(json!({"date": "2021-07-04"}))));
        assert!(!query.predicate.matches(&record(json!({"date": "2019-12-31"}))));
        assert!(!query.predicate.matches(&record(json!({"year": 2020}))));
    }

    #[test]
    fn test_direct_years_fold_duplicates() {
        let mut req = FilterRequest::new("aqi");
        req.years = Some(vec![2021, 2020, 2021]);
        let query = compile_request(&req, None);
        assert_eq!(
            query.predicate,
            Predicate::In {
                field: "year".into(),
                values: vec![json!(2020), json!(2021)],
            }
        );
    }

    #[test]
    fn test_dimensions_are_conjoined() {
        let mut req = FilterRequest::new("covid_stats");
        req.regions = Some(vec!["Goa".into()]);
        req.years = Some(vec![2020]);
        let query = compile_request(&req, None);

        assert!(query.predicate.matches(&record(json!({"state": "Goa", "date": "2020-01-01"}))));
        assert!(!query.predicate.matches(&record(json!({"state": "Goa", "date": "2021-01-01"}))));
        assert!(!query.predicate.matches(&record(json!({"state": "Bihar", "date": "2020-01-01"}))));
    }

    #[test]
    fn test_category_only_where_supported() {
        let mut req = FilterRequest::new("crimes");
        req.categorical_filter = Some(vec!["Theft".into()]);
        let query = compile_request(&req, None);
        assert!(query.predicate.matches(&record(json!({"crime_type": "Theft"}))));
        assert!(!query.predicate.matches(&record(json!({"crime_type": "Fraud"}))));

        req.collection = "literacy".into();
        assert!(compile_request(&req, None).predicate.is_all());
    }

    #[test]
    fn test_category_requires_declared_metadata() {
        let mut req = FilterRequest::new("crimes");
        req.categorical_filter = Some(vec!["Theft".into()]);
        let bare = CollectionMetadata::empty("crimes");
        assert!(compile_request(&req, Some(&bare)).predicate.is_all());

        let mut declared = CollectionMetadata::empty("crimes");
        declared
            .special_filters
            .insert("crime_types".into(), vec!["Theft".into()]);
        assert!(!compile_request(&req, Some(&declared)).predicate.is_all());
    }

    #[test]
    fn test_sort_and_limit() {
        let mut req = FilterRequest::new("crimes");
        req.sort_field = Some("cases_reported".into());
        req.sort_direction = SortDirection::Desc;
        req.limit = 5000;
        let query = compile_request(&req, None);
        assert_eq!(
            query.sort,
            Some(SortSpec {
                field: "cases_reported".into(),
                direction: SortDirection::Desc,
            })
        );
        assert_eq!(query.limit, 5000);
    }

    #[test]
    fn test_intent_regions_are_canonicalized() {
        let intent = extract("crime in bombay during 2020");
        let query = compile_intent(&intent, 50);
        assert_eq!(query.limit, 50);
        assert!(query.predicate.matches(&record(json!({"state": "Maharashtra", "year": 2020}))));
        assert!(query.predicate.matches(&record(json!({"state": "Mumbai", "year": 2020}))));
        assert!(!query.predicate.matches(&record(json!({"state": "bombay", "year": 2020}))));
        assert!(!query.predicate.matches(&record(json!({"state": "Mumbai", "year": 2019}))));
    }

    #[test]
    fn test_intent_without_collection_still_compiles() {
        let intent = extract("what was recorded in 2022");
        let query = compile_intent(&intent, 10);
        assert!(query.predicate.matches(&record(json!({"year": 2022}))));
    }
}
