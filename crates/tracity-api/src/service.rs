//! Data, insight and catalog operations.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::envelopes::*;
use tracity_core::record::clean_record;
use tracity_core::{ChartKind, CompiledQuery, Error, Predicate, Record, Result};
use tracity_insight::{recommend, InsightSummarizer, TextGenerator};
use tracity_query::catalog::years_from_values;
use tracity_query::collections::{dataset_description, display_name, is_system_collection};
use tracity_query::compiler::year_predicate;
use tracity_query::request::{parse_regions_csv, parse_years_csv};
use tracity_query::{
    compile, compile_request, CollectionMetadata, CollectionProfile, FilterRequest, FilterSpec,
    MetadataCatalog, YearEncoding,
};
use tracity_store::DocumentStore;

/// Records sent to the summarizer per insight request.
pub const INSIGHT_SAMPLE_LIMIT: usize = 50;
pub const VISUALIZE_DEFAULT_LIMIT: usize = 50;
/// Years used when an unfiltered visualization targets a date-encoded
/// collection.
const RECENT_DATE_YEARS: [i32; 4] = [2020, 2021, 2022, 2023];

pub struct TracityApi {
    pub(crate) store: Arc<dyn DocumentStore>,
    pub(crate) catalog: MetadataCatalog,
    pub(crate) summarizer: InsightSummarizer,
}

impl TracityApi {
    pub fn new(store: Arc<dyn DocumentStore>, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            catalog: MetadataCatalog::new(store.clone()),
            summarizer: InsightSummarizer::new(generator),
            store,
        }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Platform counters. Store faults yield the fixed defaults.
    pub async fn stats(&self) -> PlatformStats {
        match self.try_stats().await {
            Ok(stats) => stats,
            Err(e) => {
                error!("Error getting stats: {}", e);
                PlatformStats::default()
            }
        }
    }

    async fn try_stats(&self) -> Result<PlatformStats> {
        let collections = self.store.list_collections().await?;
        let mut total_records = 0;
        for name in &collections {
            total_records += self.store.count(name, &Predicate::All).await?;
        }
        Ok(PlatformStats::derive(collections.len() as u64, total_records))
    }

    /// Every user-visible collection. Store faults yield an empty list.
    pub async fn datasets(&self) -> Vec<DatasetInfo> {
        match self.try_datasets().await {
            Ok(datasets) => datasets,
            Err(e) => {
                error!("Error getting datasets: {}", e);
                Vec::new()
            }
        }
    }

    async fn try_datasets(&self) -> Result<Vec<DatasetInfo>> {
        let mut datasets = Vec::new();
        for name in self.store.list_collections().await? {
            if is_system_collection(&name) {
                continue;
            }
            let record_count = self.store.count(&name, &Predicate::All).await?;
            datasets.push(DatasetInfo {
                name: display_name(&name),
                description: dataset_description(&name).to_string(),
                collection: name,
                record_count,
                last_updated: Utc::now(),
            });
        }
        Ok(datasets)
    }

    pub async fn describe_metadata(&self, collection: &str) -> CollectionMetadata {
        self.catalog.describe(collection).await
    }

    /// Filtered records with chart recommendations.
    pub async fn filter_data(&self, req: &FilterRequest) -> Result<FilteredData> {
        self.ensure_exists(&req.collection).await?;

        let metadata = self.catalog.describe(&req.collection).await;
        let query = compile_request(req, Some(&metadata));
        let data = self.fetch(&req.collection, &query).await?;
        let total_count = self.store.count(&req.collection, &query.predicate).await?;

        Ok(FilteredData {
            collection: req.collection.clone(),
            total_count,
            returned_count: data.len(),
            chart_recommendations: recommend(&data),
            applied_filters: AppliedFilters::with_sort(req),
            data,
        })
    }

    /// Summarizer analysis of a filtered sample.
    pub async fn enhanced_insights(&self, req: &FilterRequest) -> Result<EnhancedInsights> {
        self.ensure_exists(&req.collection).await?;

        let metadata = self.catalog.describe(&req.collection).await;
        let mut query = compile_request(req, Some(&metadata));
        query.limit = INSIGHT_SAMPLE_LIMIT;

        let sample = self.fetch(&req.collection, &query).await?;
        if sample.is_empty() {
            return Err(Error::NoData("No data found for the specified filters".into()));
        }

        let insights = self
            .summarizer
            .summarize(
                &sample,
                &req.collection,
                &format!("Analyze patterns in {} data", req.collection),
                req.chart_type_hint,
            )
            .await;
        let total_records = self.store.count(&req.collection, &query.predicate).await?;

        Ok(EnhancedInsights {
            collection: req.collection.clone(),
            total_records,
            analyzed_sample: sample.len(),
            insights,
            applied_filters: AppliedFilters::of(req),
            generated_at: timestamp(),
        })
    }

    /// Visualization bundle. Without filters the most recent data is shown;
    /// filters that match nothing fall back to an unfiltered fetch.
    pub async fn visualize(
        &self,
        collection: &str,
        limit: Option<i64>,
        regions_csv: Option<&str>,
        years_csv: Option<&str>,
    ) -> Result<Visualization> {
        self.ensure_exists(collection).await?;

        let limit = limit
            .filter(|l| *l > 0)
            .and_then(|l| usize::try_from(l).ok())
            .unwrap_or(VISUALIZE_DEFAULT_LIMIT);
        let spec = FilterSpec {
            regions: parse_regions_csv(regions_csv),
            years: parse_years_csv(years_csv),
            limit,
            ..Default::default()
        };
        let mut query = compile(collection, &spec, None);
        if query.predicate.is_all() {
            query.predicate = self.recent_predicate(collection).await?;
        }

        let mut data = self.fetch(collection, &query).await?;
        if data.is_empty() && (supplied(regions_csv) || supplied(years_csv)) {
            debug!("Filters matched nothing in {}; refetching unfiltered", collection);
            query = CompiledQuery::match_all(limit);
            data = self.fetch(collection, &query).await?;
        }

        let ai_insights = self
            .summarizer
            .summarize(
                &data,
                collection,
                &format!("Analyze the {} dataset patterns and trends", collection),
                ChartKind::Bar,
            )
            .await;
        let metadata = self.catalog.describe(collection).await;

        Ok(Visualization {
            collection: collection.to_string(),
            total_records: data.len(),
            chart_recommendations: recommend(&data),
            ai_insights,
            metadata,
            query_used: query.predicate,
            data,
        })
    }

    /// Summarizer analysis of a collection, narrowed by CSV filters.
    pub async fn dataset_insights(
        &self,
        collection: &str,
        regions_csv: Option<&str>,
        years_csv: Option<&str>,
    ) -> Result<DatasetInsights> {
        self.ensure_exists(collection).await?;

        let regions = parse_regions_csv(regions_csv);
        let years = parse_years_csv(years_csv);
        let spec = FilterSpec {
            regions: regions.clone(),
            years: years.clone(),
            limit: INSIGHT_SAMPLE_LIMIT,
            ..Default::default()
        };
        let query = compile(collection, &spec, None);

        let sample = self.fetch(collection, &query).await?;
        if sample.is_empty() {
            return Err(Error::NoData("No data found for the specified criteria".into()));
        }

        let insights = self
            .summarizer
            .summarize(
                &sample,
                collection,
                &format!(
                    "Provide comprehensive analysis of the {} dataset including trends, patterns, and key findings",
                    collection
                ),
                ChartKind::Bar,
            )
            .await;
        let total_records = self.store.count(collection, &query.predicate).await?;
        let metadata = self.catalog.describe(collection).await;

        Ok(DatasetInsights {
            collection: collection.to_string(),
            total_records,
            insights,
            sample_size: sample.len(),
            metadata,
            applied_filters: CsvFilters {
                states: supplied(regions_csv).then_some(regions),
                years: supplied(years_csv).then_some(years),
            },
            generated_at: timestamp(),
        })
    }

    /// Cleaned records for a query.
    pub(crate) async fn fetch(&self, collection: &str, query: &CompiledQuery) -> Result<Vec<Record>> {
        let records = self.store.find(collection, query).await?;
        Ok(records.into_iter().map(clean_record).collect())
    }

    async fn ensure_exists(&self, collection: &str) -> Result<()> {
        let collections = self.store.list_collections().await?;
        if collections.iter().any(|c| c == collection) {
            Ok(())
        } else {
            info!("Collection not found: {}", collection);
            Err(Error::NotFound(format!("Collection '{}' not found", collection)))
        }
    }

    /// Latest available year for direct-year collections, 2020-2023 for
    /// date-encoded ones.
    async fn recent_predicate(&self, collection: &str) -> Result<Predicate> {
        let profile = CollectionProfile::for_collection(collection);
        Ok(match profile.years {
            YearEncoding::Field(field) => {
                let years = years_from_values(&self.store.distinct_values(collection, field).await?);
                match years.iter().max() {
                    Some(latest) => Predicate::Eq {
                        field: field.to_string(),
                        value: Value::from(*latest),
                    },
                    None => Predicate::All,
                }
            }
            YearEncoding::DatePrefix(_) => {
                year_predicate(&profile, &RECENT_DATE_YEARS).unwrap_or(Predicate::All)
            }
        })
    }
}

fn supplied(csv: Option<&str>) -> bool {
    csv.is_some_and(|s| !s.trim().is_empty())
}
