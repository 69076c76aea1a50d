//! Conversational queries.
//!
//! A question that names a dataset and narrows it by region or year is
//! answered from the matching records directly. Anything else samples the
//! main datasets and asks the generator for a short reading of each.

use tracing::{error, warn};

use crate::envelopes::{ChatResponse, ChatResult, QueryInfo};
use crate::service::TracityApi;
use tracity_core::{CompiledQuery, Result};
use tracity_insight::narrative::{self, NarrativeContext};
use tracity_insight::recommend;
use tracity_query::collections::{is_system_collection, PRIORITY_COLLECTIONS};
use tracity_query::{compile_intent, extract, QueryIntent};

const TARGETED_LIMIT: usize = 50;
const GENERAL_SAMPLE_LIMIT: usize = 10;
const GENERAL_MAX_COLLECTIONS: usize = 3;
/// Records returned per chat answer for visualization.
const PREVIEW_RECORDS: usize = 5;

const WELCOME: &str = "I'm your TRACITY AI assistant! I can help you analyze data about Indian states including:\n\n\
🔍 **Crime Statistics** - Ask about crime rates in specific states\n\
📚 **Literacy Rates** - Education data across India\n\
🌬️ **Air Quality (AQI)** - Pollution levels by state\n\
⚡ **Power Consumption** - Energy usage patterns\n\n\
Try asking questions like:\n\
• 'What is the crime rate in Delhi in 2020?'\n\
• 'Show me literacy rates in Kerala'\n\
• 'Compare AQI between Mumbai and Bangalore'\n\
• 'Power consumption in Maharashtra'";

const APOLOGY: &str = "I apologize, but I'm having trouble processing your request right now. \
Please try rephrasing your question or ask about our available datasets (crimes, literacy, AQI, power consumption).";

impl TracityApi {
    /// Answer a free-text question. Never fails.
    pub async fn chat(&self, text: &str, dataset_hint: Option<&str>) -> ChatResponse {
        match self.try_chat(text, dataset_hint).await {
            Ok(response) => response,
            Err(e) => {
                error!("Chat error: {}", e);
                ChatResponse {
                    query: text.to_string(),
                    results: vec![ChatResult::message("error", APOLOGY)],
                    total_collections_searched: 0,
                }
            }
        }
    }

    async fn try_chat(&self, text: &str, dataset_hint: Option<&str>) -> Result<ChatResponse> {
        let intent = extract(text);

        if intent.is_targeted() {
            match self.targeted_answer(&intent).await {
                Ok(result) => {
                    return Ok(ChatResponse {
                        query: text.to_string(),
                        results: vec![result],
                        total_collections_searched: 1,
                    })
                }
                Err(e) => warn!("Targeted query failed, falling back to general search: {}", e),
            }
        }

        let available: Vec<String> = self
            .store
            .list_collections()
            .await?
            .into_iter()
            .filter(|c| !is_system_collection(c))
            .collect();

        let targets: Vec<String> = match dataset_hint.filter(|h| available.iter().any(|c| c.as_str() == *h)) {
            Some(hint) => vec![hint.to_string()],
            None => PRIORITY_COLLECTIONS
                .iter()
                .filter(|c| available.iter().any(|a| a.as_str() == **c))
                .take(GENERAL_MAX_COLLECTIONS)
                .map(|c| c.to_string())
                .collect(),
        };

        let mut results = Vec::new();
        for collection in &targets {
            match self.general_answer(collection, text).await {
                Ok(Some(result)) => results.push(result),
                Ok(None) => {}
                Err(e) => error!("Collection {} error: {}", collection, e),
            }
        }

        if results.is_empty() {
            results.push(ChatResult::message("general", WELCOME));
        }

        Ok(ChatResponse {
            query: text.to_string(),
            results,
            total_collections_searched: targets.len(),
        })
    }

    async fn targeted_answer(&self, intent: &QueryIntent) -> Result<ChatResult> {
        let collection = intent.collection.as_deref().unwrap_or_default();
        let query = compile_intent(intent, TARGETED_LIMIT);
        let data = self.fetch(collection, &query).await?;

        let topic = intent.topic.as_deref().unwrap_or(collection);
        let ctx = NarrativeContext {
            collection,
            topic,
            regions: &intent.regions,
            years: &intent.years,
        };

        if data.is_empty() {
            return Ok(ChatResult {
                trend: None,
                anomalies: None,
                key_metrics: None,
                ..ChatResult::message(collection, narrative::no_data_message(&ctx))
            });
        }

        let insight = narrative::describe(&data, &ctx);
        let chart = recommend(&data).recommended;
        let record_count = data.len();

        Ok(ChatResult {
            collection: collection.to_string(),
            insight,
            chart_type: chart,
            data: data.into_iter().take(PREVIEW_RECORDS).collect(),
            anomalies: None,
            trend: None,
            key_metrics: None,
            record_count,
            query_info: Some(QueryInfo {
                states: intent.regions.clone(),
                years: intent.years.clone(),
                data_type: intent.topic.clone(),
            }),
        })
    }

    async fn general_answer(&self, collection: &str, text: &str) -> Result<Option<ChatResult>> {
        let sample = self
            .fetch(collection, &CompiledQuery::match_all(GENERAL_SAMPLE_LIMIT))
            .await?;
        if sample.is_empty() {
            return Ok(None);
        }

        let quick = self.summarizer.quick_insight(&sample, text).await;
        let chart = quick
            .chart_type
            .unwrap_or_else(|| recommend(&sample).recommended);
        let record_count = sample.len();

        Ok(Some(ChatResult {
            collection: collection.to_string(),
            insight: quick.insight,
            chart_type: chart,
            data: sample.into_iter().take(PREVIEW_RECORDS).collect(),
            anomalies: Some(quick.anomalies),
            trend: Some(quick.trend),
            key_metrics: Some(quick.key_metrics),
            record_count,
            query_info: None,
        }))
    }
}
