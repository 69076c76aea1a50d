#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use tracity_api::TracityApi;
use tracity_core::{CompiledQuery, Error, Predicate, Record, Result};
use tracity_insight::TextGenerator;
use tracity_store::{DocumentStore, MemoryStore};

pub fn records(values: Vec<Value>) -> Vec<Record> {
    values
        .into_iter()
        .map(|v| v.as_object().unwrap().clone())
        .collect()
}

pub async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store
        .insert_many(
            "crimes",
            records(vec![
                json!({"state": "Delhi", "year": 2020, "crime_type": "Theft", "cases_reported": 100}),
                json!({"state": "Delhi", "year": 2020, "crime_type": "Assault", "cases_reported": 50}),
                json!({"state": "Delhi", "year": 2021, "crime_type": "Theft", "cases_reported": 120}),
                json!({"state": "Kerala", "year": 2020, "crime_type": "Theft", "cases_reported": 30}),
                json!({"state": "Kerala", "year": 2021, "crime_type": "Fraud", "cases_reported": 10}),
            ]),
        )
        .await
        .unwrap();
    store
        .insert_many(
            "literacy",
            records(vec![
                json!({"state": "Kerala", "year": 2021, "literacy_rate": 94.0}),
                json!({"state": "Bihar", "year": 2021, "literacy_rate": 61.8}),
            ]),
        )
        .await
        .unwrap();
    store
        .insert_many(
            "covid_stats",
            records(vec![
                json!({"state": "Delhi", "date": "2019-12-31", "deaths": 0}),
                json!({"state": "Delhi", "date": "2020-03-01", "deaths": 5}),
                json!({"state": "Kerala", "date": "2021-07-04", "deaths": 9}),
            ]),
        )
        .await
        .unwrap();
    store
}

/// Replies with a fixed text and records each call.
pub struct Scripted {
    reply: String,
    pub calls: Mutex<Vec<String>>,
}

impl Scripted {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl TextGenerator for Scripted {
    async fn complete(&self, _system: &str, user: &str, _max_tokens: usize) -> Result<String> {
        self.calls.lock().push(user.to_string());
        Ok(self.reply.clone())
    }
}

pub struct Failing;

#[async_trait]
impl TextGenerator for Failing {
    async fn complete(&self, _: &str, _: &str, _: usize) -> Result<String> {
        Err(Error::Upstream("service unavailable".into()))
    }
}

/// Store whose every call fails.
pub struct OfflineStore;

#[async_trait]
impl DocumentStore for OfflineStore {
    async fn distinct_values(&self, _: &str, _: &str) -> Result<Vec<Value>> {
        Err(Error::Storage("offline".into()))
    }
    async fn find_one(&self, _: &str) -> Result<Option<Record>> {
        Err(Error::Storage("offline".into()))
    }
    async fn find(&self, _: &str, _: &CompiledQuery) -> Result<Vec<Record>> {
        Err(Error::Storage("offline".into()))
    }
    async fn count(&self, _: &str, _: &Predicate) -> Result<u64> {
        Err(Error::Storage("offline".into()))
    }
    async fn list_collections(&self) -> Result<Vec<String>> {
        Err(Error::Storage("offline".into()))
    }
    async fn insert_many(&self, _: &str, _: Vec<Record>) -> Result<usize> {
        Err(Error::Storage("offline".into()))
    }
}

pub async fn api_with(generator: Arc<dyn TextGenerator>) -> TracityApi {
    TracityApi::new(seeded_store().await, generator)
}
