//! In-memory document store.
//!
//! Evaluates predicates record by record. Useful for tests and for running
//! the API without a database file.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use crate::DocumentStore;
use tracity_core::query::{compare_values, values_equal};
use tracity_core::record::IDENTITY_KEY;
use tracity_core::{CompiledQuery, Predicate, Record, Result, SortDirection};

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<BTreeMap<String, Vec<Record>>>,
    next_id: RwLock<i64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn distinct_values(&self, collection: &str, field: &str) -> Result<Vec<Value>> {
        let collections = self.collections.read();
        let mut values: Vec<Value> = Vec::new();
        for record in collections.get(collection).into_iter().flatten() {
            match record.get(field) {
                None | Some(Value::Null) => {}
                Some(v) => {
                    if !values.iter().any(|seen| values_equal(seen, v)) {
                        values.push(v.clone());
                    }
                }
            }
        }
        Ok(values)
    }

    async fn find_one(&self, collection: &str) -> Result<Option<Record>> {
        Ok(self
            .collections
            .read()
            .get(collection)
            .and_then(|records| records.first().cloned()))
    }

    async fn find(&self, collection: &str, query: &CompiledQuery) -> Result<Vec<Record>> {
        let collections = self.collections.read();
        let mut matched: Vec<Record> = collections
            .get(collection)
            .into_iter()
            .flatten()
            .filter(|r| query.predicate.matches(r))
            .cloned()
            .collect();

        if let Some(sort) = &query.sort {
            // Stable sort keeps insertion order among equal keys.
            matched.sort_by(|a, b| {
                let ord = compare_values(a.get(&sort.field), b.get(&sort.field));
                match sort.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }

        matched.truncate(query.limit);
        Ok(matched)
    }

    async fn count(&self, collection: &str, predicate: &Predicate) -> Result<u64> {
        Ok(self
            .collections
            .read()
            .get(collection)
            .map(|records| records.iter().filter(|r| predicate.matches(r)).count() as u64)
            .unwrap_or(0))
    }

    async fn list_collections(&self) -> Result<Vec<String>> {
        Ok(self
            .collections
            .read()
            .iter()
            .filter(|(_, records)| !records.is_empty())
            .map(|(name, _)| name.clone())
            .collect())
    }

    async fn insert_many(&self, collection: &str, records: Vec<Record>) -> Result<usize> {
        let mut next_id = self.next_id.write();
        let mut collections = self.collections.write();
        let target = collections.entry(collection.to_string()).or_default();
        let inserted = records.len();
        for mut record in records {
            *next_id += 1;
            record.insert(IDENTITY_KEY.to_string(), Value::from(*next_id));
            target.push(record);
        }
        Ok(inserted)
    }
}
