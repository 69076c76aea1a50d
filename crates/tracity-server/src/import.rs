//! `tracity import`: load a JSON array of records into a collection.

use std::path::Path;

use anyhow::{bail, Context};
use serde_json::Value;
use tracing::{info, warn};

use tracity_core::Record;
use tracity_store::DocumentStore;

/// Read records from a JSON array file. Non-object entries are skipped.
pub fn load_records(path: &Path) -> anyhow::Result<Vec<Record>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;

    let Value::Array(items) = value else {
        bail!("{} must contain a JSON array of objects", path.display());
    };

    let total = items.len();
    let records: Vec<Record> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(obj) => Some(obj),
            _ => None,
        })
        .collect();
    if records.len() < total {
        warn!("Skipped {} non-object entries", total - records.len());
    }
    Ok(records)
}

pub async fn run(store: &dyn DocumentStore, collection: &str, path: &Path) -> anyhow::Result<usize> {
    let records = load_records(path)?;
    let stored = store
        .insert_many(collection, records)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to import into {}: {}", collection, e))?;
    info!("Imported {} records into {}", stored, collection);
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tracity_core::Predicate;
    use tracity_store::MemoryStore;

    #[test]
    fn test_load_skips_non_objects() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("aqi.json");
        std::fs::write(&path, r#"[{"state": "Delhi", "aqi": 180}, 7, {"state": "Goa", "aqi": 60}]"#)
            .unwrap();

        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["state"], "Goa");
    }

    #[test]
    fn test_load_rejects_non_array() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("aqi.json");
        std::fs::write(&path, r#"{"state": "Delhi"}"#).unwrap();
        assert!(load_records(&path).is_err());
    }

    #[tokio::test]
    async fn test_run_inserts() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("literacy.json");
        std::fs::write(&path, r#"[{"state": "Kerala", "year": 2021, "literacy_rate": 94.0}]"#).unwrap();

        let store = MemoryStore::new();
        assert_eq!(run(&store, "literacy", &path).await.unwrap(), 1);
        assert_eq!(store.count("literacy", &Predicate::All).await.unwrap(), 1);
    }
}
