//! Tracity Store: document collections behind a pluggable backend.

pub mod memory;
pub mod schema;
pub mod sql;
pub mod sqlite;

use async_trait::async_trait;
use serde_json::Value;

use tracity_core::{CompiledQuery, Predicate, Record, Result};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Storage collaborator consumed by the catalog and the API layer.
///
/// Records are schemaless JSON objects grouped into named collections.
/// Implementations must be `Send + Sync` so one handle can serve
/// concurrent requests.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Distinct non-null values of `field` within a collection.
    async fn distinct_values(&self, collection: &str, field: &str) -> Result<Vec<Value>>;

    /// First record in insertion order, for schema discovery.
    async fn find_one(&self, collection: &str) -> Result<Option<Record>>;

    /// Records matching the query, honouring its sort and limit.
    async fn find(&self, collection: &str, query: &CompiledQuery) -> Result<Vec<Record>>;

    /// Number of records matching a predicate (no limit applied).
    async fn count(&self, collection: &str, predicate: &Predicate) -> Result<u64>;

    /// Names of all collections holding at least one record.
    async fn list_collections(&self) -> Result<Vec<String>>;

    /// Append records to a collection. Returns how many were stored.
    async fn insert_many(&self, collection: &str, records: Vec<Record>) -> Result<usize>;
}
