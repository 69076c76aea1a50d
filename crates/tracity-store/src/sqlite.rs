//! SQLite-backed document store.
//!
//! All collections share the `records` table; bodies are JSON text and
//! predicates are evaluated by SQLite's JSON1 functions.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::schema::SCHEMA_SQL;
use crate::sql::{json_path, order_by, predicate_to_sql, sql_to_json};
use crate::DocumentStore;
use tracity_core::record::IDENTITY_KEY;
use tracity_core::{CompiledQuery, Error, Predicate, Record, Result};

pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open or create the store at `db_path`.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::Storage(e.to_string()))?;
        }

        let conn = Connection::open(&db_path).map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        Self::init_schema(&conn)?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path,
        };

        let total = store.total_records()?;
        info!(
            "SqliteStore initialized: {} records, path={}",
            total,
            store.db_path.display()
        );
        Ok(store)
    }

    /// In-memory database, for tests and throwaway runs.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| Error::Database(e.to_string()))?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: PathBuf::from(":memory:"),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))
    }

    fn total_records(&self) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// Decode a stored body, attaching the row id as the identity key.
    fn row_to_record(id: i64, body: &str) -> Option<Record> {
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(mut map)) => {
                map.insert(IDENTITY_KEY.to_string(), Value::from(id));
                Some(map)
            }
            Ok(_) | Err(_) => {
                warn!("Skipping record {} with non-object body", id);
                None
            }
        }
    }

    fn distinct_values_sync(&self, collection: &str, field: &str) -> Result<Vec<Value>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT DISTINCT json_extract(body, ?1) FROM records
                 WHERE collection = ?2 AND json_extract(body, ?1) IS NOT NULL",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![json_path(field), collection], |row| row.get::<_, SqlValue>(0))
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut values = Vec::new();
        for row in rows {
            let value = row.map_err(|e| Error::Database(e.to_string()))?;
            if let Some(v) = sql_to_json(value) {
                values.push(v);
            }
        }
        Ok(values)
    }

    fn find_one_sync(&self, collection: &str) -> Result<Option<Record>> {
        let conn = self.conn.lock();
        let row: Option<(i64, String)> = conn
            .prepare_cached(
                "SELECT id, body FROM records WHERE collection = ?1 ORDER BY id ASC LIMIT 1",
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![collection], |row| Ok((row.get(0)?, row.get(1)?)))
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(row.and_then(|(id, body)| Self::row_to_record(id, &body)))
    }

    fn find_sync(&self, collection: &str, query: &CompiledQuery) -> Result<Vec<Record>> {
        let filter = predicate_to_sql(&query.predicate);
        let mut params = vec![SqlValue::Text(collection.to_string())];
        params.extend(filter.params);
        let order = order_by(query.sort.as_ref(), &mut params);
        params.push(SqlValue::Integer(i64::try_from(query.limit).unwrap_or(i64::MAX)));

        let sql = format!(
            "SELECT id, body FROM records WHERE collection = ? AND {} {} LIMIT ?",
            filter.sql, order
        );
        debug!("find {}: {}", collection, sql);

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql).map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params_from_iter(params), |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut records = Vec::new();
        for row in rows {
            let (id, body) = row.map_err(|e| Error::Database(e.to_string()))?;
            if let Some(record) = Self::row_to_record(id, &body) {
                records.push(record);
            }
        }
        Ok(records)
    }

    fn count_sync(&self, collection: &str, predicate: &Predicate) -> Result<u64> {
        let filter = predicate_to_sql(predicate);
        let mut params = vec![SqlValue::Text(collection.to_string())];
        params.extend(filter.params);
        let sql = format!(
            "SELECT COUNT(*) FROM records WHERE collection = ? AND {}",
            filter.sql
        );

        let conn = self.conn.lock();
        let count: i64 = conn
            .query_row(&sql, params_from_iter(params), |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count.max(0) as u64)
    }

    fn list_collections_sync(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached("SELECT DISTINCT collection FROM records ORDER BY collection")
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| Error::Database(e.to_string()))?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::Database(e.to_string()))
    }

    fn insert_many_sync(&self, collection: &str, records: Vec<Record>) -> Result<usize> {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);

        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(|e| Error::Database(e.to_string()))?;
        let mut inserted = 0;
        {
            let mut stmt = tx
                .prepare_cached(
                    "INSERT INTO records (collection, body, created_at) VALUES (?1, ?2, ?3)",
                )
                .map_err(|e| Error::Database(e.to_string()))?;
            for mut record in records {
                record.remove(IDENTITY_KEY);
                let body = serde_json::to_string(&record)?;
                stmt.execute(params![collection, body, now])
                    .map_err(|e| Error::Database(e.to_string()))?;
                inserted += 1;
            }
        }
        tx.commit().map_err(|e| Error::Database(e.to_string()))?;
        Ok(inserted)
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn distinct_values(&self, collection: &str, field: &str) -> Result<Vec<Value>> {
        self.distinct_values_sync(collection, field)
    }

    async fn find_one(&self, collection: &str) -> Result<Option<Record>> {
        self.find_one_sync(collection)
    }

    async fn find(&self, collection: &str, query: &CompiledQuery) -> Result<Vec<Record>> {
        self.find_sync(collection, query)
    }

    async fn count(&self, collection: &str, predicate: &Predicate) -> Result<u64> {
        self.count_sync(collection, predicate)
    }

    async fn list_collections(&self) -> Result<Vec<String>> {
        self.list_collections_sync()
    }

    async fn insert_many(&self, collection: &str, records: Vec<Record>) -> Result<usize> {
        self.insert_many_sync(collection, records)
    }
}
