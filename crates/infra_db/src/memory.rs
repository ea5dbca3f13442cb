//! In-process key-value store
//!
//! Holds every table in memory behind a tokio `RwLock`. Index queries scan
//! the table for items carrying the index's key attributes, so indexes are
//! sparse exactly like a hosted key-value service.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::error::DatabaseError;
use crate::store::{Item, KeyQuery, KeyValueStore, PrimaryKey, ScanOrder};

type Table = BTreeMap<PrimaryKey, Item>;

/// Failure injected into store operations while set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    Connection,
    Timeout,
    PermissionDenied,
}

impl FailureMode {
    fn to_error(self, operation: &str) -> DatabaseError {
        match self {
            FailureMode::Connection => DatabaseError::ConnectionFailed("Connection refused".to_string()),
            FailureMode::Timeout => DatabaseError::Timeout {
                operation: operation.to_string(),
                duration_ms: 5000,
            },
            FailureMode::PermissionDenied => {
                DatabaseError::PermissionDenied("not authorized to access table".to_string())
            }
        }
    }
}

/// In-memory implementation of [`KeyValueStore`]
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    tables: RwLock<HashMap<String, Table>>,
    failure: RwLock<Option<FailureMode>>,
    partition_failures: RwLock<HashMap<String, FailureMode>>,
    gets: AtomicUsize,
    puts: AtomicUsize,
    queries: AtomicUsize,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later operation fail with the given mode, or clears it
    pub async fn set_failure(&self, mode: Option<FailureMode>) {
        *self.failure.write().await = mode;
    }

    /// Makes later operations on one partition key fail, on the table or any index
    pub async fn fail_partition(&self, partition_key: impl Into<String>, mode: FailureMode) {
        self.partition_failures
            .write()
            .await
            .insert(partition_key.into(), mode);
    }

    /// Number of `get` calls made
    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    /// Number of `put` calls made
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Number of `query` calls made
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Number of items stored in a table
    pub async fn item_count(&self, table: &str) -> usize {
        self.tables.read().await.get(table).map_or(0, BTreeMap::len)
    }

    async fn check_failure(&self, operation: &str, partition_key: &str) -> Result<(), DatabaseError> {
        let mode = match *self.failure.read().await {
            Some(mode) => Some(mode),
            None => self.partition_failures.read().await.get(partition_key).copied(),
        };
        match mode {
            Some(mode) => Err(mode.to_error(operation)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    #[instrument(skip(self, key), fields(pk = %key.partition_key))]
    async fn get(&self, table: &str, key: &PrimaryKey) -> Result<Option<Item>, DatabaseError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.check_failure("get", &key.partition_key).await?;

        let tables = self.tables.read().await;
        Ok(tables.get(table).and_then(|t| t.get(key)).cloned())
    }

    #[instrument(skip(self, item))]
    async fn put(&self, table: &str, item: Item) -> Result<(), DatabaseError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        let key = PrimaryKey::of_item(&item)?;
        self.check_failure("put", &key.partition_key).await?;

        self.tables
            .write()
            .await
            .entry(table.to_string())
            .or_default()
            .insert(key, item);
        Ok(())
    }

    #[instrument(skip(self, query), fields(index = ?query.index, pk = %query.partition_key))]
    async fn query(&self, table: &str, query: KeyQuery) -> Result<Vec<Item>, DatabaseError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.check_failure("query", &query.partition_key).await?;

        let (pk_attr, sk_attr) = query.key_attributes();
        let tables = self.tables.read().await;
        let Some(items) = tables.get(table) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<(&str, &Item)> = items
            .values()
            .filter_map(|item| {
                let pk = item.get(&pk_attr)?.as_s()?;
                let sk = item.get(&sk_attr)?.as_s()?;
                if pk != query.partition_key {
                    return None;
                }
                match &query.sort_key {
                    Some(condition) if !condition.matches(sk) => None,
                    _ => Some((sk, item)),
                }
            })
            .collect();

        matched.sort_by(|a, b| a.0.cmp(b.0));
        if query.order == ScanOrder::Backward {
            matched.reverse();
        }

        debug!(count = matched.len(), "Query matched items");
        Ok(matched.into_iter().map(|(_, item)| item.clone()).collect())
    }
}
