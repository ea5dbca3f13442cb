//! Key-value store contract
//!
//! The storage layer talks to a partitioned key-value table with secondary
//! indexes:
//!
//! ```text
//! Table: claims (configurable)
//!
//! Primary Key:
//!   - PK (String, Partition Key)
//!   - SK (String, Sort Key)
//!
//! Secondary indexes are addressed by name; index `X` partitions on the
//! `XPK` attribute and sorts on `XSK`.
//! ```
//!
//! Any backend that can do point reads, full-item writes and sorted range
//! queries over a partition implements [`KeyValueStore`].

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::DatabaseError;

/// Partition key attribute of the table
pub const ATTR_PK: &str = "PK";

/// Sort key attribute of the table
pub const ATTR_SK: &str = "SK";

/// A stored attribute value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    S(String),
    N(i64),
}

impl AttributeValue {
    pub fn as_s(&self) -> Option<&str> {
        match self {
            AttributeValue::S(s) => Some(s),
            AttributeValue::N(_) => None,
        }
    }

    pub fn as_n(&self) -> Option<i64> {
        match self {
            AttributeValue::N(n) => Some(*n),
            AttributeValue::S(_) => None,
        }
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::S(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::S(value.to_string())
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::N(value)
    }
}

/// One stored item: attribute name to value
pub type Item = BTreeMap<String, AttributeValue>;

/// Reads a string attribute from an item
pub fn string_attr<'a>(item: &'a Item, name: &str) -> Result<&'a str, DatabaseError> {
    item.get(name)
        .ok_or_else(|| DatabaseError::missing_attribute(name))?
        .as_s()
        .ok_or_else(|| DatabaseError::wrong_attribute_type(name, "S"))
}

/// Reads a numeric attribute from an item
pub fn number_attr(item: &Item, name: &str) -> Result<i64, DatabaseError> {
    item.get(name)
        .ok_or_else(|| DatabaseError::missing_attribute(name))?
        .as_n()
        .ok_or_else(|| DatabaseError::wrong_attribute_type(name, "N"))
}

/// Table primary key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrimaryKey {
    pub partition_key: String,
    pub sort_key: String,
}

impl PrimaryKey {
    pub fn new(partition_key: impl Into<String>, sort_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key: sort_key.into(),
        }
    }

    /// Reads the primary key attributes of an item
    pub fn of_item(item: &Item) -> Result<Self, DatabaseError> {
        Ok(Self::new(string_attr(item, ATTR_PK)?, string_attr(item, ATTR_SK)?))
    }
}

/// Range restriction on the sort key; bounds are inclusive and compared
/// lexicographically
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKeyCondition {
    Between(String, String),
    AtLeast(String),
    AtMost(String),
}

impl SortKeyCondition {
    pub fn matches(&self, sort_key: &str) -> bool {
        match self {
            SortKeyCondition::Between(lo, hi) => sort_key >= lo.as_str() && sort_key <= hi.as_str(),
            SortKeyCondition::AtLeast(lo) => sort_key >= lo.as_str(),
            SortKeyCondition::AtMost(hi) => sort_key <= hi.as_str(),
        }
    }
}

/// Direction in which query results are returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanOrder {
    #[default]
    Forward,
    Backward,
}

/// A single-partition query against the table or one of its indexes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyQuery {
    /// Index to query; `None` queries the table itself
    pub index: Option<String>,
    pub partition_key: String,
    pub sort_key: Option<SortKeyCondition>,
    pub order: ScanOrder,
}

impl KeyQuery {
    /// Query on the table's own partition key
    pub fn table(partition_key: impl Into<String>) -> Self {
        Self {
            index: None,
            partition_key: partition_key.into(),
            sort_key: None,
            order: ScanOrder::Forward,
        }
    }

    /// Query on a named secondary index
    pub fn index(index: impl Into<String>, partition_key: impl Into<String>) -> Self {
        Self {
            index: Some(index.into()),
            ..Self::table(partition_key)
        }
    }

    pub fn sort_key(mut self, condition: SortKeyCondition) -> Self {
        self.sort_key = Some(condition);
        self
    }

    pub fn backward(mut self) -> Self {
        self.order = ScanOrder::Backward;
        self
    }

    /// Attribute names holding this query's partition and sort keys
    pub fn key_attributes(&self) -> (String, String) {
        match &self.index {
            Some(index) => (format!("{}PK", index), format!("{}SK", index)),
            None => (ATTR_PK.to_string(), ATTR_SK.to_string()),
        }
    }
}

/// Backing store client
///
/// Implementations neither retry nor swallow backend failures.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    /// Point read by primary key
    async fn get(&self, table: &str, key: &PrimaryKey) -> Result<Option<Item>, DatabaseError>;

    /// Writes an item, fully replacing any item with the same primary key
    async fn put(&self, table: &str, item: Item) -> Result<(), DatabaseError>;

    /// Returns the items of one partition, ordered by sort key
    async fn query(&self, table: &str, query: KeyQuery) -> Result<Vec<Item>, DatabaseError>;
}
