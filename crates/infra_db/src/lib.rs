//! Infrastructure Storage Layer
//!
//! This crate provides the storage infrastructure for the claims system: a
//! transport-agnostic key-value store contract, the claim key scheme, and
//! the adapter that implements the domain's `ClaimsPort` on top of them.
//!
//! # Architecture
//!
//! The crate follows the repository pattern, providing data access
//! abstractions that hide the item layout from the domain layer:
//!
//! ```text
//! ClaimsPort (domain) <- KeyValueClaimsAdapter -> ClaimsRepository -> KeyValueStore
//! ```
//!
//! The store client is constructed once by the process and injected; this
//! crate holds no global client.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use infra_db::{InMemoryKeyValueStore, KeyValueClaimsAdapter, StoreConfig};
//!
//! let store = Arc::new(InMemoryKeyValueStore::new());
//! let adapter = KeyValueClaimsAdapter::new(store, StoreConfig::default());
//! ```

pub mod error;
pub mod config;
pub mod store;
pub mod memory;
pub mod keys;
pub mod repositories;
pub mod adapters;

pub use error::DatabaseError;
pub use config::StoreConfig;
pub use store::{AttributeValue, Item, KeyQuery, KeyValueStore, PrimaryKey, ScanOrder, SortKeyCondition};
pub use memory::{FailureMode, InMemoryKeyValueStore};
pub use keys::StorageKeySet;
pub use repositories::ClaimsRepository;
pub use adapters::{db_to_port_error, KeyValueClaimsAdapter};
