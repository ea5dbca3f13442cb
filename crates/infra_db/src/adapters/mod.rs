//! Domain Adapters
//!
//! This module provides adapter implementations for domain ports,
//! connecting domain interfaces to the key-value storage layer.
//!
//! # Architecture
//!
//! Each adapter:
//! - Implements the domain's port trait
//! - Translates between domain models and stored row records
//! - Uses the repository layer for storage operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::KeyValueClaimsAdapter;
//! use domain_claims::ClaimsPort;
//!
//! let adapter = KeyValueClaimsAdapter::new(store, StoreConfig::default());
//! let claim = adapter.find_by_id(&claim_id).await?;
//! ```

pub mod claims;

pub use claims::{db_to_port_error, KeyValueClaimsAdapter};
