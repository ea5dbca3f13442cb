//! Domain Adapters
//!
//! Adapter implementations for domain ports that need no storage backend.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_claims::adapters::CsvClaimParser;
//! use domain_claims::ClaimRowParser;
//!
//! let parsed = CsvClaimParser::new().parse(&content)?;
//! ```

pub mod csv;

pub use self::csv::CsvClaimParser;
