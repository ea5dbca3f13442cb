//! Repository implementations for stored entities
//!
//! Repositories encapsulate the item layout and key queries for one entity
//! and map between stored items and row records. They return
//! [`DatabaseError`](crate::DatabaseError); translation to port errors
//! happens in the adapters.

pub mod claims;

pub use claims::{ClaimsRepository, date_range_condition};
