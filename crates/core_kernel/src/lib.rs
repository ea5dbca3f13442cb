//! Core Kernel - Foundational types for the claims system
//!
//! This crate provides the building blocks shared by every layer:
//! - Strongly-typed string identifiers for claims and members
//! - Calendar helpers for dates and year-month buckets
//! - Port abstractions and the port error taxonomy

pub mod temporal;
pub mod identifiers;
pub mod ports;
pub mod error;

pub use temporal::{YearMonth, TemporalError, month_range, format_date, parse_date, months_before};
pub use identifiers::{ClaimId, MemberId};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
pub use error::CoreError;
