//! Claims table configuration
//!
//! Names the table and secondary indexes the claims store reads and writes,
//! and the default look-back window for unfiltered listings.

/// Configuration for the claims table
///
/// # Example
///
/// ```rust
/// use infra_db::StoreConfig;
///
/// let config = StoreConfig::new("claims-staging")
///     .month_index("MonthIndex")
///     .default_window_months(6);
/// assert_eq!(config.table_name, "claims-staging");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Table holding one item per claim
    pub table_name: String,
    /// Index partitioned by member
    pub member_index: String,
    /// Index partitioned by service month
    pub month_index: String,
    /// Months looked back when a listing has no filters
    pub default_window_months: u32,
}

impl StoreConfig {
    /// Creates a configuration for the given table with default index names
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            member_index: "GSI1".to_string(),
            month_index: "GSI3".to_string(),
            default_window_months: 12,
        }
    }

    pub fn member_index(mut self, name: impl Into<String>) -> Self {
        self.member_index = name.into();
        self
    }

    pub fn month_index(mut self, name: impl Into<String>) -> Self {
        self.month_index = name.into();
        self
    }

    /// Sets the default look-back window (default: 12 months)
    pub fn default_window_months(mut self, months: u32) -> Self {
        self.default_window_months = months;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new("claims")
    }
}
