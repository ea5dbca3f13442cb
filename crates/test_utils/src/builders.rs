//! Test Data Builders
//!
//! Provides builder patterns for constructing claim records and claim files
//! with sensible defaults. Tests specify only the fields they care about.

use chrono::NaiveDate;
use domain_claims::{Claim, ClaimRecord};
use fake::faker::company::en::CompanyName;
use fake::Fake;

use crate::fixtures::{ClaimFixtures, CSV_HEADER};

/// Builder for constructing claim records
#[derive(Debug, Clone)]
pub struct ClaimRecordBuilder {
    record: ClaimRecord,
}

impl Default for ClaimRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimRecordBuilder {
    /// Creates a new builder with fixture defaults
    pub fn new() -> Self {
        Self {
            record: ClaimFixtures::record(),
        }
    }

    pub fn with_claim_id(mut self, claim_id: impl Into<String>) -> Self {
        self.record.claim_id = claim_id.into();
        self
    }

    pub fn with_member_id(mut self, member_id: impl Into<String>) -> Self {
        self.record.member_id = member_id.into();
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.record.provider = provider.into();
        self
    }

    /// Uses a randomly generated company name as provider
    pub fn with_fake_provider(mut self) -> Self {
        self.record.provider = CompanyName().fake();
        self
    }

    /// Sets the raw service date string
    pub fn with_service_date(mut self, service_date: impl Into<String>) -> Self {
        self.record.service_date = service_date.into();
        self
    }

    pub fn on(self, date: NaiveDate) -> Self {
        self.with_service_date(date.format("%Y-%m-%d").to_string())
    }

    pub fn with_total_amount(mut self, total_amount: i64) -> Self {
        self.record.total_amount = total_amount;
        self
    }

    pub fn with_diagnosis_codes(mut self, codes: impl Into<String>) -> Self {
        self.record.diagnosis_codes = codes.into();
        self
    }

    pub fn build(self) -> ClaimRecord {
        self.record
    }

    /// Builds and validates a claim
    ///
    /// # Panics
    ///
    /// Panics if the record is not a valid claim
    pub fn build_claim(self) -> Claim {
        Claim::new(self.record).unwrap()
    }
}

/// Builder for claim file content
#[derive(Debug, Clone)]
pub struct CsvContentBuilder {
    header: String,
    lines: Vec<String>,
}

impl Default for CsvContentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvContentBuilder {
    /// Creates a builder with the standard header
    pub fn new() -> Self {
        Self {
            header: CSV_HEADER.to_string(),
            lines: Vec::new(),
        }
    }

    /// Replaces the header line verbatim
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Appends a row built from a record
    pub fn row(mut self, record: &ClaimRecord) -> Self {
        self.lines.push(format!(
            "{},{},{},{},{},{}",
            record.claim_id,
            record.member_id,
            record.provider,
            record.service_date,
            record.total_amount,
            record.diagnosis_codes
        ));
        self
    }

    /// Appends a raw line
    pub fn raw(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn build(self) -> String {
        let mut content = self.header;
        for line in self.lines {
            content.push('\n');
            content.push_str(&line);
        }
        content
    }
}
