//! CSV claim file parser
//!
//! Reads comma-separated claim files into [`CsvRow`] records. Only the file
//! structure is checked here; field contents are validated by the domain.

use ::csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use core_kernel::PortError;

use crate::ports::{ClaimRowParser, CsvRow, ParsedRows, RowError};

/// Column names every claim file must carry, in canonical order
pub const EXPECTED_HEADERS: [&str; 6] = [
    "claimId",
    "memberId",
    "provider",
    "serviceDate",
    "totalAmount",
    "diagnosisCodes",
];

/// Row number of the header line
const HEADER_ROW: usize = 1;

pub const NO_DATA_MESSAGE: &str = "No valid data found in CSV file";
pub const INVALID_ROW_MESSAGE: &str = "Invalid row format or insufficient columns";

/// Column positions resolved from a header record
#[derive(Debug, Clone, Default)]
struct ColumnMap {
    positions: [Option<usize>; EXPECTED_HEADERS.len()],
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut positions = [None; EXPECTED_HEADERS.len()];
        for (slot, expected) in positions.iter_mut().zip(EXPECTED_HEADERS) {
            *slot = headers.iter().position(|h| h == expected);
        }
        Self { positions }
    }

    fn field(&self, record: &StringRecord, column: usize) -> String {
        self.positions[column]
            .and_then(|pos| record.get(pos))
            .unwrap_or_default()
            .trim()
            .to_string()
    }

    fn to_row(&self, record: &StringRecord) -> CsvRow {
        CsvRow {
            claim_id: self.field(record, 0),
            member_id: self.field(record, 1),
            provider: self.field(record, 2),
            service_date: self.field(record, 3),
            total_amount: self.field(record, 4),
            diagnosis_codes: self.field(record, 5),
        }
    }
}

/// CSV implementation of [`ClaimRowParser`]
#[derive(Debug, Clone)]
pub struct CsvClaimParser {
    delimiter: u8,
}

impl CsvClaimParser {
    /// Creates a comma-delimited parser
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    /// Sets the field delimiter
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Reports missing and unexpected header names at the header row
    fn check_headers(headers: &StringRecord, errors: &mut Vec<RowError>) {
        let missing: Vec<&str> = EXPECTED_HEADERS
            .iter()
            .copied()
            .filter(|expected| !headers.iter().any(|h| h == *expected))
            .collect();
        let unexpected: Vec<&str> = headers
            .iter()
            .filter(|h| !EXPECTED_HEADERS.contains(h))
            .collect();

        if !missing.is_empty() {
            errors.push(RowError::new(
                HEADER_ROW,
                format!("Missing required headers: {}", missing.join(", ")),
            ));
        }
        if !unexpected.is_empty() {
            errors.push(RowError::new(
                HEADER_ROW,
                format!("Unexpected headers found: {}", unexpected.join(", ")),
            ));
        }
    }
}

impl Default for CsvClaimParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimRowParser for CsvClaimParser {
    fn parse(&self, content: &str) -> Result<ParsedRows, PortError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(content.as_bytes());

        let mut parsed = ParsedRows::default();

        let mut headers = match reader.headers() {
            Ok(headers) => headers.clone(),
            Err(e) => {
                parsed.errors.push(RowError::new(0, format!("CSV parsing failed: {}", e)));
                return Ok(parsed);
            }
        };
        // UTF-8 byte order mark on the first header
        if let Some(first) = headers.get(0) {
            if first.starts_with('\u{feff}') {
                let mut cleaned = StringRecord::new();
                cleaned.push_field(first.trim_start_matches('\u{feff}'));
                for field in headers.iter().skip(1) {
                    cleaned.push_field(field);
                }
                headers = cleaned;
            }
        }

        let has_header = headers.iter().any(|h| !h.is_empty());
        if has_header {
            Self::check_headers(&headers, &mut parsed.errors);
        }
        let columns = ColumnMap::from_headers(&headers);

        let mut data_rows = 0usize;
        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    parsed.errors.push(RowError::new(0, format!("CSV parsing failed: {}", e)));
                    break;
                }
            };

            if record.iter().all(str::is_empty) {
                continue;
            }

            data_rows += 1;
            let row_number = data_rows + HEADER_ROW;

            if record.len() != headers.len() {
                parsed.errors.push(RowError::new(row_number, INVALID_ROW_MESSAGE));
            }
            parsed.rows.push(columns.to_row(&record));
        }

        if parsed.rows.is_empty() && parsed.errors.is_empty() {
            parsed.errors.push(RowError::new(0, NO_DATA_MESSAGE));
        }

        debug!(
            rows = parsed.rows.len(),
            errors = parsed.errors.len(),
            "Parsed claim file"
        );

        Ok(parsed)
    }
}
