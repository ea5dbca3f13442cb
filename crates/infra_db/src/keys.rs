//! Claim key scheme
//!
//! Every claim is one item. Its keys are plain string concatenations and are
//! part of the stored data format, so they must never change shape:
//!
//! ```text
//! PK      CLAIM#{claimId}
//! SK      CLAIM#{claimId}
//! GSI1PK  MEMBER#{memberId}
//! GSI1SK  DATE#{serviceDate}#CLAIM#{claimId}
//! GSI2PK  DATE#{serviceDate}
//! GSI2SK  DATE#{serviceDate}#CLAIM#{claimId}
//! GSI3PK  MONTH#{YYYY-MM}
//! GSI3SK  DATE#{serviceDate}#CLAIM#{claimId}
//! ```
//!
//! Dates are always `YYYY-MM-DD`, which sorts lexicographically in date
//! order.

use chrono::NaiveDate;

use core_kernel::{format_date, ClaimId, MemberId, YearMonth};

use crate::store::{AttributeValue, Item, PrimaryKey, ATTR_PK, ATTR_SK};

pub const ATTR_GSI1PK: &str = "GSI1PK";
pub const ATTR_GSI1SK: &str = "GSI1SK";
pub const ATTR_GSI2PK: &str = "GSI2PK";
pub const ATTR_GSI2SK: &str = "GSI2SK";
pub const ATTR_GSI3PK: &str = "GSI3PK";
pub const ATTR_GSI3SK: &str = "GSI3SK";

/// Sorts after any claim id on the same day
const HIGH_SENTINEL: char = '\u{FFFF}';

/// `CLAIM#{claimId}`, used as both partition and sort key
pub fn primary_key(claim_id: &ClaimId) -> PrimaryKey {
    let key = format!("CLAIM#{}", claim_id);
    PrimaryKey::new(key.clone(), key)
}

/// `MEMBER#{memberId}`
pub fn member_partition_key(member_id: &MemberId) -> String {
    format!("MEMBER#{}", member_id)
}

/// `DATE#{serviceDate}`
pub fn date_partition_key(service_date: NaiveDate) -> String {
    format!("DATE#{}", format_date(service_date))
}

/// `MONTH#{YYYY-MM}`
pub fn month_partition_key(month: YearMonth) -> String {
    format!("MONTH#{}", month)
}

/// `DATE#{serviceDate}#CLAIM#{claimId}`
pub fn date_claim_sort_key(service_date: NaiveDate, claim_id: &ClaimId) -> String {
    format!("DATE#{}#CLAIM#{}", format_date(service_date), claim_id)
}

/// Lowest sort key of any claim on `date`
pub fn date_lower_bound(date: NaiveDate) -> String {
    format!("DATE#{}#", format_date(date))
}

/// Highest sort key of any claim on `date`
pub fn date_upper_bound(date: NaiveDate) -> String {
    format!("DATE#{}#{}", format_date(date), HIGH_SENTINEL)
}

/// All key attributes of one claim item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeySet {
    pub pk: String,
    pub sk: String,
    pub gsi1pk: String,
    pub gsi1sk: String,
    pub gsi2pk: String,
    pub gsi2sk: String,
    pub gsi3pk: String,
    pub gsi3sk: String,
}

impl StorageKeySet {
    pub fn derive(claim_id: &ClaimId, member_id: &MemberId, service_date: NaiveDate) -> Self {
        let primary = primary_key(claim_id);
        let date_claim = date_claim_sort_key(service_date, claim_id);

        Self {
            pk: primary.partition_key,
            sk: primary.sort_key,
            gsi1pk: member_partition_key(member_id),
            gsi1sk: date_claim.clone(),
            gsi2pk: date_partition_key(service_date),
            gsi2sk: date_claim.clone(),
            gsi3pk: month_partition_key(YearMonth::from_date(service_date)),
            gsi3sk: date_claim,
        }
    }

    /// Writes all eight key attributes into an item
    pub fn write_to(self, item: &mut Item) {
        let pairs = [
            (ATTR_PK, self.pk),
            (ATTR_SK, self.sk),
            (ATTR_GSI1PK, self.gsi1pk),
            (ATTR_GSI1SK, self.gsi1sk),
            (ATTR_GSI2PK, self.gsi2pk),
            (ATTR_GSI2SK, self.gsi2sk),
            (ATTR_GSI3PK, self.gsi3pk),
            (ATTR_GSI3SK, self.gsi3sk),
        ];
        for (name, value) in pairs {
            item.insert(name.to_string(), AttributeValue::S(value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_derive_key_set() {
        let keys = StorageKeySet::derive(
            &ClaimId::from("CLM001"),
            &MemberId::from("MBR001"),
            date("2024-01-15"),
        );

        assert_eq!(keys.pk, "CLAIM#CLM001");
        assert_eq!(keys.sk, "CLAIM#CLM001");
        assert_eq!(keys.gsi1pk, "MEMBER#MBR001");
        assert_eq!(keys.gsi1sk, "DATE#2024-01-15#CLAIM#CLM001");
        assert_eq!(keys.gsi2pk, "DATE#2024-01-15");
        assert_eq!(keys.gsi2sk, "DATE#2024-01-15#CLAIM#CLM001");
        assert_eq!(keys.gsi3pk, "MONTH#2024-01");
        assert_eq!(keys.gsi3sk, "DATE#2024-01-15#CLAIM#CLM001");
    }

    #[test]
    fn test_day_bounds_enclose_every_claim_of_the_day() {
        let day = date("2024-03-31");
        let sort_key = date_claim_sort_key(day, &ClaimId::from("zzz-999"));

        assert!(date_lower_bound(day) <= sort_key);
        assert!(sort_key <= date_upper_bound(day));
        assert!(date_upper_bound(day) < date_lower_bound(date("2024-04-01")));
        assert!(date_upper_bound(date("2024-03-30")) < date_lower_bound(day));
    }

    #[test]
    fn test_write_to_item() {
        let mut item = Item::new();
        StorageKeySet::derive(&ClaimId::from("C"), &MemberId::from("M"), date("2024-02-29"))
            .write_to(&mut item);

        assert_eq!(item.len(), 8);
        assert_eq!(item[ATTR_GSI3PK], AttributeValue::S("MONTH#2024-02".into()));
    }
}
