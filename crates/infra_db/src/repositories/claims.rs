//! Claims repository implementation
//!
//! This module provides item-level access to the claims table: writing a
//! claim with all of its key attributes, point reads, and the member and
//! month index queries.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, instrument};

use core_kernel::{ClaimId, MemberId, YearMonth};
use domain_claims::{Claim, ClaimRecord};

use crate::config::StoreConfig;
use crate::error::DatabaseError;
use crate::keys::{
    date_lower_bound, date_upper_bound, member_partition_key, month_partition_key, primary_key,
    StorageKeySet,
};
use crate::store::{number_attr, string_attr, Item, KeyQuery, KeyValueStore, SortKeyCondition};

pub const ATTR_CLAIM_ID: &str = "claimId";
pub const ATTR_MEMBER_ID: &str = "memberId";
pub const ATTR_PROVIDER: &str = "provider";
pub const ATTR_SERVICE_DATE: &str = "serviceDate";
pub const ATTR_TOTAL_AMOUNT: &str = "totalAmount";
pub const ATTR_DIAGNOSIS_CODES: &str = "diagnosisCodes";

/// Repository for the claims table
///
/// Results of index queries come back newest first within their partition.
#[derive(Debug)]
pub struct ClaimsRepository<S> {
    store: Arc<S>,
    config: StoreConfig,
}

impl<S> Clone for ClaimsRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S: KeyValueStore> ClaimsRepository<S> {
    /// Creates a repository over an injected store client
    pub fn new(store: Arc<S>, config: StoreConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Writes the claim item, replacing any item with the same claim id
    #[instrument(skip(self, claim), fields(claim_id = %claim.claim_id()))]
    pub async fn put_claim(&self, claim: &Claim) -> Result<(), DatabaseError> {
        self.store.put(&self.config.table_name, claim_to_item(claim)).await
    }

    /// Point read on the primary key
    #[instrument(skip(self), fields(claim_id = %claim_id))]
    pub async fn get_claim(&self, claim_id: &ClaimId) -> Result<Option<ClaimRecord>, DatabaseError> {
        let item = self
            .store
            .get(&self.config.table_name, &primary_key(claim_id))
            .await?;
        item.as_ref().map(item_to_record).transpose()
    }

    /// Queries the member index, optionally restricted to a sort key range
    #[instrument(skip(self), fields(member_id = %member_id))]
    pub async fn query_member(
        &self,
        member_id: &MemberId,
        range: Option<SortKeyCondition>,
    ) -> Result<Vec<ClaimRecord>, DatabaseError> {
        let query = KeyQuery::index(&self.config.member_index, member_partition_key(member_id));
        self.run_query(query, range).await
    }

    /// Queries the part of one month bucket inside a sort key range
    #[instrument(skip(self), fields(month = %month))]
    pub async fn query_month(
        &self,
        month: YearMonth,
        range: SortKeyCondition,
    ) -> Result<Vec<ClaimRecord>, DatabaseError> {
        let query = KeyQuery::index(&self.config.month_index, month_partition_key(month));
        self.run_query(query, Some(range)).await
    }

    async fn run_query(
        &self,
        query: KeyQuery,
        range: Option<SortKeyCondition>,
    ) -> Result<Vec<ClaimRecord>, DatabaseError> {
        let mut query = query.backward();
        query.sort_key = range;

        let items = self.store.query(&self.config.table_name, query).await?;
        debug!(count = items.len(), "Index query returned items");
        items.iter().map(item_to_record).collect()
    }
}

/// Sort key condition covering whole days from `start` to `end`
///
/// Returns `None` when neither bound is given.
pub fn date_range_condition(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Option<SortKeyCondition> {
    match (start, end) {
        (Some(start), Some(end)) => Some(SortKeyCondition::Between(
            date_lower_bound(start),
            date_upper_bound(end),
        )),
        (Some(start), None) => Some(SortKeyCondition::AtLeast(date_lower_bound(start))),
        (None, Some(end)) => Some(SortKeyCondition::AtMost(date_upper_bound(end))),
        (None, None) => None,
    }
}

/// Builds the stored item: canonical claim fields plus all key attributes
pub fn claim_to_item(claim: &Claim) -> Item {
    let record = claim.to_record();
    let mut item = Item::new();

    StorageKeySet::derive(claim.claim_id(), claim.member_id(), claim.service_date())
        .write_to(&mut item);

    item.insert(ATTR_CLAIM_ID.to_string(), record.claim_id.into());
    item.insert(ATTR_MEMBER_ID.to_string(), record.member_id.into());
    item.insert(ATTR_PROVIDER.to_string(), record.provider.into());
    item.insert(ATTR_SERVICE_DATE.to_string(), record.service_date.into());
    item.insert(ATTR_TOTAL_AMOUNT.to_string(), record.total_amount.into());
    item.insert(ATTR_DIAGNOSIS_CODES.to_string(), record.diagnosis_codes.into());
    item
}

/// Reads the canonical claim fields back from a stored item
pub fn item_to_record(item: &Item) -> Result<ClaimRecord, DatabaseError> {
    Ok(ClaimRecord {
        claim_id: string_attr(item, ATTR_CLAIM_ID)?.to_string(),
        member_id: string_attr(item, ATTR_MEMBER_ID)?.to_string(),
        provider: string_attr(item, ATTR_PROVIDER)?.to_string(),
        service_date: string_attr(item, ATTR_SERVICE_DATE)?.to_string(),
        total_amount: number_attr(item, ATTR_TOTAL_AMOUNT)?,
        diagnosis_codes: string_attr(item, ATTR_DIAGNOSIS_CODES)?.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::ATTR_GSI1SK;
    use crate::store::AttributeValue;

    fn claim() -> Claim {
        Claim::new(ClaimRecord {
            claim_id: "CLM001".to_string(),
            member_id: "MBR001".to_string(),
            provider: "HealthCare Inc".to_string(),
            service_date: "2024-01-15".to_string(),
            total_amount: 12500,
            diagnosis_codes: "R51;K21.9".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_item_layout() {
        let item = claim_to_item(&claim());

        assert_eq!(item.len(), 14);
        assert_eq!(item[ATTR_TOTAL_AMOUNT], AttributeValue::N(12500));
        assert_eq!(item[ATTR_DIAGNOSIS_CODES], AttributeValue::S("R51;K21.9".into()));
        assert_eq!(
            item[ATTR_GSI1SK],
            AttributeValue::S("DATE#2024-01-15#CLAIM#CLM001".into())
        );
    }

    #[test]
    fn test_item_reads_back_as_record() {
        let claim = claim();
        let record = item_to_record(&claim_to_item(&claim)).unwrap();
        assert_eq!(record, claim.to_record());
    }

    #[test]
    fn test_item_with_text_amount_is_rejected() {
        let mut item = claim_to_item(&claim());
        item.insert(ATTR_TOTAL_AMOUNT.to_string(), "12500".into());
        assert!(matches!(
            item_to_record(&item),
            Err(DatabaseError::SerializationError(_))
        ));
    }

    #[test]
    fn test_date_range_condition() {
        let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let feb = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();

        assert_eq!(date_range_condition(None, None), None);
        assert_eq!(
            date_range_condition(Some(jan), None),
            Some(SortKeyCondition::AtLeast("DATE#2024-01-01#".into()))
        );
        assert_eq!(
            date_range_condition(Some(jan), Some(feb)),
            Some(SortKeyCondition::Between(
                "DATE#2024-01-01#".into(),
                "DATE#2024-02-29#\u{FFFF}".into()
            ))
        );
    }
}
