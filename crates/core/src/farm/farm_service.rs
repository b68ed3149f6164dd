use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use super::farm_model::{FarmEntry, NewFarmEntry, ResourceType};
use super::farm_traits::{FarmLedgerServiceTrait, FarmRepositoryTrait};
use crate::errors::{Error, Result, ValidationError};
use crate::members::MemberRepositoryTrait;
use crate::week::FarmWeek;

/// Service owning the per-member, per-week farm accumulation ledger.
pub struct FarmLedgerService {
    farm_repository: Arc<dyn FarmRepositoryTrait>,
    member_repository: Arc<dyn MemberRepositoryTrait>,
}

impl FarmLedgerService {
    /// Creates a new FarmLedgerService instance
    pub fn new(
        farm_repository: Arc<dyn FarmRepositoryTrait>,
        member_repository: Arc<dyn MemberRepositoryTrait>,
    ) -> Self {
        FarmLedgerService {
            farm_repository,
            member_repository,
        }
    }

    fn sum_entries<F>(entries: &[FarmEntry], amount: F) -> HashMap<ResourceType, i64>
    where
        F: Fn(&FarmEntry) -> i64,
    {
        let mut totals: HashMap<ResourceType, i64> =
            ResourceType::all().into_iter().map(|t| (t, 0)).collect();
        for entry in entries {
            *totals.entry(entry.resource_type).or_insert(0) += amount(entry);
        }
        totals
    }
}

#[async_trait::async_trait]
impl FarmLedgerServiceTrait for FarmLedgerService {
    async fn record_farm(
        &self,
        member_id: &str,
        resource_type: ResourceType,
        quantity: i64,
        week: FarmWeek,
    ) -> Result<FarmEntry> {
        let new_entry = NewFarmEntry {
            id: None,
            member_id: member_id.to_string(),
            resource_type,
            week,
            quantity,
        };
        new_entry.validate()?;

        let member = self.member_repository.get_member(member_id)?;
        if !member.active {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Member '{}' is inactive and cannot record farm",
                member.display_name
            ))));
        }

        debug!(
            "Recording farm for {}: {} x{} in {}",
            member.display_name, resource_type, quantity, week
        );
        self.farm_repository.insert_entry(new_entry).await
    }

    fn totals_for(&self, member_id: &str, week: FarmWeek) -> Result<HashMap<ResourceType, i64>> {
        let entries = self
            .farm_repository
            .entries_for_member_week(member_id, week)?;
        Ok(Self::sum_entries(&entries, |e| e.quantity))
    }

    fn archived_totals_for(
        &self,
        member_id: &str,
        week: FarmWeek,
    ) -> Result<HashMap<ResourceType, i64>> {
        let entries = self
            .farm_repository
            .entries_for_member_week(member_id, week)?;
        Ok(Self::sum_entries(&entries, |e| {
            if e.settled {
                e.quantity_original.unwrap_or(0)
            } else {
                0
            }
        }))
    }

    fn entries_for_member_week(&self, member_id: &str, week: FarmWeek) -> Result<Vec<FarmEntry>> {
        self.farm_repository.entries_for_member_week(member_id, week)
    }

    async fn settle(&self, entry_id: &str, settled_by: &str) -> Result<()> {
        let flipped = self.farm_repository.settle_entry(entry_id, settled_by).await?;
        if !flipped {
            // Already settled, by us or by a concurrent closure. Not an error.
            debug!("Entry {} was already settled; nothing to do", entry_id);
        }
        Ok(())
    }
}
