use std::collections::HashMap;

use async_trait::async_trait;

use crate::errors::Result;
use crate::farm::farm_model::{FarmEntry, NewFarmEntry, ResourceType};
use crate::week::FarmWeek;

/// Trait for farm ledger repository operations
#[async_trait]
pub trait FarmRepositoryTrait: Send + Sync {
    fn get_entry(&self, entry_id: &str) -> Result<FarmEntry>;
    fn entries_for_week(&self, week: FarmWeek) -> Result<Vec<FarmEntry>>;
    fn entries_for_member_week(&self, member_id: &str, week: FarmWeek) -> Result<Vec<FarmEntry>>;
    async fn insert_entry(&self, new_entry: NewFarmEntry) -> Result<FarmEntry>;

    /// Settles one entry with a conditional update (`WHERE settled = false`).
    /// Returns whether this call actually flipped the row; `false` means the
    /// entry was already settled (possibly by a concurrent actor) and is
    /// treated as success by callers.
    async fn settle_entry(&self, entry_id: &str, settled_by: &str) -> Result<bool>;
}

/// Trait for farm ledger service operations
#[async_trait]
pub trait FarmLedgerServiceTrait: Send + Sync {
    /// Appends a new ledger entry; never merges with an existing row.
    async fn record_farm(
        &self,
        member_id: &str,
        resource_type: ResourceType,
        quantity: i64,
        week: FarmWeek,
    ) -> Result<FarmEntry>;

    /// Current (unsettled) totals per resource type. Settled entries are
    /// already zeroed so archived amounts never leak into these sums.
    fn totals_for(&self, member_id: &str, week: FarmWeek) -> Result<HashMap<ResourceType, i64>>;

    /// Sums of the archived pre-settlement values, for audit and reporting.
    fn archived_totals_for(
        &self,
        member_id: &str,
        week: FarmWeek,
    ) -> Result<HashMap<ResourceType, i64>>;

    fn entries_for_member_week(&self, member_id: &str, week: FarmWeek) -> Result<Vec<FarmEntry>>;

    /// Idempotent settlement of one entry.
    async fn settle(&self, entry_id: &str, settled_by: &str) -> Result<()>;
}
