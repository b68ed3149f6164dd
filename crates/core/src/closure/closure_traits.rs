use async_trait::async_trait;

use crate::closure::closure_model::{ClosureReport, NewWeeklyClosure, WeeklyClosure};
use crate::errors::Result;
use crate::payout::PayoutConfig;
use crate::week::FarmWeek;

/// Trait for weekly closure repository operations
#[async_trait]
pub trait ClosureRepositoryTrait: Send + Sync {
    fn get_closure(&self, week: FarmWeek) -> Result<Option<WeeklyClosure>>;
    fn list_closures(&self) -> Result<Vec<WeeklyClosure>>;

    /// Settles every unsettled dirty-money entry of the closure's week and
    /// upserts the closure record, in a single transaction. Settlement is a
    /// conditional per-row update, so re-running on an already-closed week
    /// flips nothing. An existing record keeps its original `closed_by` and
    /// `closed_at`; only the recomputed totals are refreshed.
    ///
    /// Returns the stored record and the number of rows settled by this call.
    async fn finalize_week(&self, closure: NewWeeklyClosure) -> Result<(WeeklyClosure, usize)>;
}

/// Trait for week closure service operations
#[async_trait]
pub trait WeekClosureServiceTrait: Send + Sync {
    /// Closes a week: computes every active member's payout, settles the
    /// week's dirty-money ledger entries, persists the closure record, and
    /// returns the reconciliation report. Safe to re-run; a re-closure
    /// recomputes the identical report and settles zero additional rows.
    ///
    /// `actor_id` is assumed already authorized by the caller.
    async fn close_week(
        &self,
        week: FarmWeek,
        actor_id: &str,
        config: Option<PayoutConfig>,
    ) -> Result<ClosureReport>;

    /// Read-only report of the week as it stands; settles nothing.
    fn preview_week(&self, week: FarmWeek) -> Result<ClosureReport>;

    fn get_closure(&self, week: FarmWeek) -> Result<Option<WeeklyClosure>>;
}
