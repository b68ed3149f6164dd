use chrono::NaiveDateTime;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;

use super::closure_model::{ClosureReport, MemberWeekReport, NewWeeklyClosure, WeeklyClosure};
use super::closure_traits::{ClosureRepositoryTrait, WeekClosureServiceTrait};
use crate::errors::Result;
use crate::farm::{FarmRepositoryTrait, ResourceType};
use crate::members::MemberRepositoryTrait;
use crate::payout::{compute_payout, PayoutConfig};
use crate::settings::SettingsServiceTrait;
use crate::week::FarmWeek;

/// Orchestrates the weekly close: snapshot the ledger, compute payouts,
/// settle dirty-money entries, persist the closure record, report.
pub struct WeekClosureService {
    member_repository: Arc<dyn MemberRepositoryTrait>,
    farm_repository: Arc<dyn FarmRepositoryTrait>,
    closure_repository: Arc<dyn ClosureRepositoryTrait>,
    settings_service: Arc<dyn SettingsServiceTrait>,
}

impl WeekClosureService {
    /// Creates a new WeekClosureService instance
    pub fn new(
        member_repository: Arc<dyn MemberRepositoryTrait>,
        farm_repository: Arc<dyn FarmRepositoryTrait>,
        closure_repository: Arc<dyn ClosureRepositoryTrait>,
        settings_service: Arc<dyn SettingsServiceTrait>,
    ) -> Self {
        WeekClosureService {
            member_repository,
            farm_repository,
            closure_repository,
            settings_service,
        }
    }

    /// Resolves the configuration for a week: a closed week keeps the config
    /// captured on its record; otherwise the supplied (or default) config is
    /// validated and used.
    fn resolve_config(
        &self,
        existing: Option<&WeeklyClosure>,
        supplied: Option<PayoutConfig>,
    ) -> Result<PayoutConfig> {
        let config = match existing.filter(|c| c.closed) {
            Some(closure) => {
                debug!(
                    "Week {} already closed; reusing its captured payout config",
                    closure.week
                );
                closure.config.clone()
            }
            None => {
                let config = match supplied {
                    Some(config) => config,
                    None => self.settings_service.payout_config()?,
                };
                config.validate()?;
                config
            }
        };
        if !config.shares_sum_to_one() {
            // Caller error per the payout contract: flagged, never corrected.
            warn!(
                "Payout shares do not sum to 1 (member {} + household {})",
                config.member_share, config.household_share
            );
        }
        Ok(config)
    }

    /// One report line per active member, including members with zero farm
    /// activity, sorted by display name.
    fn build_member_lines(
        &self,
        week: FarmWeek,
        config: &PayoutConfig,
    ) -> Result<Vec<MemberWeekReport>> {
        let members = self.member_repository.list_members(Some(true))?;
        let entries = self.farm_repository.entries_for_week(week)?;

        let mut sums_by_member: HashMap<String, HashMap<ResourceType, i64>> = HashMap::new();
        for entry in &entries {
            *sums_by_member
                .entry(entry.member_id.clone())
                .or_default()
                .entry(entry.resource_type)
                .or_insert(0) += entry.effective_quantity();
        }

        let mut lines: Vec<MemberWeekReport> = members
            .into_iter()
            .map(|member| {
                let mut totals: HashMap<ResourceType, i64> =
                    ResourceType::all().into_iter().map(|t| (t, 0)).collect();
                if let Some(sums) = sums_by_member.get(&member.id) {
                    for (resource_type, quantity) in sums {
                        totals.insert(*resource_type, *quantity);
                    }
                }
                let dirty_total = totals[&ResourceType::DirtyMoney];
                MemberWeekReport {
                    member_id: member.id,
                    display_name: member.display_name,
                    totals,
                    payout: compute_payout(dirty_total, config),
                }
            })
            .collect();
        lines.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(lines)
    }

    fn assemble_report(
        week: FarmWeek,
        config: PayoutConfig,
        members: Vec<MemberWeekReport>,
        closed_by: Option<String>,
        closed_at: Option<NaiveDateTime>,
        entries_settled: usize,
    ) -> ClosureReport {
        let total_dirty_money = members.iter().map(|m| m.payout.dirty_total).sum();
        let total_member_payout = members.iter().map(|m| m.payout.member_payout).sum();
        let total_household_payout = members.iter().map(|m| m.payout.household_payout).sum();
        let members_met_quota = members.iter().filter(|m| m.payout.quota_met).count() as i32;
        ClosureReport {
            week,
            closed: closed_by.is_some(),
            closed_by,
            closed_at,
            config,
            total_members: members.len() as i32,
            total_dirty_money,
            total_member_payout,
            total_household_payout,
            members_met_quota,
            members,
            entries_settled,
        }
    }
}

#[async_trait::async_trait]
impl WeekClosureServiceTrait for WeekClosureService {
    async fn close_week(
        &self,
        week: FarmWeek,
        actor_id: &str,
        config: Option<PayoutConfig>,
    ) -> Result<ClosureReport> {
        let existing = self.closure_repository.get_closure(week)?;
        let config = self.resolve_config(existing.as_ref(), config)?;

        let members = self.build_member_lines(week, &config)?;
        let report = Self::assemble_report(week, config, members, None, None, 0);

        // A re-closure keeps the original closer on the record; the current
        // actor only shows up on a first closure.
        let closed_by = existing
            .as_ref()
            .filter(|c| c.closed)
            .map(|c| c.closed_by.clone())
            .unwrap_or_else(|| actor_id.to_string());

        let new_closure = NewWeeklyClosure {
            week,
            closed_by,
            total_members: report.total_members,
            total_dirty_money: report.total_dirty_money,
            total_member_payout: report.total_member_payout,
            total_household_payout: report.total_household_payout,
            members_met_quota: report.members_met_quota,
            config: report.config.clone(),
        };

        let (stored, entries_settled) = self.closure_repository.finalize_week(new_closure).await?;

        info!(
            "Closed {}: {} members, {} dirty money total, {} entries settled",
            week, stored.total_members, stored.total_dirty_money, entries_settled
        );

        Ok(ClosureReport {
            closed: true,
            closed_by: Some(stored.closed_by),
            closed_at: Some(stored.closed_at),
            entries_settled,
            ..report
        })
    }

    fn preview_week(&self, week: FarmWeek) -> Result<ClosureReport> {
        let existing = self.closure_repository.get_closure(week)?;
        let config = match existing.as_ref().filter(|c| c.closed) {
            Some(closure) => closure.config.clone(),
            None => self.settings_service.payout_config()?,
        };
        let members = self.build_member_lines(week, &config)?;
        let (closed_by, closed_at) = existing
            .filter(|c| c.closed)
            .map(|c| (Some(c.closed_by), Some(c.closed_at)))
            .unwrap_or((None, None));
        Ok(Self::assemble_report(
            week, config, members, closed_by, closed_at, 0,
        ))
    }

    fn get_closure(&self, week: FarmWeek) -> Result<Option<WeeklyClosure>> {
        self.closure_repository.get_closure(week)
    }
}
