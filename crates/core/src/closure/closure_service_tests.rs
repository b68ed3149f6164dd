use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal_macros::dec;

use super::closure_model::{NewWeeklyClosure, WeeklyClosure};
use super::closure_service::WeekClosureService;
use super::closure_traits::{ClosureRepositoryTrait, WeekClosureServiceTrait};
use crate::errors::{DatabaseError, Error, Result};
use crate::farm::{FarmEntry, FarmRepositoryTrait, NewFarmEntry, ResourceType};
use crate::members::{Member, MemberRepositoryTrait, NewMember};
use crate::payout::PayoutConfig;
use crate::settings::SettingsServiceTrait;
use crate::week::FarmWeek;

type SharedEntries = Arc<RwLock<Vec<FarmEntry>>>;

// ============== Mock Repositories ==============

struct MockMemberRepository {
    members: RwLock<Vec<Member>>,
}

#[async_trait]
impl MemberRepositoryTrait for MockMemberRepository {
    fn get_member(&self, member_id: &str) -> Result<Member> {
        self.members
            .read()
            .unwrap()
            .iter()
            .find(|m| m.id == member_id)
            .cloned()
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(member_id.to_string())))
    }

    fn get_by_external_account(&self, _: &str) -> Result<Member> {
        unimplemented!()
    }

    fn list_members(&self, active_filter: Option<bool>) -> Result<Vec<Member>> {
        let mut members: Vec<Member> = self
            .members
            .read()
            .unwrap()
            .iter()
            .filter(|m| active_filter.map_or(true, |active| m.active == active))
            .cloned()
            .collect();
        members.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(members)
    }

    async fn create_member(&self, _: NewMember) -> Result<Member> {
        unimplemented!()
    }

    async fn set_active(&self, _: &str, _: bool) -> Result<Member> {
        unimplemented!()
    }
}

struct MockFarmRepository {
    entries: SharedEntries,
    next_id: RwLock<u64>,
}

impl MockFarmRepository {
    fn new(entries: SharedEntries) -> Self {
        Self {
            entries,
            next_id: RwLock::new(1),
        }
    }
}

#[async_trait]
impl FarmRepositoryTrait for MockFarmRepository {
    fn get_entry(&self, entry_id: &str) -> Result<FarmEntry> {
        self.entries
            .read()
            .unwrap()
            .iter()
            .find(|e| e.id == entry_id)
            .cloned()
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(entry_id.to_string())))
    }

    fn entries_for_week(&self, week: FarmWeek) -> Result<Vec<FarmEntry>> {
        Ok(self
            .entries
            .read()
            .unwrap()
            .iter()
            .filter(|e| e.week == week)
            .cloned()
            .collect())
    }

    fn entries_for_member_week(&self, member_id: &str, week: FarmWeek) -> Result<Vec<FarmEntry>> {
        Ok(self
            .entries
            .read()
            .unwrap()
            .iter()
            .filter(|e| e.member_id == member_id && e.week == week)
            .cloned()
            .collect())
    }

    async fn insert_entry(&self, new_entry: NewFarmEntry) -> Result<FarmEntry> {
        let mut next_id = self.next_id.write().unwrap();
        let entry = FarmEntry {
            id: format!("entry-{}", *next_id),
            member_id: new_entry.member_id,
            resource_type: new_entry.resource_type,
            week: new_entry.week,
            quantity: new_entry.quantity,
            quantity_original: None,
            settled: false,
            settled_at: None,
            settled_by: None,
            recorded_at: Utc::now().naive_utc(),
        };
        *next_id += 1;
        self.entries.write().unwrap().push(entry.clone());
        Ok(entry)
    }

    async fn settle_entry(&self, entry_id: &str, settled_by: &str) -> Result<bool> {
        let mut entries = self.entries.write().unwrap();
        let entry = entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(entry_id.to_string())))?;
        if entry.settled {
            return Ok(false);
        }
        entry.quantity_original = Some(entry.quantity);
        entry.quantity = 0;
        entry.settled = true;
        entry.settled_at = Some(Utc::now().naive_utc());
        entry.settled_by = Some(settled_by.to_string());
        Ok(true)
    }
}

struct MockClosureRepository {
    closures: RwLock<HashMap<(u32, i32), WeeklyClosure>>,
    entries: SharedEntries,
}

impl MockClosureRepository {
    fn new(entries: SharedEntries) -> Self {
        Self {
            closures: RwLock::new(HashMap::new()),
            entries,
        }
    }
}

#[async_trait]
impl ClosureRepositoryTrait for MockClosureRepository {
    fn get_closure(&self, week: FarmWeek) -> Result<Option<WeeklyClosure>> {
        Ok(self
            .closures
            .read()
            .unwrap()
            .get(&(week.week, week.year))
            .cloned())
    }

    fn list_closures(&self) -> Result<Vec<WeeklyClosure>> {
        Ok(self.closures.read().unwrap().values().cloned().collect())
    }

    async fn finalize_week(&self, closure: NewWeeklyClosure) -> Result<(WeeklyClosure, usize)> {
        // Mirrors the storage transaction: conditional per-row settlement of
        // the week's dirty money plus the closure upsert.
        let now = Utc::now().naive_utc();
        let mut settled = 0usize;
        {
            let mut entries = self.entries.write().unwrap();
            for entry in entries.iter_mut() {
                if entry.week == closure.week
                    && entry.resource_type == ResourceType::DirtyMoney
                    && !entry.settled
                {
                    entry.quantity_original = Some(entry.quantity);
                    entry.quantity = 0;
                    entry.settled = true;
                    entry.settled_at = Some(now);
                    entry.settled_by = Some(closure.closed_by.clone());
                    settled += 1;
                }
            }
        }

        let mut closures = self.closures.write().unwrap();
        let key = (closure.week.week, closure.week.year);
        let stored = match closures.get(&key) {
            Some(existing) => WeeklyClosure {
                total_members: closure.total_members,
                total_dirty_money: closure.total_dirty_money,
                total_member_payout: closure.total_member_payout,
                total_household_payout: closure.total_household_payout,
                members_met_quota: closure.members_met_quota,
                config: closure.config,
                ..existing.clone()
            },
            None => WeeklyClosure {
                id: format!("closure-{}-{}", key.0, key.1),
                week: closure.week,
                closed: true,
                closed_by: closure.closed_by,
                closed_at: now,
                total_members: closure.total_members,
                total_dirty_money: closure.total_dirty_money,
                total_member_payout: closure.total_member_payout,
                total_household_payout: closure.total_household_payout,
                members_met_quota: closure.members_met_quota,
                config: closure.config,
            },
        };
        closures.insert(key, stored.clone());
        Ok((stored, settled))
    }
}

struct MockSettingsService {
    config: PayoutConfig,
}

#[async_trait]
impl SettingsServiceTrait for MockSettingsService {
    fn get_setting_value(&self, _: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set_setting_value(&self, _: &str, _: &str) -> Result<()> {
        Ok(())
    }

    fn payout_config(&self) -> Result<PayoutConfig> {
        Ok(self.config.clone())
    }

    async fn update_payout_config(&self, _: &PayoutConfig) -> Result<()> {
        Ok(())
    }
}

// ============== Helper Functions ==============

fn member(id: &str, name: &str, active: bool) -> Member {
    Member {
        id: id.to_string(),
        external_account_id: format!("ext-{}", id),
        display_name: name.to_string(),
        in_game_id: None,
        phone: None,
        recruiter: None,
        rank: None,
        active,
        registered_at: Utc::now().naive_utc(),
    }
}

fn week() -> FarmWeek {
    FarmWeek::new(31, 2025).unwrap()
}

struct Fixture {
    service: WeekClosureService,
    farm_repo: Arc<MockFarmRepository>,
    entries: SharedEntries,
}

fn make_fixture(members: Vec<Member>) -> Fixture {
    let entries: SharedEntries = Arc::new(RwLock::new(Vec::new()));
    let farm_repo = Arc::new(MockFarmRepository::new(entries.clone()));
    let closure_repo = Arc::new(MockClosureRepository::new(entries.clone()));
    let member_repo = Arc::new(MockMemberRepository {
        members: RwLock::new(members),
    });
    let settings = Arc::new(MockSettingsService {
        config: PayoutConfig::default(),
    });
    Fixture {
        service: WeekClosureService::new(member_repo, farm_repo.clone(), closure_repo, settings),
        farm_repo,
        entries,
    }
}

async fn record(
    fixture: &Fixture,
    member_id: &str,
    resource_type: ResourceType,
    quantity: i64,
) -> FarmEntry {
    fixture
        .farm_repo
        .insert_entry(NewFarmEntry {
            id: None,
            member_id: member_id.to_string(),
            resource_type,
            week: week(),
            quantity,
        })
        .await
        .unwrap()
}

// ============== Tests ==============

#[tokio::test]
async fn test_close_week_computes_payouts_and_settles() {
    let fixture = make_fixture(vec![member("m1", "Shinous", true)]);
    record(&fixture, "m1", ResourceType::DirtyMoney, 300_001).await;

    let report = fixture
        .service
        .close_week(week(), "manager-1", None)
        .await
        .unwrap();

    assert!(report.closed);
    assert_eq!(report.closed_by.as_deref(), Some("manager-1"));
    assert_eq!(report.total_members, 1);
    assert_eq!(report.total_dirty_money, 300_001);
    assert_eq!(report.members_met_quota, 1);
    assert_eq!(report.entries_settled, 1);

    let line = &report.members[0];
    assert_eq!(line.payout.over_quota, 100_001);
    assert_eq!(line.payout.laundered, 60_000);
    assert_eq!(line.payout.member_payout, 36_000);
    assert_eq!(line.payout.household_payout, 24_000);
    assert_eq!(report.total_member_payout, 36_000);
    assert_eq!(report.total_household_payout, 24_000);

    let entries = fixture.entries.read().unwrap();
    assert!(entries.iter().all(|e| e.settled && e.quantity == 0));
}

#[tokio::test]
async fn test_close_week_leaves_other_resource_types_alone() {
    let fixture = make_fixture(vec![member("m1", "Shinous", true)]);
    record(&fixture, "m1", ResourceType::DirtyMoney, 250_000).await;
    let battery = record(&fixture, "m1", ResourceType::Battery, 40).await;
    let board = record(&fixture, "m1", ResourceType::CircuitBoard, 12).await;

    let report = fixture
        .service
        .close_week(week(), "manager-1", None)
        .await
        .unwrap();
    assert_eq!(report.entries_settled, 1);

    let battery_after = fixture.farm_repo.get_entry(&battery.id).unwrap();
    let board_after = fixture.farm_repo.get_entry(&board.id).unwrap();
    assert!(!battery_after.settled);
    assert_eq!(battery_after.quantity, 40);
    assert!(!board_after.settled);
    assert_eq!(board_after.quantity, 12);

    // The non-settling resources still show up on the member line.
    let line = &report.members[0];
    assert_eq!(line.totals[&ResourceType::Battery], 40);
    assert_eq!(line.totals[&ResourceType::CircuitBoard], 12);
}

#[tokio::test]
async fn test_members_without_farm_appear_with_zero_totals() {
    let fixture = make_fixture(vec![
        member("m1", "Shinous", true),
        member("m2", "Vasco", true),
    ]);
    record(&fixture, "m1", ResourceType::DirtyMoney, 210_000).await;

    let report = fixture
        .service
        .close_week(week(), "manager-1", None)
        .await
        .unwrap();

    assert_eq!(report.total_members, 2);
    let idle = report
        .members
        .iter()
        .find(|m| m.member_id == "m2")
        .unwrap();
    assert_eq!(idle.payout.dirty_total, 0);
    assert!(!idle.payout.quota_met);
    assert_eq!(idle.totals[&ResourceType::DirtyMoney], 0);
}

#[tokio::test]
async fn test_inactive_members_excluded_from_report_but_entries_settle() {
    let fixture = make_fixture(vec![
        member("m1", "Shinous", true),
        member("m2", "Ghost", false),
    ]);
    record(&fixture, "m1", ResourceType::DirtyMoney, 100).await;
    let ghost_entry = record(&fixture, "m2", ResourceType::DirtyMoney, 999).await;

    let report = fixture
        .service
        .close_week(week(), "manager-1", None)
        .await
        .unwrap();

    assert_eq!(report.total_members, 1);
    assert!(report.members.iter().all(|m| m.member_id != "m2"));
    // The week is closed for everyone; the inactive member's ledger row is
    // settled too, it just earns nothing.
    assert!(fixture.farm_repo.get_entry(&ghost_entry.id).unwrap().settled);
    assert_eq!(report.entries_settled, 2);
}

#[tokio::test]
async fn test_re_closure_converges() {
    let fixture = make_fixture(vec![
        member("m1", "Shinous", true),
        member("m2", "Vasco", true),
    ]);
    record(&fixture, "m1", ResourceType::DirtyMoney, 150_000).await;
    record(&fixture, "m1", ResourceType::DirtyMoney, 150_001).await;
    record(&fixture, "m2", ResourceType::DirtyMoney, 180_000).await;

    let first = fixture
        .service
        .close_week(week(), "manager-1", None)
        .await
        .unwrap();
    assert_eq!(first.entries_settled, 3);

    let second = fixture
        .service
        .close_week(week(), "manager-2", None)
        .await
        .unwrap();

    // The second call settles nothing new and reproduces the same report.
    assert_eq!(second.entries_settled, 0);
    assert_eq!(second.closed_by.as_deref(), Some("manager-1"));
    assert_eq!(second.closed_at, first.closed_at);
    assert_eq!(second.members, first.members);
    assert_eq!(second.total_dirty_money, first.total_dirty_money);
    assert_eq!(second.total_member_payout, first.total_member_payout);
    assert_eq!(second.total_household_payout, first.total_household_payout);
    assert_eq!(second.members_met_quota, first.members_met_quota);
}

#[tokio::test]
async fn test_re_closure_uses_captured_config() {
    let fixture = make_fixture(vec![member("m1", "Shinous", true)]);
    record(&fixture, "m1", ResourceType::DirtyMoney, 300_001).await;

    let custom = PayoutConfig {
        quota: 100_000,
        ..PayoutConfig::default()
    };
    let first = fixture
        .service
        .close_week(week(), "manager-1", Some(custom.clone()))
        .await
        .unwrap();
    assert_eq!(first.config, custom);
    assert_eq!(first.members[0].payout.over_quota, 200_001);

    // Supplying a different config on re-closure is ignored; the captured
    // one wins.
    let other = PayoutConfig {
        quota: 50_000,
        ..PayoutConfig::default()
    };
    let second = fixture
        .service
        .close_week(week(), "manager-2", Some(other))
        .await
        .unwrap();
    assert_eq!(second.config, custom);
    assert_eq!(second.members[0].payout.over_quota, 200_001);
}

#[tokio::test]
async fn test_partially_settled_week_counts_each_entry_once() {
    let fixture = make_fixture(vec![member("m1", "Shinous", true)]);
    let first_entry = record(&fixture, "m1", ResourceType::DirtyMoney, 120_000).await;
    record(&fixture, "m1", ResourceType::DirtyMoney, 180_000).await;

    // One entry was already settled out of band (e.g. a crashed previous
    // attempt); closing must neither skip nor double-count it.
    fixture
        .farm_repo
        .settle_entry(&first_entry.id, "manager-0")
        .await
        .unwrap();

    let report = fixture
        .service
        .close_week(week(), "manager-1", None)
        .await
        .unwrap();

    assert_eq!(report.total_dirty_money, 300_000);
    assert_eq!(report.entries_settled, 1);
    let settled = fixture.farm_repo.get_entry(&first_entry.id).unwrap();
    assert_eq!(settled.quantity_original, Some(120_000));
    assert_eq!(settled.settled_by.as_deref(), Some("manager-0"));
}

#[tokio::test]
async fn test_invalid_config_rejected() {
    let fixture = make_fixture(vec![member("m1", "Shinous", true)]);

    let bad = PayoutConfig {
        laundering_fraction: dec!(1.5),
        ..PayoutConfig::default()
    };
    let result = fixture.service.close_week(week(), "manager-1", Some(bad)).await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn test_preview_settles_nothing() {
    let fixture = make_fixture(vec![member("m1", "Shinous", true)]);
    record(&fixture, "m1", ResourceType::DirtyMoney, 240_000).await;

    let preview = fixture.service.preview_week(week()).unwrap();
    assert!(!preview.closed);
    assert_eq!(preview.entries_settled, 0);
    assert_eq!(preview.total_dirty_money, 240_000);
    assert!(fixture
        .entries
        .read()
        .unwrap()
        .iter()
        .all(|e| !e.settled));

    // Previewing after a close reports the closed state with the same totals.
    fixture
        .service
        .close_week(week(), "manager-1", None)
        .await
        .unwrap();
    let after = fixture.service.preview_week(week()).unwrap();
    assert!(after.closed);
    assert_eq!(after.total_dirty_money, 240_000);
    assert_eq!(after.entries_settled, 0);
}
