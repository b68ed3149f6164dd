use log::debug;
use std::sync::Arc;

use super::members_model::{Member, NewMember};
use super::members_traits::{MemberRepositoryTrait, MemberServiceTrait};
use crate::errors::Result;

/// Service for managing the member registry.
pub struct MemberService {
    repository: Arc<dyn MemberRepositoryTrait>,
}

impl MemberService {
    /// Creates a new MemberService instance
    pub fn new(repository: Arc<dyn MemberRepositoryTrait>) -> Self {
        MemberService { repository }
    }
}

#[async_trait::async_trait]
impl MemberServiceTrait for MemberService {
    /// Registers a new member. The external account id must be unique; the
    /// storage layer surfaces duplicates as a unique-constraint violation.
    async fn register_member(&self, new_member: NewMember) -> Result<Member> {
        new_member.validate()?;
        debug!(
            "Registering member '{}' for account {}",
            new_member.display_name, new_member.external_account_id
        );
        self.repository.create_member(new_member).await
    }

    fn get_member(&self, member_id: &str) -> Result<Member> {
        self.repository.get_member(member_id)
    }

    fn get_by_external_account(&self, external_account_id: &str) -> Result<Member> {
        self.repository.get_by_external_account(external_account_id)
    }

    fn list_members(&self, active_filter: Option<bool>) -> Result<Vec<Member>> {
        self.repository.list_members(active_filter)
    }

    fn list_active_members(&self) -> Result<Vec<Member>> {
        self.list_members(Some(true))
    }

    /// Soft-deactivates a member. Ledger rows referencing the member are
    /// left untouched.
    async fn deactivate_member(&self, member_id: &str) -> Result<Member> {
        self.repository.set_active(member_id, false).await
    }

    async fn reactivate_member(&self, member_id: &str) -> Result<Member> {
        self.repository.set_active(member_id, true).await
    }
}
