use async_trait::async_trait;

use crate::errors::Result;
use crate::members::members_model::{Member, NewMember};

/// Trait for member repository operations
#[async_trait]
pub trait MemberRepositoryTrait: Send + Sync {
    fn get_member(&self, member_id: &str) -> Result<Member>;
    fn get_by_external_account(&self, external_account_id: &str) -> Result<Member>;
    fn list_members(&self, active_filter: Option<bool>) -> Result<Vec<Member>>;
    async fn create_member(&self, new_member: NewMember) -> Result<Member>;
    async fn set_active(&self, member_id: &str, active: bool) -> Result<Member>;
}

/// Trait for member service operations
#[async_trait]
pub trait MemberServiceTrait: Send + Sync {
    async fn register_member(&self, new_member: NewMember) -> Result<Member>;
    fn get_member(&self, member_id: &str) -> Result<Member>;
    fn get_by_external_account(&self, external_account_id: &str) -> Result<Member>;
    fn list_members(&self, active_filter: Option<bool>) -> Result<Vec<Member>>;
    fn list_active_members(&self) -> Result<Vec<Member>>;
    async fn deactivate_member(&self, member_id: &str) -> Result<Member>;
    async fn reactivate_member(&self, member_id: &str) -> Result<Member>;
}
