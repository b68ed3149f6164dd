//! Members module - domain models, services, and traits.

mod members_model;
mod members_service;
mod members_traits;

// Re-export the public interface
pub use members_model::{Member, NewMember};
pub use members_service::MemberService;
pub use members_traits::{MemberRepositoryTrait, MemberServiceTrait};
