//! SQLite storage implementation for members.

mod model;
mod repository;

pub use model::{MemberDB, NewMemberDB};
pub use repository::MemberRepository;

// Re-export trait from core for convenience
pub use faction_core::members::MemberRepositoryTrait;
