//! Domain model for groups and memberships.
//!
//! Models the group aggregate, the membership relation with its closed
//! status vocabulary, and the pure permission classification used by every
//! service in the crate. Infrastructure concerns stay outside this boundary.

mod error;
mod group;
mod ids;
mod membership;
mod slug;
mod user;

pub use error::{GroupDomainError, ParseMembershipStatusError};
pub use group::{Group, PersistedGroupData};
pub use ids::{GroupId, MembershipId, UserId};
pub use membership::{Membership, MembershipLevel, MembershipStatus, PersistedMembershipData};
pub use slug::Slug;
pub use user::UserRef;
