//! Application services for groups and memberships.

mod gate;
mod groups;
mod membership;

pub use gate::PermissionGate;
pub use groups::{CreateGroupRequest, GroupService, GroupServiceError};
pub use membership::{
    JoinOutcome, LeaveOutcome, MembershipService, MembershipServiceError, RemoveOutcome,
};
