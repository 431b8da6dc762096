//! Membership relation and permission classification.

use super::{GroupId, MembershipId, ParseMembershipStatusError, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Status of a user's membership in a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    /// Membership with administrative rights.
    Admin,
    /// Join request awaiting an admin's decision.
    Pending,
    /// Approved, active membership.
    Current,
    /// Join request an admin chose to ignore.
    Ignored,
}

impl MembershipStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Pending => "pending",
            Self::Current => "current",
            Self::Ignored => "ignored",
        }
    }
}

impl TryFrom<&str> for MembershipStatus {
    type Error = ParseMembershipStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "admin" => Ok(Self::Admin),
            "pending" => Ok(Self::Pending),
            "current" => Ok(Self::Current),
            "ignored" => Ok(Self::Ignored),
            _ => Err(ParseMembershipStatusError(value.to_owned())),
        }
    }
}

/// Closed classification of a user's standing in a group.
///
/// Every permission rule in the crate is phrased against this enumeration
/// rather than against raw membership statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipLevel {
    /// No usable membership: no row, or a pending/ignored request.
    None,
    /// Active member without administrative rights.
    Member,
    /// Active member with administrative rights.
    Admin,
}

impl MembershipLevel {
    /// Classifies an optional membership row into a permission level.
    #[must_use]
    pub fn classify(membership: Option<&Membership>) -> Self {
        membership.map_or(Self::None, |row| match row.status() {
            MembershipStatus::Admin => Self::Admin,
            MembershipStatus::Current => Self::Member,
            MembershipStatus::Pending | MembershipStatus::Ignored => Self::None,
        })
    }

    /// Returns `true` for `Member` and `Admin`.
    #[must_use]
    pub const fn is_member(self) -> bool {
        matches!(self, Self::Member | Self::Admin)
    }

    /// Returns `true` for `Admin` only.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Membership relation between one user and one group.
///
/// Exactly one row exists per (user, group) pair; uniqueness is enforced by
/// the repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    id: MembershipId,
    user: UserId,
    group: GroupId,
    status: MembershipStatus,
    subscribed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted membership row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedMembershipData {
    /// Persisted membership identifier.
    pub id: MembershipId,
    /// Persisted user identifier.
    pub user: UserId,
    /// Persisted group identifier.
    pub group: GroupId,
    /// Persisted status.
    pub status: MembershipStatus,
    /// Persisted email subscription flag.
    pub subscribed: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last-change timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Membership {
    /// Creates a new pending join request.
    #[must_use]
    pub fn request(user: UserId, group: GroupId, clock: &impl Clock) -> Self {
        Self::with_status(user, group, MembershipStatus::Pending, clock)
    }

    /// Creates a membership with an explicit status.
    ///
    /// Used when seeding a group with its founding admin.
    #[must_use]
    pub fn with_status(
        user: UserId,
        group: GroupId,
        status: MembershipStatus,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: MembershipId::new(),
            user,
            group,
            status,
            subscribed: false,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a membership from persisted storage.
    #[must_use]
    pub const fn from_persisted(data: PersistedMembershipData) -> Self {
        Self {
            id: data.id,
            user: data.user,
            group: data.group,
            status: data.status,
            subscribed: data.subscribed,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the membership identifier.
    #[must_use]
    pub const fn id(&self) -> MembershipId {
        self.id
    }

    /// Returns the member's user identifier.
    #[must_use]
    pub const fn user(&self) -> UserId {
        self.user
    }

    /// Returns the group identifier.
    #[must_use]
    pub const fn group(&self) -> GroupId {
        self.group
    }

    /// Returns the membership status.
    #[must_use]
    pub const fn status(&self) -> MembershipStatus {
        self.status
    }

    /// Returns the email subscription flag.
    #[must_use]
    pub const fn subscribed(&self) -> bool {
        self.subscribed
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last-change timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Sets the membership status.
    pub fn set_status(&mut self, status: MembershipStatus, clock: &impl Clock) {
        self.status = status;
        self.touch(clock);
    }

    /// Sets the email subscription flag.
    pub fn set_subscribed(&mut self, subscribed: bool, clock: &impl Clock) {
        self.subscribed = subscribed;
        self.touch(clock);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
