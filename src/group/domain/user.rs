//! Soft references to attributed users.

use super::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Well-known identifier substituted when an attributed user record is gone.
const SENTINEL_USER: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_dead_0001);

/// Nullable reference to the user a record is attributed to.
///
/// Attribution fields (creator, completer, author) must survive deletion of
/// the referenced user account. Rather than cascading or erroring, the
/// reference is nulled on user deletion and [`UserRef::resolve`] falls back
/// to a well-known sentinel identity for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRef(Option<UserId>);

impl UserRef {
    /// Creates a reference to a live user.
    #[must_use]
    pub const fn to_user(user: UserId) -> Self {
        Self(Some(user))
    }

    /// Creates a detached reference whose user record no longer exists.
    #[must_use]
    pub const fn detached() -> Self {
        Self(None)
    }

    /// Returns the referenced user, if still attached.
    #[must_use]
    pub const fn user_id(self) -> Option<UserId> {
        self.0
    }

    /// Resolves to the referenced user or the sentinel placeholder.
    #[must_use]
    pub const fn resolve(self) -> UserId {
        match self.0 {
            Some(user) => user,
            None => UserId::from_uuid(SENTINEL_USER),
        }
    }

    /// Returns `true` when the reference resolves to the sentinel.
    #[must_use]
    pub const fn is_detached(self) -> bool {
        self.0.is_none()
    }

    /// Detaches the reference, to be applied when the user is deleted.
    #[must_use]
    pub const fn detach(self) -> Self {
        Self(None)
    }
}

impl From<UserId> for UserRef {
    fn from(user: UserId) -> Self {
        Self::to_user(user)
    }
}
