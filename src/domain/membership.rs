//! Memberships: the role a profile holds within an organization.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::profile::ProfileSummary;
use crate::error::AppError;

/// Role of a profile inside an organization.
///
/// Stored as the strings `"member"` and `"admin"`; any other value is
/// rejected both here and by the table's check constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular member. May create, update and delete the organization's events.
    #[default]
    Member,
    /// Administrator. Everything a member may do, plus managing members.
    Admin,
}

impl Role {
    /// Column value for this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
        }
    }

    /// Admin implies membership, so every role grants it.
    #[must_use]
    pub const fn grants_membership(self) -> bool {
        matches!(self, Self::Member | Self::Admin)
    }

    /// Whether this role may manage the organization's members.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Self::Member),
            "admin" => Ok(Self::Admin),
            other => Err(AppError::InvalidRequest(format!(
                "invalid role: {other} (expected member or admin)"
            ))),
        }
    }
}

/// A row of the `profiles_organizations` join table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Membership {
    /// Member profile.
    pub profile_id: Uuid,
    /// Organization the profile belongs to.
    pub organization_id: Uuid,
    /// Role within the organization.
    pub role: Role,
}

/// A member row projected for the organization details endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MemberDetails {
    /// Role within the organization.
    pub role: Role,
    /// Member profile display fields.
    pub profile: ProfileSummary,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_only_known_values() {
        assert_eq!("member".parse::<Role>().ok(), Some(Role::Member));
        assert_eq!("admin".parse::<Role>().ok(), Some(Role::Admin));
        let Err(AppError::InvalidRequest(msg)) = "owner".parse::<Role>() else {
            panic!("owner must be rejected");
        };
        assert!(msg.contains("owner"));
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn admin_implies_membership() {
        assert!(Role::Admin.grants_membership());
        assert!(Role::Member.grants_membership());
        assert!(Role::Admin.is_admin());
        assert!(!Role::Member.is_admin());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(Role::Admin).ok(),
            Some(serde_json::json!("admin"))
        );
        assert_eq!(Role::default(), Role::Member);
    }
}
