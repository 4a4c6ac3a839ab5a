//! Roles issued by the identity provider and the caller identity passed to
//! every workflow operation.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::DbId;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_REVIEWER: &str = "reviewer";
pub const ROLE_EDITOR: &str = "editor";
pub const ROLE_PROVIDER: &str = "provider";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Reviewer,
    Editor,
    Provider,
}

impl Role {
    /// Parse from the identity provider's role claim.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            ROLE_ADMIN => Some(Self::Admin),
            ROLE_REVIEWER => Some(Self::Reviewer),
            ROLE_EDITOR => Some(Self::Editor),
            ROLE_PROVIDER => Some(Self::Provider),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Admin => ROLE_ADMIN,
            Self::Reviewer => ROLE_REVIEWER,
            Self::Editor => ROLE_EDITOR,
            Self::Provider => ROLE_PROVIDER,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Roles that may mutate content fields.
pub const EDIT_ROLES: &[Role] = &[Role::Admin, Role::Editor, Role::Provider];

/// Immutable set of roles held by a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSet(BTreeSet<Role>);

impl RoleSet {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        Self(roles.into_iter().collect())
    }

    /// Build from raw claim strings, dropping names this service does not know.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        Self(
            names
                .iter()
                .filter_map(|n| Role::from_name(n.as_ref()))
                .collect(),
        )
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    pub fn intersects(&self, roles: &[Role]) -> bool {
        roles.iter().any(|r| self.0.contains(r))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }
}

/// The authenticated caller, as returned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: DbId,
    pub roles: RoleSet,
}

impl Caller {
    pub fn new(id: DbId, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            id,
            roles: RoleSet::new(roles),
        }
    }

    pub fn has_any(&self, roles: &[Role]) -> bool {
        self.roles.intersects(roles)
    }
}
