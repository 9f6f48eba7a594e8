//! Account abstraction shared by residents and staff.
//!
//! Every principal lives in the single `accounts` table and is resolved through
//! one lookup path. The kind is a tagged union so callers match on it instead of
//! probing two tables.

use serde::{Deserialize, Serialize};

use crate::roles::{ROLE_BUILDING_ADMIN, ROLE_RESIDENT, ROLE_SUPER_ADMIN};
use crate::types::DbId;

/// Staff privilege level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// Administers a single building.
    BuildingAdmin,
    /// Administers every building.
    SuperAdmin,
}

/// What kind of account a principal is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccountKind {
    Resident { building_id: DbId },
    Staff {
        role: StaffRole,
        building_id: Option<DbId>,
    },
}

impl AccountKind {
    /// Rebuild the kind from the persisted `role` / `building_id` pair.
    ///
    /// Returns `None` for combinations the schema forbids (a resident without a
    /// building, a building admin without a building, an unknown role).
    pub fn from_parts(role: &str, building_id: Option<DbId>) -> Option<Self> {
        match (role, building_id) {
            (ROLE_RESIDENT, Some(building_id)) => Some(Self::Resident { building_id }),
            (ROLE_BUILDING_ADMIN, Some(id)) => Some(Self::Staff {
                role: StaffRole::BuildingAdmin,
                building_id: Some(id),
            }),
            (ROLE_SUPER_ADMIN, building_id) => Some(Self::Staff {
                role: StaffRole::SuperAdmin,
                building_id,
            }),
            _ => None,
        }
    }

    /// The role name as stored in the database and carried in tokens.
    pub fn role_name(&self) -> &'static str {
        match self {
            Self::Resident { .. } => ROLE_RESIDENT,
            Self::Staff {
                role: StaffRole::BuildingAdmin,
                ..
            } => ROLE_BUILDING_ADMIN,
            Self::Staff {
                role: StaffRole::SuperAdmin,
                ..
            } => ROLE_SUPER_ADMIN,
        }
    }
}

/// An authenticated caller: account id plus kind and building scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub account_id: DbId,
    pub kind: AccountKind,
}

impl Principal {
    /// The building this principal is confined to, if any.
    ///
    /// Super admins are unscoped even when a home building is recorded.
    pub fn building_scope(&self) -> Option<DbId> {
        match self.kind {
            AccountKind::Resident { building_id } => Some(building_id),
            AccountKind::Staff {
                role: StaffRole::BuildingAdmin,
                building_id,
            } => building_id,
            AccountKind::Staff {
                role: StaffRole::SuperAdmin,
                ..
            } => None,
        }
    }

    pub fn is_resident(&self) -> bool {
        matches!(self.kind, AccountKind::Resident { .. })
    }

    /// Whether this principal may administer resources in `building_id`.
    pub fn administers(&self, building_id: DbId) -> bool {
        match self.kind {
            AccountKind::Resident { .. } => false,
            AccountKind::Staff {
                role: StaffRole::SuperAdmin,
                ..
            } => true,
            AccountKind::Staff {
                role: StaffRole::BuildingAdmin,
                building_id: scope,
            } => scope == Some(building_id),
        }
    }
}
