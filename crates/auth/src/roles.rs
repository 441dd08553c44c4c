use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::Permission;

/// Role identifier used for RBAC.
///
/// Roles travel as opaque strings in tokens. The restaurant product knows
/// three: `owner`, `manager` and `staff`; anything else grants nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const OWNER: Role = Role(Cow::Borrowed("owner"));
    pub const MANAGER: Role = Role(Cow::Borrowed("manager"));
    pub const STAFF: Role = Role(Cow::Borrowed("staff"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

const OWNER_PERMISSIONS: &[Permission] = &[Permission::WILDCARD];

const MANAGER_PERMISSIONS: &[Permission] = &[
    Permission::INVENTORY_READ,
    Permission::INVENTORY_ANALYZE,
    Permission::SMART_ORDERS_READ,
    Permission::SMART_ORDERS_WRITE,
    Permission::INVOICES_PARSE,
    Permission::VENDORS_IMPORT,
    Permission::EMAIL_SEND,
];

const STAFF_PERMISSIONS: &[Permission] = &[Permission::INVENTORY_READ, Permission::INVENTORY_ANALYZE];

/// Effective permissions for a set of roles (deduplicated, stable order).
pub fn permissions_for_roles(roles: &[Role]) -> Vec<Permission> {
    let mut out: Vec<Permission> = Vec::new();
    for role in roles {
        let granted = match role.as_str() {
            "owner" => OWNER_PERMISSIONS,
            "manager" => MANAGER_PERMISSIONS,
            "staff" => STAFF_PERMISSIONS,
            _ => &[],
        };
        for p in granted {
            if !out.contains(p) {
                out.push(p.clone());
            }
        }
    }
    out
}
