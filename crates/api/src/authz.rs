//! API-side permission guard.
//!
//! Handlers call [`require`] before doing any work; domain crates stay
//! auth-agnostic.

use axum::http::StatusCode;
use axum::response::Response;

use larder_auth::{Permission, Principal, TenantMembership, authorize};

use crate::app::errors::json_error;
use crate::context::{PrincipalContext, TenantContext};

/// Check `permission` for the current request, or build the 403 response.
pub fn require(
    tenant: &TenantContext,
    principal: &PrincipalContext,
    permission: &Permission,
) -> Result<(), Response> {
    let principal = Principal {
        user_id: principal.user_id(),
        active_tenant_id: tenant.tenant_id(),
        membership: TenantMembership::from_roles(tenant.tenant_id(), principal.roles().to_vec()),
    };

    authorize(&principal, permission).map_err(|e| {
        tracing::info!(user_id = %principal.user_id, permission = %permission, "permission denied");
        json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string())
    })
}
