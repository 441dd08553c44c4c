use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::{Path, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use serde_json::json;

use larder_auth::Permission;
use larder_core::SmartOrderRunId;
use larder_inventory::{
    RiskLevel, SmartOrderRun, build_smart_order, latest_stock, normalize_list_name,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_runs).post(create_run))
        .route("/:id", get(get_run))
}

pub fn run_to_json(run: &SmartOrderRun) -> serde_json::Value {
    json!({
        "id": run.id,
        "location_id": run.location_id,
        "list_name": run.list_name,
        "created_by": run.created_by,
        "created_at": run.created_at,
        "total_estimated_cost": run.total_estimated_cost(),
        "critical_count": run.count_by_risk(RiskLevel::Red),
        "low_count": run.count_by_risk(RiskLevel::Yellow),
        "lines": run.lines,
    })
}

pub async fn create_run(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<dto::CreateSmartOrderRequest>, JsonRejection>,
) -> Response {
    if let Err(resp) = authz::require(&tenant, &principal, &Permission::SMART_ORDERS_WRITE) {
        return resp;
    }
    let body = match errors::json_body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    let list_name = match normalize_list_name(&body.list_name) {
        Ok(name) => name,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if body.items.len() + body.sessions.len() > dto::MAX_BATCH {
        return errors::bad_request("too many rows in one smart order");
    }

    let items = match &body.par_guide {
        Some(guide) => {
            if let Err(e) = guide.validate() {
                return errors::domain_error_to_response(e);
            }
            guide.apply_to(&body.items)
        }
        None => body.items.clone(),
    };

    let mut stock = latest_stock(&body.sessions, body.location_id);
    stock.extend(body.stock.iter().map(|(k, v)| (*k, *v)));

    let run = SmartOrderRun {
        id: SmartOrderRunId::new(),
        tenant_id: tenant.tenant_id(),
        location_id: body.location_id,
        list_name,
        created_by: principal.user_id(),
        created_at: Utc::now(),
        lines: build_smart_order(&items, &stock),
    };

    tracing::info!(
        tenant_id = %tenant.tenant_id(),
        run_id = %run.id,
        lines = run.lines.len(),
        "smart order run saved"
    );

    let response = run_to_json(&run);
    services.save_smart_order(run);

    (StatusCode::CREATED, Json(response)).into_response()
}

pub async fn list_runs(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    if let Err(resp) = authz::require(&tenant, &principal, &Permission::SMART_ORDERS_READ) {
        return resp;
    }

    let runs: Vec<_> = services
        .smart_orders(tenant.tenant_id())
        .iter()
        .map(run_to_json)
        .collect();

    (StatusCode::OK, Json(json!({ "runs": runs }))).into_response()
}

pub async fn get_run(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    if let Err(resp) = authz::require(&tenant, &principal, &Permission::SMART_ORDERS_READ) {
        return resp;
    }

    let id: SmartOrderRunId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.smart_order(tenant.tenant_id(), &id) {
        Ok(run) => (StatusCode::OK, Json(run_to_json(&run))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
