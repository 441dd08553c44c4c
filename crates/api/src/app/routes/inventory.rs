use axum::{
    Extension, Json, Router,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::json;

use larder_auth::Permission;
use larder_inventory::{
    classify_risk, compute_order_qty, compute_par_recommendations, compute_usage_analytics,
    summarize_locations,
};

use crate::app::{dto, errors};
use crate::authz;
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/risk", post(classify))
        .route("/order-qty", post(order_quantities))
        .route("/usage", post(usage))
        .route("/par-recommendations", post(par_recommendations))
        .route("/locations/summary", post(location_summary))
}

fn check_batch(len: usize) -> Result<(), Response> {
    if len > dto::MAX_BATCH {
        return Err(errors::bad_request(format!(
            "too many rows ({len}); at most {} per request",
            dto::MAX_BATCH
        )));
    }
    Ok(())
}

pub async fn classify(
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<dto::StockLevelsRequest>, JsonRejection>,
) -> Response {
    if let Err(resp) = authz::require(&tenant, &principal, &Permission::INVENTORY_READ) {
        return resp;
    }
    let body = match errors::json_body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    if let Err(resp) = check_batch(body.entries.len()) {
        return resp;
    }

    let results: Vec<_> = body
        .entries
        .iter()
        .map(|e| {
            let risk = classify_risk(e.current_stock, e.par_level);
            json!({
                "item_id": e.item_id,
                "risk": risk,
                "label": risk.label(),
            })
        })
        .collect();

    (StatusCode::OK, Json(json!({ "results": results }))).into_response()
}

pub async fn order_quantities(
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<dto::StockLevelsRequest>, JsonRejection>,
) -> Response {
    if let Err(resp) = authz::require(&tenant, &principal, &Permission::INVENTORY_READ) {
        return resp;
    }
    let body = match errors::json_body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    if let Err(resp) = check_batch(body.entries.len()) {
        return resp;
    }

    let results: Vec<_> = body
        .entries
        .iter()
        .map(|e| {
            let unit = e.unit.as_deref().unwrap_or_default();
            json!({
                "item_id": e.item_id,
                "order_qty": compute_order_qty(e.current_stock, e.par_level, unit),
            })
        })
        .collect();

    (StatusCode::OK, Json(json!({ "results": results }))).into_response()
}

pub async fn usage(
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<dto::UsageRequest>, JsonRejection>,
) -> Response {
    if let Err(resp) = authz::require(&tenant, &principal, &Permission::INVENTORY_ANALYZE) {
        return resp;
    }
    let body = match errors::json_body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    if let Err(resp) = check_batch(body.items.len() + body.sessions.len() + body.purchases.len()) {
        return resp;
    }

    let usage = compute_usage_analytics(&body.items, &body.sessions, &body.purchases, body.location_id);
    tracing::debug!(tenant_id = %tenant.tenant_id(), items = usage.len(), "usage analytics computed");

    (StatusCode::OK, Json(json!({ "usage": usage }))).into_response()
}

pub async fn par_recommendations(
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<dto::ParRecommendationsRequest>, JsonRejection>,
) -> Response {
    if let Err(resp) = authz::require(&tenant, &principal, &Permission::INVENTORY_ANALYZE) {
        return resp;
    }
    let body = match errors::json_body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    if let Err(resp) = check_batch(body.items.len() + body.sessions.len() + body.purchases.len()) {
        return resp;
    }

    let items = match &body.par_guide {
        Some(guide) => {
            if let Err(e) = guide.validate() {
                return errors::domain_error_to_response(e);
            }
            guide.apply_to(&body.items)
        }
        None => body.items,
    };

    let usage = compute_usage_analytics(&items, &body.sessions, &body.purchases, body.location_id);
    let recommendations =
        compute_par_recommendations(&items, &body.sessions, &usage, body.location_id);
    tracing::debug!(
        tenant_id = %tenant.tenant_id(),
        recommendations = recommendations.len(),
        "par recommendations computed"
    );

    (
        StatusCode::OK,
        Json(json!({
            "usage": usage,
            "recommendations": recommendations,
        })),
    )
        .into_response()
}

pub async fn location_summary(
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<dto::LocationSummaryRequest>, JsonRejection>,
) -> Response {
    if let Err(resp) = authz::require(&tenant, &principal, &Permission::INVENTORY_ANALYZE) {
        return resp;
    }
    let body = match errors::json_body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    if let Err(resp) = check_batch(body.items.len() + body.sessions.len()) {
        return resp;
    }

    let locations = summarize_locations(&body.items, &body.sessions);
    (StatusCode::OK, Json(json!({ "locations": locations }))).into_response()
}
