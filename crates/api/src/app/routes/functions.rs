//! Integration functions: invoice parsing, email, vendor import.

use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::json;

use larder_auth::Permission;
use larder_core::SmartOrderRunId;
use larder_mailer::{EmailMessage, templates};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/parse-invoice", post(parse_invoice))
        .route("/send-email", post(send_email))
        .route("/vendor-invoices", post(list_vendor_invoices))
        .route("/vendor-invoices/detail", post(vendor_invoice_detail))
}

pub async fn parse_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<dto::ParseInvoiceRequest>, JsonRejection>,
) -> Response {
    if let Err(resp) = authz::require(&tenant, &principal, &Permission::INVOICES_PARSE) {
        return resp;
    }
    let body = match errors::json_body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    let Some(parser) = services.invoice_parser() else {
        return errors::not_configured("invoice parsing");
    };

    match parser
        .parse(&body.invoice_text, body.vendor_hint.as_deref())
        .await
    {
        Ok(invoice) => {
            tracing::info!(
                tenant_id = %tenant.tenant_id(),
                line_items = invoice.line_items.len(),
                "invoice parsed"
            );
            let computed_total = invoice.computed_total();
            (
                StatusCode::OK,
                Json(json!({
                    "invoice": invoice,
                    "computed_total": computed_total,
                })),
            )
                .into_response()
        }
        Err(e) => errors::ai_error_to_response(e),
    }
}

pub async fn send_email(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<dto::SendEmailRequest>, JsonRejection>,
) -> Response {
    if let Err(resp) = authz::require(&tenant, &principal, &Permission::EMAIL_SEND) {
        return resp;
    }
    let body = match errors::json_body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    let Some((sender, from)) = services.email() else {
        return errors::not_configured("email delivery");
    };

    let message = match body {
        dto::SendEmailRequest::Raw {
            to,
            subject,
            html,
            text,
        } => EmailMessage {
            from: from.to_string(),
            to,
            subject,
            html,
            text,
        },
        dto::SendEmailRequest::Invitation {
            to,
            restaurant_name,
            role,
            invite_url,
        } => {
            let rendered = templates::invitation(&restaurant_name, &role, &invite_url);
            EmailMessage {
                from: from.to_string(),
                to: vec![to],
                subject: rendered.subject,
                html: Some(rendered.html),
                text: Some(rendered.text),
            }
        }
        dto::SendEmailRequest::SmartOrder {
            to,
            restaurant_name,
            vendor,
            run_id,
            notes,
        } => {
            let run_id: SmartOrderRunId = match run_id.parse() {
                Ok(v) => v,
                Err(e) => return errors::domain_error_to_response(e),
            };
            let run = match services.smart_order(tenant.tenant_id(), &run_id) {
                Ok(run) => run,
                Err(e) => return errors::domain_error_to_response(e),
            };
            let lines: Vec<_> = run.lines_for_vendor(&vendor).into_iter().cloned().collect();
            if lines.is_empty() {
                return errors::bad_request(format!("run has no lines for vendor {vendor}"));
            }
            let rendered = templates::smart_order(&restaurant_name, &vendor, &lines, notes.as_deref());
            EmailMessage {
                from: from.to_string(),
                to: vec![to],
                subject: rendered.subject,
                html: Some(rendered.html),
                text: Some(rendered.text),
            }
        }
    };

    if let Err(e) = message.validate() {
        return errors::mailer_error_to_response(e);
    }

    match sender.send(&message).await {
        Ok(id) => {
            tracing::info!(tenant_id = %tenant.tenant_id(), recipients = message.to.len(), "email sent");
            (StatusCode::OK, Json(json!({ "id": id }))).into_response()
        }
        Err(e) => errors::mailer_error_to_response(e),
    }
}

pub async fn list_vendor_invoices(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<dto::VendorInvoicesRequest>, JsonRejection>,
) -> Response {
    if let Err(resp) = authz::require(&tenant, &principal, &Permission::VENDORS_IMPORT) {
        return resp;
    }
    let body = match errors::json_body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    match services.vendors().list_invoices(&body.vendor, body.since) {
        Ok(invoices) => {
            tracing::debug!(vendor = %body.vendor, count = invoices.len(), "vendor invoices listed");
            (
                StatusCode::OK,
                Json(json!({
                    "vendor": body.vendor,
                    "invoices": invoices,
                })),
            )
                .into_response()
        }
        Err(e) => errors::vendor_error_to_response(e),
    }
}

pub async fn vendor_invoice_detail(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<dto::VendorInvoiceDetailRequest>, JsonRejection>,
) -> Response {
    if let Err(resp) = authz::require(&tenant, &principal, &Permission::VENDORS_IMPORT) {
        return resp;
    }
    let body = match errors::json_body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    match services.vendors().invoice_detail(&body.vendor, &body.invoice_id) {
        Ok(invoice) => {
            let total = invoice.total();
            (
                StatusCode::OK,
                Json(json!({
                    "invoice": invoice,
                    "total": total,
                })),
            )
                .into_response()
        }
        Err(e) => errors::vendor_error_to_response(e),
    }
}
