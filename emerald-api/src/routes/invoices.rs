//! Invoice endpoints
//!
//! - `GET /api/invoices?userId=&status=` - a customer's invoices with items
//! - `POST /api/invoices` - issue an invoice
//! - `GET /api/invoices/:id` - one invoice with items

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath, ApiQuery},
    routes::{list, non_blank, ok, DataResponse, ListResponse},
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDate;
use emerald_shared::{
    billing::InvoicePeriod,
    models::{
        activity_log::{ActivityLog, NewActivity},
        invoice::{CreateInvoice, Invoice, InvoiceDetail, NewInvoiceItem},
        types::InvoiceStatus,
    },
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ListInvoicesQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<Uuid>,

    /// One of draft, pending, paid, overdue, cancelled
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InvoiceItemRequest {
    #[serde(default)]
    pub description: String,
    pub quantity: i32,
    pub unit_price: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    #[serde(rename = "userId")]
    pub user_id: Option<Uuid>,

    #[serde(rename = "projectId")]
    pub project_id: Option<Uuid>,

    pub items: Option<Vec<InvoiceItemRequest>>,
    pub invoice_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// `201` body of an issued invoice
#[derive(Debug, Serialize)]
pub struct CreatedInvoiceResponse {
    pub success: bool,
    pub data: InvoiceDetail,

    #[serde(rename = "invoiceNumber")]
    pub invoice_number: String,
}

/// List a customer's invoices
///
/// Each entry carries its `invoice_items` and the linked project's name and
/// type under `projects`. Latest `invoice_date` first.
///
/// # Errors
///
/// - `400 Bad Request`: `userId` missing, unknown `status`
pub async fn list_invoices(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListInvoicesQuery>,
) -> ApiResult<Json<ListResponse<InvoiceDetail>>> {
    let user_id = query
        .user_id
        .ok_or_else(|| ApiError::BadRequest("User ID is required".to_string()))?;
    let status = non_blank(&query.status)
        .map(str::parse::<InvoiceStatus>)
        .transpose()?;

    let invoices = Invoice::list_by_user(&state.db, user_id, status).await?;
    Ok(list(invoices))
}

/// Issue an invoice
///
/// # Endpoint
///
/// ```text
/// POST /api/invoices
/// Content-Type: application/json
///
/// {
///   "userId": "…",
///   "projectId": "…",
///   "items": [
///     { "description": "Kasir Digital", "quantity": 1, "unit_price": 2000000 },
///     { "description": "Training", "quantity": 2, "unit_price": 500000 }
///   ],
///   "due_date": "2026-04-15"
/// }
/// ```
///
/// # Response
///
/// ```json
/// { "success": true, "data": { "invoice_number": "INV-2603-00004", "subtotal": 3000000, "tax": 300000, "total_amount": 3300000, ... }, "invoiceNumber": "INV-2603-00004" }
/// ```
///
/// The number is allocated from the current UTC month; totals are computed
/// server-side with 10% tax. Nothing is stored when any step fails.
///
/// # Errors
///
/// - `400 Bad Request`: `userId` missing, no items, quantity below 1,
///   negative unit price, amounts too large
pub async fn create_invoice(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateInvoiceRequest>,
) -> ApiResult<(StatusCode, Json<CreatedInvoiceResponse>)> {
    let (Some(user_id), Some(items)) = (req.user_id, req.items.filter(|items| !items.is_empty()))
    else {
        return Err(ApiError::BadRequest(
            "Missing required fields or empty items".to_string(),
        ));
    };

    let items = items
        .into_iter()
        .map(|item| NewInvoiceItem {
            description: item.description,
            quantity: item.quantity,
            unit_price: item.unit_price,
        })
        .collect();

    let detail = Invoice::create(
        &state.db,
        CreateInvoice {
            user_id,
            project_id: req.project_id,
            items,
            invoice_date: req.invoice_date,
            due_date: req.due_date,
            description: req.description,
        },
        InvoicePeriod::current(),
    )
    .await?;

    let invoice_number = detail.invoice.invoice_number.clone();
    info!(%user_id, %invoice_number, total = detail.invoice.total_amount, "Invoice issued");

    ActivityLog::record_best_effort(
        &state.db,
        NewActivity {
            user_id: Some(user_id),
            action: "create",
            resource_type: "invoice",
            resource_id: Some(detail.invoice.id),
            changes: json!({
                "invoice_number": invoice_number,
                "total_amount": detail.invoice.total_amount,
            }),
        },
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(CreatedInvoiceResponse {
            success: true,
            data: detail,
            invoice_number,
        }),
    ))
}

/// Get one invoice with items and project
///
/// # Errors
///
/// - `404 Not Found`: unknown or deleted invoice
pub async fn get_invoice(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<DataResponse<InvoiceDetail>>> {
    let detail = Invoice::find_detail(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invoice not found".to_string()))?;

    Ok(ok(detail))
}
