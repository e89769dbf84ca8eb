//! Invoices and invoice line items
//!
//! Creating an invoice writes three things in one transaction:
//!
//! 1. the per-month counter in `invoice_sequences` (allocates `NNNNN`)
//! 2. the invoice header, in `draft` state
//! 3. the line items, with `order_index` equal to their position
//!
//! Either all of it is committed or none of it is. The counter row is
//! seeded on first use from the number of invoices already issued in that
//! month, then incremented with a row lock, so two concurrent requests
//! always receive different numbers.
//!
//! Reads return [`InvoiceDetail`]: the header with its items and a short
//! summary of the linked project, shaped as the portal front-end expects:
//!
//! ```json
//! {
//!   "id": "…",
//!   "invoice_number": "INV-2603-00001",
//!   "subtotal": 3000000,
//!   "tax": 300000,
//!   "total_amount": 3300000,
//!   "status": "draft",
//!   "invoice_items": [{ "description": "Kasir Digital", "quantity": 1, … }],
//!   "projects": { "name": "Toko Retail Modern", "type": "pos" }
//! }
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

use super::types::{InvoiceStatus, ProductType};
use crate::billing::{compute_totals, BillingError, InvoiceNumber, InvoicePeriod, LineAmount};

const COLUMNS: &str = "id, user_id, project_id, invoice_number, invoice_date, due_date, \
     subtotal, tax, total_amount, description, status, created_at, updated_at, deleted_at";

const ITEM_COLUMNS: &str =
    "id, invoice_id, description, quantity, unit_price, total_price, order_index, created_at";

/// Error type for invoice operations
#[derive(Debug, thiserror::Error)]
pub enum InvoiceError {
    #[error("Missing required fields or empty items")]
    EmptyItems,

    #[error(transparent)]
    Billing(#[from] BillingError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Invoice {
    pub id: Uuid,
    pub user_id: Uuid,
    pub project_id: Option<Uuid>,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub subtotal: i64,
    pub tax: i64,
    pub total_amount: i64,
    pub description: Option<String>,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InvoiceItem {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub description: String,
    pub quantity: i32,
    pub unit_price: i64,
    pub total_price: i64,

    /// 0-based position in the request
    pub order_index: i32,

    pub created_at: DateTime<Utc>,
}

/// One requested line
#[derive(Debug, Clone)]
pub struct NewInvoiceItem {
    pub description: String,
    pub quantity: i32,
    pub unit_price: i64,
}

impl NewInvoiceItem {
    fn amount(&self) -> LineAmount {
        LineAmount {
            quantity: self.quantity,
            unit_price: self.unit_price,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateInvoice {
    pub user_id: Uuid,
    pub project_id: Option<Uuid>,
    pub items: Vec<NewInvoiceItem>,

    /// Defaults to today (UTC)
    pub invoice_date: Option<NaiveDate>,

    pub due_date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// Name and type of the project an invoice bills
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub name: String,

    #[serde(rename = "type")]
    pub project_type: ProductType,
}

/// Invoice header with items and linked project
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub invoice: Invoice,

    pub invoice_items: Vec<InvoiceItem>,

    pub projects: Option<ProjectSummary>,
}

impl Invoice {
    /// Issues a new invoice numbered within `period`
    ///
    /// Totals are computed here; callers only supply quantities and unit
    /// prices.
    ///
    /// # Errors
    ///
    /// - [`InvoiceError::EmptyItems`] when no line is given
    /// - [`InvoiceError::Billing`] for an invalid quantity or price, or an
    ///   amount that overflows
    /// - [`InvoiceError::Database`] when any write fails; nothing is kept
    pub async fn create(
        pool: &PgPool,
        data: CreateInvoice,
        period: InvoicePeriod,
    ) -> Result<InvoiceDetail, InvoiceError> {
        if data.items.is_empty() {
            return Err(InvoiceError::EmptyItems);
        }

        let amounts: Vec<LineAmount> = data.items.iter().map(NewInvoiceItem::amount).collect();
        let totals = compute_totals(&amounts)?;
        let line_totals = amounts
            .iter()
            .map(LineAmount::total)
            .collect::<Result<Vec<_>, _>>()?;

        let mut tx = pool.begin().await?;

        let (sequence,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO invoice_sequences (period, last_value)
            VALUES ($1, (SELECT COUNT(*) FROM invoices WHERE invoice_number LIKE $2)::INTEGER + 1)
            ON CONFLICT (period) DO UPDATE SET last_value = invoice_sequences.last_value + 1
            RETURNING last_value
            "#,
        )
        .bind(period.code())
        .bind(period.like_pattern())
        .fetch_one(&mut *tx)
        .await?;

        let sequence = u32::try_from(sequence).map_err(|_| BillingError::Overflow)?;
        let invoice_number = InvoiceNumber::new(period, sequence);
        let invoice_date = data
            .invoice_date
            .unwrap_or_else(|| Utc::now().date_naive());

        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            INSERT INTO invoices (user_id, project_id, invoice_number, invoice_date, due_date, subtotal, tax, total_amount, description, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'draft')
            RETURNING {COLUMNS}
            "#
        ))
        .bind(data.user_id)
        .bind(data.project_id)
        .bind(invoice_number.as_str())
        .bind(invoice_date)
        .bind(data.due_date)
        .bind(totals.subtotal)
        .bind(totals.tax)
        .bind(totals.total)
        .bind(&data.description)
        .fetch_one(&mut *tx)
        .await?;

        let mut invoice_items = Vec::with_capacity(data.items.len());
        for (index, (item, total_price)) in data.items.iter().zip(line_totals).enumerate() {
            let order_index = i32::try_from(index).map_err(|_| BillingError::Overflow)?;

            let row = sqlx::query_as::<_, InvoiceItem>(&format!(
                r#"
                INSERT INTO invoice_items (invoice_id, description, quantity, unit_price, total_price, order_index)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING {ITEM_COLUMNS}
                "#
            ))
            .bind(invoice.id)
            .bind(&item.description)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(total_price)
            .bind(order_index)
            .fetch_one(&mut *tx)
            .await?;

            invoice_items.push(row);
        }

        let projects = match invoice.project_id {
            Some(project_id) => project_summary(&mut *tx, project_id).await?,
            None => None,
        };

        tx.commit().await?;

        info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            total_amount = invoice.total_amount,
            items = invoice_items.len(),
            "Invoice created"
        );

        Ok(InvoiceDetail {
            invoice,
            invoice_items,
            projects,
        })
    }

    /// Invoice with items and project, or `None` if missing or deleted
    pub async fn find_detail(pool: &PgPool, id: Uuid) -> Result<Option<InvoiceDetail>, sqlx::Error> {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {COLUMNS} FROM invoices WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        let Some(invoice) = invoice else {
            return Ok(None);
        };

        let invoice_items = sqlx::query_as::<_, InvoiceItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM invoice_items WHERE invoice_id = $1 ORDER BY order_index"
        ))
        .bind(invoice.id)
        .fetch_all(pool)
        .await?;

        let projects = match invoice.project_id {
            Some(project_id) => project_summary(pool, project_id).await?,
            None => None,
        };

        Ok(Some(InvoiceDetail {
            invoice,
            invoice_items,
            projects,
        }))
    }

    /// Live invoices of a user, latest invoice date first
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: Uuid,
        status: Option<InvoiceStatus>,
    ) -> Result<Vec<InvoiceDetail>, sqlx::Error> {
        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            SELECT {COLUMNS} FROM invoices
            WHERE user_id = $1
              AND deleted_at IS NULL
              AND ($2::invoice_status IS NULL OR status = $2)
            ORDER BY invoice_date DESC, created_at DESC
            "#
        ))
        .bind(user_id)
        .bind(status)
        .fetch_all(pool)
        .await?;

        if invoices.is_empty() {
            return Ok(Vec::new());
        }

        let invoice_ids: Vec<Uuid> = invoices.iter().map(|i| i.id).collect();
        let mut items_by_invoice: HashMap<Uuid, Vec<InvoiceItem>> = HashMap::new();
        let items = sqlx::query_as::<_, InvoiceItem>(&format!(
            r#"
            SELECT {ITEM_COLUMNS} FROM invoice_items
            WHERE invoice_id = ANY($1)
            ORDER BY invoice_id, order_index
            "#
        ))
        .bind(&invoice_ids)
        .fetch_all(pool)
        .await?;
        for item in items {
            items_by_invoice.entry(item.invoice_id).or_default().push(item);
        }

        let project_ids: Vec<Uuid> = invoices.iter().filter_map(|i| i.project_id).collect();
        let projects: HashMap<Uuid, ProjectSummary> = if project_ids.is_empty() {
            HashMap::new()
        } else {
            sqlx::query_as::<_, (Uuid, String, ProductType)>(
                "SELECT id, name, type FROM projects WHERE id = ANY($1)",
            )
            .bind(&project_ids)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(|(id, name, project_type)| (id, ProjectSummary { name, project_type }))
            .collect()
        };

        Ok(invoices
            .into_iter()
            .map(|invoice| InvoiceDetail {
                invoice_items: items_by_invoice.remove(&invoice.id).unwrap_or_default(),
                projects: invoice
                    .project_id
                    .and_then(|id| projects.get(&id).cloned()),
                invoice,
            })
            .collect())
    }
}

async fn project_summary<'e, E>(
    executor: E,
    project_id: Uuid,
) -> Result<Option<ProjectSummary>, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    let row: Option<(String, ProductType)> =
        sqlx::query_as("SELECT name, type FROM projects WHERE id = $1")
            .bind(project_id)
            .fetch_optional(executor)
            .await?;

    Ok(row.map(|(name, project_type)| ProjectSummary { name, project_type }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_flattens_header() {
        let now = Utc::now();
        let invoice = Invoice {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            project_id: None,
            invoice_number: "INV-2603-00001".to_string(),
            invoice_date: NaiveDate::from_ymd_opt(2026, 3, 17).unwrap(),
            due_date: None,
            subtotal: 1_000,
            tax: 100,
            total_amount: 1_100,
            description: None,
            status: InvoiceStatus::Draft,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let json = serde_json::to_value(InvoiceDetail {
            invoice,
            invoice_items: Vec::new(),
            projects: Some(ProjectSummary {
                name: "Toko".to_string(),
                project_type: ProductType::Pos,
            }),
        })
        .unwrap();

        assert_eq!(json["invoice_number"], "INV-2603-00001");
        assert_eq!(json["invoice_date"], "2026-03-17");
        assert_eq!(json["status"], "draft");
        assert_eq!(json["invoice_items"], serde_json::json!([]));
        assert_eq!(json["projects"]["type"], "pos");
        assert!(json.get("invoice").is_none());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            InvoiceError::EmptyItems.to_string(),
            "Missing required fields or empty items"
        );
        assert_eq!(
            InvoiceError::from(BillingError::Overflow).to_string(),
            "Invoice amount is too large"
        );
    }
}
