//! API route handlers, one module per resource
//!
//! Successful responses share one envelope:
//!
//! ```json
//! { "success": true, "data": ..., "count": 3 }
//! ```

use axum::{http::StatusCode, Json};
use serde::Serialize;

pub mod auth;
pub mod dashboard;
pub mod estimate;
pub mod health;
pub mod invoices;
pub mod modules;
pub mod portfolio;
pub mod projects;

/// `{ "success": true, "data": ... }`
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

/// `{ "success": true, "data": [...], "count": n }`
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub count: usize,
}

pub fn ok<T: Serialize>(data: T) -> Json<DataResponse<T>> {
    Json(DataResponse {
        success: true,
        data,
    })
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<DataResponse<T>>) {
    (StatusCode::CREATED, ok(data))
}

pub fn list<T: Serialize>(data: Vec<T>) -> Json<ListResponse<T>> {
    Json(ListResponse {
        success: true,
        count: data.len(),
        data,
    })
}

/// Treats a blank string like a missing one
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
