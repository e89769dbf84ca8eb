//! Database models for the Emerald portal
//!
//! Each model owns its queries as associated functions taking a `&PgPool`.
//!
//! - `types`: enum columns (product type, statuses)
//! - `project`: customer projects
//! - `module`: deliverables inside a project
//! - `invoice`: invoices and their line items
//! - `portfolio`: public portfolio entries
//! - `activity_log`: audit trail
//! - `dashboard`: aggregated per-user figures

pub mod activity_log;
pub mod dashboard;
pub mod invoice;
pub mod module;
pub mod portfolio;
pub mod project;
pub mod types;
