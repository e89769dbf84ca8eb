//! Per-customer dashboard figures

use crate::models::types::ProjectStatus;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_projects: i64,

    /// Projects whose status is in [`ProjectStatus::ACTIVE`]
    pub active_projects: i64,

    pub total_invoices: i64,

    /// Sum of `total_amount` over all live invoices, in rupiah
    pub total_invoiced: i64,

    pub paid_invoices: i64,
}

impl DashboardStats {
    pub async fn for_user(pool: &PgPool, user_id: Uuid) -> Result<Self, sqlx::Error> {
        let active: Vec<&str> = ProjectStatus::ACTIVE.iter().map(|s| s.as_str()).collect();

        sqlx::query_as::<_, DashboardStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM projects
                  WHERE user_id = $1 AND deleted_at IS NULL) AS total_projects,
                (SELECT COUNT(*) FROM projects
                  WHERE user_id = $1 AND deleted_at IS NULL
                    AND status::TEXT = ANY($2)) AS active_projects,
                (SELECT COUNT(*) FROM invoices
                  WHERE user_id = $1 AND deleted_at IS NULL) AS total_invoices,
                (SELECT COALESCE(SUM(total_amount), 0)::BIGINT FROM invoices
                  WHERE user_id = $1 AND deleted_at IS NULL) AS total_invoiced,
                (SELECT COUNT(*) FROM invoices
                  WHERE user_id = $1 AND deleted_at IS NULL AND status = 'paid') AS paid_invoices
            "#,
        )
        .bind(user_id)
        .bind(&active)
        .fetch_one(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_fields() {
        let stats = DashboardStats {
            total_projects: 3,
            active_projects: 2,
            total_invoices: 4,
            total_invoiced: 9_900_000,
            paid_invoices: 1,
        };

        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["totalProjects"], 3);
        assert_eq!(json["activeProjects"], 2);
        assert_eq!(json["totalInvoiced"], 9_900_000);
        assert_eq!(json["paidInvoices"], 1);
    }
}
