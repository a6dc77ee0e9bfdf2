//! PostgreSQL implementation of PlanRepository.

use async_trait::async_trait;
use ripple_core::ids::{PlanId, ProjectId};
use ripple_core::ports::PlanRepository;
use ripple_core::project::Plan;
use ripple_core::{Error, Result};
use sqlx::{PgPool, Row};

/// PostgreSQL implementation of PlanRepository.
#[derive(Clone)]
pub struct PgPlanRepository {
    pool: PgPool,
}

impl PgPlanRepository {
    /// Create a new PgPlanRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_plan(r: &sqlx::postgres::PgRow) -> Plan {
        Plan {
            id: PlanId::from_uuid(r.get::<uuid::Uuid, _>("id")),
            project_id: ProjectId::from_uuid(r.get::<uuid::Uuid, _>("project_id")),
            label: r.get("label"),
            cluster: r.get("cluster"),
            date_created: r.get("date_created"),
        }
    }
}

#[async_trait]
impl PlanRepository for PgPlanRepository {
    async fn create(&self, plan: &Plan) -> Result<PlanId> {
        sqlx::query(
            "INSERT INTO plans (id, project_id, label, cluster, date_created) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(plan.id.as_uuid())
        .bind(plan.project_id.as_uuid())
        .bind(&plan.label)
        .bind(&plan.cluster)
        .bind(plan.date_created)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(plan.id)
    }

    async fn get(&self, id: PlanId) -> Result<Option<Plan>> {
        let row = sqlx::query(
            "SELECT id, project_id, label, cluster, date_created FROM plans WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(row.as_ref().map(Self::row_to_plan))
    }

    async fn list_by_cluster(&self, cluster: &str) -> Result<Vec<Plan>> {
        let rows = sqlx::query(
            "SELECT id, project_id, label, cluster, date_created FROM plans WHERE cluster = $1",
        )
        .bind(cluster)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(rows.iter().map(Self::row_to_plan).collect())
    }
}
