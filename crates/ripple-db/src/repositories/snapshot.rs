//! PostgreSQL implementation of SnapshotRepository.

use async_trait::async_trait;
use ripple_core::ids::{PlanId, ProjectId, SnapshotId, SnapshotImageId};
use ripple_core::ports::SnapshotRepository;
use ripple_core::snapshot::{Snapshot, SnapshotImage, SnapshotImageStatus, SnapshotStatus};
use ripple_core::{Error, Result};
use sqlx::{PgPool, Row};

/// PostgreSQL implementation of SnapshotRepository.
#[derive(Clone)]
pub struct PgSnapshotRepository {
    pool: PgPool,
}

impl PgSnapshotRepository {
    /// Create a new PgSnapshotRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn status_to_str(status: &SnapshotStatus) -> &'static str {
        match status {
            SnapshotStatus::Pending => "pending",
            SnapshotStatus::Active => "active",
            SnapshotStatus::Failed => "failed",
            SnapshotStatus::Invalidated => "invalidated",
        }
    }

    fn str_to_status(s: &str) -> SnapshotStatus {
        match s {
            "active" => SnapshotStatus::Active,
            "failed" => SnapshotStatus::Failed,
            "invalidated" => SnapshotStatus::Invalidated,
            _ => SnapshotStatus::Pending,
        }
    }

    fn image_status_to_str(status: &SnapshotImageStatus) -> &'static str {
        match status {
            SnapshotImageStatus::Pending => "pending",
            SnapshotImageStatus::Active => "active",
            SnapshotImageStatus::Failed => "failed",
        }
    }

    fn str_to_image_status(s: &str) -> SnapshotImageStatus {
        match s {
            "active" => SnapshotImageStatus::Active,
            "failed" => SnapshotImageStatus::Failed,
            _ => SnapshotImageStatus::Pending,
        }
    }

    fn row_to_image(r: &sqlx::postgres::PgRow) -> SnapshotImage {
        let status_str: String = r.get("status");
        SnapshotImage {
            id: SnapshotImageId::from_uuid(r.get::<uuid::Uuid, _>("id")),
            snapshot_id: SnapshotId::from_uuid(r.get::<uuid::Uuid, _>("snapshot_id")),
            plan_id: PlanId::from_uuid(r.get::<uuid::Uuid, _>("plan_id")),
            status: Self::str_to_image_status(&status_str),
            date_created: r.get("date_created"),
        }
    }
}

#[async_trait]
impl SnapshotRepository for PgSnapshotRepository {
    async fn create(&self, snapshot: &Snapshot) -> Result<SnapshotId> {
        sqlx::query(
            "INSERT INTO snapshots (id, project_id, status, date_created) VALUES ($1, $2, $3, $4)",
        )
        .bind(snapshot.id.as_uuid())
        .bind(snapshot.project_id.as_uuid())
        .bind(Self::status_to_str(&snapshot.status))
        .bind(snapshot.date_created)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(snapshot.id)
    }

    async fn get(&self, id: SnapshotId) -> Result<Option<Snapshot>> {
        let row = sqlx::query(
            "SELECT id, project_id, status, date_created FROM snapshots WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(row.map(|r| {
            let status_str: String = r.get("status");
            Snapshot {
                id: SnapshotId::from_uuid(r.get::<uuid::Uuid, _>("id")),
                project_id: ProjectId::from_uuid(r.get::<uuid::Uuid, _>("project_id")),
                status: Self::str_to_status(&status_str),
                date_created: r.get("date_created"),
            }
        }))
    }

    async fn create_image(&self, image: &SnapshotImage) -> Result<SnapshotImageId> {
        sqlx::query(
            "INSERT INTO snapshot_images (id, snapshot_id, plan_id, status, date_created) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(image.id.as_uuid())
        .bind(image.snapshot_id.as_uuid())
        .bind(image.plan_id.as_uuid())
        .bind(Self::image_status_to_str(&image.status))
        .bind(image.date_created)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(image.id)
    }

    async fn list_images(&self, snapshot_id: SnapshotId) -> Result<Vec<SnapshotImage>> {
        let rows = sqlx::query(
            "SELECT id, snapshot_id, plan_id, status, date_created FROM snapshot_images WHERE snapshot_id = $1 ORDER BY date_created ASC",
        )
        .bind(snapshot_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(rows.iter().map(Self::row_to_image).collect())
    }

    async fn list_images_for_plan(&self, plan_id: PlanId) -> Result<Vec<SnapshotImage>> {
        let rows = sqlx::query(
            "SELECT id, snapshot_id, plan_id, status, date_created FROM snapshot_images WHERE plan_id = $1 ORDER BY date_created DESC",
        )
        .bind(plan_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(rows.iter().map(Self::row_to_image).collect())
    }
}
