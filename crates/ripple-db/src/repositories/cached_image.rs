//! PostgreSQL implementation of CachedSnapshotImageRepository.

use async_trait::async_trait;
use ripple_core::ids::{PlanId, SnapshotId, SnapshotImageId};
use ripple_core::ports::CachedSnapshotImageRepository;
use ripple_core::snapshot::{CacheWrite, CachedSnapshotImage};
use ripple_core::{Error, Result};
use sqlx::{PgPool, Row};
use tracing::debug;

const SELECT_CACHED: &str = "SELECT c.id, c.expiration_date, c.date_created, i.snapshot_id, i.plan_id \
     FROM cached_snapshot_images c JOIN snapshot_images i ON i.id = c.id";

/// PostgreSQL implementation of CachedSnapshotImageRepository.
#[derive(Clone)]
pub struct PgCachedSnapshotImageRepository {
    pool: PgPool,
}

impl PgCachedSnapshotImageRepository {
    /// Create a new PgCachedSnapshotImageRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_cached(r: &sqlx::postgres::PgRow) -> CachedSnapshotImage {
        CachedSnapshotImage {
            id: SnapshotImageId::from_uuid(r.get::<uuid::Uuid, _>("id")),
            snapshot_id: SnapshotId::from_uuid(r.get::<uuid::Uuid, _>("snapshot_id")),
            plan_id: PlanId::from_uuid(r.get::<uuid::Uuid, _>("plan_id")),
            expiration_date: r.get("expiration_date"),
            date_created: r.get("date_created"),
        }
    }
}

#[async_trait]
impl CachedSnapshotImageRepository for PgCachedSnapshotImageRepository {
    async fn get(&self, id: SnapshotImageId) -> Result<Option<CachedSnapshotImage>> {
        let row = sqlx::query(&format!("{SELECT_CACHED} WHERE c.id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(row.as_ref().map(Self::row_to_cached))
    }

    async fn list_for_plans(&self, plan_ids: &[PlanId]) -> Result<Vec<CachedSnapshotImage>> {
        if plan_ids.is_empty() {
            return Ok(vec![]);
        }
        let ids: Vec<uuid::Uuid> = plan_ids.iter().map(|id| *id.as_uuid()).collect();

        let rows = sqlx::query(&format!("{SELECT_CACHED} WHERE i.plan_id = ANY($1)"))
            .bind(&ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(rows.iter().map(Self::row_to_cached).collect())
    }

    async fn count(&self) -> Result<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM cached_snapshot_images")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(row.get::<i64, _>("total") as u64)
    }

    async fn apply(&self, write: &CacheWrite) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        // Ids are visited in order, so concurrent batches lock rows in the same order.
        for (id, expiration_date) in write.iter() {
            sqlx::query(
                "INSERT INTO cached_snapshot_images (id, expiration_date) VALUES ($1, $2) \
                 ON CONFLICT (id) DO UPDATE SET expiration_date = EXCLUDED.expiration_date",
            )
            .bind(id.as_uuid())
            .bind(*expiration_date)
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        debug!(entries = write.len(), "Applied cache write");
        Ok(())
    }
}
