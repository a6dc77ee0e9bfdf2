//! Test context providing access to all test infrastructure.

use crate::containers::PostgresContainer;
use ripple_core::{Clock, GcConfig, SnapshotCacheManager};
use ripple_db::{
    Database, PgAuthorRepository, PgBuildRepository, PgCachedSnapshotImageRepository,
    PgPlanRepository, PgProjectRepository, PgSnapshotRepository, PgTestRepository,
};
use std::sync::Arc;

/// Test context with a migrated PostgreSQL database.
///
/// Drop this to stop the container.
pub struct TestContext {
    pub postgres: PostgresContainer,
    pub db: Database,
}

impl TestContext {
    /// Start PostgreSQL and apply migrations.
    pub async fn new() -> anyhow::Result<Self> {
        crate::init_test_logging();

        let postgres = PostgresContainer::start().await?;
        let db = Database::connect(postgres.connection_string()).await?;
        db.migrate().await?;

        Ok(Self { postgres, db })
    }

    /// Get database connection string.
    pub fn db_url(&self) -> &str {
        self.postgres.connection_string()
    }

    pub fn projects(&self) -> PgProjectRepository {
        PgProjectRepository::new(self.db.pool().clone())
    }

    pub fn plans(&self) -> PgPlanRepository {
        PgPlanRepository::new(self.db.pool().clone())
    }

    pub fn snapshots(&self) -> PgSnapshotRepository {
        PgSnapshotRepository::new(self.db.pool().clone())
    }

    pub fn cache(&self) -> PgCachedSnapshotImageRepository {
        PgCachedSnapshotImageRepository::new(self.db.pool().clone())
    }

    pub fn authors(&self) -> PgAuthorRepository {
        PgAuthorRepository::new(self.db.pool().clone())
    }

    pub fn builds(&self) -> PgBuildRepository {
        PgBuildRepository::new(self.db.pool().clone())
    }

    pub fn tests(&self) -> PgTestRepository {
        PgTestRepository::new(self.db.pool().clone())
    }

    /// A cache manager over this database.
    pub fn cache_manager(&self, clock: Arc<dyn Clock>, config: GcConfig) -> SnapshotCacheManager {
        SnapshotCacheManager::new(
            Arc::new(self.plans()),
            Arc::new(self.snapshots()),
            Arc::new(self.cache()),
            clock,
            config,
        )
    }
}
