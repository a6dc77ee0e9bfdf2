//! Application state shared across handlers.

use ripple_core::ports::SnapshotRepository;
use ripple_core::{Clock, GcConfig, SnapshotCacheManager, TestDetailsService};
use ripple_db::{
    Database, PgBuildRepository, PgCachedSnapshotImageRepository, PgPlanRepository,
    PgSnapshotRepository, PgTestRepository,
};
use std::sync::Arc;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub snapshots: Arc<dyn SnapshotRepository>,
    pub snapshot_cache: Arc<SnapshotCacheManager>,
    pub test_details: Arc<TestDetailsService>,
}

impl AppState {
    pub fn new(
        snapshots: Arc<dyn SnapshotRepository>,
        snapshot_cache: Arc<SnapshotCacheManager>,
        test_details: Arc<TestDetailsService>,
    ) -> Self {
        Self {
            snapshots,
            snapshot_cache,
            test_details,
        }
    }

    /// Wire every service to PostgreSQL repositories sharing one pool.
    pub fn from_database(db: &Database, clock: Arc<dyn Clock>, gc: GcConfig) -> Self {
        let pool = db.pool().clone();
        let snapshots = Arc::new(PgSnapshotRepository::new(pool.clone()));

        let snapshot_cache = SnapshotCacheManager::new(
            Arc::new(PgPlanRepository::new(pool.clone())),
            snapshots.clone(),
            Arc::new(PgCachedSnapshotImageRepository::new(pool.clone())),
            clock,
            gc,
        );
        let test_details = TestDetailsService::new(
            Arc::new(PgTestRepository::new(pool.clone())),
            Arc::new(PgBuildRepository::new(pool)),
        );

        Self::new(snapshots, Arc::new(snapshot_cache), Arc::new(test_details))
    }
}
