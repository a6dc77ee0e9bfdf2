//! Port traits (hexagonal architecture).
//!
//! These traits define the interfaces between the core domain and storage adapters.

use crate::build::{Author, Build};
use crate::ids::*;
use crate::project::{Plan, Project};
use crate::snapshot::{CacheWrite, CachedSnapshotImage, Snapshot, SnapshotImage};
use crate::test_case::{TestCase, TestRun};
use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository for projects.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Create a new project.
    async fn create(&self, project: &Project) -> Result<ProjectId>;

    /// Get a project by ID.
    async fn get(&self, id: ProjectId) -> Result<Option<Project>>;
}

/// Repository for build plans.
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// Create a new plan.
    async fn create(&self, plan: &Plan) -> Result<PlanId>;

    /// Get a plan by ID.
    async fn get(&self, id: PlanId) -> Result<Option<Plan>>;

    /// Every plan, across all projects, whose cluster equals `cluster`.
    async fn list_by_cluster(&self, cluster: &str) -> Result<Vec<Plan>>;
}

/// Repository for snapshots and their images.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Create a new snapshot.
    async fn create(&self, snapshot: &Snapshot) -> Result<SnapshotId>;

    /// Get a snapshot by ID.
    async fn get(&self, id: SnapshotId) -> Result<Option<Snapshot>>;

    /// Create a new snapshot image.
    async fn create_image(&self, image: &SnapshotImage) -> Result<SnapshotImageId>;

    /// Images built from a snapshot.
    async fn list_images(&self, snapshot_id: SnapshotId) -> Result<Vec<SnapshotImage>>;

    /// Images built for a plan, newest first.
    async fn list_images_for_plan(&self, plan_id: PlanId) -> Result<Vec<SnapshotImage>>;
}

/// Repository for snapshot image cache entries.
#[async_trait]
pub trait CachedSnapshotImageRepository: Send + Sync {
    /// Get the cache entry for a snapshot image.
    async fn get(&self, id: SnapshotImageId) -> Result<Option<CachedSnapshotImage>>;

    /// Every cache entry whose image belongs to one of `plan_ids`, expired or not.
    async fn list_for_plans(&self, plan_ids: &[PlanId]) -> Result<Vec<CachedSnapshotImage>>;

    /// Total number of cache entries.
    async fn count(&self) -> Result<u64>;

    /// Upsert every entry of `write` atomically: all of them commit or none do.
    async fn apply(&self, write: &CacheWrite) -> Result<()>;
}

/// Repository for commit authors.
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// Create a new author.
    async fn create(&self, author: &Author) -> Result<AuthorId>;
}

/// Repository for builds.
#[async_trait]
pub trait BuildRepository: Send + Sync {
    /// Create a new build. The author, if any, must already exist.
    async fn create(&self, build: &Build) -> Result<BuildId>;

    /// Get a build by ID, with its author.
    async fn get(&self, id: BuildId) -> Result<Option<Build>>;
}

/// Repository for test executions.
#[async_trait]
pub trait TestRepository: Send + Sync {
    /// Record a test execution.
    async fn create(&self, test: &TestCase) -> Result<TestId>;

    /// Get a test execution by ID.
    async fn get(&self, id: TestId) -> Result<Option<TestCase>>;

    /// Runs of the same test in finished builds created before `before`,
    /// newest build first.
    async fn previous_runs(
        &self,
        test: &TestCase,
        before: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<TestRun>>;

    /// The oldest other run of the same test in a finished build.
    async fn first_run(&self, test: &TestCase) -> Result<Option<TestRun>>;
}
