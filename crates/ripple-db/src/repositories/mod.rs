//! Repository implementations for PostgreSQL.

mod build;
mod cached_image;
mod plan;
mod project;
mod snapshot;
mod test;

pub use build::{PgAuthorRepository, PgBuildRepository};
pub use cached_image::PgCachedSnapshotImageRepository;
pub use plan::PgPlanRepository;
pub use project::PgProjectRepository;
pub use snapshot::PgSnapshotRepository;
pub use test::PgTestRepository;
