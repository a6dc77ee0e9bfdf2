//! Test fixtures for creating sample data.
//!
//! Timestamps are whole seconds so they survive a PostgreSQL round trip
//! unchanged.

use chrono::{DateTime, Duration, TimeZone, Utc};
use ripple_core::build::{Author, Build, BuildResult, BuildStatus};
use ripple_core::ids::{AuthorId, BuildId, PlanId, ProjectId, SnapshotId, SnapshotImageId, TestId};
use ripple_core::project::{Plan, Project};
use ripple_core::snapshot::{Snapshot, SnapshotImage, SnapshotImageStatus, SnapshotStatus};
use ripple_core::test_case::{TestCase, TestResult};

/// Reference instant all fixtures are dated from.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 14, 9, 30, 0)
        .single()
        .unwrap_or_default()
}

/// `epoch()` shifted by `minutes`.
pub fn at(minutes: i64) -> DateTime<Utc> {
    epoch() + Duration::minutes(minutes)
}

/// Factory for creating test projects.
pub struct ProjectFixture;

impl ProjectFixture {
    pub fn named(slug: &str) -> Project {
        Project {
            id: ProjectId::new(),
            slug: slug.to_string(),
            name: slug.replace('-', " "),
            date_created: epoch(),
        }
    }
}

/// Factory for creating test plans.
pub struct PlanFixture;

impl PlanFixture {
    pub fn in_cluster(project: &Project, label: &str, cluster: &str) -> Plan {
        Plan {
            cluster: Some(cluster.to_string()),
            ..Self::unclustered(project, label)
        }
    }

    pub fn unclustered(project: &Project, label: &str) -> Plan {
        Plan {
            id: PlanId::new(),
            project_id: project.id,
            label: label.to_string(),
            cluster: None,
            date_created: epoch(),
        }
    }
}

/// Factory for creating test snapshots and their images.
pub struct SnapshotFixture;

impl SnapshotFixture {
    pub fn active(project: &Project, minutes: i64) -> Snapshot {
        Snapshot {
            id: SnapshotId::new(),
            project_id: project.id,
            status: SnapshotStatus::Active,
            date_created: at(minutes),
        }
    }

    pub fn image(snapshot: &Snapshot, plan: &Plan) -> SnapshotImage {
        SnapshotImage {
            id: SnapshotImageId::new(),
            snapshot_id: snapshot.id,
            plan_id: plan.id,
            status: SnapshotImageStatus::Active,
            date_created: snapshot.date_created,
        }
    }
}

/// Factory for creating test builds.
pub struct BuildFixture;

impl BuildFixture {
    pub fn author() -> Author {
        Author {
            id: AuthorId::new(),
            name: "Ada Lovelace".to_string(),
            email: format!("ada+{}@example.com", AuthorId::new().hex()),
        }
    }

    pub fn finished(project: &Project, author: Option<&Author>, minutes: i64) -> Build {
        Build {
            id: BuildId::new(),
            project_id: project.id,
            label: format!("build at +{minutes}m"),
            status: BuildStatus::Finished,
            result: BuildResult::Passed,
            author: author.cloned(),
            date_created: at(minutes),
        }
    }

    pub fn in_progress(project: &Project, minutes: i64) -> Build {
        Build {
            status: BuildStatus::InProgress,
            result: BuildResult::Unknown,
            ..Self::finished(project, None, minutes)
        }
    }
}

/// Factory for creating test executions.
pub struct TestCaseFixture;

impl TestCaseFixture {
    /// An execution of the named test inside `build`.
    pub fn run_of(build: &Build, name: &str) -> TestCase {
        TestCase {
            id: TestId::new(),
            build_id: build.id,
            project_id: build.project_id,
            name: name.to_string(),
            package: name.rsplit_once('.').map(|(package, _)| package.to_string()),
            group_sha: format!("group:{name}"),
            label_sha: format!("label:{name}"),
            result: TestResult::Passed,
            duration: Some(134),
            message: None,
            date_created: build.date_created,
        }
    }

    pub fn failed(build: &Build, name: &str, message: &str) -> TestCase {
        TestCase {
            result: TestResult::Failed,
            message: Some(message.to_string()),
            ..Self::run_of(build, name)
        }
    }
}
