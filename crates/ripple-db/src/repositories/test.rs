//! PostgreSQL implementation of TestRepository.

use super::build::{BUILD_COLUMNS, PgBuildRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ripple_core::build::BuildStatus;
use ripple_core::ids::{BuildId, ProjectId, TestId};
use ripple_core::ports::TestRepository;
use ripple_core::test_case::{TestCase, TestResult, TestRun};
use ripple_core::{Error, Result};
use sqlx::{PgPool, Row};

const TEST_COLUMNS: &str = "t.id, t.build_id, t.project_id, t.name, t.package, t.group_sha, \
     t.label_sha, t.result, t.duration, t.message, t.date_created";

/// PostgreSQL implementation of TestRepository.
#[derive(Clone)]
pub struct PgTestRepository {
    pool: PgPool,
}

impl PgTestRepository {
    /// Create a new PgTestRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn result_to_str(result: &TestResult) -> &'static str {
        match result {
            TestResult::Unknown => "unknown",
            TestResult::Passed => "passed",
            TestResult::Failed => "failed",
            TestResult::Skipped => "skipped",
            TestResult::Aborted => "aborted",
        }
    }

    fn str_to_result(s: &str) -> TestResult {
        match s {
            "passed" => TestResult::Passed,
            "failed" => TestResult::Failed,
            "skipped" => TestResult::Skipped,
            "aborted" => TestResult::Aborted,
            _ => TestResult::Unknown,
        }
    }

    fn row_to_test(r: &sqlx::postgres::PgRow) -> TestCase {
        let result_str: String = r.get("result");
        TestCase {
            id: TestId::from_uuid(r.get::<uuid::Uuid, _>("id")),
            build_id: BuildId::from_uuid(r.get::<uuid::Uuid, _>("build_id")),
            project_id: ProjectId::from_uuid(r.get::<uuid::Uuid, _>("project_id")),
            name: r.get("name"),
            package: r.get("package"),
            group_sha: r.get("group_sha"),
            label_sha: r.get("label_sha"),
            result: Self::str_to_result(&result_str),
            duration: r.get::<Option<i64>, _>("duration").map(|d| d as u64),
            message: r.get("message"),
            date_created: r.get("date_created"),
        }
    }

    fn row_to_run(r: &sqlx::postgres::PgRow) -> TestRun {
        TestRun {
            test: Self::row_to_test(r),
            build: PgBuildRepository::row_to_build(r),
        }
    }

    fn runs_query(filter: &str, order: &str) -> String {
        format!(
            "SELECT {TEST_COLUMNS}, {BUILD_COLUMNS} FROM tests t \
             JOIN builds b ON b.id = t.build_id \
             LEFT JOIN authors a ON a.id = b.author_id \
             WHERE t.group_sha = $1 AND t.label_sha = $2 AND b.status = $3 AND {filter} \
             ORDER BY b.date_created {order} LIMIT $5"
        )
    }
}

#[async_trait]
impl TestRepository for PgTestRepository {
    async fn create(&self, test: &TestCase) -> Result<TestId> {
        sqlx::query(
            "INSERT INTO tests (id, build_id, project_id, name, package, group_sha, label_sha, result, duration, message, date_created) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(test.id.as_uuid())
        .bind(test.build_id.as_uuid())
        .bind(test.project_id.as_uuid())
        .bind(&test.name)
        .bind(&test.package)
        .bind(&test.group_sha)
        .bind(&test.label_sha)
        .bind(Self::result_to_str(&test.result))
        .bind(test.duration.map(|d| d as i64))
        .bind(&test.message)
        .bind(test.date_created)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(test.id)
    }

    async fn get(&self, id: TestId) -> Result<Option<TestCase>> {
        let row = sqlx::query(&format!("SELECT {TEST_COLUMNS} FROM tests t WHERE t.id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(row.as_ref().map(Self::row_to_test))
    }

    async fn previous_runs(
        &self,
        test: &TestCase,
        before: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<TestRun>> {
        let rows = sqlx::query(&Self::runs_query("b.date_created < $4", "DESC"))
            .bind(&test.group_sha)
            .bind(&test.label_sha)
            .bind(PgBuildRepository::status_to_str(&BuildStatus::Finished))
            .bind(before)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(rows.iter().map(Self::row_to_run).collect())
    }

    async fn first_run(&self, test: &TestCase) -> Result<Option<TestRun>> {
        let row = sqlx::query(&Self::runs_query("t.id != $4", "ASC"))
            .bind(&test.group_sha)
            .bind(&test.label_sha)
            .bind(PgBuildRepository::status_to_str(&BuildStatus::Finished))
            .bind(test.id.as_uuid())
            .bind(1_i64)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(row.as_ref().map(Self::row_to_run))
    }
}
