//! PostgreSQL implementations of AuthorRepository and BuildRepository.

use async_trait::async_trait;
use ripple_core::build::{Author, Build, BuildResult, BuildStatus};
use ripple_core::ids::{AuthorId, BuildId, ProjectId};
use ripple_core::ports::{AuthorRepository, BuildRepository};
use ripple_core::{Error, Result};
use sqlx::{PgPool, Row};

#[derive(Clone)]
pub struct PgAuthorRepository {
    pool: PgPool,
}

impl PgAuthorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorRepository for PgAuthorRepository {
    async fn create(&self, author: &Author) -> Result<AuthorId> {
        sqlx::query("INSERT INTO authors (id, name, email) VALUES ($1, $2, $3)")
            .bind(author.id.as_uuid())
            .bind(&author.name)
            .bind(&author.email)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(author.id)
    }
}

/// PostgreSQL implementation of BuildRepository.
#[derive(Clone)]
pub struct PgBuildRepository {
    pool: PgPool,
}

impl PgBuildRepository {
    /// Create a new PgBuildRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) fn status_to_str(status: &BuildStatus) -> &'static str {
        match status {
            BuildStatus::Unknown => "unknown",
            BuildStatus::Queued => "queued",
            BuildStatus::InProgress => "in_progress",
            BuildStatus::Finished => "finished",
        }
    }

    pub(crate) fn str_to_status(s: &str) -> BuildStatus {
        match s {
            "queued" => BuildStatus::Queued,
            "in_progress" => BuildStatus::InProgress,
            "finished" => BuildStatus::Finished,
            _ => BuildStatus::Unknown,
        }
    }

    fn result_to_str(result: &BuildResult) -> &'static str {
        match result {
            BuildResult::Unknown => "unknown",
            BuildResult::Passed => "passed",
            BuildResult::Failed => "failed",
            BuildResult::Skipped => "skipped",
            BuildResult::Aborted => "aborted",
        }
    }

    fn str_to_result(s: &str) -> BuildResult {
        match s {
            "passed" => BuildResult::Passed,
            "failed" => BuildResult::Failed,
            "skipped" => BuildResult::Skipped,
            "aborted" => BuildResult::Aborted,
            _ => BuildResult::Unknown,
        }
    }

    /// Map a row selected with the `b_` / `a_` column prefixes used by
    /// [`BUILD_COLUMNS`].
    pub(crate) fn row_to_build(r: &sqlx::postgres::PgRow) -> Build {
        let status_str: String = r.get("b_status");
        let result_str: String = r.get("b_result");
        let author = r
            .get::<Option<uuid::Uuid>, _>("a_id")
            .map(|id| Author {
                id: AuthorId::from_uuid(id),
                name: r.get("a_name"),
                email: r.get("a_email"),
            });

        Build {
            id: BuildId::from_uuid(r.get::<uuid::Uuid, _>("b_id")),
            project_id: ProjectId::from_uuid(r.get::<uuid::Uuid, _>("b_project_id")),
            label: r.get("b_label"),
            status: Self::str_to_status(&status_str),
            result: Self::str_to_result(&result_str),
            author,
            date_created: r.get("b_date_created"),
        }
    }
}

/// Build and author columns for queries joining `builds b LEFT JOIN authors a`.
pub(crate) const BUILD_COLUMNS: &str = "b.id AS b_id, b.project_id AS b_project_id, \
     b.label AS b_label, b.status AS b_status, b.result AS b_result, \
     b.date_created AS b_date_created, a.id AS a_id, a.name AS a_name, a.email AS a_email";

#[async_trait]
impl BuildRepository for PgBuildRepository {
    async fn create(&self, build: &Build) -> Result<BuildId> {
        sqlx::query(
            "INSERT INTO builds (id, project_id, author_id, label, status, result, date_created) VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(build.id.as_uuid())
        .bind(build.project_id.as_uuid())
        .bind(build.author.as_ref().map(|a| *a.id.as_uuid()))
        .bind(&build.label)
        .bind(Self::status_to_str(&build.status))
        .bind(Self::result_to_str(&build.result))
        .bind(build.date_created)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(build.id)
    }

    async fn get(&self, id: BuildId) -> Result<Option<Build>> {
        let row = sqlx::query(&format!(
            "SELECT {BUILD_COLUMNS} FROM builds b LEFT JOIN authors a ON a.id = b.author_id WHERE b.id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(row.as_ref().map(Self::row_to_build))
    }
}
