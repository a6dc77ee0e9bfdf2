//! PostgreSQL implementation of ProjectRepository.

use async_trait::async_trait;
use ripple_core::ids::ProjectId;
use ripple_core::ports::ProjectRepository;
use ripple_core::project::Project;
use ripple_core::{Error, Result};
use sqlx::{PgPool, Row};

#[derive(Clone)]
pub struct PgProjectRepository {
    pool: PgPool,
}

impl PgProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for PgProjectRepository {
    async fn create(&self, project: &Project) -> Result<ProjectId> {
        sqlx::query("INSERT INTO projects (id, slug, name, date_created) VALUES ($1, $2, $3, $4)")
            .bind(project.id.as_uuid())
            .bind(&project.slug)
            .bind(&project.name)
            .bind(project.date_created)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(project.id)
    }

    async fn get(&self, id: ProjectId) -> Result<Option<Project>> {
        let row = sqlx::query("SELECT id, slug, name, date_created FROM projects WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(row.map(|r| Project {
            id: ProjectId::from_uuid(r.get::<uuid::Uuid, _>("id")),
            slug: r.get("slug"),
            name: r.get("name"),
            date_created: r.get("date_created"),
        }))
    }
}
