//! Build and author types.

use crate::ids::{AuthorId, BuildId, ProjectId};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    pub id: BuildId,
    pub project_id: ProjectId,
    pub label: String,
    pub status: BuildStatus,
    pub result: BuildResult,
    pub author: Option<Author>,
    pub date_created: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BuildStatus {
    Unknown,
    Queued,
    InProgress,
    Finished,
}

impl BuildStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, BuildStatus::Finished)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BuildResult {
    Unknown,
    Passed,
    Failed,
    Skipped,
    Aborted,
}
