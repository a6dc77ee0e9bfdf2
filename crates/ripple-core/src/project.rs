//! Project and build plan types.

use crate::ids::{PlanId, ProjectId};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub slug: String,
    pub name: String,
    pub date_created: DateTime<Utc>,
}

/// A build plan. Plans sharing a `cluster` share cached snapshot images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: PlanId,
    pub project_id: ProjectId,
    pub label: String,
    pub cluster: Option<String>,
    pub date_created: DateTime<Utc>,
}

impl Plan {
    pub fn in_cluster(&self, cluster: &str) -> bool {
        self.cluster.as_deref() == Some(cluster)
    }
}
