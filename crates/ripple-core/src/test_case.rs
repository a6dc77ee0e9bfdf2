//! Test execution types.

use crate::build::Build;
use crate::ids::{BuildId, ProjectId, TestId};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One execution of a test inside a build.
///
/// Executions of the same logical test share `group_sha` and `label_sha`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub id: TestId,
    pub build_id: BuildId,
    pub project_id: ProjectId,
    pub name: String,
    pub package: Option<String>,
    pub group_sha: String,
    pub label_sha: String,
    pub result: TestResult,
    /// Milliseconds.
    pub duration: Option<u64>,
    pub message: Option<String>,
    pub date_created: DateTime<Utc>,
}

impl TestCase {
    pub fn is_same_test(&self, other: &TestCase) -> bool {
        self.group_sha == other.group_sha && self.label_sha == other.label_sha
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TestResult {
    Unknown,
    Passed,
    Failed,
    Skipped,
    Aborted,
}

/// A test execution joined with the build it ran in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRun {
    pub test: TestCase,
    pub build: Build,
}
