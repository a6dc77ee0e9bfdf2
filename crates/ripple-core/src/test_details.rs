//! Test details read model: a test execution with its run history.

use crate::build::Build;
use crate::ids::TestId;
use crate::ports::{BuildRepository, TestRepository};
use crate::test_case::{TestCase, TestResult, TestRun};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Maximum number of earlier runs returned with a test.
pub const PREVIOUS_RUNS_LIMIT: u32 = 25;

/// A test run as rendered in run listings.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestRunView {
    pub id: String,
    pub name: String,
    pub package: Option<String>,
    pub result: TestResult,
    pub duration: Option<u64>,
    pub message: Option<String>,
    pub link: String,
    pub date_created: DateTime<Utc>,
    pub build: Build,
}

impl From<TestRun> for TestRunView {
    fn from(run: TestRun) -> Self {
        let id = run.test.id.hex();
        Self {
            link: format!("/tests/{}/", id),
            id,
            name: run.test.name,
            package: run.test.package,
            result: run.test.result,
            duration: run.test.duration,
            message: run.test.message,
            date_created: run.test.date_created,
            build: run.build,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestDetails {
    pub build: Build,
    pub test: TestCase,
    pub previous_runs: Vec<TestRunView>,
    pub first_run: Option<TestRunView>,
}

/// Channels a live-update layer would publish changes of this test on.
pub fn stream_channels(test_id: TestId) -> Vec<String> {
    vec![format!("tests:*:*:{}", test_id.hex())]
}

pub struct TestDetailsService {
    tests: Arc<dyn TestRepository>,
    builds: Arc<dyn BuildRepository>,
}

impl TestDetailsService {
    pub fn new(tests: Arc<dyn TestRepository>, builds: Arc<dyn BuildRepository>) -> Self {
        Self { tests, builds }
    }

    pub async fn get(&self, id: TestId) -> Result<TestDetails> {
        let test = self
            .tests
            .get(id)
            .await?
            .ok_or_else(|| Error::TestNotFound(id.to_string()))?;

        let build = self
            .builds
            .get(test.build_id)
            .await?
            .ok_or_else(|| Error::BuildNotFound(test.build_id.to_string()))?;

        // TODO: order by position in the VCS tree once builds record their parent revision.
        let previous_runs = self
            .tests
            .previous_runs(&test, build.date_created, PREVIOUS_RUNS_LIMIT)
            .await?;
        let first_run = self.tests.first_run(&test).await?;

        debug!(
            test_id = %id,
            previous_runs = previous_runs.len(),
            has_first_run = first_run.is_some(),
            "Loaded test details"
        );

        Ok(TestDetails {
            build,
            test,
            previous_runs: previous_runs.into_iter().map(TestRunView::from).collect(),
            first_run: first_run.map(TestRunView::from),
        })
    }
}
