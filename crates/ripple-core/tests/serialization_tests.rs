//! Wire format of ripple-core types.

use chrono::{TimeZone, Utc};
use ripple_core::build::{BuildResult, BuildStatus};
use ripple_core::ids::*;
use ripple_core::project::Plan;
use ripple_core::snapshot::{CachedSnapshotImage, SnapshotImageStatus, SnapshotStatus};
use ripple_core::test_case::TestResult;
use serde_json::json;

#[test]
fn test_ids_serialize_as_bare_uuids() {
    let id = SnapshotImageId::new();
    let value = serde_json::to_value(id).expect("serialize");

    assert_eq!(value, json!(id.as_uuid().to_string()));
    let parsed: SnapshotImageId = serde_json::from_value(value).expect("deserialize");
    assert_eq!(parsed, id);
}

#[test]
fn test_status_enums_are_snake_case() {
    assert_eq!(serde_json::to_value(SnapshotStatus::Invalidated).unwrap(), json!("invalidated"));
    assert_eq!(serde_json::to_value(SnapshotImageStatus::Active).unwrap(), json!("active"));
    assert_eq!(serde_json::to_value(BuildStatus::InProgress).unwrap(), json!("in_progress"));
    assert_eq!(serde_json::to_value(BuildResult::Aborted).unwrap(), json!("aborted"));

    let parsed: TestResult = serde_json::from_value(json!("skipped")).unwrap();
    assert_eq!(parsed, TestResult::Skipped);
    assert!(serde_json::from_value::<BuildStatus>(json!("InProgress")).is_err());
}

#[test]
fn test_cached_image_json_shape() {
    let created = Utc.with_ymd_and_hms(2024, 5, 14, 9, 30, 0).unwrap();
    let entry = CachedSnapshotImage {
        id: SnapshotImageId::new(),
        snapshot_id: SnapshotId::new(),
        plan_id: PlanId::new(),
        expiration_date: None,
        date_created: created,
    };

    let value = serde_json::to_value(&entry).unwrap();
    assert_eq!(value["snapshotId"], json!(entry.snapshot_id));
    assert_eq!(value["planId"], json!(entry.plan_id));
    assert!(value["expirationDate"].is_null());
    assert_eq!(value["dateCreated"], json!("2024-05-14T09:30:00Z"));

    let parsed: CachedSnapshotImage = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, entry);
}

#[test]
fn test_plan_without_cluster_deserializes() {
    let value = json!({
        "id": PlanId::new(),
        "projectId": ProjectId::new(),
        "label": "unit",
        "cluster": null,
        "dateCreated": "2024-05-14T09:30:00Z",
    });

    let plan: Plan = serde_json::from_value(value).unwrap();
    assert!(plan.cluster.is_none());
    assert!(!plan.in_cluster("linux"));
}
