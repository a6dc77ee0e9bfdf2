//! Snapshot, snapshot image and image cache types.

use crate::ids::{PlanId, ProjectId, SnapshotId, SnapshotImageId};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A point-in-time buildable state of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: SnapshotId,
    pub project_id: ProjectId,
    pub status: SnapshotStatus,
    pub date_created: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotStatus {
    Pending,
    Active,
    Failed,
    Invalidated,
}

/// The image produced by building a snapshot under one plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotImage {
    pub id: SnapshotImageId,
    pub snapshot_id: SnapshotId,
    pub plan_id: PlanId,
    pub status: SnapshotImageStatus,
    pub date_created: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotImageStatus {
    Pending,
    Active,
    Failed,
}

/// Cache metadata for a snapshot image.
///
/// The id is the id of the cached [`SnapshotImage`]; `snapshot_id` and
/// `plan_id` are read through from that image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CachedSnapshotImage {
    pub id: SnapshotImageId,
    pub snapshot_id: SnapshotId,
    pub plan_id: PlanId,
    /// `None` pins the entry.
    pub expiration_date: Option<DateTime<Utc>>,
    pub date_created: DateTime<Utc>,
}

impl CachedSnapshotImage {
    pub fn is_pinned(&self) -> bool {
        self.expiration_date.is_none()
    }

    /// Live entries are pinned or expire strictly after `now`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        match self.expiration_date {
            None => true,
            Some(expires) => expires > now,
        }
    }
}

/// A batch of cache upserts keyed by snapshot image.
///
/// Inserting an id that is already present replaces its expiration, so a
/// batch never holds two writes for the same image. Stores apply a batch
/// in a single transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheWrite {
    entries: BTreeMap<SnapshotImageId, Option<DateTime<Utc>>>,
}

impl CacheWrite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the expiration for `id`, returning the previous one.
    pub fn upsert(
        &mut self,
        id: SnapshotImageId,
        expiration_date: Option<DateTime<Utc>>,
    ) -> Option<Option<DateTime<Utc>>> {
        self.entries.insert(id, expiration_date)
    }

    pub fn pin(&mut self, id: SnapshotImageId) {
        self.upsert(id, None);
    }

    pub fn get(&self, id: &SnapshotImageId) -> Option<Option<DateTime<Utc>>> {
        self.entries.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pinned_count(&self) -> usize {
        self.entries.values().filter(|e| e.is_none()).count()
    }

    /// Entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&SnapshotImageId, &Option<DateTime<Utc>>)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn cached(expiration_date: Option<DateTime<Utc>>) -> CachedSnapshotImage {
        CachedSnapshotImage {
            id: SnapshotImageId::new(),
            snapshot_id: SnapshotId::new(),
            plan_id: PlanId::new(),
            expiration_date,
            date_created: Utc::now(),
        }
    }

    #[test]
    fn test_liveness() {
        let now = Utc::now();
        assert!(cached(None).is_live_at(now));
        assert!(cached(Some(now + Duration::seconds(1))).is_live_at(now));
        assert!(!cached(Some(now - Duration::seconds(1))).is_live_at(now));
        // Expiring exactly now is already expired.
        assert!(!cached(Some(now)).is_live_at(now));
    }

    #[test]
    fn test_cache_write_replaces_in_place() {
        let id = SnapshotImageId::new();
        let later = Utc::now() + Duration::hours(1);
        let mut write = CacheWrite::new();

        assert_eq!(write.upsert(id, Some(later)), None);
        assert_eq!(write.upsert(id, None), Some(Some(later)));

        assert_eq!(write.len(), 1);
        assert_eq!(write.get(&id), Some(None));
        assert_eq!(write.pinned_count(), 1);
    }
}
