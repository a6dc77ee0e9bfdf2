//! Snapshot image cache lifecycle.
//!
//! Plans that share a cluster share cached snapshot images. When a new
//! snapshot is cached, its images are pinned and the images of older
//! snapshots for the same cluster are given an expiration date a grace
//! period away, so builds still using them can finish. Expiration is
//! advisory: expired rows stay in the store and are filtered out on read.

use crate::clock::Clock;
use crate::ids::PlanId;
use crate::ports::{CachedSnapshotImageRepository, PlanRepository, SnapshotRepository};
use crate::project::Plan;
use crate::snapshot::{CacheWrite, CachedSnapshotImage, Snapshot, SnapshotImage};
use crate::{Error, Result};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Cache policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GcConfig {
    /// How long images of a superseded snapshot stay cached, in seconds.
    #[serde(default = "default_grace_period_secs")]
    pub grace_period_secs: u64,
}

fn default_grace_period_secs() -> u64 {
    86_400
}

impl Default for GcConfig {
    fn default() -> Self {
        Self {
            grace_period_secs: default_grace_period_secs(),
        }
    }
}

impl GcConfig {
    pub fn new(grace_period_secs: u64) -> Self {
        Self { grace_period_secs }
    }

    pub fn grace_period(&self) -> Result<TimeDelta> {
        if self.grace_period_secs == 0 {
            return Err(Error::Config(
                "gc.grace_period_secs must be greater than zero".to_string(),
            ));
        }
        i64::try_from(self.grace_period_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(|| {
                Error::Config(format!(
                    "gc.grace_period_secs out of range: {}",
                    self.grace_period_secs
                ))
            })
    }

    pub fn validate(&self) -> Result<()> {
        self.grace_period().map(|_| ())
    }

    /// The expiration date given to superseded images at `now`.
    pub fn expiry_horizon(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        now.checked_add_signed(self.grace_period()?)
            .ok_or_else(|| Error::Config("gc.grace_period_secs overflows the clock".to_string()))
    }
}

/// Decides which snapshot images stay cached for a cluster.
pub struct SnapshotCacheManager {
    plans: Arc<dyn PlanRepository>,
    snapshots: Arc<dyn SnapshotRepository>,
    cache: Arc<dyn CachedSnapshotImageRepository>,
    clock: Arc<dyn Clock>,
    config: GcConfig,
}

impl SnapshotCacheManager {
    pub fn new(
        plans: Arc<dyn PlanRepository>,
        snapshots: Arc<dyn SnapshotRepository>,
        cache: Arc<dyn CachedSnapshotImageRepository>,
        clock: Arc<dyn Clock>,
        config: GcConfig,
    ) -> Self {
        Self {
            plans,
            snapshots,
            cache,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &GcConfig {
        &self.config
    }

    /// Every plan whose cluster is `cluster`, across all projects.
    pub async fn get_plans_for_cluster(&self, cluster: &str) -> Result<Vec<Plan>> {
        let plans = self.plans.list_by_cluster(cluster).await?;
        Ok(plans
            .into_iter()
            .filter(|plan| plan.in_cluster(cluster))
            .collect())
    }

    /// Cache entries of the cluster's plans that are pinned or not yet expired.
    pub async fn get_cached_snapshot_images(
        &self,
        cluster: &str,
    ) -> Result<Vec<CachedSnapshotImage>> {
        let plans = self.get_plans_for_cluster(cluster).await?;
        if plans.is_empty() {
            debug!(cluster, "Cluster has no plans");
            return Ok(vec![]);
        }

        let now = self.clock.now();
        let plan_ids: Vec<PlanId> = plans.iter().map(|plan| plan.id).collect();
        let members: HashSet<PlanId> = plan_ids.iter().copied().collect();

        let entries = self.cache.list_for_plans(&plan_ids).await?;
        let live: Vec<CachedSnapshotImage> = entries
            .into_iter()
            .filter(|entry| members.contains(&entry.plan_id) && entry.is_live_at(now))
            .collect();

        debug!(
            cluster,
            plans = plan_ids.len(),
            live = live.len(),
            "Resolved cached snapshot images"
        );
        Ok(live)
    }

    /// Pin the images of `snapshot` and schedule the images of older
    /// snapshots of the same clusters for expiry.
    pub async fn cache_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        let write = self.plan_cache_write(snapshot).await?;
        if write.is_empty() {
            debug!(snapshot_id = %snapshot.id, "Snapshot has no images, nothing to cache");
            return Ok(());
        }

        self.cache.apply(&write).await?;

        info!(
            snapshot_id = %snapshot.id,
            pinned = write.pinned_count(),
            expiring = write.len() - write.pinned_count(),
            "Cached snapshot"
        );
        Ok(())
    }

    /// Compute the writes [`cache_snapshot`](Self::cache_snapshot) would apply.
    pub async fn plan_cache_write(&self, snapshot: &Snapshot) -> Result<CacheWrite> {
        let images = self.snapshots.list_images(snapshot.id).await?;
        let mut write = CacheWrite::new();
        if images.is_empty() {
            return Ok(write);
        }

        let now = self.clock.now();
        let horizon = self.config.expiry_horizon(now)?;

        let mates: Vec<PlanId> = self.cluster_mates(&images).await?.into_iter().collect();
        let existing = self.cache.list_for_plans(&mates).await?;

        for entry in existing
            .iter()
            .filter(|entry| entry.snapshot_id != snapshot.id)
        {
            if let Some(expires) = scheduled_expiry(entry, now, horizon) {
                write.upsert(entry.id, Some(expires));
            }
        }

        // Pins go in last so they win over anything scheduled above.
        for image in &images {
            write.pin(image.id);
        }

        Ok(write)
    }

    /// The plans of `images` plus every plan sharing a cluster with one of them.
    async fn cluster_mates(&self, images: &[SnapshotImage]) -> Result<BTreeSet<PlanId>> {
        let mut mates = BTreeSet::new();
        let mut clusters = HashSet::new();

        for image in images {
            mates.insert(image.plan_id);

            let Some(plan) = self.plans.get(image.plan_id).await? else {
                warn!(
                    snapshot_image_id = %image.id,
                    plan_id = %image.plan_id,
                    "Snapshot image references an unknown plan"
                );
                continue;
            };

            if let Some(cluster) = plan.cluster {
                if clusters.insert(cluster.clone()) {
                    for mate in self.get_plans_for_cluster(&cluster).await? {
                        mates.insert(mate.id);
                    }
                }
            }
        }

        Ok(mates)
    }
}

/// New expiration for a superseded entry, or `None` to leave it alone.
///
/// Deadlines only ever move closer: expired entries stay expired and an
/// entry already due before `horizon` keeps its date.
fn scheduled_expiry(
    entry: &CachedSnapshotImage,
    now: DateTime<Utc>,
    horizon: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match entry.expiration_date {
        None => Some(horizon),
        Some(current) if current <= now => None,
        Some(current) if current > horizon => Some(horizon),
        Some(_) => None,
    }
}
