//! Time-bucketed profile histograms.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::db::core::SocialGraph;
use crate::error::{GraphError, Result};
use crate::model::Timestamp;
use crate::time_bucket;

/// One non-empty histogram bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountByTime {
    /// Bucket start, epoch-aligned, in whole seconds.
    pub time: i64,
    /// Edges created within the bucket.
    pub count: usize,
}

/// Friend-add and referral activity histograms for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    /// The user.
    pub name: String,
    /// Friend-adds per bucket, ascending by bucket start.
    pub friend_count_by_time: Vec<CountByTime>,
    /// Referrals made per bucket, ascending by bucket start.
    pub referral_count_by_time: Vec<CountByTime>,
    /// Sum over `friend_count_by_time`.
    pub total_friend_count: usize,
    /// Sum over `referral_count_by_time`.
    pub total_referral_count: usize,
}

impl SocialGraph {
    /// Histograms of the user's friend-adds and referrals made, restricted
    /// to edges with `created_at >= since`, bucketed into fixed-width
    /// windows aligned to the epoch. Only non-empty buckets are emitted;
    /// gap-filling for display is the caller's responsibility.
    ///
    /// # Errors
    /// * [`GraphError::NotFound`] if the user does not exist.
    /// * [`GraphError::InvalidArgument`] for a non-positive bucket width.
    pub fn find_user_profile(
        &self,
        name: &str,
        bucket_width_secs: i64,
        since: Timestamp,
    ) -> Result<UserProfile> {
        if bucket_width_secs <= 0 {
            return Err(GraphError::InvalidArgument(
                "bucket width must be positive".to_string(),
            ));
        }
        self.metrics.record_query();
        let inner = self.inner.read();
        let record = inner
            .get(name)
            .ok_or_else(|| GraphError::NotFound(name.to_string()))?;

        let friend_count_by_time =
            histogram(record.friends_out.values(), bucket_width_secs, since);
        let referral_count_by_time =
            histogram(record.referrals_out.values(), bucket_width_secs, since);
        let total_friend_count = friend_count_by_time.iter().map(|b| b.count).sum();
        let total_referral_count = referral_count_by_time.iter().map(|b| b.count).sum();
        Ok(UserProfile {
            name: name.to_string(),
            friend_count_by_time,
            referral_count_by_time,
            total_friend_count,
            total_referral_count,
        })
    }
}

fn histogram<'a>(
    timestamps: impl Iterator<Item = &'a Timestamp>,
    width_secs: i64,
    since: Timestamp,
) -> Vec<CountByTime> {
    let mut buckets: BTreeMap<i64, usize> = BTreeMap::new();
    for ts in timestamps.filter(|ts| **ts >= since) {
        *buckets
            .entry(time_bucket::bucket_start(*ts, width_secs))
            .or_insert(0) += 1;
    }
    buckets
        .into_iter()
        .map(|(time, count)| CountByTime { time, count })
        .collect()
}
