//! Scored leaderboards: influence, recent activity strength, referral reach.

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::db::core::{GraphInner, SocialGraph, UserRecord};
use crate::model::Timestamp;

/// A leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserScore {
    /// User name.
    pub name: String,
    /// The leaderboard's score for this user.
    pub score: usize,
}

impl SocialGraph {
    /// Top `limit` users by influence: friend edges in both directions,
    /// referrals made, referrals received, plus distinct referees reachable
    /// within two `REFERRED` hops. With `friends_of`, only that user's
    /// direct friends are candidates (empty if the scope user is unknown).
    pub fn find_influential_users(&self, limit: usize, friends_of: Option<&str>) -> Vec<UserScore> {
        self.metrics.record_query();
        let inner = self.inner.read();
        let mut scores: Vec<UserScore> = match friends_of {
            Some(scope) => inner
                .get(scope)
                .map(|record| {
                    record
                        .friends_out
                        .keys()
                        .filter_map(|name| {
                            inner.get(name).map(|candidate| UserScore {
                                name: name.clone(),
                                score: influence(&inner, candidate),
                            })
                        })
                        .collect()
                })
                .unwrap_or_default(),
            None => inner
                .iter()
                .map(|(name, record)| UserScore {
                    name: name.to_string(),
                    score: influence(&inner, record),
                })
                .collect(),
        };
        rank(&mut scores, limit);
        scores
    }

    /// Top `limit` users by activity since `since`: friend edges in either
    /// direction plus referrals made plus referrals received, counting only
    /// edges with `created_at >= since`. Zero-score users still rank.
    pub fn find_strength_leaderboard(&self, limit: usize, since: Timestamp) -> Vec<UserScore> {
        self.metrics.record_query();
        let inner = self.inner.read();
        let mut scores: Vec<UserScore> = inner
            .iter()
            .map(|(name, record)| UserScore {
                name: name.to_string(),
                score: count_since(record.friends_out.values(), since)
                    + count_since(record.friends_in.values(), since)
                    + count_since(record.referrals_out.values(), since)
                    + count_since(record.referrals_in.values(), since),
            })
            .collect();
        rank(&mut scores, limit);
        scores
    }

    /// Top `limit` users by distinct referees reachable via 1 or 2 chained
    /// `REFERRED` hops where every edge on the path has
    /// `created_at >= since`. A referee reachable by both a 1-hop and a
    /// 2-hop path counts once; users with no qualifying path do not appear.
    pub fn find_referral_leaderboard(&self, limit: usize, since: Timestamp) -> Vec<UserScore> {
        self.metrics.record_query();
        let inner = self.inner.read();
        let mut scores: Vec<UserScore> = inner
            .iter()
            .filter_map(|(name, record)| {
                let score = referral_reach(&inner, record, Some(since));
                (score > 0).then(|| UserScore {
                    name: name.to_string(),
                    score,
                })
            })
            .collect();
        rank(&mut scores, limit);
        scores
    }
}

fn influence(inner: &GraphInner, record: &UserRecord) -> usize {
    record.friends_out.len()
        + record.friends_in.len()
        + record.referrals_out.len()
        + record.referrals_in.len()
        + referral_reach(inner, record, None)
}

/// Distinct users reachable from `record` via 1..=2 outgoing referral hops.
/// With a cutoff, every hop on the path must satisfy `created_at >= since`.
fn referral_reach(inner: &GraphInner, record: &UserRecord, since: Option<Timestamp>) -> usize {
    let qualifies = |ts: Timestamp| since.map_or(true, |cutoff| ts >= cutoff);
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for (first, first_ts) in &record.referrals_out {
        if !qualifies(*first_ts) {
            continue;
        }
        seen.insert(first.as_str());
        if let Some(next) = inner.get(first) {
            for (second, second_ts) in &next.referrals_out {
                if qualifies(*second_ts) {
                    seen.insert(second.as_str());
                }
            }
        }
    }
    seen.len()
}

fn count_since<'a>(timestamps: impl Iterator<Item = &'a Timestamp>, since: Timestamp) -> usize {
    timestamps.filter(|ts| **ts >= since).count()
}

/// Descending by score; ties resolve by name so results are reproducible,
/// though callers must not rely on the tie order.
fn rank(scores: &mut Vec<UserScore>, limit: usize) {
    scores.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
    scores.truncate(limit);
}
