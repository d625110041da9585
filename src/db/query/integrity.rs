//! Integrity scans over the referral graph.

use serde::Serialize;

use crate::db::core::SocialGraph;

/// Two users who referred each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferralPair {
    /// The lexicographically smaller name.
    pub user1: String,
    /// The lexicographically larger name.
    pub user2: String,
}

/// A user with more than one referrer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferrerCount {
    /// The referred user.
    pub name: String,
    /// Distinct incoming referral edges.
    pub count: usize,
}

impl SocialGraph {
    /// All unordered pairs {A, B} where A referred B and B referred A, each
    /// pair reported once. Self-referrals are not circular.
    pub fn find_circular_referrals(&self) -> Vec<ReferralPair> {
        self.metrics.record_query();
        let inner = self.inner.read();
        let mut pairs = Vec::new();
        for (name, record) in inner.iter() {
            for referee in record.referrals_out.keys() {
                if name >= referee.as_str() {
                    continue;
                }
                let reciprocal = inner
                    .get(referee)
                    .is_some_and(|other| other.referrals_out.contains_key(name));
                if reciprocal {
                    pairs.push(ReferralPair {
                        user1: name.to_string(),
                        user2: referee.clone(),
                    });
                }
            }
        }
        pairs
    }

    /// All users with two or more distinct referrers, with their referrer
    /// count, descending by count.
    pub fn find_users_with_multiple_referrers(&self) -> Vec<ReferrerCount> {
        self.metrics.record_query();
        let inner = self.inner.read();
        let mut counts: Vec<ReferrerCount> = inner
            .iter()
            .filter_map(|(name, record)| {
                let count = record.referrals_in.len();
                (count >= 2).then(|| ReferrerCount {
                    name: name.to_string(),
                    count,
                })
            })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        counts
    }
}
