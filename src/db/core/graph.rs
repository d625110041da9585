//! Unlocked graph state and the store's mutation/lookup primitives.
//!
//! `GraphInner` is only ever touched through [`super::SocialGraph`]'s lock,
//! so every multi-edge mutation here is point-in-time consistent from a
//! reader's perspective.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};
use crate::model::{Timestamp, User};

/// Per-user adjacency record. Friendships are stored as a pair of directed
/// entries (the transactor maintains the symmetry invariant); referrals are
/// a single directed entry. `created_at` is the only edge property, so it is
/// the map value. Ordered maps give name-sorted iteration, which pagination
/// and deterministic tie-breaking rely on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct UserRecord {
    pub(crate) created_at: Timestamp,
    pub(crate) friends_out: BTreeMap<String, Timestamp>,
    pub(crate) friends_in: BTreeMap<String, Timestamp>,
    pub(crate) referrals_out: BTreeMap<String, Timestamp>,
    pub(crate) referrals_in: BTreeMap<String, Timestamp>,
}

impl UserRecord {
    fn new(created_at: Timestamp) -> Self {
        Self {
            created_at,
            ..Self::default()
        }
    }
}

/// The node/edge data itself, keyed by user name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct GraphInner {
    users: BTreeMap<String, UserRecord>,
}

impl GraphInner {
    /// Create-only merge: an existing user's `created_at` is never
    /// overwritten. Returns whether a user was created.
    pub(crate) fn upsert_user(&mut self, name: &str, created_at: Timestamp) -> bool {
        match self.users.entry(name.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(UserRecord::new(created_at));
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Creates the directed friend entries `u1 -> u2` and `u2 -> u1`, each
    /// only if absent, each keeping the `created_at` it was first created
    /// with. Returns how many directed entries were created (0..=2).
    pub(crate) fn merge_friend_edge(
        &mut self,
        u1: &str,
        u2: &str,
        created_at: Timestamp,
    ) -> Result<usize> {
        self.ensure_endpoint(u1)?;
        self.ensure_endpoint(u2)?;
        let mut created = 0;
        if self.link_friend(u1, u2, created_at) {
            created += 1;
        }
        if self.link_friend(u2, u1, created_at) {
            created += 1;
        }
        Ok(created)
    }

    /// Removes the friend entries between `u1` and `u2` in both directions.
    /// Absence (of the edge or of either user) is not an error. Returns how
    /// many directed entries were removed.
    pub(crate) fn remove_friend_edge(&mut self, u1: &str, u2: &str) -> usize {
        let mut removed = 0;
        if let Some(record) = self.users.get_mut(u1) {
            if record.friends_out.remove(u2).is_some() {
                removed += 1;
            }
            record.friends_in.remove(u2);
        }
        if let Some(record) = self.users.get_mut(u2) {
            if record.friends_out.remove(u1).is_some() {
                removed += 1;
            }
            record.friends_in.remove(u1);
        }
        removed
    }

    /// Creates the directed referral entry `referrer -> referee` if absent;
    /// an existing entry keeps its original `created_at`. Returns whether
    /// the entry was created.
    pub(crate) fn merge_referral_edge(
        &mut self,
        referrer: &str,
        referee: &str,
        created_at: Timestamp,
    ) -> Result<bool> {
        self.ensure_endpoint(referrer)?;
        self.ensure_endpoint(referee)?;
        let mut created = false;
        if let Some(record) = self.users.get_mut(referrer) {
            created = insert_if_absent(&mut record.referrals_out, referee, created_at);
        }
        if let Some(record) = self.users.get_mut(referee) {
            insert_if_absent(&mut record.referrals_in, referrer, created_at);
        }
        Ok(created)
    }

    /// Clears the entire store. Returns how many users were removed.
    pub(crate) fn delete_all(&mut self) -> usize {
        let removed = self.users.len();
        self.users.clear();
        removed
    }

    /// Removes the named users and every edge touching them. Unknown names
    /// are ignored. Returns how many users were actually removed.
    pub(crate) fn delete_users<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) -> usize {
        let mut removed = 0;
        for name in names {
            let Some(record) = self.users.remove(name) else {
                continue;
            };
            removed += 1;
            for peer in record.friends_out.keys() {
                if let Some(other) = self.users.get_mut(peer) {
                    other.friends_in.remove(name);
                }
            }
            for peer in record.friends_in.keys() {
                if let Some(other) = self.users.get_mut(peer) {
                    other.friends_out.remove(name);
                }
            }
            for peer in record.referrals_out.keys() {
                if let Some(other) = self.users.get_mut(peer) {
                    other.referrals_in.remove(name);
                }
            }
            for peer in record.referrals_in.keys() {
                if let Some(other) = self.users.get_mut(peer) {
                    other.referrals_out.remove(name);
                }
            }
        }
        removed
    }

    pub(crate) fn contains_user(&self, name: &str) -> bool {
        self.users.contains_key(name)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&UserRecord> {
        self.users.get(name)
    }

    pub(crate) fn user(&self, name: &str) -> Option<User> {
        self.users.get(name).map(|record| User {
            name: name.to_string(),
            created_at: record.created_at,
        })
    }

    /// Name-ordered iteration over every user record.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &UserRecord)> + '_ {
        self.users.iter().map(|(name, record)| (name.as_str(), record))
    }

    pub(crate) fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Total directed friend entries (a committed friendship contributes 2).
    pub(crate) fn friend_edge_count(&self) -> usize {
        self.users.values().map(|r| r.friends_out.len()).sum()
    }

    pub(crate) fn referral_edge_count(&self) -> usize {
        self.users.values().map(|r| r.referrals_out.len()).sum()
    }

    fn ensure_endpoint(&self, name: &str) -> Result<()> {
        if self.users.contains_key(name) {
            Ok(())
        } else {
            Err(GraphError::MissingEndpoint(name.to_string()))
        }
    }

    fn link_friend(&mut self, from: &str, to: &str, created_at: Timestamp) -> bool {
        let mut created = false;
        if let Some(record) = self.users.get_mut(from) {
            created = insert_if_absent(&mut record.friends_out, to, created_at);
        }
        if let Some(record) = self.users.get_mut(to) {
            insert_if_absent(&mut record.friends_in, from, created_at);
        }
        created
    }
}

fn insert_if_absent(edges: &mut BTreeMap<String, Timestamp>, peer: &str, ts: Timestamp) -> bool {
    match edges.entry(peer.to_string()) {
        Entry::Vacant(slot) => {
            slot.insert(ts);
            true
        }
        Entry::Occupied(_) => false,
    }
}
