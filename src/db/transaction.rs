//! Batch ingestion: event normalization and the atomic transactor.

use std::time::Instant;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::core::{GraphInner, SocialGraph};
use crate::error::{GraphError, Result};
use crate::model::Timestamp;
use crate::time_bucket;

/// A typed event as delivered by the external event source. Timestamps are
/// still in the compact `YYYYMMDDThhmmssfffZ` wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConnectionEvent {
    /// A user registration.
    Register {
        /// User name.
        name: String,
        /// Compact registration timestamp.
        created_at: String,
    },
    /// `referred_by` referred `user`.
    Referral {
        /// The referrer.
        #[serde(rename = "referredBy")]
        referred_by: String,
        /// The referee.
        user: String,
        /// Compact referral timestamp.
        created_at: String,
    },
    /// A mutual friendship between two users.
    AddFriend {
        /// One endpoint.
        user1_name: String,
        /// The other endpoint.
        user2_name: String,
        /// Compact friendship timestamp.
        created_at: String,
    },
    /// Dissolution of a friendship.
    Unfriend {
        /// One endpoint.
        user1_name: String,
        /// The other endpoint.
        user2_name: String,
    },
}

/// A normalized registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// User name.
    pub name: String,
    /// Registration timestamp.
    pub created_at: Timestamp,
}

/// A normalized referral.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Referral {
    /// The referrer.
    pub referred_by: String,
    /// The referee.
    pub user: String,
    /// Referral timestamp.
    pub created_at: Timestamp,
}

/// A normalized friend-add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendAdd {
    /// One endpoint.
    pub user1: String,
    /// The other endpoint.
    pub user2: String,
    /// Friendship timestamp.
    pub created_at: Timestamp,
}

/// A normalized unfriend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unfriend {
    /// One endpoint.
    pub user1: String,
    /// The other endpoint.
    pub user2: String,
}

/// One atomic unit of ingestion: four independent event lists applied in a
/// fixed order (registrations, referrals, friend-adds, unfriends) so that
/// relationship events may reference users registered earlier in the same
/// batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventBatch {
    /// User registrations, applied first.
    pub registrations: Vec<Registration>,
    /// Referrals, applied second.
    pub referrals: Vec<Referral>,
    /// Friend-adds, applied third.
    pub friend_adds: Vec<FriendAdd>,
    /// Unfriends, applied last.
    pub unfriends: Vec<Unfriend>,
}

impl EventBatch {
    /// An empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes a slice of wire events into a batch, losslessly converting
    /// every compact timestamp.
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] on the first malformed timestamp;
    /// nothing is normalized partially.
    pub fn from_events(events: &[ConnectionEvent]) -> Result<Self> {
        let mut batch = Self::new();
        for event in events {
            match event {
                ConnectionEvent::Register { name, created_at } => {
                    batch.registrations.push(Registration {
                        name: name.clone(),
                        created_at: time_bucket::parse_compact_timestamp(created_at)?,
                    });
                }
                ConnectionEvent::Referral {
                    referred_by,
                    user,
                    created_at,
                } => {
                    batch.referrals.push(Referral {
                        referred_by: referred_by.clone(),
                        user: user.clone(),
                        created_at: time_bucket::parse_compact_timestamp(created_at)?,
                    });
                }
                ConnectionEvent::AddFriend {
                    user1_name,
                    user2_name,
                    created_at,
                } => {
                    batch.friend_adds.push(FriendAdd {
                        user1: user1_name.clone(),
                        user2: user2_name.clone(),
                        created_at: time_bucket::parse_compact_timestamp(created_at)?,
                    });
                }
                ConnectionEvent::Unfriend {
                    user1_name,
                    user2_name,
                } => {
                    batch.unfriends.push(Unfriend {
                        user1: user1_name.clone(),
                        user2: user2_name.clone(),
                    });
                }
            }
        }
        Ok(batch)
    }

    /// Appends a registration.
    pub fn register(mut self, name: &str, created_at: Timestamp) -> Self {
        self.registrations.push(Registration {
            name: name.to_string(),
            created_at,
        });
        self
    }

    /// Appends a referral of `user` by `referred_by`.
    pub fn refer(mut self, referred_by: &str, user: &str, created_at: Timestamp) -> Self {
        self.referrals.push(Referral {
            referred_by: referred_by.to_string(),
            user: user.to_string(),
            created_at,
        });
        self
    }

    /// Appends a friend-add.
    pub fn add_friend(mut self, user1: &str, user2: &str, created_at: Timestamp) -> Self {
        self.friend_adds.push(FriendAdd {
            user1: user1.to_string(),
            user2: user2.to_string(),
            created_at,
        });
        self
    }

    /// Appends an unfriend.
    pub fn unfriend(mut self, user1: &str, user2: &str) -> Self {
        self.unfriends.push(Unfriend {
            user1: user1.to_string(),
            user2: user2.to_string(),
        });
        self
    }

    /// Total events across the four lists.
    pub fn len(&self) -> usize {
        self.registrations.len() + self.referrals.len() + self.friend_adds.len()
            + self.unfriends.len()
    }

    /// Whether the batch carries no events at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What a committed batch did to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Events in the batch.
    pub events: usize,
    /// Users created (registrations of already-known names don't count).
    pub users_created: usize,
    /// Referral edges created.
    pub referral_edges_created: usize,
    /// Directed friend entries created (a new friendship contributes 2).
    pub friend_edges_created: usize,
    /// Directed friend entries removed.
    pub friend_edges_removed: usize,
}

impl SocialGraph {
    /// Applies one batch as a single atomic unit: either all four sub-batches
    /// take effect or none do.
    ///
    /// Every referral and friend-add endpoint is validated against the store
    /// and this batch's registrations before the first mutation, so a failed
    /// batch leaves no partial state behind. Re-applying an identical batch
    /// is a state no-op: user and edge merges are create-only and unfriends
    /// tolerate absence. The transactor never retries internally; that
    /// idempotency is what makes external redelivery safe.
    ///
    /// # Errors
    /// * [`GraphError::MissingEndpoint`] - a referral or friend-add
    ///   references a user absent from both the store and this batch's
    ///   registrations.
    /// * [`GraphError::TransactionFailure`] - the batch exceeds
    ///   [`crate::Config::max_batch_events`].
    ///
    /// # Example
    /// ```rust
    /// use amicus::{EventBatch, SocialGraph};
    ///
    /// let graph = SocialGraph::new();
    /// let batch = EventBatch::new()
    ///     .register("alice", 1_000)
    ///     .register("bob", 2_000)
    ///     .refer("alice", "bob", 3_000);
    /// let summary = graph.apply_batch(&batch)?;
    /// assert_eq!(summary.users_created, 2);
    /// assert_eq!(summary.referral_edges_created, 1);
    /// # Ok::<(), amicus::GraphError>(())
    /// ```
    pub fn apply_batch(&self, batch: &EventBatch) -> Result<BatchSummary> {
        let start = Instant::now();
        let events = batch.len();
        debug!(events, "applying ingestion batch");

        let mut inner = self.inner.write();

        if let Some(max) = self.config.max_batch_events {
            if events > max {
                self.metrics.record_rollback();
                warn!(events, max, "ingestion batch rolled back: event ceiling exceeded");
                return Err(GraphError::TransactionFailure(format!(
                    "batch of {events} events exceeds ceiling of {max}"
                )));
            }
        }

        if let Err(err) = validate_endpoints(&inner, batch) {
            self.metrics.record_rollback();
            warn!(error = %err, "ingestion batch rolled back");
            return Err(err);
        }

        let mut summary = BatchSummary {
            events,
            ..BatchSummary::default()
        };
        for registration in &batch.registrations {
            if inner.upsert_user(&registration.name, registration.created_at) {
                summary.users_created += 1;
            }
        }
        // Endpoints were validated above; merges cannot fail past this point.
        for referral in &batch.referrals {
            if inner.merge_referral_edge(
                &referral.referred_by,
                &referral.user,
                referral.created_at,
            )? {
                summary.referral_edges_created += 1;
            }
        }
        for friend_add in &batch.friend_adds {
            summary.friend_edges_created += inner.merge_friend_edge(
                &friend_add.user1,
                &friend_add.user2,
                friend_add.created_at,
            )?;
        }
        for unfriend in &batch.unfriends {
            summary.friend_edges_removed +=
                inner.remove_friend_edge(&unfriend.user1, &unfriend.user2);
        }
        drop(inner);

        self.metrics.record_commit(events as u64);
        info!(
            events,
            users_created = summary.users_created,
            referral_edges_created = summary.referral_edges_created,
            friend_edges_created = summary.friend_edges_created,
            friend_edges_removed = summary.friend_edges_removed,
            duration_ms = start.elapsed().as_millis() as u64,
            "ingestion batch committed"
        );
        Ok(summary)
    }
}

fn validate_endpoints(inner: &GraphInner, batch: &EventBatch) -> Result<()> {
    let mut registered: FxHashSet<&str> = FxHashSet::default();
    for registration in &batch.registrations {
        registered.insert(registration.name.as_str());
    }
    let known = |name: &str| registered.contains(name) || inner.contains_user(name);

    for referral in &batch.referrals {
        for name in [referral.referred_by.as_str(), referral.user.as_str()] {
            if !known(name) {
                return Err(GraphError::MissingEndpoint(name.to_string()));
            }
        }
    }
    for friend_add in &batch.friend_adds {
        for name in [friend_add.user1.as_str(), friend_add.user2.as_str()] {
            if !known(name) {
                return Err(GraphError::MissingEndpoint(name.to_string()));
            }
        }
    }
    Ok(())
}
