//! Amicus: an embedded social-relationship graph store.
//!
//! The store owns a graph of users, friendships (symmetric, kept as a pair
//! of directed edges) and referrals (directed), fed by an atomic batch
//! transactor and queried through a fixed set of analytical operations:
//! network neighborhoods, activity leaderboards, bounded-depth referral
//! reach, time-bucketed profile histograms, pagination, and integrity scans
//! for circular referrals and multi-referrer users.
//!
//! Batches serialize on a write lock; queries share a read lock and never
//! observe a half-applied batch. State lives in memory, with JSON snapshot
//! persistence for deployments that want durability.
//!
//! ```rust
//! use amicus::{EventBatch, SocialGraph};
//!
//! let graph = SocialGraph::new();
//! graph.apply_batch(
//!     &EventBatch::new()
//!         .register("alice", 1_000)
//!         .register("bob", 2_000)
//!         .register("charlie", 3_000)
//!         .refer("alice", "bob", 4_000)
//!         .refer("bob", "charlie", 5_000)
//!         .add_friend("alice", "bob", 6_000),
//! )?;
//!
//! let network = graph.find_user_network("bob")?;
//! assert_eq!(network.friends, vec!["alice"]);
//! assert_eq!(network.referred, vec!["charlie"]);
//! assert_eq!(network.referred_by.as_deref(), Some("alice"));
//! # Ok::<(), amicus::GraphError>(())
//! ```

pub mod data_generator;
pub mod db;
pub mod error;
pub mod model;
pub mod time_bucket;

pub use db::{
    BatchSummary, Config, ConnectionEvent, CountByTime, EventBatch, FriendAdd, FriendEntry,
    FriendPage, MetricsSnapshot, Referral, ReferralPair, ReferrerCount, Registration, SocialGraph,
    StoreMetrics, Unfriend, UserNetwork, UserProfile, UserScore,
};
pub use error::{GraphError, Result};
pub use model::{Timestamp, User, EPOCH};
