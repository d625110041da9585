//! The graph store, its ingestion transactor and its query engine.

mod config;
mod core;
mod metrics;
pub mod query;
mod transaction;


pub use config::Config;
pub use core::SocialGraph;
pub use metrics::{MetricsSnapshot, StoreMetrics};
pub use query::{
    CountByTime, FriendEntry, FriendPage, ReferralPair, ReferrerCount, UserNetwork, UserProfile,
    UserScore,
};
pub use transaction::{
    BatchSummary, ConnectionEvent, EventBatch, FriendAdd, Referral, Registration, Unfriend,
};
