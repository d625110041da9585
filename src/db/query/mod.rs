//! The fixed set of analytical queries, one file per family.

mod integrity;
mod leaderboard;
mod network;
mod profile;

pub use integrity::{ReferralPair, ReferrerCount};
pub use leaderboard::UserScore;
pub use network::{FriendEntry, FriendPage, UserNetwork};
pub use profile::{CountByTime, UserProfile};
