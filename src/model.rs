//! Core data types shared across the store, transactor and queries.

use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch.
///
/// The compact wire format carries millisecond precision, so storing
/// milliseconds keeps the conversion lossless. Bucket arithmetic happens in
/// whole seconds (see [`crate::time_bucket::bucket_start`]).
pub type Timestamp = i64;

/// The epoch itself, used as the unbounded lower cutoff.
pub const EPOCH: Timestamp = 0;

/// A user node. The name is the primary identifier: globally unique and
/// immutable. `created_at` is set once on first registration and never
/// overwritten by later registration attempts for the same name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Globally unique user name.
    pub name: String,
    /// First-registration timestamp.
    pub created_at: Timestamp,
}
