//! The public store facade.

use parking_lot::RwLock;
use tracing::info;

use super::graph::GraphInner;
use crate::db::config::Config;
use crate::db::metrics::{MetricsSnapshot, StoreMetrics};
use crate::model::User;

/// An embedded social-relationship graph store.
///
/// The store owns all node and edge data behind a single [`RwLock`]:
/// mutating batches take the write lock and are therefore serialized, while
/// queries share the read lock and observe only fully committed state; a
/// reader never sees a half-applied batch.
///
/// # Example
///
/// ```rust
/// use amicus::{EventBatch, SocialGraph};
///
/// let graph = SocialGraph::new();
/// let batch = EventBatch::new()
///     .register("alice", 1_000)
///     .register("bob", 2_000)
///     .add_friend("alice", "bob", 3_000);
/// graph.apply_batch(&batch)?;
///
/// assert_eq!(graph.user_count(), 2);
/// assert_eq!(graph.count_total_friends("alice"), 1);
/// # Ok::<(), amicus::GraphError>(())
/// ```
#[derive(Debug)]
pub struct SocialGraph {
    pub(crate) inner: RwLock<GraphInner>,
    pub(crate) config: Config,
    pub(crate) metrics: StoreMetrics,
}

impl SocialGraph {
    /// Creates an empty store with the default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty store with an explicit configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            inner: RwLock::new(GraphInner::default()),
            config,
            metrics: StoreMetrics::default(),
        }
    }

    /// The configuration this store was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A point-in-time view of the store's counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Zeroes the store's counters.
    pub fn reset_metrics(&self) {
        self.metrics.reset();
    }

    /// Point lookup: the user's name and first-registration timestamp.
    pub fn user(&self, name: &str) -> Option<User> {
        self.inner.read().user(name)
    }

    /// Whether a user with this name exists.
    pub fn contains_user(&self, name: &str) -> bool {
        self.inner.read().contains_user(name)
    }

    /// Total number of users.
    pub fn user_count(&self) -> usize {
        self.inner.read().user_count()
    }

    /// Total directed friend entries (a friendship contributes 2).
    pub fn friend_edge_count(&self) -> usize {
        self.inner.read().friend_edge_count()
    }

    /// Total referral edges.
    pub fn referral_edge_count(&self) -> usize {
        self.inner.read().referral_edge_count()
    }

    /// Clears the entire store. Returns how many users were removed.
    pub fn delete_all_data(&self) -> usize {
        let removed = self.inner.write().delete_all();
        info!(users_removed = removed, "graph store cleared");
        removed
    }

    /// Removes the named users and all edges touching them, cascading.
    /// Unknown names are ignored. Returns how many users were removed.
    pub fn delete_specific_users<S: AsRef<str>>(&self, names: &[S]) -> usize {
        let removed = self
            .inner
            .write()
            .delete_users(names.iter().map(|n| n.as_ref()));
        info!(
            requested = names.len(),
            users_removed = removed,
            "users deleted"
        );
        removed
    }
}

impl Default for SocialGraph {
    fn default() -> Self {
        Self::new()
    }
}
