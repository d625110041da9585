//! Store configuration.

/// Tuning knobs for a [`crate::SocialGraph`].
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Ceiling on events per ingestion batch. A batch exceeding it is
    /// rolled back whole with
    /// [`crate::GraphError::TransactionFailure`]. `None` means unbounded.
    pub max_batch_events: Option<usize>,
    /// Pretty-print JSON snapshots. Larger files, diffable output.
    pub snapshot_pretty: bool,
}

impl Config {
    /// A configuration that caps ingestion batches at `max_events`.
    pub fn bounded(max_events: usize) -> Self {
        Self {
            max_batch_events: Some(max_events),
            ..Self::default()
        }
    }

    /// Human-inspectable snapshots for archival deployments.
    pub fn archival() -> Self {
        Self {
            snapshot_pretty: true,
            ..Self::default()
        }
    }
}
