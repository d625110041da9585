//! JSON snapshot persistence for the otherwise in-memory store.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use parking_lot::RwLock;
use tracing::info;

use super::graph::GraphInner;
use super::store::SocialGraph;
use crate::db::config::Config;
use crate::db::metrics::StoreMetrics;
use crate::error::Result;

impl SocialGraph {
    /// Writes the whole store to `path` as a JSON snapshot.
    ///
    /// The read lock is held for the duration, so the snapshot is a
    /// consistent point-in-time image. A failed write never modifies the
    /// in-memory state.
    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let inner = self.inner.read();
        let mut writer = BufWriter::new(File::create(path)?);
        if self.config.snapshot_pretty {
            serde_json::to_writer_pretty(&mut writer, &*inner)?;
        } else {
            serde_json::to_writer(&mut writer, &*inner)?;
        }
        writer.flush()?;
        info!(users = inner.user_count(), path = %path.display(), "snapshot saved");
        Ok(())
    }

    /// Rebuilds a store from a snapshot previously written by
    /// [`SocialGraph::save_snapshot`].
    pub fn load_snapshot(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        let path = path.as_ref();
        let inner: GraphInner = serde_json::from_reader(BufReader::new(File::open(path)?))?;
        info!(users = inner.user_count(), path = %path.display(), "snapshot loaded");
        Ok(Self {
            inner: RwLock::new(inner),
            config,
            metrics: StoreMetrics::default(),
        })
    }

    /// The snapshot as an in-memory JSON string.
    ///
    /// The user table and adjacency maps are ordered, so two stores holding
    /// identical graph state produce identical strings.
    pub fn snapshot_json(&self) -> Result<String> {
        let inner = self.inner.read();
        Ok(serde_json::to_string(&*inner)?)
    }
}
