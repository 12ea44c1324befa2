//! In-memory holder of the latest snapshot

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::models::{Account, Position, Snapshot, Trade};

/// Single-slot snapshot store.
///
/// Each ingest swaps in a complete new [`Snapshot`] under the write lock, so
/// readers see either the previous snapshot or the new one, never a mix.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the held snapshot, stamping it with the current time.
    /// Returns that timestamp.
    pub fn replace(
        &self,
        account: Option<Account>,
        trades: Vec<Trade>,
        positions: Vec<Position>,
    ) -> DateTime<Utc> {
        let last_update = Utc::now();
        let snapshot = Arc::new(Snapshot {
            account,
            trades,
            positions,
            last_update: Some(last_update),
        });

        *self.current.write() = snapshot;
        last_update
    }

    /// Current snapshot, or the empty one before the first ingest
    #[must_use]
    pub fn read(&self) -> Arc<Snapshot> {
        Arc::clone(&*self.current.read())
    }

    /// True until the first ingest
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.read().last_update.is_none()
    }
}
