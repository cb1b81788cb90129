//! Storage abstractions for snapshot persistence.
//!
//! The snapshot is a single keyed JSON document (one entry per tracked
//! promotion, keyed by record id). The local backend keeps it on disk and
//! replaces the whole file atomically on save.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Snapshot;

// Re-export for convenience
pub use local::LocalSnapshotStore;

/// Trait for snapshot storage backends.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the persisted snapshot.
    ///
    /// A missing or unparseable snapshot yields the empty state; cold start
    /// is not an error.
    async fn load(&self) -> Result<Snapshot>;

    /// Atomically replace the persisted snapshot.
    async fn save(&self, snapshot: &Snapshot) -> Result<()>;
}
