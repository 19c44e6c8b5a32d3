//! Storage backends.
//!
//! - `local`: the JSON snapshot file, overwritten every cycle
//! - `dynamodb`: one unconditional put per listing (feature `dynamodb`)

#[cfg(feature = "dynamodb")]
pub mod dynamodb;
pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::StoreRecord;

// Re-export for convenience
#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoStore;
pub use local::SnapshotStore;

/// Trait for remote record stores.
///
/// Upserts are unconditional overwrites: the last write for an item identity
/// wins, and concurrent writers are not coordinated.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert or overwrite one record.
    async fn upsert(&self, record: &StoreRecord) -> Result<()>;

    /// Human-readable destination for log lines.
    fn describe(&self) -> String;
}
