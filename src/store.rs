use async_trait::async_trait;
use bytes::Bytes;
use futures_core::Stream;
use std::pin::Pin;
use std::sync::Arc;

use crate::StoreResult;

/// Stream of entries produced by a range scan, in ascending key order
pub type EntryStream = Pin<Box<dyn Stream<Item = StoreResult<StoreEntry>> + Send>>;

/// Ordered key-value store operations - must be implemented by all storage backends.
///
/// Keys are raw byte sequences compared lexicographically. The blob layer
/// depends on three store guarantees: range scans deliver entries in ascending
/// key order, batches commit atomically, and sub-stores of distinct
/// namespaces never collide.
#[async_trait]
pub trait OrderedStore: Send + Sync {
    /// Wait until the store is ready to accept operations
    async fn ready(&self) -> StoreResult<()>;

    /// Derive a logically isolated sub-store.
    ///
    /// Keys passed to and returned from the sub-store are relative to its
    /// namespace. Implementations must frame the namespace so that no key of
    /// one namespace can alias a key of another.
    fn sub(&self, namespace: &[u8]) -> Arc<dyn OrderedStore>;

    /// Open a new write batch
    fn batch(&self) -> Box<dyn StoreBatch>;

    /// Look up a single key
    async fn get(&self, key: &[u8]) -> StoreResult<Option<Bytes>>;

    /// Scan a key range in ascending order.
    ///
    /// Both bounds are exclusive when present. Entries become visible to
    /// scans only once the batch that wrote them has committed.
    fn scan(&self, range: ScanRange) -> EntryStream;
}

/// A set of key-value writes committed atomically
#[async_trait]
pub trait StoreBatch: Send + Sync {
    /// Stage a key-value pair; nothing is durable until `flush`
    fn put(&mut self, key: Bytes, value: Bytes);

    /// Commit every staged pair atomically, consuming the batch
    async fn flush(self: Box<Self>) -> StoreResult<()>;
}

/// Bounds for an ascending range scan
#[derive(Debug, Clone, Default)]
pub struct ScanRange {
    /// Exclusive lower bound; `None` scans from the start
    pub gt: Option<Bytes>,

    /// Exclusive upper bound; `None` scans to the end
    pub lt: Option<Bytes>,

    /// Maximum number of entries to yield; `None` is unbounded
    pub limit: Option<usize>,
}

impl ScanRange {
    /// Create an unbounded scan
    pub fn all() -> Self {
        Self::default()
    }

    /// Set the exclusive lower bound
    pub fn greater_than<B: Into<Bytes>>(mut self, bound: B) -> Self {
        self.gt = Some(bound.into());
        self
    }

    /// Set the exclusive upper bound
    pub fn less_than<B: Into<Bytes>>(mut self, bound: B) -> Self {
        self.lt = Some(bound.into());
        self
    }

    /// Cap the number of entries yielded
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A single key-value entry yielded by a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEntry {
    pub key: Bytes,
    pub value: Bytes,
}
