//! In-memory [`OrderedStore`] used by tests, examples, and benchmarks.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;

use crate::store::{EntryStream, OrderedStore, ScanRange, StoreBatch, StoreEntry};
use crate::StoreResult;

// Shared ordered map backing every sub-store handle
type SharedEntries = Arc<RwLock<BTreeMap<Vec<u8>, Bytes>>>;

/// Ordered store backed by a `BTreeMap`.
///
/// Sub-stores share the map and address it through a key prefix; batches
/// apply under one write lock, so committed entries appear atomically. Scans
/// snapshot the matching range at call time.
pub struct MemoryStore {
    entries: SharedEntries,
    prefix: Vec<u8>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(BTreeMap::new())),
            prefix: Vec::new(),
        }
    }

    fn absolute(&self, key: &[u8]) -> Vec<u8> {
        let mut absolute = Vec::with_capacity(self.prefix.len() + key.len());
        absolute.extend_from_slice(&self.prefix);
        absolute.extend_from_slice(key);
        absolute
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderedStore for MemoryStore {
    async fn ready(&self) -> StoreResult<()> {
        Ok(())
    }

    fn sub(&self, namespace: &[u8]) -> Arc<dyn OrderedStore> {
        // Terminate the namespace so "ab"+"c" can never alias "a"+"bc".
        let mut prefix = self.absolute(namespace);
        prefix.push(0x00);
        Arc::new(MemoryStore {
            entries: self.entries.clone(),
            prefix,
        })
    }

    fn batch(&self) -> Box<dyn StoreBatch> {
        Box::new(MemoryBatch {
            entries: self.entries.clone(),
            prefix: self.prefix.clone(),
            staged: Vec::new(),
        })
    }

    async fn get(&self, key: &[u8]) -> StoreResult<Option<Bytes>> {
        Ok(self.entries.read().get(&self.absolute(key)).cloned())
    }

    fn scan(&self, range: ScanRange) -> EntryStream {
        let snapshot: Vec<StoreEntry> = {
            let entries = self.entries.read();
            let mut out = Vec::new();
            for (key, value) in entries.range(self.prefix.clone()..) {
                if !key.starts_with(&self.prefix) {
                    break;
                }
                let relative = &key[self.prefix.len()..];
                if let Some(gt) = range.gt.as_deref() {
                    if relative <= gt {
                        continue;
                    }
                }
                if let Some(lt) = range.lt.as_deref() {
                    if relative >= lt {
                        break;
                    }
                }
                out.push(StoreEntry {
                    key: Bytes::copy_from_slice(relative),
                    value: value.clone(),
                });
                if let Some(limit) = range.limit {
                    if out.len() >= limit {
                        break;
                    }
                }
            }
            out
        };
        Box::pin(futures_util::stream::iter(snapshot.into_iter().map(Ok)))
    }
}

struct MemoryBatch {
    entries: SharedEntries,
    prefix: Vec<u8>,
    staged: Vec<(Bytes, Bytes)>,
}

#[async_trait]
impl StoreBatch for MemoryBatch {
    fn put(&mut self, key: Bytes, value: Bytes) {
        self.staged.push((key, value));
    }

    async fn flush(self: Box<Self>) -> StoreResult<()> {
        let MemoryBatch {
            entries,
            prefix,
            staged,
        } = *self;
        let mut map = entries.write();
        for (key, value) in staged {
            let mut absolute = Vec::with_capacity(prefix.len() + key.len());
            absolute.extend_from_slice(&prefix);
            absolute.extend_from_slice(&key);
            map.insert(absolute, value);
        }
        Ok(())
    }
}
