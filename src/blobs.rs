use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::keys;
use crate::reader;
use crate::store::OrderedStore;
use crate::writer::BlobWriter;
use crate::{BlobConfig, BlobError, BlobResult, ByteStream, WriteOptions, WriteReceipt};

/// Sub-namespace the facade carves out of the injected store
const NAMESPACE: &[u8] = b"blobs";

/// Blob storage over an injected ordered key-value store.
///
/// Blobs are stored as runs of fixed-size blocks under a dedicated
/// sub-namespace of the store. Writes are serialized by a per-instance lock
/// (concurrent `put` calls queue FIFO); reads take no lock and may observe a
/// blob mid-write as the prefix of blocks committed so far.
pub struct Blobs {
    store: Arc<dyn OrderedStore>,
    lock: Arc<Mutex<()>>,
    config: BlobConfig,
}

impl Blobs {
    /// Create a blob store with default configuration
    pub fn new<S: OrderedStore + 'static>(store: S) -> Self {
        Self::with_config(store, BlobConfig::default())
    }

    /// Create a blob store with explicit configuration
    pub fn with_config<S: OrderedStore + 'static>(store: S, config: BlobConfig) -> Self {
        Self {
            store: store.sub(NAMESPACE),
            lock: Arc::new(Mutex::new(())),
            config,
        }
    }

    /// Configured block size in bytes
    pub fn block_size(&self) -> usize {
        self.config.block_size
    }

    /// Configured batch commit threshold in bytes
    pub fn buffer_size(&self) -> usize {
        self.config.buffer_size
    }

    /// Full configuration
    pub fn config(&self) -> &BlobConfig {
        &self.config
    }

    /// True while a write session holds the lock
    pub fn is_locked(&self) -> bool {
        self.lock.try_lock().is_err()
    }

    /// The namespaced store handle blocks are kept in.
    ///
    /// Useful for direct inspection; block sub-keys are built with the
    /// [`keys`](crate::keys) module.
    pub fn store(&self) -> Arc<dyn OrderedStore> {
        self.store.clone()
    }

    /// Store a whole blob in one call.
    ///
    /// Sugar over `create_write_stream` + one `write` + `finish`. An empty
    /// `data` commits zero blocks and reads back as empty content,
    /// indistinguishable from an absent blob.
    #[instrument(skip(self, data), fields(key = %key, bytes = data.len()))]
    pub async fn put(&self, key: &str, data: &[u8]) -> BlobResult<WriteReceipt> {
        self.put_with(key, data, WriteOptions::new()).await
    }

    /// Store a whole blob with per-write size overrides
    #[instrument(skip(self, data, opts), fields(key = %key, bytes = data.len()))]
    pub async fn put_with(
        &self,
        key: &str,
        data: &[u8],
        opts: WriteOptions,
    ) -> BlobResult<WriteReceipt> {
        let mut writer = self.create_write_stream_with(key, opts)?;
        writer.write(data).await?;
        writer.finish().await
    }

    /// Read a whole blob into memory.
    ///
    /// Sugar over draining `create_read_stream` and concatenating. Returns
    /// empty bytes for an absent blob.
    #[instrument(skip(self), fields(key = %key))]
    pub async fn get(&self, key: &str) -> BlobResult<Bytes> {
        let mut stream = self.create_read_stream(key)?;
        let mut content = BytesMut::new();
        while let Some(block) = stream.next().await {
            content.extend_from_slice(&block?);
        }
        Ok(content.freeze())
    }

    /// Open a streaming writer for one blob.
    ///
    /// The store-ready wait and lock acquisition happen on the writer's
    /// first `write` (or `finish`) call, not here.
    pub fn create_write_stream(&self, key: &str) -> BlobResult<BlobWriter> {
        self.create_write_stream_with(key, WriteOptions::new())
    }

    /// Open a streaming writer with per-write size overrides
    pub fn create_write_stream_with(
        &self,
        key: &str,
        opts: WriteOptions,
    ) -> BlobResult<BlobWriter> {
        keys::validate_key(key)?;
        let block_size = opts.block_size.unwrap_or(self.config.block_size);
        let buffer_size = opts.buffer_size.unwrap_or(self.config.buffer_size);
        if block_size == 0 {
            return Err(BlobError::invalid("block_size must be non-zero"));
        }
        if buffer_size == 0 {
            return Err(BlobError::invalid("buffer_size must be non-zero"));
        }
        Ok(BlobWriter::new(
            self.store.clone(),
            self.lock.clone(),
            key.to_string(),
            block_size,
            buffer_size,
        ))
    }

    /// Open a streaming reader over one blob's blocks.
    ///
    /// Takes no lock; runs concurrently with other readers and with an
    /// in-progress write.
    pub fn create_read_stream(&self, key: &str) -> BlobResult<ByteStream> {
        keys::validate_key(key)?;
        Ok(reader::read_blocks(self.store.clone(), key.to_string()))
    }
}
