/// Configuration for a blob store
#[derive(Debug, Clone)]
pub struct BlobConfig {
    /// Size in bytes of each stored block; bounds individual record size.
    /// Must stay consistent across all writes of a given blob.
    pub block_size: usize,

    /// Bytes queued in an open batch before it is committed; bounds
    /// write-side memory and trades commit count against latency.
    pub buffer_size: usize,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            block_size: 512 * 1024,        // 512KB
            buffer_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

impl BlobConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stored block size
    pub fn with_block_size(mut self, bytes: usize) -> Self {
        self.block_size = bytes;
        self
    }

    /// Set the batch commit threshold
    pub fn with_buffer_size(mut self, bytes: usize) -> Self {
        self.buffer_size = bytes;
        self
    }
}

/// Per-write overrides of the configured sizes
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Override the block size for this write
    pub block_size: Option<usize>,

    /// Override the batch commit threshold for this write
    pub buffer_size: Option<usize>,
}

impl WriteOptions {
    /// Create options that keep the configured sizes
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the block size
    pub fn with_block_size(mut self, bytes: usize) -> Self {
        self.block_size = Some(bytes);
        self
    }

    /// Override the batch commit threshold
    pub fn with_buffer_size(mut self, bytes: usize) -> Self {
        self.buffer_size = Some(bytes);
        self
    }
}
