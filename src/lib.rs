//! # blobwise: chunked blob storage over ordered key-value stores
//!
//! `blobwise` stores arbitrary-length binary objects in any ordered key-value
//! store by slicing them into fixed-size blocks, writing each block under an
//! order-preserving sub-key, and reassembling blobs with a single range scan.
//! It handles the chunking, batching, and locking so services work with plain
//! byte streams.
//!
//! ## Key Features
//!
//! - **Chunking-independent writes**: callers write chunks of any size;
//!   stored blocks are exactly the configured block size regardless
//! - **Bounded memory**: blocks commit in size-capped batches, so writing a
//!   huge blob never buffers more than the configured threshold
//! - **Order-preserving keys**: block sub-keys sort numerically under the
//!   store's lexicographic order, for any number of blocks
//! - **Single-writer discipline**: concurrent writes to one store handle
//!   queue FIFO behind a lock; reads stay lock-free and concurrent
//! - **Store agnostic**: depends on a narrow [`OrderedStore`] trait; an
//!   in-memory implementation ships for tests and benchmarks
//!
//! ## Quick Start
//!
//! ```rust
//! use blobwise::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> BlobResult<()> {
//! // 1. Wrap any ordered key-value store (in-memory store shown here)
//! let blobs = Blobs::new(MemoryStore::new());
//!
//! // 2. Store a blob; it is sliced into fixed-size blocks
//! let receipt = blobs.put("hello.txt", b"hello blobwise").await?;
//! assert_eq!(receipt.bytes, 14);
//!
//! // 3. Read it back whole
//! let content = blobs.get("hello.txt").await?;
//! assert_eq!(&content[..], b"hello blobwise");
//! # Ok(())
//! # }
//! ```
//!
//! ## Streaming
//!
//! Both sides stream: the writer accepts chunks incrementally and the reader
//! yields one block at a time, so neither end holds a whole blob in memory.
//!
//! ```rust
//! use blobwise::prelude::*;
//! use futures_util::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() -> BlobResult<()> {
//! let config = BlobConfig::new().with_block_size(64 * 1024);
//! let blobs = Blobs::with_config(MemoryStore::new(), config);
//!
//! let mut writer = blobs.create_write_stream("upload")?;
//! writer.write(b"first chunk").await?;
//! writer.write(b"second chunk").await?;
//! let receipt = writer.finish().await?;
//! assert_eq!(receipt.bytes, 23);
//!
//! let mut stream = blobs.create_read_stream("upload")?;
//! while let Some(block) = stream.next().await {
//!     let block = block?;
//!     assert!(block.len() <= blobs.block_size());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   Your Service   │  ← decides what to store
//! ├──────────────────┤
//! │      Blobs       │  ← chunking, batching, locking
//! ├──────────────────┤
//! │   OrderedStore   │  ← ordered KV primitives
//! └──────────────────┘
//! ```
//!
//! The store side stays deliberately small: `ready`, `sub`, `batch`, `get`,
//! and an ascending range `scan` are all a backend has to provide.

mod blobs;
mod buffer;
mod config;
mod error;
pub mod keys;
mod memory_store;
mod reader;
mod receipt;
pub mod store;
mod types;
mod writer;

// Re-export main types for clean API
pub use blobs::Blobs;
pub use config::{BlobConfig, WriteOptions};
pub use error::{BlobError, BlobResult, StoreError, StoreResult};
pub use memory_store::MemoryStore;
pub use receipt::WriteReceipt;
pub use store::{EntryStream, OrderedStore, ScanRange, StoreBatch, StoreEntry};
pub use types::ByteStream;
pub use writer::BlobWriter;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BlobConfig, BlobError, BlobResult, BlobWriter, Blobs, ByteStream, MemoryStore,
        OrderedStore, WriteOptions, WriteReceipt,
    };
}
