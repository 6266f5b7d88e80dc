//! Write-side session state machine.

use std::mem;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, trace, warn};

use crate::buffer::BlockBuffer;
use crate::keys;
use crate::receipt::WriteReceipt;
use crate::store::{OrderedStore, StoreBatch};
use crate::{BlobError, BlobResult};

/// Streaming writer for one blob.
///
/// The first `write` call waits for the store to become ready and acquires
/// the store handle's write lock; the lock is held until the writer finishes,
/// fails, or is dropped, so concurrent writers queue FIFO behind it. Input
/// chunks are re-sliced into exact blocks and staged into a batch that
/// commits whenever the configured buffer threshold is reached. Nothing is
/// durable between commits.
///
/// `finish` consumes the writer, commits the final partial block, and returns
/// a [`WriteReceipt`]. Dropping the writer instead abandons the session:
/// staged-but-uncommitted blocks are discarded and the lock is released.
pub struct BlobWriter {
    store: Arc<dyn OrderedStore>,
    lock: Arc<Mutex<()>>,
    key: String,
    block_size: usize,
    buffer_size: usize,
    state: WriterState,
}

enum WriterState {
    Idle,
    Open(Box<WriteSession>),
    Failed,
}

struct WriteSession {
    _guard: OwnedMutexGuard<()>,
    buffer: BlockBuffer,
    batch: Box<dyn StoreBatch>,
    batched_bytes: usize,
    next_seq: u64,
    written_bytes: u64,
}

impl BlobWriter {
    pub(crate) fn new(
        store: Arc<dyn OrderedStore>,
        lock: Arc<Mutex<()>>,
        key: String,
        block_size: usize,
        buffer_size: usize,
    ) -> Self {
        Self {
            store,
            lock,
            key,
            block_size,
            buffer_size,
            state: WriterState::Idle,
        }
    }

    /// Blob key this writer targets
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Block size in effect for this session
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Batch commit threshold in effect for this session
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Append a chunk of blob content.
    ///
    /// Chunks may be any size; block boundaries are independent of them.
    /// Errors leave the writer failed: the session is discarded, the lock is
    /// released, and further calls return [`BlobError::SessionFailed`].
    pub async fn write(&mut self, chunk: &[u8]) -> BlobResult<()> {
        let mut session = self.open_or_resume().await?;
        session.buffer.append(chunk);
        while let Some(block) = session.buffer.drain() {
            self.stage_block(&mut session, block);
            if session.batched_bytes >= self.buffer_size {
                self.commit_batch(&mut session).await?;
            }
        }
        self.state = WriterState::Open(session);
        Ok(())
    }

    /// Finalize the session: commit the final partial block and any staged
    /// blocks, release the lock, and report what was written.
    ///
    /// A session that never received bytes commits nothing and reports zero
    /// blocks; reading such a blob yields empty content.
    pub async fn finish(mut self) -> BlobResult<WriteReceipt> {
        let mut session = self.open_or_resume().await?;

        if let Some(block) = session.buffer.flush() {
            if block.len() > self.block_size {
                warn!(
                    key = %self.key,
                    buffered = block.len(),
                    block_size = self.block_size,
                    "chunking invariant violated at finalize"
                );
                return Err(BlobError::InvariantViolation {
                    buffered: block.len(),
                    block_size: self.block_size,
                });
            }
            self.stage_block(&mut session, block);
        }

        if session.batched_bytes > 0 {
            self.commit_batch(&mut session).await?;
        }

        debug!(
            key = %self.key,
            blocks = session.next_seq,
            bytes = session.written_bytes,
            "write session closed"
        );
        Ok(WriteReceipt::new(
            self.key,
            session.next_seq,
            session.written_bytes,
        ))
    }

    // Takes the session out of the writer, leaving `Failed` behind. Any
    // error or cancellation before the session is put back therefore drops
    // it, and dropping the owned guard is the single lock release point.
    async fn open_or_resume(&mut self) -> BlobResult<Box<WriteSession>> {
        match mem::replace(&mut self.state, WriterState::Failed) {
            WriterState::Open(session) => Ok(session),
            WriterState::Idle => {
                self.store.ready().await?;
                let guard = self.lock.clone().lock_owned().await;
                debug!(
                    key = %self.key,
                    block_size = self.block_size,
                    buffer_size = self.buffer_size,
                    "write session opened"
                );
                Ok(Box::new(WriteSession {
                    _guard: guard,
                    buffer: BlockBuffer::new(self.block_size),
                    batch: self.store.batch(),
                    batched_bytes: 0,
                    next_seq: 0,
                    written_bytes: 0,
                }))
            }
            WriterState::Failed => Err(BlobError::SessionFailed),
        }
    }

    fn stage_block(&self, session: &mut WriteSession, block: Bytes) {
        let key = keys::block_key(self.key.as_bytes(), session.next_seq);
        trace!(key = %self.key, seq = session.next_seq, len = block.len(), "staging block");
        session.batched_bytes += block.len();
        session.written_bytes += block.len() as u64;
        session.batch.put(key, block);
        session.next_seq += 1;
    }

    async fn commit_batch(&self, session: &mut WriteSession) -> BlobResult<()> {
        let batch = mem::replace(&mut session.batch, self.store.batch());
        batch.flush().await.map_err(|err| {
            warn!(key = %self.key, error = %err, "batch commit failed");
            err
        })?;
        debug!(
            key = %self.key,
            bytes = session.batched_bytes,
            staged_through = session.next_seq,
            "committed block batch"
        );
        session.batched_bytes = 0;
        Ok(())
    }
}
