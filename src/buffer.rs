//! Accumulates arbitrarily-chunked input and slices out fixed-size blocks.

use bytes::{Bytes, BytesMut};

/// Byte accumulator that re-chunks caller input into exact blocks.
///
/// Callers `append` chunks of any size, then `drain` complete blocks until it
/// returns `None`; `flush` hands back the final partial block at stream end.
/// Concatenating every drained and flushed block reproduces the appended
/// bytes exactly, independent of how the input was chunked.
#[derive(Debug)]
pub struct BlockBuffer {
    buf: BytesMut,
    block_size: usize,
}

impl BlockBuffer {
    /// Create a buffer that slices blocks of `block_size` bytes
    pub fn new(block_size: usize) -> Self {
        debug_assert!(block_size > 0);
        Self {
            buf: BytesMut::new(),
            block_size,
        }
    }

    /// Append a chunk to the accumulator
    pub fn append(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Bytes currently buffered
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Slice one complete block off the front, if enough bytes are buffered.
    ///
    /// The returned block shares the accumulator's allocation rather than
    /// copying. Leftover bytes stay buffered for the next drain or flush.
    pub fn drain(&mut self) -> Option<Bytes> {
        if self.buf.len() >= self.block_size {
            Some(self.buf.split_to(self.block_size).freeze())
        } else {
            None
        }
    }

    /// Take the remaining bytes as one final partial block.
    ///
    /// Returns `None` when nothing is buffered; afterwards the buffer is
    /// empty either way.
    pub fn flush(&mut self) -> Option<Bytes> {
        if self.buf.is_empty() {
            None
        } else {
            Some(self.buf.split().freeze())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn drain_all(buffer: &mut BlockBuffer) -> Vec<Bytes> {
        let mut blocks = Vec::new();
        while let Some(block) = buffer.drain() {
            blocks.push(block);
        }
        blocks
    }

    #[test]
    fn small_chunks_combine_into_one_block() {
        let mut buffer = BlockBuffer::new(10);
        buffer.append(b"aaaa");
        assert!(buffer.drain().is_none());
        buffer.append(b"bbbb");
        buffer.append(b"cc");

        let block = buffer.drain().unwrap();
        assert_eq!(&block[..], b"aaaabbbbcc");
        assert!(buffer.drain().is_none());
        assert!(buffer.flush().is_none());
    }

    #[test]
    fn oversized_chunk_splits_across_blocks() {
        let mut buffer = BlockBuffer::new(4);
        buffer.append(b"abcdefghij");

        let blocks = drain_all(&mut buffer);
        assert_eq!(blocks.len(), 2);
        assert_eq!(&blocks[0][..], b"abcd");
        assert_eq!(&blocks[1][..], b"efgh");
        assert_eq!(&buffer.flush().unwrap()[..], b"ij");
    }

    #[test]
    fn chunk_boundaries_do_not_leak_into_blocks() {
        // 7 + 7 + 6 bytes against block size 10 must yield exactly two blocks.
        let mut buffer = BlockBuffer::new(10);
        let mut blocks = Vec::new();
        for chunk in [&b"aaaaaaa"[..], b"bbbbbbb", b"cccccc"] {
            buffer.append(chunk);
            blocks.extend(drain_all(&mut buffer));
        }
        assert!(buffer.flush().is_none());

        assert_eq!(blocks.len(), 2);
        assert_eq!(&blocks[0][..], b"aaaaaaabbb");
        assert_eq!(&blocks[1][..], b"bbbbcccccc");
    }

    #[test]
    fn exact_multiple_flushes_nothing() {
        let mut buffer = BlockBuffer::new(5);
        buffer.append(b"0123456789");

        assert_eq!(drain_all(&mut buffer).len(), 2);
        assert_eq!(buffer.buffered(), 0);
        assert!(buffer.flush().is_none());
    }

    #[test]
    fn buffered_tracks_pending_bytes() {
        let mut buffer = BlockBuffer::new(8);
        assert_eq!(buffer.buffered(), 0);
        buffer.append(b"abc");
        assert_eq!(buffer.buffered(), 3);
        buffer.append(b"defgh");
        assert_eq!(buffer.buffered(), 8);
        buffer.drain().unwrap();
        assert_eq!(buffer.buffered(), 0);
    }

    proptest! {
        #[test]
        fn reassembly_is_chunking_independent(
            chunks in proptest::collection::vec(
                proptest::collection::vec(any::<u8>(), 0..200),
                0..20,
            ),
            block_size in 1usize..64,
        ) {
            let mut buffer = BlockBuffer::new(block_size);
            let mut emitted = Vec::new();
            for chunk in &chunks {
                buffer.append(chunk);
                while let Some(block) = buffer.drain() {
                    prop_assert_eq!(block.len(), block_size);
                    emitted.extend_from_slice(&block);
                }
            }
            if let Some(last) = buffer.flush() {
                prop_assert!(last.len() >= 1 && last.len() <= block_size);
                emitted.extend_from_slice(&last);
            }

            let input: Vec<u8> = chunks.concat();
            prop_assert_eq!(emitted, input);
        }
    }
}
