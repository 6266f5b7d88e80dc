//! Read-side block reconstruction.

use std::sync::Arc;

use futures_util::StreamExt;
use tracing::debug;

use crate::keys;
use crate::store::OrderedStore;
use crate::types::ByteStream;
use crate::BlobError;

/// Stream a blob's stored blocks back in sequence order.
///
/// Issues one range scan covering exactly the blob's key space (the scan
/// starts on first poll) and re-emits each payload unmodified. Only blocks
/// already committed when the scan starts are observed. The stream is finite
/// and not restartable; a scan error is yielded once and ends the stream.
pub(crate) fn read_blocks(store: Arc<dyn OrderedStore>, blob_key: String) -> ByteStream {
    let stream = async_stream::stream! {
        debug!(key = %blob_key, "scanning blob blocks");
        let mut entries = store.scan(keys::scan_range(blob_key.as_bytes()));
        while let Some(entry) = entries.next().await {
            match entry {
                Ok(entry) => yield Ok(entry.value),
                Err(err) => {
                    yield Err(BlobError::from(err));
                    return;
                }
            }
        }
    };
    Box::pin(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::MemoryStore;
    use bytes::Bytes;

    async fn seed(store: &Arc<dyn OrderedStore>, key: &str, blocks: &[&[u8]]) {
        let mut batch = store.batch();
        for (seq, block) in blocks.iter().enumerate() {
            batch.put(
                keys::block_key(key.as_bytes(), seq as u64),
                Bytes::copy_from_slice(block),
            );
        }
        batch.flush().await.unwrap();
    }

    #[tokio::test]
    async fn yields_blocks_in_sequence_order() {
        let store: Arc<dyn OrderedStore> = Arc::new(MemoryStore::new());
        seed(&store, "doc", &[b"aaaa", b"bbbb", b"cc"]).await;

        let mut stream = read_blocks(store, "doc".to_string());
        let mut payloads = Vec::new();
        while let Some(block) = stream.next().await {
            payloads.push(block.unwrap());
        }

        assert_eq!(payloads.len(), 3);
        assert_eq!(&payloads[0][..], b"aaaa");
        assert_eq!(&payloads[1][..], b"bbbb");
        assert_eq!(&payloads[2][..], b"cc");
    }

    #[tokio::test]
    async fn absent_blob_yields_an_empty_stream() {
        let store: Arc<dyn OrderedStore> = Arc::new(MemoryStore::new());
        let mut stream = read_blocks(store, "missing".to_string());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn neighboring_blobs_stay_out_of_the_stream() {
        let store: Arc<dyn OrderedStore> = Arc::new(MemoryStore::new());
        seed(&store, "foo", &[b"foo-0"]).await;
        seed(&store, "foobar", &[b"foobar-0"]).await;

        let mut stream = read_blocks(store, "foo".to_string());
        let only = stream.next().await.unwrap().unwrap();
        assert_eq!(&only[..], b"foo-0");
        assert!(stream.next().await.is_none());
    }
}
