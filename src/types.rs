use bytes::Bytes;
use futures_core::Stream;
use std::pin::Pin;

use crate::BlobResult;

/// Stream of block payloads for blob content.
///
/// Yielded in block order; concatenating every `Ok` item reproduces the blob.
/// An `Err` item terminates the stream.
pub type ByteStream = Pin<Box<dyn Stream<Item = BlobResult<Bytes>> + Send>>;
