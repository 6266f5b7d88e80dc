//! Sub-key derivation for stored blocks.
//!
//! A block is stored under `blobKey || SEPARATOR || encode_seq(seq)`. The
//! sequence encoding is length-prefixed big-endian, so byte-lexicographic
//! order of block keys equals numeric block order for the full `u64` range.

use bytes::{BufMut, Bytes, BytesMut};

use crate::store::ScanRange;
use crate::{BlobError, BlobResult};

/// Reserved byte separating a blob key from its block sequence number.
/// Blob keys must not contain it.
pub const SEPARATOR: u8 = 0x00;

/// Reject blob keys that contain the reserved separator byte
pub fn validate_key(key: &str) -> BlobResult<()> {
    if key.as_bytes().contains(&SEPARATOR) {
        return Err(BlobError::invalid_key(
            "blob keys must not contain the NUL byte",
        ));
    }
    Ok(())
}

/// Encode a block sequence number as length-prefixed big-endian bytes.
///
/// One length byte (the count of significant big-endian bytes, 0 for zero)
/// followed by those bytes with no leading zeros. Shorter encodings compare
/// below longer ones and equal lengths compare by magnitude, so
/// `encode_seq(a) < encode_seq(b)` iff `a < b`.
pub fn encode_seq(seq: u64) -> Bytes {
    let significant = ((64 - seq.leading_zeros() as usize) + 7) / 8;
    let mut out = BytesMut::with_capacity(1 + significant);
    out.put_u8(significant as u8);
    out.extend_from_slice(&seq.to_be_bytes()[8 - significant..]);
    out.freeze()
}

/// Decode a sequence number produced by [`encode_seq`].
///
/// Returns `None` for malformed or non-canonical input (length byte over 8,
/// payload length mismatch, or a leading zero in the payload).
pub fn decode_seq(bytes: &[u8]) -> Option<u64> {
    let (&len, payload) = bytes.split_first()?;
    let len = len as usize;
    if len > 8 || payload.len() != len {
        return None;
    }
    if len > 0 && payload[0] == 0 {
        return None;
    }
    let mut buf = [0u8; 8];
    buf[8 - len..].copy_from_slice(payload);
    Some(u64::from_be_bytes(buf))
}

/// Derive the stored sub-key for one block of a blob
pub fn block_key(blob_key: &[u8], seq: u64) -> Bytes {
    let seq_bytes = encode_seq(seq);
    let mut key = BytesMut::with_capacity(blob_key.len() + 1 + seq_bytes.len());
    key.extend_from_slice(blob_key);
    key.put_u8(SEPARATOR);
    key.extend_from_slice(&seq_bytes);
    key.freeze()
}

/// Split a stored sub-key back into `(blob_key, seq)`.
///
/// Returns `None` if the key has no separator or a malformed sequence suffix.
pub fn split_block_key(key: &[u8]) -> Option<(&[u8], u64)> {
    let sep = key.iter().position(|&b| b == SEPARATOR)?;
    let seq = decode_seq(&key[sep + 1..])?;
    Some((&key[..sep], seq))
}

/// Scan bounds covering exactly one blob's block keys.
///
/// Lower bound `blobKey || SEPARATOR`, upper bound
/// `blobKey || SEPARATOR || 0xFF`, both exclusive. Every block key sits
/// strictly inside: its sequence suffix starts with a length byte of at most
/// 0x08. Keys of other blobs fall outside because their own bytes never
/// contain the separator.
pub fn scan_range(blob_key: &[u8]) -> ScanRange {
    let mut lower = BytesMut::with_capacity(blob_key.len() + 1);
    lower.extend_from_slice(blob_key);
    lower.put_u8(SEPARATOR);

    let mut upper = BytesMut::with_capacity(blob_key.len() + 2);
    upper.extend_from_slice(&lower);
    upper.put_u8(0xFF);

    ScanRange::all()
        .greater_than(lower.freeze())
        .less_than(upper.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encodes_small_sequences_compactly() {
        assert_eq!(&encode_seq(0)[..], &[0x00]);
        assert_eq!(&encode_seq(1)[..], &[0x01, 0x01]);
        assert_eq!(&encode_seq(255)[..], &[0x01, 0xFF]);
        assert_eq!(&encode_seq(256)[..], &[0x02, 0x01, 0x00]);
    }

    #[test]
    fn sequence_order_survives_lexicographic_sort() {
        // Decimal strings would sort 10 before 9; this encoding must not.
        assert!(encode_seq(9) < encode_seq(10));

        let seqs = [0u64, 1, 9, 10, 11, 99, 100, 255, 256, 65535, 65536, u64::MAX];
        let mut encoded: Vec<Bytes> = seqs.iter().map(|&s| encode_seq(s)).collect();
        let in_numeric_order = encoded.clone();
        encoded.sort();
        assert_eq!(encoded, in_numeric_order);
    }

    #[test]
    fn decode_inverts_encode() {
        for seq in [0u64, 1, 9, 10, 255, 256, 1 << 32, u64::MAX] {
            assert_eq!(decode_seq(&encode_seq(seq)), Some(seq));
        }
    }

    #[test]
    fn decode_rejects_malformed_input() {
        assert_eq!(decode_seq(&[]), None);
        assert_eq!(decode_seq(&[0x09, 1, 2, 3, 4, 5, 6, 7, 8, 9]), None);
        assert_eq!(decode_seq(&[0x02, 0x01]), None); // short payload
        assert_eq!(decode_seq(&[0x01, 0x00]), None); // non-minimal zero
        assert_eq!(decode_seq(&[0x02, 0x00, 0x01]), None); // leading zero
    }

    #[test]
    fn block_keys_for_one_blob_sort_by_sequence() {
        let keys: Vec<Bytes> = (0..300).map(|seq| block_key(b"doc", seq)).collect();
        for pair in keys.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn split_recovers_blob_key_and_sequence() {
        let key = block_key(b"videos/intro", 42);
        assert_eq!(split_block_key(&key), Some((&b"videos/intro"[..], 42)));
        assert_eq!(split_block_key(b"no-separator-here"), None);
    }

    #[test]
    fn scan_bounds_cover_own_blocks_only() {
        let range = scan_range(b"foo");
        let gt = range.gt.unwrap();
        let lt = range.lt.unwrap();

        for seq in [0u64, 1, 9, 10, 1000] {
            let own = block_key(b"foo", seq);
            assert!(own > gt && own < lt);
        }

        // Prefix-colliding blob keys stay outside the bounds.
        let foreign = block_key(b"foobar", 0);
        assert!(!(foreign > gt && foreign < lt));
        let shorter = block_key(b"fo", 0);
        assert!(!(shorter > gt && shorter < lt));
    }

    #[test]
    fn validate_key_rejects_separator_bytes() {
        assert!(validate_key("plain-key").is_ok());
        assert!(validate_key("").is_ok());
        assert!(matches!(
            validate_key("bad\u{0}key"),
            Err(BlobError::InvalidKey { .. })
        ));
    }

    proptest! {
        #[test]
        fn encoding_preserves_numeric_order(a in any::<u64>(), b in any::<u64>()) {
            prop_assert_eq!(a.cmp(&b), encode_seq(a).cmp(&encode_seq(b)));
        }

        #[test]
        fn encoding_round_trips(seq in any::<u64>()) {
            prop_assert_eq!(decode_seq(&encode_seq(seq)), Some(seq));
        }
    }
}
