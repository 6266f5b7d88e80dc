use serde::{Deserialize, Serialize};

/// Receipt returned after a write session commits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteReceipt {
    /// Blob key the session wrote under
    pub key: String,

    /// Number of blocks committed
    pub blocks: u64,

    /// Total payload bytes committed
    pub bytes: u64,
}

impl WriteReceipt {
    /// Create a new receipt
    pub fn new<S: Into<String>>(key: S, blocks: u64, bytes: u64) -> Self {
        Self {
            key: key.into(),
            blocks,
            bytes,
        }
    }

    /// True when the session wrote a zero-length blob
    pub fn is_empty(&self) -> bool {
        self.blocks == 0
    }
}
