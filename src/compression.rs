mod decompress;
pub use decompress::{DecompressError, Decompressor};

/// A single step of the marker-escaped stream.
///
/// Every stream starts with a marker byte. A marker followed by the marker is a
/// literal marker byte, a marker followed by anything else starts a back-reference.
/// All other bytes are copied through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Literal(u8),
    EscapedMarker,
    Backref { offset: usize, length: u8 },
}

impl Operation {
    /// Number of stream bytes consumed by this operation.
    pub const fn encoded_len(&self) -> usize {
        match self {
            Self::Literal(_) => 1,
            Self::EscapedMarker => 2,
            Self::Backref { .. } => 3,
        }
    }
}

/// Decompress a complete stream.
pub fn decompress(src: &[u8]) -> Result<Vec<u8>, DecompressError> {
    Decompressor::new(src)?.decompress()
}
