use super::Operation;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Decompressor<'a> {
    src: &'a [u8],
    dst: Vec<u8>,

    /// escape byte, taken from the first byte of the stream
    marker: u8,
    /// index to read from
    read_index: usize,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecompressError {
    #[error("Compressed stream is empty")]
    EmptyStream,
    #[error("Back-reference at {position:#x} reaches {offset} bytes back but only {available} bytes are decoded")]
    BackrefOutOfRange {
        position: usize,
        offset: usize,
        available: usize,
    },
    #[error("Operation at {position:#x} is cut off by the end of the stream")]
    TruncatedOperation { position: usize },
}

impl Operation {
    pub fn decode(decompressor: &Decompressor) -> Result<Self, DecompressError> {
        let marker = decompressor.marker;
        let position = decompressor.read_index;

        let value = decompressor.peek(0)?;
        if value != marker {
            return Ok(Self::Literal(value));
        }

        let next = decompressor.peek(1)?;
        if next == marker {
            return Ok(Self::EscapedMarker);
        }

        // the marker itself can never be an offset, so everything above it is shifted down
        let offset = if next > marker { next - 1 } else { next };
        let length = decompressor
            .peek(2)
            .map_err(|_| DecompressError::TruncatedOperation { position })?;

        Ok(Self::Backref {
            offset: offset as usize,
            length,
        })
    }
}

impl<'a> Decompressor<'a> {
    pub fn new(src: &'a [u8]) -> Result<Self, DecompressError> {
        let marker = *src.first().ok_or(DecompressError::EmptyStream)?;

        Ok(Self {
            src,
            // output is usually larger than the input, start with some headroom
            dst: Vec::with_capacity(src.len() * 2),

            marker,
            read_index: 1,
        })
    }

    pub const fn marker(&self) -> u8 {
        self.marker
    }

    pub fn decompress(mut self) -> Result<Vec<u8>, DecompressError> {
        while self.read_index < self.src.len() {
            let operation = Operation::decode(&self)?;
            log::trace!("operation at {:#x}: {:?}", self.read_index, operation);

            match operation {
                Operation::Literal(value) => self.dst.push(value),
                Operation::EscapedMarker => self.dst.push(self.marker),
                Operation::Backref { offset, length } => self.copy_backref(offset, length)?,
            }

            self.read_index += operation.encoded_len();
        }

        Ok(self.dst)
    }

    fn peek(&self, ahead: usize) -> Result<u8, DecompressError> {
        self.src
            .get(self.read_index + ahead)
            .copied()
            .ok_or(DecompressError::TruncatedOperation {
                position: self.read_index,
            })
    }

    fn copy_backref(&mut self, offset: usize, length: u8) -> Result<(), DecompressError> {
        let available = self.dst.len();
        if offset > available || (offset == 0 && length > 0) {
            return Err(DecompressError::BackrefOutOfRange {
                position: self.read_index,
                offset,
                available,
            });
        }

        // byte by byte, the source may overlap the bytes produced by this copy
        let start = available - offset;
        for index in start..start + length as usize {
            let value = self.dst[index];
            self.dst.push(value);
        }

        Ok(())
    }
}
