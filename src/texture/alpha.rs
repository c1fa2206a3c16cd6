use super::{etc1::expand4, Block, BLOCK_SIZE};

/// Alpha block used for textures without an alpha plane.
pub const OPAQUE_ALPHA_BLOCK: [u8; 8] = [0xff; 8];

/// Decode a 4 bit alpha block into a 4x4 grid, indexed `[y][x]`.
///
/// Pixels are packed two per byte in column-major order, low nibble first.
pub fn decode_alpha_block(block: &[u8; 8]) -> Block<u8> {
    let mut alpha = [[0; BLOCK_SIZE]; BLOCK_SIZE];

    for x in 0..BLOCK_SIZE {
        for (y, row) in alpha.iter_mut().enumerate() {
            let index = x * BLOCK_SIZE + y;
            let byte = block[index / 2];

            let value = if index % 2 == 0 { byte & 0x0f } else { byte >> 4 };
            row[x] = expand4(value);
        }
    }

    alpha
}
