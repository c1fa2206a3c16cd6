use image::RgbaImage;
use thiserror::Error;

mod alpha;
pub use alpha::{decode_alpha_block, OPAQUE_ALPHA_BLOCK};

mod etc1;
pub use etc1::decode_color_block;

mod scramble;
pub use scramble::build_scramble_table;

/// Width and height of a block in pixels.
pub const BLOCK_SIZE: usize = 4;

const BYTES_PER_PIXEL: usize = 4;
const TILE_ROW_BYTES: usize = BLOCK_SIZE * BYTES_PER_PIXEL;

/// A decoded 4x4 block, indexed `[y][x]`.
pub type Block<T> = [[T; BLOCK_SIZE]; BLOCK_SIZE];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextureError {
    #[error("Texture dimensions {width}x{height} are not positive multiples of 4")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Texture payload holds {actual} bytes but {expected} are needed")]
    TruncatedPayload { expected: usize, actual: usize },
}

/// Size of one encoded block, with or without the alpha plane.
pub const fn encoded_block_size(has_alpha: bool) -> usize {
    if has_alpha {
        16
    } else {
        8
    }
}

/// Decode an ETC1 or ETC1A4 payload into a row-major RGBA8 buffer.
pub fn decode_texture(
    payload: &[u8],
    width: u32,
    height: u32,
    has_alpha: bool,
) -> Result<Vec<u8>, TextureError> {
    if width == 0 || height == 0 || width % 4 != 0 || height % 4 != 0 {
        return Err(TextureError::InvalidDimensions { width, height });
    }

    let tiles_per_row = width as usize / BLOCK_SIZE;
    let tile_rows = height as usize / BLOCK_SIZE;
    let block_size = encoded_block_size(has_alpha);

    let expected = tiles_per_row * tile_rows * block_size;
    if payload.len() < expected {
        return Err(TextureError::TruncatedPayload {
            expected,
            actual: payload.len(),
        });
    }

    let stride = width as usize * BYTES_PER_PIXEL;
    let mut decoded = vec![0; stride * height as usize];

    for (index, block) in payload[..expected].chunks_exact(block_size).enumerate() {
        let tile = decode_block(block, has_alpha);

        let offset = tile_offset(index, tiles_per_row, stride);
        for (y, row) in tile.iter().enumerate() {
            let start = offset + y * stride;
            decoded[start..start + TILE_ROW_BYTES].copy_from_slice(row);
        }
    }

    let table = build_scramble_table(tiles_per_row, tile_rows);

    let mut pixels = vec![0; decoded.len()];
    for (index, &source) in table.iter().enumerate() {
        let src = tile_offset(source, tiles_per_row, stride);
        let dst = tile_offset(index, tiles_per_row, stride);

        for y in 0..BLOCK_SIZE {
            let (src, dst) = (src + y * stride, dst + y * stride);
            pixels[dst..dst + TILE_ROW_BYTES]
                .copy_from_slice(&decoded[src..src + TILE_ROW_BYTES]);
        }
    }

    Ok(pixels)
}

/// Decode a payload straight into an [`RgbaImage`].
pub fn decode_image(
    payload: &[u8],
    width: u32,
    height: u32,
    has_alpha: bool,
) -> Result<RgbaImage, TextureError> {
    let pixels = decode_texture(payload, width, height, has_alpha)?;

    // decode_texture always returns width * height pixels
    RgbaImage::from_raw(width, height, pixels)
        .ok_or(TextureError::InvalidDimensions { width, height })
}

/// Decode one encoded block into RGBA rows of 16 bytes each.
fn decode_block(block: &[u8], has_alpha: bool) -> [[u8; TILE_ROW_BYTES]; BLOCK_SIZE] {
    let (alpha, color) = if has_alpha {
        block.split_at(8)
    } else {
        (&OPAQUE_ALPHA_BLOCK[..], block)
    };

    // both halves are exactly 8 bytes since the payload is split by encoded_block_size
    let mut color_block = [0; 8];
    color_block.copy_from_slice(color);
    let mut alpha_block = [0; 8];
    alpha_block.copy_from_slice(alpha);

    let colors = decode_color_block(&color_block);
    let alphas = decode_alpha_block(&alpha_block);

    let mut rows = [[0; TILE_ROW_BYTES]; BLOCK_SIZE];
    for (y, row) in rows.iter_mut().enumerate() {
        for (x, pixel) in row.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
            let [r, g, b] = colors[y][x].0;
            pixel.copy_from_slice(&[r, g, b, alphas[y][x]]);
        }
    }

    rows
}

/// Byte offset of the top-left pixel of a row-major tile.
fn tile_offset(tile: usize, tiles_per_row: usize, stride: usize) -> usize {
    let x = tile % tiles_per_row;
    let y = tile / tiles_per_row;

    y * BLOCK_SIZE * stride + x * TILE_ROW_BYTES
}
