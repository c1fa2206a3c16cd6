use image::Rgb;

use super::{Block, BLOCK_SIZE};

/// Intensity modifiers, indexed by the 3 bit table selector of a sub-block and the
/// 2 bit pixel code.
const MODIFIER_TABLES: [[i16; 4]; 8] = [
    [2, 8, -2, -8],
    [5, 17, -5, -17],
    [9, 29, -9, -29],
    [13, 42, -13, -42],
    [18, 60, -18, -60],
    [24, 80, -24, -80],
    [33, 106, -33, -106],
    [47, 183, -47, -183],
];

const FLIP_BIT: u32 = 1 << 24;
const DIFFERENTIAL_BIT: u32 = 1 << 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SubBlock {
    base: [u8; 3],
    table: usize,
}

/// Decode a single ETC1 color block into a 4x4 grid of pixels, indexed `[y][x]`.
///
/// The block is stored byte-reversed relative to the usual ETC1 layout: the last
/// four bytes carry the base colors and mode bits, the first four the pixel codes.
pub fn decode_color_block(block: &[u8; 8]) -> Block<Rgb<u8>> {
    let control = u32::from_be_bytes([block[4], block[5], block[6], block[7]]);
    let codes = u32::from_be_bytes([block[0], block[1], block[2], block[3]]);

    let flip = (control & FLIP_BIT) != 0;
    let (first, second) = if (control & DIFFERENTIAL_BIT) != 0 {
        differential_bases(control)
    } else {
        individual_bases(control)
    };

    let first = SubBlock {
        base: first,
        table: ((control >> 29) & 0x07) as usize,
    };
    let second = SubBlock {
        base: second,
        table: ((control >> 26) & 0x07) as usize,
    };

    let mut pixels = [[Rgb([0, 0, 0]); BLOCK_SIZE]; BLOCK_SIZE];
    for (y, row) in pixels.iter_mut().enumerate() {
        for (x, pixel) in row.iter_mut().enumerate() {
            let in_second = if flip { y >= 2 } else { x >= 2 };
            let sub_block = if in_second { &second } else { &first };

            *pixel = shade(sub_block, pixel_code(codes, x, y));
        }
    }

    pixels
}

fn individual_bases(control: u32) -> ([u8; 3], [u8; 3]) {
    let channel = |shift: u32| expand4(((control >> shift) & 0x0f) as u8);

    let first = [channel(4), channel(12), channel(20)];
    let second = [channel(0), channel(8), channel(16)];

    (first, second)
}

fn differential_bases(control: u32) -> ([u8; 3], [u8; 3]) {
    let mut first = [0; 3];
    let mut second = [0; 3];

    for (channel, shift) in [0u32, 8, 16].into_iter().enumerate() {
        let base = ((control >> (shift + 3)) & 0x1f) as u8;
        let delta = sign_extend3(((control >> shift) & 0x07) as u8);

        // an out of range delta wraps within the 5 bit field
        let other = (base as i8).wrapping_add(delta) as u8 & 0x1f;

        first[channel] = expand5(base);
        second[channel] = expand5(other);
    }

    (first, second)
}

/// Two bit modifier code of the pixel at `(x, y)`.
fn pixel_code(codes: u32, x: usize, y: usize) -> usize {
    let index = (x * 4 + y) as u32;

    let (low_bit, high_bit) = if index < 8 {
        (index + 24, index + 8)
    } else {
        (index + 8, index - 8)
    };

    let low = (codes >> low_bit) & 1;
    let high = (codes >> high_bit) & 1;

    ((high << 1) | low) as usize
}

fn shade(sub_block: &SubBlock, code: usize) -> Rgb<u8> {
    let modifier = MODIFIER_TABLES[sub_block.table][code];
    let [r, g, b] = sub_block.base;

    Rgb([
        saturate(r as i16 + modifier),
        saturate(g as i16 + modifier),
        saturate(b as i16 + modifier),
    ])
}

pub(crate) const fn expand4(value: u8) -> u8 {
    (value << 4) | value
}

const fn expand5(value: u8) -> u8 {
    (value << 3) | (value >> 2)
}

const fn sign_extend3(value: u8) -> i8 {
    ((value << 5) as i8) >> 5
}

/// Clamp a modified channel into `0..=255`.
pub(crate) fn saturate(value: i16) -> u8 {
    value.clamp(0, 255) as u8
}
