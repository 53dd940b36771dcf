//! ASTC image decoding.
//!
//! The compressed stream is a dense grid of 16-byte blocks in row-major
//! block order. Each block row decodes independently, so rows fan out
//! across the thread pool into disjoint horizontal bands of the
//! destination buffer.

use astc_decode::{astc_decode, Footprint};
use log::debug;
use rayon::prelude::*;

use crate::error::TextureError;
use crate::pixelbuf::PixelBuffer;
use crate::argb32;

/// Bytes per compressed block, all footprints.
const BLOCK_BYTES: usize = 16;

/// 2D block footprints defined by the format.
const FOOTPRINTS: [(u8, u8, Footprint); 14] = [
    (4, 4, Footprint::ASTC_4X4),
    (5, 4, Footprint::ASTC_5X4),
    (5, 5, Footprint::ASTC_5X5),
    (6, 5, Footprint::ASTC_6X5),
    (6, 6, Footprint::ASTC_6X6),
    (8, 5, Footprint::ASTC_8X5),
    (8, 6, Footprint::ASTC_8X6),
    (8, 8, Footprint::ASTC_8X8),
    (10, 5, Footprint::ASTC_10X5),
    (10, 6, Footprint::ASTC_10X6),
    (10, 8, Footprint::ASTC_10X8),
    (10, 10, Footprint::ASTC_10X10),
    (12, 10, Footprint::ASTC_12X10),
    (12, 12, Footprint::ASTC_12X12),
];

fn footprint_for(block_w: u8, block_h: u8) -> Option<Footprint> {
    FOOTPRINTS
        .iter()
        .find(|&&(w, h, _)| w == block_w && h == block_h)
        .map(|&(_, _, fp)| fp)
}

/// Decode an ASTC image to an ARGB32 pixel buffer.
///
/// `img_buf` must hold at least the block grid covering the image:
/// `ceil(w / bw) * ceil(h / bh)` 16-byte blocks. Trailing bytes (e.g.
/// appended mipmap levels) are ignored. Pixels decode at 8 bits per
/// channel regardless of footprint.
pub fn decode_astc(
    width: u32,
    height: u32,
    block: (u8, u8),
    img_buf: &[u8],
) -> Result<PixelBuffer, TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::InvalidDimensions { width, height });
    }
    let (block_w, block_h) = block;
    let footprint = footprint_for(block_w, block_h).ok_or(TextureError::UnsupportedBlockSize {
        width: block_w,
        height: block_h,
    })?;

    let bw = block_w as usize;
    let bh = block_h as usize;
    let blocks_x = (width as usize).div_ceil(bw);
    let blocks_y = (height as usize).div_ceil(bh);
    let expected = blocks_x * blocks_y * BLOCK_BYTES;
    if img_buf.len() < expected {
        return Err(TextureError::SizeMismatch {
            expected,
            actual: img_buf.len(),
        });
    }
    let img_buf = &img_buf[..expected];

    // Decode into the block-aligned physical grid, then shrink.
    let phys_w = (blocks_x * bw) as u32;
    let phys_h = (blocks_y * bh) as u32;
    let mut img = PixelBuffer::new(phys_w, phys_h)?;
    let stride = img.stride();

    debug!(
        "ASTC {}x{} ({}x{} blocks of {}x{})",
        width, height, blocks_x, blocks_y, block_w, block_h
    );

    // One band per block row; bands are disjoint, rows decode in parallel.
    let band_pixels = stride * bh;
    let results: Vec<Result<(), std::io::Error>> = img
        .data_mut()
        .par_chunks_mut(band_pixels)
        .enumerate()
        .map(|(by, band)| {
            let row_blocks = &img_buf[by * blocks_x * BLOCK_BYTES..];
            for bx in 0..blocks_x {
                let block = &row_blocks[bx * BLOCK_BYTES..(bx + 1) * BLOCK_BYTES];
                astc_decode(block, block_w as u32, block_h as u32, footprint, |x, y, rgba| {
                    let px = bx * bw + x as usize;
                    band[y as usize * stride + px] = argb32(rgba);
                })?;
            }
            Ok(())
        })
        .collect();
    results.into_iter().collect::<Result<(), _>>()?;

    if phys_w != width || phys_h != height {
        img.shrink(width, height)?;
    }
    Ok(img)
}

#[cfg(test)]
#[path = "tests/astc_tests.rs"]
mod tests;
