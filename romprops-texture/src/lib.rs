//! Block-compressed texture decoding to ARGB32 pixel buffers.
//!
//! Decodes whole images of 16-byte compressed blocks; block rows are
//! decoded in parallel into disjoint bands of the destination buffer.

pub mod astc;
pub mod error;
pub mod pixelbuf;

pub use astc::decode_astc;
pub use error::TextureError;
pub use pixelbuf::PixelBuffer;

/// Pack an RGBA byte quad into an ARGB32 word.
#[inline]
pub(crate) fn argb32(rgba: [u8; 4]) -> u32 {
    let [r, g, b, a] = rgba;
    (u32::from(a) << 24) | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}
