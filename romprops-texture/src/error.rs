use thiserror::Error;

/// Errors surfaced while validating or decoding compressed texture data.
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("unsupported block size: {width}x{height}")]
    UnsupportedBlockSize { width: u8, height: u8 },

    #[error("compressed data size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("block decode failed: {0}")]
    Decode(#[from] std::io::Error),
}
