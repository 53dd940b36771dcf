//! ARGB32 pixel buffer with an independent row stride.
//!
//! Block decoders allocate the buffer at block-aligned physical
//! dimensions and shrink it to the logical image size afterwards; the
//! stride keeps row addressing valid across the shrink.

use crate::error::TextureError;

/// An ARGB32 image. One `u32` per pixel, rows `stride` pixels apart.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    /// Row pitch in pixels; `>= width`, fixed at allocation.
    stride: usize,
    data: Vec<u32>,
    depth: [u8; 4],
}

impl PixelBuffer {
    /// Allocate a zeroed buffer with stride equal to the width.
    pub fn new(width: u32, height: u32) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::InvalidDimensions { width, height });
        }
        let stride = width as usize;
        Ok(Self {
            width,
            height,
            stride,
            data: vec![0u32; stride * height as usize],
            depth: [8, 8, 8, 8],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row pitch in pixels.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Bits of precision per channel, RGBA order.
    pub fn depth(&self) -> [u8; 4] {
        self.depth
    }

    /// Reduce the logical dimensions without reallocating. The stride is
    /// unchanged, so existing row addressing stays valid. Growing is not
    /// allowed.
    pub fn shrink(&mut self, width: u32, height: u32) -> Result<(), TextureError> {
        if width == 0 || height == 0 || width > self.width || height > self.height {
            return Err(TextureError::InvalidDimensions { width, height });
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// One row of pixels, `width` long.
    pub fn row(&self, y: u32) -> &[u32] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize]
    }

    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.data[y as usize * self.stride + x as usize]
    }

    /// The full backing store, including any slack beyond the logical
    /// width of each row.
    pub fn data(&self) -> &[u32] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u32] {
        &mut self.data
    }
}

#[cfg(test)]
#[path = "tests/pixelbuf_tests.rs"]
mod tests;
