//! Closed catalog of format handlers.
//!
//! Each handler contributes a pure detect function over a header window
//! and an open function that takes ownership of the byte source. Magic
//! patterns are unique across the catalog, so the first match wins.

use std::io::{Read, Seek, SeekFrom};

use log::debug;

use crate::{DetectInfo, ReadSeek, RomData, RomError};

/// One catalog entry: detection plus construction for a format family.
pub struct FormatHandler {
    /// Family name, e.g. "CBMCart".
    pub name: &'static str,
    /// Fixed header size the detector needs, in bytes.
    pub header_size: usize,
    /// Filename extensions (with leading dot) for this family.
    pub extensions: &'static [&'static str],
    /// Returns the detected format id (>= 0) or -1 for no match.
    pub detect: fn(&DetectInfo) -> i32,
    /// Construct a handler instance owning the source. The instance may
    /// still be invalid; the registry checks `is_valid()` afterwards.
    pub open: fn(Box<dyn ReadSeek>) -> Box<dyn RomData>,
}

/// Process-wide, read-only handler catalog, initialized at startup.
#[derive(Default)]
pub struct FormatRegistry {
    handlers: Vec<FormatHandler>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: FormatHandler) {
        self.handlers.push(handler);
    }

    pub fn handlers(&self) -> &[FormatHandler] {
        &self.handlers
    }

    /// Largest header window any registered handler needs.
    pub fn max_header_size(&self) -> usize {
        self.handlers
            .iter()
            .map(|h| h.header_size)
            .max()
            .unwrap_or(0)
    }

    /// Run every registered detector against a header window.
    /// Returns the matching handler and its format id.
    pub fn detect<'r>(&'r self, info: &DetectInfo) -> Option<(&'r FormatHandler, i32)> {
        for handler in &self.handlers {
            if info.header.len() < handler.header_size {
                // Window too small for this candidate; skip, not an error.
                continue;
            }
            let id = (handler.detect)(info);
            if id >= 0 {
                debug!("detected {} (format id {})", handler.name, id);
                return Some((handler, id));
            }
        }
        None
    }

    /// Probe the source's header window once and open the first matching
    /// handler. Fails with [`RomError::InvalidRom`] when nothing matches
    /// or the matched handler rejects the image on full parse.
    pub fn open(&self, mut source: Box<dyn ReadSeek>) -> Result<Box<dyn RomData>, RomError> {
        let file_size = source.seek(SeekFrom::End(0))?;
        source.seek(SeekFrom::Start(0))?;

        let want = self.max_header_size().min(file_size as usize);
        let mut header = vec![0u8; want];
        source.read_exact(&mut header)?;
        source.seek(SeekFrom::Start(0))?;

        let info = DetectInfo {
            header: &header,
            header_addr: 0,
            ext: None,
            file_size: Some(file_size),
        };

        let (handler, _id) = self.detect(&info).ok_or(RomError::InvalidRom)?;
        let rom = (handler.open)(source);
        if !rom.is_valid() {
            return Err(RomError::InvalidRom);
        }
        Ok(rom)
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
