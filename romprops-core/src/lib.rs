//! Core abstractions for ROM/cartridge metadata extraction.
//!
//! Format handler crates implement [`RomData`] over an owned byte source;
//! consumers (renderers, thumbnailers, property pages) use the field and
//! metadata collections plus derived external resource keys.

use std::io::{Read, Seek};

pub mod cachekey;
pub mod error;
pub mod fields;
pub mod metadata;
pub mod registry;
pub mod textout;
pub mod util;

pub use cachekey::{ExtUrl, ImageSizeDef, ImageType};
pub use error::RomError;
pub use fields::{Field, FieldData, LangCode, RomFields};
pub use metadata::{MetaValue, Property, RomMetaData};
pub use registry::{FormatHandler, FormatRegistry};

/// A reader that implements both Read and Seek.
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

/// Read-only detection view over a file-prefix byte window.
///
/// Created per probe; never owned beyond the `detect` call.
#[derive(Debug, Clone, Copy)]
pub struct DetectInfo<'a> {
    /// Header bytes, starting at `header_addr` within the file.
    pub header: &'a [u8],
    /// File offset of the first header byte. Detectors require 0.
    pub header_addr: u64,
    /// Lowercase filename extension including the dot, if known.
    pub ext: Option<&'a str>,
    /// Total file size, if known.
    pub file_size: Option<u64>,
}

impl<'a> DetectInfo<'a> {
    /// Detection view over a header window read from offset 0.
    pub fn for_header(header: &'a [u8]) -> Self {
        Self {
            header,
            header_addr: 0,
            ext: None,
            file_size: None,
        }
    }
}

/// System name variants, longest to shortest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// Full name, e.g. "Commodore 64".
    Long,
    /// Short name, e.g. "C64".
    Short,
    /// Abbreviation for tight UI spots.
    Abbreviation,
}

/// Capability interface implemented by every format handler.
///
/// A handler exclusively owns its byte source for the instance's lifetime.
/// Instances are not thread-safe; callers must serialize access. Field,
/// metadata, and resource-key state is computed lazily and at most once.
pub trait RomData {
    /// True if the source was readable and detection succeeded.
    fn is_valid(&self) -> bool;

    /// True while the byte source is still attached.
    fn is_open(&self) -> bool;

    /// Release the byte source. Loaded fields/metadata remain available;
    /// operations that need the source fail with [`RomError::NotOpen`].
    fn close(&mut self);

    /// Name of the detected system, or `None` for an invalid instance.
    fn system_name(&self, kind: NameKind) -> Option<&'static str>;

    /// Human-readable file type, e.g. "ROM cartridge".
    fn file_type(&self) -> &'static str {
        "ROM image"
    }

    /// Filename extensions this handler recognizes (with leading dot).
    fn file_extensions(&self) -> &'static [&'static str];

    /// MIME types for the recognized formats.
    fn mime_types(&self) -> &'static [&'static str] {
        &[]
    }

    /// Build the field collection if not yet built; returns the field
    /// count. Idempotent: a second call returns the existing count
    /// without appending.
    fn load_fields(&mut self) -> Result<usize, RomError>;

    /// The field collection, loading it on first access.
    fn fields(&mut self) -> Option<&RomFields>;

    /// Build the metadata properties if not yet built; returns the
    /// property count. Independent of [`load_fields`](Self::load_fields)
    /// and independently idempotent.
    fn load_metadata(&mut self) -> Result<usize, RomError>;

    /// The metadata collection, loading it on first access.
    fn metadata(&mut self) -> Option<&RomMetaData>;

    /// External image types this handler can derive resource keys for.
    fn supported_image_types(&self) -> &'static [ImageType] {
        &[]
    }

    /// Available sizes for an external image type; empty if unsupported.
    fn supported_image_sizes(&self, _image_type: ImageType) -> &'static [ImageSizeDef] {
        &[]
    }

    /// Derive external resource keys (cache key + URL) for an image type.
    /// `size_hint` is a requested size in pixels; handlers with a single
    /// size ignore it.
    fn ext_urls(&mut self, _image_type: ImageType, _size_hint: u32) -> Result<Vec<ExtUrl>, RomError> {
        Err(RomError::NoData)
    }
}

impl std::fmt::Debug for dyn RomData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RomData")
            .field("valid", &self.is_valid())
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}
