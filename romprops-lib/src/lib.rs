//! Top-level facade: one registry with every built-in format handler,
//! plus re-exports of the core model and renderers.

pub use romprops_commodore::{CartKind, CbmCart};
pub use romprops_core::textout::{FieldsOutput, RomOutput};
pub use romprops_core::{
    DetectInfo, ExtUrl, FormatHandler, FormatRegistry, ImageSizeDef, ImageType, NameKind,
    ReadSeek, RomData, RomError, RomFields, RomMetaData,
};
pub use romprops_texture::{decode_astc, PixelBuffer, TextureError};

/// A registry populated with every built-in format handler.
pub fn registry() -> FormatRegistry {
    let mut registry = FormatRegistry::new();
    registry.register(CbmCart::handler());
    registry
}

/// Probe `source` against the built-in handlers and open it with the
/// matching one.
pub fn open_rom(source: Box<dyn ReadSeek>) -> Result<Box<dyn RomData>, RomError> {
    registry().open(source)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
