//! Content-addressed resource keys for externally cached artwork.
//!
//! A resource key names one image in the external title-screen/artwork
//! database: a cache-key path segment plus the full URL on the database
//! host. Both are pure string formatting over {system tag, image type,
//! subdirectory, checksum, extension}; the checksum is derived by the
//! format handler (CRC-32 over a deterministic payload subset).

use serde::Serialize;

/// Base host for the external artwork database.
pub const EXTDB_BASE_URL: &str = "https://rpdb.gerbilsoft.com/";

/// External image categories a format handler may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImageType {
    /// Title screen capture.
    ExtTitleScreen,
    /// Cover / box art scan.
    ExtCover,
}

impl ImageType {
    /// Path segment used in cache keys and URLs for this image type.
    pub fn path_name(&self) -> &'static str {
        match self {
            Self::ExtTitleScreen => "title",
            Self::ExtCover => "cover",
        }
    }

    /// Human-readable name for text output.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ExtTitleScreen => "Title screen",
            Self::ExtCover => "Cover",
        }
    }
}

/// One available size for an external image type.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ImageSizeDef {
    /// Size variant name appended to the filename, if any (e.g. "HQ").
    pub name: Option<&'static str>,
    pub width: u32,
    pub height: u32,
    /// Size index; indexes >= 2 are considered high-resolution.
    pub index: u32,
}

/// A derived external resource: cache key plus full URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtUrl {
    pub url: String,
    pub cache_key: String,
    pub width: u32,
    pub height: u32,
    pub high_res: bool,
}

/// Format a cache key: `<sys>/<imageType>/<subdir>/<name><ext>`.
///
/// `ext` includes the leading dot. `name` is typically the lowercase
/// 8-hex-digit CRC-32 of the payload subset.
pub fn cache_key(sys: &str, image_type: ImageType, subdir: &str, name: &str, ext: &str) -> String {
    format!("{}/{}/{}/{}{}", sys, image_type.path_name(), subdir, name, ext)
}

/// Format the full database URL for the same resource.
pub fn external_url(sys: &str, image_type: ImageType, subdir: &str, name: &str, ext: &str) -> String {
    format!(
        "{}{}",
        EXTDB_BASE_URL,
        cache_key(sys, image_type, subdir, name, ext)
    )
}

#[cfg(test)]
#[path = "tests/cachekey_tests.rs"]
mod tests;
