use thiserror::Error;

// POSIX errno values used for the negative-code rendering.
const EBADF: i32 = 9;
const EIO: i32 = 5;
const ENOENT: i32 = 2;

/// Errors reported by format handlers and the registry.
#[derive(Debug, Error)]
pub enum RomError {
    /// The backing byte source is not open (closed or never attached).
    #[error("byte source is not open")]
    NotOpen,

    /// The ROM image is invalid, unrecognized, or has no readable payload.
    #[error("ROM image is invalid or unsupported")]
    InvalidRom,

    /// No data or size descriptor exists for the request.
    #[error("no applicable data for this request")]
    NoData,

    /// I/O error from the byte source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RomError {
    /// Negative POSIX-style status code for this error, for consumers
    /// that want the numeric form (-EBADF, -EIO, -ENOENT).
    pub fn posix_code(&self) -> i32 {
        match self {
            Self::NotOpen => -EBADF,
            Self::InvalidRom | Self::Io(_) => -EIO,
            Self::NoData => -ENOENT,
        }
    }
}
