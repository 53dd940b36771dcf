//! Commodore cartridge image (.crt) format family.
//!
//! Supports:
//! - C64 cartridges (CRT v1.0+)
//! - C128, CBM-II, VIC-20, and Plus/4 cartridges (CRT v2.0)

pub mod cbmcart;

pub use cbmcart::{CartKind, CbmCart};
