//! Commodore ROM cartridge reader.
//!
//! Parses the 0x40-byte CRT container header, identifies the target
//! system from the magic string, builds Title/Type fields, and derives
//! external title-screen resource keys from the CRC-32 of the first
//! 16 KiB of CHIP packet data.

use std::io::{Read, Seek, SeekFrom};

use log::debug;

use romprops_core::cachekey::{cache_key, external_url};
use romprops_core::util::cp1252_to_utf8;
use romprops_core::{
    DetectInfo, ExtUrl, ImageSizeDef, ImageType, NameKind, ReadSeek, RomData, RomError, RomFields,
    RomMetaData,
};
use romprops_core::metadata::Property;
use romprops_core::registry::FormatHandler;

// ---------------------------------------------------------------------------
// CRT container layout
// ---------------------------------------------------------------------------

/// Fixed CRT container header size.
pub const CRT_HEADER_SIZE: usize = 0x40;

/// CHIP packet header size.
const CHIP_HEADER_SIZE: usize = 0x10;

/// "CHIP" packet magic, big-endian.
const CHIP_MAGIC: u32 = 0x4348_4950;

/// Checksum scratch capacity: the CRC-32 covers at most the first 16 KiB
/// of concatenated CHIP ROM data.
const ROM_CRC_BUF_SIZE: usize = 16 * 1024;

// 16-byte, space-padded magic strings, one per target system.
const MAGIC_C64: &[u8; 16] = b"C64 CARTRIDGE   ";
const MAGIC_C128: &[u8; 16] = b"C128 CARTRIDGE  ";
const MAGIC_CBM2: &[u8; 16] = b"CBM2 CARTRIDGE  ";
const MAGIC_VIC20: &[u8; 16] = b"VIC20 CARTRIDGE ";
const MAGIC_PLUS4: &[u8; 16] = b"PLUS4 CARTRIDGE ";

/// Parsed CRT container header. Multi-byte fields are big-endian on disk.
#[derive(Debug, Clone)]
struct CrtHeader {
    /// Offset of the first CHIP packet.
    hdr_len: u32,
    /// Hardware (cartridge) type code.
    hw_type: u16,
    /// C64 EXROM line state.
    exrom: u8,
    /// C64 GAME line state.
    game: u8,
    /// Hardware subtype (CRT v1.1+).
    subtype: u8,
    /// Cartridge title, cp1252, NUL/space padded.
    title: [u8; 32],
}

impl CrtHeader {
    fn parse(buf: &[u8; CRT_HEADER_SIZE]) -> Self {
        let mut title = [0u8; 32];
        title.copy_from_slice(&buf[0x20..0x40]);
        Self {
            hdr_len: u32::from_be_bytes([buf[0x10], buf[0x11], buf[0x12], buf[0x13]]),
            hw_type: u16::from_be_bytes([buf[0x16], buf[0x17]]),
            exrom: buf[0x18],
            game: buf[0x19],
            subtype: buf[0x1A],
            title,
        }
    }
}

// ---------------------------------------------------------------------------
// System identification
// ---------------------------------------------------------------------------

/// Commodore systems a CRT image can target. Ids are stable and match
/// the registry's non-negative format-id convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartKind {
    C64 = 0,
    C128 = 1,
    Cbm2 = 2,
    Vic20 = 3,
    Plus4 = 4,
}

impl CartKind {
    pub fn id(self) -> i32 {
        self as i32
    }

    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            0 => Some(Self::C64),
            1 => Some(Self::C128),
            2 => Some(Self::Cbm2),
            3 => Some(Self::Vic20),
            4 => Some(Self::Plus4),
            _ => None,
        }
    }

    /// System tag used in cache keys and URLs.
    fn sys_tag(self) -> &'static str {
        match self {
            Self::C64 => "c64",
            Self::C128 => "c128",
            Self::Cbm2 => "cbmII",
            Self::Vic20 => "vic20",
            Self::Plus4 => "plus4",
        }
    }
}

/// System display names: long, short, abbreviation.
const SYS_NAMES: [[&str; 3]; 5] = [
    ["Commodore 64", "C64", "C64"],
    ["Commodore 128", "C128", "C128"],
    ["Commodore CBM-II", "CBM-II", "CBM-II"],
    ["Commodore VIC-20", "VIC-20", "VIC-20"],
    ["Commodore Plus/4", "Plus/4", "Plus/4"],
];

// ---------------------------------------------------------------------------
// Cartridge type tables (synchronized with VICE 3.6)
// ---------------------------------------------------------------------------

const CRT_TYPES_C64: [&str; 78] = [
    // 0
    "generic cartridge", "Action Replay", "KCS Power Cartridge",
    "Final Cartridge III", "Simons' BASIC", "Ocean type 1",
    "Expert Cartridge", "Fun Play, Power Play", "Super Games",
    "Atomic Power",
    // 10
    "Epyx Fastload", "Westermann Learning", "Rex Utility",
    "Final Cartridge I", "Magic Formel", "C64 Game System, System 3",
    "Warp Speed", "Dinamic", "Zaxxon / Super Zaxxon (Sega)",
    "Magic Desk, Domark, HES Australia",
    // 20
    "Super Snapshot V5", "Comal-80", "Structured BASIC",
    "Ross", "Dela EP64", "Dela EP7x8", "Dela EP256",
    "Rex EP256", "Mikro Assembler", "Final Cartridge Plus",
    // 30
    "Action Replay 4", "Stardos", "EasyFlash", "EasyFlash Xbank",
    "Capture", "Action Replay 3", "Retro Replay",
    "MMC64", "MMC Replay", "IDE64",
    // 40
    "Super Snapshot V4", "IEEE-488", "Game Killer", "Prophet64",
    "EXOS", "Freeze Frame", "Freeze Machine", "Snapshot64",
    "Super Explode V5.0", "Magic Voice",
    // 50
    "Action Replay 2", "MACH 5", "Diashow-Maker", "Pagefox",
    "Kingsoft", "Silverrock 128K Cartridge", "Formel 64",
    "RGCD", "RR-Net MK3", "EasyCalc",
    // 60
    "GMod2", "MAX Basic", "GMod3", "ZIPP-CODE 48",
    "Blackbox V8", "Blackbox V3", "Blackbox V4",
    "REX RAM-Floppy", "BIS-Plus", "SD-BOX",
    // 70
    "MultiMAX", "Blackbox V9", "Lt. Kernal Host Adaptor",
    "RAMLink", "H.E.R.O.", "IEEE Flash! 64",
    "Turtle Graphics II", "Freeze Frame MK2",
];

/// Generic C64 cartridge subtypes, indexed by (EXROM<<1 | GAME).
const CRT_TYPES_C64_GENERIC: [&str; 4] = [
    "16 KB game", "8 KB game", "UltiMax mode", "RAM/disabled",
];

const CRT_TYPES_VIC20: [&str; 6] = [
    "generic cartridge",
    "Mega-Cart",
    "Behr Bonz",
    "Vic Flash Plugin",
    "UltiMem",
    "Final Expansion",
];

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// Identify the target system from a CRT header window.
///
/// Pure function of the input. Returns `None` when the window is offset,
/// too small, carries an unknown magic, or declares a feature its format
/// version does not allow.
pub fn detect(info: &DetectInfo) -> Option<CartKind> {
    if info.header_addr != 0 || info.header.len() < CRT_HEADER_SIZE {
        // No usable detection window; not an error.
        return None;
    }

    let magic: &[u8] = &info.header[..16];
    let kind = if magic == MAGIC_C64 {
        CartKind::C64
    } else if magic == MAGIC_C128 {
        CartKind::C128
    } else if magic == MAGIC_CBM2 {
        CartKind::Cbm2
    } else if magic == MAGIC_VIC20 {
        CartKind::Vic20
    } else if magic == MAGIC_PLUS4 {
        CartKind::Plus4
    } else {
        return None;
    };

    let version = u16::from_be_bytes([info.header[0x14], info.header[0x15]]);

    // Feature gating: reject declarations newer than the format version.

    // Subtype requires v1.1.
    let subtype = info.header[0x1A];
    if subtype != 0 && version < 0x0101 {
        return None;
    }

    // Systems other than C64 require v2.0.
    if kind != CartKind::C64 && version < 0x0200 {
        return None;
    }

    Some(kind)
}

fn detect_id(info: &DetectInfo) -> i32 {
    detect(info).map(CartKind::id).unwrap_or(-1)
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

const TITLE_SCREEN_SIZES: [ImageSizeDef; 1] = [ImageSizeDef {
    name: None,
    // VICE C64 NTSC capture dimensions.
    width: 384,
    height: 247,
    index: 0,
}];

const SUPPORTED_IMAGE_TYPES: [ImageType; 1] = [ImageType::ExtTitleScreen];

/// A Commodore cartridge image.
///
/// Owns its byte source exclusively; check [`is_valid`](RomData::is_valid)
/// after construction. Fields, metadata, and the payload CRC-32 are
/// computed lazily, each at most once.
pub struct CbmCart {
    file: Option<Box<dyn ReadSeek>>,
    kind: Option<CartKind>,
    header: Option<CrtHeader>,
    fields: Option<RomFields>,
    metadata: Option<RomMetaData>,
    /// CRC-32 of the first 16 KiB of CHIP ROM data; computed on demand
    /// by `ext_urls`.
    rom_crc32: Option<u32>,
}

impl CbmCart {
    /// Read a Commodore cartridge image.
    ///
    /// Reads the fixed header at offset 0 and runs detection. On a short
    /// read or an unrecognized/disallowed header the instance is invalid
    /// and the source is released immediately.
    pub fn new(mut file: Box<dyn ReadSeek>) -> Self {
        let mut cart = Self {
            file: None,
            kind: None,
            header: None,
            fields: None,
            metadata: None,
            rom_crc32: None,
        };

        let mut buf = [0u8; CRT_HEADER_SIZE];
        if file.seek(SeekFrom::Start(0)).is_err() || file.read_exact(&mut buf).is_err() {
            // Seek and/or read error; stay invalid with the source released.
            return cart;
        }

        let info = DetectInfo::for_header(&buf);
        let Some(kind) = detect(&info) else {
            debug!("CRT header did not match any supported system");
            return cart;
        };

        cart.file = Some(file);
        cart.kind = Some(kind);
        cart.header = Some(CrtHeader::parse(&buf));
        cart
    }

    /// Registry entry for this format family.
    pub fn handler() -> FormatHandler {
        FormatHandler {
            name: "CBMCart",
            header_size: CRT_HEADER_SIZE,
            extensions: Self::EXTS,
            detect: detect_id,
            open: |source| Box::new(CbmCart::new(source)),
        }
    }

    const EXTS: &'static [&'static str] = &[".crt"];

    const MIME_TYPES: &'static [&'static str] = &[
        // Unofficial MIME types.
        "application/x-c64-cartridge",
        "application/x-c128-cartridge",
        "application/x-cbm2-cartridge",
        "application/x-vic20-cartridge",
        "application/x-plus4-cartridge",
    ];

    /// The detected system, if the image was recognized.
    pub fn kind(&self) -> Option<CartKind> {
        self.kind
    }

    /// Cartridge type display string for the detected system, or `None`
    /// when the system has no type table or the code is unmapped.
    fn type_name(&self) -> Option<String> {
        let header = self.header.as_ref()?;
        let hw_type = header.hw_type;
        match self.kind? {
            CartKind::C64 => match hw_type {
                0 => {
                    // Generic cartridge; identify by the EXROM/GAME lines.
                    let id = u8::from(header.game != 0) | (u8::from(header.exrom != 0) << 1);
                    Some(CRT_TYPES_C64_GENERIC[(id & 3) as usize].to_string())
                }
                36 => Some(
                    if header.subtype == 1 { "Nordic Replay" } else { "Retro Replay" }.to_string(),
                ),
                57 => Some(if header.subtype == 1 { "Hucky" } else { "RGCD" }.to_string()),
                _ => CRT_TYPES_C64
                    .get(hw_type as usize)
                    .map(|s| s.to_string()),
            },
            CartKind::C128 => match hw_type {
                0 => Some("generic cartridge".to_string()),
                1 => Some(
                    match header.subtype {
                        1 => "Warpspeed128, REU support",
                        2 => "Warpspeed128, REU support, with I/O and ROM banking",
                        _ => "Warpspeed128",
                    }
                    .to_string(),
                ),
                _ => None,
            },
            CartKind::Vic20 => CRT_TYPES_VIC20
                .get(hw_type as usize)
                .map(|s| s.to_string()),
            // No type tables for these systems.
            CartKind::Cbm2 | CartKind::Plus4 => None,
        }
    }

    /// Walk CHIP packets and accumulate up to 16 KiB of ROM data, then
    /// CRC-32 the accumulated bytes. Cached after the first call.
    fn rom_crc32(&mut self) -> Result<u32, RomError> {
        if let Some(crc) = self.rom_crc32 {
            return Ok(crc);
        }

        let header = self.header.as_ref().ok_or(RomError::InvalidRom)?;
        let hdr_len = u64::from(header.hdr_len);
        let file = self.file.as_mut().ok_or(RomError::NotOpen)?;
        file.seek(SeekFrom::Start(hdr_len))?;

        let mut buf = vec![0u8; ROM_CRC_BUF_SIZE];
        let mut total = 0usize;
        while total < ROM_CRC_BUF_SIZE {
            let mut chip = [0u8; CHIP_HEADER_SIZE];
            if file.read_exact(&mut chip).is_err() {
                // Short read at a packet boundary; stop without error.
                break;
            }

            let magic = u32::from_be_bytes([chip[0], chip[1], chip[2], chip[3]]);
            if magic != CHIP_MAGIC {
                // Invalid packet; stop reading.
                break;
            }

            let rom_size = u16::from_be_bytes([chip[0x0E], chip[0x0F]]) as usize;
            if rom_size == 0 {
                // No data; the bank is invalid.
                break;
            }
            let to_read = rom_size.min(ROM_CRC_BUF_SIZE - total);

            let n = read_up_to(file.as_mut(), &mut buf[total..total + to_read]);
            total += n;
            if n < to_read {
                // A short packet still contributes its partial bytes.
                // Some dumps declare 16 KB but carry less.
                break;
            }
        }

        if total == 0 {
            // Unable to read *any* data.
            return Err(RomError::InvalidRom);
        }

        let crc = crc32fast::hash(&buf[..total]);
        debug!("CHIP payload CRC-32: {:08x} over {} bytes", crc, total);
        self.rom_crc32 = Some(crc);
        Ok(crc)
    }
}

/// Read until `buf` is full or the source is exhausted; returns the
/// number of bytes read. Interrupted reads are retried.
fn read_up_to(file: &mut dyn ReadSeek, buf: &mut [u8]) -> usize {
    let mut total = 0;
    while total < buf.len() {
        match file.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(_) => break,
        }
    }
    total
}

impl RomData for CbmCart {
    fn is_valid(&self) -> bool {
        self.kind.is_some()
    }

    fn is_open(&self) -> bool {
        self.file.is_some()
    }

    fn close(&mut self) {
        self.file = None;
    }

    fn system_name(&self, kind: NameKind) -> Option<&'static str> {
        let idx = self.kind?.id() as usize;
        // Fall back to the baseline entry for an out-of-range id.
        let row = SYS_NAMES.get(idx).unwrap_or(&SYS_NAMES[0]);
        Some(match kind {
            NameKind::Long => row[0],
            NameKind::Short => row[1],
            NameKind::Abbreviation => row[2],
        })
    }

    fn file_type(&self) -> &'static str {
        "ROM cartridge"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        Self::EXTS
    }

    fn mime_types(&self) -> &'static [&'static str] {
        Self::MIME_TYPES
    }

    fn load_fields(&mut self) -> Result<usize, RomError> {
        if let Some(fields) = &self.fields {
            // Field data has already been loaded.
            return Ok(fields.count());
        }
        if self.file.is_none() {
            return Err(RomError::NotOpen);
        }
        if self.kind.is_none() {
            return Err(RomError::InvalidRom);
        }
        let header = self.header.as_ref().ok_or(RomError::InvalidRom)?;
        let title = header.title;
        let hw_type = header.hw_type;

        let mut fields = RomFields::new();

        // Title
        if title[0] != 0 {
            fields.add_string("Title", cp1252_to_utf8(&title, true));
        }

        // Cartridge type
        let has_type_table = !matches!(self.kind, Some(CartKind::Cbm2 | CartKind::Plus4));
        if has_type_table {
            let text = self
                .type_name()
                .unwrap_or_else(|| format!("Unknown ({})", hw_type));
            fields.add_string("Type", text);
        }

        let count = fields.count();
        self.fields = Some(fields);
        Ok(count)
    }

    fn fields(&mut self) -> Option<&RomFields> {
        if self.fields.is_none() {
            let _ = self.load_fields();
        }
        self.fields.as_ref()
    }

    fn load_metadata(&mut self) -> Result<usize, RomError> {
        if let Some(metadata) = &self.metadata {
            // Metadata has already been loaded.
            return Ok(metadata.count());
        }
        if self.file.is_none() {
            return Err(RomError::NotOpen);
        }
        let header = match (&self.kind, &self.header) {
            (Some(_), Some(header)) => header,
            _ => return Err(RomError::InvalidRom),
        };

        let mut metadata = RomMetaData::new();
        if header.title[0] != 0 {
            metadata.add_text(Property::Title, cp1252_to_utf8(&header.title, true));
        }

        let count = metadata.count();
        self.metadata = Some(metadata);
        Ok(count)
    }

    fn metadata(&mut self) -> Option<&RomMetaData> {
        if self.metadata.is_none() {
            let _ = self.load_metadata();
        }
        self.metadata.as_ref()
    }

    fn supported_image_types(&self) -> &'static [ImageType] {
        &SUPPORTED_IMAGE_TYPES
    }

    fn supported_image_sizes(&self, image_type: ImageType) -> &'static [ImageSizeDef] {
        match image_type {
            ImageType::ExtTitleScreen => &TITLE_SCREEN_SIZES,
            _ => &[],
        }
    }

    fn ext_urls(&mut self, image_type: ImageType, _size_hint: u32) -> Result<Vec<ExtUrl>, RomError> {
        let Some(kind) = self.kind else {
            // ROM image isn't valid.
            return Err(RomError::InvalidRom);
        };

        let sizes = self.supported_image_sizes(image_type);
        if sizes.is_empty() {
            // Unsupported image type / no size descriptor.
            return Err(RomError::NoData);
        }
        let size = sizes[0];

        let hw_type = self.header.as_ref().ok_or(RomError::InvalidRom)?.hw_type;
        let crc = self.rom_crc32()?;
        let s_crc32 = format!("{:08x}", crc);

        // C64 cartridges bucket by hardware type; everything else shares
        // the flat "crt" bucket.
        let subdir = if kind == CartKind::C64 {
            format!("crt/{}", hw_type)
        } else {
            "crt".to_string()
        };

        let sys = kind.sys_tag();
        let ext = ".png";
        Ok(vec![ExtUrl {
            url: external_url(sys, image_type, &subdir, &s_crc32, ext),
            cache_key: cache_key(sys, image_type, &subdir, &s_crc32, ext),
            width: size.width,
            height: size.height,
            high_res: size.index >= 2,
        }])
    }
}

#[cfg(test)]
#[path = "tests/cbmcart_tests.rs"]
mod tests;
