use super::*;
use std::io::Cursor;

/// Minimal C64 cartridge image: header plus one CHIP packet.
fn c64_crt(title: &str, hw_type: u16, payload: &[u8]) -> Vec<u8> {
    let mut buf = vec![0u8; 0x40];
    buf[..16].copy_from_slice(b"C64 CARTRIDGE   ");
    buf[0x10..0x14].copy_from_slice(&0x40u32.to_be_bytes());
    buf[0x14..0x16].copy_from_slice(&0x0100u16.to_be_bytes());
    buf[0x16..0x18].copy_from_slice(&hw_type.to_be_bytes());
    buf[0x20..0x20 + title.len()].copy_from_slice(title.as_bytes());

    if !payload.is_empty() {
        let mut chip = [0u8; 0x10];
        chip[..4].copy_from_slice(b"CHIP");
        chip[0x0E..0x10].copy_from_slice(&(payload.len() as u16).to_be_bytes());
        buf.extend_from_slice(&chip);
        buf.extend_from_slice(payload);
    }
    buf
}

#[test]
fn registry_probes_the_full_header() {
    assert_eq!(registry().max_header_size(), 0x40);
}

#[test]
fn open_rom_detects_c64_cartridge() {
    let data = c64_crt("TESTGAME", 32, b"BANK");
    let mut rom = open_rom(Box::new(Cursor::new(data))).unwrap();
    assert!(rom.is_valid());
    assert_eq!(rom.system_name(NameKind::Long), Some("Commodore 64"));
    assert_eq!(rom.file_type(), "ROM cartridge");

    assert_eq!(rom.load_fields().unwrap(), 2);
    let fields = rom.fields().unwrap();
    assert_eq!(fields.get(0).unwrap().name, "Title");
    assert_eq!(fields.get(1).unwrap().name, "Type");
}

#[test]
fn unmapped_type_renders_numerically() {
    let data = c64_crt("TESTGAME", 999, b"BANK");
    let mut rom = open_rom(Box::new(Cursor::new(data))).unwrap();
    rom.load_fields().unwrap();
    let ty = rom.fields().unwrap().get(1).unwrap();
    assert!(
        matches!(&ty.data, romprops_core::FieldData::String(s) if s == "Unknown (999)")
    );
}

#[test]
fn open_rom_rejects_unknown_format() {
    let err = open_rom(Box::new(Cursor::new(vec![0u8; 0x100]))).unwrap_err();
    assert!(matches!(err, RomError::InvalidRom));
}

#[test]
fn full_text_report() {
    let payload = b"BANKDATA";
    let data = c64_crt("TESTGAME", 32, payload);
    let mut rom = open_rom(Box::new(Cursor::new(data))).unwrap();
    let report = RomOutput::new(rom.as_mut(), 0).to_string();

    assert!(report.starts_with("-- Commodore 64 ROM cartridge detected\n"));
    assert!(report.contains("Title: 'TESTGAME'"));
    assert!(report.contains("Type:  'EasyFlash'"));

    let crc = format!("{:08x}", crc32fast::hash(payload));
    let key = format!("c64/title/crt/32/{}.png", crc);
    assert!(report.contains(&format!(
        "-- Title screen: https://rpdb.gerbilsoft.com/{} (cache_key: {})",
        key, key
    )));
}
