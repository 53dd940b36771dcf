use super::*;
use crate::{NameKind, RomFields, RomMetaData};
use std::io::Cursor;

/// Minimal handler used to exercise the registry plumbing.
struct DummyRom {
    open: bool,
    fields: Option<RomFields>,
    metadata: Option<RomMetaData>,
}

impl DummyRom {
    fn new() -> Self {
        Self {
            open: true,
            fields: None,
            metadata: None,
        }
    }
}

impl RomData for DummyRom {
    fn is_valid(&self) -> bool {
        true
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn system_name(&self, _kind: NameKind) -> Option<&'static str> {
        Some("Dummy System")
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &[".dmy"]
    }

    fn load_fields(&mut self) -> Result<usize, RomError> {
        if self.fields.is_none() {
            let mut fields = RomFields::new();
            fields.add_string("Title", "DUMMY");
            self.fields = Some(fields);
        }
        Ok(self.fields.as_ref().map(RomFields::count).unwrap_or(0))
    }

    fn fields(&mut self) -> Option<&RomFields> {
        let _ = self.load_fields();
        self.fields.as_ref()
    }

    fn load_metadata(&mut self) -> Result<usize, RomError> {
        if self.metadata.is_none() {
            self.metadata = Some(RomMetaData::new());
        }
        Ok(0)
    }

    fn metadata(&mut self) -> Option<&RomMetaData> {
        let _ = self.load_metadata();
        self.metadata.as_ref()
    }
}

fn dummy_detect(info: &DetectInfo) -> i32 {
    if info.header_addr != 0 || info.header.len() < 4 {
        return -1;
    }
    if &info.header[..4] == b"DUMY" { 0 } else { -1 }
}

fn dummy_open(_source: Box<dyn ReadSeek>) -> Box<dyn RomData> {
    Box::new(DummyRom::new())
}

fn registry() -> FormatRegistry {
    let mut registry = FormatRegistry::new();
    registry.register(FormatHandler {
        name: "Dummy",
        header_size: 4,
        extensions: &[".dmy"],
        detect: dummy_detect,
        open: dummy_open,
    });
    registry
}

#[test]
fn max_header_size_covers_all_handlers() {
    assert_eq!(registry().max_header_size(), 4);
    assert_eq!(FormatRegistry::new().max_header_size(), 0);
}

#[test]
fn detect_matches_registered_magic() {
    let registry = registry();
    let info = DetectInfo::for_header(b"DUMYxxxx");
    let (handler, id) = registry.detect(&info).unwrap();
    assert_eq!(handler.name, "Dummy");
    assert_eq!(id, 0);
}

#[test]
fn detect_skips_short_window() {
    let registry = registry();
    let info = DetectInfo::for_header(b"DU");
    assert!(registry.detect(&info).is_none());
}

#[test]
fn detect_rejects_unknown_magic() {
    let registry = registry();
    let info = DetectInfo::for_header(b"NOPE....");
    assert!(registry.detect(&info).is_none());
}

#[test]
fn open_dispatches_to_matching_handler() {
    let registry = registry();
    let mut rom = registry
        .open(Box::new(Cursor::new(b"DUMY and some payload".to_vec())))
        .unwrap();
    assert!(rom.is_valid());
    assert_eq!(rom.system_name(NameKind::Long), Some("Dummy System"));
    assert_eq!(rom.load_fields().unwrap(), 1);
}

#[test]
fn open_fails_for_unknown_format() {
    let registry = registry();
    let err = registry
        .open(Box::new(Cursor::new(b"XXXXXXXX".to_vec())))
        .unwrap_err();
    assert!(matches!(err, RomError::InvalidRom));
    assert_eq!(err.posix_code(), -5);
}
