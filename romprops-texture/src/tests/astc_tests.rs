use super::*;

/// A void-extent block: every texel decodes to one constant color.
/// Colors are UNORM16; 0xFFFF and 0x0000 map exactly to 0xFF and 0x00.
fn void_extent(r: u16, g: u16, b: u16, a: u16) -> [u8; 16] {
    let mut block = [0u8; 16];
    block[0] = 0xFC;
    block[1] = 0xFD;
    block[2..8].fill(0xFF);
    block[8..10].copy_from_slice(&r.to_le_bytes());
    block[10..12].copy_from_slice(&g.to_le_bytes());
    block[12..14].copy_from_slice(&b.to_le_bytes());
    block[14..16].copy_from_slice(&a.to_le_bytes());
    block
}

const RED: [u8; 16] = [
    0xFC, 0xFD, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF,
];

#[test]
fn rejects_zero_dimensions() {
    assert!(matches!(
        decode_astc(0, 8, (4, 4), &[]),
        Err(TextureError::InvalidDimensions { .. })
    ));
}

#[test]
fn rejects_unsupported_block_size() {
    let err = decode_astc(8, 8, (7, 7), &[0u8; 64]).unwrap_err();
    assert!(matches!(
        err,
        TextureError::UnsupportedBlockSize { width: 7, height: 7 }
    ));
}

#[test]
fn rejects_undersized_data() {
    // 16x16 with 6x6 blocks: 3x3 grid, 144 bytes.
    let err = decode_astc(16, 16, (6, 6), &[0u8; 128]).unwrap_err();
    match err {
        TextureError::SizeMismatch { expected, actual } => {
            assert_eq!(expected, 144);
            assert_eq!(actual, 128);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn trailing_bytes_are_ignored() {
    // One 4x4 block plus appended data (e.g. a mipmap level); only the
    // grid is decoded.
    let mut data = void_extent(0xFFFF, 0, 0, 0xFFFF).to_vec();
    data.extend_from_slice(&[0u8; 16]);
    let img = decode_astc(4, 4, (4, 4), &data).unwrap();
    assert_eq!(img.pixel(0, 0), 0xFFFF_0000);
    assert_eq!(img.pixel(3, 3), 0xFFFF_0000);
}

#[test]
fn decodes_constant_color_blocks() {
    // 8x8 image, 4x4 blocks: red, green / blue, opaque black.
    let mut data = Vec::new();
    data.extend_from_slice(&void_extent(0xFFFF, 0, 0, 0xFFFF));
    data.extend_from_slice(&void_extent(0, 0xFFFF, 0, 0xFFFF));
    data.extend_from_slice(&void_extent(0, 0, 0xFFFF, 0xFFFF));
    data.extend_from_slice(&void_extent(0, 0, 0, 0xFFFF));

    let img = decode_astc(8, 8, (4, 4), &data).unwrap();
    assert_eq!(img.width(), 8);
    assert_eq!(img.height(), 8);
    assert_eq!(img.depth(), [8, 8, 8, 8]);

    assert_eq!(img.pixel(0, 0), 0xFFFF_0000);
    assert_eq!(img.pixel(3, 3), 0xFFFF_0000);
    assert_eq!(img.pixel(4, 0), 0xFF00_FF00);
    assert_eq!(img.pixel(0, 4), 0xFF00_00FF);
    assert_eq!(img.pixel(7, 7), 0xFF00_0000);
}

#[test]
fn alpha_lands_in_the_high_byte() {
    let data = void_extent(0xFFFF, 0xFFFF, 0xFFFF, 0);
    let img = decode_astc(4, 4, (4, 4), &data).unwrap();
    assert_eq!(img.pixel(2, 2), 0x00FF_FFFF);
}

#[test]
fn crops_non_aligned_dimensions() {
    // 10x10 with 6x6 blocks: 2x2 grid, physical 12x12 cropped to 10x10.
    let mut data = Vec::new();
    for block in [
        void_extent(0xFFFF, 0, 0, 0xFFFF),
        void_extent(0, 0xFFFF, 0, 0xFFFF),
        void_extent(0, 0, 0xFFFF, 0xFFFF),
        void_extent(0xFFFF, 0xFFFF, 0xFFFF, 0xFFFF),
    ] {
        data.extend_from_slice(&block);
    }

    let img = decode_astc(10, 10, (6, 6), &data).unwrap();
    assert_eq!(img.width(), 10);
    assert_eq!(img.height(), 10);
    assert_eq!(img.stride(), 12);
    assert_eq!(img.row(9).len(), 10);

    // Corners come from the four distinct blocks.
    assert_eq!(img.pixel(0, 0), 0xFFFF_0000);
    assert_eq!(img.pixel(9, 0), 0xFF00_FF00);
    assert_eq!(img.pixel(0, 9), 0xFF00_00FF);
    assert_eq!(img.pixel(9, 9), 0xFFFF_FFFF);
}

#[test]
fn wide_footprints_decode() {
    // 12x12 with 12x12 blocks: a single block covers the image.
    let data = RED;
    let img = decode_astc(12, 12, (12, 12), &data).unwrap();
    assert_eq!(img.pixel(0, 0), 0xFFFF_0000);
    assert_eq!(img.pixel(11, 11), 0xFFFF_0000);
}

#[test]
fn single_column_of_blocks() {
    // 5x20 with 5x5 blocks: a 1x4 grid exercises banding with one block
    // per band.
    let mut data = Vec::new();
    for _ in 0..4 {
        data.extend_from_slice(&void_extent(0, 0xFFFF, 0xFFFF, 0xFFFF));
    }
    let img = decode_astc(5, 20, (5, 5), &data).unwrap();
    assert_eq!(img.pixel(4, 19), 0xFF00_FFFF);
}
