/// Windows-1252 mappings for the 0x80-0x9F window. 0 marks undefined
/// code points, which are passed through as U+FFFD.
const CP1252_HIGH: [u32; 32] = [
    0x20AC, 0, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, //
    0x02C6, 0x2030, 0x0160, 0x2039, 0x0152, 0, 0x017D, 0, //
    0, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014, //
    0x02DC, 0x2122, 0x0161, 0x203A, 0x0153, 0, 0x017E, 0x0178,
];

/// Decode a Windows-1252 byte buffer into UTF-8.
///
/// Stops at the first null byte. Trailing whitespace is trimmed when
/// `trim_end` is set, matching header fields padded with NULs or spaces.
pub fn cp1252_to_utf8(buf: &[u8], trim_end: bool) -> String {
    let s: String = buf
        .iter()
        .take_while(|&&b| b != 0)
        .map(|&b| match b {
            0x80..=0x9F => {
                let cp = CP1252_HIGH[(b - 0x80) as usize];
                if cp != 0 {
                    char::from_u32(cp).unwrap_or('\u{FFFD}')
                } else {
                    '\u{FFFD}'
                }
            }
            _ => b as char,
        })
        .collect();
    if trim_end {
        s.trim_end().to_string()
    } else {
        s
    }
}

#[cfg(test)]
#[path = "tests/util_tests.rs"]
mod tests;
