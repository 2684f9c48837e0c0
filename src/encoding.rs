//! Text string decoding.
//!
//! PDF text strings are either UTF-16BE with a leading byte order mark
//! (0xFE 0xFF) or PDFDocEncoding. ISO 32000-1:2008, Section 7.9.2.2.

/// UTF-16BE byte order mark.
const UTF16BE_BOM: [u8; 2] = [0xFE, 0xFF];

/// Returns true when `bytes` carries the UTF-16BE byte order mark.
pub fn is_utf16be(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[..2] == UTF16BE_BOM
}

/// Decode UTF-16BE bytes that start with a byte order mark.
///
/// Returns `None` for an odd payload length or unpaired surrogates.
pub fn decode_utf16be(bytes: &[u8]) -> Option<String> {
    let payload = bytes.strip_prefix(&UTF16BE_BOM[..])?;
    if payload.len() % 2 != 0 {
        return None;
    }

    let units: Vec<u16> = payload
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();

    String::from_utf16(&units).ok()
}

/// Decode a PDF text string.
///
/// `None` means the string claims UTF-16BE but is not valid UTF-16BE, or
/// contains a byte PDFDocEncoding leaves undefined.
pub fn decode_text_string(bytes: &[u8]) -> Option<String> {
    if is_utf16be(bytes) {
        decode_utf16be(bytes)
    } else {
        bytes.iter().map(|&b| pdfdoc_lookup(b)).collect()
    }
}

/// PDFDocEncoding, ISO 32000-1:2008 Annex D.2, Table D.2.
fn pdfdoc_lookup(code: u8) -> Option<char> {
    let c = match code {
        0x00..=0x7F => code as char,
        0x80 => '\u{2022}',
        0x81 => '\u{2020}',
        0x82 => '\u{2021}',
        0x83 => '\u{2026}',
        0x84 => '\u{2014}',
        0x85 => '\u{2013}',
        0x86 => '\u{0192}',
        0x87 => '\u{2044}',
        0x88 => '\u{2039}',
        0x89 => '\u{203A}',
        0x8A => '\u{2212}',
        0x8B => '\u{2030}',
        0x8C => '\u{201E}',
        0x8D => '\u{201C}',
        0x8E => '\u{201D}',
        0x8F => '\u{2018}',
        0x90 => '\u{2019}',
        0x91 => '\u{201A}',
        0x92 => '\u{2122}',
        0x93 => '\u{FB01}',
        0x94 => '\u{FB02}',
        0x95 => '\u{0141}',
        0x96 => '\u{0152}',
        0x97 => '\u{0160}',
        0x98 => '\u{0178}',
        0x99 => '\u{017D}',
        0x9A => '\u{0131}',
        0x9B => '\u{0142}',
        0x9C => '\u{0153}',
        0x9D => '\u{0161}',
        0x9E => '\u{017E}',
        0x9F => return None,
        0xA0 => '\u{20AC}',
        0xA1..=0xFF => code as char,
    };
    Some(c)
}
