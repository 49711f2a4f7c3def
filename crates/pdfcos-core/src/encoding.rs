//! PDF string/name syntax encoding and text normalization.
//!
//! PDF text values arrive as UTF-16 (either endianness, marked by a BOM),
//! UTF-8, or Latin-1, and must be normalized to one canonical UTF-8
//! representation. Going the other way, text written into a
//! document must follow PDF string and name syntax exactly. Pure functions,
//! no state.

use std::fmt::Write as _;

/// Encode a text value as a PDF string token.
///
/// If every byte is printable ASCII (32–127) and none of `( ) \ % #`
/// appear, the text is emitted verbatim as a literal string `(...)`.
/// Otherwise it is converted to UTF-16BE and emitted as a hex string
/// `<FEFF...>`, four uppercase hex digits per code unit, with surrogate
/// pairs for code points above U+FFFF.
pub fn encode_pdf_string(text: &str) -> String {
    let plain = text
        .bytes()
        .all(|b| (32..=127).contains(&b) && !matches!(b, b'(' | b')' | b'\\' | b'%' | b'#'));
    if plain {
        return format!("({text})");
    }

    let mut out = String::with_capacity(6 + text.len() * 4);
    out.push_str("<FEFF");
    let mut units = [0u16; 2];
    for ch in text.chars() {
        for unit in ch.encode_utf16(&mut units) {
            let _ = write!(out, "{unit:04X}");
        }
    }
    out.push('>');
    out
}

/// Encode a name token: `[A-Za-z0-9-]` pass through, every other byte
/// becomes `_`.
pub fn encode_pdf_name(name: &str) -> String {
    name.bytes()
        .map(|b| {
            if b.is_ascii_alphanumeric() || b == b'-' {
                b as char
            } else {
                '_'
            }
        })
        .collect()
}

/// Normalize a raw byte string to UTF-8.
///
/// A leading byte-order mark selects UTF-16 decoding (`FE FF` big-endian,
/// `FF FE` little-endian; the mark is stripped and surrogate pairs are
/// reconstructed). Without a mark, valid UTF-8 passes through unchanged and
/// anything else is reinterpreted as Latin-1.
pub fn decode_text_bytes(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return String::new();
    }

    let be_marker = bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF;
    let le_marker = bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] == 0xFE;
    if !be_marker && !le_marker {
        return match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => encoding_rs::mem::decode_latin1(bytes).into_owned(),
        };
    }

    let payload = &bytes[2..];
    let (decoded, _had_errors) = if be_marker {
        encoding_rs::UTF_16BE.decode_without_bom_handling(payload)
    } else {
        encoding_rs::UTF_16LE.decode_without_bom_handling(payload)
    };
    decoded.into_owned()
}
