//! Fixed-table base64 codec.
//!
//! The standard alphabet with `=` padding, table driven in both
//! directions. Kept outside the YAML engine, which only ever meets
//! base64 through the `!!binary` convenience helpers of the facade.

#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Display, Formatter};

const ENCODE_TABLE: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const PLACEHOLDER: u8 = b'=';

/// `0xFF` marks bytes outside the alphabet. The placeholder decodes to
/// zero so a padded quad runs through the same path as a full one.
const fn build_decode_table() -> [u8; 256] {
    let mut table = [0xFF_u8; 256];
    let mut i = 0;
    while i < 64 {
        table[ENCODE_TABLE[i] as usize] = i as u8;
        i += 1;
    }
    table[PLACEHOLDER as usize] = 0;
    table
}

const DECODE_TABLE: [u8; 256] = build_decode_table();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// A byte outside the alphabet, at the given input offset.
    InvalidByte(usize),
    /// The input length is not a multiple of four.
    TruncatedInput,
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::InvalidByte(offset) => {
                write!(f, "invalid base64 byte at offset {}", offset)
            }
            DecodeError::TruncatedInput => write!(f, "base64 input is not padded to a quad"),
        }
    }
}

/// Encodes `input` into the standard padded base64 form.
pub fn encode(input: &[u8]) -> String {
    let mut output = Vec::with_capacity((input.len() + 2) / 3 * 4);
    let mut chunks = input.chunks_exact(3);
    for chunk in &mut chunks {
        encode3(&mut output, chunk[0], chunk[1], chunk[2]);
    }
    match *chunks.remainder() {
        [a] => {
            output.push(ENCODE_TABLE[(a >> 2) as usize]);
            output.push(ENCODE_TABLE[((a << 4) & 0x30) as usize]);
            output.push(PLACEHOLDER);
            output.push(PLACEHOLDER);
        }
        [a, b] => {
            output.push(ENCODE_TABLE[(a >> 2) as usize]);
            output.push(ENCODE_TABLE[(((a << 4) & 0x30) | (b >> 4)) as usize]);
            output.push(ENCODE_TABLE[((b << 2) & 0x3C) as usize]);
            output.push(PLACEHOLDER);
        }
        _ => {}
    }
    // The table only produces ASCII.
    String::from_utf8(output).unwrap_or_default()
}

fn encode3(output: &mut Vec<u8>, a: u8, b: u8, c: u8) {
    output.push(ENCODE_TABLE[(a >> 2) as usize]);
    output.push(ENCODE_TABLE[(((a << 4) & 0x30) | (b >> 4)) as usize]);
    output.push(ENCODE_TABLE[(((b << 2) & 0x3C) | (c >> 6)) as usize]);
    output.push(ENCODE_TABLE[(c & 0x3F) as usize]);
}

/// Decodes padded base64. The input must be whole quads; anything outside
/// the alphabet is an error carrying its offset.
pub fn decode(input: &[u8]) -> Result<Vec<u8>, DecodeError> {
    if input.len() % 4 != 0 {
        return Err(DecodeError::TruncatedInput);
    }
    let mut output = Vec::with_capacity(input.len() / 4 * 3);
    for (quad, chunk) in input.chunks_exact(4).enumerate() {
        let mut bits = [0_u8; 4];
        for (i, &byte) in chunk.iter().enumerate() {
            bits[i] = DECODE_TABLE[byte as usize];
            if bits[i] == 0xFF {
                return Err(DecodeError::InvalidByte(quad * 4 + i));
            }
        }
        output.push((bits[0] << 2) | (bits[1] >> 4));
        if chunk[2] == PLACEHOLDER {
            continue;
        }
        output.push((bits[1] << 4) | (bits[2] >> 2));
        if chunk[3] == PLACEHOLDER {
            continue;
        }
        output.push((bits[2] << 6) | bits[3]);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn encode_remainders() {
        assert_eq!(encode(b""), "");
        assert_eq!(encode(b"f"), "Zg==");
        assert_eq!(encode(b"fo"), "Zm8=");
        assert_eq!(encode(b"foo"), "Zm9v");
        assert_eq!(encode(b"foob"), "Zm9vYg==");
        assert_eq!(encode(b"fooba"), "Zm9vYmE=");
        assert_eq!(encode(b"foobar"), "Zm9vYmFy");
    }

    #[test]
    fn decode_round_trips() {
        for input in [&b""[..], b"f", b"fo", b"foo", b"\x00\xFF\x10\x80"] {
            let encoded = encode(input);
            assert_eq!(decode(encoded.as_bytes()).unwrap(), input);
        }
    }

    #[test]
    fn decode_rejects_stray_bytes() {
        assert_eq!(decode(b"Zm9%"), Err(DecodeError::InvalidByte(3)));
        assert_eq!(decode(b"Zm9"), Err(DecodeError::TruncatedInput));
    }

    #[test]
    fn decode_of_all_byte_values() {
        let bytes: Vec<u8> = (0..=255).collect();
        let encoded = encode(&bytes);
        assert_eq!(encoded.len(), 344);
        assert_eq!(decode(encoded.as_bytes()).unwrap(), bytes);
    }

    #[test]
    fn placeholder_mid_input_truncates_its_quad() {
        // `=` inside a quad stops that quad, as in the table-driven
        // original. The following quads still decode.
        let out = decode(b"Zg==Zm9v").unwrap();
        assert_eq!(out, vec![b'f', b'f', b'o', b'o']);
    }
}
