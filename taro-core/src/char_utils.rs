pub(crate) fn is_blank(c: u8) -> bool {
    c == b' ' || c == b'\t'
}

#[cfg_attr(not(feature = "no-inline"), inline)]
#[must_use]
pub fn is_alpha(c: u8) -> bool {
    matches!(c, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'-')
}

pub(crate) fn is_hex(c: u8) -> bool {
    c.is_ascii_hexdigit()
}

#[cfg_attr(not(feature = "no-inline"), inline)]
#[must_use]
pub fn as_hex(c: u8) -> u32 {
    match c {
        b'0'..=b'9' => (c - b'0') as u32,
        b'a'..=b'f' => (c - b'a') as u32 + 10,
        b'A'..=b'F' => (c - b'A') as u32 + 10,
        _ => unreachable!(),
    }
}

/// Check whether the character is a valid URI character.
#[cfg_attr(not(feature = "no-inline"), inline)]
#[must_use]
pub(crate) fn is_uri_char(c: u8) -> bool {
    is_alpha(c) || b";/?:@&=+$,_.!~*\'()[]%".contains(&c)
}

/// Characters the stream may carry: tab, the line break set and everything
/// the YAML spec calls printable. Anything else is rejected while decoding.
pub(crate) fn is_printable(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{7e}'
        | '\u{85}'
        | '\u{a0}'..='\u{d7ff}'
        | '\u{e000}'..='\u{fffd}'
        | '\u{10000}'..='\u{10ffff}')
}
