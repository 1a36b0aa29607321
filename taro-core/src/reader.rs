use alloc::string::String;
use alloc::vec::Vec;

use memchr::{memchr, memchr3};

use taro_common::{Encoding, Mark, YamlError, YamlResult};

use crate::char_utils::{is_blank, is_printable};
use crate::{INPUT_BUFFER_SIZE, INPUT_RAW_BUFFER_SIZE};

/// Byte source the [`Reader`] pulls raw input from.
///
/// Returning `Ok(0)` signals the end of input and must keep holding on
/// every later call.
pub trait Input {
    fn read_input(&mut self, buf: &mut [u8]) -> YamlResult<usize>;
}

impl Input for &[u8] {
    fn read_input(&mut self, buf: &mut [u8]) -> YamlResult<usize> {
        let amount = self.len().min(buf.len());
        let (head, tail) = self.split_at(amount);
        buf[..amount].copy_from_slice(head);
        *self = tail;
        Ok(amount)
    }
}

/// Adapter turning any [`std::io::Read`] into an [`Input`].
#[cfg(feature = "std")]
pub struct IoInput<R>(pub R);

#[cfg(feature = "std")]
impl<R: std::io::Read> Input for IoInput<R> {
    fn read_input(&mut self, buf: &mut [u8]) -> YamlResult<usize> {
        use alloc::string::ToString;
        loop {
            match self.0.read(buf) {
                Ok(amount) => return Ok(amount),
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
                Err(err) => return Err(YamlError::Io(err.to_string())),
            }
        }
    }
}

/// Decodes raw input into a UTF-8 window and tracks the cursor [`Mark`].
///
/// The window only ever holds complete characters. Peeking past the end of
/// input yields `b'\0'`, which no decoded stream can contain since NUL is
/// not printable.
pub struct Reader<I> {
    input: I,
    encoding: Encoding,
    decided: bool,
    raw: Vec<u8>,
    raw_head: usize,
    buffer: String,
    head: usize,
    unread: usize,
    offset: usize,
    mark: Mark,
    eof: bool,
    stream_done: bool,
}

impl<I: Input> Reader<I> {
    pub fn new(input: I) -> Reader<I> {
        Reader {
            input,
            encoding: Encoding::Any,
            decided: false,
            raw: Vec::with_capacity(INPUT_RAW_BUFFER_SIZE),
            raw_head: 0,
            buffer: String::with_capacity(INPUT_BUFFER_SIZE),
            head: 0,
            unread: 0,
            offset: 0,
            mark: Mark::default(),
            eof: false,
            stream_done: false,
        }
    }

    /// Force the stream encoding instead of detecting it from the first
    /// bytes. Has no effect once reading started.
    pub fn set_encoding(&mut self, encoding: Encoding) {
        if !self.decided {
            self.encoding = encoding;
        }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// Ensure at least `length` characters are decoded, or the stream end
    /// was reached.
    pub(crate) fn cache(&mut self, length: usize) -> YamlResult<()> {
        if self.unread >= length || self.stream_done {
            return Ok(());
        }
        self.update_buffer(length)
    }

    pub(crate) fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    /// Byte at `offset` bytes past the cursor, or `b'\0'` past the end.
    pub(crate) fn peek_at(&self, offset: usize) -> u8 {
        self.buffer
            .as_bytes()
            .get(self.head + offset)
            .copied()
            .unwrap_or(b'\0')
    }

    /// The decoded but unconsumed window.
    pub(crate) fn available(&self) -> &[u8] {
        &self.buffer.as_bytes()[self.head..]
    }

    pub(crate) fn next_is_break(&self) -> bool {
        self.break_at(0)
    }

    pub(crate) fn break_at(&self, offset: usize) -> bool {
        self.break_width(offset).0 != 0
    }

    pub(crate) fn next_is_breakz(&self) -> bool {
        self.next_is_break() || self.peek() == b'\0'
    }

    pub(crate) fn next_is_blankz(&self) -> bool {
        is_blank(self.peek()) || self.next_is_breakz()
    }

    pub(crate) fn blankz_at(&self, offset: usize) -> bool {
        is_blank(self.peek_at(offset)) || self.break_at(offset) || self.peek_at(offset) == b'\0'
    }

    /// `---` or `...` at the start of a line, followed by a blank, a break
    /// or the end of input.
    pub(crate) fn next_is_document_indicator(&self, marker: &[u8; 3]) -> bool {
        self.mark.col == 0 && self.available().starts_with(marker) && self.blankz_at(3)
    }

    pub(crate) fn next_is_bom(&self) -> bool {
        self.available().starts_with(&[0xEF, 0xBB, 0xBF])
    }

    /// Pretend the last line was properly terminated. Used when the input
    /// ends without a trailing break.
    pub(crate) fn force_new_line(&mut self) {
        if self.mark.col != 0 {
            self.mark.col = 0;
            self.mark.line += 1;
        }
    }

    /// Consume one character. The cursor must not sit on a line break.
    pub(crate) fn skip(&mut self) {
        if let Some(ch) = self.buffer[self.head..].chars().next() {
            self.head += ch.len_utf8();
            self.unread -= 1;
            self.mark.index += 1;
            self.mark.col += 1;
        }
    }

    pub(crate) fn skip_n(&mut self, amount: usize) {
        for _ in 0..amount {
            self.skip();
        }
    }

    /// Consume one line break, counting CRLF as a single break.
    pub(crate) fn skip_line_break(&mut self) {
        let (bytes, chars) = self.break_width(0);
        if bytes == 0 {
            return;
        }
        self.head += bytes;
        self.unread -= chars;
        self.mark.index += chars;
        self.mark.line += 1;
        self.mark.col = 0;
    }

    /// Consume one character and append it to `out`.
    pub(crate) fn read_char(&mut self, out: &mut String) {
        if let Some(ch) = self.buffer[self.head..].chars().next() {
            out.push(ch);
            self.head += ch.len_utf8();
            self.unread -= 1;
            self.mark.index += 1;
            self.mark.col += 1;
        }
    }

    /// Consume one line break and append its normalized form to `out`.
    /// CR, LF, CRLF and NEL become `\n`; LS and PS are kept verbatim.
    pub(crate) fn read_line_break(&mut self, out: &mut String) {
        let (bytes, chars) = self.break_width(0);
        if bytes == 0 {
            return;
        }
        if bytes == 3 {
            out.push(if self.peek_at(2) == 0xA8 {
                '\u{2028}'
            } else {
                '\u{2029}'
            });
        } else {
            out.push('\n');
        }
        self.head += bytes;
        self.unread -= chars;
        self.mark.index += chars;
        self.mark.line += 1;
        self.mark.col = 0;
    }

    /// Consume everything up to the next line break or the end of input.
    pub(crate) fn skip_to_break(&mut self) -> YamlResult<()> {
        loop {
            self.cache(1)?;
            let window = self.available();
            let window_len = window.len();
            let upto = match find_break(window) {
                Some(at) => at,
                None => window_len,
            };
            let chars = self.buffer[self.head..self.head + upto].chars().count();
            self.head += upto;
            self.unread -= chars;
            self.mark.index += chars;
            self.mark.col += chars as u32;
            if upto < window_len || self.stream_done {
                return Ok(());
            }
        }
    }

    /// Byte and character width of the line break at `offset` bytes past
    /// the cursor, or `(0, 0)` when there is none.
    fn break_width(&self, offset: usize) -> (usize, usize) {
        let bytes = self.available();
        match bytes.get(offset) {
            Some(b'\r') => {
                if bytes.get(offset + 1) == Some(&b'\n') {
                    (2, 2)
                } else {
                    (1, 1)
                }
            }
            Some(b'\n') => (1, 1),
            Some(0xC2) if bytes.get(offset + 1) == Some(&0x85) => (2, 1),
            Some(0xE2)
                if bytes.get(offset + 1) == Some(&0x80)
                    && matches!(bytes.get(offset + 2), Some(&(0xA8 | 0xA9))) =>
            {
                (3, 1)
            }
            _ => (0, 0),
        }
    }

    fn update_buffer(&mut self, length: usize) -> YamlResult<()> {
        if !self.decided {
            self.determine_encoding()?;
            self.decided = true;
        }
        if self.head > 0 {
            self.buffer.drain(..self.head);
            self.head = 0;
        }
        loop {
            if self.unread >= length || self.stream_done {
                return Ok(());
            }
            if self.raw_head == self.raw.len() {
                if self.eof {
                    self.stream_done = true;
                    return Ok(());
                }
                self.fill_raw()?;
                continue;
            }
            let decoded = match self.encoding {
                Encoding::Utf16Le => self.decode_utf16(true)?,
                Encoding::Utf16Be => self.decode_utf16(false)?,
                _ => self.decode_utf8()?,
            };
            if decoded == 0 {
                // A character is split across the raw window.
                self.fill_raw()?;
            }
        }
    }

    fn fill_raw(&mut self) -> YamlResult<()> {
        if self.raw_head > 0 {
            self.raw.drain(..self.raw_head);
            self.raw_head = 0;
        }
        let used = self.raw.len();
        self.raw.resize(used + INPUT_RAW_BUFFER_SIZE, 0);
        let read = self.input.read_input(&mut self.raw[used..])?;
        self.raw.truncate(used + read);
        if read == 0 {
            self.eof = true;
        }
        Ok(())
    }

    /// Detect the encoding from the first bytes of input. A byte order
    /// mark matching the (detected or forced) encoding is consumed and
    /// never shows up in marks.
    fn determine_encoding(&mut self) -> YamlResult<()> {
        while !self.eof && self.raw.len() < 3 {
            self.fill_raw()?;
        }
        let detected = if self.raw.starts_with(&[0xFF, 0xFE]) {
            Encoding::Utf16Le
        } else if self.raw.starts_with(&[0xFE, 0xFF]) {
            Encoding::Utf16Be
        } else {
            Encoding::Utf8
        };
        if self.encoding == Encoding::Any {
            self.encoding = detected;
        }
        let bom = match self.encoding {
            Encoding::Utf8 if self.raw.starts_with(&[0xEF, 0xBB, 0xBF]) => 3,
            Encoding::Utf16Le if self.raw.starts_with(&[0xFF, 0xFE]) => 2,
            Encoding::Utf16Be if self.raw.starts_with(&[0xFE, 0xFF]) => 2,
            _ => 0,
        };
        self.raw_head += bom;
        self.offset += bom;
        Ok(())
    }

    fn decode_utf8(&mut self) -> YamlResult<usize> {
        let base = self.offset;
        let pending = &self.raw[self.raw_head..];
        let (valid, failure) = match simdutf8::compat::from_utf8(pending) {
            Ok(valid) => (valid, None),
            Err(err) => {
                let upto = err.valid_up_to();
                let valid = unsafe { core::str::from_utf8_unchecked(&pending[..upto]) };
                (valid, Some((upto, err.error_len())))
            }
        };
        let mut count = 0;
        for (at, ch) in valid.char_indices() {
            if !is_printable(ch) {
                return Err(YamlError::reader(
                    "control characters are not allowed",
                    base + at,
                ));
            }
            count += 1;
        }
        self.buffer.push_str(valid);
        self.unread += count;
        self.raw_head += valid.len();
        self.offset += valid.len();
        match failure {
            Some((upto, Some(_))) => {
                let lead = pending[upto];
                let problem = if !(0xC2..=0xF4).contains(&lead) {
                    "invalid leading UTF-8 octet"
                } else if lead == 0xED && pending.get(upto + 1).map_or(false, |&b| b >= 0xA0)
                    || lead == 0xF4 && pending.get(upto + 1).map_or(false, |&b| b > 0x8F)
                {
                    "invalid Unicode character"
                } else {
                    "invalid trailing UTF-8 octet"
                };
                Err(YamlError::reader(problem, base + upto))
            }
            Some((upto, None)) if self.eof => {
                Err(YamlError::reader("unexpected end of stream", base + upto))
            }
            _ => Ok(count),
        }
    }

    fn decode_utf16(&mut self, little: bool) -> YamlResult<usize> {
        let base = self.offset;
        let mut at = 0;
        let mut count = 0;
        loop {
            let start = at;
            let avail = self.raw.len() - self.raw_head - at;
            if avail < 2 {
                break;
            }
            let unit = read_unit(&self.raw[self.raw_head + at..], little);
            let value = if (0xDC00..0xE000).contains(&unit) {
                self.consume_raw(at);
                return Err(YamlError::reader(
                    "unexpected low surrogate area",
                    base + start,
                ));
            } else if (0xD800..0xDC00).contains(&unit) {
                if avail < 4 {
                    break;
                }
                let low = read_unit(&self.raw[self.raw_head + at + 2..], little);
                if !(0xDC00..0xE000).contains(&low) {
                    self.consume_raw(at);
                    return Err(YamlError::reader(
                        "expected low surrogate area",
                        base + start + 2,
                    ));
                }
                at += 4;
                0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00)
            } else {
                at += 2;
                u32::from(unit)
            };
            let ch = char::from_u32(value)
                .ok_or_else(|| YamlError::reader("invalid Unicode character", base + start))?;
            if !is_printable(ch) {
                self.consume_raw(start);
                return Err(YamlError::reader(
                    "control characters are not allowed",
                    base + start,
                ));
            }
            self.buffer.push(ch);
            self.unread += 1;
            count += 1;
        }
        self.consume_raw(at);
        if self.eof && self.raw_head < self.raw.len() {
            return Err(YamlError::reader("unexpected end of stream", self.offset));
        }
        Ok(count)
    }

    fn consume_raw(&mut self, amount: usize) {
        self.raw_head += amount;
        self.offset += amount;
    }
}

fn read_unit(bytes: &[u8], little: bool) -> u16 {
    if little {
        u16::from_le_bytes([bytes[0], bytes[1]])
    } else {
        u16::from_be_bytes([bytes[0], bytes[1]])
    }
}

/// Position of the first line break in `bytes`, stepping over bytes that
/// merely look like the start of a multi byte break.
fn find_break(bytes: &[u8]) -> Option<usize> {
    let mut from = 0;
    loop {
        let ascii = memchr3(b'\r', b'\n', 0xC2, &bytes[from..]);
        let wide = memchr(0xE2, &bytes[from..]);
        let hit = from
            + match (ascii, wide) {
                (None, None) => return None,
                (Some(a), None) => a,
                (None, Some(b)) => b,
                (Some(a), Some(b)) => a.min(b),
            };
        match bytes[hit] {
            b'\r' | b'\n' => return Some(hit),
            0xC2 if bytes.get(hit + 1) == Some(&0x85) => return Some(hit),
            0xE2
                if bytes.get(hit + 1) == Some(&0x80)
                    && matches!(bytes.get(hit + 2), Some(&(0xA8 | 0xA9))) =>
            {
                return Some(hit)
            }
            _ => from = hit + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::String;

    fn drain(reader: &mut Reader<&[u8]>) -> String {
        let mut out = String::new();
        loop {
            reader.cache(1).expect("decode");
            if reader.peek() == b'\0' {
                return out;
            }
            if reader.next_is_break() {
                reader.read_line_break(&mut out);
            } else {
                reader.read_char(&mut out);
            }
        }
    }

    #[test]
    fn utf8_bom_is_consumed() {
        let mut reader = Reader::new(&b"\xEF\xBB\xBFa"[..]);
        reader.cache(1).expect("decode");
        assert_eq!(reader.encoding(), Encoding::Utf8);
        assert_eq!(reader.peek(), b'a');
        assert_eq!(reader.mark().index, 0);
    }

    #[test]
    fn skip_to_break_stops_at_the_newline() {
        let mut reader = Reader::new(&b"# a comment\nrest"[..]);
        reader.skip_to_break().expect("decode");
        assert!(reader.next_is_break());
        assert_eq!(reader.mark().col, 11);
        let mut out = String::new();
        reader.read_line_break(&mut out);
        reader.cache(1).expect("decode");
        assert_eq!(reader.peek(), b'r');
    }

    #[test]
    fn skip_to_break_consumes_a_trailing_comment() {
        let mut reader = Reader::new(&b"# no break"[..]);
        reader.skip_to_break().expect("decode");
        reader.cache(1).expect("decode");
        assert_eq!(reader.peek(), b'\0');
        assert_eq!(reader.mark().index, 10);
    }

    #[test]
    fn utf16le_is_detected_and_decoded() {
        let mut reader = Reader::new(&b"\xFF\xFEa\x00:\x00 \x00b\x00"[..]);
        let out = drain(&mut reader);
        assert_eq!(reader.encoding(), Encoding::Utf16Le);
        assert_eq!(out, "a: b");
    }

    #[test]
    fn utf16be_surrogate_pair() {
        let mut reader = Reader::new(&b"\xFE\xFF\xD8\x3D\xDE\x00"[..]);
        let out = drain(&mut reader);
        assert_eq!(out, "\u{1f600}");
        assert_eq!(reader.mark().index, 1);
    }

    #[test]
    fn control_characters_are_rejected() {
        let mut reader = Reader::new(&b"a\x07b"[..]);
        let err = reader.cache(3).unwrap_err();
        assert_eq!(
            format!("{}", err),
            "reader error: control characters are not allowed at position 1"
        );
    }

    #[test]
    fn truncated_utf8_at_end_of_stream() {
        let mut reader = Reader::new(&b"a\xC3"[..]);
        let err = reader.cache(2).unwrap_err();
        assert_eq!(
            format!("{}", err),
            "reader error: unexpected end of stream at position 1"
        );
    }

    #[test]
    fn invalid_lead_octet() {
        let mut reader = Reader::new(&b"\x80"[..]);
        let err = reader.cache(1).unwrap_err();
        assert_eq!(
            format!("{}", err),
            "reader error: invalid leading UTF-8 octet at position 0"
        );
    }

    #[test]
    fn marks_count_characters_not_bytes() {
        let mut reader = Reader::new("héllo".as_bytes());
        reader.cache(5).expect("decode");
        reader.skip_n(5);
        assert_eq!(reader.mark().index, 5);
        assert_eq!(reader.mark().col, 5);
    }

    #[test]
    fn crlf_is_one_break_two_characters() {
        let mut reader = Reader::new(&b"a\r\nb"[..]);
        reader.cache(4).expect("decode");
        reader.skip();
        reader.skip_line_break();
        let mark = reader.mark();
        assert_eq!((mark.index, mark.line, mark.col), (3, 1, 0));
        assert_eq!(reader.peek(), b'b');
    }

    #[test]
    fn peek_past_end_yields_nul() {
        let mut reader = Reader::new(&b"x"[..]);
        reader.cache(8).expect("decode");
        reader.skip();
        assert_eq!(reader.peek(), b'\0');
        assert_eq!(reader.peek_at(3), b'\0');
    }

    #[test]
    fn skip_to_break_stops_on_nel() {
        let mut reader = Reader::new(&b"# note\xC2\x85next"[..]);
        reader.skip_to_break().expect("decode");
        assert_eq!(reader.mark().col, 6);
        assert!(reader.next_is_break());
    }
}
