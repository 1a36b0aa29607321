//! Buffered, encoding-aware output stage.
//!
//! The emitter produces UTF-8 text. The writer holds it in a buffer and
//! pushes it to the sink in the stream encoding, transcoding to UTF-16
//! when asked to.

use alloc::string::String;
use alloc::vec::Vec;

use taro_common::{Encoding, YamlError, YamlResult};

use crate::{OUTPUT_BUFFER_SIZE, OUTPUT_RAW_BUFFER_SIZE};

/// Byte sink the [`Writer`] pushes encoded output into.
pub trait Output {
    fn write_output(&mut self, buf: &[u8]) -> YamlResult<()>;
}

impl Output for Vec<u8> {
    fn write_output(&mut self, buf: &[u8]) -> YamlResult<()> {
        self.extend_from_slice(buf);
        Ok(())
    }
}

/// Adapter turning any [`std::io::Write`] into an [`Output`].
#[cfg(feature = "std")]
pub struct IoOutput<W>(pub W);

#[cfg(feature = "std")]
impl<W: std::io::Write> Output for IoOutput<W> {
    fn write_output(&mut self, buf: &[u8]) -> YamlResult<()> {
        use alloc::string::ToString;
        match self.0.write_all(buf) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::WriteZero => {
                Err(YamlError::writer("write handler accepted a partial write"))
            }
            Err(err) => Err(YamlError::Io(err.to_string())),
        }
    }
}

/// Buffers emitter output and encodes it for the sink.
pub struct Writer<O> {
    output: O,
    buffer: String,
    encoding: Encoding,
}

impl<O: Output> Writer<O> {
    pub fn new(output: O) -> Writer<O> {
        Writer {
            output,
            buffer: String::with_capacity(OUTPUT_BUFFER_SIZE),
            encoding: Encoding::Utf8,
        }
    }

    /// Picks the sink encoding. Must happen before anything is written.
    pub(crate) fn set_encoding(&mut self, encoding: Encoding) {
        self.encoding = encoding;
    }

    pub(crate) fn put(&mut self, ch: char) -> YamlResult<()> {
        self.buffer.push(ch);
        self.flush_if_full()
    }

    pub(crate) fn put_str(&mut self, string: &str) -> YamlResult<()> {
        self.buffer.push_str(string);
        self.flush_if_full()
    }

    fn flush_if_full(&mut self) -> YamlResult<()> {
        if self.buffer.len() >= OUTPUT_BUFFER_SIZE {
            self.flush()?;
        }
        Ok(())
    }

    /// Pushes everything buffered so far to the sink.
    pub fn flush(&mut self) -> YamlResult<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        match self.encoding {
            Encoding::Any | Encoding::Utf8 => {
                self.output.write_output(self.buffer.as_bytes())?;
            }
            Encoding::Utf16Le | Encoding::Utf16Be => {
                let mut raw = Vec::with_capacity(OUTPUT_RAW_BUFFER_SIZE);
                let mut units = [0_u16; 2];
                for ch in self.buffer.chars() {
                    for unit in ch.encode_utf16(&mut units) {
                        if self.encoding == Encoding::Utf16Le {
                            raw.extend_from_slice(&unit.to_le_bytes());
                        } else {
                            raw.extend_from_slice(&unit.to_be_bytes());
                        }
                    }
                }
                self.output.write_output(&raw)?;
            }
        }
        self.buffer.clear();
        Ok(())
    }

    /// Hands the sink back, dropping anything left unflushed.
    pub fn into_inner(self) -> O {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_passes_through() {
        let mut writer = Writer::new(Vec::new());
        writer.put_str("a: 1\n").unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.into_inner(), b"a: 1\n");
    }

    #[test]
    fn nothing_reaches_the_sink_before_flush() {
        let mut writer = Writer::new(Vec::new());
        writer.put('x').unwrap();
        assert!(writer.into_inner().is_empty());
    }

    #[test]
    fn utf16le_encodes_pairwise() {
        let mut writer = Writer::new(Vec::new());
        writer.set_encoding(Encoding::Utf16Le);
        writer.put('\u{FEFF}').unwrap();
        writer.put_str("a\n").unwrap();
        writer.flush().unwrap();
        assert_eq!(
            writer.into_inner(),
            [0xFF, 0xFE, 0x61, 0x00, 0x0A, 0x00]
        );
    }

    #[test]
    fn utf16be_encodes_pairwise() {
        let mut writer = Writer::new(Vec::new());
        writer.set_encoding(Encoding::Utf16Be);
        writer.put('\u{FEFF}').unwrap();
        writer.put('a').unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.into_inner(), [0xFE, 0xFF, 0x00, 0x61]);
    }

    #[test]
    fn surrogate_pairs_for_astral_chars() {
        let mut writer = Writer::new(Vec::new());
        writer.set_encoding(Encoding::Utf16Le);
        writer.put('\u{1F600}').unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.into_inner(), [0x3D, 0xD8, 0x00, 0xDE]);
    }
}
