//! Character sinks that the renderer writes through.
//!
//! [`EncodingSink`] encodes characters to bytes in the output charset and is
//! what the encoder facade wraps around the caller's byte stream.
//! [`NullSink`] discards everything; the renderer uses it to consume an empty
//! section's body without emitting output.

use std::io::{self, Write};

use encoding_rs::{CoderResult, Encoder, Encoding};

const ENCODE_CHUNK: usize = 4096;

/// A character-at-a-time output sink.
pub trait CharSink {
    /// Writes one character.
    fn write_char(&mut self, c: char) -> io::Result<()>;

    /// Writes a string slice.
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        for c in s.chars() {
            self.write_char(c)?;
        }
        Ok(())
    }
}

/// Encodes characters into a byte stream in a configured charset.
///
/// No byte-order mark or envelope is emitted. Call [`flush`](Self::flush)
/// once after the render; it finalizes the encoder and flushes the
/// underlying writer.
pub struct EncodingSink<W: Write> {
    encoder: Encoder,
    out: W,
    buf: Vec<u8>,
}

impl<W: Write> EncodingSink<W> {
    /// Wraps a byte writer, encoding in the given charset.
    pub fn new(out: W, encoding: &'static Encoding) -> Self {
        Self {
            encoder: encoding.new_encoder(),
            out,
            buf: vec![0; ENCODE_CHUNK],
        }
    }

    /// Finalizes the encoder and flushes the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        loop {
            let (result, _, written, _) = self.encoder.encode_from_utf8("", &mut self.buf, true);
            self.out.write_all(&self.buf[..written])?;
            if matches!(result, CoderResult::InputEmpty) {
                break;
            }
        }
        self.out.flush()
    }
}

impl<W: Write> CharSink for EncodingSink<W> {
    fn write_char(&mut self, c: char) -> io::Result<()> {
        let mut utf8 = [0u8; 4];
        self.write_str(c.encode_utf8(&mut utf8))
    }

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        let mut src = s;
        loop {
            let (result, read, written, _) = self.encoder.encode_from_utf8(src, &mut self.buf, false);
            self.out.write_all(&self.buf[..written])?;
            src = &src[read..];
            if matches!(result, CoderResult::InputEmpty) {
                return Ok(());
            }
        }
    }
}

/// A sink that discards all output.
pub struct NullSink;

impl CharSink for NullSink {
    fn write_char(&mut self, _c: char) -> io::Result<()> {
        Ok(())
    }

    fn write_str(&mut self, _s: &str) -> io::Result<()> {
        Ok(())
    }
}

impl CharSink for String {
    fn write_char(&mut self, c: char) -> io::Result<()> {
        self.push(c);
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.push_str(s);
        Ok(())
    }
}
