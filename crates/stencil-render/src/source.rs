//! Paged character sources with multi-level mark/reset.
//!
//! The renderer re-reads section bodies once per sequence element, so its
//! input must support unbounded look-back over an arbitrary upstream reader.
//! [`PagedSource`] provides that: every character ever read is retained at its
//! original index in a growable page table, and a LIFO stack of marks records
//! positions to return to.
//!
//! Decoding happens upstream of paging: [`DecodingReader`] turns a byte
//! stream into characters in any charset `encoding_rs` knows, one chunk at a
//! time, so the page table always holds decoded characters.

use std::collections::VecDeque;
use std::io::{self, Read};

use encoding_rs::{CoderResult, Decoder, Encoding, UTF_8};

/// Characters are appended to the page table in fixed-size pages.
const DEFAULT_PAGE_SIZE: usize = 1024;

const READ_CHUNK: usize = 4096;

/// A character-at-a-time reader.
pub trait CharRead {
    /// Reads the next character, or `None` at end of input.
    fn read_char(&mut self) -> io::Result<Option<char>>;

    /// True if a character is available without touching the upstream.
    fn ready(&self) -> bool;
}

/// Streaming charset decoder over any [`Read`] implementation.
pub struct DecodingReader<R: Read> {
    inner: R,
    decoder: Decoder,
    buf: Vec<u8>,
    scratch: String,
    pending: VecDeque<char>,
    eof: bool,
}

impl<R: Read> DecodingReader<R> {
    /// Wraps a byte reader, decoding in the given charset.
    pub fn new(inner: R, encoding: &'static Encoding) -> Self {
        Self {
            inner,
            decoder: encoding.new_decoder(),
            buf: vec![0; READ_CHUNK],
            scratch: String::with_capacity(READ_CHUNK),
            pending: VecDeque::new(),
            eof: false,
        }
    }

    /// Wraps a byte reader, decoding as UTF-8.
    pub fn utf8(inner: R) -> Self {
        Self::new(inner, UTF_8)
    }

    fn fill(&mut self) -> io::Result<()> {
        while self.pending.is_empty() && !self.eof {
            let n = match self.inner.read(&mut self.buf) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            let last = n == 0;
            let mut src = &self.buf[..n];
            loop {
                self.scratch.clear();
                let (result, read, _) = self.decoder.decode_to_string(src, &mut self.scratch, last);
                self.pending.extend(self.scratch.chars());
                src = &src[read..];
                match result {
                    CoderResult::InputEmpty => break,
                    CoderResult::OutputFull => continue,
                }
            }
            if last {
                self.eof = true;
            }
        }
        Ok(())
    }
}

impl<R: Read> CharRead for DecodingReader<R> {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        if self.pending.is_empty() {
            self.fill()?;
        }
        Ok(self.pending.pop_front())
    }

    fn ready(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// A reader that is always at end of input.
///
/// Handed out by the include table inside an empty section, so that include
/// markers consumed there contribute nothing and recursion terminates.
pub struct EmptyRead;

impl CharRead for EmptyRead {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        Ok(None)
    }

    fn ready(&self) -> bool {
        false
    }
}

/// A buffered character source retaining everything it has read.
///
/// Reads pull from the retained page table when the current position lies
/// within it, and from the upstream otherwise. [`mark`](Self::mark) pushes
/// the current position on a LIFO stack; [`reset`](Self::reset) pops and
/// restores it. Resetting with no mark on the stack rewinds to the start of
/// the input — cached include sub-sources rely on this to replay in full.
///
/// The page table is append-only for the lifetime of the source and is
/// dropped with it.
pub struct PagedSource {
    upstream: Box<dyn CharRead>,
    page_size: usize,
    pages: Vec<Vec<char>>,
    position: usize,
    count: usize,
    eof: bool,
    marks: Vec<usize>,
}

impl PagedSource {
    /// Wraps a character reader with the default page size.
    pub fn new(upstream: Box<dyn CharRead>) -> Self {
        Self::with_page_size(upstream, DEFAULT_PAGE_SIZE)
    }

    /// Wraps a character reader with an explicit page size.
    pub fn with_page_size(upstream: Box<dyn CharRead>, page_size: usize) -> Self {
        Self {
            upstream,
            page_size: page_size.max(1),
            pages: Vec::new(),
            position: 0,
            count: 0,
            eof: false,
            marks: Vec::new(),
        }
    }

    /// A source that is at end of input from the start.
    pub fn empty() -> Self {
        Self::new(Box::new(EmptyRead))
    }

    /// An in-memory source over a string, decoded as UTF-8.
    pub fn from_str(text: &str) -> Self {
        Self::new(Box::new(DecodingReader::utf8(io::Cursor::new(
            text.as_bytes().to_vec(),
        ))))
    }

    /// Reads the next character, retaining it for later replay.
    pub fn read(&mut self) -> io::Result<Option<char>> {
        if self.position < self.count {
            let c = self.pages[self.position / self.page_size][self.position % self.page_size];
            self.position += 1;
            return Ok(Some(c));
        }
        if self.eof {
            return Ok(None);
        }
        match self.upstream.read_char()? {
            Some(c) => {
                if self.position / self.page_size == self.pages.len() {
                    self.pages.push(Vec::with_capacity(self.page_size));
                }
                if let Some(page) = self.pages.last_mut() {
                    page.push(c);
                }
                self.position += 1;
                self.count += 1;
                Ok(Some(c))
            }
            None => {
                self.eof = true;
                Ok(None)
            }
        }
    }

    /// Pushes the current position onto the mark stack.
    ///
    /// There is no read-ahead limit: the page table retains everything.
    pub fn mark(&mut self) {
        self.marks.push(self.position);
    }

    /// Pops the top mark and restores the position from it.
    ///
    /// With an empty stack this rewinds to position 0.
    pub fn reset(&mut self) {
        self.position = self.marks.pop().unwrap_or(0);
    }

    /// True if a buffered character is unread or the upstream has one ready.
    pub fn ready(&self) -> bool {
        self.position < self.count || self.upstream.ready()
    }

    /// Current depth of the mark stack.
    pub fn mark_depth(&self) -> usize {
        self.marks.len()
    }
}
