//! Byte-at-a-time command line assembly.
//!
//! Bytes arrive one per control-loop iteration. Printable ASCII is stored
//! upper-cased, everything else is dropped, and CR or LF ends the line. A
//! CRLF pair therefore yields one line and blank lines never surface.
//!
//! A line that fills the buffer (all but one slot) is cut off there; the byte
//! that triggered the cut is discarded.

use platform::CharSource;

/// Accumulates received bytes into complete command lines.
pub struct LineAssembler<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl<'a> LineAssembler<'a> {
    /// Wrap a backing store. At most `buf.len() - 1` bytes make up a line.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, len: 0 }
    }

    /// Bytes buffered for the line in progress.
    pub fn pending(&self) -> usize {
        self.len
    }

    /// Read at most one byte from `source`.
    pub fn poll<S: CharSource>(&mut self, source: &mut S) -> Option<&str> {
        let byte = source.try_read_char()?;
        self.push(byte)
    }

    /// Feed one byte. Returns the finished line when `byte` completes one.
    #[allow(clippy::arithmetic_side_effects)] // Safety: len < buf.len() - 1 before the increment
    pub fn push(&mut self, byte: u8) -> Option<&str> {
        match byte {
            b'\r' | b'\n' => self.finish(),
            b' '..=b'~' => {
                if self.len.saturating_add(1) >= self.buf.len() {
                    return self.finish();
                }
                let slot = self.buf.get_mut(self.len)?;
                *slot = byte.to_ascii_uppercase();
                self.len += 1;
                None
            }
            _ => None,
        }
    }

    fn finish(&mut self) -> Option<&str> {
        if self.len == 0 {
            return None;
        }
        let len = core::mem::take(&mut self.len);
        // only printable ASCII is ever stored
        self.buf.get(..len).and_then(|line| core::str::from_utf8(line).ok())
    }
}
