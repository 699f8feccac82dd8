//! Fixed-capacity instruction buffer.
//!
//! The backing store is borrowed rather than owned so the firmware can place
//! it in a `static` (the DMA channel reads it directly) while host tests use a
//! plain array or `Vec`.
//!
//! # Constraints
//!
//! - No heap; capacity is the length of the borrowed slice.
//! - Not interrupt-safe. The controller aborts any transfer before the
//!   compiler writes, so the DMA channel never observes a half-written word.

use crate::error::CompileError;

/// Instruction words awaiting transfer.
pub struct SequenceBuffer<'a> {
    words: &'a mut [u32],
}

impl<'a> SequenceBuffer<'a> {
    /// Wrap a backing store.
    pub fn new(words: &'a mut [u32]) -> Self {
        Self { words }
    }

    /// Total number of words the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.words.len()
    }

    /// Store `word` at `index`.
    ///
    /// # Errors
    ///
    /// [`CompileError::BufferOverflow`] if `index >= capacity()`.
    pub fn write(&mut self, index: usize, word: u32) -> Result<(), CompileError> {
        let slot = self
            .words
            .get_mut(index)
            .ok_or(CompileError::BufferOverflow)?;
        *slot = word;
        Ok(())
    }

    /// The first `len` words (clamped to capacity).
    #[allow(clippy::indexing_slicing)] // Safety: len clamped to words.len()
    pub fn words(&self, len: usize) -> &[u32] {
        &self.words[..len.min(self.words.len())]
    }
}
