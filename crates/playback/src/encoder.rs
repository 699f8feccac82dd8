//! Instruction word format and delay splitting.
//!
//! Each 32-bit word drives the output lanes for a bounded number of cycles:
//!
//! ```text
//!  31                      N_GPIO  N_GPIO-1        0
//! ┌──────────────────────────────┬─────────────────┐
//! │ cycle_field                  │ mask            │
//! └──────────────────────────────┴─────────────────┘
//!   hold = cycle_field + extra_cycles
//! ```
//!
//! The state machine spends `extra_cycles` on pull/out/jmp overhead, so the
//! field holds `hold - extra_cycles`. Holds longer than one word are split
//! into several words with the same mask.

use platform::config::{EngineConfig, EXTRA_CYCLES, N_GPIO};
use platform::ConfigError;

use crate::buffer::SequenceBuffer;
use crate::error::CompileError;

/// Bit layout shared by the compiler and the state machine program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InstructionFormat {
    n_gpio: u8,
    extra_cycles: u32,
}

impl InstructionFormat {
    /// Five lanes, four overhead cycles.
    pub const DEFAULT: Self = Self {
        n_gpio: N_GPIO,
        extra_cycles: EXTRA_CYCLES,
    };

    /// Build a format from a validated engine configuration.
    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            n_gpio: config.n_gpio,
            extra_cycles: config.extra_cycles,
        })
    }

    /// Number of mask bits.
    pub const fn n_gpio(&self) -> u8 {
        self.n_gpio
    }

    /// Fixed per-word overhead in cycles.
    pub const fn extra_cycles(&self) -> u32 {
        self.extra_cycles
    }

    /// Largest value of the cycle field.
    pub const fn max_field(&self) -> u32 {
        u32::MAX >> self.n_gpio
    }

    /// Longest hold a single word can express.
    pub const fn max_cycles(&self) -> u64 {
        self.max_field() as u64 + self.extra_cycles as u64
    }

    /// Reject masks that address lanes outside the configured range.
    pub fn check_mask(&self, mask: u64) -> Result<u32, CompileError> {
        if mask >> self.n_gpio != 0 {
            return Err(CompileError::InvalidMask);
        }
        u32::try_from(mask).map_err(|_| CompileError::InvalidMask)
    }

    /// Pack one word. `hold` is clamped to `[extra_cycles, max_cycles]`.
    #[allow(clippy::arithmetic_side_effects)] // Safety: clamped hold >= extra; field <= max_field so the shift stays in 32 bits
    pub fn word(&self, hold: u64, mask: u32) -> u32 {
        let hold = hold.clamp(u64::from(self.extra_cycles), self.max_cycles());
        let field = u32::try_from(hold - u64::from(self.extra_cycles)).unwrap_or(self.max_field());
        (field << self.n_gpio) | mask
    }

    /// Unpack a word into `(hold_cycles, mask)`.
    #[allow(clippy::arithmetic_side_effects)] // Safety: n_gpio < 32 after validation
    pub fn decode(&self, word: u32) -> (u64, u32) {
        let mask = word & ((1u32 << self.n_gpio) - 1);
        let field = word >> self.n_gpio;
        (u64::from(field) + u64::from(self.extra_cycles), mask)
    }

    /// Number of words [`encode`](Self::encode) emits for `hold`.
    #[allow(clippy::arithmetic_side_effects)] // Safety: max_cycles > 0
    pub fn words_needed(&self, hold: u64) -> u64 {
        let hold = hold.max(u64::from(self.extra_cycles));
        let max = self.max_cycles();
        hold / max + u64::from(hold % max != 0)
    }

    /// Write the words for one `(hold, mask)` entry starting at `cursor`.
    ///
    /// Returns the cursor after the last written word. Holds shorter than
    /// `extra_cycles` are stretched to `extra_cycles`. When the split leaves a
    /// tail shorter than `extra_cycles`, the difference is borrowed from the
    /// preceding full word so the total stays exact.
    ///
    /// # Errors
    ///
    /// - [`CompileError::InvalidMask`] before anything is written
    /// - [`CompileError::BufferOverflow`] before anything is written, when the
    ///   words would run past the buffer end
    #[allow(clippy::arithmetic_side_effects)] // Safety: full >= 1 when a tail is borrowed; cursor + count checked against capacity
    pub fn encode(
        &self,
        hold: u64,
        mask: u64,
        buffer: &mut SequenceBuffer<'_>,
        cursor: usize,
    ) -> Result<usize, CompileError> {
        let mask = self.check_mask(mask)?;

        let hold = hold.max(u64::from(self.extra_cycles));
        let count = self.words_needed(hold);
        let end = usize::try_from(count)
            .ok()
            .and_then(|count| cursor.checked_add(count))
            .filter(|&end| end <= buffer.capacity())
            .ok_or(CompileError::BufferOverflow)?;

        let max = self.max_cycles();
        let extra = u64::from(self.extra_cycles);
        let full = hold / max;
        let tail = hold % max;

        let mut at = cursor;
        let mut put = |buffer: &mut SequenceBuffer<'_>, hold: u64| -> Result<(), CompileError> {
            buffer.write(at, self.word(hold, mask))?;
            at += 1;
            Ok(())
        };

        if tail != 0 && tail < extra && full > 0 {
            for _ in 1..full {
                put(buffer, max)?;
            }
            put(buffer, max - (extra - tail))?;
            put(buffer, extra)?;
        } else {
            for _ in 0..full {
                put(buffer, max)?;
            }
            if tail != 0 {
                put(buffer, tail)?;
            }
        }

        debug_assert_eq!(at, end);
        Ok(end)
    }
}

impl Default for InstructionFormat {
    fn default() -> Self {
        Self::DEFAULT
    }
}
