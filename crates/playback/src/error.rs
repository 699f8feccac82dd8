//! Sequence compile errors.
//!
//! Every variant aborts the whole compile: the controller's loop count and
//! play length are forced to zero so a partial sequence can never start.

/// Which half of an entry failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Token {
    /// The hold time
    Duration,
    /// The output mask
    Mask,
}

/// Errors returned by [`SequenceCompiler::compile`](crate::compiler::SequenceCompiler::compile).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CompileError {
    /// A token is not a non-negative decimal integer.
    Parse(Token),
    /// The output mask has bits set above the configured lane count.
    InvalidMask,
    /// The expanded sequence does not fit in the instruction buffer.
    BufferOverflow,
    /// A duration is not followed by an output mask.
    UnmatchedEntry,
    /// The ns → cycles conversion would overflow 64 bits.
    DurationTooLong,
}

#[cfg(feature = "std")]
impl std::error::Error for CompileError {}

impl core::fmt::Display for CompileError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Parse(Token::Duration) => write!(f, "Time entry could not be parsed!"),
            Self::Parse(Token::Mask) => write!(f, "Output mask could not be parsed!"),
            Self::InvalidMask => write!(f, "Output mask is invalid!"),
            Self::BufferOverflow => write!(f, "Insertion failed, buffer has been overrun."),
            Self::UnmatchedEntry => write!(f, "Time entry has no corresponding output mask!"),
            Self::DurationTooLong => write!(
                f,
                "Time is too long to process! Consider using cycle timings instead."
            ),
        }
    }
}
