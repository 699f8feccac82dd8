//! Output engine abstraction
//!
//! The output engine is the state machine + DMA pair that pops 32-bit
//! instruction words and drives the output lines. Each word holds the output
//! mask in its low bits and a hold time in the remaining bits; the engine
//! spends a fixed number of extra cycles per word on top of the encoded hold.
//!
//! ```text
//! SequenceBuffer ──DMA──> TX FIFO ──pull──> state machine ──> GPIO[base..base+n]
//! ```
//!
//! The playback controller is the only caller. It guarantees that the slice
//! handed to [`OutputEngine::configure_transfer`] is not written while a
//! transfer over it is active.

/// Output engine collaborator.
pub trait OutputEngine {
    /// Reserve the state machine and DMA channel for exclusive use.
    fn claim(&mut self) -> Result<(), EngineError>;

    /// Install the output program and enable the state machine.
    fn load_program(&mut self) -> Result<(), EngineError>;

    /// Point the DMA channel at `words`, without starting it.
    ///
    /// Hardware implementations keep the address of `words`; callers must keep
    /// the slice alive and unmodified until the transfer completes or is aborted.
    fn configure_transfer(&mut self, words: &[u32]);

    /// Start the most recently configured transfer.
    fn start_transfer(&mut self);

    /// Abort any in-flight transfer. Must be a no-op when idle.
    fn abort_transfer(&mut self);

    /// Discard every word queued in the engine's output FIFO and reset the
    /// state machine so that the next word takes effect immediately.
    fn clear_output_queue(&mut self);

    /// `true` while the DMA channel is still moving words into the FIFO
    fn is_transfer_active(&self) -> bool;

    /// `true` when the output FIFO holds no pending words
    fn is_output_queue_empty(&self) -> bool;

    /// Write one word straight into the output FIFO, bypassing the buffer.
    fn push_immediate(&mut self, word: u32);
}

/// Output engine errors. All of them are fatal at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineError {
    /// No free state machine or DMA channel
    ClaimFailed,
    /// Program memory exhausted or program rejected
    ProgramLoadFailed,
}

#[cfg(feature = "std")]
impl std::error::Error for EngineError {}

impl core::fmt::Display for EngineError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ClaimFailed => write!(f, "Output engine resources could not be claimed"),
            Self::ProgramLoadFailed => write!(f, "Output program could not be loaded"),
        }
    }
}

/// System clock source
pub trait ClockSource {
    /// Current system clock rate in Hz
    fn current_rate_hz(&self) -> u32;
}

/// Non-blocking byte source feeding the command line assembler
pub trait CharSource {
    /// Return the next received byte, or `None` when nothing is pending.
    fn try_read_char(&mut self) -> Option<u8>;
}

/// Board status indicator (LED)
pub trait StatusIndicator {
    /// Turn the indicator on or off.
    fn set_active(&mut self, active: bool);
}
