//! Playback controller.
//!
//! `PlaybackController` owns the output engine and the instruction buffer and
//! decides when the buffer is (re)transferred. It has no notion of time: the
//! control loop calls [`poll`](PlaybackController::poll) once per iteration
//! and the controller issues the next pass whenever the engine is idle and
//! passes remain.
//!
//! # Busy state
//!
//! ```text
//! Active    loop count non-zero, or a transfer is running
//! Draining  transfer done, words still queued in the output FIFO
//! Idle      nothing queued
//! ```
//!
//! # Loop count
//!
//! | value          | behaviour                                          |
//! |----------------|----------------------------------------------------|
//! | `0`            | one pass, issued immediately by `start`            |
//! | `n`            | `n` passes, each issued by `poll`                  |
//! | `LOOP_INFINITE`| repeat until `stop`                                |

use platform::config::LOOP_INFINITE;
use platform::{EngineError, OutputEngine};

use crate::buffer::SequenceBuffer;

/// Coarse engine activity, as reported by `BUSY?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BusyState {
    /// Nothing queued
    Idle = 0,
    /// Transfer finished, FIFO still draining
    Draining = 1,
    /// Transfer in progress or passes pending
    Active = 2,
}

impl BusyState {
    /// Numeric code sent over the wire.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Drives repeated buffer transfers into the output engine.
pub struct PlaybackController<'a, E: OutputEngine> {
    engine: E,
    buffer: SequenceBuffer<'a>,
    loop_count: u32,
    play_len: usize,
}

impl<'a, E: OutputEngine> PlaybackController<'a, E> {
    /// Claim the engine and load the output program.
    ///
    /// # Errors
    ///
    /// Propagates the engine's claim or program-load failure. Either is fatal
    /// at startup.
    pub fn new(mut engine: E, buffer: SequenceBuffer<'a>) -> Result<Self, EngineError> {
        engine.claim()?;
        engine.load_program()?;
        Ok(Self {
            engine,
            buffer,
            loop_count: 0,
            play_len: 0,
        })
    }

    /// Begin playback of the first `count` buffered words.
    ///
    /// `count` is clamped to the buffer capacity. With `loop_count == 0` the
    /// single pass starts now. Otherwise the passes are issued by
    /// [`poll`](Self::poll).
    pub fn start(&mut self, count: usize, loop_count: u32) {
        self.play_len = count.min(self.buffer.capacity());
        self.loop_count = loop_count;
        self.engine.configure_transfer(self.buffer.words(self.play_len));
        if loop_count == 0 && self.play_len > 0 {
            self.engine.start_transfer();
        }
    }

    /// Issue the next pass if one is due.
    ///
    /// Returns `true` when a transfer was started.
    #[allow(clippy::arithmetic_side_effects)] // Safety: loop_count != 0 checked above
    pub fn poll(&mut self) -> bool {
        if self.loop_count == 0 || self.engine.is_transfer_active() {
            return false;
        }
        self.engine.configure_transfer(self.buffer.words(self.play_len));
        self.engine.start_transfer();
        if self.loop_count != LOOP_INFINITE {
            self.loop_count -= 1;
        }
        true
    }

    /// Halt output immediately and drive every lane low.
    ///
    /// Pending passes are cancelled, the running transfer is aborted and the
    /// FIFO is flushed before the all-low word is pushed.
    pub fn stop(&mut self) {
        self.loop_count = 0;
        self.engine.abort_transfer();
        self.engine.clear_output_queue();
        self.engine.push_immediate(0);
    }

    /// Forget the current sequence after a failed compile.
    pub(crate) fn abandon(&mut self) {
        self.loop_count = 0;
        self.play_len = 0;
    }

    /// Current [`BusyState`].
    pub fn busy_state(&self) -> BusyState {
        if self.loop_count != 0 || self.engine.is_transfer_active() {
            BusyState::Active
        } else if !self.engine.is_output_queue_empty() {
            BusyState::Draining
        } else {
            BusyState::Idle
        }
    }

    /// Remaining passes (`LOOP_INFINITE` for endless playback).
    pub fn loop_count(&self) -> u32 {
        self.loop_count
    }

    /// Words per pass.
    pub fn play_len(&self) -> usize {
        self.play_len
    }

    /// Instruction buffer capacity in words.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Words of the current sequence.
    pub fn sequence(&self) -> &[u32] {
        self.buffer.words(self.play_len)
    }

    /// Shared access to the engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Exclusive access to the engine.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub(crate) fn buffer_mut(&mut self) -> &mut SequenceBuffer<'a> {
        &mut self.buffer
    }
}
