//! Command dispatcher.
//!
//! `Instrument` routes parsed commands to the playback core and renders one
//! response line per command. Queries never change state; `STOP` and the
//! sequence loads always answer so a host can pace its writes.

use core::fmt::{self, Write};

use platform::config::{PRODUCT_NAME, VERSION_MAJOR, VERSION_MINOR};
use platform::{ClockSource, OutputEngine};
use playback::{BusyState, PlaybackController, SequenceCompiler};

use crate::error::CommandError;
use crate::parse::Command;

/// Line terminator appended to every response.
pub const EOL: &str = "\r\n";

/// Successful command outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    /// Product name, version and board id
    Identity,
    /// System clock rate in Hz
    Clock(u32),
    /// Instruction buffer capacity in words
    BufferSize(usize),
    /// Longest single-word hold in ns
    MaxHold(u64),
    /// Engine activity
    Busy(BusyState),
    /// `STOP` acknowledged
    Ack,
    /// Sequence compiled; number of words written
    Loaded(usize),
}

/// The pulse generator as seen from the command line.
pub struct Instrument<'a, E: OutputEngine, C: ClockSource> {
    controller: PlaybackController<'a, E>,
    compiler: SequenceCompiler,
    clock: C,
    board_id: u64,
}

impl<'a, E: OutputEngine, C: ClockSource> Instrument<'a, E, C> {
    /// Assemble an instrument from its parts.
    pub fn new(
        controller: PlaybackController<'a, E>,
        compiler: SequenceCompiler,
        clock: C,
        board_id: u64,
    ) -> Self {
        Self {
            controller,
            compiler,
            clock,
            board_id,
        }
    }

    /// Parse and execute one line.
    pub fn handle(&mut self, line: &str) -> Result<Reply, CommandError> {
        let reply = match Command::parse(line)? {
            Command::Identify => Reply::Identity,
            Command::Clock => Reply::Clock(self.clock.current_rate_hz()),
            Command::BufferSize => Reply::BufferSize(self.controller.capacity()),
            Command::MaxHold => {
                Reply::MaxHold(self.compiler.max_hold_ns(self.clock.current_rate_hz()))
            }
            Command::Busy => Reply::Busy(self.controller.busy_state()),
            Command::Stop => {
                self.controller.stop();
                Reply::Ack
            }
            Command::Load {
                unit,
                loop_count,
                entries,
                ..
            } => {
                let clock_hz = self.clock.current_rate_hz();
                let count = self.compiler.compile(
                    &mut self.controller,
                    entries,
                    unit,
                    loop_count,
                    clock_hz,
                )?;
                Reply::Loaded(count)
            }
        };
        Ok(reply)
    }

    /// Execute one line and write its response line to `out`.
    pub fn respond<W: Write>(
        &mut self,
        line: &str,
        out: &mut W,
    ) -> Result<Result<Reply, CommandError>, fmt::Error> {
        let outcome = self.handle(line);
        self.write_reply(&outcome, out)?;
        Ok(outcome)
    }

    /// Render `outcome` as a single `\r\n`-terminated line.
    pub fn write_reply<W: Write>(
        &self,
        outcome: &Result<Reply, CommandError>,
        out: &mut W,
    ) -> fmt::Result {
        match outcome {
            Ok(Reply::Identity) => write!(
                out,
                "{PRODUCT_NAME} v{VERSION_MAJOR}.{VERSION_MINOR}, board id: {:016X}",
                self.board_id
            )?,
            Ok(Reply::Clock(hz)) => write!(out, "{hz}")?,
            Ok(Reply::BufferSize(words)) => write!(out, "{words}")?,
            Ok(Reply::MaxHold(ns)) => write!(out, "{ns}")?,
            Ok(Reply::Busy(state)) => write!(out, "{}", state.code())?,
            Ok(Reply::Ack) => out.write_str("ACK")?,
            Ok(Reply::Loaded(count)) => {
                for word in self.controller.sequence() {
                    write!(out, "{word},")?;
                }
                write!(out, " counter is {count}")?;
            }
            Err(err) => write!(out, "Error: {err}")?,
        }
        out.write_str(EOL)
    }

    /// Issue the next playback pass if one is due. Call once per loop iteration.
    pub fn poll(&mut self) -> bool {
        self.controller.poll()
    }

    /// Current engine activity.
    pub fn busy_state(&self) -> BusyState {
        self.controller.busy_state()
    }

    /// The playback controller.
    pub fn controller(&self) -> &PlaybackController<'a, E> {
        &self.controller
    }

    /// The playback controller, mutably.
    pub fn controller_mut(&mut self) -> &mut PlaybackController<'a, E> {
        &mut self.controller
    }

    /// The clock source.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}
