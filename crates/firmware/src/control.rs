//! The control loop.
//!
//! One [`ControlLoop::step`] per iteration:
//!
//! 1. take at most one byte from the port; if it completes a line, execute
//!    it and write the response
//! 2. issue the next playback pass if the engine went idle
//! 3. update the status indicator
//!
//! Nothing in a step waits for the engine or the host, so a long response is
//! the only thing that can delay a re-arm.

use core::fmt;

use command::{CommandError, Instrument, LineAssembler, Reply};
use platform::{CharSource, ClockSource, OutputEngine, StatusIndicator};
use playback::BusyState;

/// What happened during one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Outcome of the command completed during this step, if any
    pub outcome: Option<Result<Reply, CommandError>>,
    /// A playback pass was started
    pub pass_started: bool,
    /// Busy state after the step
    pub busy: BusyState,
}

impl Step {
    /// Nothing to report; the caller may back off.
    pub fn is_quiet(&self) -> bool {
        self.outcome.is_none() && !self.pass_started
    }
}

/// Ties the command path, the playback core and the status indicator together.
pub struct ControlLoop<'a, E, C, L>
where
    E: OutputEngine,
    C: ClockSource,
    L: StatusIndicator,
{
    instrument: Instrument<'a, E, C>,
    lines: LineAssembler<'a>,
    indicator: L,
}

impl<'a, E, C, L> ControlLoop<'a, E, C, L>
where
    E: OutputEngine,
    C: ClockSource,
    L: StatusIndicator,
{
    /// Assemble the loop.
    pub fn new(instrument: Instrument<'a, E, C>, lines: LineAssembler<'a>, indicator: L) -> Self {
        Self {
            instrument,
            lines,
            indicator,
        }
    }

    /// Run one iteration against `port`.
    ///
    /// # Errors
    ///
    /// Only when the response could not be written to `port`.
    pub fn step<P>(&mut self, port: &mut P) -> Result<Step, fmt::Error>
    where
        P: CharSource + fmt::Write,
    {
        let outcome = match self.lines.poll(port) {
            Some(line) => Some(self.instrument.respond(line, port)?),
            None => None,
        };

        let pass_started = self.instrument.poll();
        let busy = self.instrument.busy_state();
        self.indicator.set_active(busy != BusyState::Idle);

        Ok(Step {
            outcome,
            pass_started,
            busy,
        })
    }

    /// The dispatcher.
    pub fn instrument(&self) -> &Instrument<'a, E, C> {
        &self.instrument
    }

    /// The dispatcher, mutably.
    pub fn instrument_mut(&mut self) -> &mut Instrument<'a, E, C> {
        &mut self.instrument
    }

    /// The status indicator.
    pub fn indicator(&self) -> &L {
        &self.indicator
    }
}
