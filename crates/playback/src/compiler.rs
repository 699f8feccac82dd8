//! Sequence compiler: entry list text → instruction words.
//!
//! The entry list alternates hold times and output masks:
//!
//! ```text
//! 10,1,20,0      hold 10 with lane 0 high, then 20 with all lanes low
//! ```
//!
//! Empty fields between commas are skipped and surrounding whitespace is
//! ignored. A failed compile never leaves anything runnable: the controller's
//! loop count and play length are forced to zero.

use core::num::IntErrorKind;

use platform::OutputEngine;

use crate::buffer::SequenceBuffer;
use crate::controller::{BusyState, PlaybackController};
use crate::encoder::InstructionFormat;
use crate::error::{CompileError, Token};
use crate::units::CycleConverter;

/// Unit of the hold times in an entry list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeUnit {
    /// Nanoseconds, converted with the current clock rate (`PULSE`)
    Nanoseconds,
    /// Raw state machine cycles (`CPULSE`)
    Cycles,
}

/// Compiles entry lists into a controller's buffer and starts playback.
#[derive(Debug, Default)]
pub struct SequenceCompiler {
    format: InstructionFormat,
    converter: CycleConverter,
}

impl SequenceCompiler {
    /// Create a compiler for the given word layout.
    pub const fn new(format: InstructionFormat) -> Self {
        Self {
            format,
            converter: CycleConverter::new(),
        }
    }

    /// Longest hold a single word expresses, in nanoseconds at `clock_hz`.
    pub fn max_hold_ns(&mut self, clock_hz: u32) -> u64 {
        let max = self.format.max_cycles();
        self.converter.cycles_to_ns(max, clock_hz)
    }

    /// Compile `source` and hand the result to `controller`.
    ///
    /// A one-shot load while the engine is not `Active` leaves the current
    /// output alone. Any other load stops playback first.
    ///
    /// Returns the number of words written.
    pub fn compile<E: OutputEngine>(
        &mut self,
        controller: &mut PlaybackController<'_, E>,
        source: &str,
        unit: TimeUnit,
        loop_count: u32,
        clock_hz: u32,
    ) -> Result<usize, CompileError> {
        if !(loop_count == 0 && controller.busy_state() != BusyState::Active) {
            controller.stop();
        }

        match self.fill(controller.buffer_mut(), source, unit, clock_hz) {
            Ok(count) => {
                controller.start(count, if count == 0 { 0 } else { loop_count });
                Ok(count)
            }
            Err(err) => {
                controller.abandon();
                Err(err)
            }
        }
    }

    fn fill(
        &mut self,
        buffer: &mut SequenceBuffer<'_>,
        source: &str,
        unit: TimeUnit,
        clock_hz: u32,
    ) -> Result<usize, CompileError> {
        let mut tokens = source.split(',').map(str::trim).filter(|t| !t.is_empty());
        let mut cursor = 0;

        while let Some(hold) = tokens.next() {
            let hold = parse_count(hold, Token::Duration)?;
            let mask = tokens.next().ok_or(CompileError::UnmatchedEntry)?;
            let mask = parse_count(mask, Token::Mask)?.ok_or(CompileError::InvalidMask)?;
            self.format.check_mask(mask)?;

            let cycles = match (unit, hold) {
                (TimeUnit::Cycles, Some(hold)) => hold,
                (TimeUnit::Cycles, None) => return Err(CompileError::BufferOverflow),
                (TimeUnit::Nanoseconds, Some(hold)) => self.converter.ns_to_cycles(hold, clock_hz)?,
                (TimeUnit::Nanoseconds, None) => return Err(CompileError::DurationTooLong),
            };
            cursor = self.format.encode(cycles, mask, buffer, cursor)?;
        }

        Ok(cursor)
    }
}

/// Parse a decimal field. `Ok(None)` means the value does not fit in 64 bits.
fn parse_count(token: &str, which: Token) -> Result<Option<u64>, CompileError> {
    match token.parse::<u64>() {
        Ok(value) => Ok(Some(value)),
        Err(err) if *err.kind() == IntErrorKind::PosOverflow => Ok(None),
        Err(_) => Err(CompileError::Parse(which)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::config::LOOP_INFINITE;
    use platform::mocks::MockEngine;

    const CLK: u32 = 125_000_000;

    fn setup(store: &mut [u32]) -> (SequenceCompiler, PlaybackController<'_, MockEngine>) {
        let ctl = PlaybackController::new(MockEngine::new(), SequenceBuffer::new(store)).unwrap();
        (SequenceCompiler::new(InstructionFormat::DEFAULT), ctl)
    }

    #[test]
    fn cycle_entries_encode_directly() {
        let mut store = [0u32; 8];
        let (mut cc, mut ctl) = setup(&mut store);
        let n = cc.compile(&mut ctl, "10,1,20,0", TimeUnit::Cycles, 0, CLK).unwrap();
        assert_eq!(n, 2);
        assert_eq!(ctl.sequence(), &[(6 << 5) | 1, 16 << 5]);
        assert_eq!(ctl.engine().transfers_started(), 1);
    }

    #[test]
    fn empty_fields_and_spaces_skipped() {
        let mut store = [0u32; 8];
        let (mut cc, mut ctl) = setup(&mut store);
        let n = cc
            .compile(&mut ctl, " 10 ,,1, 20,0,", TimeUnit::Cycles, 0, CLK)
            .unwrap();
        assert_eq!(n, 2);
    }

    #[test]
    fn nanoseconds_converted_with_clock() {
        let mut store = [0u32; 8];
        let (mut cc, mut ctl) = setup(&mut store);
        // 80 ns at 125 MHz = 10 cycles
        cc.compile(&mut ctl, "80,3", TimeUnit::Nanoseconds, 0, CLK).unwrap();
        assert_eq!(ctl.sequence(), &[(6 << 5) | 3]);
    }

    #[test]
    fn looped_load_waits_for_poll() {
        let mut store = [0u32; 8];
        let (mut cc, mut ctl) = setup(&mut store);
        cc.compile(&mut ctl, "10,1", TimeUnit::Cycles, 3, CLK).unwrap();
        assert_eq!(ctl.loop_count(), 3);
        assert_eq!(ctl.busy_state(), BusyState::Active);
        assert_eq!(ctl.engine().transfers_started(), 0);
    }

    #[test]
    fn unmatched_entry_rejected() {
        let mut store = [0u32; 8];
        let (mut cc, mut ctl) = setup(&mut store);
        assert_eq!(
            cc.compile(&mut ctl, "10,1,20", TimeUnit::Cycles, 5, CLK),
            Err(CompileError::UnmatchedEntry)
        );
        assert_eq!(ctl.loop_count(), 0);
        assert_eq!(ctl.play_len(), 0);
    }

    #[test]
    fn malformed_tokens_rejected() {
        let mut store = [0u32; 8];
        let (mut cc, mut ctl) = setup(&mut store);
        assert_eq!(
            cc.compile(&mut ctl, "1x,1", TimeUnit::Cycles, 0, CLK),
            Err(CompileError::Parse(Token::Duration))
        );
        assert_eq!(
            cc.compile(&mut ctl, "10,-1", TimeUnit::Cycles, 0, CLK),
            Err(CompileError::Parse(Token::Mask))
        );
    }

    #[test]
    fn invalid_mask_rejected_and_nothing_plays() {
        let mut store = [0u32; 8];
        let (mut cc, mut ctl) = setup(&mut store);
        assert_eq!(
            cc.compile(&mut ctl, "10,1,20,32", TimeUnit::Cycles, LOOP_INFINITE, CLK),
            Err(CompileError::InvalidMask)
        );
        assert_eq!(ctl.loop_count(), 0);
        assert!(!ctl.poll());
    }

    #[test]
    fn overflow_aborts_whole_sequence() {
        let mut store = [0u32; 2];
        let (mut cc, mut ctl) = setup(&mut store);
        assert_eq!(
            cc.compile(&mut ctl, "10,1,10,2,10,3", TimeUnit::Cycles, 2, CLK),
            Err(CompileError::BufferOverflow)
        );
        assert_eq!(ctl.loop_count(), 0);
        assert_eq!(ctl.play_len(), 0);
    }

    #[test]
    fn duration_too_long() {
        let mut store = [0u32; 8];
        let (mut cc, mut ctl) = setup(&mut store);
        // 150 MHz reduces to 3 cycles per 20 ns, so u64::MAX ns overflows
        let source = std::format!("{},1", u64::MAX);
        assert_eq!(
            cc.compile(&mut ctl, &source, TimeUnit::Nanoseconds, 0, 150_000_000),
            Err(CompileError::DurationTooLong)
        );
    }

    #[test]
    fn oversized_mask_is_invalid() {
        let mut store = [0u32; 8];
        let (mut cc, mut ctl) = setup(&mut store);
        assert_eq!(
            cc.compile(&mut ctl, "10,18446744073709551616", TimeUnit::Cycles, 0, CLK),
            Err(CompileError::InvalidMask)
        );
        assert_eq!(ctl.play_len(), 0);
    }

    #[test]
    fn oversized_duration_reports_unit_error() {
        let mut store = [0u32; 8];
        let (mut cc, mut ctl) = setup(&mut store);
        let source = "18446744073709551616,1";
        assert_eq!(
            cc.compile(&mut ctl, source, TimeUnit::Cycles, 0, CLK),
            Err(CompileError::BufferOverflow)
        );
        assert_eq!(
            cc.compile(&mut ctl, source, TimeUnit::Nanoseconds, 0, CLK),
            Err(CompileError::DurationTooLong)
        );
        // The mask is still checked first.
        assert_eq!(
            cc.compile(&mut ctl, "18446744073709551616,32", TimeUnit::Cycles, 0, CLK),
            Err(CompileError::InvalidMask)
        );
        assert_eq!(
            cc.compile(&mut ctl, "18446744073709551616", TimeUnit::Cycles, 0, CLK),
            Err(CompileError::UnmatchedEntry)
        );
    }

    #[test]
    fn one_shot_while_draining_does_not_stop() {
        let mut store = [0u32; 8];
        let (mut cc, mut ctl) = setup(&mut store);
        cc.compile(&mut ctl, "10,1", TimeUnit::Cycles, 0, CLK).unwrap();
        ctl.engine_mut().complete_transfer();
        assert_eq!(ctl.busy_state(), BusyState::Draining);

        cc.compile(&mut ctl, "10,2", TimeUnit::Cycles, 0, CLK).unwrap();
        assert_eq!(ctl.engine().last_output(), None);
    }

    #[test]
    fn load_while_active_stops_first() {
        let mut store = [0u32; 8];
        let (mut cc, mut ctl) = setup(&mut store);
        cc.compile(&mut ctl, "10,1", TimeUnit::Cycles, 0, CLK).unwrap();
        assert_eq!(ctl.busy_state(), BusyState::Active);

        cc.compile(&mut ctl, "10,2", TimeUnit::Cycles, 0, CLK).unwrap();
        assert_eq!(ctl.engine().aborts(), 1);
        assert_eq!(ctl.engine().last_output(), Some(0));
    }

    #[test]
    fn empty_list_loads_nothing() {
        let mut store = [0u32; 8];
        let (mut cc, mut ctl) = setup(&mut store);
        assert_eq!(cc.compile(&mut ctl, "", TimeUnit::Cycles, 4, CLK), Ok(0));
        assert_eq!(ctl.loop_count(), 0);
        assert_eq!(ctl.busy_state(), BusyState::Idle);
    }

    #[test]
    fn max_hold_at_125_mhz() {
        let mut cc = SequenceCompiler::new(InstructionFormat::DEFAULT);
        // (2^27 - 1 + 4) cycles * 8 ns
        assert_eq!(cc.max_hold_ns(CLK), ((1u64 << 27) + 3) * 8);
    }
}
