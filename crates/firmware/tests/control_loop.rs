//! Control loop tests, run with `cargo test -p firmware --test control_loop`
// Test file: unwrap/indexing are intentional test mechanisms.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
//!
//! Drives `ControlLoop` byte by byte against the platform mocks, the same way
//! `main` drives it against the UART and the PIO engine.

use std::fmt;

use command::{CommandError, Instrument, LineAssembler, Reply};
use firmware::{ControlLoop, Step};
use platform::mocks::{MockClock, MockEngine, MockIndicator, MockSerial};
use platform::CharSource;
use playback::{BusyState, InstructionFormat, PlaybackController, SequenceBuffer, SequenceCompiler};

/// Serial link: scripted input, captured output.
#[derive(Default)]
struct TestPort {
    input: MockSerial,
    output: String,
}

impl CharSource for TestPort {
    fn try_read_char(&mut self) -> Option<u8> {
        self.input.try_read_char()
    }
}

impl fmt::Write for TestPort {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.output.push_str(s);
        Ok(())
    }
}

/// Port whose writes always fail.
struct BrokenPort(MockSerial);

impl CharSource for BrokenPort {
    fn try_read_char(&mut self) -> Option<u8> {
        self.0.try_read_char()
    }
}

impl fmt::Write for BrokenPort {
    fn write_str(&mut self, _: &str) -> fmt::Result {
        Err(fmt::Error)
    }
}

type Loop<'a> = ControlLoop<'a, MockEngine, MockClock, MockIndicator>;

fn with_loop(f: impl FnOnce(&mut Loop<'_>)) {
    let mut words = vec![0u32; 64];
    let mut line = vec![0u8; 128];
    let controller =
        PlaybackController::new(MockEngine::new(), SequenceBuffer::new(&mut words)).unwrap();
    let instrument = Instrument::new(
        controller,
        SequenceCompiler::new(InstructionFormat::DEFAULT),
        MockClock::new(125_000_000),
        0x0123_4567_89AB_CDEF,
    );
    let mut control = ControlLoop::new(instrument, LineAssembler::new(&mut line), MockIndicator::new());
    f(&mut control);
}

/// Step until a command completes; return that step.
fn run_line(control: &mut Loop<'_>, port: &mut TestPort, line: &str) -> Step {
    port.input.feed_str(line);
    while port.input.pending() > 0 {
        let step = control.step(port).unwrap();
        if step.outcome.is_some() {
            return step;
        }
    }
    panic!("no command completed for {line:?}");
}

fn engine<'c>(control: &'c mut Loop<'_>) -> &'c mut MockEngine {
    control.instrument_mut().controller_mut().engine_mut()
}

#[test]
fn quiet_when_nothing_arrives() {
    with_loop(|control| {
        let mut port = TestPort::default();
        let step = control.step(&mut port).unwrap();
        assert!(step.is_quiet());
        assert_eq!(step.busy, BusyState::Idle);
        assert!(port.output.is_empty());
        assert!(!control.indicator().is_active());
    });
}

#[test]
fn looped_sequence_plays_every_pass() {
    with_loop(|control| {
        let mut port = TestPort::default();
        let step = run_line(control, &mut port, "CPULSE 0 2 10,1,20,0\n");
        assert_eq!(step.outcome, Some(Ok(Reply::Loaded(2))));
        assert_eq!(port.output, "193,512, counter is 2\r\n");

        // First pass issued in the same step the command completed
        assert!(step.pass_started);
        assert_eq!(step.busy, BusyState::Active);
        assert!(control.indicator().is_active());

        engine(control).finish();
        assert!(control.step(&mut port).unwrap().pass_started);
        engine(control).finish();

        let step = control.step(&mut port).unwrap();
        assert!(!step.pass_started);
        assert_eq!(step.busy, BusyState::Idle);
        assert!(!control.indicator().is_active());
        assert_eq!(engine(control).emitted(), &[193, 512, 193, 512]);
    });
}

#[test]
fn busy_query_reports_draining() {
    with_loop(|control| {
        let mut port = TestPort::default();
        run_line(control, &mut port, "CPULSE 0 0 100,3\n");
        port.output.clear();

        // Words left the DMA channel but are still queued
        engine(control).complete_transfer();
        let step = run_line(control, &mut port, "BUSY?\n");
        assert_eq!(step.outcome, Some(Ok(Reply::Busy(BusyState::Draining))));
        assert_eq!(port.output, "1\r\n");
        assert!(control.indicator().is_active());

        engine(control).drain_output();
        let step = control.step(&mut port).unwrap();
        assert_eq!(step.busy, BusyState::Idle);
        assert!(!control.indicator().is_active());
    });
}

#[test]
fn stop_cancels_infinite_playback() {
    with_loop(|control| {
        let mut port = TestPort::default();
        let infinite = format!("CPULSE 0 {} 10,1\n", u32::MAX);
        run_line(control, &mut port, &infinite);
        for _ in 0..3 {
            engine(control).finish();
            assert!(control.step(&mut port).unwrap().pass_started);
        }

        port.output.clear();
        let step = run_line(control, &mut port, "STOP\n");
        assert_eq!(step.outcome, Some(Ok(Reply::Ack)));
        assert_eq!(port.output, "ACK\r\n");
        assert!(!step.pass_started);
        assert_eq!(step.busy, BusyState::Idle);
        assert_eq!(engine(control).last_output(), Some(0));
        assert_eq!(control.instrument().controller().loop_count(), 0);
    });
}

#[test]
fn errors_answered_and_loop_keeps_running() {
    with_loop(|control| {
        let mut port = TestPort::default();
        let step = run_line(control, &mut port, "CPULSE 0 0 10,99\n");
        assert_eq!(
            step.outcome,
            Some(Err(CommandError::Compile(playback::CompileError::InvalidMask)))
        );
        let step = run_line(control, &mut port, "CLK?\n");
        assert_eq!(step.outcome, Some(Ok(Reply::Clock(125_000_000))));
        assert_eq!(
            port.output,
            "Error: Output mask is invalid!\r\n125000000\r\n"
        );
    });
}

#[test]
fn indicator_only_toggles_on_change() {
    with_loop(|control| {
        let mut port = TestPort::default();
        for _ in 0..5 {
            control.step(&mut port).unwrap();
        }
        run_line(control, &mut port, "CPULSE 0 0 10,1\n");
        for _ in 0..5 {
            control.step(&mut port).unwrap();
        }
        engine(control).finish();
        for _ in 0..5 {
            control.step(&mut port).unwrap();
        }
        assert_eq!(control.indicator().changes(), 2);
    });
}

#[test]
fn write_failure_surfaces() {
    with_loop(|control| {
        let mut port = BrokenPort(MockSerial::new());
        port.0.feed_str("BUFFER?\n");
        let mut result = Ok(());
        while port.0.pending() > 0 {
            if let Err(e) = control.step(&mut port) {
                result = Err(e);
            }
        }
        assert_eq!(result, Err(fmt::Error));
    });
}
