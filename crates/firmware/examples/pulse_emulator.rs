//! pico-pulse emulator
//!
//! Speaks the serial protocol on stdin/stdout against a simulated engine.
//! Run with: cargo run --example pulse_emulator --features emulator
//!
//! Logs go to stderr; set `RUST_LOG=debug` to watch transfers.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::time::Duration;

use anyhow::Context;
use command::{Instrument, LineAssembler};
use platform::config::{BUF_LEN, CMD_BUF_LEN, PRODUCT_NAME};
use platform::ClockSource;
use playback::{InstructionFormat, PlaybackController, SequenceBuffer, SequenceCompiler};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use firmware::emulator::{
    port::STDIN_CHANNEL_DEPTH, spawn_stdin_reader, ChannelPort, FixedClock, LogIndicator,
    SimulatedEngine,
};
use firmware::ControlLoop;

/// Board id reported by `IDN?`.
const EMULATOR_BOARD_ID: u64 = 0x0000_0000_E111_0A70;

/// Back-off when a step had nothing to do.
const IDLE_POLL: Duration = Duration::from_micros(50);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let clock = FixedClock::default();
    let format = InstructionFormat::DEFAULT;
    tracing::info!(
        clock_hz = clock.current_rate_hz(),
        buffer = BUF_LEN,
        "{PRODUCT_NAME} emulator"
    );

    let (tx, rx) = mpsc::channel(STDIN_CHANNEL_DEPTH);
    let reader = spawn_stdin_reader(tx);
    let mut port = ChannelPort::new(rx, std::io::stdout());

    let mut words = vec![0u32; BUF_LEN];
    let mut line = vec![0u8; CMD_BUF_LEN];

    let engine = SimulatedEngine::new(format, clock.current_rate_hz());
    let controller = PlaybackController::new(engine, SequenceBuffer::new(&mut words))
        .context("output engine unavailable")?;
    let instrument = Instrument::new(
        controller,
        SequenceCompiler::new(format),
        clock,
        EMULATOR_BOARD_ID,
    );
    let mut control = ControlLoop::new(
        instrument,
        LineAssembler::new(&mut line),
        LogIndicator::default(),
    );

    loop {
        let step = control
            .step(&mut port)
            .map_err(|_| anyhow::anyhow!("stdout closed"))?;
        match step.outcome {
            Some(Ok(reply)) => tracing::debug!(?reply, "command"),
            Some(Err(e)) => tracing::warn!(%e, "rejected"),
            None => {}
        }
        if port.is_closed() {
            break;
        }
        if step.is_quiet() {
            tokio::time::sleep(IDLE_POLL).await;
        }
    }

    reader.await.context("stdin reader panicked")??;
    tracing::info!(
        transfers = control.instrument().controller().engine().transfers_started(),
        "emulator stopped"
    );
    Ok(())
}
