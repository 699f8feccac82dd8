//! Host emulator collaborators (emulator builds only).
//!
//! The emulator speaks the same line protocol as the board, on stdin/stdout,
//! against an engine that plays words on a simulated clock.

pub mod engine;
pub mod port;

pub use engine::SimulatedEngine;
pub use port::{spawn_stdin_reader, ChannelPort};

use platform::ClockSource;

/// Fixed clock rate reported by the emulator.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u32);

impl Default for FixedClock {
    fn default() -> Self {
        Self(150_000_000)
    }
}

impl ClockSource for FixedClock {
    fn current_rate_hz(&self) -> u32 {
        self.0
    }
}

/// Status indicator that logs transitions.
#[derive(Debug, Default)]
pub struct LogIndicator {
    lit: bool,
}

impl platform::StatusIndicator for LogIndicator {
    fn set_active(&mut self, active: bool) {
        if active != self.lit {
            tracing::debug!(active, "status led");
            self.lit = active;
        }
    }
}
