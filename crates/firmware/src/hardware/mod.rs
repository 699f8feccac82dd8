//! RP2350 drivers (hardware builds only).
//!
//! | Collaborator       | Driver                          |
//! |--------------------|---------------------------------|
//! | Output engine      | [`PioEngine`] (PIO0 SM0 + DMA)   |
//! | Clock source       | [`SystemClock`]                 |
//! | Serial port        | `SerialPort<BufferedUart>`      |
//! | Status indicator   | `PinIndicator<Output>` (GPIO25) |

pub mod engine;

pub use engine::PioEngine;

use platform::ClockSource;

/// `clk_sys`, which also clocks the PIO block (divider 1).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn current_rate_hz(&self) -> u32 {
        embassy_rp::clocks::clk_sys_freq()
    }
}

/// Unique chip id from OTP, or 0 if it cannot be read.
pub fn board_id() -> u64 {
    match embassy_rp::otp::get_chipid() {
        Ok(id) => id,
        Err(_) => {
            defmt::warn!("chip id unreadable; reporting 0");
            0
        }
    }
}
