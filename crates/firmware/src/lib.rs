//! pico-pulse firmware
//!
//! Multi-channel timing pulse generator for the RP2350 (Raspberry Pi Pico 2).
//! A host loads a list of `(hold, mask)` entries over the serial line; the
//! PIO block plays them back on GPIO2..GPIO6 with single-cycle resolution.
//!
//! # Architecture
//!
//! ```text
//! Application Layer (main.rs / pulse_emulator: ControlLoop)
//!         ↓
//! Command protocol (command crate)
//!         ↓
//! Sequence core (playback crate)
//!         ↓
//! Platform traits (platform crate)
//!         ↓
//! Drivers (hardware: PIO + DMA + UART, emulator: simulated engine + stdio)
//! ```
//!
//! # Features
//!
//! - `hardware` - Build for the RP2350 target (embassy-rp, defmt)
//! - `emulator` - Build the desktop emulator (tokio, tracing)
//! - `std` - Enable standard library (for emulator and testing)
//!
//! # Examples
//!
//! ## Hardware Target
//!
//! ```bash
//! cargo build --release --target thumbv8m.main-none-eabihf --features hardware
//! ```
//!
//! ## Emulator Target
//!
//! ```bash
//! cargo run --example pulse_emulator --features emulator
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
// Upgrade relevant warns to deny; keep pedantic as warn (too noisy for firmware)
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(clippy::await_holding_lock)] // holding a blocking Mutex across .await is a bug
#![deny(unsafe_op_in_unsafe_fn)]
// unsafe fn body is not implicitly unsafe block
// Logging discipline
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)] // dbg! should not be left in committed code
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)] // common in Rust crates; not a real issue
#![allow(clippy::missing_errors_doc)] // most errors are self-explanatory
// Pedantic lints too noisy for firmware application code:
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

pub mod control;
pub mod indicator;
pub mod pio_program;
pub mod serial;

#[cfg(feature = "hardware")]
pub mod exception_handlers;
#[cfg(feature = "hardware")]
pub mod hardware;

#[cfg(feature = "emulator")]
pub mod emulator;

// Re-export key types
pub use control::{ControlLoop, Step};
pub use indicator::PinIndicator;
pub use pio_program::output_program;
pub use serial::SerialPort;

#[cfg(feature = "hardware")]
pub use hardware::{PioEngine, SystemClock};

#[cfg(feature = "emulator")]
pub use emulator::{ChannelPort, SimulatedEngine};
