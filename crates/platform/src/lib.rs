//! Hardware Abstraction Layer (HAL) for the pico-pulse timing generator
//!
//! This crate provides trait-based abstractions for every collaborator the
//! pulse-sequence core talks to, enabling development and testing without
//! physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate: control loop, serial, LED)
//!         ↓
//! Feature Layers (command, playback)
//!         ↓
//! Platform HAL (this crate - trait abstractions + configuration)
//!         ↓
//! Hardware Layer (embassy-rp PIO + DMA + UART)
//! ```
//!
//! # Collaborators
//!
//! - [`OutputEngine`] - PIO state machine fed by a DMA channel
//! - [`ClockSource`] - System clock rate
//! - [`CharSource`] - Non-blocking command byte source
//! - [`StatusIndicator`] - Status LED
//!
//! # Features
//!
//! - `std`: Enable standard library support and the [`mocks`] module
//! - `defmt`: Enable defmt logging derives
//!
//! # Example
//!
//! ```no_run
//! use platform::OutputEngine;
//!
//! fn all_off<E: OutputEngine>(engine: &mut E) {
//!     engine.abort_transfer();
//!     engine.clear_output_queue();
//!     engine.push_immediate(0);
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::must_use_candidate)] // hardware accessors: callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod engine;
pub mod mocks;

pub use config::{ConfigError, EngineConfig};
pub use engine::{CharSource, ClockSource, EngineError, OutputEngine, StatusIndicator};
