//! Text command protocol for the pico-pulse generator.
//!
//! ```text
//! CharSource ──byte──> LineAssembler ──line──> Command::parse ──> Instrument ──> response line
//! ```
//!
//! Every line gets exactly one `\r\n`-terminated response, so a host can
//! write a command and wait for the answer before sending the next.
//!
//! # Example
//!
//! ```no_run
//! use command::{Command, CommandError};
//!
//! assert_eq!(Command::parse("FIRE"), Err(CommandError::Unrecognized));
//! ```
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod error;
pub mod instrument;
pub mod line;
pub mod parse;

pub use error::{Arg, CommandError};
pub use instrument::{Instrument, Reply, EOL};
pub use line::LineAssembler;
pub use parse::Command;
