//! Pulse sequence core: ns/cycle conversion, instruction encoding, the
//! instruction buffer, the playback controller and the sequence compiler.
//!
//! ```text
//! "10,1,20,0" ──SequenceCompiler──> SequenceBuffer ──PlaybackController──> OutputEngine
//!                   │                                         │
//!             CycleConverter                           loop count / BusyState
//!             InstructionFormat
//! ```
//!
//! Nothing here touches hardware; the engine is reached through
//! [`platform::OutputEngine`].
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(clippy::unwrap_used)]

pub mod buffer;
pub mod compiler;
pub mod controller;
pub mod encoder;
pub mod error;
pub mod units;

pub use buffer::SequenceBuffer;
pub use compiler::{SequenceCompiler, TimeUnit};
pub use controller::{BusyState, PlaybackController};
pub use encoder::InstructionFormat;
pub use error::{CompileError, Token};
pub use units::CycleConverter;
