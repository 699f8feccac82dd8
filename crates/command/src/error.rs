//! Command error type.

use playback::CompileError;

/// Positional argument of `PULSE`/`CPULSE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Arg {
    /// `m`, accepted and ignored
    Reserved,
    /// `n`, the loop count
    LoopCount,
}

impl core::fmt::Display for Arg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Reserved => write!(f, "m"),
            Self::LoopCount => write!(f, "n"),
        }
    }
}

/// Why a command line was rejected. Reported as one `Error: ...` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Unknown verb
    Unrecognized,
    /// Required argument absent
    MissingArgument(Arg),
    /// Argument is not a decimal `u32`
    MalformedArgument(Arg),
    /// The entry list failed to compile
    Compile(CompileError),
}

impl From<CompileError> for CommandError {
    fn from(err: CompileError) -> Self {
        Self::Compile(err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CommandError {}

impl core::fmt::Display for CommandError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unrecognized => write!(f, "command not recognized."),
            Self::MissingArgument(arg) => write!(f, "{arg} parameter is missing."),
            Self::MalformedArgument(arg) => write!(f, "{arg} parameter could not be parsed."),
            Self::Compile(err) => write!(f, "{err}"),
        }
    }
}
