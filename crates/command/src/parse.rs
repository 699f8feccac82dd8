//! Command line parsing.
//!
//! | Verb              | Arguments                  |
//! |-------------------|----------------------------|
//! | `IDN?` / `*IDN?`  |                            |
//! | `CLK?`            |                            |
//! | `BUFFER?`         |                            |
//! | `MAXT?`           |                            |
//! | `BUSY?`           |                            |
//! | `STOP`            |                            |
//! | `PULSE`           | `m n t1,o1,t2,o2,...` (ns)  |
//! | `CPULSE`          | `m n t1,o1,t2,o2,...` (cycles) |
//!
//! Verbs match case-insensitively; trailing arguments on query verbs are
//! ignored.

use playback::TimeUnit;

use crate::error::{Arg, CommandError};

/// A parsed command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// `IDN?` or `*IDN?`
    Identify,
    /// `CLK?`
    Clock,
    /// `BUFFER?`
    BufferSize,
    /// `MAXT?`
    MaxHold,
    /// `BUSY?`
    Busy,
    /// `STOP`
    Stop,
    /// `PULSE` or `CPULSE`
    Load {
        /// Hold time unit
        unit: TimeUnit,
        /// `m`; parsed, otherwise unused
        reserved: u32,
        /// `n`
        loop_count: u32,
        /// Raw entry list
        entries: &'a str,
    },
}

impl<'a> Command<'a> {
    /// Parse one command line.
    pub fn parse(line: &'a str) -> Result<Self, CommandError> {
        let (verb, rest) = split_token(line).ok_or(CommandError::Unrecognized)?;

        let simple = [
            ("IDN?", Self::Identify),
            ("*IDN?", Self::Identify),
            ("CLK?", Self::Clock),
            ("BUFFER?", Self::BufferSize),
            ("MAXT?", Self::MaxHold),
            ("BUSY?", Self::Busy),
            ("STOP", Self::Stop),
        ];
        if let Some((_, cmd)) = simple.iter().find(|(name, _)| verb.eq_ignore_ascii_case(name)) {
            return Ok(*cmd);
        }

        let unit = if verb.eq_ignore_ascii_case("PULSE") {
            TimeUnit::Nanoseconds
        } else if verb.eq_ignore_ascii_case("CPULSE") {
            TimeUnit::Cycles
        } else {
            return Err(CommandError::Unrecognized);
        };

        let (reserved, rest) = number(rest, Arg::Reserved)?;
        let (loop_count, rest) = number(rest, Arg::LoopCount)?;
        Ok(Self::Load {
            unit,
            reserved,
            loop_count,
            entries: rest.trim(),
        })
    }
}

/// First whitespace-delimited token and the text after it.
fn split_token(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    Some(
        text.split_once(|c: char| c.is_ascii_whitespace())
            .unwrap_or((text, "")),
    )
}

fn number(text: &str, arg: Arg) -> Result<(u32, &str), CommandError> {
    let (token, rest) = split_token(text).ok_or(CommandError::MissingArgument(arg))?;
    let value = token
        .parse()
        .map_err(|_| CommandError::MalformedArgument(arg))?;
    Ok((value, rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries() {
        assert_eq!(Command::parse("IDN?"), Ok(Command::Identify));
        assert_eq!(Command::parse("*IDN?"), Ok(Command::Identify));
        assert_eq!(Command::parse("CLK?"), Ok(Command::Clock));
        assert_eq!(Command::parse("BUFFER?"), Ok(Command::BufferSize));
        assert_eq!(Command::parse("MAXT?"), Ok(Command::MaxHold));
        assert_eq!(Command::parse("BUSY?"), Ok(Command::Busy));
        assert_eq!(Command::parse("  STOP  "), Ok(Command::Stop));
    }

    #[test]
    fn verbs_case_insensitive() {
        assert_eq!(Command::parse("busy?"), Ok(Command::Busy));
    }

    #[test]
    fn cpulse_arguments() {
        assert_eq!(
            Command::parse("CPULSE 0 3 10,1,20,0"),
            Ok(Command::Load {
                unit: TimeUnit::Cycles,
                reserved: 0,
                loop_count: 3,
                entries: "10,1,20,0",
            })
        );
    }

    #[test]
    fn pulse_entries_keep_inner_spaces() {
        let Ok(Command::Load { unit, entries, .. }) = Command::parse("PULSE 1 0 10, 1, 20, 0 ") else {
            panic!("expected load");
        };
        assert_eq!(unit, TimeUnit::Nanoseconds);
        assert_eq!(entries, "10, 1, 20, 0");
    }

    #[test]
    fn infinite_loop_count() {
        let Ok(Command::Load { loop_count, .. }) = Command::parse("CPULSE 0 4294967295 10,1") else {
            panic!("expected load");
        };
        assert_eq!(loop_count, u32::MAX);
    }

    #[test]
    fn missing_and_malformed_arguments() {
        assert_eq!(
            Command::parse("PULSE"),
            Err(CommandError::MissingArgument(Arg::Reserved))
        );
        assert_eq!(
            Command::parse("PULSE 0"),
            Err(CommandError::MissingArgument(Arg::LoopCount))
        );
        assert_eq!(
            Command::parse("PULSE X 0 10,1"),
            Err(CommandError::MalformedArgument(Arg::Reserved))
        );
        assert_eq!(
            Command::parse("CPULSE 0 -1 10,1"),
            Err(CommandError::MalformedArgument(Arg::LoopCount))
        );
    }

    #[test]
    fn unknown_verb() {
        assert_eq!(Command::parse("FIRE"), Err(CommandError::Unrecognized));
        assert_eq!(Command::parse("IDN"), Err(CommandError::Unrecognized));
        assert_eq!(Command::parse("   "), Err(CommandError::Unrecognized));
    }
}
