//! Device configuration and constants
//!
//! Central configuration values shared by the sequence compiler, the playback
//! controller, and the firmware. Everything here is fixed at compile time;
//! there is no persisted configuration.

/// Product name reported by `IDN?`
pub const PRODUCT_NAME: &str = "pico-pulse";

/// Protocol major version reported by `IDN?`
pub const VERSION_MAJOR: u8 = 0;

/// Protocol minor version reported by `IDN?`
pub const VERSION_MINOR: u8 = 1;

/// First GPIO driven by the output engine
pub const BASE_GPIO: u8 = 2;

/// Number of consecutive output lines. The PIO program shifts exactly this
/// many bits to the pins, so changing it requires rebuilding the program.
pub const N_GPIO: u8 = 5;

/// Cycles the output engine spends per instruction when the encoded delay is 0
pub const EXTRA_CYCLES: u32 = 4;

/// Capacity of the instruction buffer, in 32-bit words
pub const BUF_LEN: usize = 65536;

/// Maximum command line length in bytes (including the forced terminator slot)
pub const CMD_BUF_LEN: usize = 65536;

/// Loop count sentinel meaning "repeat until stopped"
pub const LOOP_INFINITE: u32 = u32::MAX;

/// Nanoseconds per second, the denominator of every ns → cycles conversion
pub const NS_PER_SEC: u64 = 1_000_000_000;

/// Command UART baud rate
pub const UART_BAUD: u32 = 115_200;

/// Number of user-accessible GPIOs on the RP2350A package
pub const USER_GPIO_COUNT: u8 = 30;

/// Output engine configuration.
///
/// The defaults mirror the constants above; [`EngineConfig::validate`] is the
/// single place that decides whether a lane layout can be encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EngineConfig {
    /// First output GPIO
    pub base_gpio: u8,
    /// Number of output lanes (mask width)
    pub n_gpio: u8,
    /// Fixed per-instruction overhead of the engine, in cycles
    pub extra_cycles: u32,
    /// Instruction buffer capacity, in words
    pub buffer_len: usize,
}

impl EngineConfig {
    /// Configuration built from the compile-time constants
    pub const DEFAULT: Self = Self {
        base_gpio: BASE_GPIO,
        n_gpio: N_GPIO,
        extra_cycles: EXTRA_CYCLES,
        buffer_len: BUF_LEN,
    };

    /// Check that the configuration describes an encodable word layout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_gpio == 0 || self.n_gpio > 31 {
            return Err(ConfigError::InvalidLaneCount);
        }
        let last_gpio = self
            .base_gpio
            .checked_add(self.n_gpio)
            .ok_or(ConfigError::PinsOutOfRange)?;
        if last_gpio > USER_GPIO_COUNT {
            return Err(ConfigError::PinsOutOfRange);
        }
        if self.buffer_len == 0 {
            return Err(ConfigError::EmptyBuffer);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Lane count must leave at least one bit for the cycle field
    InvalidLaneCount,
    /// Output pins run past the last user GPIO
    PinsOutOfRange,
    /// Instruction buffer has no capacity
    EmptyBuffer,
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidLaneCount => write!(f, "Output lane count must be between 1 and 31"),
            Self::PinsOutOfRange => write!(f, "Output pins exceed the available GPIOs"),
            Self::EmptyBuffer => write!(f, "Instruction buffer must not be empty"),
        }
    }
}
