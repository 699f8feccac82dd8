//! Nanosecond ↔ cycle conversion without 128-bit arithmetic.
//!
//! `cycles = ns * clock_hz / 1e9` overflows u64 for holds longer than a few
//! minutes at 150 MHz. Both the clock rate and 1e9 are products of 2 and 5 in
//! practice, so dividing both by their common {2, 5} factor first keeps the
//! multiplication in range:
//!
//! ```text
//! 150_000_000 / 1_000_000_000  →  divisor 50_000_000  →  3 / 20
//! ```
//!
//! The reduction is only a true GCD for {2, 5}-smooth inputs. Any other common
//! factor is left in place, which costs headroom but never correctness.

use platform::config::NS_PER_SEC;

use crate::error::CompileError;

/// Primes tried by [`CycleConverter::reduce`].
const REDUCTION_PRIMES: [u64; 2] = [2, 5];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Reduction {
    a: u64,
    b: u64,
    divisor: u64,
}

/// Converts between nanoseconds and clock cycles.
///
/// Holds a one-entry cache of the last reduction because every entry of a
/// sequence is converted with the same clock rate. Not `Sync`; owned by the
/// single-threaded control loop.
#[derive(Debug, Default)]
pub struct CycleConverter {
    cache: Option<Reduction>,
}

impl CycleConverter {
    /// Create a converter with an empty cache.
    pub const fn new() -> Self {
        Self { cache: None }
    }

    /// Common {2, 5} factor of `a` and `b`.
    ///
    /// Returns 0 when either operand is 0 (there is nothing to reduce by).
    #[allow(clippy::arithmetic_side_effects)] // Safety: primes are non-zero; divisor divides both a and b so it cannot overflow
    pub fn reduce(&mut self, a: u64, b: u64) -> u64 {
        if let Some(hit) = self.cache {
            if hit.a == a && hit.b == b {
                return hit.divisor;
            }
        }

        let divisor = if a == 0 || b == 0 {
            0
        } else {
            let (mut a_rest, mut b_rest, mut divisor) = (a, b, 1u64);
            for prime in REDUCTION_PRIMES {
                while a_rest % prime == 0 && b_rest % prime == 0 {
                    a_rest /= prime;
                    b_rest /= prime;
                    divisor *= prime;
                }
            }
            divisor
        };

        self.cache = Some(Reduction { a, b, divisor });
        divisor
    }

    /// Convert a hold time in nanoseconds to clock cycles (rounded down).
    ///
    /// # Errors
    ///
    /// [`CompileError::DurationTooLong`] when the reduced product does not
    /// fit in 64 bits.
    #[allow(clippy::arithmetic_side_effects)] // Safety: divisor is a non-zero common factor of both operands
    pub fn ns_to_cycles(&mut self, ns: u64, clock_hz: u32) -> Result<u64, CompileError> {
        let clock = u64::from(clock_hz);
        let divisor = self.reduce(clock, NS_PER_SEC);
        if divisor == 0 {
            return Ok(0);
        }
        let numerator = clock / divisor;
        let denominator = NS_PER_SEC / divisor;
        let scaled = ns
            .checked_mul(numerator)
            .ok_or(CompileError::DurationTooLong)?;
        Ok(scaled / denominator)
    }

    /// Convert a cycle count to nanoseconds (rounded down, saturating).
    ///
    /// A zero clock rate yields 0.
    #[allow(clippy::arithmetic_side_effects)] // Safety: divisor is a non-zero common factor of both operands
    pub fn cycles_to_ns(&mut self, cycles: u64, clock_hz: u32) -> u64 {
        let clock = u64::from(clock_hz);
        let divisor = self.reduce(clock, NS_PER_SEC);
        if divisor == 0 {
            return 0;
        }
        let numerator = NS_PER_SEC / divisor;
        let denominator = clock / divisor;
        cycles.saturating_mul(numerator) / denominator
    }
}
