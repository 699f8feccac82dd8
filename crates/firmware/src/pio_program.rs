//! State machine program that plays instruction words.
//!
//! ```text
//! .wrap_target
//!     pull block              ; wait for the next word
//!     out pins, N_GPIO        ; drive the mask
//!     out x, 32 - N_GPIO      ; load the cycle field
//! delay:
//!     jmp x-- delay           ; spin field + 1 times
//! .wrap
//! ```
//!
//! Between two `out pins` the machine spends `field + 4` cycles, which is
//! where the four cycles of per-word overhead come from. When the FIFO runs
//! dry `pull block` stalls and the lanes keep the last mask.

use playback::InstructionFormat;

/// Instruction memory of one PIO block.
pub const PROGRAM_CAPACITY: usize = 32;

/// Overhead of the program below, in cycles per word.
pub const PROGRAM_OVERHEAD_CYCLES: u32 = 4;

/// Assemble the output program for `format`.
#[allow(clippy::arithmetic_side_effects)] // Safety: n_gpio is validated to 1..=31
pub fn output_program(format: &InstructionFormat) -> pio::Program<PROGRAM_CAPACITY> {
    let mut a = pio::Assembler::<PROGRAM_CAPACITY>::new();
    let mut wrap_target = a.label();
    let mut wrap_source = a.label();
    let mut delay = a.label();

    a.bind(&mut wrap_target);
    a.pull(false, true);
    a.out(pio::OutDestination::PINS, format.n_gpio());
    a.out(pio::OutDestination::X, 32 - format.n_gpio());
    a.bind(&mut delay);
    a.jmp(pio::JmpCondition::XDecNonZero, &mut delay);
    a.bind(&mut wrap_source);

    a.assemble_with_wrap(wrap_source, wrap_target)
}
