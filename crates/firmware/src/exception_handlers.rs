//! Cortex-M exception handlers (hardware builds only).
//!
//! - **HardFault**: bus faults, illegal instructions, and stack overflow
//!   (the stack runs into the bottom of RAM).

#![allow(clippy::doc_markdown)] // Exception handler docs use hardware terminology (HardFault) as plain text

/// HardFault exception handler.
///
/// Logs the exception frame address and stacked PC over RTT, then halts.
/// PIO and DMA run without the CPU, so the pass in progress plays out; no
/// further passes are issued.
///
/// # Safety
///
/// Must never return; the `-> !` return type enforces this.
#[cortex_m_rt::exception]
#[allow(unsafe_code, clippy::panic)]
unsafe fn HardFault(ef: &cortex_m_rt::ExceptionFrame) -> ! {
    defmt::panic!(
        "HardFault! Stacked exception frame at 0x{:08X}, PC 0x{:08X}",
        ef as *const _ as u32,
        ef.pc()
    );
}
