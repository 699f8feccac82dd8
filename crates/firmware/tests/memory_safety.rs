//! Memory placement tests, run with `cargo test -p firmware --test memory_safety`
// Architecture test file: expect/unwrap are intentional.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::arithmetic_side_effects
)]
//!
//! Source-level checks on how `main.rs` and `memory.x` place buffers and the
//! boot block. The hardware build is the only place these can go wrong, and
//! host CI never links it.

const MAIN_RS: &str = include_str!("../src/main.rs");
const MEMORY_X: &str = include_str!("../../../memory.x");

/// The DMA source buffer must be a `ConstStaticCell`, never `static mut`.
#[test]
fn sequence_buffer_is_const_static_cell() {
    assert!(
        MAIN_RS.contains("static SEQUENCE: ConstStaticCell<[u32; BUF_LEN]>"),
        "SEQUENCE must be a ConstStaticCell<[u32; BUF_LEN]>: DMA reads it for the \
         whole lifetime of the program, so it needs 'static storage with a unique borrow"
    );
    assert!(
        !MAIN_RS.contains("static mut"),
        "static mut is UB as soon as a reference is taken; use static_cell"
    );
}

/// Large buffers must not be built on the executor stack.
#[test]
fn no_large_buffers_on_the_stack() {
    for decl in ["let mut words", "let words = [", "let mut line = ["] {
        assert!(
            !MAIN_RS.contains(decl),
            "main.rs must take buffers from statics, found `{decl}`"
        );
    }
    for name in ["SEQUENCE", "LINE", "UART_TX", "UART_RX"] {
        assert!(
            MAIN_RS.contains(&format!("{name}.take()")),
            "{name} must be handed out with ConstStaticCell::take"
        );
    }
}

/// The boot ROM only finds IMAGE_DEF inside the first 4 KB of flash.
#[test]
fn image_def_lands_in_start_block() {
    let section = MAIN_RS
        .find(r#"#[link_section = ".start_block"]"#)
        .expect("IMAGE_DEF must carry #[link_section = \".start_block\"]");
    let decl = MAIN_RS
        .find("static IMAGE_DEF")
        .expect("IMAGE_DEF declaration missing");
    assert!(
        decl > section && decl - section < 100,
        "the .start_block attribute must sit directly on IMAGE_DEF"
    );
    assert!(
        MEMORY_X.contains("KEEP(*(.start_block))"),
        "memory.x must keep .start_block"
    );
    assert!(
        MEMORY_X.contains("INSERT AFTER .vector_table"),
        ".start_block must follow the vector table"
    );
}

/// 256 KB of instruction words plus line and UART buffers must fit in SRAM.
#[test]
fn buffers_fit_in_ram() {
    use platform::config::{BUF_LEN, CMD_BUF_LEN};

    let ram = MEMORY_X
        .lines()
        .find(|l| l.trim_start().starts_with("RAM "))
        .expect("memory.x must declare RAM");
    let len_kb: usize = ram
        .split("LENGTH =")
        .nth(1)
        .and_then(|s| s.trim().strip_suffix('K'))
        .and_then(|s| s.parse().ok())
        .expect("RAM LENGTH must be given in K");

    let needed = BUF_LEN * 4 + CMD_BUF_LEN;
    assert!(
        needed < len_kb * 1024,
        "static buffers need {needed} bytes, RAM has {} bytes",
        len_kb * 1024
    );
}

#[test]
fn startup_validates_engine_config() {
    assert!(
        MAIN_RS.contains("InstructionFormat::from_config(&config)"),
        "main.rs must derive the word layout from a validated EngineConfig"
    );
    assert!(
        !MAIN_RS.contains("InstructionFormat::DEFAULT"),
        "main.rs must not bypass EngineConfig::validate"
    );
    assert!(
        MAIN_RS.contains("config.base_gpio"),
        "main.rs must check the output pins against BASE_GPIO"
    );
}
