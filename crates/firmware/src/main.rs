//! pico-pulse firmware - Main Entry Point
//!
//! Hardware-only entry point for the RP2350 (Pico 2).
//!
//! | Function        | Pin          |
//! |-----------------|--------------|
//! | UART0 TX / RX   | GPIO0 / GPIO1 |
//! | Output lanes    | GPIO2..GPIO6 |
//! | Status LED      | GPIO25       |

#![no_std]
#![no_main]

use command::{Instrument, LineAssembler};
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{PIO0, UART0};
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUart, Config as UartConfig};
use platform::config::{
    BUF_LEN, CMD_BUF_LEN, PRODUCT_NAME, UART_BAUD, VERSION_MAJOR, VERSION_MINOR,
};
use platform::{ClockSource, EngineConfig};
use playback::{InstructionFormat, PlaybackController, SequenceBuffer, SequenceCompiler};
use static_cell::ConstStaticCell;

use firmware::hardware::{board_id, PioEngine, SystemClock};
use firmware::{ControlLoop, PinIndicator, SerialPort};

// Panic handler + RTT transport
use {defmt_rtt as _, panic_probe as _};

/// Boot ROM image definition; must sit in the first 4 KB of flash.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

const UART_BUF_LEN: usize = 256;

// Instruction words are read by DMA straight out of this buffer.
static SEQUENCE: ConstStaticCell<[u32; BUF_LEN]> = ConstStaticCell::new([0; BUF_LEN]);
static LINE: ConstStaticCell<[u8; CMD_BUF_LEN]> = ConstStaticCell::new([0; CMD_BUF_LEN]);
static UART_TX: ConstStaticCell<[u8; UART_BUF_LEN]> = ConstStaticCell::new([0; UART_BUF_LEN]);
static UART_RX: ConstStaticCell<[u8; UART_BUF_LEN]> = ConstStaticCell::new([0; UART_BUF_LEN]);

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    defmt::info!(
        "{=str} v{=u8}.{=u8} starting",
        PRODUCT_NAME,
        VERSION_MAJOR,
        VERSION_MINOR
    );

    let mut uart_config = UartConfig::default();
    uart_config.baudrate = UART_BAUD;
    let uart = BufferedUart::new(
        p.UART0,
        Irqs,
        p.PIN_0,
        p.PIN_1,
        UART_TX.take(),
        UART_RX.take(),
        uart_config,
    );
    let mut port = SerialPort::new(uart);

    let Pio {
        mut common, sm0, ..
    } = Pio::new(p.PIO0, Irqs);
    let pins = [
        common.make_pio_pin(p.PIN_2),
        common.make_pio_pin(p.PIN_3),
        common.make_pio_pin(p.PIN_4),
        common.make_pio_pin(p.PIN_5),
        common.make_pio_pin(p.PIN_6),
    ];
    let config = EngineConfig::DEFAULT;
    #[allow(clippy::panic)]
    let format = match InstructionFormat::from_config(&config) {
        Ok(format) if pins.first().map(|pin| pin.pin()) == Some(config.base_gpio) => format,
        Ok(_) => defmt::panic!("output lanes must start at GPIO{=u8}", config.base_gpio),
        Err(e) => defmt::panic!("invalid engine config: {}", e),
    };
    let engine = PioEngine::new(common, sm0, pins, p.DMA_CH0, format);

    // No degraded mode: without the engine nothing can be played.
    #[allow(clippy::panic)]
    let controller = match PlaybackController::new(engine, SequenceBuffer::new(SEQUENCE.take())) {
        Ok(controller) => controller,
        Err(e) => defmt::panic!("output engine unavailable: {}", e),
    };

    let clock = SystemClock;
    let id = board_id();
    defmt::info!(
        "clk_sys {=u32} Hz, {=usize} word buffer, board {=u64:016X}",
        clock.current_rate_hz(),
        BUF_LEN,
        id
    );

    let instrument = Instrument::new(controller, SequenceCompiler::new(format), clock, id);
    let led = PinIndicator::new(Output::new(p.PIN_25, Level::Low));
    let mut control = ControlLoop::new(instrument, LineAssembler::new(LINE.take()), led);

    loop {
        match control.step(&mut port) {
            Ok(step) => match step.outcome {
                Some(Ok(reply)) => defmt::debug!("{}", reply),
                Some(Err(e)) => defmt::warn!("rejected: {}", e),
                None => {}
            },
            Err(_) => defmt::warn!("response write failed"),
        }
        embassy_futures::yield_now().await;
    }
}
