//! PIO + DMA output engine.
//!
//! ```text
//! SequenceBuffer ──DMA (DREQ PIO0_TX0)──> TX FIFO (8 deep, joined) ──> SM0 ──> GPIO2..GPIO6
//! ```
//!
//! The DMA channel is driven through the PAC rather than `embassy_rp::dma`:
//! a transfer has to outlive the call that started it and be polled and
//! aborted from the control loop, which the future-based API does not allow.

use core::sync::atomic::{compiler_fence, Ordering};

use embassy_rp::dma::{AnyChannel, Channel};
use embassy_rp::pac;
use embassy_rp::pac::dma::vals::{DataSize, TreqSel};
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio::{Common, Config, Direction, FifoJoin, Pin, ShiftConfig, ShiftDirection, StateMachine};
use embassy_rp::{into_ref, Peripheral, PeripheralRef};
use fixed::traits::ToFixed;
use platform::config::N_GPIO;
use platform::{EngineError, OutputEngine};
use playback::InstructionFormat;

use crate::pio_program::output_program;

/// State machine index inside PIO0.
const SM: usize = 0;

/// DREQ number of the PIO0 SM0 TX FIFO.
const PIO0_TX0_DREQ: u8 = 0;

/// Output lanes, lowest GPIO first.
pub type OutputPins<'d> = [Pin<'d, PIO0>; N_GPIO as usize];

/// PIO0 state machine 0 fed by one DMA channel.
pub struct PioEngine<'d> {
    common: Common<'d, PIO0>,
    sm: StateMachine<'d, PIO0, SM>,
    pins: OutputPins<'d>,
    dma: PeripheralRef<'d, AnyChannel>,
    format: InstructionFormat,
    origin: Option<u8>,
    claimed: bool,
    source: u32,
    len: u32,
}

impl<'d> PioEngine<'d> {
    /// Take ownership of the PIO block, its output pins and a DMA channel.
    pub fn new(
        common: Common<'d, PIO0>,
        sm: StateMachine<'d, PIO0, SM>,
        pins: OutputPins<'d>,
        dma: impl Peripheral<P = impl Channel> + 'd,
        format: InstructionFormat,
    ) -> Self {
        into_ref!(dma);
        Self {
            common,
            sm,
            pins,
            dma: dma.map_into(),
            format,
            origin: None,
            claimed: false,
            source: 0,
            len: 0,
        }
    }

    fn channel(&self) -> pac::dma::Channel {
        pac::DMA.ch(usize::from(self.dma.number()))
    }
}

impl OutputEngine for PioEngine<'_> {
    fn claim(&mut self) -> Result<(), EngineError> {
        if self.claimed || self.channel().ctrl_trig().read().busy() {
            return Err(EngineError::ClaimFailed);
        }
        self.claimed = true;
        Ok(())
    }

    fn load_program(&mut self) -> Result<(), EngineError> {
        if !self.claimed {
            return Err(EngineError::ProgramLoadFailed);
        }
        let program = output_program(&self.format);
        let loaded = self
            .common
            .try_load_program(&program)
            .map_err(|_| EngineError::ProgramLoadFailed)?;
        self.origin = Some(loaded.origin);

        let pins = self.pins.each_ref();
        let mut cfg = Config::default();
        cfg.use_program(&loaded, &[]);
        cfg.set_out_pins(&pins);
        cfg.shift_out = ShiftConfig {
            threshold: 32,
            direction: ShiftDirection::Right,
            auto_fill: false,
        };
        cfg.fifo_join = FifoJoin::TxOnly;
        cfg.clock_divider = 1u8.to_fixed();

        self.sm.set_config(&cfg);
        self.sm.set_pin_dirs(Direction::Out, &pins);
        self.sm.set_enable(true);
        defmt::info!("output program loaded at {=u8}", loaded.origin);
        Ok(())
    }

    fn configure_transfer(&mut self, words: &[u32]) {
        self.source = words.as_ptr() as u32;
        self.len = words.len() as u32;
    }

    fn start_transfer(&mut self) {
        let ch = self.channel();
        let channel = self.dma.number();
        ch.read_addr().write_value(self.source);
        ch.write_addr().write_value(pac::PIO0.txf(SM).as_ptr() as u32);
        ch.trans_count().write(|w| {
            w.set_mode(0.into());
            w.set_count(self.len);
        });
        compiler_fence(Ordering::SeqCst);
        ch.ctrl_trig().write(|w| {
            w.set_treq_sel(TreqSel::from(PIO0_TX0_DREQ));
            w.set_data_size(DataSize::SIZE_WORD);
            w.set_incr_read(true);
            w.set_incr_write(false);
            w.set_chain_to(channel);
            w.set_en(true);
        });
        compiler_fence(Ordering::SeqCst);
    }

    #[allow(clippy::arithmetic_side_effects)] // Safety: DMA channel numbers are < 16
    fn abort_transfer(&mut self) {
        let mask = 1u16 << self.dma.number();
        pac::DMA.chan_abort().write(|w| w.set_chan_abort(mask));
        while self.channel().ctrl_trig().read().busy() {}
        compiler_fence(Ordering::SeqCst);
    }

    fn clear_output_queue(&mut self) {
        self.sm.set_enable(false);
        self.sm.clear_fifos();
        self.sm.restart();
        if let Some(origin) = self.origin {
            // SAFETY: origin is where the output program was loaded; jumping
            // there restarts it from `pull block`.
            unsafe { self.sm.exec_jmp(origin) };
        }
        self.sm.set_enable(true);
    }

    fn is_transfer_active(&self) -> bool {
        self.channel().ctrl_trig().read().busy()
    }

    #[allow(clippy::arithmetic_side_effects)] // Safety: SM < 4
    fn is_output_queue_empty(&self) -> bool {
        pac::PIO0.fstat().read().txempty() & (1 << SM) != 0
    }

    fn push_immediate(&mut self, word: u32) {
        self.sm.tx().push(word);
    }
}
