//! Time-simulated output engine.
//!
//! Models the board closely enough for host testing of the protocol:
//!
//! - words are pulled one after another, each when the previous hold ends
//! - a new transfer queues behind the words still waiting in the FIFO
//! - the DMA transfer counts as active while more words remain than the
//!   joined TX FIFO can hold
//! - the output queue is empty once the last word has been pulled, even
//!   though its hold may still be running
//!
//! Time comes from `tokio::time::Instant`, so tests can pause and advance it.

use playback::InstructionFormat;
use tokio::time::Instant;

use platform::{EngineError, OutputEngine};

/// Depth of the joined TX FIFO.
pub const FIFO_DEPTH: usize = 8;

#[derive(Debug, Clone, Copy)]
struct Slot {
    /// Pull time in ns from the timeline origin
    pull: u64,
    hold: u64,
    mask: u32,
}

impl Slot {
    fn end(&self) -> u64 {
        self.pull.saturating_add(self.hold)
    }
}

/// Words scheduled on the state machine, oldest first.
#[derive(Debug)]
struct Timeline {
    origin: Instant,
    slots: Vec<Slot>,
}

impl Timeline {
    fn elapsed(&self, now: Instant) -> u64 {
        u64::try_from(now.saturating_duration_since(self.origin).as_nanos()).unwrap_or(u64::MAX)
    }

    fn pulled(&self, now: Instant) -> usize {
        let elapsed = self.elapsed(now);
        self.slots.partition_point(|slot| slot.pull <= elapsed)
    }

    /// When the state machine pulls the next word, if one were queued.
    fn next_pull(&self) -> u64 {
        self.slots.last().map_or(0, Slot::end)
    }
}

/// Output engine that plays words against wall-clock time.
#[derive(Debug)]
pub struct SimulatedEngine {
    format: InstructionFormat,
    clock_hz: u32,
    claimed: bool,
    loaded: bool,
    staged: Vec<u32>,
    timeline: Option<Timeline>,
    /// Mask held when no word is playing
    idle_mask: u32,
    transfers: usize,
}

impl SimulatedEngine {
    /// Engine running at `clock_hz` with the given word layout.
    pub fn new(format: InstructionFormat, clock_hz: u32) -> Self {
        Self {
            format,
            clock_hz,
            claimed: false,
            loaded: false,
            staged: Vec::new(),
            timeline: None,
            idle_mask: 0,
            transfers: 0,
        }
    }

    /// Mask currently driven on the output lanes.
    pub fn output(&self) -> u32 {
        let Some(timeline) = &self.timeline else {
            return self.idle_mask;
        };
        timeline
            .pulled(Instant::now())
            .checked_sub(1)
            .and_then(|last| timeline.slots.get(last))
            .map_or(self.idle_mask, |slot| slot.mask)
    }

    /// Number of transfers started so far.
    pub fn transfers_started(&self) -> usize {
        self.transfers
    }

    #[allow(clippy::arithmetic_side_effects)] // Safety: saturating ops on u64 nanoseconds
    fn hold_ns(&self, cycles: u64) -> u64 {
        if self.clock_hz == 0 {
            return 0;
        }
        cycles.saturating_mul(1_000_000_000) / u64::from(self.clock_hz)
    }

    fn remaining(&self) -> usize {
        self.timeline.as_ref().map_or(0, |timeline| {
            timeline
                .slots
                .len()
                .saturating_sub(timeline.pulled(Instant::now()))
        })
    }

    /// Drop every queued word, keeping the driven value.
    fn settle(&mut self) {
        self.idle_mask = self.output();
        self.timeline = None;
    }

    /// Timeline new words are appended to, with pulled words trimmed off.
    ///
    /// Once the last hold has run out the state machine sits in `pull`, so
    /// the next word starts from now on a fresh timeline.
    fn queue_tail(&mut self, now: Instant) -> Timeline {
        let Some(mut timeline) = self.timeline.take() else {
            return Timeline {
                origin: now,
                slots: Vec::new(),
            };
        };
        if timeline.next_pull() <= timeline.elapsed(now) {
            self.idle_mask = timeline.slots.last().map_or(self.idle_mask, |slot| slot.mask);
            return Timeline {
                origin: now,
                slots: Vec::new(),
            };
        }
        // Keep the word being driven so `output` still sees it.
        let driven = timeline.pulled(now).saturating_sub(1);
        timeline.slots = timeline.slots.split_off(driven);
        timeline
    }
}

impl OutputEngine for SimulatedEngine {
    fn claim(&mut self) -> Result<(), EngineError> {
        if self.claimed {
            return Err(EngineError::ClaimFailed);
        }
        self.claimed = true;
        Ok(())
    }

    fn load_program(&mut self) -> Result<(), EngineError> {
        if !self.claimed {
            return Err(EngineError::ProgramLoadFailed);
        }
        self.loaded = true;
        tracing::info!(
            lanes = self.format.n_gpio(),
            overhead = self.format.extra_cycles(),
            "output program loaded"
        );
        Ok(())
    }

    fn configure_transfer(&mut self, words: &[u32]) {
        self.staged = words.to_vec();
    }

    fn start_transfer(&mut self) {
        let now = Instant::now();
        let mut timeline = self.queue_tail(now);
        let queued = timeline.slots.len();
        let mut at = timeline.next_pull();
        timeline.slots.reserve(self.staged.len());
        for &word in &self.staged {
            let (cycles, mask) = self.format.decode(word);
            let hold = self.hold_ns(cycles);
            timeline.slots.push(Slot { pull: at, hold, mask });
            at = at.saturating_add(hold);
        }
        tracing::debug!(
            words = self.staged.len(),
            queued,
            duration_ns = at,
            "transfer started"
        );
        self.transfers = self.transfers.saturating_add(1);
        self.timeline = Some(timeline);
    }

    fn abort_transfer(&mut self) {
        let now = Instant::now();
        if let Some(timeline) = self.timeline.as_mut() {
            let pulled = timeline.pulled(now);
            timeline.slots.truncate(pulled.saturating_add(FIFO_DEPTH));
            tracing::debug!(pulled, "transfer aborted");
        }
    }

    fn clear_output_queue(&mut self) {
        self.settle();
    }

    fn is_transfer_active(&self) -> bool {
        self.remaining() > FIFO_DEPTH
    }

    fn is_output_queue_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn push_immediate(&mut self, word: u32) {
        self.settle();
        let (_, mask) = self.format.decode(word);
        self.idle_mask = mask;
        tracing::debug!(mask, "immediate word");
    }
}
