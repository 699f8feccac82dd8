//! Mock implementations for testing
//!
//! This module provides mock implementations of all platform traits
//! for use in unit and integration tests. The engine mock models the
//! stages a word passes through on hardware: staged in the buffer, in flight
//! on the DMA channel, queued in the FIFO, and finally emitted on the pins.

#![cfg(any(test, feature = "std"))]
#![allow(clippy::arithmetic_side_effects)] // counters in test doubles

use std::collections::VecDeque;
use std::vec::Vec;

use crate::*;

/// Mock output engine: records every word that reaches the output lines.
#[derive(Debug, Default)]
pub struct MockEngine {
    fail_claim: bool,
    claimed: bool,
    program_loaded: bool,
    staged: Vec<u32>,
    in_flight: Vec<u32>,
    transfer_active: bool,
    fifo: VecDeque<u32>,
    emitted: Vec<u32>,
    transfers_started: usize,
    aborts: usize,
}

impl MockEngine {
    /// Create new mock engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock engine whose [`OutputEngine::claim`] fails
    pub fn with_claim_failure() -> Self {
        Self {
            fail_claim: true,
            ..Self::default()
        }
    }

    /// Finish the in-flight DMA transfer: every word lands in the FIFO.
    pub fn complete_transfer(&mut self) {
        self.fifo.extend(self.in_flight.drain(..));
        self.transfer_active = false;
    }

    /// Let the state machine consume everything queued in the FIFO.
    pub fn drain_output(&mut self) {
        self.emitted.extend(self.fifo.drain(..));
    }

    /// Complete the transfer and drain the FIFO.
    pub fn finish(&mut self) {
        self.complete_transfer();
        self.drain_output();
    }

    /// Words that reached the output lines, oldest first
    pub fn emitted(&self) -> &[u32] {
        &self.emitted
    }

    /// Word currently driving the output lines
    pub fn last_output(&self) -> Option<u32> {
        self.emitted.last().copied()
    }

    /// Words most recently passed to `configure_transfer`
    pub fn staged(&self) -> &[u32] {
        &self.staged
    }

    /// Number of `start_transfer` calls
    pub fn transfers_started(&self) -> usize {
        self.transfers_started
    }

    /// Number of `abort_transfer` calls that interrupted an active transfer
    pub fn aborts(&self) -> usize {
        self.aborts
    }

    /// Whether the program has been loaded
    pub fn is_program_loaded(&self) -> bool {
        self.program_loaded
    }
}

impl OutputEngine for MockEngine {
    fn claim(&mut self) -> Result<(), EngineError> {
        if self.fail_claim {
            return Err(EngineError::ClaimFailed);
        }
        self.claimed = true;
        Ok(())
    }

    fn load_program(&mut self) -> Result<(), EngineError> {
        if !self.claimed {
            return Err(EngineError::ProgramLoadFailed);
        }
        self.program_loaded = true;
        Ok(())
    }

    fn configure_transfer(&mut self, words: &[u32]) {
        self.staged = words.to_vec();
    }

    fn start_transfer(&mut self) {
        self.in_flight = self.staged.clone();
        self.transfer_active = true;
        self.transfers_started += 1;
    }

    fn abort_transfer(&mut self) {
        if self.transfer_active {
            self.aborts += 1;
        }
        self.in_flight.clear();
        self.transfer_active = false;
    }

    fn clear_output_queue(&mut self) {
        self.fifo.clear();
    }

    fn is_transfer_active(&self) -> bool {
        self.transfer_active
    }

    fn is_output_queue_empty(&self) -> bool {
        self.fifo.is_empty()
    }

    fn push_immediate(&mut self, word: u32) {
        // An empty FIFO is pulled by the state machine straight away
        if self.fifo.is_empty() {
            self.emitted.push(word);
        } else {
            self.fifo.push_back(word);
        }
    }
}

/// Mock clock with a fixed rate
#[derive(Debug, Clone, Copy)]
pub struct MockClock {
    rate_hz: u32,
}

impl MockClock {
    /// Create new mock clock
    pub fn new(rate_hz: u32) -> Self {
        Self { rate_hz }
    }

    /// Change the reported rate
    pub fn set_rate_hz(&mut self, rate_hz: u32) {
        self.rate_hz = rate_hz;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new(150_000_000)
    }
}

impl ClockSource for MockClock {
    fn current_rate_hz(&self) -> u32 {
        self.rate_hz
    }
}

/// Mock serial port: hands out queued bytes one at a time
#[derive(Debug, Default)]
pub struct MockSerial {
    rx: VecDeque<u8>,
}

impl MockSerial {
    /// Create new mock serial port
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue raw bytes for reception
    pub fn feed(&mut self, data: &[u8]) {
        self.rx.extend(data.iter().copied());
    }

    /// Queue a string for reception
    pub fn feed_str(&mut self, data: &str) {
        self.feed(data.as_bytes());
    }

    /// Bytes not yet read
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

impl CharSource for MockSerial {
    fn try_read_char(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }
}

/// Mock status LED
#[derive(Debug, Default)]
pub struct MockIndicator {
    active: bool,
    changes: usize,
}

impl MockIndicator {
    /// Create new mock indicator
    pub fn new() -> Self {
        Self::default()
    }

    /// Current indicator state
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Number of on/off transitions
    pub fn changes(&self) -> usize {
        self.changes
    }
}

impl StatusIndicator for MockIndicator {
    fn set_active(&mut self, active: bool) {
        if self.active != active {
            self.changes += 1;
        }
        self.active = active;
    }
}
