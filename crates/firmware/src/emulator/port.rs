//! stdin/stdout port.
//!
//! A reader task forwards stdin bytes into a bounded channel; the control
//! loop drains it with `try_recv`, one byte per step.

use std::fmt;
use std::io::Write as _;

use platform::CharSource;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Capacity of the stdin byte channel.
pub const STDIN_CHANNEL_DEPTH: usize = 4096;

/// Control-loop side of the emulator serial link.
pub struct ChannelPort<W> {
    rx: mpsc::Receiver<u8>,
    out: W,
}

impl<W: std::io::Write> ChannelPort<W> {
    /// Read from `rx`, write responses to `out`.
    pub fn new(rx: mpsc::Receiver<u8>, out: W) -> Self {
        Self { rx, out }
    }

    /// `true` once the sender is gone and every byte was consumed.
    pub fn is_closed(&self) -> bool {
        self.rx.is_closed() && self.rx.is_empty()
    }

    /// The response sink.
    pub fn output(&self) -> &W {
        &self.out
    }
}

impl<W> CharSource for ChannelPort<W> {
    fn try_read_char(&mut self) -> Option<u8> {
        self.rx.try_recv().ok()
    }
}

impl<W: std::io::Write> fmt::Write for ChannelPort<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.out.write_all(s.as_bytes()).map_err(|_| fmt::Error)?;
        if s.ends_with('\n') {
            self.out.flush().map_err(|_| fmt::Error)?;
        }
        Ok(())
    }
}

/// Spawn the stdin reader. Ends on EOF or when the port is dropped.
pub fn spawn_stdin_reader(tx: mpsc::Sender<u8>) -> JoinHandle<std::io::Result<()>> {
    tokio::spawn(async move {
        let mut stdin = tokio::io::stdin();
        let mut chunk = [0u8; 256];
        loop {
            let n = stdin.read(&mut chunk).await?;
            if n == 0 {
                tracing::info!("stdin closed");
                return Ok(());
            }
            for &byte in chunk.get(..n).unwrap_or_default() {
                if tx.send(byte).await.is_err() {
                    return Ok(());
                }
            }
        }
    })
}
