//! Byte-stream serial port as command source and response sink.

use core::fmt;

use embedded_io::{Read, ReadReady, Write};
use platform::CharSource;

/// Adapts an `embedded-io` stream (the UART on hardware) to the control loop.
///
/// Reads never block: a byte is only taken when the driver reports one ready.
/// Writes block until the whole response is queued in the driver.
pub struct SerialPort<U> {
    io: U,
}

impl<U> SerialPort<U> {
    /// Wrap an I/O stream.
    pub fn new(io: U) -> Self {
        Self { io }
    }

    /// The wrapped stream.
    pub fn get_mut(&mut self) -> &mut U {
        &mut self.io
    }
}

impl<U: Read + ReadReady> CharSource for SerialPort<U> {
    fn try_read_char(&mut self) -> Option<u8> {
        if !self.io.read_ready().ok()? {
            return None;
        }
        let mut byte = [0u8; 1];
        match self.io.read(&mut byte) {
            Ok(1) => {
                let [b] = byte;
                Some(b)
            }
            _ => None,
        }
    }
}

impl<U: Write> fmt::Write for SerialPort<U> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.io.write_all(s.as_bytes()).map_err(|_| fmt::Error)
    }
}
