//! Serial link abstraction for the companion network module.
//!
//! The module is attached over a single byte stream (usually a UART). This
//! layer only needs three primitives from it: how many bytes are waiting, read
//! one byte, and write a run of bytes. Everything above is built on these
//! traits, so any HAL serial driver can be plugged in with a thin adapter.

#![deny(unsafe_code)]

/// Common error types for link operations
pub mod error;

/// Delimited-ASCII framing over the byte stream
pub mod framing;

/// Protocol clients built on top of the framing layer
pub mod application;

/// Re-exports of common traits
pub mod prelude {
    pub use super::{Read, Stream, Write};
    pub use crate::time::Clock;
}

/// The receiving half of a byte stream.
pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Number of bytes that can be read without blocking
    fn available(&mut self) -> usize;
    /// Read a single byte. Only called when [`available`](Read::available) is non-zero.
    fn read_byte(&mut self) -> Result<u8, Self::Error>;
}

/// The transmitting half of a byte stream.
pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the stream, returning how many bytes were accepted
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// A duplex byte stream, e.g. a UART.
pub trait Stream: Read + Write {}

impl<T: Read + Write> Stream for T {}
