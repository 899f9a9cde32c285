//! # mqtt-link
//!
//! A `no_std` driver for companion network modules. The microcontroller keeps
//! no IP stack of its own: a module such as an ESP8266 handles Wi-Fi and MQTT,
//! and this crate talks to it over a single half-duplex serial link.
//!
//! ## Layers
//!
//! - **[`network::framing`]**: delimited-ASCII frames (`tag|field|field\0`) over
//!   the raw byte stream, reassembled one frame at a time into a fixed buffer
//! - **[`network::application::mqtt`]**: the polling client that provisions the
//!   module, publishes, subscribes and keeps the link alive with heartbeats
//! - **[`time`]**: the millisecond clock the client uses for deadlines
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! mqtt-link = "0.1.0"
//! ```
//!
//! Implement [`network::Read`] and [`network::Write`] for the UART and
//! [`time::Clock`] for the system timer, then drive the client from the main
//! loop:
//!
//! ```rust,no_run
//! use mqtt_link::network::application::mqtt::{Client, EventHandler};
//! # use mqtt_link::network::{Read, Write};
//! # use mqtt_link::time::Clock;
//! # struct Uart;
//! # impl Read for Uart {
//! #     type Error = ();
//! #     fn available(&mut self) -> usize { 0 }
//! #     fn read_byte(&mut self) -> Result<u8, ()> { Err(()) }
//! # }
//! # impl Write for Uart {
//! #     type Error = ();
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, ()> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), ()> { Ok(()) }
//! # }
//! # struct Millis;
//! # impl Clock for Millis { fn now_ms(&mut self) -> u32 { 0 } }
//!
//! struct Lamp {
//!     on: bool,
//! }
//!
//! impl EventHandler for Lamp {
//!     fn on_message(&mut self, _topic: &str, payload: &str) {
//!         self.on = payload == "on";
//!     }
//! }
//!
//! let mut client: Client<_, _, _> = Client::new(Uart, Millis, Lamp { on: false });
//! client.setup_wifi("home", "secret").unwrap();
//! client.connect_server("192.168.1.10", "1883", "lamp").unwrap();
//! client.subscribe("home/lamp").unwrap();
//!
//! loop {
//!     client.tick().unwrap();
//! }
//! ```
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support ([`time::StdClock`])
//! - `defmt`: Enable defmt logging of link activity and `defmt::Format` for errors

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

// Must come first so the macros are visible to the other modules.
mod fmt;

/// Serial link abstraction, framing and protocol clients.
///
/// This module contains the byte stream traits the link is built on, the
/// frame codec and the module client.
pub mod network;

/// Millisecond clock abstraction and rollover-safe deadlines.
pub mod time;
