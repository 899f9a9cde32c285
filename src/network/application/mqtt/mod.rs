//! MQTT over a companion network module.
//!
//! The microcontroller does not speak IP or MQTT itself. A companion module
//! (typically an ESP8266 running matching firmware) owns the Wi-Fi and broker
//! connections and is driven through short text commands on a serial link.
//!
//! # Protocol Overview
//!
//! | Tag | Direction | Fields | Meaning |
//! |-----|-----------|--------|---------|
//! | `i` | request | | read module identity |
//! | `w` | request | ssid, password | join Wi-Fi |
//! | `a` | request | | read local IP |
//! | `m` | request | server, port, client id | connect to broker |
//! | `t` | request | topic, message | set will message |
//! | `s` | request | topic | subscribe |
//! | `u` | request | topic | unsubscribe |
//! | `p` | request | topic, message, retained | publish |
//! | `r` | both | | heartbeat / acknowledgement |
//! | `m` | event | topic, payload | incoming message |
//! | `c` | event | | connected to broker |
//! | `s` | event | status code | connection state changed |
//!
//! Only one request may be outstanding at a time. Setup requests block until
//! the module acknowledges or a deadline passes; publish and unsubscribe are
//! refused with [`Error::Busy`](crate::network::error::Error::Busy) while a
//! request is pending.
//!
//! # Usage
//!
//! ```rust,no_run
//! use mqtt_link::network::application::mqtt::{Callbacks, Client};
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
//! let callbacks = Callbacks {
//!     on_message: Some(|topic, payload| { let _ = (topic, payload); }),
//!     ..Callbacks::default()
//! };
//! let mut client: Client<_, _, _> = Client::new(Uart, Millis, callbacks);
//!
//! client.setup_wifi("home", "secret").unwrap();
//! client.connect_server("192.168.1.10", "1883", "sensor1").unwrap();
//! client.subscribe("sensor2/humidity").unwrap();
//!
//! loop {
//!     if !client.busy().unwrap() {
//!         let _ = client.publish("sensor1/temperature", "21.5", false);
//!     }
//! }
//! ```

/// The polling client.
pub mod client;

/// Command and event tags, status codes.
pub mod command;

/// Timing configuration and provisioning profiles.
pub mod config;

/// Event handler trait and function-pointer table.
pub mod events;

pub use client::{Client, ClientStats};
pub use command::{Command, ConnectionState, Event};
pub use config::{LinkConfig, MAX_SUBSCRIPTIONS, Profile, Will};
pub use events::{Callbacks, ConnectFn, EventHandler, MessageFn, StateFn};
