//! # Application Layer
//!
//! Protocol clients that run on top of the [`framing`](crate::network::framing)
//! layer. The networking itself happens on the companion module; the clients
//! here only issue commands and react to the events it reports.
//!
//! ## Available Protocols
//!
//! - **[`mqtt`]**: Wi-Fi provisioning and MQTT publish/subscribe through the
//!   module's command set
//!
//! ## Design Principles
//!
//! - **Stream Agnostic**: Work with any type implementing [`Stream`](crate::network::Stream)
//! - **No-std Compatible**: No heap allocation, fixed-size buffers only
//! - **Cooperative**: A single `tick` drives everything; only setup calls block,
//!   and those are bounded by a deadline

/// MQTT bridge client.
///
/// Provisions the module (Wi-Fi, broker, will, subscriptions) and exchanges
/// publish/subscribe traffic with it.
pub mod mqtt;
