//! Link timing and provisioning profiles.
//!
//! Both types can be built in code or deserialized from JSON with
//! `serde-json-core`, e.g. from a configuration blob in flash.

use crate::network::error::Error;
use heapless::Vec;
use serde::{Deserialize, Serialize};

/// Maximum number of topics a [`Profile`] can subscribe to.
pub const MAX_SUBSCRIPTIONS: usize = 8;

/// Timing parameters of the link.
///
/// Missing JSON keys fall back to the defaults.
///
/// ```rust
/// use mqtt_link::network::application::mqtt::LinkConfig;
///
/// let config = LinkConfig::from_json(br#"{"response_timeout_ms":500}"#).unwrap();
/// assert_eq!(config.response_timeout_ms, 500);
/// assert_eq!(config.heartbeat_disconnected_ms, 1000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// How long a provisioning call waits for the acknowledgement.
    pub response_timeout_ms: u32,
    /// Heartbeat period while the module reports a broker connection.
    pub heartbeat_connected_ms: u32,
    /// Heartbeat period otherwise. Longer, to keep traffic down while the
    /// module is presumed offline.
    pub heartbeat_disconnected_ms: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            response_timeout_ms: 200,
            heartbeat_connected_ms: 200,
            heartbeat_disconnected_ms: 1000,
        }
    }
}

impl LinkConfig {
    /// Parses a configuration from JSON.
    pub fn from_json(json: &[u8]) -> Result<Self, Error> {
        serde_json_core::from_slice(json)
            .map(|(config, _)| config)
            .map_err(|_| Error::InvalidConfig)
    }

    /// Heartbeat period for the given connection state.
    pub fn heartbeat_ms(&self, connected: bool) -> u32 {
        if connected {
            self.heartbeat_connected_ms
        } else {
            self.heartbeat_disconnected_ms
        }
    }
}

/// Will message registered with the broker on connect.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Will<'a> {
    /// Topic the broker publishes the will on.
    pub topic: &'a str,
    /// The will payload.
    pub message: &'a str,
}

/// Everything needed to bring the module online.
///
/// Strings borrow from the JSON source and must not contain escape
/// sequences.
///
/// ```rust
/// use mqtt_link::network::application::mqtt::Profile;
///
/// let json = br#"{
///     "ssid": "home",
///     "password": "secret",
///     "server": "192.168.1.10",
///     "port": "1883",
///     "client_id": "sensor1",
///     "subscriptions": ["sensor2/humidity"]
/// }"#;
/// let profile = Profile::from_json(json).unwrap();
/// assert_eq!(profile.server, "192.168.1.10");
/// assert!(profile.will.is_none());
/// assert_eq!(profile.subscriptions.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Profile<'a> {
    /// Wi-Fi network name.
    pub ssid: &'a str,
    /// Wi-Fi password.
    pub password: &'a str,
    /// Broker host name or address.
    pub server: &'a str,
    /// Broker port, as text.
    pub port: &'a str,
    /// MQTT client identifier.
    pub client_id: &'a str,
    /// Optional will message.
    #[serde(default, borrow)]
    pub will: Option<Will<'a>>,
    /// Topics to subscribe to once connected.
    #[serde(default, borrow)]
    pub subscriptions: Vec<&'a str, MAX_SUBSCRIPTIONS>,
}

impl<'a> Profile<'a> {
    /// Parses a profile from JSON, borrowing its strings.
    pub fn from_json(json: &'a [u8]) -> Result<Self, Error> {
        serde_json_core::from_slice(json)
            .map(|(profile, _)| profile)
            .map_err(|_| Error::InvalidConfig)
    }
}
