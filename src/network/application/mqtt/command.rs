//! Command and event tags of the module protocol.

/// Requests the client sends to the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Read the module identification string.
    Identity,
    /// Join a Wi-Fi network: ssid, password.
    SetupWifi,
    /// Read the module's IP address.
    LocalIp,
    /// Connect to a broker: server, port, client id.
    ConnectServer,
    /// Set the will message: topic, message.
    WillMessage,
    /// Subscribe to a topic.
    Subscribe,
    /// Unsubscribe from a topic.
    Unsubscribe,
    /// Publish: topic, message, retained flag.
    Publish,
    /// Keepalive probe, also used to poll for pending events.
    Heartbeat,
}

impl Command {
    /// Wire tag of the command.
    pub const fn tag(self) -> u8 {
        match self {
            Command::Identity => b'i',
            Command::SetupWifi => b'w',
            Command::LocalIp => b'a',
            Command::ConnectServer => b'm',
            Command::WillMessage => b't',
            Command::Subscribe => b's',
            Command::Unsubscribe => b'u',
            Command::Publish => b'p',
            Command::Heartbeat => b'r',
        }
    }
}

/// Frames the module sends to the client.
///
/// The module reuses some request tags for events (`m`, `s`). Since the link
/// is half-duplex the direction is always known, so the two tag sets are kept
/// apart as separate types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Acknowledgement of the last request, possibly carrying a reply field.
    Ack,
    /// A message arrived on a subscribed topic: topic, payload.
    Message,
    /// The module connected to the broker.
    Connected,
    /// The broker connection changed state: status code.
    State,
}

impl Event {
    /// Decodes an incoming tag. Unknown tags yield `None`.
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'r' => Some(Event::Ack),
            b'm' => Some(Event::Message),
            b'c' => Some(Event::Connected),
            b's' => Some(Event::State),
            _ => None,
        }
    }

    /// Wire tag of the event.
    pub const fn tag(self) -> u8 {
        match self {
            Event::Ack => b'r',
            Event::Message => b'm',
            Event::Connected => b'c',
            Event::State => b's',
        }
    }
}

/// Status codes carried by a state event.
///
/// Negative values and the broker refusal codes 1-5 follow the usual MQTT
/// client conventions; 6-9 are module errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// The broker did not answer in time.
    ConnectionTimeout,
    /// The connection dropped.
    ConnectionLost,
    /// The connection attempt failed.
    ConnectFailed,
    /// Cleanly disconnected.
    Disconnected,
    /// Connected.
    Connected,
    /// The broker does not support the protocol version.
    BadProtocol,
    /// The broker rejected the client id.
    BadClientId,
    /// The broker is unavailable.
    Unavailable,
    /// The broker rejected the credentials.
    BadCredentials,
    /// The client is not authorized.
    Unauthorized,
    /// The module did not understand a command.
    InvalidCommand,
    /// The module has no IP address.
    NoLocalIp,
    /// The module could not publish.
    PublishFailed,
    /// The module could not subscribe.
    SubscribeFailed,
    /// A code outside the known range.
    Unknown(i16),
}

impl ConnectionState {
    /// Decodes a status code.
    pub const fn from_code(code: i16) -> Self {
        match code {
            -4 => ConnectionState::ConnectionTimeout,
            -3 => ConnectionState::ConnectionLost,
            -2 => ConnectionState::ConnectFailed,
            -1 => ConnectionState::Disconnected,
            0 => ConnectionState::Connected,
            1 => ConnectionState::BadProtocol,
            2 => ConnectionState::BadClientId,
            3 => ConnectionState::Unavailable,
            4 => ConnectionState::BadCredentials,
            5 => ConnectionState::Unauthorized,
            6 => ConnectionState::InvalidCommand,
            7 => ConnectionState::NoLocalIp,
            8 => ConnectionState::PublishFailed,
            9 => ConnectionState::SubscribeFailed,
            other => ConnectionState::Unknown(other),
        }
    }

    /// The wire status code.
    pub const fn code(self) -> i16 {
        match self {
            ConnectionState::ConnectionTimeout => -4,
            ConnectionState::ConnectionLost => -3,
            ConnectionState::ConnectFailed => -2,
            ConnectionState::Disconnected => -1,
            ConnectionState::Connected => 0,
            ConnectionState::BadProtocol => 1,
            ConnectionState::BadClientId => 2,
            ConnectionState::Unavailable => 3,
            ConnectionState::BadCredentials => 4,
            ConnectionState::Unauthorized => 5,
            ConnectionState::InvalidCommand => 6,
            ConnectionState::NoLocalIp => 7,
            ConnectionState::PublishFailed => 8,
            ConnectionState::SubscribeFailed => 9,
            ConnectionState::Unknown(code) => code,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConnectionState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ConnectionState::Unknown(code) => defmt::write!(f, "Unknown({})", code),
            other => defmt::write!(f, "{}", other.code()),
        }
    }
}
