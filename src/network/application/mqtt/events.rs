//! Event handlers invoked from [`Client::tick`](super::Client::tick).

/// Receives events reported by the module.
///
/// Every method has an empty default, so implement only what you need. The
/// methods run inline inside `tick` and must return quickly. Arguments borrow
/// the receive buffer and are only valid for the duration of the call.
pub trait EventHandler {
    /// A message arrived on a subscribed topic.
    fn on_message(&mut self, _topic: &str, _payload: &str) {}

    /// The module connected to the broker.
    fn on_connect(&mut self) {}

    /// The broker connection changed state; see
    /// [`ConnectionState`](super::ConnectionState) for the codes.
    fn on_state(&mut self, _code: i16) {}
}

/// Ignores every event.
impl EventHandler for () {}

impl<H: EventHandler + ?Sized> EventHandler for &mut H {
    fn on_message(&mut self, topic: &str, payload: &str) {
        (**self).on_message(topic, payload)
    }

    fn on_connect(&mut self) {
        (**self).on_connect()
    }

    fn on_state(&mut self, code: i16) {
        (**self).on_state(code)
    }
}

/// Function signature for message handlers.
pub type MessageFn = fn(topic: &str, payload: &str);

/// Function signature for connect handlers.
pub type ConnectFn = fn();

/// Function signature for state handlers.
pub type StateFn = fn(code: i16);

/// A table of optional plain-function handlers.
///
/// # Examples
///
/// ```rust
/// use mqtt_link::network::application::mqtt::Callbacks;
///
/// let callbacks = Callbacks {
///     on_message: Some(|topic, payload| {
///         let _ = (topic, payload);
///     }),
///     ..Callbacks::default()
/// };
/// assert!(callbacks.on_connect.is_none());
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct Callbacks {
    /// Called for every incoming message.
    pub on_message: Option<MessageFn>,
    /// Called when the module reports a broker connection.
    pub on_connect: Option<ConnectFn>,
    /// Called when the module reports a state change.
    pub on_state: Option<StateFn>,
}

impl EventHandler for Callbacks {
    fn on_message(&mut self, topic: &str, payload: &str) {
        if let Some(handler) = self.on_message {
            handler(topic, payload);
        }
    }

    fn on_connect(&mut self) {
        if let Some(handler) = self.on_connect {
            handler();
        }
    }

    fn on_state(&mut self, code: i16) {
        if let Some(handler) = self.on_state {
            handler(code);
        }
    }
}
