//! Polling client for the companion module.
//!
//! The client is a small state machine around a [`Framer`]:
//!
//! ```text
//!                 connect event
//!   Disconnected ───────────────▶ Connected
//!        ▲                            │
//!        └────────────────────────────┘
//!                 state event
//! ```
//!
//! Orthogonal to the connection state is the *pending* flag: set whenever a
//! request has been written, cleared by the next frame the module sends,
//! whatever it is. While it is set, [`Client::publish`] and
//! [`Client::unsubscribe`] are refused and no heartbeat is sent.
//!
//! Heartbeats (`r`) go out whenever the link is idle for 200 ms while connected
//! and 1000 ms while disconnected. They double as the poll through which the
//! module delivers queued events.

use super::command::{Command, ConnectionState, Event};
use super::config::{LinkConfig, Profile};
use super::events::EventHandler;
use crate::network::Stream;
use crate::network::error::Error;
use crate::network::framing::{self, FRAME_CAPACITY, Framer, Value};
use crate::time::{Clock, Deadline};
use heapless::String;

/// Counters describing the client's activity.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClientStats {
    /// Heartbeats sent.
    pub heartbeats: u32,
    /// Setup requests that ran into the response deadline.
    pub timeouts: u32,
    /// Requests refused because another one was pending.
    pub refused: u32,
    /// Incoming frames dropped: unknown tags, missing fields, overflows.
    pub discarded: u32,
}

/// Client for a companion module on a half-duplex serial link.
///
/// # Type Parameters
///
/// * `S` - The serial stream implementing [`Stream`]
/// * `C` - The millisecond [`Clock`]
/// * `H` - The [`EventHandler`] receiving module events
/// * `N` - Frame buffer size, terminator included
#[derive(Debug)]
pub struct Client<S, C, H = (), const N: usize = FRAME_CAPACITY> {
    framer: Framer<S, N>,
    clock: C,
    handler: H,
    config: LinkConfig,
    pending: bool,
    connected: bool,
    last_state: Option<i16>,
    heartbeat: Deadline,
    stats: ClientStats,
}

impl<S, C, H, const N: usize> Client<S, C, H, N>
where
    S: Stream,
    C: Clock,
    H: EventHandler,
{
    /// Creates a client with the default [`LinkConfig`].
    pub fn new(stream: S, clock: C, handler: H) -> Self {
        Self::with_config(stream, clock, handler, LinkConfig::default())
    }

    /// Creates a client with explicit timing parameters.
    ///
    /// The first heartbeat goes out on the first [`tick`](Self::tick).
    pub fn with_config(stream: S, mut clock: C, handler: H, config: LinkConfig) -> Self {
        let now = clock.now_ms();
        Self {
            framer: Framer::new(stream),
            clock,
            handler,
            config,
            pending: false,
            connected: false,
            last_state: None,
            heartbeat: Deadline::elapsed_at(now),
            stats: ClientStats::default(),
        }
    }

    /// Reads the module identification string.
    pub fn read_identity(&mut self) -> Result<String<N>, Error> {
        self.query(Command::Identity)
    }

    /// Joins the Wi-Fi network `ssid`.
    pub fn setup_wifi(&mut self, ssid: &str, password: &str) -> Result<(), Error> {
        self.transact(Command::SetupWifi, &[ssid.into(), password.into()])
    }

    /// Reads the module's IP address.
    pub fn read_local_ip(&mut self) -> Result<String<N>, Error> {
        self.query(Command::LocalIp)
    }

    /// Connects the module to an MQTT broker.
    pub fn connect_server(&mut self, server: &str, port: &str, client_id: &str) -> Result<(), Error> {
        self.transact(
            Command::ConnectServer,
            &[server.into(), port.into(), client_id.into()],
        )
    }

    /// Sets the will message. Must precede [`connect_server`](Self::connect_server).
    pub fn will_message(&mut self, topic: &str, message: &str) -> Result<(), Error> {
        self.transact(Command::WillMessage, &[topic.into(), message.into()])
    }

    /// Subscribes to `topic`. Messages arrive through
    /// [`EventHandler::on_message`].
    pub fn subscribe(&mut self, topic: &str) -> Result<(), Error> {
        self.transact(Command::Subscribe, &[topic.into()])
    }

    /// Runs the whole setup sequence of `profile`, stopping at the first
    /// failure: Wi-Fi, will message, broker, subscriptions.
    pub fn provision(&mut self, profile: &Profile<'_>) -> Result<(), Error> {
        self.setup_wifi(profile.ssid, profile.password)?;
        if let Some(will) = &profile.will {
            self.will_message(will.topic, will.message)?;
        }
        self.connect_server(profile.server, profile.port, profile.client_id)?;
        for topic in &profile.subscriptions {
            self.subscribe(topic)?;
        }
        info!("module provisioned");
        Ok(())
    }

    /// Publishes `message` on `topic`.
    ///
    /// Returns as soon as the frame is written; `Ok` means accepted for
    /// transmission, not delivered. Fails with [`Error::Busy`] without writing
    /// anything while a request is pending.
    pub fn publish(&mut self, topic: &str, message: &str, retained: bool) -> Result<(), Error> {
        self.ensure_idle()?;
        self.send(
            Command::Publish,
            &[topic.into(), message.into(), retained.into()],
        )
    }

    /// Unsubscribes from `topic`. Same contract as [`publish`](Self::publish).
    pub fn unsubscribe(&mut self, topic: &str) -> Result<(), Error> {
        self.ensure_idle()?;
        self.send(Command::Unsubscribe, &[topic.into()])
    }

    /// Advances the link by one step. Call it as often as possible.
    ///
    /// Reads whatever the module has sent. A complete frame clears the pending
    /// flag and is dispatched to the handler; otherwise, if the link is idle
    /// and the heartbeat period has passed, a heartbeat is sent.
    pub fn tick(&mut self) -> Result<(), Error> {
        self.framer.poll_incoming()?;
        if self.framer.frame_ready() {
            self.pending = false;
            self.dispatch();
        } else if self.framer.overflowed() {
            self.recover()?;
        } else if !self.pending {
            let now = self.clock.now_ms();
            if self.heartbeat.expired(now) {
                self.heartbeat = Deadline::after(now, self.config.heartbeat_ms(self.connected));
                self.send(Command::Heartbeat, &[])?;
                self.stats.heartbeats = self.stats.heartbeats.wrapping_add(1);
            }
        }
        Ok(())
    }

    /// Runs [`tick`](Self::tick) and reports whether a request is pending.
    ///
    /// While this returns `true`, [`publish`](Self::publish) and
    /// [`unsubscribe`](Self::unsubscribe) will be refused.
    pub fn busy(&mut self) -> Result<bool, Error> {
        self.tick()?;
        Ok(self.pending)
    }

    /// Whether the module last reported a broker connection.
    pub fn connected(&self) -> bool {
        self.connected
    }

    /// The status code of the last state event, if any.
    pub fn last_state(&self) -> Option<ConnectionState> {
        self.last_state.map(ConnectionState::from_code)
    }

    /// Activity counters.
    pub fn stats(&self) -> ClientStats {
        self.stats
    }

    /// The timing parameters in use.
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// The framer, for its counters and state.
    pub fn framer(&self) -> &Framer<S, N> {
        &self.framer
    }

    /// Shared access to the event handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Exclusive access to the event handler.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Shared access to the serial stream.
    pub fn stream(&self) -> &S {
        self.framer.stream()
    }

    /// Exclusive access to the serial stream.
    pub fn stream_mut(&mut self) -> &mut S {
        self.framer.stream_mut()
    }

    /// Exclusive access to the clock.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Takes the client apart.
    pub fn into_parts(self) -> (S, C, H) {
        (self.framer.into_inner(), self.clock, self.handler)
    }

    fn ensure_idle(&mut self) -> Result<(), Error> {
        if self.pending {
            self.stats.refused = self.stats.refused.wrapping_add(1);
            debug!("request refused, link busy");
            return Err(Error::Busy);
        }
        Ok(())
    }

    /// Writes one command frame and marks the request as pending.
    ///
    /// Fields are checked before the first byte goes out, so a rejected
    /// command leaves nothing on the wire.
    fn send(&mut self, command: Command, fields: &[Value<'_>]) -> Result<(), Error> {
        if !fields.iter().all(Value::is_valid) {
            return Err(Error::InvalidField);
        }
        if framing::encoded_len(fields) > N {
            return Err(Error::FrameTooLarge);
        }
        self.framer.begin_outgoing(command.tag())?;
        for field in fields {
            self.framer.append_field(*field)?;
        }
        self.framer.finish_outgoing()?;
        self.pending = true;
        trace!("sent '{}' with {} fields", command.tag() as char, fields.len());
        Ok(())
    }

    /// Sends a setup command and waits for its acknowledgement.
    fn transact(&mut self, command: Command, fields: &[Value<'_>]) -> Result<(), Error> {
        self.send(command, fields)?;
        self.await_ack()?;
        self.framer.reset();
        Ok(())
    }

    /// Sends a field-less command and returns the first field of the
    /// acknowledgement.
    fn query(&mut self, command: Command) -> Result<String<N>, Error> {
        self.send(command, &[])?;
        self.await_ack()?;
        let reply = self
            .framer
            .read_str()
            .ok_or(Error::Malformed)
            .and_then(|field| String::try_from(field).map_err(|_| Error::Malformed));
        self.framer.reset();
        reply
    }

    /// Spins on the link until the module acknowledges or the response
    /// deadline passes.
    ///
    /// The first complete frame decides the outcome. On an acknowledgement its
    /// tag has been consumed and any reply fields are left for the caller.
    /// Any other frame is dispatched as an event and the request fails with
    /// [`Error::Rejected`].
    fn await_ack(&mut self) -> Result<(), Error> {
        let deadline = Deadline::after(self.clock.now_ms(), self.config.response_timeout_ms);
        loop {
            self.framer.poll_incoming()?;
            if self.framer.frame_ready() {
                let event = self
                    .framer
                    .frame()
                    .and_then(|frame| frame.tag())
                    .and_then(Event::from_tag);
                self.pending = false;
                if event == Some(Event::Ack) {
                    self.framer.read_tag();
                    return Ok(());
                }
                debug!("request answered by a non-acknowledgement frame");
                self.dispatch();
                return Err(Error::Rejected);
            } else if self.framer.overflowed() {
                self.recover()?;
            }

            if deadline.expired(self.clock.now_ms()) {
                // The request is abandoned; let heartbeats probe the module again.
                self.pending = false;
                self.stats.timeouts = self.stats.timeouts.wrapping_add(1);
                warn!("no acknowledgement within {} ms", self.config.response_timeout_ms);
                return Err(Error::Timeout);
            }
        }
    }

    /// Hands the ready frame to the event handler, then releases it.
    fn dispatch(&mut self) {
        let Some(frame) = self.framer.frame() else {
            return;
        };
        let fields = frame.field_count();
        match frame.tag().and_then(Event::from_tag) {
            Some(Event::Message) if fields >= 2 => {
                let mut fields = frame.fields();
                let topic = fields.next().unwrap_or_default();
                let payload = fields.next().unwrap_or_default();
                trace!("message on {}", topic);
                self.handler.on_message(topic, payload);
            }
            Some(Event::Connected) => {
                info!("module connected to broker");
                self.handler.on_connect();
                self.connected = true;
            }
            Some(Event::State) if fields >= 1 => {
                self.framer.read_tag();
                let code = self.framer.read_i16();
                info!("connection state {}", code);
                self.last_state = Some(code);
                self.handler.on_state(code);
                self.connected = false;
            }
            Some(Event::Ack) => {}
            _ => {
                self.stats.discarded = self.stats.discarded.wrapping_add(1);
                debug!("discarded frame");
            }
        }
        self.framer.reset();
    }

    /// Drops an oversized frame so that the link keeps running.
    fn recover(&mut self) -> Result<(), Error> {
        self.stats.discarded = self.stats.discarded.wrapping_add(1);
        warn!("oversized frame flushed");
        self.pending = false;
        self.framer.flush()
    }
}
