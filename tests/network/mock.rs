//! Mock serial port, clock and event recorder shared by the link tests.

use mqtt_link::network::application::mqtt::EventHandler;
use mqtt_link::network::error::Error;
use mqtt_link::network::{Read, Write};
use mqtt_link::time::Clock;
use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

/// In-memory serial port.
///
/// Bytes written by the code under test are kept in `tx`. Whenever a frame
/// terminator is written, the next scripted reply (or the automatic reply,
/// if one is set) is queued for reading, which mimics a module answering a
/// complete request.
#[derive(Debug, Default)]
pub struct MockStream {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
    replies: VecDeque<Vec<u8>>,
    auto_reply: Option<Vec<u8>>,
    loopback: bool,
}

impl MockStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// A port whose written bytes come straight back on the receive side.
    pub fn loopback() -> Self {
        Self {
            loopback: true,
            ..Self::default()
        }
    }

    /// Makes `bytes` readable right away.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    /// Queues `bytes` as the answer to the next complete outgoing frame.
    pub fn reply(&mut self, bytes: &[u8]) {
        self.replies.push_back(bytes.to_vec());
    }

    /// Answers every outgoing frame without a scripted reply with `bytes`.
    pub fn auto_reply(&mut self, bytes: &[u8]) {
        self.auto_reply = Some(bytes.to_vec());
    }

    pub fn written(&self) -> &[u8] {
        &self.tx
    }

    /// The outgoing frames so far, terminators stripped.
    pub fn frames(&self) -> Vec<String> {
        self.tx
            .split(|&b| b == 0)
            .filter(|frame| !frame.is_empty())
            .map(|frame| String::from_utf8_lossy(frame).into_owned())
            .collect()
    }

    /// Number of complete frames written.
    pub fn frames_written(&self) -> usize {
        self.tx.iter().filter(|&&b| b == 0).count()
    }

    pub fn unread(&self) -> usize {
        self.rx.len()
    }
}

impl Read for MockStream {
    type Error = Error;

    fn available(&mut self) -> usize {
        self.rx.len()
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        self.rx.pop_front().ok_or(Error::ReadError)
    }
}

impl Write for MockStream {
    type Error = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.tx.extend_from_slice(buf);
        if self.loopback {
            self.rx.extend(buf.iter().copied());
        }
        for _ in buf.iter().filter(|&&b| b == 0) {
            if let Some(reply) = self.replies.pop_front().or_else(|| self.auto_reply.clone()) {
                self.rx.extend(reply);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// A clock the test controls through a shared handle.
///
/// Every reading advances the time by `step` milliseconds, so busy-wait loops
/// terminate without a real timer.
#[derive(Debug, Clone)]
pub struct FakeClock {
    now: Rc<Cell<u32>>,
    step: u32,
}

impl FakeClock {
    pub fn new(start: u32, step: u32) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
            step,
        }
    }

    pub fn now(&self) -> u32 {
        self.now.get()
    }

    pub fn set(&self, ms: u32) {
        self.now.set(ms);
    }
}

impl Clock for FakeClock {
    fn now_ms(&mut self) -> u32 {
        let now = self.now.get();
        self.now.set(now.wrapping_add(self.step));
        now
    }
}

/// Remembers every event it receives.
#[derive(Debug, Default)]
pub struct Recorder {
    pub messages: Vec<(String, String)>,
    pub connects: usize,
    pub states: Vec<i16>,
}

impl EventHandler for Recorder {
    fn on_message(&mut self, topic: &str, payload: &str) {
        self.messages.push((topic.to_string(), payload.to_string()));
    }

    fn on_connect(&mut self) {
        self.connects += 1;
    }

    fn on_state(&mut self, code: i16) {
        self.states.push(code);
    }
}

#[test]
fn test_reply_follows_terminator() {
    let mut stream = MockStream::new();
    stream.reply(b"r\0");

    stream.write(b"w|a").unwrap();
    assert_eq!(stream.available(), 0);
    stream.write(&[0]).unwrap();
    assert_eq!(stream.available(), 2);
    assert_eq!(stream.read_byte(), Ok(b'r'));
    assert_eq!(stream.frames(), vec!["w|a".to_string()]);
}

#[test]
fn test_read_empty() {
    let mut stream = MockStream::new();
    assert_eq!(stream.available(), 0);
    assert_eq!(stream.read_byte(), Err(Error::ReadError));
}

#[test]
fn test_fake_clock_steps() {
    let mut clock = FakeClock::new(u32::MAX, 1);
    let handle = clock.clone();
    assert_eq!(clock.now_ms(), u32::MAX);
    assert_eq!(clock.now_ms(), 0);
    assert_eq!(handle.now(), 1);
}
