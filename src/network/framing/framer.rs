//! Incremental frame reader and immediate frame writer.

use super::{DELIMITER, FRAME_CAPACITY, Frame, TERMINATOR, Value, parse_decimal, text};
use crate::network::Stream;
use crate::network::error::Error;
use heapless::Vec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RxState {
    /// Accumulating bytes of the next frame.
    Receiving,
    /// A complete frame is buffered and not yet consumed.
    Ready,
    /// The cursor ran past the last field. The bytes stay readable until the
    /// next poll starts a new frame.
    Drained,
    /// The buffer filled up before a terminator arrived.
    Overflow,
    /// Dropping the rest of an oversized frame, up to and including its
    /// terminator.
    Discarding,
}

/// Counters describing the traffic seen by a [`Framer`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    /// Complete frames received.
    pub received: u32,
    /// Frames written to the stream.
    pub sent: u32,
    /// Incoming frames dropped because they exceeded the buffer.
    pub overflows: u32,
}

/// Frame encoder and decoder bound to one byte stream.
///
/// Outgoing frames are not buffered: [`begin_outgoing`](Self::begin_outgoing),
/// [`append_field`](Self::append_field) and
/// [`finish_outgoing`](Self::finish_outgoing) write to the stream as they go.
///
/// Incoming bytes are collected by [`poll_incoming`](Self::poll_incoming) into a
/// buffer of `N` bytes, terminator included. Only one frame is held at a time;
/// polling stops at the terminator and resumes once the frame is
/// [`reset`](Self::reset).
///
/// # Examples
///
/// ```rust
/// use mqtt_link::network::framing::Framer;
/// # use mqtt_link::network::{Read, Write};
/// # struct Loopback(heapless::Deque<u8, 64>);
/// # impl Read for Loopback {
/// #     type Error = ();
/// #     fn available(&mut self) -> usize { self.0.len() }
/// #     fn read_byte(&mut self) -> Result<u8, ()> { self.0.pop_front().ok_or(()) }
/// # }
/// # impl Write for Loopback {
/// #     type Error = ();
/// #     fn write(&mut self, buf: &[u8]) -> Result<usize, ()> {
/// #         for &b in buf { self.0.push_back(b).map_err(|_| ())?; }
/// #         Ok(buf.len())
/// #     }
/// #     fn flush(&mut self) -> Result<(), ()> { Ok(()) }
/// # }
///
/// let mut framer: Framer<_> = Framer::new(Loopback(heapless::Deque::new()));
/// framer.begin_outgoing(b'p').unwrap();
/// framer.append_field("sensors/temp").unwrap();
/// framer.append_field(1234u16).unwrap();
/// framer.finish_outgoing().unwrap();
///
/// framer.poll_incoming().unwrap();
/// assert!(framer.frame_ready());
/// assert_eq!(framer.read_tag(), Some(b'p'));
/// assert_eq!(framer.read_str(), Some("sensors/temp"));
/// assert_eq!(framer.read_u16(), 1234);
/// ```
#[derive(Debug)]
pub struct Framer<S, const N: usize = FRAME_CAPACITY> {
    stream: S,
    buffer: Vec<u8, N>,
    cursor: usize,
    state: RxState,
    on_frame: Option<fn()>,
    stats: FrameStats,
}

impl<S: Stream, const N: usize> Framer<S, N> {
    /// Creates a framer on top of `stream`.
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            buffer: Vec::new(),
            cursor: 0,
            state: RxState::Receiving,
            on_frame: None,
            stats: FrameStats::default(),
        }
    }

    /// Registers a hook called whenever a frame has been completed.
    pub fn attach(&mut self, hook: fn()) {
        self.on_frame = Some(hook);
    }

    /// Starts an outgoing frame by writing its tag.
    pub fn begin_outgoing(&mut self, tag: u8) -> Result<(), Error> {
        self.write_all(&[tag])
    }

    /// Writes the delimiter followed by the textual form of `value`.
    ///
    /// Strings are written verbatim. A string containing `|` or `0x00` corrupts
    /// the frame; check [`Value::is_valid`] first.
    pub fn append_field<'v>(&mut self, value: impl Into<Value<'v>>) -> Result<(), Error> {
        self.write_all(&[DELIMITER])?;
        value.into().with_text(|bytes| self.write_all(bytes))
    }

    /// Terminates the outgoing frame and resets the receive side.
    ///
    /// The peer answers only after a complete frame, so anything left in the
    /// receive buffer at this point belongs to no frame.
    pub fn finish_outgoing(&mut self) -> Result<(), Error> {
        self.write_all(&[TERMINATOR])?;
        self.stream.flush().map_err(|_| Error::WriteError)?;
        self.stats.sent = self.stats.sent.wrapping_add(1);
        self.reset();
        Ok(())
    }

    /// Moves every available byte into the receive buffer without blocking.
    ///
    /// Stops at the terminator, leaving later bytes in the stream. If the
    /// buffer fills up first the frame is dropped and the framer stalls until
    /// [`reset`](Self::reset) or [`flush`](Self::flush); no error is returned.
    /// The remainder of a dropped frame is skipped once it arrives, so it is
    /// never mistaken for a frame of its own.
    pub fn poll_incoming(&mut self) -> Result<(), Error> {
        match self.state {
            RxState::Ready | RxState::Overflow => return Ok(()),
            RxState::Drained => self.reset(),
            RxState::Receiving | RxState::Discarding => {}
        }

        while self.stream.available() > 0 {
            let byte = self.stream.read_byte().map_err(|_| Error::ReadError)?;
            if self.state == RxState::Discarding {
                if byte == TERMINATOR {
                    trace!("tail of oversized frame skipped");
                    self.state = RxState::Receiving;
                }
                continue;
            }
            if byte == TERMINATOR {
                self.state = RxState::Ready;
                self.cursor = 0;
                self.stats.received = self.stats.received.wrapping_add(1);
                trace!("frame complete, {} bytes", self.buffer.len());
                if let Some(hook) = self.on_frame {
                    hook();
                }
                break;
            }
            // One slot is reserved for the terminator.
            if self.buffer.len() + 1 >= N || self.buffer.push(byte).is_err() {
                self.state = RxState::Overflow;
                self.stats.overflows = self.stats.overflows.wrapping_add(1);
                warn!("incoming frame exceeds {} bytes, dropped", N);
                break;
            }
        }
        Ok(())
    }

    /// Returns `true` while a complete, unconsumed frame is buffered.
    pub fn frame_ready(&self) -> bool {
        self.state == RxState::Ready
    }

    /// Returns `true` if the current frame overflowed the buffer.
    pub fn overflowed(&self) -> bool {
        self.state == RxState::Overflow
    }

    /// A snapshot of the ready frame.
    pub fn frame(&self) -> Option<Frame<'_>> {
        self.frame_ready().then(|| Frame::new(&self.buffer))
    }

    /// Returns the next field of the ready frame, starting with the tag.
    ///
    /// Once the last field has been returned the frame no longer counts as
    /// ready and further calls return `None`.
    pub fn next_field(&mut self) -> Option<&str> {
        if self.state != RxState::Ready {
            return None;
        }
        let start = self.cursor;
        let end = match self.buffer[start..].iter().position(|&b| b == DELIMITER) {
            Some(i) => {
                self.cursor = start + i + 1;
                start + i
            }
            None => {
                self.cursor = self.buffer.len();
                self.state = RxState::Drained;
                self.buffer.len()
            }
        };
        Some(text(&self.buffer[start..end]))
    }

    /// Number of fields the cursor has not yet returned.
    pub fn fields_remaining(&self) -> usize {
        if self.state != RxState::Ready {
            return 0;
        }
        1 + self.buffer[self.cursor..]
            .iter()
            .filter(|&&b| b == DELIMITER)
            .count()
    }

    /// Reads the next field and returns its first character.
    pub fn read_tag(&mut self) -> Option<u8> {
        self.next_field()
            .and_then(|field| field.as_bytes().first().copied())
    }

    /// Reads the next field as text.
    pub fn read_str(&mut self) -> Option<&str> {
        self.next_field()
    }

    /// Reads the next field as `u8`; non-numeric or missing fields yield `0`.
    pub fn read_u8(&mut self) -> u8 {
        self.read_decimal() as u8
    }

    /// Reads the next field as `u16`; non-numeric or missing fields yield `0`.
    pub fn read_u16(&mut self) -> u16 {
        self.read_decimal() as u16
    }

    /// Reads the next field as `u32`; non-numeric or missing fields yield `0`.
    pub fn read_u32(&mut self) -> u32 {
        self.read_decimal() as u32
    }

    /// Reads the next field as `i8`; non-numeric or missing fields yield `0`.
    pub fn read_i8(&mut self) -> i8 {
        self.read_decimal() as i8
    }

    /// Reads the next field as `i16`; non-numeric or missing fields yield `0`.
    pub fn read_i16(&mut self) -> i16 {
        self.read_decimal() as i16
    }

    /// Reads the next field as `i32`; non-numeric or missing fields yield `0`.
    pub fn read_i32(&mut self) -> i32 {
        self.read_decimal() as i32
    }

    fn read_decimal(&mut self) -> i64 {
        self.next_field().map(parse_decimal).unwrap_or(0)
    }

    /// Forgets the buffered frame. Bytes still in the stream are kept.
    ///
    /// After an overflow the framer keeps skipping input up to the
    /// terminator of the dropped frame.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.state = match self.state {
            RxState::Overflow | RxState::Discarding => RxState::Discarding,
            _ => RxState::Receiving,
        };
    }

    /// Discards every byte currently available in the stream, then resets.
    ///
    /// If that leaves the stream in the middle of a frame (the last byte
    /// dropped was not a terminator, or an incomplete frame was buffered),
    /// input is skipped up to the next terminator.
    pub fn flush(&mut self) -> Result<(), Error> {
        let mut at_boundary = match self.state {
            RxState::Receiving => self.buffer.is_empty(),
            RxState::Ready | RxState::Drained => true,
            RxState::Overflow | RxState::Discarding => false,
        };
        while self.stream.available() > 0 {
            at_boundary = self.stream.read_byte().map_err(|_| Error::ReadError)? == TERMINATOR;
        }
        self.buffer.clear();
        self.cursor = 0;
        self.state = if at_boundary {
            RxState::Receiving
        } else {
            RxState::Discarding
        };
        Ok(())
    }

    /// Traffic counters.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Receive buffer size, terminator included.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Shared access to the underlying stream.
    pub fn stream(&self) -> &S {
        &self.stream
    }

    /// Exclusive access to the underlying stream.
    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Returns the underlying stream.
    pub fn into_inner(self) -> S {
        self.stream
    }

    fn write_all(&mut self, mut bytes: &[u8]) -> Result<(), Error> {
        while !bytes.is_empty() {
            match self.stream.write(bytes) {
                Ok(0) | Err(_) => return Err(Error::WriteError),
                Ok(n) => bytes = &bytes[n.min(bytes.len())..],
            }
        }
        Ok(())
    }
}
