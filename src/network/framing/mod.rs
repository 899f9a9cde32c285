//! Delimited-ASCII framing for the serial link.
//!
//! Every frame is a single tag character, optionally followed by fields, each
//! introduced by a delimiter, and closed by one terminator byte:
//!
//! ```text
//! w|myssid|mypass\0
//! ^ ^      ^     ^
//! | |      |     terminator (0x00)
//! | |      second field
//! | first field
//! tag
//! ```
//!
//! The link is half-duplex by convention, so only the terminator marks frame
//! boundaries. There is no length prefix and no escaping: string fields must
//! not contain `|` or `0x00`. Integers travel as decimal text, booleans as
//! `0`/`1`.
//!
//! [`Framer`] writes outgoing frames straight to the stream and reassembles one
//! incoming frame at a time into a fixed buffer. A completed frame can be read
//! either through the framer's cursor ([`Framer::next_field`] and the typed
//! `read_*` helpers) or through a borrowed [`Frame`] snapshot.

use core::fmt::Write as _;
use heapless::String;

mod framer;

pub use framer::{FrameStats, Framer};

/// Byte that closes every frame.
pub const TERMINATOR: u8 = 0x00;

/// Byte that introduces every field.
pub const DELIMITER: u8 = b'|';

/// Default size of the receive buffer, terminator included.
///
/// The terminator is not stored, so an incoming frame may carry up to
/// `FRAME_CAPACITY - 1` bytes of tag and fields. A peer that stores the
/// terminator in a buffer of the same size sends at most 98, which always fits.
pub const FRAME_CAPACITY: usize = 100;

/// A single field value for an outgoing frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value<'a> {
    /// Text sent verbatim.
    Str(&'a str),
    /// Unsigned integer sent in decimal.
    Unsigned(u32),
    /// Signed integer sent in decimal.
    Signed(i32),
    /// Boolean sent as `0` or `1`.
    Bool(bool),
}

impl<'a> Value<'a> {
    /// Returns `false` for strings that would break the framing.
    pub fn is_valid(&self) -> bool {
        match self {
            Value::Str(s) => !s.bytes().any(|b| b == DELIMITER || b == TERMINATOR),
            _ => true,
        }
    }

    /// Length of the textual form, without the leading delimiter.
    pub fn encoded_len(&self) -> usize {
        self.with_text(|text| text.len())
    }

    /// Calls `f` with the textual form of the value.
    pub(crate) fn with_text<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        // i32::MIN is the longest number: 11 characters.
        let mut digits: String<11> = String::new();
        let text = match *self {
            Value::Str(s) => s.as_bytes(),
            Value::Unsigned(n) => {
                let _ = write!(digits, "{}", n);
                digits.as_bytes()
            }
            Value::Signed(n) => {
                let _ = write!(digits, "{}", n);
                digits.as_bytes()
            }
            Value::Bool(true) => b"1",
            Value::Bool(false) => b"0",
        };
        f(text)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(value: &'a str) -> Self {
        Value::Str(value)
    }
}

impl From<u8> for Value<'_> {
    fn from(value: u8) -> Self {
        Value::Unsigned(value.into())
    }
}

impl From<u16> for Value<'_> {
    fn from(value: u16) -> Self {
        Value::Unsigned(value.into())
    }
}

impl From<u32> for Value<'_> {
    fn from(value: u32) -> Self {
        Value::Unsigned(value)
    }
}

impl From<i8> for Value<'_> {
    fn from(value: i8) -> Self {
        Value::Signed(value.into())
    }
}

impl From<i16> for Value<'_> {
    fn from(value: i16) -> Self {
        Value::Signed(value.into())
    }
}

impl From<i32> for Value<'_> {
    fn from(value: i32) -> Self {
        Value::Signed(value)
    }
}

impl From<bool> for Value<'_> {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

/// Number of bytes a frame carrying `fields` occupies on the wire, tag and
/// terminator included.
pub fn encoded_len(fields: &[Value<'_>]) -> usize {
    fields
        .iter()
        .fold(2, |len, field| len + 1 + field.encoded_len())
}

/// A read-only view of a completed incoming frame.
///
/// The view borrows the framer's buffer and never modifies it, so fields can
/// be walked any number of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    bytes: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Wraps the bytes of a frame, terminator excluded.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// The leading tag character, if the frame is not empty.
    pub fn tag(&self) -> Option<u8> {
        match self.bytes.first() {
            Some(&DELIMITER) | None => None,
            Some(&tag) => Some(tag),
        }
    }

    /// The fields following the tag.
    pub fn fields(&self) -> Fields<'a> {
        let rest = self
            .bytes
            .iter()
            .position(|&b| b == DELIMITER)
            .map(|i| &self.bytes[i + 1..]);
        Fields { rest }
    }

    /// Number of fields following the tag.
    pub fn field_count(&self) -> usize {
        self.fields().remaining()
    }

    /// The raw frame bytes, terminator excluded.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

/// Iterator over the fields of a [`Frame`].
///
/// Fields that are not valid UTF-8 are yielded as empty strings.
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    rest: Option<&'a [u8]>,
}

impl<'a> Fields<'a> {
    /// Number of fields not yet yielded.
    pub fn remaining(&self) -> usize {
        match self.rest {
            Some(rest) => 1 + rest.iter().filter(|&&b| b == DELIMITER).count(),
            None => 0,
        }
    }
}

impl<'a> Iterator for Fields<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest?;
        let field = match rest.iter().position(|&b| b == DELIMITER) {
            Some(i) => {
                self.rest = Some(&rest[i + 1..]);
                &rest[..i]
            }
            None => {
                self.rest = None;
                rest
            }
        };
        Some(text(field))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for Fields<'_> {}

pub(crate) fn text(bytes: &[u8]) -> &str {
    core::str::from_utf8(bytes).unwrap_or("")
}

/// Parses a decimal field the way C's `atol` does.
///
/// Leading whitespace and a sign are accepted, digits are read up to the
/// first non-digit, and text without leading digits yields `0`. Callers narrow
/// the result with `as`, so out-of-range values wrap.
pub fn parse_decimal(field: &str) -> i64 {
    let mut bytes = field.trim_start().bytes().peekable();
    let negative = match bytes.peek() {
        Some(b'-') => {
            bytes.next();
            true
        }
        Some(b'+') => {
            bytes.next();
            false
        }
        _ => false,
    };
    let magnitude = bytes
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| {
            acc.wrapping_mul(10).wrapping_add(i64::from(d - b'0'))
        });
    if negative { magnitude.wrapping_neg() } else { magnitude }
}
