//! Common error types for link operations

/// Errors reported by the framing layer and the module client.
///
/// Framing problems on the receive side (oversized or truncated frames) are
/// absorbed internally and never show up here; callers only learn whether a
/// request went through.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// No acknowledgement arrived before the response deadline.
    Timeout,
    /// A request is still outstanding; nothing was written.
    Busy,
    /// The module answered with something other than an acknowledgement.
    Rejected,
    /// A response frame lacked an expected field.
    Malformed,
    /// A string field contains the field delimiter or the frame terminator.
    InvalidField,
    /// The encoded command does not fit into a single frame.
    FrameTooLarge,
    /// An error occurred during a write operation.
    WriteError,
    /// An error occurred during a read operation.
    ReadError,
    /// A configuration document could not be parsed.
    InvalidConfig,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Timeout => defmt::write!(f, "Timeout"),
            Error::Busy => defmt::write!(f, "Busy"),
            Error::Rejected => defmt::write!(f, "Rejected"),
            Error::Malformed => defmt::write!(f, "Malformed"),
            Error::InvalidField => defmt::write!(f, "InvalidField"),
            Error::FrameTooLarge => defmt::write!(f, "FrameTooLarge"),
            Error::WriteError => defmt::write!(f, "WriteError"),
            Error::ReadError => defmt::write!(f, "ReadError"),
            Error::InvalidConfig => defmt::write!(f, "InvalidConfig"),
        }
    }
}
