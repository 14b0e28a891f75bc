
//! Error type definitions.

use std::borrow::Cow;
use std::io::ErrorKind;
pub use std::io::Error as IoError;
pub use std::io::Result as IoResult;
use std::convert::TryFrom;
use std::error;
use std::fmt;
use std::num::TryFromIntError;


// Export types

/// A result that may contain an exr error.
pub type Result<T> = std::result::Result<T, Error>;

/// A result that, if ok, contains nothing, and otherwise contains an exr error.
pub type UnitResult = Result<()>;


/// An error that may happen while building, validating or transferring a header or a frame buffer.
/// Every message names the attribute, channel, field or range that caused it.
#[derive(Debug)]
pub enum Error {

    /// A malformed or missing argument,
    /// for example an empty name or an invalid sampling rate.
    Invalid(Cow<'static, str>),

    /// An attribute name was used with a value type
    /// that differs from the type already bound to that name.
    Type(Cow<'static, str>),

    /// The byte stream violates the header wire format,
    /// for example by ending too early.
    Format(Cow<'static, str>),

    /// A frame buffer would reach outside of its memory region.
    OutOfBounds(Cow<'static, str>),

    /// A bound frame buffer changed after it was bound.
    Modified(Cow<'static, str>),

    /// The contents are valid, but use a version or flag that this crate does not know.
    NotSupported(Cow<'static, str>),

    /// The underlying byte stream could not be read or written.
    Io(IoError),
}


impl Error {

    /// Create an error of the variant `Invalid`.
    pub fn invalid(message: impl Into<Cow<'static, str>>) -> Self {
        Error::Invalid(message.into())
    }

    /// Create an error of the variant `Type`.
    pub fn type_mismatch(message: impl Into<Cow<'static, str>>) -> Self {
        Error::Type(message.into())
    }

    /// Create an error of the variant `Format`.
    pub fn format(message: impl Into<Cow<'static, str>>) -> Self {
        Error::Format(message.into())
    }

    /// Create an error of the variant `OutOfBounds`.
    pub fn out_of_bounds(message: impl Into<Cow<'static, str>>) -> Self {
        Error::OutOfBounds(message.into())
    }

    /// Create an error of the variant `Modified`.
    pub fn modified(message: impl Into<Cow<'static, str>>) -> Self {
        Error::Modified(message.into())
    }

    /// Create an error of the variant `NotSupported`.
    pub fn unsupported(message: impl Into<Cow<'static, str>>) -> Self {
        Error::NotSupported(message.into())
    }
}

/// Enable using the `?` operator on `std::io::Result`.
/// A stream that ends too early is a format violation, not a transport failure.
impl From<IoError> for Error {
    fn from(error: IoError) -> Self {
        if error.kind() == ErrorKind::UnexpectedEof {
            Error::format("truncated stream (reference to missing bytes)")
        }
        else {
            Error::Io(error)
        }
    }
}

impl From<TryFromIntError> for Error {
    fn from(_: TryFromIntError) -> Self {
        Error::invalid("invalid size")
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(formatter),
            Error::Invalid(message) => write!(formatter, "invalid argument: {}", message),
            Error::Type(message) => write!(formatter, "type mismatch: {}", message),
            Error::Format(message) => write!(formatter, "invalid header format: {}", message),
            Error::OutOfBounds(message) => write!(formatter, "out of bounds: {}", message),
            Error::Modified(message) => write!(formatter, "frame buffer has been modified: {}", message),
            Error::NotSupported(message) => write!(formatter, "not supported: {}", message),
        }
    }
}

/// Return error on invalid range.
#[inline]
pub(crate) fn i32_to_usize(value: i32, error_message: &'static str) -> Result<usize> {
    usize::try_from(value).map_err(|_| {
        if value < 0 { Error::invalid(error_message) }
        else { Error::unsupported(error_message) }
    })
}

/// Return error on invalid range.
#[inline]
pub(crate) fn usize_to_i32(value: usize, error_message: &'static str) -> Result<i32> {
    i32::try_from(value).map_err(|_| Error::invalid(error_message))
}

/// Return error on invalid range.
#[inline]
pub(crate) fn u32_to_usize(value: u32, error_message: &'static str) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::unsupported(error_message))
}
