use failure::Fail;
use std::{io, str::Utf8Error};

/// Every way encoding or decoding can fail.
///
/// Decoding and encoding share this one taxonomy; the variant says what went wrong,
/// not which side noticed it.
#[derive(Debug, Fail)]
pub enum Error {
    /// The input ended in the middle of a value.
    #[fail(display = "unexpected end of input")]
    UnexpectedEof,
    /// An unrecognized marker byte or a malformed length field.
    #[fail(display = "invalid format: {}", _0)]
    InvalidFormat(String),
    /// A bad digit, an illegal leading zero, or `-0`.
    #[fail(display = "malformed integer: {}", _0)]
    MalformedInteger(String),
    /// A bad length field for a byte string.
    #[fail(display = "malformed binary: {}", _0)]
    MalformedBinary(String),
    /// Keys out of canonical order, a binary key after a text key, a duplicate key, or a
    /// key that is neither binary nor text.
    #[fail(display = "malformed dictionary: {}", _0)]
    MalformedDictionary(String),
    /// Text bytes that are not well-formed UTF-8.
    #[fail(display = "invalid UTF-8 in text: {}", _0)]
    InvalidUtf8(#[cause] Utf8Error),
    /// A buffer for a length-prefixed value could not be allocated.
    #[fail(display = "out of memory")]
    OutOfMemory,
    /// Containers were nested deeper than the configured limit.
    #[fail(display = "nesting exceeds the limit of {} levels", _0)]
    DepthLimitExceeded(usize),
    /// Bytes were left over after a complete top-level value.
    #[fail(display = "{} trailing bytes after value", _0)]
    TrailingData(usize),
    /// Reserved for extension markers.
    #[fail(display = "unsupported marker: {:#04x}", _0)]
    Unsupported(u8),
    /// The underlying byte source or sink failed.
    #[fail(display = "i/o error: {}", _0)]
    Io(#[cause] io::Error),
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::UnexpectedEof
        } else {
            Error::Io(e)
        }
    }
}

impl From<Utf8Error> for Error {
    fn from(e: Utf8Error) -> Self { Error::InvalidUtf8(e) }
}
