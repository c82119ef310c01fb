use super::*;
use bytes::Bytes;
use log::{debug, trace};
use num_bigint::BigInt;
use smallvec::SmallVec;
use std::{
    io::{self, Read},
    ops::{Deref, DerefMut},
};

/// Nesting limit used by [`DecodeOptions::default`].
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Chunk size used when reading a length-prefixed payload from an [`io::Read`].
const READ_CHUNK: usize = 64 * 1024;

/// A source of bytes the decoder pulls from. It never seeks backward.
pub trait ByteSource {
    /// Reads the next byte, or `None` at the end of the stream.
    ///
    /// # Errors
    ///
    /// Errors from the underlying transport are passed through unchanged.
    fn read_byte(&mut self) -> Result<Option<u8>, Error>;

    /// Reads exactly `len` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedEof`] if fewer than `len` bytes remain.
    fn read_exact(&mut self, len: usize) -> Result<Bytes, Error>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> Result<Option<u8>, Error> { (**self).read_byte() }

    fn read_exact(&mut self, len: usize) -> Result<Bytes, Error> { (**self).read_exact(len) }
}

impl<'a> ByteSource for &'a [u8] {
    fn read_byte(&mut self) -> Result<Option<u8>, Error> {
        let bs: &'a [u8] = *self;
        match bs.split_first() {
            Some((b, rest)) => {
                *self = rest;
                Ok(Some(*b))
            }
            None => Ok(None),
        }
    }

    fn read_exact(&mut self, len: usize) -> Result<Bytes, Error> {
        let bs: &'a [u8] = *self;
        if bs.len() < len {
            return Err(Error::UnexpectedEof);
        }
        let (head, rest) = bs.split_at(len);
        *self = rest;
        Ok(Bytes::from(head))
    }
}

/// An in-memory buffer of encoded Bencodex.
///
/// Byte strings read from it are zero-copy slices of the buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BencodexBytes(Bytes);

impl BencodexBytes {
    /// Wraps a buffer.
    pub fn new(bs: Bytes) -> Self { BencodexBytes(bs) }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize { self.0.len() }

    /// Returns the unread part of the buffer.
    pub fn into_inner(self) -> Bytes { self.0 }
}

impl Deref for BencodexBytes {
    type Target = Bytes;

    fn deref(&self) -> &Bytes { &self.0 }
}

impl DerefMut for BencodexBytes {
    fn deref_mut(&mut self) -> &mut Bytes { &mut self.0 }
}

impl From<Bytes> for BencodexBytes {
    fn from(b: Bytes) -> Self { BencodexBytes(b) }
}

impl From<Vec<u8>> for BencodexBytes {
    fn from(v: Vec<u8>) -> Self { BencodexBytes(Bytes::from(v)) }
}

impl<'a> From<&'a [u8]> for BencodexBytes {
    fn from(s: &'a [u8]) -> Self { BencodexBytes(Bytes::from(s)) }
}

impl ByteSource for BencodexBytes {
    #[inline]
    fn read_byte(&mut self) -> Result<Option<u8>, Error> {
        if self.is_empty() {
            Ok(None)
        } else {
            Ok(Some(self.split_to(1)[0]))
        }
    }

    #[inline]
    fn read_exact(&mut self, len: usize) -> Result<Bytes, Error> {
        if self.len() >= len {
            Ok(self.split_to(len))
        } else {
            Err(Error::UnexpectedEof)
        }
    }
}

/// Adapts any [`io::Read`] into a [`ByteSource`].
///
/// Bytes are pulled one at a time for markers and length prefixes, so wrap unbuffered
/// readers in an [`io::BufReader`]. Payloads are read in bounded chunks, so a huge length
/// prefix on a short stream fails with [`Error::UnexpectedEof`] instead of allocating
/// the whole claimed length up front.
#[derive(Debug)]
pub struct IoSource<R> {
    inner: R,
}

impl<R: Read> IoSource<R> {
    /// Wraps a reader.
    pub fn new(inner: R) -> Self { IoSource { inner } }

    /// Returns a reference to the reader.
    pub fn get_ref(&self) -> &R { &self.inner }

    /// Returns the reader.
    pub fn into_inner(self) -> R { self.inner }
}

impl<R: Read> ByteSource for IoSource<R> {
    fn read_byte(&mut self) -> Result<Option<u8>, Error> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::from(e)),
            }
        }
    }

    fn read_exact(&mut self, len: usize) -> Result<Bytes, Error> {
        let mut buf: Vec<u8> = Vec::new();
        let mut left = len;
        while left > 0 {
            let chunk = left.min(READ_CHUNK);
            buf.try_reserve_exact(chunk)
                .map_err(|_| Error::OutOfMemory)?;
            let start = buf.len();
            buf.resize(start + chunk, 0);
            self.inner.read_exact(&mut buf[start..])?;
            left -= chunk;
        }
        Ok(Bytes::from(buf))
    }
}

/// Decoder settings.
///
/// # Example
///
/// ```
/// use bencodex::prelude::*;
///
/// let opts = DecodeOptions::default().max_depth(Some(2));
///
/// assert!(decode_with(&mut &b"llee"[..], opts).is_ok());
/// assert!(decode_with(&mut &b"llleee"[..], opts).is_err());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    /// How deeply lists and dictionaries may nest. `None` means no limit, in which case
    /// a hostile input can exhaust the stack.
    pub max_depth: Option<usize>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

impl DecodeOptions {
    /// Sets the nesting limit.
    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Integer digit scratch space; spills to the heap for long numerals.
type Numeral = SmallVec<[u8; 32]>;

/// A recursive-descent parser over a [`ByteSource`].
///
/// After any error the decoder's position in the stream is unspecified and it should be
/// dropped.
#[derive(Debug)]
pub struct Decoder<S> {
    source: S,
    options: DecodeOptions,
    depth: usize,
    offset: usize,
}

impl<S: ByteSource> Decoder<S> {
    /// Creates a decoder with [`DecodeOptions::default`].
    pub fn new(source: S) -> Self { Self::with_options(source, DecodeOptions::default()) }

    /// Creates a decoder with the given options.
    pub fn with_options(source: S, options: DecodeOptions) -> Self {
        Decoder {
            source,
            options,
            depth: 0,
            offset: 0,
        }
    }

    /// Number of bytes consumed so far.
    pub fn offset(&self) -> usize { self.offset }

    /// Returns the source, positioned just after the last value read.
    pub fn into_inner(self) -> S { self.source }

    /// Reads exactly one value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedEof`] if the source is already exhausted, and any
    /// error from [`Error`] for malformed or non-canonical input.
    pub fn decode_value(&mut self) -> Result<Value, Error> {
        let marker = self.take_byte()?;
        self.value_from_marker(marker)
    }

    /// Reads the next value of a stream of concatenated values, or `None` if the source
    /// ends cleanly before a new value begins.
    pub fn next_value(&mut self) -> Result<Option<Value>, Error> {
        match self.next_byte()? {
            None => Ok(None),
            Some(marker) => self.value_from_marker(marker).map(Some),
        }
    }

    #[inline]
    fn next_byte(&mut self) -> Result<Option<u8>, Error> {
        let byte = self.source.read_byte()?;
        if byte.is_some() {
            self.offset += 1;
        }
        Ok(byte)
    }

    #[inline]
    fn take_byte(&mut self) -> Result<u8, Error> {
        self.next_byte()?.ok_or(Error::UnexpectedEof)
    }

    #[inline]
    fn take_many(&mut self, len: usize) -> Result<Bytes, Error> {
        let bs = self.source.read_exact(len)?;
        self.offset += len;
        Ok(bs)
    }

    fn value_from_marker(&mut self, marker: u8) -> Result<Value, Error> {
        match marker {
            NULL => Ok(Value::Null),
            TRUE => Ok(Value::Boolean(true)),
            FALSE => Ok(Value::Boolean(false)),
            INTEGER => self.read_integer().map(Value::Integer),
            b'0'..=b'9' => self.read_binary(marker).map(Value::Binary),
            TEXT => self.read_text().map(Value::Text),
            LIST => self.read_list().map(Value::List),
            DICTIONARY => self.read_dictionary().map(Value::Dictionary),
            END => Err(Error::InvalidFormat(format!(
                "terminator where a value was expected at byte {}",
                self.offset - 1
            ))),
            unknown => Err(Error::InvalidFormat(format!(
                "unknown marker {:#04x} at byte {}",
                unknown,
                self.offset - 1
            ))),
        }
    }

    /// Reads the numeral and terminator following an `i` marker.
    fn read_integer(&mut self) -> Result<BigInt, Error> {
        let start = self.offset - 1;
        let malformed = |digits: &[u8], negative: bool, why: &str| {
            Error::MalformedInteger(format!(
                "{} in `i{}{}` at byte {}",
                why,
                if negative { "-" } else { "" },
                String::from_utf8_lossy(digits),
                start
            ))
        };

        let mut negative = false;
        let mut digits = Numeral::new();
        loop {
            match self.take_byte()? {
                END => break,
                MINUS if !negative && digits.is_empty() => negative = true,
                b'0' if digits.is_empty() && negative => {
                    return Err(malformed(&digits[..], negative, "zero after minus sign"));
                }
                digit @ b'0'..=b'9' => {
                    if digits.first() == Some(&b'0') {
                        return Err(malformed(&digits[..], negative, "leading zero"));
                    }
                    digits.push(digit);
                }
                other => {
                    return Err(malformed(
                        &digits[..],
                        negative,
                        &format!("unexpected byte {:#04x}", other),
                    ));
                }
            }
        }

        if digits.is_empty() {
            return Err(malformed(&digits[..], negative, "no digits"));
        }

        let magnitude = BigInt::parse_bytes(&digits, 10)
            .ok_or_else(|| malformed(&digits[..], negative, "unparsable numeral"))?;
        Ok(if negative { -magnitude } else { magnitude })
    }

    /// Reads a decimal length prefix through its `:`, given its first byte.
    fn read_len(&mut self, first: u8, malformed: fn(String) -> Error) -> Result<usize, Error> {
        let start = self.offset - 1;
        if !first.is_ascii_digit() {
            return Err(malformed(format!(
                "length starts with {:#04x} at byte {}",
                first, start
            )));
        }

        let mut len = (first - b'0') as usize;
        loop {
            match self.take_byte()? {
                LEN_SEP => return Ok(len),
                digit @ b'0'..=b'9' => {
                    if first == b'0' {
                        return Err(malformed(format!("leading zero in length at byte {}", start)));
                    }
                    len = len
                        .checked_mul(10)
                        .and_then(|l| l.checked_add((digit - b'0') as usize))
                        .ok_or_else(|| {
                            malformed(format!("length overflows at byte {}", start))
                        })?;
                }
                other => {
                    return Err(malformed(format!(
                        "unexpected byte {:#04x} in length at byte {}",
                        other,
                        self.offset - 1
                    )));
                }
            }
        }
    }

    fn read_binary(&mut self, first: u8) -> Result<Bytes, Error> {
        let len = self.read_len(first, Error::MalformedBinary)?;
        self.take_many(len)
    }

    /// Reads the length and payload following a `u` marker.
    fn read_text(&mut self) -> Result<String, Error> {
        let first = self.take_byte()?;
        let len = self.read_len(first, Error::InvalidFormat)?;
        let bs = self.take_many(len)?;
        Ok(std::str::from_utf8(&bs)?.to_owned())
    }

    fn enter(&mut self) -> Result<(), Error> {
        if let Some(max) = self.options.max_depth {
            if self.depth >= max {
                debug!(
                    "refusing container at byte {}: nesting limit {} reached",
                    self.offset - 1,
                    max
                );
                return Err(Error::DepthLimitExceeded(max));
            }
        }
        self.depth += 1;
        Ok(())
    }

    fn read_list(&mut self) -> Result<Vec<Value>, Error> {
        self.enter()?;
        let items = self.list_items();
        self.depth -= 1;
        items
    }

    fn list_items(&mut self) -> Result<Vec<Value>, Error> {
        trace!("list at byte {}, depth {}", self.offset - 1, self.depth);
        let mut items = Vec::new();
        loop {
            let marker = self.take_byte()?;
            if marker == END {
                break;
            }
            items.push(self.value_from_marker(marker)?);
        }
        trace!("list of {} items ends at byte {}", items.len(), self.offset);
        Ok(items)
    }

    fn read_dictionary(&mut self) -> Result<Dictionary, Error> {
        self.enter()?;
        let dict = self.dictionary_entries();
        self.depth -= 1;
        dict
    }

    fn dictionary_entries(&mut self) -> Result<Dictionary, Error> {
        trace!("dictionary at byte {}, depth {}", self.offset - 1, self.depth);
        let mut dict = Dictionary::new();
        loop {
            let marker = self.take_byte()?;
            let key = match marker {
                END => break,
                b'0'..=b'9' => Key::Binary(self.read_binary(marker)?),
                TEXT => Key::Text(self.read_text()?),
                other => {
                    return Err(Error::MalformedDictionary(format!(
                        "key must be binary or text, found marker {:#04x} at byte {}",
                        other,
                        self.offset - 1
                    )));
                }
            };

            // reject a bad key before spending time on its value
            if let Some(last) = dict.last_key() {
                check_key_order(last, &key)?;
            }

            let value = self.decode_value()?;
            dict.push_ordered(key, value)?;
        }
        trace!(
            "dictionary of {} entries ends at byte {}",
            dict.len(),
            self.offset
        );
        Ok(dict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(bs: &[u8]) -> Result<Value, Error> { Decoder::new(bs).decode_value() }

    #[test]
    fn slices_and_buffers_agree() {
        let enc = b"d1:al1:bu1:ceu1:bi1ee";
        let from_slice = Decoder::new(&enc[..]).decode_value().unwrap();
        let from_bytes = Decoder::new(BencodexBytes::from(&enc[..]))
            .decode_value()
            .unwrap();
        let from_io = Decoder::new(IoSource::new(&enc[..]))
            .decode_value()
            .unwrap();
        assert_eq!(from_slice, from_bytes);
        assert_eq!(from_slice, from_io);
    }

    #[test]
    fn offset_tracks_consumption() {
        let mut d = Decoder::new(&b"i42e5:hellon"[..]);
        d.decode_value().unwrap();
        assert_eq!(d.offset(), 4);
        d.decode_value().unwrap();
        assert_eq!(d.offset(), 11);
        d.decode_value().unwrap();
        assert_eq!(d.offset(), 12);
    }

    #[test]
    fn next_value_stops_cleanly() {
        let mut d = Decoder::new(&b"tfn"[..]);
        assert_eq!(d.next_value().unwrap(), Some(Value::Boolean(true)));
        assert_eq!(d.next_value().unwrap(), Some(Value::Boolean(false)));
        assert_eq!(d.next_value().unwrap(), Some(Value::Null));
        assert_eq!(d.next_value().unwrap(), None);

        // a value cut short is still an error
        let mut d = Decoder::new(&b"ni1"[..]);
        assert_eq!(d.next_value().unwrap(), Some(Value::Null));
        assert!(matches!(d.next_value(), Err(Error::UnexpectedEof)));
    }

    #[test]
    fn leaves_trailing_bytes_unread() {
        let mut src = BencodexBytes::from(&b"i1eXYZ"[..]);
        let v = Decoder::new(&mut src).decode_value().unwrap();
        assert_eq!(v, Value::from(1));
        assert_eq!(&src[..], b"XYZ");
    }

    #[test]
    fn buffer_source_is_zero_copy() {
        let mut enc = b"100:".to_vec();
        enc.extend_from_slice(&[7u8; 100]);
        let buf = Bytes::from(enc);
        let base = buf.as_ptr();

        let mut src = BencodexBytes::new(buf);
        match Decoder::new(&mut src).decode_value().unwrap() {
            Value::Binary(b) => {
                assert_eq!(&b[..], &[7u8; 100][..]);
                assert_eq!(b.as_ptr(), base.wrapping_add(4));
            }
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn length_prefix_rules() {
        assert!(matches!(dec(b"05:hello"), Err(Error::MalformedBinary(_))));
        assert!(matches!(dec(b"u05:hello"), Err(Error::InvalidFormat(_))));
        assert!(matches!(dec(b"5x:hello"), Err(Error::MalformedBinary(_))));
        assert!(matches!(dec(b"ux:"), Err(Error::InvalidFormat(_))));
        assert!(matches!(dec(b"u:"), Err(Error::InvalidFormat(_))));
        assert!(matches!(
            dec(b"99999999999999999999999999:"),
            Err(Error::MalformedBinary(_))
        ));
        assert_eq!(dec(b"0:").unwrap(), Value::Binary(Bytes::new()));
        assert_eq!(dec(b"u0:").unwrap(), Value::Text(String::new()));
    }

    #[test]
    fn huge_length_on_short_stream() {
        let enc = b"1000000000:abc";
        assert!(matches!(dec(enc), Err(Error::UnexpectedEof)));
        assert!(matches!(
            Decoder::new(IoSource::new(&enc[..])).decode_value(),
            Err(Error::UnexpectedEof)
        ));
    }

    #[test]
    fn io_source_reads_across_chunks() {
        let payload = vec![b'x'; READ_CHUNK * 2 + 17];
        let mut enc = format!("{}:", payload.len()).into_bytes();
        enc.extend_from_slice(&payload);

        let v = Decoder::new(IoSource::new(io::Cursor::new(enc)))
            .decode_value()
            .unwrap();
        assert_eq!(v, Value::Binary(Bytes::from(payload)));
    }

    #[test]
    fn io_errors_pass_through() {
        struct Broken;

        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            }
        }

        match Decoder::new(IoSource::new(Broken)).decode_value() {
            Err(Error::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::ConnectionReset),
            other => panic!("expected io error, got {:?}", other),
        }
    }

    #[test]
    fn depth_limit() {
        let opts = DecodeOptions::default().max_depth(Some(3));

        let ok = b"lllneee";
        assert!(Decoder::with_options(&ok[..], opts).decode_value().is_ok());

        let deep = b"lllleeee";
        assert!(matches!(
            Decoder::with_options(&deep[..], opts).decode_value(),
            Err(Error::DepthLimitExceeded(3))
        ));

        let dicts = b"du1:adu1:bdu1:cdeeee";
        assert!(matches!(
            Decoder::with_options(&dicts[..], opts).decode_value(),
            Err(Error::DepthLimitExceeded(3))
        ));

        // siblings don't accumulate depth
        let wide = b"llelelelelee";
        assert!(Decoder::with_options(&wide[..], opts.max_depth(Some(2)))
            .decode_value()
            .is_ok());
    }

    #[test]
    fn default_depth_guard() {
        let n = DEFAULT_MAX_DEPTH + 1;
        let mut enc = vec![b'l'; n];
        enc.extend(vec![b'e'; n]);
        assert!(matches!(dec(&enc), Err(Error::DepthLimitExceeded(_))));

        let n = DEFAULT_MAX_DEPTH;
        let mut enc = vec![b'l'; n];
        enc.extend(vec![b'e'; n]);
        assert!(dec(&enc).is_ok());
    }

    #[test]
    fn non_key_markers_in_dictionary() {
        for enc in &[&b"dni1ee"[..], b"di1ei2ee", b"dlei1ee", b"ddei1ee", b"dtfe"] {
            assert!(
                matches!(dec(enc), Err(Error::MalformedDictionary(_))),
                "{:?}",
                String::from_utf8_lossy(enc)
            );
        }
    }

    #[test]
    fn dictionary_missing_value() {
        assert!(matches!(dec(b"d1:ae"), Err(Error::InvalidFormat(_))));
        assert!(matches!(dec(b"d1:a"), Err(Error::UnexpectedEof)));
    }
}
