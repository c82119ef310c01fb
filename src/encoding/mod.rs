//! # Bencodex binary encoder and decoder
//!
//! Encode and decode functions for Bencodex.
//!
//! # Example
//!
//! ```
//! use bencodex::prelude::*;
//!
//! let mut dict = Dictionary::new();
//! dict.insert("name", "bencodex");
//! dict.insert(Bytes::from_static(b"version"), 1);
//!
//! let value = Value::from(dict);
//!
//! // encode into a fresh buffer
//! let enc_full = encode_full(&value).unwrap();
//!
//! // or into any `Serializer`
//! let mut out = Vec::new();
//! encode(&value, &mut out).unwrap();
//!
//! // the encoding is unique
//! assert_eq!(out, enc_full);
//! assert_eq!(&enc_full[..], &b"d7:versioni1eu4:nameu8:bencodexe"[..]);
//!
//! let dec = decode_full(enc_full).unwrap();
//! assert_eq!(dec, value);
//! ```

use crate::{
    dictionary::{check_key_order, Dictionary, Key},
    errors::Error,
    util::*,
    Value,
};
use bytes::Bytes;

pub mod ser;
pub use ser::*;
pub mod de;
pub use de::*;
mod constants;
use constants::*;

/// Encode a value into its canonical binary representation, pushing output into `out`.
///
/// # Arguments
///
/// * `t` - The value to be encoded.
/// * `out` - The [`Serializer`] where the encoder output will be stored.
///
/// # Errors
///
/// Errors from the sink are passed through unchanged.
///
/// # Example
///
/// ```
/// use bencodex::prelude::*;
///
/// // output buffer
/// let mut out = Vec::new();
///
/// // encode value
/// encode(&Value::Null, &mut out).unwrap();
///
/// assert_eq!(out, b"n");
/// ```
pub fn encode<T: Ser, S: Serializer>(t: T, out: &mut S) -> Result<(), Error> { t.ser(out) }

/// Encodes a value into a new vector of bytes.
///
/// # Example
///
/// ```
/// use bencodex::prelude::*;
///
/// let enc: Vec<u8> = encode_full(&Value::from(vec![1, 2])).unwrap();
///
/// assert_eq!(enc, b"li1ei2ee");
/// ```
pub fn encode_full<T: Ser>(t: T) -> Result<Vec<u8>, Error> {
    let mut out = Vec::with_capacity(t.encoded_len());
    t.ser(&mut out)?;
    Ok(out.finalize())
}

/// Length in bytes of the canonical encoding of `t`, without encoding it.
pub fn encoded_len<T: Ser>(t: T) -> usize { t.encoded_len() }

/// Decodes the first value from `data`, leaving any bytes after it unread.
///
/// # Arguments
///
/// * `data` - A [`ByteSource`] containing binary encoded Bencodex.
///
/// # Example
///
/// ```
/// use bencodex::prelude::*;
///
/// let mut input = &b"i42etrailing"[..];
///
/// let dec = decode(&mut input).unwrap();
///
/// assert_eq!(dec, Value::from(42));
/// assert_eq!(input, b"trailing");
/// ```
pub fn decode<D: ByteSource>(data: &mut D) -> Result<Value, Error> {
    Decoder::new(data).decode_value()
}

/// Like [`decode`], with explicit [`DecodeOptions`].
pub fn decode_with<D: ByteSource>(data: &mut D, options: DecodeOptions) -> Result<Value, Error> {
    Decoder::with_options(data, options).decode_value()
}

/// Decodes a buffer that must hold exactly one value.
///
/// # Arguments
///
/// * `bs` - A buffer containing the encoded value.
///
/// # Errors
///
/// Returns [`Error::TrailingData`] if bytes remain after the value.
///
/// # Example
///
/// ```
/// use bencodex::prelude::*;
///
/// assert_eq!(decode_full(&b"n"[..]).unwrap(), Value::Null);
/// assert!(decode_full(&b"nn"[..]).is_err());
/// ```
pub fn decode_full<B: Into<BencodexBytes>>(bs: B) -> Result<Value, Error> {
    let mut buf = bs.into();
    let value = decode(&mut buf)?;
    if buf.remaining() > 0 {
        return Err(Error::TrailingData(buf.remaining()));
    }
    Ok(value)
}

/// Decodes every value in a buffer of concatenated values.
///
/// # Example
///
/// ```
/// use bencodex::prelude::*;
///
/// let values = decode_all(&b"ni1eu2:hi"[..]).unwrap();
///
/// assert_eq!(values, vec![Value::Null, Value::from(1), Value::from("hi")]);
/// ```
pub fn decode_all<B: Into<BencodexBytes>>(bs: B) -> Result<Vec<Value>, Error> {
    let mut decoder = Decoder::new(bs.into());
    let mut out = Vec::new();
    while let Some(value) = decoder.next_value()? {
        out.push(value);
    }
    Ok(out)
}
