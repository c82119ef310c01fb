//! # Bencodex
//!
//! Bencodex is a binary serialization format extending BitTorrent's bencoding with null,
//! booleans, Unicode text, and dictionaries keyed by either byte strings or text.
//!
//! Its defining property is *forced normalization*: every value has exactly one legal
//! encoding. The decoder rejects anything that isn't that encoding, so encoded bytes can
//! be compared or hashed directly without decoding them.
//!
//! # Usage
//!
//! ```
//! use bencodex::prelude::*;
//!
//! let mut dict = Dictionary::new();
//! dict.insert("greeting", "hello");
//! dict.insert(Bytes::from_static(b"count"), 3);
//!
//! let value = Value::List(vec![Value::Null, Value::from(dict)]);
//!
//! // encode
//! let encoded = encode_full(&value).unwrap();
//!
//! // and then immediately decode
//! let decoded = decode_full(encoded.clone()).unwrap();
//! assert_eq!(decoded, value);
//!
//! // the encoding is the only one there is
//! assert_eq!(encode_full(&decoded).unwrap(), encoded);
//! ```
//!
//! Rust types convert to and from [`Value`] through [`BencodexRep`](rep::BencodexRep):
//!
//! ```
//! use bencodex::prelude::*;
//!
//! let pair = (42u32, "answer".to_string());
//!
//! let round = <(u32, String)>::from_bencodex(pair.to_bencodex()).unwrap();
//! assert_eq!(round, pair);
//! ```
//!
//! # Wire format
//!
//! Every value starts with a *marker* byte identifying its kind.
//!
//! | Kind       | Encoding                                   | Example          |
//! | ---        | ---                                        | ---              |
//! | null       | `n`                                        | `n`              |
//! | boolean    | `t` or `f`                                 | `t`              |
//! | integer    | `i`, minimal base-10 numeral, `e`          | `i-42e`          |
//! | binary     | length in bytes, `:`, raw bytes            | `5:hello`        |
//! | text       | `u`, length in bytes, `:`, UTF-8 bytes     | `u5:hello`       |
//! | list       | `l`, items, `e`                            | `li1ei2ee`       |
//! | dictionary | `d`, key and value pairs, `e`              | `d1:ai1eu1:bnee` |
//!
//! ## Integers
//!
//! Integers have arbitrary precision. The numeral has no leading zeros, `0` is written
//! `i0e`, and `-0` is illegal.
//!
//! ## Lengths
//!
//! Lengths of binaries and text count bytes, not characters, and are written without
//! leading zeros.
//!
//! ## Dictionaries
//!
//! Keys are binaries or text. Entries appear in canonical key order: every binary key
//! before every text key, and keys of the same kind in unsigned lexicographic order of
//! their bytes. A dictionary whose keys repeat or appear out of that order is malformed.

#![warn(
    deprecated_in_future,
    unsafe_code,
    unused_labels,
    keyword_idents,
    missing_copy_implementations,
    missing_debug_implementations,
    macro_use_extern_crate,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces
)]
#![allow(clippy::cast_lossless)]

#[macro_use]
mod util;

pub mod dictionary;
pub mod encoding;
pub mod errors;
pub mod prelude;
pub mod rep;

use bytes::Bytes;
use num_bigint::BigInt;
use std::fmt;

#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Hash, Debug)]
/// [`Value`] and its variants.
///
/// A value owns everything reachable from it; [`Clone`] and [`Value::deep_copy`] both
/// produce an independent tree, and dropping a value releases all of it.
///
/// # Example
///
/// ```
/// use bencodex::prelude::*;
///
/// let b = Value::Boolean(true);
///
/// let val = match b {
///     Value::Boolean(b) => b,
///     _ => panic!(),
/// };
///
/// assert!(val);
/// ```
pub enum Value {
    /// Null.
    Null,
    /// Boolean.
    Boolean(bool),
    /// Arbitrary-precision integer.
    ///
    /// # Example
    ///
    /// ```
    /// use bencodex::prelude::*;
    ///
    /// let big = BigInt::parse_bytes(b"123456789012345678901234567890", 10).unwrap();
    ///
    /// let v = Value::Integer(big);
    /// ```
    Integer(BigInt),
    /// Byte string.
    ///
    /// # Example
    ///
    /// ```
    /// use bencodex::prelude::*;
    ///
    /// let v = Value::Binary(Bytes::from_static(b"hello world"));
    /// ```
    Binary(Bytes),
    /// Unicode text.
    Text(String),
    /// List.
    ///
    /// ```
    /// use bencodex::prelude::*;
    ///
    /// let v = Value::List(vec![1, 2, 3].into_iter().map(Value::from).collect());
    /// ```
    List(Vec<Value>),
    /// Dictionary, always in canonical key order.
    Dictionary(dictionary::Dictionary),
}

/// The kind of a [`Value`], without its contents.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ValueKind {
    Null,
    Boolean,
    Integer,
    Binary,
    Text,
    List,
    Dictionary,
}

use Value::*;

impl Value {
    /// The kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Null => ValueKind::Null,
            Boolean(_) => ValueKind::Boolean,
            Integer(_) => ValueKind::Integer,
            Binary(_) => ValueKind::Binary,
            Text(_) => ValueKind::Text,
            List(_) => ValueKind::List,
            Dictionary(_) => ValueKind::Dictionary,
        }
    }

    /// Copies the value into freshly allocated storage.
    ///
    /// Byte strings decoded from a [`BencodexBytes`](encoding::BencodexBytes) buffer are
    /// slices of that buffer and keep it alive. The copy shares nothing with `self`.
    ///
    /// # Example
    ///
    /// ```
    /// use bencodex::prelude::*;
    ///
    /// let v = decode_full(&b"l5:helloe"[..]).unwrap();
    ///
    /// assert_eq!(v.deep_copy(), v);
    /// ```
    pub fn deep_copy(&self) -> Value {
        match self {
            Null => Null,
            Boolean(b) => Boolean(*b),
            Integer(i) => Integer(i.clone()),
            Binary(bs) => Binary(Bytes::from(&bs[..])),
            Text(s) => Text(s.clone()),
            List(l) => List(l.iter().map(Value::deep_copy).collect()),
            Dictionary(d) => Dictionary(d.deep_copy()),
        }
    }

    /// Converts a bytestring literal to a [`Value::Binary`].
    ///
    /// # Example
    ///
    /// ```
    /// use bencodex::prelude::*;
    ///
    /// let v = Value::from_static(b"this is an example");
    /// ```
    pub fn from_static(bytes: &'static [u8]) -> Value { Binary(Bytes::from_static(bytes)) }

    /// Indicates whether a value is [`Null`].
    ///
    /// # Example
    ///
    /// ```
    /// use bencodex::Value::Null;
    ///
    /// assert!(Null.is_null());
    /// ```
    pub fn is_null(&self) -> bool {
        match self {
            Null => true,
            _ => false,
        }
    }

    /// The boolean, if this is a [`Value::Boolean`].
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer, if this is a [`Value::Integer`].
    pub fn to_integer(&self) -> Option<&BigInt> {
        match self {
            Integer(i) => Some(i),
            _ => None,
        }
    }

    /// The bytes, if this is a [`Value::Binary`].
    pub fn to_binary(&self) -> Option<&Bytes> {
        match self {
            Binary(bs) => Some(bs),
            _ => None,
        }
    }

    /// The text, if this is a [`Value::Text`].
    pub fn to_text(&self) -> Option<&str> {
        match self {
            Text(s) => Some(s),
            _ => None,
        }
    }

    /// The items, if this is a [`Value::List`].
    ///
    /// # Example
    ///
    /// ```
    /// use bencodex::prelude::*;
    ///
    /// let v = Value::from(vec![1, 2, 3]);
    ///
    /// assert_eq!(v.to_list().unwrap().len(), 3);
    /// assert!(Value::Null.to_list().is_none());
    /// ```
    pub fn to_list(&self) -> Option<&Vec<Value>> {
        match self {
            List(l) => Some(l),
            _ => None,
        }
    }

    /// The entries, if this is a [`Value::Dictionary`].
    pub fn to_dictionary(&self) -> Option<&dictionary::Dictionary> {
        match self {
            Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Consumes the value, returning the integer if it is one.
    pub fn into_integer(self) -> Option<BigInt> {
        match self {
            Integer(i) => Some(i),
            _ => None,
        }
    }

    /// Consumes the value, returning the bytes if it is a [`Value::Binary`].
    pub fn into_binary(self) -> Option<Bytes> {
        match self {
            Binary(bs) => Some(bs),
            _ => None,
        }
    }

    /// Consumes the value, returning the text if it is a [`Value::Text`].
    pub fn into_text(self) -> Option<String> {
        match self {
            Text(s) => Some(s),
            _ => None,
        }
    }

    /// Consumes the value, returning the items if it is a [`Value::List`].
    pub fn into_list(self) -> Option<Vec<Value>> {
        match self {
            List(l) => Some(l),
            _ => None,
        }
    }

    /// Consumes the value, returning the entries if it is a [`Value::Dictionary`].
    pub fn into_dictionary(self) -> Option<dictionary::Dictionary> {
        match self {
            Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Consumes the value, converting it to a value of type `T`.
    ///
    /// # Example
    ///
    /// ```
    /// use bencodex::prelude::*;
    ///
    /// let n: u8 = Value::from(1).into_rep().unwrap();
    ///
    /// assert_eq!(n, 1);
    /// ```
    pub fn into_rep<T: rep::BencodexRep>(self) -> Option<T> { T::from_bencodex(self) }
}

pub(crate) fn fmt_binary(bytes: &[u8], f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str("b\"")?;
    for b in bytes {
        write!(f, "{:02x}", b)?;
    }
    f.write_str("\"")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Null => f.write_str("null"),
            Boolean(b) => write!(f, "{}", b),
            Integer(i) => write!(f, "{}", i),
            Binary(bs) => fmt_binary(bs, f),
            Text(s) => write!(f, "{:?}", s),
            List(l) => {
                f.write_str("[")?;
                for (i, v) in l.iter().enumerate() {
                    if i != 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                f.write_str("]")
            }
            Dictionary(d) => {
                f.write_str("{")?;
                for (i, (k, v)) in d.iter().enumerate() {
                    if i != 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value { Text(s.to_owned()) }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Value { List(v.into_iter().map(T::into).collect()) }
}

from_fn!(Value, bool, Value::Boolean);
from_fn!(Value, BigInt, Value::Integer);
from_fn!(Value, Bytes, Value::Binary);
from_fn!(Value, String, Value::Text);
from_fn!(Value, dictionary::Dictionary, Value::Dictionary);

// Integers
compose_from!(Value, BigInt, i8);
compose_from!(Value, BigInt, i16);
compose_from!(Value, BigInt, i32);
compose_from!(Value, BigInt, i64);
compose_from!(Value, BigInt, i128);
compose_from!(Value, BigInt, isize);
compose_from!(Value, BigInt, u8);
compose_from!(Value, BigInt, u16);
compose_from!(Value, BigInt, u32);
compose_from!(Value, BigInt, u64);
compose_from!(Value, BigInt, u128);
compose_from!(Value, BigInt, usize);
