//! Dictionary keys and the sorted map Bencodex uses for dictionaries.
//!
//! Keys are either byte strings or text. Their canonical order, which is also their
//! derived [`Ord`], puts every [`Key::Binary`] before every [`Key::Text`] and compares
//! keys of the same kind byte by byte.
//!
//! # Example
//!
//! ```
//! use bencodex::prelude::*;
//!
//! let mut dict = Dictionary::new();
//!
//! // insertion order doesn't matter, the dictionary stays sorted
//! dict.insert("c", 3);
//! dict.insert(Bytes::from_static(b"b"), 2);
//! dict.insert(Bytes::from_static(b"a"), 1);
//!
//! let keys: Vec<&Key> = dict.keys().collect();
//! assert_eq!(
//!     keys,
//!     vec![&Key::from(Bytes::from_static(b"a")), &Key::from(Bytes::from_static(b"b")), &Key::from("c")]
//! );
//! ```

use crate::{errors::Error, Value};
use bytes::Bytes;
use std::{
    collections::BTreeMap,
    fmt,
    iter::FromIterator,
    slice::Iter,
    vec::IntoIter,
};

#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Hash, Debug)]
/// A dictionary key.
///
/// A binary key and a text key are never equal, even when their bytes are.
pub enum Key {
    /// A byte string key.
    Binary(Bytes),
    /// A Unicode text key.
    Text(String),
}

impl Key {
    /// Creates a binary key, copying `bytes`.
    pub fn binary(bytes: &[u8]) -> Key { Key::Binary(Bytes::from(bytes)) }

    /// Creates a text key.
    pub fn text<S: Into<String>>(s: S) -> Key { Key::Text(s.into()) }

    /// Indicates whether this is a [`Key::Binary`].
    pub fn is_binary(&self) -> bool {
        match self {
            Key::Binary(_) => true,
            Key::Text(_) => false,
        }
    }

    /// Indicates whether this is a [`Key::Text`].
    pub fn is_text(&self) -> bool { !self.is_binary() }

    /// The raw bytes of the key, UTF-8 for text keys.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Key::Binary(b) => b,
            Key::Text(s) => s.as_bytes(),
        }
    }

    /// Copies the key into freshly allocated storage.
    pub fn deep_copy(&self) -> Key {
        match self {
            Key::Binary(b) => Key::binary(b),
            Key::Text(s) => Key::Text(s.clone()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Key::Binary(b) => crate::fmt_binary(b, f),
            Key::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Key { Key::Text(s.to_owned()) }
}

impl From<String> for Key {
    fn from(s: String) -> Key { Key::Text(s) }
}

impl From<Bytes> for Key {
    fn from(b: Bytes) -> Key { Key::Binary(b) }
}

impl From<&[u8]> for Key {
    fn from(b: &[u8]) -> Key { Key::binary(b) }
}

/// Checks that `next` may follow `prev` in an encoded dictionary.
///
/// Keys have to be strictly increasing in canonical order, so this rejects duplicates,
/// binary keys after text keys, and out-of-order keys.
pub(crate) fn check_key_order(prev: &Key, next: &Key) -> Result<(), Error> {
    if prev < next {
        Ok(())
    } else if prev == next {
        Err(Error::MalformedDictionary(format!("duplicate key {}", next)))
    } else if prev.is_text() && next.is_binary() {
        Err(Error::MalformedDictionary(format!(
            "binary key {} follows text key {}",
            next, prev
        )))
    } else {
        Err(Error::MalformedDictionary(format!(
            "key {} follows {} out of order",
            next, prev
        )))
    }
}

#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Hash, Debug, Default)]
/// A map implemented as a [`Vec`] of pairs sorted by canonical key order.
///
/// See also: [module level documentation](`crate::dictionary`).
pub struct Dictionary(Vec<(Key, Value)>);

impl Dictionary {
    /// Creates an empty dictionary.
    pub fn new() -> Self { Dictionary(Vec::new()) }

    /// Creates an empty dictionary with room for `cap` entries.
    pub fn with_capacity(cap: usize) -> Self { Dictionary(Vec::with_capacity(cap)) }

    /// Creates a [`Dictionary`] from pairs already in canonical key order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedDictionary`] if the keys are not strictly increasing,
    /// which covers duplicates and binary keys following text keys.
    ///
    /// # Example
    ///
    /// ```
    /// use bencodex::prelude::*;
    ///
    /// let ok = Dictionary::from_sorted(vec![
    ///     (Key::binary(b"a"), Value::from(1)),
    ///     (Key::text("a"), Value::from(2)),
    /// ]);
    /// assert!(ok.is_ok());
    ///
    /// let bad = Dictionary::from_sorted(vec![
    ///     (Key::text("a"), Value::from(1)),
    ///     (Key::binary(b"a"), Value::from(2)),
    /// ]);
    /// assert!(bad.is_err());
    /// ```
    pub fn from_sorted(v: Vec<(Key, Value)>) -> Result<Self, Error> {
        let mut out = Dictionary::with_capacity(v.len());
        for (k, val) in v {
            out.push_ordered(k, val)?;
        }
        Ok(out)
    }

    /// Appends an entry whose key must sort after every key already present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedDictionary`] on a duplicate key, a binary key after a
    /// text key, or any other out-of-order key. The dictionary is left unchanged.
    pub fn push_ordered(&mut self, key: Key, value: Value) -> Result<(), Error> {
        if let Some((last, _)) = self.0.last() {
            check_key_order(last, &key)?;
        }
        self.0.push((key, value));
        Ok(())
    }

    pub(crate) fn last_key(&self) -> Option<&Key> { self.0.last().map(|(k, _)| k) }

    fn find(&self, key: &Key) -> Result<usize, usize> {
        self.0.binary_search_by(|(k, _)| k.cmp(key))
    }

    /// Inserts an entry at its canonical position, returning the value it replaced.
    pub fn insert<K: Into<Key>, V: Into<Value>>(&mut self, key: K, value: V) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.find(&key) {
            Ok(ix) => Some(std::mem::replace(&mut self.0[ix].1, value)),
            Err(ix) => {
                self.0.insert(ix, (key, value));
                None
            }
        }
    }

    /// Looks up the value stored under `key`.
    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.find(key).ok().map(|ix| &self.0[ix].1)
    }

    /// Looks up the value stored under `key` for modification.
    pub fn get_mut(&mut self, key: &Key) -> Option<&mut Value> {
        match self.find(key) {
            Ok(ix) => Some(&mut self.0[ix].1),
            Err(_) => None,
        }
    }

    /// Indicates whether an entry exists for `key`.
    pub fn contains_key(&self, key: &Key) -> bool { self.find(key).is_ok() }

    /// Removes the entry for `key`, returning its value.
    pub fn remove(&mut self, key: &Key) -> Option<Value> {
        match self.find(key) {
            Ok(ix) => Some(self.0.remove(ix).1),
            Err(_) => None,
        }
    }

    /// Returns length.
    pub fn len(&self) -> usize { self.0.len() }

    /// Indicates whether the [`Dictionary`] is empty.
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Returns an [`Iter`] of the key value pairs, in canonical order.
    pub fn iter(&self) -> Iter<(Key, Value)> { self.0.iter() }

    /// The keys, in canonical order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> { self.0.iter().map(|(k, _)| k) }

    /// The values, ordered by their keys.
    pub fn values(&self) -> impl Iterator<Item = &Value> { self.0.iter().map(|(_, v)| v) }

    /// Copies every key and value into freshly allocated storage.
    pub fn deep_copy(&self) -> Dictionary {
        Dictionary(
            self.0
                .iter()
                .map(|(k, v)| (k.deep_copy(), v.deep_copy()))
                .collect(),
        )
    }
}

impl From<Vec<(Key, Value)>> for Dictionary {
    /// Sorts the pairs into canonical order. When a key repeats, the last value wins.
    fn from(mut v: Vec<(Key, Value)>) -> Self {
        v.sort_by(|(k1, _), (k2, _)| k1.cmp(k2));
        let mut out: Vec<(Key, Value)> = Vec::with_capacity(v.len());
        for (k, val) in v {
            match out.last_mut() {
                Some(last) if last.0 == k => last.1 = val,
                _ => out.push((k, val)),
            }
        }
        Dictionary(out)
    }
}

impl From<BTreeMap<Key, Value>> for Dictionary {
    fn from(bt: BTreeMap<Key, Value>) -> Self { Dictionary(bt.into_iter().collect()) }
}

impl IntoIterator for Dictionary {
    type IntoIter = IntoIter<(Key, Value)>;
    type Item = (Key, Value);

    fn into_iter(self) -> IntoIter<(Key, Value)> { self.0.into_iter() }
}

impl<'a> IntoIterator for &'a Dictionary {
    type IntoIter = Iter<'a, (Key, Value)>;
    type Item = &'a (Key, Value);

    fn into_iter(self) -> Iter<'a, (Key, Value)> { self.0.iter() }
}

impl FromIterator<(Key, Value)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (Key, Value)>>(iter: I) -> Dictionary {
        Dictionary::from(Vec::from_iter(iter))
    }
}
