use super::*;
use num_bigint::BigInt;
use std::{
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
    io::Write,
};

/// A sink the encoder pushes bytes into.
pub trait Serializer {
    /// The type of the output value.
    type Out;
    /// Add a byte to the output value.
    fn put_u8(&mut self, u: u8) -> Result<(), Error>;
    /// Add a slice to the output value.
    fn put_slice(&mut self, slice: &[u8]) -> Result<(), Error>;
    /// Return the output value.
    fn finalize(self) -> Self::Out;
}

/// Convenience methods for [`Serializer`], one per kind of value.
pub trait SerializerExt: Serializer {
    /// Add `n`.
    fn put_null(&mut self) -> Result<(), Error>;

    /// Add `t` or `f`.
    fn put_bool(&mut self, b: bool) -> Result<(), Error>;

    /// Add an integer as `i`, its minimal decimal numeral, and `e`.
    ///
    /// # Arguments
    ///
    /// * `i: &BigInt` - The value to be added.
    fn put_integer(&mut self, i: &BigInt) -> Result<(), Error>;

    /// Add a byte string as its length, `:`, and the raw bytes.
    ///
    /// # Arguments
    ///
    /// * `b: &[u8]` - The value to be added.
    fn put_binary(&mut self, b: &[u8]) -> Result<(), Error>;

    /// Add text as `u`, its length in bytes, `:`, and its UTF-8 bytes.
    ///
    /// # Arguments
    ///
    /// * `s: &str` - The value to be added.
    fn put_text(&mut self, s: &str) -> Result<(), Error>;

    /// Add a dictionary key.
    fn put_key(&mut self, k: &Key) -> Result<(), Error>;

    /// Add a list.
    ///
    /// # Arguments
    ///
    /// * `v` - The items, emitted in order.
    fn put_list<T: Ser>(&mut self, v: &[T]) -> Result<(), Error>;

    /// Add a dictionary, whose entries are already in canonical order.
    fn put_dictionary(&mut self, d: &Dictionary) -> Result<(), Error>;

    /// Add a dictionary from entries in any order. They are sorted into canonical key
    /// order before anything is written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedDictionary`] if a key repeats.
    fn put_entries<'a, T, I>(&mut self, entries: I) -> Result<(), Error>
    where
        T: Ser + 'a,
        I: IntoIterator<Item = (&'a Key, &'a T)>;
}

/// Writes the decimal length prefix and `:` shared by binaries and text.
#[inline]
fn put_len<S: Serializer + ?Sized>(out: &mut S, len: usize) -> Result<(), Error> {
    out.put_slice(&usize_to_digits(len))?;
    out.put_u8(LEN_SEP)
}

impl Serializer for Vec<u8> {
    type Out = Self;

    fn put_u8(&mut self, u: u8) -> Result<(), Error> {
        self.push(u);
        Ok(())
    }

    fn put_slice(&mut self, slice: &[u8]) -> Result<(), Error> {
        self.extend_from_slice(slice);
        Ok(())
    }

    fn finalize(self) -> Self::Out { self }
}

/// Adapts any [`Write`] into a [`Serializer`]. Write errors surface as [`Error::Io`].
///
/// Output is written a few bytes at a time, so wrap unbuffered writers in an
/// [`std::io::BufWriter`].
#[derive(Debug)]
pub struct IoSink<W> {
    inner: W,
}

impl<W: Write> IoSink<W> {
    /// Wraps a writer.
    pub fn new(inner: W) -> Self { IoSink { inner } }

    /// Returns a reference to the writer.
    pub fn get_ref(&self) -> &W { &self.inner }
}

impl<W: Write> Serializer for IoSink<W> {
    type Out = W;

    fn put_u8(&mut self, u: u8) -> Result<(), Error> {
        self.inner.write_all(&[u]).map_err(Error::Io)
    }

    fn put_slice(&mut self, slice: &[u8]) -> Result<(), Error> {
        self.inner.write_all(slice).map_err(Error::Io)
    }

    fn finalize(self) -> W { self.inner }
}

impl<S: Serializer> SerializerExt for S {
    fn put_null(&mut self) -> Result<(), Error> { self.put_u8(NULL) }

    fn put_bool(&mut self, b: bool) -> Result<(), Error> {
        if b {
            self.put_u8(TRUE)
        } else {
            self.put_u8(FALSE)
        }
    }

    fn put_integer(&mut self, i: &BigInt) -> Result<(), Error> {
        self.put_u8(INTEGER)?;
        self.put_slice(i.to_str_radix(10).as_bytes())?;
        self.put_u8(END)
    }

    fn put_binary(&mut self, b: &[u8]) -> Result<(), Error> {
        put_len(self, b.len())?;
        self.put_slice(b)
    }

    fn put_text(&mut self, s: &str) -> Result<(), Error> {
        self.put_u8(TEXT)?;
        put_len(self, s.len())?;
        self.put_slice(s.as_bytes())
    }

    fn put_key(&mut self, k: &Key) -> Result<(), Error> {
        match k {
            Key::Binary(b) => self.put_binary(b),
            Key::Text(s) => self.put_text(s),
        }
    }

    fn put_list<T: Ser>(&mut self, v: &[T]) -> Result<(), Error> {
        self.put_u8(LIST)?;
        for t in v {
            t.ser(self)?;
        }
        self.put_u8(END)
    }

    fn put_dictionary(&mut self, d: &Dictionary) -> Result<(), Error> {
        self.put_u8(DICTIONARY)?;
        let mut prev: Option<&Key> = None;
        for (k, v) in d.iter() {
            debug_assert!(prev.map_or(true, |p| p < k), "dictionary out of order");
            prev = Some(k);
            self.put_key(k)?;
            v.ser(self)?;
        }
        self.put_u8(END)
    }

    fn put_entries<'a, T, I>(&mut self, entries: I) -> Result<(), Error>
    where
        T: Ser + 'a,
        I: IntoIterator<Item = (&'a Key, &'a T)>,
    {
        let mut sorted: Vec<(&Key, &T)> = entries.into_iter().collect();
        sorted.sort_by(|(k1, _), (k2, _)| k1.cmp(k2));
        for pair in sorted.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(Error::MalformedDictionary(format!(
                    "duplicate key {}",
                    pair[0].0
                )));
            }
        }

        self.put_u8(DICTIONARY)?;
        for (k, v) in sorted {
            self.put_key(k)?;
            v.ser(self)?;
        }
        self.put_u8(END)
    }
}

/// A value that can be serialized.
pub trait Ser {
    /// Writes the canonical encoding of `self` to `s`.
    fn ser<S: Serializer>(&self, s: &mut S) -> Result<(), Error>;

    /// Length in bytes of the canonical encoding of `self`.
    fn encoded_len(&self) -> usize;
}

#[inline]
fn len_prefixed(len: usize) -> usize { decimal_len(len) + 1 + len }

impl Ser for Value {
    fn ser<S: Serializer>(&self, s: &mut S) -> Result<(), Error> {
        match self {
            Value::Null => s.put_null(),
            Value::Boolean(b) => s.put_bool(*b),
            Value::Integer(i) => s.put_integer(i),
            Value::Binary(bs) => s.put_binary(bs),
            Value::Text(t) => s.put_text(t),
            Value::List(l) => s.put_list(l),
            Value::Dictionary(d) => s.put_dictionary(d),
        }
    }

    fn encoded_len(&self) -> usize {
        match self {
            Value::Null | Value::Boolean(_) => 1,
            Value::Integer(i) => i.to_str_radix(10).len() + 2,
            Value::Binary(bs) => len_prefixed(bs.len()),
            Value::Text(t) => 1 + len_prefixed(t.len()),
            Value::List(l) => 2 + l.iter().map(Ser::encoded_len).sum::<usize>(),
            Value::Dictionary(d) => d.encoded_len(),
        }
    }
}

impl Ser for Key {
    fn ser<S: Serializer>(&self, s: &mut S) -> Result<(), Error> { s.put_key(self) }

    fn encoded_len(&self) -> usize {
        match self {
            Key::Binary(b) => len_prefixed(b.len()),
            Key::Text(t) => 1 + len_prefixed(t.len()),
        }
    }
}

impl Ser for Dictionary {
    fn ser<S: Serializer>(&self, s: &mut S) -> Result<(), Error> { s.put_dictionary(self) }

    fn encoded_len(&self) -> usize {
        2 + self
            .iter()
            .map(|(k, v)| k.encoded_len() + v.encoded_len())
            .sum::<usize>()
    }
}

impl<T: Ser, H: BuildHasher> Ser for HashMap<Key, T, H> {
    fn ser<S: Serializer>(&self, s: &mut S) -> Result<(), Error> { s.put_entries(self.iter()) }

    fn encoded_len(&self) -> usize {
        2 + self
            .iter()
            .map(|(k, v)| k.encoded_len() + v.encoded_len())
            .sum::<usize>()
    }
}

impl<T: Ser> Ser for BTreeMap<Key, T> {
    fn ser<S: Serializer>(&self, s: &mut S) -> Result<(), Error> { s.put_entries(self.iter()) }

    fn encoded_len(&self) -> usize {
        2 + self
            .iter()
            .map(|(k, v)| k.encoded_len() + v.encoded_len())
            .sum::<usize>()
    }
}

impl<T: Ser> Ser for [T] {
    fn ser<S: Serializer>(&self, s: &mut S) -> Result<(), Error> { s.put_list(self) }

    fn encoded_len(&self) -> usize { 2 + self.iter().map(Ser::encoded_len).sum::<usize>() }
}

impl<T: Ser + ?Sized> Ser for &T {
    fn ser<S: Serializer>(&self, s: &mut S) -> Result<(), Error> { (**self).ser(s) }

    fn encoded_len(&self) -> usize { (**self).encoded_len() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn enc<T: Ser>(t: T) -> Vec<u8> {
        let mut out = Vec::new();
        t.ser(&mut out).unwrap();
        out
    }

    #[test]
    fn length_prefixes_are_byte_lengths() {
        // two bytes per character
        assert_eq!(enc(Value::from("ÅÅ")), "u4:ÅÅ".as_bytes());
        assert_eq!(enc(Value::from("")), b"u0:");
        assert_eq!(enc(Value::Binary(Bytes::new())), b"0:");
    }

    #[test]
    fn integers_are_minimal() {
        assert_eq!(enc(Value::from(0)), b"i0e");
        assert_eq!(enc(Value::from(-1)), b"i-1e");
        assert_eq!(enc(Value::from(1000)), b"i1000e");
        let big = BigInt::parse_bytes(b"-123456789012345678901234567890", 10).unwrap();
        assert_eq!(
            enc(Value::Integer(big)),
            &b"i-123456789012345678901234567890e"[..]
        );
    }

    #[test]
    fn hash_maps_are_sorted_before_emission() {
        let mut m: HashMap<Key, Value> = HashMap::new();
        m.insert(Key::text("c"), Value::from(3));
        m.insert(Key::binary(b"b"), Value::from(2));
        m.insert(Key::binary(b"a"), Value::from(1));
        assert_eq!(enc(&m), &b"d1:ai1e1:bi2eu1:ci3ee"[..]);

        let bt: BTreeMap<Key, Value> = m.into_iter().collect();
        assert_eq!(enc(&bt), &b"d1:ai1e1:bi2eu1:ci3ee"[..]);
    }

    #[test]
    fn put_entries_rejects_duplicates() {
        let k = Key::text("k");
        let v = Value::Null;
        let mut out = Vec::new();
        let res = out.put_entries(vec![(&k, &v), (&k, &v)]);
        assert!(matches!(res, Err(Error::MalformedDictionary(_))));
        // nothing written
        assert!(out.is_empty());
    }

    #[test]
    fn encoded_len_matches_output() {
        let mut d = Dictionary::new();
        d.insert("text", "héllo");
        d.insert(Bytes::from_static(b"list"), vec![Value::Null, Value::from(-42)]);
        let v = Value::List(vec![
            Value::Dictionary(d),
            Value::Binary(Bytes::from(vec![0u8; 1234])),
            Value::from(true),
        ]);
        assert_eq!(v.encoded_len(), enc(&v).len());
    }

    #[test]
    fn io_sink_passes_errors_through() {
        struct Full;

        impl Write for Full {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "disk full"))
            }

            fn flush(&mut self) -> io::Result<()> { Ok(()) }
        }

        let mut sink = IoSink::new(Full);
        match Value::Null.ser(&mut sink) {
            Err(Error::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::Other),
            other => panic!("expected io error, got {:?}", other),
        }

        let mut sink = IoSink::new(Vec::new());
        Value::from("hi").ser(&mut sink).unwrap();
        assert_eq!(sink.finalize(), b"u2:hi");
    }
}
