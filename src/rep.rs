use crate::{
    dictionary::{Dictionary, Key},
    Value,
    Value::*,
};
use bytes::Bytes;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use std::{
    collections::{BTreeMap, HashMap},
    fmt::Debug,
    hash::BuildHasher,
    net::Ipv4Addr,
    vec::IntoIter,
};

/// A value representable as a Bencodex [`Value`].
pub trait BencodexRep: Clone + Sized {
    /// Converts value into a [`Value`].
    ///
    /// # Example
    ///
    /// ```
    /// use bencodex::rep::*;
    ///
    /// let v = 1.to_bencodex();
    /// ```
    fn to_bencodex(&self) -> Value { self.clone().into_bencodex() }

    /// Consumes value, converting it into a [`Value`].
    ///
    /// # Example
    ///
    /// ```
    /// use bencodex::rep::*;
    ///
    /// let v = 1.into_bencodex();
    /// ```
    fn into_bencodex(self) -> Value { self.to_bencodex() }

    /// Converts value from a [`Value`], returning `None` if it has the wrong shape.
    ///
    /// # Arguments
    ///
    /// `v: Value` - The value to be converted.
    ///
    /// # Example
    ///
    /// ```
    /// use bencodex::rep::*;
    ///
    /// let v = "foo".to_string().into_bencodex();
    ///
    /// assert_eq!(String::from_bencodex(v).unwrap(), "foo");
    /// ```
    fn from_bencodex(v: Value) -> Option<Self>;
}

impl BencodexRep for Value {
    fn into_bencodex(self) -> Value { self }

    fn from_bencodex(v: Value) -> Option<Self> { Some(v) }
}

impl BencodexRep for () {
    fn into_bencodex(self) -> Value { Null }

    fn from_bencodex(v: Value) -> Option<()> {
        if v.is_null() {
            Some(())
        } else {
            None
        }
    }
}

impl BencodexRep for bool {
    fn into_bencodex(self) -> Value { Boolean(self) }

    fn from_bencodex(v: Value) -> Option<bool> { v.to_bool() }
}

impl BencodexRep for BigInt {
    fn into_bencodex(self) -> Value { Integer(self) }

    fn to_bencodex(&self) -> Value { Integer(self.clone()) }

    fn from_bencodex(v: Value) -> Option<BigInt> { v.into_integer() }
}

macro_rules! int_rep {
    ($t:ty, $to:ident) => {
        impl BencodexRep for $t {
            fn into_bencodex(self) -> Value { Integer(BigInt::from(self)) }

            fn from_bencodex(v: Value) -> Option<$t> { v.to_integer()?.$to() }
        }
    };
}

int_rep!(u8, to_u8);
int_rep!(u16, to_u16);
int_rep!(u32, to_u32);
int_rep!(u64, to_u64);
int_rep!(u128, to_u128);
int_rep!(usize, to_usize);
int_rep!(i8, to_i8);
int_rep!(i16, to_i16);
int_rep!(i32, to_i32);
int_rep!(i64, to_i64);
int_rep!(i128, to_i128);
int_rep!(isize, to_isize);

impl BencodexRep for Bytes {
    fn into_bencodex(self) -> Value { Binary(self) }

    fn from_bencodex(v: Value) -> Option<Bytes> { v.into_binary() }
}

impl BencodexRep for String {
    fn into_bencodex(self) -> Value { Text(self) }

    fn from_bencodex(v: Value) -> Option<Self> { v.into_text() }
}

impl<T: BencodexRep> BencodexRep for Vec<T> {
    fn into_bencodex(self) -> Value { List(self.into_iter().map(T::into_bencodex).collect()) }

    fn to_bencodex(&self) -> Value { List(self.iter().map(T::to_bencodex).collect()) }

    fn from_bencodex(v: Value) -> Option<Self> {
        v.into_list()?.into_iter().map(T::from_bencodex).collect()
    }
}

fn text_keyed<'a, T: BencodexRep + 'a, I>(entries: I) -> Value
where
    I: Iterator<Item = (&'a String, &'a T)>,
{
    Value::Dictionary(
        entries
            .map(|(k, v)| (Key::text(k.as_str()), v.to_bencodex()))
            .collect(),
    )
}

fn from_text_keyed<T: BencodexRep>(v: Value) -> Option<Vec<(String, T)>> {
    v.into_dictionary()?
        .into_iter()
        .map(|(k, v)| match k {
            Key::Text(s) => Some((s, T::from_bencodex(v)?)),
            Key::Binary(_) => None,
        })
        .collect()
}

impl<T: BencodexRep> BencodexRep for BTreeMap<String, T> {
    fn to_bencodex(&self) -> Value { text_keyed(self.iter()) }

    fn from_bencodex(v: Value) -> Option<Self> {
        Some(from_text_keyed(v)?.into_iter().collect())
    }
}

impl<T: BencodexRep, S: BuildHasher + Default + Clone> BencodexRep for HashMap<String, T, S> {
    fn to_bencodex(&self) -> Value { text_keyed(self.iter()) }

    fn from_bencodex(v: Value) -> Option<Self> {
        Some(from_text_keyed(v)?.into_iter().collect())
    }
}

impl<T: BencodexRep> BencodexRep for BTreeMap<Bytes, T> {
    fn into_bencodex(self) -> Value {
        Value::Dictionary(
            self.into_iter()
                .map(|(k, v)| (Key::Binary(k), v.into_bencodex()))
                .collect(),
        )
    }

    fn to_bencodex(&self) -> Value {
        Value::Dictionary(
            self.iter()
                .map(|(k, v)| (Key::Binary(k.clone()), v.to_bencodex()))
                .collect(),
        )
    }

    fn from_bencodex(v: Value) -> Option<Self> {
        v.into_dictionary()?
            .into_iter()
            .map(|(k, v)| match k {
                Key::Binary(bs) => Some((bs, T::from_bencodex(v)?)),
                Key::Text(_) => None,
            })
            .collect()
    }
}

impl<A: BencodexRep, B: BencodexRep> BencodexRep for (A, B) {
    fn into_bencodex(self) -> Value { List(vec![self.0.into_bencodex(), self.1.into_bencodex()]) }

    fn from_bencodex(v: Value) -> Option<Self> {
        let mut iter = exact_list(v, 2)?;
        Some((pop_bencodex(&mut iter)?, pop_bencodex(&mut iter)?))
    }
}

impl<A: BencodexRep, B: BencodexRep, C: BencodexRep> BencodexRep for (A, B, C) {
    fn into_bencodex(self) -> Value {
        List(vec![
            self.0.into_bencodex(),
            self.1.into_bencodex(),
            self.2.into_bencodex(),
        ])
    }

    fn from_bencodex(v: Value) -> Option<Self> {
        let mut iter = exact_list(v, 3)?;
        Some((
            pop_bencodex(&mut iter)?,
            pop_bencodex(&mut iter)?,
            pop_bencodex(&mut iter)?,
        ))
    }
}

impl<A: BencodexRep, B: BencodexRep, C: BencodexRep, D: BencodexRep> BencodexRep
    for (A, B, C, D)
{
    fn into_bencodex(self) -> Value {
        List(vec![
            self.0.into_bencodex(),
            self.1.into_bencodex(),
            self.2.into_bencodex(),
            self.3.into_bencodex(),
        ])
    }

    fn from_bencodex(v: Value) -> Option<Self> {
        let mut iter = exact_list(v, 4)?;
        Some((
            pop_bencodex(&mut iter)?,
            pop_bencodex(&mut iter)?,
            pop_bencodex(&mut iter)?,
            pop_bencodex(&mut iter)?,
        ))
    }
}

fn exact_list(v: Value, len: usize) -> Option<IntoIter<Value>> {
    let items = v.into_list()?;
    if items.len() == len {
        Some(items.into_iter())
    } else {
        None
    }
}

impl<T: BencodexRep> BencodexRep for Option<T> {
    fn into_bencodex(self) -> Value {
        match self {
            Some(x) => List(vec![x.into_bencodex()]),
            None => Null,
        }
    }

    fn to_bencodex(&self) -> Value {
        match self {
            Some(x) => List(vec![x.to_bencodex()]),
            None => Null,
        }
    }

    fn from_bencodex(v: Value) -> Option<Self> {
        match v {
            Null => Some(None),
            List(l) => {
                let mut iter = l.into_iter();
                let val = iter.next()?;
                if iter.next().is_none() {
                    Some(Some(T::from_bencodex(val)?))
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

impl BencodexRep for Ipv4Addr {
    fn into_bencodex(self) -> Value { Binary(Bytes::from(&self.octets()[..])) }

    fn from_bencodex(v: Value) -> Option<Self> {
        let bs = v.into_binary()?;
        if bs.len() != 4 {
            None
        } else {
            Some(Ipv4Addr::new(bs[0], bs[1], bs[2], bs[3]))
        }
    }
}

/// Manually specify how the fields of a struct should be converted to a [`Value`].
///
/// Fields become a dictionary keyed by their names as text.
///
/// # Arguments
///
/// * `entries: Vec<(&str, Value)>` - Pairs containing the name of the field and the value.
///
/// # Example
///
/// ```
/// use bencodex::{rep::*, Value};
///
/// #[derive(Clone)]
/// struct Peer {
///     name: String,
///     port: u16,
/// }
///
/// impl BencodexRep for Peer {
///     fn to_bencodex(&self) -> Value {
///         struct_to_bencodex_helper(vec![
///             ("name", self.name.to_bencodex()),
///             ("port", self.port.to_bencodex()),
///         ])
///     }
///
///     fn from_bencodex(v: Value) -> Option<Peer> {
///         let mut fields = struct_from_bencodex_helper(v, &["name", "port"])?.into_iter();
///         Some(Peer {
///             name: pop_bencodex(&mut fields)?,
///             port: pop_bencodex(&mut fields)?,
///         })
///     }
/// }
///
/// let example = Peer {
///     name: "seed".to_string(),
///     port: 31234,
/// };
///
/// let extracted = Peer::from_bencodex(example.to_bencodex()).unwrap();
///
/// assert_eq!(extracted.name, example.name);
/// assert_eq!(extracted.port, example.port);
/// ```
pub fn struct_to_bencodex_helper(entries: Vec<(&str, Value)>) -> Value {
    Value::Dictionary(entries.into_iter().map(|(k, v)| (Key::text(k), v)).collect())
}

/// Manually specify how the fields of a struct should be read from a [`Value`]. See
/// [`struct_to_bencodex_helper`] for an example of usage.
///
/// Returns `None` unless the dictionary has exactly the named fields.
///
/// # Arguments
///
/// * `v: Value` - The dictionary containing the struct data.
/// * `names: &[&str]` - The names of the fields in the order they are to be extracted.
pub fn struct_from_bencodex_helper(v: Value, names: &[&str]) -> Option<Vec<Value>> {
    let mut d = v.into_dictionary()?;
    if d.len() != names.len() {
        return None;
    }
    names.iter().map(|n| d.remove(&Key::text(*n))).collect()
}

/// Helper function to manually specify how the variants of an enum should be converted
/// to a [`Value`].
///
/// A variant becomes a list whose head is the variant's name as text.
///
/// # Arguments
///
/// * `name: &str` - The name of the enum variant.
/// * `fields: Vec<Value>` - The corresponding values.
///
/// # Example
///
/// ```
/// use bencodex::{rep::*, Value};
/// use std::vec::IntoIter;
///
/// #[derive(Clone, Debug, PartialEq)]
/// enum Shape {
///     Circle(u32),
///     Rect(u32, u32),
/// }
///
/// use Shape::*;
///
/// impl BencodexRep for Shape {
///     fn to_bencodex(&self) -> Value {
///         match self {
///             Circle(r) => enum_to_bencodex_helper("Circle", vec![r.to_bencodex()]),
///             Rect(w, h) => {
///                 enum_to_bencodex_helper("Rect", vec![w.to_bencodex(), h.to_bencodex()])
///             }
///         }
///     }
///
///     fn from_bencodex(v: Value) -> Option<Shape> {
///         let fns: Vec<(&str, Box<dyn FnMut(IntoIter<Value>) -> Option<Shape>>)> = vec![
///             (
///                 "Circle",
///                 Box::new(|mut iter: IntoIter<Value>| {
///                     let r = pop_bencodex(&mut iter)?;
///                     if iter.next().is_none() {
///                         Some(Circle(r))
///                     } else {
///                         None
///                     }
///                 }),
///             ),
///             (
///                 "Rect",
///                 Box::new(|mut iter: IntoIter<Value>| {
///                     let w = pop_bencodex(&mut iter)?;
///                     let h = pop_bencodex(&mut iter)?;
///                     if iter.next().is_none() {
///                         Some(Rect(w, h))
///                     } else {
///                         None
///                     }
///                 }),
///             ),
///         ];
///
///         enum_from_bencodex_helper(v, fns)
///     }
/// }
///
/// let rect = Rect(3, 4);
///
/// assert_eq!(Shape::from_bencodex(rect.to_bencodex()), Some(rect));
/// ```
pub fn enum_to_bencodex_helper(name: &str, mut fields: Vec<Value>) -> Value {
    fields.insert(0, Value::from(name));
    List(fields)
}

/// Manually specify how the variants of an enum should be read from a [`Value`]. See
/// [`enum_to_bencodex_helper`] for an example of usage.
pub fn enum_from_bencodex_helper<T: Debug>(
    v: Value,
    fns: Vec<(&str, Box<dyn FnMut(IntoIter<Value>) -> Option<T>>)>,
) -> Option<T> {
    let mut fields = v.into_list()?.into_iter();

    let constructor = fields.next()?.into_text()?;
    for (name, mut f) in fns {
        if constructor == name {
            return f(fields);
        }
    }
    None
}

/// Gets the next element from an iterator of values as `T`.
///
/// # Arguments
///
/// * `iter: &mut IntoIter<Value>` - An iterator of values to be converted into `T`.
///
/// # Example
///
/// ```
/// use bencodex::rep::*;
///
/// let values = vec![1, 2, 3].into_bencodex().into_list().unwrap();
///
/// let first: u8 = pop_bencodex(&mut values.into_iter()).unwrap();
/// assert_eq!(first, 1);
/// ```
pub fn pop_bencodex<T: BencodexRep>(iter: &mut IntoIter<Value>) -> Option<T> {
    T::from_bencodex(iter.next()?)
}

impl BencodexRep for Dictionary {
    fn into_bencodex(self) -> Value { Value::Dictionary(self) }

    fn from_bencodex(v: Value) -> Option<Self> { v.into_dictionary() }
}
