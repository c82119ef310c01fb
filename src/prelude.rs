pub use crate::{
    dictionary::{Dictionary, Key},
    encoding::{
        decode, decode_all, decode_full, decode_with, encode, encode_full, encoded_len,
        BencodexBytes, ByteSource, DecodeOptions, Decoder, IoSink, IoSource, Ser, Serializer,
        SerializerExt,
    },
    errors::Error,
    rep::*,
    Value, ValueKind,
};
pub use bytes::Bytes;
pub use num_bigint::BigInt;
pub use num_traits::{Num, ToPrimitive};
