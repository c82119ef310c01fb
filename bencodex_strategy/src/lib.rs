use bencodex::{
    dictionary::{Dictionary, Key},
    Value,
};
use bytes::Bytes;
use num_bigint::BigInt;
use num_traits::Num;
use proptest::prelude::*;

/// arbitrary Integer beyond the 64-bit range for use with proptest
pub fn arb_bigint() -> impl Strategy<Value = BigInt> {
    "-?1[0-1]{63,100}".prop_map(|n| -> BigInt { BigInt::from_str_radix(&n, 2).unwrap() })
}

/// arbitrary Bytes for use with proptest
pub fn arb_bytes() -> impl Strategy<Value = Bytes> {
    prop::collection::vec(any::<u8>(), 0..64).prop_map(Bytes::from)
}

/// arbitrary text for use with proptest
pub fn arb_text() -> impl Strategy<Value = String> { ".{0,32}" }

/// arbitrary dictionary Key for use with proptest
pub fn arb_key() -> impl Strategy<Value = Key> {
    prop_oneof![
        arb_bytes().prop_map(Key::Binary),
        arb_text().prop_map(Key::Text),
        // short keys collide across kinds
        "[ab]{0,2}".prop_map(|s| Key::binary(s.as_bytes())),
        "[ab]{0,2}".prop_map(Key::Text),
    ]
}

/// arbitrary Value for use with proptest
pub fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        // integers
        any::<i8>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        any::<i128>().prop_map(Value::from),
        arb_bigint().prop_map(Value::from),
        // strings
        arb_bytes().prop_map(Value::from),
        arb_text().prop_map(Value::from),
    ];
    leaf.prop_recursive(
        8,  // max depth
        64, // max nodes
        10, // max items per collection
        |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..10).prop_map(Value::List),
                prop::collection::btree_map(arb_key(), inner, 0..10)
                    .prop_map(|m| Value::Dictionary(Dictionary::from(m)))
            ]
        },
    )
}
