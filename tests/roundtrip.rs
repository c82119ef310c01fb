use bencodex::prelude::*;
use bencodex_strategy::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig { cases: 1_000, ..ProptestConfig::default() })]

    #[test]
    fn encode_decode_small(i in proptest::num::i64::ANY) {
        let enc = encode_full(&Value::from(i)).unwrap();
        prop_assert_eq!(&enc, &format!("i{}e", i).into_bytes());

        let dec = decode_full(enc).ok().and_then(|v| v.into_rep::<i64>());
        prop_assert_eq!(dec, Some(i));
    }

    #[test]
    fn encode_decode_large(i in arb_bigint()) {
        let v = Value::from(i);
        let enc = encode_full(&v).unwrap();

        let dec = decode_full(enc.clone());

        if dec.as_ref().ok() != Some(&v) {
            panic!("Tried encoding\n {}\n as \n{:x?}\n got \n{:?}\n", v, enc, dec)
        }
    }

    #[test]
    fn encode_decode(v in arb_value()) {
        let enc = encode_full(&v).unwrap();
        prop_assert_eq!(enc.len(), encoded_len(&v));

        let dec = decode_full(enc.clone()).unwrap();
        prop_assert_eq!(&dec, &v);

        // re-encoding a decoded value reproduces the input byte for byte
        prop_assert_eq!(encode_full(&dec).unwrap(), enc);
    }

    #[test]
    fn sources_agree(v in arb_value()) {
        let enc = encode_full(&v).unwrap();

        let mut slice = &enc[..];
        let from_slice = decode(&mut slice).unwrap();
        prop_assert!(slice.is_empty());

        let mut reader = IoSource::new(&enc[..]);
        let from_reader = decode(&mut reader).unwrap();

        prop_assert_eq!(&from_slice, &v);
        prop_assert_eq!(&from_reader, &v);
    }

    #[test]
    fn sinks_agree(v in arb_value()) {
        let mut sink = IoSink::new(Vec::new());
        encode(&v, &mut sink).unwrap();
        prop_assert_eq!(sink.finalize(), encode_full(&v).unwrap());
    }

    #[test]
    fn equal_values_encode_equally(v in arb_value()) {
        prop_assert_eq!(encode_full(&v.deep_copy()).unwrap(), encode_full(&v).unwrap());
    }

    #[test]
    fn concatenated_values(vs in prop::collection::vec(arb_value(), 0..8)) {
        let mut enc = Vec::new();
        for v in &vs {
            encode(v, &mut enc).unwrap();
        }
        prop_assert_eq!(decode_all(enc).unwrap(), vs);
    }

    #[test]
    fn truncated_input_is_rejected(v in arb_value(), cut in any::<prop::sample::Index>()) {
        let enc = encode_full(&v).unwrap();
        let cut = cut.index(enc.len());
        prop_assert!(decode_full(&enc[..cut]).is_err());
    }

    #[test]
    fn garbage_never_panics(bs in prop::collection::vec(any::<u8>(), 0..64)) {
        if let Ok(v) = decode_full(&bs[..]) {
            // anything accepted is already canonical
            prop_assert_eq!(encode_full(&v).unwrap(), bs);
        }
    }
}
