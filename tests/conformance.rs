use bencodex::prelude::*;
use filebuffer::FileBuffer;
use serde_json::Value as Json;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

fn suite_dir() -> PathBuf { Path::new(env!("CARGO_MANIFEST_DIR")).join("testsuite") }

fn files_with_extension(dir: &Path, ext: &str) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().map_or(false, |e| e == ext))
        .collect();
    out.sort();
    out
}

fn json_key(j: &Json) -> Key {
    match json_value(j) {
        Value::Binary(bs) => Key::Binary(bs),
        Value::Text(s) => Key::Text(s),
        other => panic!("not a key: {}", other),
    }
}

fn json_value(j: &Json) -> Value {
    match j["type"].as_str().unwrap() {
        "null" => Value::Null,
        "boolean" => Value::Boolean(j["value"].as_bool().unwrap()),
        "integer" => Value::Integer(
            BigInt::from_str_radix(j["decimal"].as_str().unwrap(), 10).unwrap(),
        ),
        "binary" => Value::Binary(Bytes::from(
            hex::decode(j["hex"].as_str().unwrap()).unwrap(),
        )),
        "text" => Value::Text(j["value"].as_str().unwrap().to_owned()),
        "list" => Value::List(j["values"].as_array().unwrap().iter().map(json_value).collect()),
        "dictionary" => {
            let pairs = j["pairs"]
                .as_array()
                .unwrap()
                .iter()
                .map(|p| (json_key(&p["key"]), json_value(&p["value"])))
                .collect();
            // fixtures list their pairs in canonical order
            Value::Dictionary(Dictionary::from_sorted(pairs).unwrap())
        }
        other => panic!("unknown type {}", other),
    }
}

#[test]
fn valid_fixtures() {
    let dats = files_with_extension(&suite_dir(), "dat");
    assert!(!dats.is_empty());

    for dat in dats {
        let data = FileBuffer::open(&dat).unwrap();
        let json: Json =
            serde_json::from_slice(&fs::read(dat.with_extension("json")).unwrap()).unwrap();
        let expected = json_value(&json);

        let decoded = decode_full(&data[..])
            .unwrap_or_else(|e| panic!("{}: {}", dat.display(), e));
        assert_eq!(decoded, expected, "{}", dat.display());
        assert_eq!(
            encode_full(&expected).unwrap(),
            &data[..],
            "{}",
            dat.display()
        );
    }
}

fn error_name(e: &Error) -> &'static str {
    match e {
        Error::UnexpectedEof => "UnexpectedEof",
        Error::InvalidFormat(_) => "InvalidFormat",
        Error::MalformedInteger(_) => "MalformedInteger",
        Error::MalformedBinary(_) => "MalformedBinary",
        Error::MalformedDictionary(_) => "MalformedDictionary",
        Error::InvalidUtf8(_) => "InvalidUtf8",
        Error::OutOfMemory => "OutOfMemory",
        Error::DepthLimitExceeded(_) => "DepthLimitExceeded",
        Error::TrailingData(_) => "TrailingData",
        Error::Unsupported(_) => "Unsupported",
        Error::Io(_) => "Io",
    }
}

#[test]
fn invalid_fixtures() {
    let dir = suite_dir().join("invalid");
    let expected: BTreeMap<String, String> =
        serde_json::from_slice(&fs::read(dir.join("errors.json")).unwrap()).unwrap();

    let dats = files_with_extension(&dir, "dat");
    assert_eq!(dats.len(), expected.len());

    for dat in dats {
        let name = dat.file_stem().unwrap().to_str().unwrap();
        let data = FileBuffer::open(&dat).unwrap();
        match decode_full(&data[..]) {
            Ok(v) => panic!("{}: accepted as {}", name, v),
            Err(e) => assert_eq!(error_name(&e), expected[name], "{}: {}", name, e),
        }
    }
}

#[test]
fn streamed_from_file() {
    let dat = suite_dir().join("nested.dat");
    let mut source = IoSource::new(fs::File::open(&dat).unwrap());
    let streamed = decode(&mut source).unwrap();
    let mapped = decode_full(&FileBuffer::open(&dat).unwrap()[..]).unwrap();
    assert_eq!(streamed, mapped);
}
