#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};

use bencodex::prelude::*;

pub fn u64_to_bytes_le(x: u64) -> Bytes { Bytes::from(u64::to_le_bytes(x).to_vec()) }

const N_BIG_LIST: usize = 2000;

fn big_list() -> Value { Value::from((0..N_BIG_LIST as u64).collect::<Vec<_>>()) }

const N_LIST: usize = 10;
const N_DICT: usize = 10;

fn big_v() -> Value {
    let v0: Vec<Value> = (0..N_LIST).map(Value::from).collect();
    let d: Dictionary = (0..N_DICT)
        .map(|i| {
            let key = if i % 2 == 0 {
                Key::Binary(u64_to_bytes_le(i as u64))
            } else {
                Key::text(format!("key {}", i))
            };
            (key, Value::List(v0.clone()))
        })
        .collect();
    let v: Vec<Value> = std::iter::repeat(d).map(Value::from).take(N_LIST).collect();
    Value::from(v)
}

fn bench_construction(c: &mut Criterion) {
    c.bench_function(
        &format!("Creating a value of encoded size {}", encoded_len(&big_v())),
        |b| b.iter(|| black_box(big_v())),
    );
}

fn bench_enc(c: &mut Criterion) {
    let big_v = big_v();
    let enc_len = encoded_len(&big_v);
    c.bench_function(
        &format!("Encoding a value, output size of {} bytes", enc_len),
        move |b| b.iter(|| encode_full(black_box(&big_v))),
    );
}

fn bench_enc_single_alloc(c: &mut Criterion) {
    let big_v = big_v();
    let enc_len = encoded_len(&big_v);
    c.bench_function(
        &format!(
            "Encoding a value, output size of {} bytes, buffer preallocated",
            enc_len
        ),
        move |b| {
            b.iter(|| {
                let mut out = Vec::with_capacity(enc_len);
                encode(black_box(&big_v), &mut out).map(|_| out)
            })
        },
    );
}

fn bench_dec(c: &mut Criterion) {
    let enc = Bytes::from(encode_full(&big_v()).unwrap());
    c.bench_function(
        &format!("Decoding a value, input size of {} bytes", enc.len()),
        move |b| b.iter(|| decode_full(black_box(enc.clone())).unwrap()),
    );
}

fn bench_dec_reader(c: &mut Criterion) {
    let enc = encode_full(&big_v()).unwrap();
    c.bench_function(
        &format!("Decoding a value from a reader, input size of {} bytes", enc.len()),
        move |b| b.iter(|| decode(&mut IoSource::new(black_box(&enc[..]))).unwrap()),
    );
}

fn bench_enc_flat(c: &mut Criterion) {
    let big_list = big_list();
    let enc_len = encoded_len(&big_list);
    c.bench_function(
        &format!("Encoding a list, output size of {} bytes", enc_len),
        move |b| b.iter(|| encode_full(black_box(&big_list))),
    );
}

fn bench_dec_flat(c: &mut Criterion) {
    let enc = Bytes::from(encode_full(&big_list()).unwrap());
    c.bench_function(
        &format!("Decoding a list of length {}", N_BIG_LIST),
        move |b| b.iter(|| decode_full(black_box(enc.clone())).unwrap()),
    );
}

fn bench_text(c: &mut Criterion) {
    let text = Value::from("가나다라마바사".repeat(1000));
    let enc = Bytes::from(encode_full(&text).unwrap());
    c.bench_function(
        &format!("Decoding text of {} bytes", enc.len()),
        move |b| b.iter(|| decode_full(black_box(enc.clone())).unwrap()),
    );
}

criterion_group!(
    benches,
    bench_construction,
    bench_enc,
    bench_enc_single_alloc,
    bench_dec,
    bench_dec_reader,
    bench_enc_flat,
    bench_dec_flat,
    bench_text
);
criterion_main!(benches);
