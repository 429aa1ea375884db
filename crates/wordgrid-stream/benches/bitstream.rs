//! Criterion micro-benchmarks for the bit stream hot paths.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wordgrid_stream::{BitStream, Cursor};

/// Pack 1000 tile-sized (6-bit) fields.
fn bench_put_bits(c: &mut Criterion) {
    c.bench_function("put_bits_6x1000", |b| {
        b.iter(|| {
            let mut stream = BitStream::with_capacity(768);
            for ii in 0..1000u32 {
                stream.put_bits(6, ii & 0x3F);
            }
            black_box(stream.as_bytes().len());
        });
    });
}

/// Unpack the same 1000 fields.
fn bench_get_bits(c: &mut Criterion) {
    let mut packed = BitStream::new();
    for ii in 0..1000u32 {
        packed.put_bits(6, ii & 0x3F);
    }
    let bytes = packed.into_vec();

    c.bench_function("get_bits_6x1000", |b| {
        b.iter(|| {
            let mut stream = BitStream::from_vec(bytes.clone());
            for _ in 0..1000 {
                black_box(stream.get_bits(6).unwrap());
            }
        });
    });
}

/// Hash a 4 KiB stream up to a mid-bit position.
fn bench_hash(c: &mut Criterion) {
    let mut stream = BitStream::from_vec(vec![0xA5; 4096]);
    stream.set_pos(Cursor::Write, wordgrid_stream::StreamPos(4096 * 8 - 3));
    let pos = stream.pos(Cursor::Write);

    c.bench_function("hash_4k_partial", |b| {
        b.iter(|| {
            black_box(stream.hash_to(pos));
        });
    });
}

criterion_group!(benches, bench_put_bits, bench_get_bits, bench_hash);
criterion_main!(benches);
