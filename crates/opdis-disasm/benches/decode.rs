//! Benchmarks for trie construction and instruction decoding.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use opdis_disasm::{build_trie, Decoder};
use opdis_ref::{load_reference_str, Mode};

const FIXTURE: &str = include_str!("../tests/fixtures/x86_subset.xml");

/// A small function body with prefixes, ModR/M forms, immediates and
/// short jumps.
#[rustfmt::skip]
const CODE: &[u8] = &[
    0x64, 0x8B, 0x04, 0x25, 0xD4, 0x02, 0x00, 0x00,
    0x85, 0xF6,
    0x75, 0x2C,
    0xB8, 0xBA, 0x00, 0x00, 0x00,
    0x0F, 0x05,
    0x48, 0x63, 0xD7,
    0x48, 0x3D, 0x00, 0xF0, 0xFF, 0xFF,
    0xF3, 0xC3,
    0x0F, 0x1F, 0x00,
    0x48, 0x8B, 0x15, 0x2F, 0xF7, 0x34, 0x00,
    0x83, 0xC8, 0xFF,
    0xC3,
];

fn generate_block(size: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(size);
    while out.len() < size {
        let remaining = size - out.len();
        out.extend_from_slice(&CODE[..remaining.min(CODE.len())]);
    }
    out
}

fn bench_load_and_build(c: &mut Criterion) {
    c.bench_function("load_reference", |b| {
        b.iter(|| load_reference_str(black_box(FIXTURE)).unwrap())
    });

    let reference = load_reference_str(FIXTURE).unwrap();
    c.bench_function("build_trie", |b| {
        b.iter(|| build_trie(black_box(&reference)).unwrap())
    });
}

fn bench_decode(c: &mut Criterion) {
    let reference = load_reference_str(FIXTURE).unwrap();
    let trie = build_trie(&reference).unwrap();
    let decoder = Decoder::new(&reference, &trie, Mode::E);

    let mut group = c.benchmark_group("decode");

    group.bench_function("single_instruction", |b| {
        b.iter(|| decoder.decode_one(black_box(&[0x48, 0x89, 0xE5])))
    });

    group.bench_function("small_function", |b| {
        b.iter(|| decoder.decode(black_box(CODE)).count())
    });

    for size in [1024, 16384, 65536] {
        let code = generate_block(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("throughput", size), &code, |b, code| {
            b.iter(|| decoder.decode(black_box(code)).count())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_load_and_build, bench_decode);
criterion_main!(benches);
