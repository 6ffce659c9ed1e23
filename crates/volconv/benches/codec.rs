mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use volconv::codec::{decode_binary, encode_to_vec};
use volconv::convert::sample_grid;
use volconv::volume::VolumeFormat;

const SIZES: [i32; 3] = [16, 48, 96];
const FORMATS: [VolumeFormat; 2] = [VolumeFormat::Binary, VolumeFormat::Ascii];

fn encode_benches(c: &mut Criterion) {
    for format in FORMATS {
        let mut group = c.benchmark_group(format!("codec/encode/{format}"));

        for &size in &SIZES {
            let volume = sample_grid(&common::sparse_ball(size)).expect("ball is not empty");
            group.throughput(common::elements_throughput(volume.len()));

            group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
                b.iter(|| {
                    let bytes = encode_to_vec(&volume, format).expect("in-memory encode");
                    black_box(bytes.len());
                });
            });
        }

        group.finish();
    }
}

fn decode_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec/decode/binary");

    for &size in &SIZES {
        let volume = sample_grid(&common::sparse_ball(size)).expect("ball is not empty");
        let bytes = encode_to_vec(&volume, VolumeFormat::Binary).expect("in-memory encode");
        group.throughput(common::elements_throughput(volume.len()));

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let decoded = decode_binary(&mut bytes.as_slice()).expect("valid volume");
                black_box(decoded.len());
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = encode_benches, decode_benches
}
criterion_main!(benches);
