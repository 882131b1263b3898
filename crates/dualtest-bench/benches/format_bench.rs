//! Number formatter and value printer benchmarks.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use dualtest_bench::CountingSink;
use dualtest_core::number::{write_decimal, write_hex, write_mask};
use dualtest_core::printer::{print, print_float};
use dualtest_core::{Channel, NullSink};

fn bench_decimal(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_decimal");
    for value in [0_i64, 42, -1_000_000, i64::MIN] {
        group.bench_with_input(BenchmarkId::from_parameter(value), &value, |b, &v| {
            b.iter(|| write_decimal(&mut NullSink, Channel::Narrative, black_box(v)));
        });
    }
    group.finish();
}

fn bench_hex_and_mask(c: &mut Criterion) {
    let mut group = c.benchmark_group("hex_mask");
    for nibbles in [2_u8, 4, 8, 16] {
        group.bench_with_input(BenchmarkId::new("hex", nibbles), &nibbles, |b, &n| {
            b.iter(|| write_hex(&mut NullSink, Channel::Narrative, black_box(u64::MAX), n));
        });
    }
    for bits in [8_u32, 32, 64] {
        group.bench_with_input(BenchmarkId::new("mask", bits), &bits, |b, &w| {
            b.iter(|| {
                write_mask(
                    &mut NullSink,
                    Channel::Narrative,
                    black_box(0x0F0F_0F0F_0F0F_0F0F),
                    black_box(0xA5A5_A5A5_A5A5_A5A5),
                    w,
                );
            });
        });
    }
    group.finish();
}

fn bench_print_text(c: &mut Criterion) {
    let sizes: &[usize] = &[16, 256, 4096];
    let mut group = c.benchmark_group("print");

    for &size in sizes {
        let plain = vec![b'a'; size];
        let escaped: Vec<u8> = (0..size).map(|i| (i % 256) as u8).collect();
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("printable", size), &plain, |b, text| {
            b.iter(|| {
                let mut sink = CountingSink::default();
                print(&mut sink, Channel::Narrative, Some(text));
                black_box(sink.narrative);
            });
        });
        group.bench_with_input(BenchmarkId::new("escaped", size), &escaped, |b, text| {
            b.iter(|| {
                let mut sink = CountingSink::default();
                print(&mut sink, Channel::Structured, Some(text));
                black_box(sink.structured);
            });
        });
    }
    group.finish();
}

fn bench_float(c: &mut Criterion) {
    c.bench_function("print_float", |b| {
        b.iter(|| print_float(&mut NullSink, Channel::Narrative, black_box(-1234.5678)));
    });
}

criterion_group!(
    benches,
    bench_decimal,
    bench_hex_and_mask,
    bench_print_text,
    bench_float
);
criterion_main!(benches);
