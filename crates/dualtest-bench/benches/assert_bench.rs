//! Comparison engine benchmarks: whole tests run into a discarding sink.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use dualtest_core::{EngineConfig, NoFixture, NullSink, NumberKind, TestContext};

fn bench_int_array(c: &mut Criterion) {
    let sizes: &[usize] = &[16, 256, 4096];
    let mut group = c.benchmark_group("assert_equal_int_array");

    for &size in sizes {
        let expected: Vec<u32> = (0..size as u32).collect();
        let actual = expected.clone();
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("equal", size), &size, |b, &n| {
            b.iter(|| {
                let mut sink = NullSink;
                let mut ctx = TestContext::new(&mut sink, "bench.c", EngineConfig::default());
                let verdict = ctx.run_test(&mut NoFixture, "int_array", 1, |ctx| {
                    ctx.assert_equal_int_array(
                        Some(&expected[..]),
                        Some(&actual[..]),
                        n,
                        None,
                        2,
                        NumberKind::Unsigned,
                    )
                });
                black_box(verdict);
            });
        });
    }
    group.finish();
}

fn bench_memory(c: &mut Criterion) {
    let sizes: &[usize] = &[64, 1024, 65536];
    let mut group = c.benchmark_group("assert_equal_memory");

    for &size in sizes {
        let expected = vec![0xAB_u8; size];
        let mut actual = expected.clone();
        if let Some(last) = actual.last_mut() {
            *last = 0;
        }
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("last_byte_differs", size), &size, |b, &n| {
            b.iter(|| {
                let mut sink = NullSink;
                let mut ctx = TestContext::new(&mut sink, "bench.c", EngineConfig::default());
                let verdict = ctx.run_test(&mut NoFixture, "memory", 1, |ctx| {
                    ctx.assert_equal_memory(Some(&expected[..]), Some(&actual[..]), n, 1, None, 2)
                });
                black_box(verdict);
            });
        });
    }
    group.finish();
}

fn bench_float_within(c: &mut Criterion) {
    let expected: Vec<f64> = (0..1024).map(|i| f64::from(i) * 0.5).collect();
    let actual: Vec<f64> = expected.iter().map(|v| v + 1e-15).collect();
    c.bench_function("assert_equal_double_array/1024", |b| {
        b.iter(|| {
            let mut sink = NullSink;
            let mut ctx = TestContext::new(&mut sink, "bench.c", EngineConfig::default());
            let verdict = ctx.run_test(&mut NoFixture, "doubles", 1, |ctx| {
                ctx.assert_equal_double_array(
                    Some(&expected[..]),
                    Some(&actual[..]),
                    expected.len(),
                    None,
                    2,
                )
            });
            black_box(verdict);
        });
    });
}

criterion_group!(benches, bench_int_array, bench_memory, bench_float_within);
criterion_main!(benches);
