use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use tapeworn::{Engine, EngineHandle, Mode, ParamId};

const SAMPLE_RATE: f32 = 48_000.0;

fn build_engine(buffer_size: usize) -> (Engine, EngineHandle) {
    let (mut engine, handle) = Engine::new(Some(42));
    engine.prepare(SAMPLE_RATE, buffer_size).unwrap();
    (engine, handle)
}

fn bench_engine_defaults(c: &mut Criterion) {
    let mut group = c.benchmark_group("Engine Defaults");

    for &buffer_size in &[64, 128, 512, 2048] {
        group.bench_with_input(
            BenchmarkId::from_parameter(buffer_size),
            &buffer_size,
            |b, &buffer_size| {
                let (mut engine, _) = build_engine(buffer_size);
                let mut left = vec![0.5f32; buffer_size];
                let mut right = vec![0.5f32; buffer_size];

                b.iter(|| {
                    engine
                        .process(black_box(&mut [left.as_mut_slice(), right.as_mut_slice()]))
                        .unwrap();
                });
            },
        );
    }

    group.finish();
}

fn bench_engine_everything_on(c: &mut Criterion) {
    let mut group = c.benchmark_group("Engine All Stages");

    for mode in Mode::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(mode), &mode, |b, &mode| {
            let (mut engine, handle) = build_engine(128);
            let params = handle.parameters();
            for id in ParamId::ALL {
                if id != ParamId::Bypass {
                    params.set(id, id.range().max * 0.6);
                }
            }
            params.set_mode(mode);

            let mut left = vec![0.5f32; 128];
            let mut right = vec![0.5f32; 128];

            b.iter(|| {
                engine
                    .process(black_box(&mut [left.as_mut_slice(), right.as_mut_slice()]))
                    .unwrap();
            });
        });
    }

    group.finish();
}

fn bench_engine_bypass(c: &mut Criterion) {
    c.bench_function("Engine Bypass", |b| {
        let (mut engine, handle) = build_engine(128);
        handle.parameters().set_bypass(true);
        let mut left = vec![0.5f32; 128];
        let mut right = vec![0.5f32; 128];

        b.iter(|| {
            engine
                .process(black_box(&mut [left.as_mut_slice(), right.as_mut_slice()]))
                .unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_engine_defaults,
    bench_engine_everything_on,
    bench_engine_bypass
);
criterion_main!(benches);
