use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::hint::black_box;

use tapeworn::Mode;
use tapeworn::ParamValues;
use tapeworn::degrade::{BlockControls, DegradationChain, FilterSettings, FilterStage, Smoothers};

const SAMPLE_RATE: f32 = 48_000.0;
const BUFFER_SIZE: usize = 128;

fn heavy_values(mode: Mode) -> ParamValues {
    ParamValues {
        bitcrush: 40.0,
        downsample: 30.0,
        noise: 40.0,
        crackle: 40.0,
        wobble: 60.0,
        dropout: 40.0,
        saturation: 60.0,
        age: 60.0,
        mode,
        ..ParamValues::default()
    }
}

fn bench_chain_per_mode(c: &mut Criterion) {
    let mut group = c.benchmark_group("Degradation Chain");

    for mode in Mode::ALL {
        group.bench_with_input(
            BenchmarkId::from_parameter(mode),
            &mode,
            |b, &mode| {
                let values = heavy_values(mode);
                let block = BlockControls::from_values(&values);
                let mut smoothers = Smoothers::new(&values);
                smoothers.reset(SAMPLE_RATE, &values);
                let mut chain = DegradationChain::new(SAMPLE_RATE);
                let mut rng = StdRng::seed_from_u64(0);
                let mut frames = vec![smoothers.next_frame(&block); BUFFER_SIZE];
                let mut left = vec![0.5f32; BUFFER_SIZE];
                let mut right = vec![0.5f32; BUFFER_SIZE];

                b.iter(|| {
                    chain.begin_block(&block);
                    for (i, frame) in frames.iter_mut().enumerate() {
                        *frame = smoothers.next_frame(&block);
                        chain.fill_frame(i, frame, &block, &mut rng);
                    }
                    chain.process_channel(0, black_box(&mut left), &frames, &block, &mut rng);
                    chain.process_channel(1, black_box(&mut right), &frames, &block, &mut rng);
                    chain.end_block(BUFFER_SIZE);
                });
            },
        );
    }

    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("Filter Stage");

    for &drive in &[0.0, 50.0] {
        group.bench_with_input(
            BenchmarkId::new("drive", drive),
            &drive,
            |b, &drive| {
                let mut filter = FilterStage::new(SAMPLE_RATE);
                let mut buffer = vec![0.5f32; BUFFER_SIZE];
                let profile = Mode::Cassette.profile();

                b.iter(|| {
                    filter.configure(&FilterSettings::new(80.0, 20.0, drive, profile));
                    filter.process_channel(0, black_box(&mut buffer));
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_chain_per_mode, bench_filter);
criterion_main!(benches);
