//! Feature pipeline benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use feature_engine::{FeaturePipeline, RawInput, ScalingParams};

fn bench_transform(c: &mut Criterion) {
    let pipeline = FeaturePipeline::with_params(ScalingParams::identity());
    let input = RawInput {
        age: 52,
        height: 174.0,
        weight: 96.5,
        diabetes: 1,
        blood_pressure_problems: 1,
        number_of_major_surgeries: 2,
        ..Default::default()
    };

    let mut group = c.benchmark_group("feature_pipeline");

    group.bench_function("transform", |b| {
        b.iter(|| pipeline.transform(black_box(&input)))
    });

    group.bench_function("derive", |b| {
        b.iter(|| pipeline.derive(black_box(&input)))
    });

    group.finish();
}

criterion_group!(benches, bench_transform);
criterion_main!(benches);
