//! Benchmarks for decision values, voting and probability coupling.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rsvm_infer::{KernelConfig, Model, ModelBuilder, SparseVector, SvmType};

const DIM: usize = 50;
const SV_PER_CLASS: usize = 40;

/// Deterministic pseudo-random sparse vector (every third feature set)
fn synthetic_vector(seed: usize) -> SparseVector {
    let pairs: Vec<(usize, f64)> = (0..DIM)
        .filter(|i| (i + seed) % 3 == 0)
        .map(|i| (i + 1, (((i * 31 + seed * 17) % 97) as f64) / 48.5 - 1.0))
        .collect();
    SparseVector::from_pairs(&pairs)
}

fn synthetic_model(class_count: usize, kernel: KernelConfig) -> Model {
    let total = class_count * SV_PER_CLASS;
    let support_vectors = (0..total).map(synthetic_vector).collect();
    let dual_coefficients = (0..class_count - 1)
        .map(|row| {
            (0..total)
                .map(|v| if (v + row) % 2 == 0 { 0.5 } else { -0.5 })
                .collect()
        })
        .collect();
    let pairs = class_count * (class_count - 1) / 2;

    ModelBuilder::new(SvmType::CSvc, kernel)
        .class_labels((0..class_count).map(|c| c as f64).collect())
        .support_vector_counts(vec![SV_PER_CLASS; class_count])
        .support_vectors(support_vectors)
        .dual_coefficients(dual_coefficients)
        .rho(vec![0.1; pairs])
        .probability(vec![-1.5; pairs], vec![0.05; pairs])
        .build()
        .expect("synthetic model is valid")
}

fn bench_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict");
    let query = synthetic_vector(1234);

    for class_count in [2, 5, 10].iter() {
        let model = synthetic_model(*class_count, KernelConfig::rbf(0.1));
        group.bench_with_input(
            BenchmarkId::from_parameter(class_count),
            class_count,
            |b, _| b.iter(|| model.predict(black_box(&query)).unwrap()),
        );
    }

    group.finish();
}

fn bench_predict_probabilities(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict_probabilities");
    let query = synthetic_vector(4321);

    for class_count in [2, 5, 10].iter() {
        let model = synthetic_model(*class_count, KernelConfig::rbf(0.1));
        group.bench_with_input(
            BenchmarkId::from_parameter(class_count),
            class_count,
            |b, _| b.iter(|| model.predict_probabilities(black_box(&query)).unwrap()),
        );
    }

    group.finish();
}

fn bench_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("decision_values_by_kernel");
    let query = synthetic_vector(99);

    let kernels = [
        KernelConfig::linear(),
        KernelConfig::polynomial(3, 0.1, 1.0),
        KernelConfig::rbf(0.1),
        KernelConfig::sigmoid(0.01, -0.5),
    ];
    for kernel in kernels {
        let model = synthetic_model(3, kernel);
        group.bench_function(kernel.kernel_type.name(), |b| {
            b.iter(|| model.decision_values(black_box(&query)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_predict, bench_predict_probabilities, bench_kernels);
criterion_main!(benches);
