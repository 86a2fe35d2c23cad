use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use svmtune::classifier::OneVsOneClassifier;
use svmtune::core::Sample;
use svmtune::kernel::{Kernel, KernelSpec};
use svmtune::tuning::{FoldStrategy, GridSearch, KernelFamily, ParamGrid};

/// Deterministic pseudo-random points in three overlapping clusters
fn samples(n: usize, dim: usize) -> Vec<Sample<u8>> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state % 10_000) as f64 / 10_000.0
    };
    (0..n)
        .map(|i| {
            let label = (i % 3) as u8;
            let features = (0..dim).map(|_| label as f64 + 1.5 * next()).collect();
            Sample::new(features, label)
        })
        .collect()
}

fn bench_kernels(c: &mut Criterion) {
    let data = samples(2, 64);
    let (x, y) = (&data[0].features, &data[1].features);
    let kernels = [
        KernelSpec::Linear,
        KernelSpec::Polynomial {
            degree: 3,
            gamma: 0.1,
            coef0: 1.0,
        },
        KernelSpec::Rbf { gamma: 0.1 },
        KernelSpec::Sigmoid {
            gamma: 0.01,
            coef0: 0.0,
        },
    ];

    let mut group = c.benchmark_group("kernel_compute");
    for kernel in kernels {
        group.bench_with_input(BenchmarkId::from_parameter(kernel.name()), &kernel, |b, k| {
            b.iter(|| k.compute(black_box(x), black_box(y)))
        });
    }
    group.finish();
}

fn bench_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("one_vs_one_fit");
    for n in [60, 150, 300] {
        let data = samples(n, 4);
        group.bench_with_input(BenchmarkId::from_parameter(n), &data, |b, data| {
            b.iter(|| {
                OneVsOneClassifier::default()
                    .fit(black_box(data), KernelSpec::Rbf { gamma: 0.5 }, 1.0)
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_grid_search(c: &mut Criterion) {
    let data = samples(150, 4);
    let grid = ParamGrid::new(vec![0.1, 1.0, 10.0]).with_gammas(vec![0.1, 1.0]);
    let search = GridSearch::new()
        .with_folds(5)
        .with_fold_strategy(FoldStrategy::Shuffled { seed: 7 });

    c.bench_function("grid_search_rbf_6x5", |b| {
        b.iter(|| search.tune(black_box(&data), KernelFamily::Rbf, &grid).unwrap())
    });
}

criterion_group!(benches, bench_kernels, bench_training, bench_grid_search);
criterion_main!(benches);
