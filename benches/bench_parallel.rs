use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use bitopt::{
    fitness::Bit, mimic::DependencyModel, population::Population, rng::RandomNumberGenerator,
    state::BitStringState,
};

// Deliberately slow evaluator so that threading overhead is amortized
fn slow_count_ones(bits: &[Bit]) -> f64 {
    (0..50)
        .map(|round| {
            bits.iter()
                .enumerate()
                .map(|(i, &b)| ((i + round) % 3) as f64 * b as f64)
                .sum::<f64>()
        })
        .sum()
}

fn bench_population_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("population_generate");

    for size in [100, 1000, 5000].iter() {
        group.bench_with_input(BenchmarkId::new("sequential", size), size, |b, &size| {
            let mut rng = RandomNumberGenerator::from_seed(7);
            let mut population = Population::new(64, slow_count_ones)
                .unwrap()
                .with_parallel_threshold(usize::MAX);
            b.iter(|| population.generate(black_box(size), &mut rng).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("parallel", size), size, |b, &size| {
            let mut rng = RandomNumberGenerator::from_seed(7);
            let mut population = Population::new(64, slow_count_ones)
                .unwrap()
                .with_parallel_threshold(1);
            b.iter(|| population.generate(black_box(size), &mut rng).unwrap());
        });
    }

    group.finish();
}

fn bench_best_neighbor(c: &mut Criterion) {
    let mut group = c.benchmark_group("best_neighbor");

    for length in [256, 2048].iter() {
        let mut rng = RandomNumberGenerator::from_seed(3);
        let mut state = BitStringState::new(*length, slow_count_ones).unwrap();
        state.randomize(&mut rng);

        let sequential = state.clone().with_parallel_threshold(usize::MAX);
        group.bench_with_input(BenchmarkId::new("sequential", length), length, |b, _| {
            b.iter(|| sequential.best_neighbor())
        });

        let parallel = state.with_parallel_threshold(1);
        group.bench_with_input(BenchmarkId::new("parallel", length), length, |b, _| {
            b.iter(|| parallel.best_neighbor())
        });
    }

    group.finish();
}

fn bench_parallel_sampling(c: &mut Criterion) {
    let elite: Vec<Vec<Bit>> = {
        let mut rng = RandomNumberGenerator::from_seed(11);
        (0..200).map(|_| rng.random_bits(128)).collect()
    };
    let model = DependencyModel::fit(128, &elite).unwrap();
    let mut group = c.benchmark_group("sample_rows");

    for (name, threshold) in [("sequential", usize::MAX), ("parallel", 1)] {
        let model = model.clone().with_parallel_threshold(threshold);
        let mut rng = RandomNumberGenerator::from_seed(5);
        group.bench_function(name, |b| {
            b.iter(|| model.generate_new_sample(black_box(5000), &mut rng))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_population_generate,
    bench_best_neighbor,
    bench_parallel_sampling
);
criterion_main!(benches);
