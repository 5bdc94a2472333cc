use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use math_audio_gauss::{SolverConfig, factorize_lu, factorize_plu, reconstruct_lu, solve};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SIZES: [usize; 3] = [32, 64, 128];

fn random_system(n: usize) -> (Array2<f64>, Array1<f64>) {
    let mut rng = StdRng::seed_from_u64(n as u64);
    let mut a = Array2::from_shape_fn((n, n), |_| rng.random_range(-1.0..1.0));
    // diagonally dominant so the unpivoted path never hits a small pivot
    for i in 0..n {
        a[[i, i]] += n as f64;
    }
    let b = Array1::from_shape_fn(n, |_| rng.random_range(-1.0..1.0));
    (a, b)
}

fn bench_plu_solve(c: &mut Criterion) {
    let config = SolverConfig::default();
    let mut group = c.benchmark_group("plu_solve");

    for n in SIZES {
        let (a0, b0) = random_system(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut a = a0.clone();
            let mut x = b0.clone();
            let mut perm = vec![0usize; n];
            b.iter(|| {
                a.assign(&a0);
                x.assign(&b0);
                factorize_plu(&mut a, &mut perm, &config).unwrap();
                solve(&a, &mut x, Some(&perm[..]), &config).unwrap();
                black_box(&x);
            })
        });
    }
    group.finish();
}

fn bench_lu_round_trip(c: &mut Criterion) {
    let config = SolverConfig::default();
    let mut group = c.benchmark_group("lu_round_trip");

    for n in SIZES {
        let (a0, _) = random_system(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            let mut a = a0.clone();
            b.iter(|| {
                a.assign(&a0);
                factorize_lu(&mut a, &config).unwrap();
                reconstruct_lu(black_box(&mut a));
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_plu_solve, bench_lu_round_trip);
criterion_main!(benches);
