use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use georef_core::Correspondence;
use georef_linalg::{fit_polynomial, solve_pair, PolynomialOrder, SquareMatrix};
use rand::Rng;

fn random_points(num_points: usize) -> Vec<Correspondence> {
    let mut rng = rand::rng();
    (0..num_points)
        .map(|_| {
            let p: f64 = rng.random_range(0.0..4096.0);
            let l: f64 = rng.random_range(0.0..4096.0);
            let x = 500_000.0 + 30.0 * p + 0.1 * l + 1e-4 * p * l;
            let y = 4_000_000.0 - 0.2 * p - 30.0 * l + 2e-4 * l * l;
            Correspondence::new([p, l], [x, y])
        })
        .collect()
}

fn bench_solve_pair(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_pair");
    let mut rng = rand::rng();

    for n in [3, 6, 10].iter() {
        let rows = (0..*n)
            .map(|i| {
                (0..*n)
                    .map(|j| {
                        let v: f64 = rng.random_range(-1.0..1.0);
                        if i == j {
                            v + *n as f64
                        } else {
                            v
                        }
                    })
                    .collect()
            })
            .collect::<Vec<Vec<f64>>>();
        let m = SquareMatrix::from_rows(&rows).unwrap();
        let a = vec![1.0; *n];
        let b = vec![2.0; *n];

        group.bench_with_input(BenchmarkId::new("gauss_jordan", n), &m, |bencher, m| {
            bencher.iter(|| std::hint::black_box(solve_pair(m, &a, &b)))
        });
    }
    group.finish();
}

fn bench_fit_polynomial(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit_polynomial");

    for num_points in [10, 100, 1000, 10000].iter() {
        group.throughput(criterion::Throughput::Elements(*num_points as u64));
        let points = random_points(*num_points);

        for order in [PolynomialOrder::First, PolynomialOrder::Second, PolynomialOrder::Third] {
            let id = format!("order{}", order.degree());
            group.bench_with_input(BenchmarkId::new(id, num_points), &points, |b, points| {
                b.iter(|| std::hint::black_box(fit_polynomial(points, [2048.0, 2048.0], order)))
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_solve_pair, bench_fit_polynomial);
criterion_main!(benches);
