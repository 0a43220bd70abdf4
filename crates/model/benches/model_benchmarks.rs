//! Benchmarks for ppe-model rolling style analysis.
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use ndarray::{Array1, Array2};
use ppe_model::{RollingConfig, RollingStyleAttribution, SimplexStyleEstimator};
use ppe_primitives::{Date, FactorName, ReturnSeries, StyleFactorMatrix};
use ppe_traits::StyleEstimator;
use rand::Rng;
use rand_distr::{Distribution, Normal};

fn random_styles(n_obs: usize, n_styles: usize) -> Array2<f64> {
    let mut rng = rand::thread_rng();
    let normal = Normal::new(0.0005, 0.01).unwrap();
    Array2::from_shape_fn((n_obs, n_styles), |_| normal.sample(&mut rng))
}

fn random_fund(styles: &Array2<f64>) -> Array1<f64> {
    let mut rng = rand::thread_rng();
    let raw = Array1::from_iter((0..styles.ncols()).map(|_| rng.r#gen::<f64>()));
    let weights = &raw / raw.sum();
    let noise = Normal::new(0.0, 0.002).unwrap();
    styles.dot(&weights).mapv(|r| r + noise.sample(&mut rng))
}

fn inputs(n_obs: usize, n_styles: usize) -> (ReturnSeries, StyleFactorMatrix) {
    let dates: Vec<Date> = Date::from_ymd_opt(2015, 1, 1).unwrap().iter_days().take(n_obs).collect();
    let styles = random_styles(n_obs, n_styles);
    let fund = random_fund(&styles);
    let names = (0..n_styles).map(|k| FactorName::new(format!("style_{k}"))).collect();

    (
        ReturnSeries::new(dates.clone(), fund).unwrap(),
        StyleFactorMatrix::new(dates, names, styles).unwrap(),
    )
}

fn bench_estimate_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("simplex_estimator_window");

    let scenarios = [
        (21, 4, "monthly_window"),
        (63, 6, "quarterly_window"),
        (250, 8, "annual_window"),
        (250, 20, "annual_wide"),
    ];

    for (n_obs, n_styles, name) in scenarios {
        group.throughput(Throughput::Elements((n_obs * n_styles) as u64));
        group.bench_with_input(BenchmarkId::new(name, n_obs), &(n_obs, n_styles), |b, &(n, k)| {
            let styles = random_styles(n, k);
            let fund = random_fund(&styles);
            let estimator = SimplexStyleEstimator::new();
            b.iter(|| {
                estimator.estimate_window(black_box(fund.view()), black_box(styles.view())).unwrap()
            });
        });
    }

    group.finish();
}

fn bench_rolling(c: &mut Criterion) {
    let mut group = c.benchmark_group("rolling_rbsa");
    group.sample_size(20);

    for (n_obs, n_styles, window) in [(500, 4, 21), (1250, 6, 63), (2500, 8, 250)] {
        let (returns, styles) = inputs(n_obs, n_styles);
        group.throughput(Throughput::Elements((n_obs - window) as u64));

        for parallel in [false, true] {
            let analysis = RollingStyleAttribution::with_config(RollingConfig {
                parallel,
                ..RollingConfig::default()
            });
            let label = if parallel { "parallel" } else { "serial" };
            group.bench_with_input(
                BenchmarkId::new(label, format!("{n_obs}x{n_styles}_w{window}")),
                &window,
                |b, &window| {
                    b.iter(|| analysis.run(black_box(&returns), black_box(&styles), window).unwrap());
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_estimate_window, bench_rolling);

criterion_main!(benches);
