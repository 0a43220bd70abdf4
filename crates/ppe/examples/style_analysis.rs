//! Rolling style analysis on synthetic data.
//!
//! A fund drifts from a value tilt to a growth tilt over two years. The
//! rolling exposures should track the drift.
//!
//! Run with: `cargo run --example style_analysis`

use ndarray::{Array1, Array2};
use ppe::{
    math::stats,
    model::{FailurePolicy, RollingConfig, RollingStyleAttribution, single_index},
    primitives::{Date, FactorName, Period, ReturnSeries, StyleFactorMatrix},
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

const N_DAYS: usize = 500;
const STYLES: [&str; 3] = ["value", "growth", "bonds"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = StdRng::seed_from_u64(7);

    let equity = Normal::new(0.0004, 0.011)?;
    let bonds = Normal::new(0.0001, 0.003)?;
    let noise = Normal::new(0.0, 0.0008)?;

    let dates: Vec<Date> =
        Date::from_ymd_opt(2023, 1, 2).ok_or("bad start date")?.iter_days().take(N_DAYS).collect();

    let styles = Array2::from_shape_fn((N_DAYS, STYLES.len()), |(_, j)| {
        if j == 2 { bonds.sample(&mut rng) } else { equity.sample(&mut rng) }
    });

    // Weights move linearly from (0.7, 0.1, 0.2) to (0.1, 0.7, 0.2)
    let fund: Array1<f64> = (0..N_DAYS)
        .map(|t| {
            let s = t as f64 / (N_DAYS - 1) as f64;
            let w = [0.7 - 0.6 * s, 0.1 + 0.6 * s, 0.2];
            (0..STYLES.len()).map(|j| w[j] * styles[[t, j]]).sum::<f64>() + noise.sample(&mut rng)
        })
        .collect();

    let names = STYLES.iter().map(|&s| FactorName::from(s)).collect();
    let returns = ReturnSeries::new(dates.clone(), fund.clone())?;
    let style_matrix = StyleFactorMatrix::new(dates, names, styles.clone())?;

    // Quarterly windows: 63 trading days
    let analysis = RollingStyleAttribution::with_config(RollingConfig {
        failure_policy: FailurePolicy::Skip,
        ..RollingConfig::default()
    });
    let result = analysis.run(&returns, &style_matrix, Period::Quarterly)?;

    let frame = result.to_frame()?;
    println!("Rolling exposures ({} windows of {}):", result.len(), result.window());
    println!("{}", frame.head(Some(5)));
    println!("{}", frame.tail(Some(5)));

    if let (Some(first), Some(last)) = (result.rows().first(), result.rows().last()) {
        println!("\nFirst window ending {}: {:?}", first.date, first.exposure);
        println!("Last window ending {}:  {:?}", last.date, last.exposure);
    }

    // Plain statistics and a single-index fit against the value index
    let value = styles.column(0);
    let rf = Array1::zeros(N_DAYS);
    let capm = single_index(fund.view(), value, rf.view())?;

    let mut level = 100.0;
    let prices = fund.mapv(|r| {
        level *= 1.0 + r;
        level
    });

    println!("\nAnnualized volatility: {:.2}%", stats::annualized_std(fund.view(), 250)? * 100.0);
    println!(
        "Downside volatility:   {:.2}%",
        stats::downside_std(fund.view(), Period::Daily.periods_per_year(), 0.0)? * 100.0
    );
    println!("Max drawdown:          {:.2}%", stats::max_drawdown(prices.view())? * 100.0);
    println!(
        "Versus value: alpha {:.5}, beta {:.3}, R² {:.3}",
        capm.alpha, capm.beta, capm.r_squared
    );

    Ok(())
}
