//! Autocorrelation, jackknife and blocking-plateau behaviour on synthetic
//! series with known properties.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use spinscan::error_analysis::{
    blocking_plateau, integrated_autocorr_time, jackknife_error, SeriesAnalysis,
};

/// AR(1) series with autocorrelation `rho`.
fn ar1_series(rng: &mut impl Rng, rho: f64, n: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(n);
    let mut value = 0.0;
    for _ in 0..n {
        value = rho * value + (1.0 - rho) * rng.gen::<f64>();
        out.push(value);
    }
    out
}

#[test]
fn uncorrelated_data_has_minimal_tau() {
    let mut rng = ChaCha20Rng::seed_from_u64(2);
    let data: Vec<f64> = (0..2000).map(|_| rng.gen()).collect();
    assert!(integrated_autocorr_time(&data) < 1.0);
}

#[test]
fn correlated_data_has_large_tau_and_reduced_n_eff() {
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    let data = ar1_series(&mut rng, 0.9, 4000);

    let analysis = SeriesAnalysis::new(data);
    // theory: tau_int = (1 + rho) / (2 (1 - rho)) = 9.5
    assert!(analysis.tau_int() > 3.0, "tau_int = {}", analysis.tau_int());
    assert!(analysis.n_eff() < 4000.0 / 2.0);

    // the corrected error must exceed the naive standard error of the mean
    let naive = (analysis.variance() / 4000.0).sqrt();
    assert!(analysis.errors().stat_error > naive);
}

#[test]
fn jackknife_of_the_mean_equals_the_standard_error() {
    // for the mean estimator the jackknife reproduces s/sqrt(n) exactly
    let data: Vec<f64> = (1..=10).map(|i| i as f64).collect();
    let jack = jackknife_error(&data, |x| x.iter().sum::<f64>() / x.len() as f64);

    let mean = 5.5;
    let sample_var = data.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / 9.0;
    let sem = (sample_var / 10.0).sqrt();
    assert!((jack - sem).abs() < 1e-12, "jack {jack} vs sem {sem}");
}

#[test]
fn plateau_climbs_on_a_correlated_series() {
    let mut rng = ChaCha20Rng::seed_from_u64(13);
    let data = ar1_series(&mut rng, 0.9, 16384);

    let plateau = blocking_plateau(&data, 8);
    assert_eq!(plateau[0].0, 1);
    assert_eq!(plateau.last().unwrap().0, 256);

    // block size 1 underestimates the error badly; long blocks do not
    let first = plateau[0].1;
    let last = plateau.last().unwrap().1;
    assert!(last > 1.5 * first, "no growth: {first} -> {last}");
}

#[test]
fn plateau_stops_when_fewer_than_two_blocks_fit() {
    let data: Vec<f64> = (0..12).map(|i| i as f64).collect();
    let plateau = blocking_plateau(&data, 10);
    // sizes 1, 2, 4 fit at least twice into 12 samples; 8 leaves one block
    assert_eq!(plateau.len(), 3);
}

#[test]
fn series_analysis_basic_statistics() {
    let analysis = SeriesAnalysis::new(vec![1.0, 2.0, 3.0, 4.0]);
    assert!((analysis.mean() - 2.5).abs() < 1e-12);
    // sample variance with n - 1 denominator
    assert!((analysis.variance() - 5.0 / 3.0).abs() < 1e-12);
}
