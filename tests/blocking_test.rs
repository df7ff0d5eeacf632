//! Block-estimator lifecycle: block closing, derived values, reset-on-read.

use spinscan::blocking::BlockEstimator;
use spinscan::error::SimError;

#[test]
fn constant_input_has_zero_error_and_zero_fluctuation() {
    let mut est = BlockEstimator::new("energy", 4, 1.7).unwrap();
    for _ in 0..12 {
        est.add_data(2.5);
    }
    assert_eq!(est.completed_blocks(), 3);

    let results = est.read_results().unwrap();
    assert!((results.mean - 2.5).abs() < 1e-12);
    assert!(results.mean_err.abs() < 1e-12);
    assert!(results.derived_mean.abs() < 1e-12);
    assert!(results.derived_err.abs() < 1e-12);
}

#[test]
fn single_block_sequence_matches_hand_computation() {
    // block mean 4, mean-of-squares (4 + 16 + 36)/3, derived = 56/3 - 16
    let mut est = BlockEstimator::new("demo", 3, 1.0).unwrap();
    est.add_data(2.0);
    est.add_data(4.0);
    est.add_data(6.0);

    let results = est.read_results().unwrap();
    assert!((results.mean - 4.0).abs() < 1e-12);
    assert!((results.derived_mean - (56.0 / 3.0 - 16.0)).abs() < 1e-12);
    // with a single block the spread of block means is zero
    assert!(results.mean_err.abs() < 1e-12);
    assert!(results.derived_err.abs() < 1e-12);
}

#[test]
fn read_is_consuming_and_a_second_read_is_an_error() {
    let mut est = BlockEstimator::new("magnetisation", 2, 1.0).unwrap();
    est.add_data(1.0);
    est.add_data(3.0);

    assert!(est.read_results().is_ok());
    assert_eq!(
        est.read_results().unwrap_err(),
        SimError::EmptyEstimator("magnetisation".into())
    );
}

#[test]
fn partial_block_contributes_nothing() {
    let mut est = BlockEstimator::new("energy", 10, 1.0).unwrap();
    for i in 0..9 {
        est.add_data(i as f64);
    }
    assert_eq!(est.completed_blocks(), 0);
    assert!(est.read_results().is_err());
}

#[test]
fn prefactor_update_applies_to_future_blocks_only() {
    let mut est = BlockEstimator::new("energy", 2, 0.0).unwrap();

    // first block closes with prefactor 0, so its derived value is 0
    est.add_data(1.0);
    est.add_data(3.0);

    est.update_prefactor(1.0);
    est.add_data(1.0);
    est.add_data(3.0);

    // each block: m = 2, m2 = 5, fluctuation = 1; derived values 0 and 1
    let results = est.read_results().unwrap();
    assert!((results.derived_mean - 0.5).abs() < 1e-12);
}

#[test]
fn two_block_spread_matches_the_variance_formula() {
    let mut est = BlockEstimator::new("energy", 2, 1.0).unwrap();
    // block means 2 and 6; E[m^2] - E[m]^2 = 20 - 16 = 4
    est.add_data(1.0);
    est.add_data(3.0);
    est.add_data(5.0);
    est.add_data(7.0);

    let results = est.read_results().unwrap();
    assert!((results.mean - 4.0).abs() < 1e-12);
    assert!((results.mean_err - 4.0).abs() < 1e-12);
}

#[test]
fn zero_block_size_is_rejected() {
    assert_eq!(
        BlockEstimator::new("bad", 0, 1.0).unwrap_err(),
        SimError::InvalidBlockSize("bad".into())
    );
}
