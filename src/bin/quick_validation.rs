// Quick validation: 4x4 Monte Carlo energies against the exact transfer
// matrix, with blocking and autocorrelation error estimates side by side.

use rand::SeedableRng;
use rand_pcg::Pcg64;

use spinscan::blocking::BlockEstimator;
use spinscan::error_analysis::{blocking_plateau, SeriesAnalysis};
use spinscan::exact;
use spinscan::lattice::{render, SpinLattice};
use spinscan::metropolis::MetropolisEngine;

const ROWS: usize = 4;
const COLS: usize = 4;
const WARMUP: usize = 5_000;
const SWEEPS: usize = 40_000;
const BLOCK_SIZE: usize = 400;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== QUICK VALIDATION: {ROWS}x{COLS} lattice vs transfer matrix ===");
    println!("{WARMUP} warm-up + {SWEEPS} measured sweeps, block size {BLOCK_SIZE}");
    println!();

    let mut rng = Pcg64::seed_from_u64(42);
    let lattice = SpinLattice::random_with(&mut rng, ROWS, COLS)?;
    let mut engine = MetropolisEngine::new(lattice, 1.0)?;

    // One estimator reused across temperatures; read_results resets it.
    let mut blocker = BlockEstimator::new("energy", BLOCK_SIZE, 0.0)?;

    println!(
        "{:>6} {:>11} {:>10} {:>10} {:>11} {:>8}",
        "T", "E_mc", "blk_err", "ac_err", "E_exact", "dev"
    );

    for t in [1.5, 2.0, exact::critical_temperature(), 3.0, 4.0] {
        engine.set_temperature(t)?;
        blocker.update_prefactor(1.0 / (t * t));

        for _ in 0..WARMUP {
            engine.sweep(&mut rng);
        }

        let mut series = Vec::with_capacity(SWEEPS);
        for _ in 0..SWEEPS {
            engine.sweep(&mut rng);
            let e = engine.energy_per_site();
            blocker.add_data(e);
            series.push(e);
        }

        let results = blocker.read_results()?;
        let block_err = results.mean_err.sqrt();
        let ac_err = SeriesAnalysis::new(series).errors().stat_error;

        let exact_u = exact::energy_per_site(ROWS, COLS, t);
        let err = block_err.max(ac_err);
        let dev = if err > 0.0 {
            (results.mean - exact_u) / err
        } else {
            0.0
        };

        println!(
            "{:>6.3} {:>11.5} {:>10.5} {:>10.5} {:>11.5} {:>+8.2}",
            t, results.mean, block_err, ac_err, exact_u, dev
        );
    }

    // Blocking plateau at the critical point: the error estimate should
    // stop growing once blocks are longer than the correlation time.
    let t_c = exact::critical_temperature();
    engine.set_temperature(t_c)?;
    let mut series = Vec::with_capacity(SWEEPS);
    for _ in 0..SWEEPS {
        engine.sweep(&mut rng);
        series.push(engine.energy_per_site());
    }
    println!("\nBlocking plateau at T_c = {t_c:.4}:");
    for (block_size, err) in blocking_plateau(&series, 10) {
        println!("  block {:>5}: error {:.6}", block_size, err);
    }

    println!("\nFinal configuration ('#' up, '0' down):");
    print!("{}", render(engine.lattice()));

    Ok(())
}
