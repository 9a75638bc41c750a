use crate::config::WageDistribution;
use crate::grid::Grid;
use crate::rng;

/// One worker, bound for the whole run to a single grid cell.
///
/// Workers are never created or destroyed after initialization; automation
/// only flips `employed` and zeroes the wage.
#[derive(Clone, Debug, PartialEq)]
pub struct Worker {
    /// Row-major index of the owning cell.
    pub cell: usize,
    pub employed: bool,
    pub wage: f64,
    /// Spending this tick, recomputed by the consumption phase.
    pub consumption: f64,
}

impl Worker {
    pub fn new(cell: usize, wage: f64) -> Self {
        Self {
            cell,
            employed: true,
            wage,
            consumption: 0.0,
        }
    }

    /// Pre-transfer income: the wage while employed, nothing otherwise.
    pub fn labor_income(&self) -> f64 {
        if self.employed {
            self.wage
        } else {
            0.0
        }
    }
}

/// Create one employed worker per grid cell with wages drawn from
/// `distribution`, each cell sampling from its own derived RNG stream.
pub fn spawn_workers(grid: &Grid, distribution: &WageDistribution, seed: u64) -> Vec<Worker> {
    (0..grid.len())
        .map(|cell| {
            let mut cell_rng = rng::derive_wage_rng(seed, cell);
            Worker::new(cell, distribution.sample(&mut cell_rng))
        })
        .collect()
}
