use rand::{rngs::StdRng, rngs::ThreadRng, thread_rng, Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

use crate::errors::SimulationError;

/// Anything that can hand out independent N(0, 1) variates.
pub trait NormalSource {
    fn draw_standard_normal(&mut self) -> f64;
}

/// Standard normal draws backed by a `rand` generator
#[derive(Debug, Clone)]
pub struct RngNormalSource<R: Rng> {
    rng: R,
}

impl<R: Rng> RngNormalSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngNormalSource<StdRng> {
    /// Reproducible source, same seed gives the same draws
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl RngNormalSource<ThreadRng> {
    pub fn from_thread_rng() -> Self {
        Self::new(thread_rng())
    }
}

impl<R: Rng> NormalSource for RngNormalSource<R> {
    fn draw_standard_normal(&mut self) -> f64 {
        StandardNormal.sample(&mut self.rng)
    }
}

/// Always draws 0.0, turns the generator into its deterministic drift curve.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroSource;

impl NormalSource for ZeroSource {
    fn draw_standard_normal(&mut self) -> f64 {
        0.0
    }
}

/// Cycles through a fixed list of draws.
#[derive(Debug, Clone)]
pub struct FixedSource {
    values: Vec<f64>,
    cursor: usize,
}

impl FixedSource {
    /// An empty list behaves like [`ZeroSource`].
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl NormalSource for FixedSource {
    fn draw_standard_normal(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        value
    }
}

/// step_count x path_count matrix of shocks, row t feeds the move from t to t+1
#[derive(Debug, Clone, PartialEq)]
pub struct ShockGrid {
    steps: usize,
    paths: usize,
    values: Vec<f64>,
}

impl ShockGrid {
    /// Draws every shock upfront, step by step, all paths of a step together.
    pub fn draw<S: NormalSource + ?Sized>(source: &mut S, steps: usize, paths: usize) -> Self {
        let values = (0..steps * paths)
            .map(|_| source.draw_standard_normal())
            .collect();
        Self {
            steps,
            paths,
            values,
        }
    }

    pub fn zeros(steps: usize, paths: usize) -> Self {
        Self {
            steps,
            paths,
            values: vec![0.0; steps * paths],
        }
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, SimulationError> {
        let steps = rows.len();
        let paths = rows.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = rows.iter().find(|row| row.len() != paths) {
            return Err(SimulationError::ShapeMismatch {
                expected_rows: steps,
                expected_cols: paths,
                rows: steps,
                cols: bad.len(),
            });
        }
        if steps == 0 || paths == 0 {
            return Err(SimulationError::ShapeMismatch {
                expected_rows: steps.max(1),
                expected_cols: paths.max(1),
                rows: steps,
                cols: paths,
            });
        }
        Ok(Self {
            steps,
            paths,
            values: rows.into_iter().flatten().collect(),
        })
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn paths(&self) -> usize {
        self.paths
    }

    pub fn row(&self, step: usize) -> &[f64] {
        &self.values[step * self.paths..(step + 1) * self.paths]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_sources_repeat() {
        let mut a = RngNormalSource::seeded(7);
        let mut b = RngNormalSource::seeded(7);
        for _ in 0..100 {
            assert_eq!(a.draw_standard_normal(), b.draw_standard_normal());
        }
    }

    #[test]
    fn seeded_draws_look_standard_normal() {
        let mut source = RngNormalSource::seeded(42);
        let n = 50_000;
        let draws: Vec<f64> = (0..n).map(|_| source.draw_standard_normal()).collect();
        let mean = draws.iter().sum::<f64>() / n as f64;
        let var = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        assert!(mean.abs() < 0.03, "mean {mean}");
        assert!((var - 1.0).abs() < 0.05, "variance {var}");
    }

    #[test]
    fn fixed_source_cycles() {
        let mut source = FixedSource::new(vec![1.0, -2.0]);
        let draws: Vec<f64> = (0..5).map(|_| source.draw_standard_normal()).collect();
        assert_eq!(draws, vec![1.0, -2.0, 1.0, -2.0, 1.0]);
        assert_eq!(FixedSource::new(vec![]).draw_standard_normal(), 0.0);
    }

    #[test]
    fn grid_is_filled_row_major() {
        let mut source = FixedSource::new((0..6).map(f64::from).collect());
        let grid = ShockGrid::draw(&mut source, 2, 3);
        assert_eq!(grid.steps(), 2);
        assert_eq!(grid.paths(), 3);
        assert_eq!(grid.row(0), &[0.0, 1.0, 2.0]);
        assert_eq!(grid.row(1), &[3.0, 4.0, 5.0]);
    }

    #[test]
    fn from_rows_rejects_ragged_and_empty_input() {
        assert!(matches!(
            ShockGrid::from_rows(vec![vec![0.0, 1.0], vec![2.0]]),
            Err(SimulationError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            ShockGrid::from_rows(vec![]),
            Err(SimulationError::ShapeMismatch { .. })
        ));
        let grid = ShockGrid::from_rows(vec![vec![0.5], vec![-0.5]]).unwrap();
        assert_eq!(grid, ShockGrid { steps: 2, paths: 1, values: vec![0.5, -0.5] });
        assert_eq!(ShockGrid::zeros(2, 1).row(1), &[0.0]);
    }
}
