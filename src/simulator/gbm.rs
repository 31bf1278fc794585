use log::debug;

use crate::errors::SimulationError;
use crate::simulator::params::SimulationParams;
use crate::simulator::shocks::{NormalSource, ShockGrid};

/// Simulated prices, `step_count + 1` rows (time) by `path_count` columns (paths).
#[derive(Debug, Clone, PartialEq)]
pub struct PriceMatrix {
    rows: usize,
    paths: usize,
    prices: Vec<f64>,
}

impl PriceMatrix {
    fn filled(rows: usize, paths: usize, price: f64) -> Self {
        Self {
            rows,
            paths,
            prices: vec![price; rows * paths],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn paths(&self) -> usize {
        self.paths
    }

    pub fn get(&self, step: usize, path: usize) -> f64 {
        self.prices[step * self.paths + path]
    }

    pub fn row(&self, step: usize) -> &[f64] {
        &self.prices[step * self.paths..(step + 1) * self.paths]
    }

    pub fn final_row(&self) -> &[f64] {
        self.row(self.rows - 1)
    }

    /// One trajectory through time
    pub fn path(&self, path: usize) -> impl Iterator<Item = f64> + '_ {
        self.prices.iter().skip(path).step_by(self.paths).copied()
    }

    /// Lowest and highest price over the first `limit` paths
    pub fn bounds(&self, limit: usize) -> (f64, f64) {
        let limit = limit.min(self.paths);
        self.prices
            .chunks(self.paths)
            .flat_map(|row| row[..limit].iter().copied())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p), hi.max(p))
            })
    }
}

/// Generate geometric brownian motion paths with the exact log-normal step
/// S(t) = S(t-1) · exp((µ - σ²/2)·dt + σ·√dt·Z)
/// µ — Drift, annualized
/// σ — Volatility, annualized
/// dt — horizon / step_count
/// Z — standard normal shock for this step and path
#[derive(Debug, Clone)]
pub struct PathGenerator {
    params: SimulationParams,
}

impl PathGenerator {
    pub fn new(params: SimulationParams) -> Result<Self, SimulationError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Draws a fresh shock grid from `source` and generates from it.
    pub fn simulate<S: NormalSource + ?Sized>(&self, source: &mut S) -> PriceMatrix {
        let shocks = ShockGrid::draw(source, self.params.step_count, self.params.path_count);
        self.fill(&shocks, |_| {})
    }

    pub fn generate(&self, shocks: &ShockGrid) -> Result<PriceMatrix, SimulationError> {
        self.generate_with(shocks, |_| {})
    }

    /// Like [`generate`](Self::generate), calling `on_step` after each finished row.
    pub fn generate_with<F>(&self, shocks: &ShockGrid, on_step: F) -> Result<PriceMatrix, SimulationError>
    where
        F: FnMut(usize),
    {
        if shocks.steps() != self.params.step_count || shocks.paths() != self.params.path_count {
            return Err(SimulationError::ShapeMismatch {
                expected_rows: self.params.step_count,
                expected_cols: self.params.path_count,
                rows: shocks.steps(),
                cols: shocks.paths(),
            });
        }
        Ok(self.fill(shocks, on_step))
    }

    fn fill<F: FnMut(usize)>(&self, shocks: &ShockGrid, mut on_step: F) -> PriceMatrix {
        let SimulationParams {
            initial_price,
            drift,
            volatility,
            step_count,
            path_count,
            ..
        } = self.params;
        let dt = self.params.dt();
        let drift_per_step = (drift - 0.5 * volatility * volatility) * dt;
        let vol_sqrt_dt = volatility * dt.sqrt();
        debug!("GBM step: drift term {drift_per_step:.6}, diffusion scale {vol_sqrt_dt:.6}");

        let mut matrix = PriceMatrix::filled(step_count + 1, path_count, initial_price);
        for t in 1..=step_count {
            let (done, rest) = matrix.prices.split_at_mut(t * path_count);
            let prev = &done[(t - 1) * path_count..];
            let current = &mut rest[..path_count];
            for ((price, &last), &z) in current.iter_mut().zip(prev).zip(shocks.row(t - 1)) {
                *price = last * (drift_per_step + vol_sqrt_dt * z).exp();
            }
            on_step(t);
        }
        matrix
    }
}

impl Default for PathGenerator {
    fn default() -> Self {
        Self {
            params: SimulationParams::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::shocks::{FixedSource, RngNormalSource, ZeroSource};

    fn small_params() -> SimulationParams {
        SimulationParams::new(100.0, 1.0, 0.07, 0.20, 12, 25)
    }

    #[test]
    fn first_row_is_initial_price() -> Result<(), Box<dyn std::error::Error>> {
        let generator = PathGenerator::new(small_params())?;
        let matrix = generator.simulate(&mut RngNormalSource::seeded(1));
        assert_eq!(matrix.rows(), 13);
        assert_eq!(matrix.paths(), 25);
        assert!(matrix.row(0).iter().all(|&p| p == 100.0));
        Ok(())
    }

    #[test]
    fn prices_stay_positive_under_large_shocks() -> Result<(), Box<dyn std::error::Error>> {
        let params = SimulationParams {
            volatility: 3.0,
            ..small_params()
        };
        let generator = PathGenerator::new(params)?;
        let mut source = FixedSource::new(vec![-6.0, -4.0, 5.0, -8.0]);
        let matrix = generator.simulate(&mut source);
        for t in 0..matrix.rows() {
            assert!(matrix.row(t).iter().all(|&p| p > 0.0), "non-positive price at step {t}");
        }
        Ok(())
    }

    #[test]
    fn zero_shocks_follow_closed_form() -> Result<(), Box<dyn std::error::Error>> {
        let params = small_params();
        let generator = PathGenerator::new(params)?;
        let matrix = generator.generate(&ShockGrid::zeros(params.step_count, params.path_count))?;
        let dt = params.dt();
        let mu_adj = params.drift - 0.5 * params.volatility.powi(2);
        for t in 0..matrix.rows() {
            let expected = params.initial_price * (mu_adj * dt * t as f64).exp();
            for p in 0..matrix.paths() {
                let got = matrix.get(t, p);
                assert!(
                    ((got - expected) / expected).abs() < 1e-12,
                    "step {t} path {p}: {got} vs {expected}"
                );
            }
        }
        assert_eq!(matrix, generator.simulate(&mut ZeroSource));
        Ok(())
    }

    #[test]
    fn single_step_uses_its_own_shock() -> Result<(), Box<dyn std::error::Error>> {
        let params = SimulationParams::new(50.0, 0.5, 0.1, 0.3, 1, 2);
        let generator = PathGenerator::new(params)?;
        let matrix = generator.generate(&ShockGrid::from_rows(vec![vec![1.0, -1.0]])?)?;
        let dt: f64 = 0.5;
        let base = (0.1 - 0.5 * 0.09) * dt;
        assert!((matrix.get(1, 0) - 50.0 * (base + 0.3 * dt.sqrt()).exp()).abs() < 1e-12);
        assert!((matrix.get(1, 1) - 50.0 * (base - 0.3 * dt.sqrt()).exp()).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn rejects_grid_of_wrong_shape() -> Result<(), Box<dyn std::error::Error>> {
        let generator = PathGenerator::new(small_params())?;
        let err = generator.generate(&ShockGrid::zeros(11, 25)).unwrap_err();
        assert_eq!(
            err,
            SimulationError::ShapeMismatch {
                expected_rows: 12,
                expected_cols: 25,
                rows: 11,
                cols: 25
            }
        );
        Ok(())
    }

    #[test]
    fn rejects_invalid_params() {
        let params = SimulationParams {
            path_count: 0,
            ..small_params()
        };
        assert!(matches!(
            PathGenerator::new(params),
            Err(SimulationError::InvalidParameter { name: "path_count", .. })
        ));
    }

    #[test]
    fn same_seed_same_paths() -> Result<(), Box<dyn std::error::Error>> {
        let generator = PathGenerator::new(small_params())?;
        let a = generator.simulate(&mut RngNormalSource::seeded(99));
        let b = generator.simulate(&mut RngNormalSource::seeded(99));
        let c = generator.simulate(&mut RngNormalSource::seeded(100));
        assert_eq!(a, b);
        assert_ne!(a, c);
        Ok(())
    }

    #[test]
    fn path_and_bounds_accessors() -> Result<(), Box<dyn std::error::Error>> {
        let params = SimulationParams::new(10.0, 1.0, 0.0, 0.5, 2, 3);
        let generator = PathGenerator::new(params)?;
        let shocks = ShockGrid::from_rows(vec![vec![1.0, 0.0, -1.0], vec![1.0, 0.0, -1.0]])?;
        let mut seen = Vec::new();
        let matrix = generator.generate_with(&shocks, |t| seen.push(t))?;
        assert_eq!(seen, vec![1, 2]);

        let first: Vec<f64> = matrix.path(0).collect();
        assert_eq!(first.len(), 3);
        assert_eq!(first[0], 10.0);
        assert!(first[2] > first[1] && first[1] > first[0]);
        assert_eq!(matrix.final_row(), matrix.row(2));

        let (lo, hi) = matrix.bounds(1);
        assert_eq!((lo, hi), (10.0, first[2]));
        let (lo_all, _) = matrix.bounds(usize::MAX);
        assert_eq!(lo_all, matrix.get(2, 2));
        Ok(())
    }
}
