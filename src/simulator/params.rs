use crate::errors::SimulationError;

/// Inputs of a single GBM run. Fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    /// Price at step 0, shared by every path
    pub initial_price: f64,
    /// Time horizon in years
    pub horizon: f64,
    /// Annualized drift µ
    pub drift: f64,
    /// Annualized volatility σ
    pub volatility: f64,
    pub step_count: usize,
    pub path_count: usize,
}

impl SimulationParams {
    pub fn new(
        initial_price: f64,
        horizon: f64,
        drift: f64,
        volatility: f64,
        step_count: usize,
        path_count: usize,
    ) -> Self {
        Self {
            initial_price,
            horizon,
            drift,
            volatility,
            step_count,
            path_count,
        }
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.initial_price.is_finite() || self.initial_price <= 0.0 {
            return Err(SimulationError::invalid(
                "initial_price",
                format!("must be a positive finite number, got {}", self.initial_price),
            ));
        }
        if !self.horizon.is_finite() || self.horizon <= 0.0 {
            return Err(SimulationError::invalid(
                "horizon",
                format!("must be a positive finite number, got {}", self.horizon),
            ));
        }
        if !self.drift.is_finite() {
            return Err(SimulationError::invalid(
                "drift",
                format!("must be finite, got {}", self.drift),
            ));
        }
        if !self.volatility.is_finite() || self.volatility < 0.0 {
            return Err(SimulationError::invalid(
                "volatility",
                format!("must be a non-negative finite number, got {}", self.volatility),
            ));
        }
        if self.step_count == 0 {
            return Err(SimulationError::invalid("step_count", "must be at least 1"));
        }
        if self.path_count == 0 {
            return Err(SimulationError::invalid("path_count", "must be at least 1"));
        }
        Ok(())
    }

    /// Length of one time increment
    pub fn dt(&self) -> f64 {
        self.horizon / self.step_count as f64
    }

    /// E[S_T] = S_0 * exp(µT)
    pub fn expected_terminal_mean(&self) -> f64 {
        self.initial_price * (self.drift * self.horizon).exp()
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        // one year of trading days, 1000 scenarios
        Self::new(100.0, 1.0, 0.07, 0.20, 252, 1000)
    }
}
