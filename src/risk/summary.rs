use log::debug;
use ordered_float::OrderedFloat;

use crate::errors::SimulationError;
use crate::simulator::gbm::PriceMatrix;

/// VaR is read at this percentile of the final prices
pub const VAR_PERCENTILE: f64 = 5.0;

/// q-th percentile (0..=100) with linear interpolation between order statistics.
pub fn percentile(values: &[f64], q: f64) -> Result<f64, SimulationError> {
    if values.is_empty() {
        return Err(SimulationError::EmptySample);
    }
    if !(0.0..=100.0).contains(&q) {
        return Err(SimulationError::invalid(
            "percentile",
            format!("must lie in [0, 100], got {q}"),
        ));
    }
    let mut sorted: Vec<OrderedFloat<f64>> = values.iter().copied().map(OrderedFloat).collect();
    sorted.sort_unstable();

    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    let (lo, hi) = (sorted[lower].into_inner(), sorted[upper].into_inner());
    Ok(lo + (hi - lo) * weight)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskSummary {
    pub expected_mean: f64,
    /// Price level only 5% of the simulated outcomes fall below
    pub value_at_risk_95: f64,
}

impl RiskSummary {
    pub fn from_final_prices(final_prices: &[f64]) -> Result<Self, SimulationError> {
        if final_prices.is_empty() {
            return Err(SimulationError::EmptySample);
        }
        let expected_mean = final_prices.iter().sum::<f64>() / final_prices.len() as f64;
        let value_at_risk_95 = percentile(final_prices, VAR_PERCENTILE)?;
        debug!(
            "Summarized {} final prices: mean {expected_mean:.4}, VaR(95%) {value_at_risk_95:.4}",
            final_prices.len()
        );
        Ok(Self {
            expected_mean,
            value_at_risk_95,
        })
    }

    pub fn from_matrix(prices: &PriceMatrix) -> Result<Self, SimulationError> {
        Self::from_final_prices(prices.final_row())
    }
}
