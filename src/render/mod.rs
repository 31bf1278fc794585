use std::path::PathBuf;

use crate::errors::SimulationError;
use crate::risk::summary::RiskSummary;
use crate::simulator::gbm::PriceMatrix;
use crate::simulator::params::SimulationParams;

pub mod chart;

/// Turns a finished run into an artifact on disk, returning where it was written.
pub trait Renderer {
    fn render(
        &self,
        prices: &PriceMatrix,
        summary: &RiskSummary,
        params: &SimulationParams,
    ) -> Result<PathBuf, SimulationError>;
}
