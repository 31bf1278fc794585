use indicatif::ProgressBar;
use log::*;

use crate::errors::SimulationError;
use crate::render::Renderer;
use crate::risk::summary::RiskSummary;
use crate::simulator::gbm::{PathGenerator, PriceMatrix};
use crate::simulator::params::SimulationParams;
use crate::simulator::shocks::{NormalSource, ShockGrid};

/// Everything a single run produces
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub prices: PriceMatrix,
    pub summary: RiskSummary,
}

/// Generates the price paths and reduces them to a risk summary.
#[derive(Debug, Clone)]
pub struct MonteCarloSimulation {
    generator: PathGenerator,
}

impl MonteCarloSimulation {
    pub fn new(params: SimulationParams) -> Result<Self, SimulationError> {
        Ok(Self {
            generator: PathGenerator::new(params)?,
        })
    }

    pub fn params(&self) -> &SimulationParams {
        self.generator.params()
    }

    pub fn run<S: NormalSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<SimulationOutcome, SimulationError> {
        let params = self.params();
        let steps = params.step_count;
        let paths = params.path_count;

        info!("Drawing {steps}x{paths} standard normal shocks");
        let shocks = ShockGrid::draw(source, steps, paths);

        info!("Generating {paths} GBM paths over {steps} steps");
        let bar = ProgressBar::new(steps as u64);
        let prices = self.generator.generate_with(&shocks, |_| bar.inc(1))?;
        bar.finish();

        let summary = RiskSummary::from_matrix(&prices)?;
        info!(
            "Expected mean {:.2} (analytic {:.2}), VaR(95%) {:.2}",
            summary.expected_mean,
            params.expected_terminal_mean(),
            summary.value_at_risk_95
        );
        Ok(SimulationOutcome { prices, summary })
    }

    /// Runs, then hands the outcome to `renderer`.
    pub fn run_and_render<S, R>(
        &self,
        source: &mut S,
        renderer: &R,
    ) -> Result<(SimulationOutcome, std::path::PathBuf), SimulationError>
    where
        S: NormalSource + ?Sized,
        R: Renderer + ?Sized,
    {
        let outcome = self.run(source)?;
        let artifact = renderer.render(&outcome.prices, &outcome.summary, self.params())?;
        Ok((outcome, artifact))
    }
}

impl Default for MonteCarloSimulation {
    fn default() -> Self {
        Self {
            generator: PathGenerator::default(),
        }
    }
}
