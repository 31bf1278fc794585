pub mod errors;
pub mod render;
pub mod risk;
pub mod simulator;

pub use errors::SimulationError;
pub use render::chart::ChartRenderer;
pub use render::Renderer;
pub use risk::summary::{percentile, RiskSummary};
pub use simulator::gbm::{self, PathGenerator, PriceMatrix};
pub use simulator::monte_carlo::{MonteCarloSimulation, SimulationOutcome};
pub use simulator::params::SimulationParams;
pub use simulator::shocks::{FixedSource, NormalSource, RngNormalSource, ShockGrid, ZeroSource};
