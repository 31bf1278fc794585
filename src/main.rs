use anyhow::Result;
use gbm_monte_carlo::{ChartRenderer, MonteCarloSimulation, RngNormalSource, SimulationParams};
use log::{info, LevelFilter};

fn main() -> Result<()> {
    pretty_env_logger::formatted_timed_builder()
        .filter_level(LevelFilter::Info)
        .init();

    let params = SimulationParams::default();
    info!("Running GBM Monte Carlo with {params:?}");

    let simulation = MonteCarloSimulation::new(params)?;
    let renderer = ChartRenderer::default();
    info!("Chart will be written to {}", renderer.output().display());
    let (_outcome, artifact) =
        simulation.run_and_render(&mut RngNormalSource::from_thread_rng(), &renderer)?;

    println!(
        "Simulation complete. Results saved as '{}'.",
        artifact.display()
    );
    Ok(())
}
