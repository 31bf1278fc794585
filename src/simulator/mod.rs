pub mod gbm;
pub mod params;
pub mod shocks;
pub mod monte_carlo;
