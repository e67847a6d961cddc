pub mod market;
pub mod signals;
pub mod state;

pub use state::{SharedSimulation, SimulationError, SimulationSettings, SimulationState, vary};
