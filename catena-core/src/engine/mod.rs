//! The simulation engine.
//!
//! Drives a coupled model and its monitoring through the whole lifecycle:
//! INITPARAMS, PREPAREDATA, CHECKCONSISTENCY, INITIALIZERUN, the RUNSTEP
//! loop, FINALIZERUN and the POST wrap-up. Every stage is fail-fast and is
//! reported to a [`crate::listener::RunListener`] with an OK, WARNING or
//! ERROR outcome. Consistency checking validates every signature against
//! the spatial domain before the first stepped hook runs, so coupling
//! mistakes surface before any simulation work happens.

mod builder;
mod checks;
mod runner;

#[cfg(test)]
mod tests;

// Public re-exports
pub use builder::{Simulation, SimulationBuilder};
pub use runner::{Engine, MESSAGES_FILE};
