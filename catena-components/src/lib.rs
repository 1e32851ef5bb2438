//! Stock components for catena simulations.
//!
//! Generators produce variables without any upstream dependency, typically
//! to feed a coupled model with forcing data. Observers export what a run
//! produces or report on its progress.
//!
//! All components configure themselves from their parameter set during
//! INITPARAMS and declare what they handle through their signature, so the
//! engine can check a coupled model before it runs.

pub mod generators;
pub mod observers;
