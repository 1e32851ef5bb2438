//! Coupled spatio-temporal simulation framework.
//!
//! This facade crate re-exports the engine and data model from
//! `catena-core` at the root, and the stock generators and observers from
//! `catena-components` under [`components`].

pub use catena_components as components;
pub use catena_core::*;
