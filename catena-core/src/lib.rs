pub mod attributes;
pub mod component;
pub mod config;
pub mod engine;
pub mod events;
mod example_components;
pub mod listener;
pub mod logger;
pub mod model;
pub mod monitoring;
pub mod observer;
pub mod parameters;
pub mod runenv;
pub mod signature;
pub mod spatial;
pub mod status;
pub mod time;
pub mod value;
pub mod variables;

pub mod errors;
