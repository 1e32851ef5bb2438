//! Integration tests for the engine module.
//!
//! These tests assemble small simulations from the fixture components and
//! drive them stage by stage or end to end, asserting the consistency
//! checks, the run loop scheduling and the stage reporting.

mod consistency;
