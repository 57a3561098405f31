//! `forcefield_driver`
//!
//! Host-side systems:
//! - Fixed timestep loop calling `Simulation::step`
//! - Fault policy (skip or halt)
//! - Operator console (spawn, despawn, status, dump, pause, resume, quit)
//! - Snapshot capture at a configurable cadence

pub mod runner;

pub use runner::{RunnerState, SimRunner};
