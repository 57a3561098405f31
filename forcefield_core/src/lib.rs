//! `forcefield_core`
//!
//! Force laws, bodies and the fixed-tick integrator.
//!
//! Design goals:
//! - Deterministic: stable iteration order, no wall-clock reads.
//! - A body's state is never partially updated by a failing tick.
//! - The host drives time; the core only exposes `initialize` and `step(dt)`.
//! - No `unsafe`.

pub mod body;
pub mod config;
pub mod force;
pub mod integrator;
pub mod math;
pub mod scenario;
pub mod sim;
pub mod snapshot;

pub mod prelude {
    //! Commonly used exports.

    pub use crate::body::*;
    pub use crate::config::*;
    pub use crate::force::*;
    pub use crate::integrator::*;
    pub use crate::math::*;
    pub use crate::scenario::*;
    pub use crate::sim::*;
    pub use crate::snapshot::*;
}
