//! Integrator abstraction.
//!
//! Advances one body by one fixed tick. The force is computed in full before
//! any field of the body is written, so a failing force law leaves the body
//! exactly as it was.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{body::Body, force::DomainError};

/// How acceleration is folded into velocity each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VelocityUpdate {
    /// `v += a`. The tick itself is the unit of time for velocity, while
    /// position still advances by `v * dt`.
    #[default]
    PerTick,
    /// `v += a * dt`, the textbook semi-implicit Euler update.
    TimeScaled,
}

/// Integrator trait.
pub trait Integrator: Send + Sync {
    fn step(&self, body: &mut Body, dt: f64) -> Result<(), DomainError>;
}

/// Semi-implicit (symplectic) Euler: velocity first, then position from the
/// updated velocity.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemiImplicitEuler {
    pub velocity_update: VelocityUpdate,
}

impl SemiImplicitEuler {
    pub fn new(velocity_update: VelocityUpdate) -> Self {
        Self { velocity_update }
    }
}

impl Integrator for SemiImplicitEuler {
    fn step(&self, body: &mut Body, dt: f64) -> Result<(), DomainError> {
        let force = body.law.compute(body.position, body.velocity)?;
        let acceleration = force / body.mass();

        let dv = match self.velocity_update {
            VelocityUpdate::PerTick => acceleration,
            VelocityUpdate::TimeScaled => acceleration * dt,
        };
        body.velocity += dv;
        body.position += body.velocity * dt;
        body.force = force;
        body.acceleration = acceleration;

        trace!(
            law = body.law.name(),
            position = %body.position,
            velocity = %body.velocity,
            "Integrated body"
        );
        Ok(())
    }
}
