//! Bodies.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{force::ForceLaw, math::Vec3};

/// Opaque body id, assigned by [`crate::sim::Simulation`] in spawn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u64);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A point mass driven by a single force law.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub position: Vec3,
    pub velocity: Vec3,
    mass: f64,
    pub law: ForceLaw,
    /// Force applied during the last successful step.
    pub force: Vec3,
    /// Acceleration applied during the last successful step.
    pub acceleration: Vec3,
}

impl Body {
    /// Creates a body. `mass` must be finite and strictly positive, and the
    /// initial state must be finite.
    pub fn new(
        position: Vec3,
        velocity: Vec3,
        mass: f64,
        law: ForceLaw,
    ) -> Result<Self, BodyError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(BodyError::InvalidMass(mass));
        }
        if !(position.is_finite() && velocity.is_finite()) {
            return Err(BodyError::NonFiniteState { position, velocity });
        }
        Ok(Self {
            position,
            velocity,
            mass,
            law,
            force: Vec3::ZERO,
            acceleration: Vec3::ZERO,
        })
    }

    /// Builds a body from compile-time constants whose mass is known valid.
    pub(crate) fn preset(position: Vec3, velocity: Vec3, mass: f64, law: ForceLaw) -> Self {
        debug_assert!(mass.is_finite() && mass > 0.0);
        Self {
            position,
            velocity,
            mass,
            law,
            force: Vec3::ZERO,
            acceleration: Vec3::ZERO,
        }
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }
}

/// Error type for body construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyError {
    InvalidMass(f64),
    NonFiniteState { position: Vec3, velocity: Vec3 },
}

impl fmt::Display for BodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyError::InvalidMass(m) => write!(f, "mass must be finite and positive, got {}", m),
            BodyError::NonFiniteState { position, velocity } => write!(
                f,
                "initial state must be finite, got position {} velocity {}",
                position, velocity
            ),
        }
    }
}

impl std::error::Error for BodyError {}
