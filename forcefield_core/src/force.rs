//! Force laws.
//!
//! Each law maps a body's current position and velocity to the force acting on
//! it for one tick. Laws hold only construction-time parameters, so `compute`
//! is a pure function of its inputs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// A rule producing the instantaneous force on a body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ForceLaw {
    /// Uniform force independent of state, `magnitude * direction`.
    Constant { direction: Vec3, magnitude: f64 },
    /// Attraction toward a fixed point, `k * diff / |diff|^2`.
    InverseSquare { center: Vec3, strength: f64 },
    /// Restoring force toward the origin, `-k * position`.
    LinearSpring { stiffness: f64 },
    /// Restoring force plus velocity damping, `-k * position - c * velocity`.
    DampedSpring { stiffness: f64, damping: f64 },
}

impl ForceLaw {
    /// Computes the force for the given kinematic state.
    ///
    /// Only [`ForceLaw::InverseSquare`] can fail: the force is undefined when
    /// `position` is exactly `center`.
    pub fn compute(&self, position: Vec3, velocity: Vec3) -> Result<Vec3, DomainError> {
        match *self {
            ForceLaw::Constant {
                direction,
                magnitude,
            } => Ok(direction * magnitude),
            ForceLaw::InverseSquare { center, strength } => {
                let diff = center - position;
                let dist_sq = diff.len_sq();
                if dist_sq == 0.0 {
                    return Err(DomainError::CoincidentWithCenter { center });
                }
                Ok(diff * (strength / dist_sq))
            }
            ForceLaw::LinearSpring { stiffness } => Ok(-stiffness * position),
            ForceLaw::DampedSpring { stiffness, damping } => {
                Ok(-stiffness * position - damping * velocity)
            }
        }
    }

    /// Short stable label for logs and snapshots.
    pub fn name(&self) -> &'static str {
        match self {
            ForceLaw::Constant { .. } => "constant",
            ForceLaw::InverseSquare { .. } => "inverse_square",
            ForceLaw::LinearSpring { .. } => "linear_spring",
            ForceLaw::DampedSpring { .. } => "damped_spring",
        }
    }
}

/// Error raised when a force law is evaluated outside its domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DomainError {
    /// The body sits exactly on the attracting center (zero distance).
    CoincidentWithCenter { center: Vec3 },
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::CoincidentWithCenter { center } => {
                write!(f, "position coincides with attraction center {}", center)
            }
        }
    }
}

impl std::error::Error for DomainError {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn constant_ignores_state() {
        let law = ForceLaw::Constant {
            direction: Vec3::new(0.0, -1.0, 0.0),
            magnitude: 1.0,
        };
        let a = law.compute(Vec3::ZERO, Vec3::ZERO).unwrap();
        let b = law
            .compute(Vec3::new(5.0, 6.0, 7.0), Vec3::new(-1.0, 2.0, 0.0))
            .unwrap();
        assert_eq!(a, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(a, b);
    }

    #[test]
    fn constant_scales_direction_by_magnitude() {
        let law = ForceLaw::Constant {
            direction: Vec3::new(1.0, 0.0, 2.0),
            magnitude: 3.0,
        };
        assert_eq!(
            law.compute(Vec3::ZERO, Vec3::ZERO).unwrap(),
            Vec3::new(3.0, 0.0, 6.0)
        );
    }

    #[test]
    fn inverse_square_points_at_center() {
        let law = ForceLaw::InverseSquare {
            center: Vec3::ZERO,
            strength: 7.0,
        };
        let f = law.compute(Vec3::new(5.0, 0.0, 5.0), Vec3::ZERO).unwrap();
        assert_abs_diff_eq!(f.x, -0.7, epsilon = 1e-12);
        assert_abs_diff_eq!(f.y, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f.z, -0.7, epsilon = 1e-12);
    }

    #[test]
    fn inverse_square_falls_off_with_distance() {
        let law = ForceLaw::InverseSquare {
            center: Vec3::new(1.0, 1.0, 1.0),
            strength: 4.0,
        };
        let near = law.compute(Vec3::new(3.0, 1.0, 1.0), Vec3::ZERO).unwrap();
        let far = law.compute(Vec3::new(5.0, 1.0, 1.0), Vec3::ZERO).unwrap();
        // |F| = k / r
        assert_abs_diff_eq!(near.len(), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(far.len(), 1.0, epsilon = 1e-12);
        assert!(near.x < 0.0 && far.x < 0.0);
    }

    #[test]
    fn inverse_square_at_center_is_domain_error() {
        let center = Vec3::new(1.0, 2.0, 3.0);
        let law = ForceLaw::InverseSquare {
            center,
            strength: 7.0,
        };
        let err = law.compute(center, Vec3::new(1.0, 0.0, 0.0)).unwrap_err();
        assert_eq!(err, DomainError::CoincidentWithCenter { center });
        assert!(err.to_string().contains("attraction center"));
    }

    #[test]
    fn linear_spring_restores_toward_origin() {
        let law = ForceLaw::LinearSpring { stiffness: 1.0 };
        let f = law
            .compute(Vec3::new(2.0, 10.0, 0.0), Vec3::new(9.0, 9.0, 9.0))
            .unwrap();
        assert_eq!(f, Vec3::new(-2.0, -10.0, 0.0));
    }

    #[test]
    fn damped_spring_opposes_velocity() {
        let law = ForceLaw::DampedSpring {
            stiffness: 10.0,
            damping: 1.0,
        };
        let f = law
            .compute(Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0))
            .unwrap();
        assert_eq!(f, Vec3::new(-40.0, -2.0, 0.0));
    }

    #[test]
    fn compute_is_pure() {
        let laws = [
            ForceLaw::Constant {
                direction: Vec3::new(0.0, -1.0, 0.0),
                magnitude: 1.0,
            },
            ForceLaw::InverseSquare {
                center: Vec3::ZERO,
                strength: 7.0,
            },
            ForceLaw::LinearSpring { stiffness: 1.0 },
            ForceLaw::DampedSpring {
                stiffness: 10.0,
                damping: 1.0,
            },
        ];
        let pos = Vec3::new(0.3, -1.7, 2.2);
        let vel = Vec3::new(-0.4, 0.1, 0.9);
        for law in laws {
            assert_eq!(law.compute(pos, vel), law.compute(pos, vel), "{}", law.name());
        }
    }

    #[test]
    fn serde_uses_kind_tag() {
        let json = r#"{"kind":"damped_spring","stiffness":10.0,"damping":1.0}"#;
        let law: ForceLaw = serde_json::from_str(json).unwrap();
        assert_eq!(
            law,
            ForceLaw::DampedSpring {
                stiffness: 10.0,
                damping: 1.0
            }
        );
        assert_eq!(law.name(), "damped_spring");
    }
}
