//! Preset scenarios.
//!
//! Each preset fixes a body's initial position, velocity, mass and force law.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{body::Body, force::ForceLaw, math::Vec3};

/// Built-in initial conditions.
///
/// Deserializes through [`FromStr`], so config files accept the same names
/// and aliases as the command line and console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Scenario {
    /// Free fall from (0, 1000, 0) under a constant downward force.
    Gravity,
    /// Orbit around a fixed focus at the origin.
    Satellite,
    /// Undamped spring anchored at the origin.
    SpringC,
    /// Damped spring anchored at the origin.
    SpringD,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::Gravity,
        Scenario::Satellite,
        Scenario::SpringC,
        Scenario::SpringD,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scenario::Gravity => "gravity",
            Scenario::Satellite => "satellite",
            Scenario::SpringC => "spring_c",
            Scenario::SpringD => "spring_d",
        }
    }

    pub fn law(self) -> ForceLaw {
        match self {
            Scenario::Gravity => ForceLaw::Constant {
                direction: Vec3::new(0.0, -1.0, 0.0),
                magnitude: 1.0,
            },
            Scenario::Satellite => ForceLaw::InverseSquare {
                center: Vec3::ZERO,
                strength: 7.0,
            },
            Scenario::SpringC => ForceLaw::LinearSpring { stiffness: 1.0 },
            Scenario::SpringD => ForceLaw::DampedSpring {
                stiffness: 10.0,
                damping: 1.0,
            },
        }
    }

    /// Builds the body this scenario starts with.
    pub fn initialize(self) -> Body {
        let (position, velocity, mass) = match self {
            Scenario::Gravity => (Vec3::new(0.0, 1000.0, 0.0), Vec3::ZERO, 10.0),
            Scenario::Satellite => (Vec3::new(5.0, 0.0, 5.0), Vec3::new(1.0, 0.0, 0.0), 100.0),
            Scenario::SpringC => (Vec3::new(2.0, 10.0, 0.0), Vec3::ZERO, 10.0),
            Scenario::SpringD => (Vec3::new(4.0, 1000.0, 0.0), Vec3::ZERO, 10.0),
        };
        Body::preset(position, velocity, mass, self.law())
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = UnknownScenario;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gravity" => Ok(Scenario::Gravity),
            "satellite" => Ok(Scenario::Satellite),
            "spring_c" | "springc" | "undamped_spring" => Ok(Scenario::SpringC),
            "spring_d" | "springd" | "damped_spring" => Ok(Scenario::SpringD),
            _ => Err(UnknownScenario(s.to_string())),
        }
    }
}

impl TryFrom<String> for Scenario {
    type Error = UnknownScenario;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Error type for scenario name parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownScenario(pub String);

impl fmt::Display for UnknownScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown scenario '{}'", self.0)
    }
}

impl std::error::Error for UnknownScenario {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_match_initial_conditions() {
        let g = Scenario::Gravity.initialize();
        assert_eq!(g.position, Vec3::new(0.0, 1000.0, 0.0));
        assert_eq!(g.velocity, Vec3::ZERO);
        assert_eq!(g.mass(), 10.0);

        let s = Scenario::Satellite.initialize();
        assert_eq!(s.position, Vec3::new(5.0, 0.0, 5.0));
        assert_eq!(s.velocity, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(s.mass(), 100.0);

        let c = Scenario::SpringC.initialize();
        assert_eq!(c.position, Vec3::new(2.0, 10.0, 0.0));
        assert_eq!(c.law, ForceLaw::LinearSpring { stiffness: 1.0 });

        let d = Scenario::SpringD.initialize();
        assert_eq!(d.position, Vec3::new(4.0, 1000.0, 0.0));
        assert_eq!(
            d.law,
            ForceLaw::DampedSpring {
                stiffness: 10.0,
                damping: 1.0
            }
        );
    }

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("Gravity".parse::<Scenario>().unwrap(), Scenario::Gravity);
        assert_eq!("undamped_spring".parse::<Scenario>().unwrap(), Scenario::SpringC);
        assert_eq!("SpringD".parse::<Scenario>().unwrap(), Scenario::SpringD);
        assert!("moon".parse::<Scenario>().is_err());
        for s in Scenario::ALL {
            assert_eq!(s.name().parse::<Scenario>().unwrap(), s);
        }
    }

    #[test]
    fn serde_accepts_aliases() {
        let s: Scenario = serde_json::from_str("\"damped_spring\"").unwrap();
        assert_eq!(s, Scenario::SpringD);
        let s: Scenario = serde_json::from_str("\"Satellite\"").unwrap();
        assert_eq!(s, Scenario::Satellite);
        let s: Scenario = serde_json::from_str("\"springc\"").unwrap();
        assert_eq!(s, Scenario::SpringC);
    }

    #[test]
    fn serde_round_trips_canonical_name() {
        let json = serde_json::to_string(&Scenario::SpringD).unwrap();
        assert_eq!(json, "\"spring_d\"");
        let err = serde_json::from_str::<Scenario>("\"moon\"").unwrap_err();
        assert!(err.to_string().contains("unknown scenario 'moon'"));
    }
}
