//! Configuration system.
//!
//! Loads simulation configuration from JSON strings/files.

use std::path::Path;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use crate::{
    body::{Body, BodyError},
    force::ForceLaw,
    integrator::{SemiImplicitEuler, VelocityUpdate},
    math::Vec3,
    scenario::Scenario,
    sim::Simulation,
};

/// What the driver does when a body's force law fails during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultPolicy {
    /// Log the fault, leave the body as it was, keep running.
    #[default]
    Skip,
    /// Stop the simulation on the first fault.
    Halt,
}

/// One body to create at startup.
///
/// An object with a `scenario` key is a preset; anything else must spell out
/// the full initial state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, try_from = "RawBodySpec")]
pub enum BodySpec {
    /// A built-in scenario, optionally renamed.
    Preset {
        scenario: Scenario,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    /// Fully specified initial state.
    Custom {
        name: String,
        position: Vec3,
        velocity: Vec3,
        mass: f64,
        law: ForceLaw,
    },
}

/// Flat form of [`BodySpec`] as it appears in JSON.
#[derive(Deserialize)]
struct RawBodySpec {
    scenario: Option<Scenario>,
    name: Option<String>,
    position: Option<Vec3>,
    #[serde(default)]
    velocity: Vec3,
    mass: Option<f64>,
    law: Option<ForceLaw>,
}

impl TryFrom<RawBodySpec> for BodySpec {
    type Error = String;

    fn try_from(raw: RawBodySpec) -> Result<Self, Self::Error> {
        if let Some(scenario) = raw.scenario {
            return Ok(BodySpec::Preset {
                scenario,
                name: raw.name,
            });
        }
        let missing = |field: &str| format!("body without `scenario` needs `{}`", field);
        Ok(BodySpec::Custom {
            name: raw.name.ok_or_else(|| missing("name"))?,
            position: raw.position.ok_or_else(|| missing("position"))?,
            velocity: raw.velocity,
            mass: raw.mass.ok_or_else(|| missing("mass"))?,
            law: raw.law.ok_or_else(|| missing("law"))?,
        })
    }
}

impl BodySpec {
    pub fn preset(scenario: Scenario) -> Self {
        BodySpec::Preset {
            scenario,
            name: None,
        }
    }

    /// Builds the body and the name it should be spawned under.
    pub fn build(&self) -> Result<(String, Body), BodyError> {
        match self {
            BodySpec::Preset { scenario, name } => Ok((
                name.clone().unwrap_or_else(|| scenario.name().to_string()),
                scenario.initialize(),
            )),
            BodySpec::Custom {
                name,
                position,
                velocity,
                mass,
                law,
            } => Ok((name.clone(), Body::new(*position, *velocity, *mass, *law)?)),
        }
    }
}

/// Root simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Fixed simulation tick rate.
    #[serde(default = "default_tick_hz")]
    pub tick_hz: u32,
    /// Stop after this many ticks; run until told to quit if absent.
    #[serde(default)]
    pub max_ticks: Option<u64>,
    #[serde(default)]
    pub velocity_update: VelocityUpdate,
    #[serde(default)]
    pub fault_policy: FaultPolicy,
    /// Emit a snapshot line every N ticks (0 disables).
    #[serde(default)]
    pub snapshot_every: u64,
    #[serde(default = "default_bodies")]
    pub bodies: Vec<BodySpec>,
}

fn default_tick_hz() -> u32 {
    50
}

fn default_bodies() -> Vec<BodySpec> {
    Scenario::ALL.iter().copied().map(BodySpec::preset).collect()
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_hz: default_tick_hz(),
            max_ticks: None,
            velocity_update: VelocityUpdate::default(),
            fault_policy: FaultPolicy::default(),
            snapshot_every: 0,
            bodies: default_bodies(),
        }
    }
}

impl SimConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Reads a JSON config file without validating it, so callers can layer
    /// overrides on top first.
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("parse config {}", path.display()))
    }

    /// Reads and validates a JSON config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let cfg = Self::read(path)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tick_hz == 0 {
            bail!("tick_hz must be positive");
        }
        for (i, spec) in self.bodies.iter().enumerate() {
            spec.build().with_context(|| format!("body {}", i))?;
        }
        Ok(())
    }

    /// Fixed step length in seconds.
    pub fn dt(&self) -> f64 {
        1.0 / f64::from(self.tick_hz)
    }

    /// Builds the simulation described by this config.
    pub fn build_simulation(&self) -> anyhow::Result<Simulation> {
        let integrator = SemiImplicitEuler::new(self.velocity_update);
        Simulation::initialize(&self.bodies, Box::new(integrator)).context("build simulation")
    }
}
