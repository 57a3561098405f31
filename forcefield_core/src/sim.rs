//! Simulation driver step.
//!
//! Owns a set of independent bodies and advances each of them once per tick.
//!
//! Determinism notes:
//! - Bodies are stored in a `BTreeMap`, so iteration is ascending `BodyId`.
//! - No body reads another body's state, so order never changes results.
//! - A force-law failure only affects the failing body.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::{
    body::{Body, BodyError, BodyId},
    config::BodySpec,
    force::DomainError,
    integrator::{Integrator, SemiImplicitEuler},
    snapshot::{BodyState, Snapshot},
};

/// A body plus the label it was spawned under.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedBody {
    pub name: String,
    pub body: Body,
}

/// Outcome of one [`Simulation::step`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickReport {
    /// Tick that was just executed.
    pub tick: u64,
    /// Bodies that advanced.
    pub stepped: usize,
    /// Bodies left untouched because their force law failed.
    pub faults: Vec<(BodyId, DomainError)>,
}

impl TickReport {
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }
}

/// Set of bodies advanced together by one integrator.
pub struct Simulation {
    bodies: BTreeMap<BodyId, NamedBody>,
    integrator: Box<dyn Integrator>,
    next_id: u64,
    tick: u64,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(Box::new(SemiImplicitEuler::default()))
    }
}

impl Simulation {
    pub fn new(integrator: Box<dyn Integrator>) -> Self {
        Self {
            bodies: BTreeMap::new(),
            integrator,
            next_id: 0,
            tick: 0,
        }
    }

    /// Builds a simulation populated from body specs, in order.
    pub fn initialize(
        specs: &[BodySpec],
        integrator: Box<dyn Integrator>,
    ) -> Result<Self, BodyError> {
        let mut sim = Self::new(integrator);
        for spec in specs {
            let (name, body) = spec.build()?;
            sim.spawn(name, body);
        }
        Ok(sim)
    }

    /// Adds a body and returns its id.
    pub fn spawn(&mut self, name: impl Into<String>, body: Body) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        let name = name.into();
        debug!(%id, name = %name, law = body.law.name(), "Spawned body");
        self.bodies.insert(id, NamedBody { name, body });
        id
    }

    /// Removes a body.
    pub fn despawn(&mut self, id: BodyId) -> Option<NamedBody> {
        let removed = self.bodies.remove(&id);
        if removed.is_some() {
            debug!(%id, "Despawned body");
        }
        removed
    }

    pub fn get(&self, id: BodyId) -> Option<&NamedBody> {
        self.bodies.get(&id)
    }

    /// Iterates bodies in ascending id order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &NamedBody)> {
        self.bodies.iter().map(|(id, b)| (*id, b))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Number of ticks executed so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Advances every body by one fixed tick of `dt` seconds.
    pub fn step(&mut self, dt: f64) -> TickReport {
        let mut report = TickReport {
            tick: self.tick,
            ..Default::default()
        };

        for (id, entry) in self.bodies.iter_mut() {
            match self.integrator.step(&mut entry.body, dt) {
                Ok(()) => report.stepped += 1,
                Err(e) => {
                    warn!(
                        %id,
                        name = %entry.name,
                        tick = self.tick,
                        error = %e,
                        "Force law failed"
                    );
                    report.faults.push((*id, e));
                }
            }
        }

        self.tick += 1;
        report
    }

    /// Captures the current state of every body.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick,
            bodies: self
                .bodies
                .iter()
                .map(|(id, entry)| BodyState {
                    id: *id,
                    name: entry.name.clone(),
                    law: entry.body.law.name().to_string(),
                    position: entry.body.position,
                    velocity: entry.body.velocity,
                    force: entry.body.force,
                    acceleration: entry.body.acceleration,
                })
                .collect(),
        }
    }
}
