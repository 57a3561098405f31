//! Serializable per-tick state.

use serde::{Deserialize, Serialize};

use crate::{body::BodyId, math::Vec3};

/// State of one body at a tick boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    pub id: BodyId,
    pub name: String,
    pub law: String,
    pub position: Vec3,
    pub velocity: Vec3,
    pub force: Vec3,
    pub acceleration: Vec3,
}

/// All bodies at a tick boundary, in ascending id order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub bodies: Vec<BodyState>,
}

impl Snapshot {
    /// Single-line JSON encoding.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn find(&self, id: BodyId) -> Option<&BodyState> {
        self.bodies.iter().find(|b| b.id == id)
    }
}
