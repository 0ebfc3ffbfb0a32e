//! Inert decorative static entity, retained for completeness. Collision-
//! inert; never participates in behaviors, never moves.

use super::{EntityId, Locomotion};

#[derive(Clone, Debug)]
pub struct Castle {
    pub loc: Locomotion,
}

impl Castle {
    pub fn new(id: EntityId, x: f64, y: f64) -> Self {
        Self {
            loc: Locomotion::new(id, x, y, 80.0, 60.0),
        }
    }
}
