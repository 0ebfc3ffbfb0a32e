//! Stationary producer: a per-plant food-production timer and a bounded
//! outstanding-food counter so a plant cannot flood the tank while its
//! earlier drops are still uneaten.

use super::{EntityId, Locomotion};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum PlantType {
    Kelp,
    Anemone,
    Coral,
}

#[derive(Clone, Debug)]
pub struct Plant {
    pub loc: Locomotion,
    pub plant_type: PlantType,
    pub production_timer: u64,
    pub outstanding_food: usize,
}

impl Plant {
    pub fn new(id: EntityId, x: f64, y: f64, plant_type: PlantType) -> Self {
        Self {
            loc: Locomotion::new(id, x, y, 16.0, 40.0),
            plant_type,
            production_timer: 0,
            outstanding_food: 0,
        }
    }

    pub fn tick_production(&mut self, interval: u64) -> bool {
        self.production_timer += 1;
        if self.production_timer >= interval {
            self.production_timer = 0;
            true
        } else {
            false
        }
    }
}
