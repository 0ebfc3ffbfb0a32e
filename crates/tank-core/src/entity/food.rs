//! Ephemeral food items. Each type fixes an energy value, a sink
//! multiplier, and whether the item is stationary; nectar is the only
//! stationary type and is always anchored to a source plant.

use super::{EntityId, Locomotion};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum FoodType {
    Algae,
    Protein,
    Vitamin,
    Energy,
    Rare,
    Nectar,
}

impl FoodType {
    /// `(energy, sink_multiplier, stationary)`, bit-exact per the food
    /// catalog table.
    pub fn properties(self) -> (f32, f64, bool) {
        match self {
            FoodType::Algae => (30.0, 0.8, false),
            FoodType::Protein => (50.0, 1.2, false),
            FoodType::Vitamin => (40.0, 0.9, false),
            FoodType::Energy => (45.0, 1.0, false),
            FoodType::Rare => (75.0, 1.1, false),
            FoodType::Nectar => (60.0, 0.0, true),
        }
    }

    pub fn energy_value(self) -> f32 {
        self.properties().0
    }

    pub fn sink_multiplier(self) -> f64 {
        self.properties().1
    }

    pub fn is_stationary(self) -> bool {
        self.properties().2
    }
}

#[derive(Clone, Debug)]
pub struct Food {
    pub loc: Locomotion,
    pub food_type: FoodType,
    /// The plant this nectar item is anchored to, if any; decrements
    /// that plant's outstanding-food counter when eaten.
    pub source_plant: Option<EntityId>,
}

impl Food {
    pub fn new(id: EntityId, x: f64, y: f64, food_type: FoodType, source_plant: Option<EntityId>) -> Self {
        let loc = Locomotion::new(id, x, y, 6.0, 6.0);
        Self {
            loc,
            food_type,
            source_plant,
        }
    }
}
