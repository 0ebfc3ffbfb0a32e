//! The entity model: one tagged sum over the five kinds of thing that
//! live in the tank, sharing a common locomotion block.

pub mod castle;
pub mod crab;
pub mod fish;
pub mod food;
pub mod plant;

pub use castle::Castle;
pub use crab::Crab;
pub use fish::Fish;
pub use food::{Food, FoodType};
pub use plant::Plant;

/// Stable, monotonically-increasing identity assigned once at spawn and
/// never reused. All iteration in the world loop is ordered by this ID,
/// not by insertion slot, so that removing and re-inserting entities in
/// a `Vec` never perturbs determinism.
pub type EntityId = u64;

/// Position/velocity/footprint shared by every entity kind. Position is
/// left unclamped by the integrator; boundary policy is applied by the
/// caller after integration: bounce, clamp, and top margin are
/// applied after each update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Locomotion {
    pub id: EntityId,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub w: f64,
    pub h: f64,
}

impl Locomotion {
    pub fn new(id: EntityId, x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            id,
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            w,
            h,
        }
    }

    pub fn integrate(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
    }

    pub fn speed(&self) -> f64 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }
}

/// Boundary policy applied after integration. Fish clamp at the top
/// (so they never swim above the surface) and bounce off the other
/// three edges; crabs are further constrained to the floor by their
/// own update. Food simply sinks out of the bottom edge and is culled
/// by the world loop rather than bounced.
pub fn bounce_horizontal_and_bottom(loc: &mut Locomotion, screen_w: f64, screen_h: f64) {
    if loc.x < 0.0 {
        loc.x = 0.0;
        loc.vx = -loc.vx;
    } else if loc.x + loc.w > screen_w {
        loc.x = screen_w - loc.w;
        loc.vx = -loc.vx;
    }
    if loc.y + loc.h > screen_h {
        loc.y = screen_h - loc.h;
        loc.vy = -loc.vy;
    }
}

pub fn clamp_top(loc: &mut Locomotion, top_margin: f64) {
    if loc.y < top_margin {
        loc.y = top_margin;
        loc.vy = loc.vy.max(0.0);
    }
}

/// Tag used by the spatial index to key cells per (cell, kind), and by
/// snapshots to label entities without downcasting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub enum EntityKind {
    Fish,
    Crab,
    Plant,
    Food,
    Castle,
}

/// Cause recorded against a fish or crab death, used for both snapshot
/// attribution and the per-algorithm fitness tracker's death-cause
/// breakdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub enum DeathCause {
    Starvation,
    OldAge,
    Predation,
    Unknown,
}

impl DeathCause {
    pub fn as_str(self) -> &'static str {
        match self {
            DeathCause::Starvation => "starvation",
            DeathCause::OldAge => "old_age",
            DeathCause::Predation => "predation",
            DeathCause::Unknown => "unknown",
        }
    }
}

/// The tagged sum over all five entity kinds. `World` stores one `Vec<Entity>`
/// and matches on this variant wherever kind-specific behavior is needed;
/// there is no trait-object indirection because the variant set is closed
/// and small.
#[derive(Clone, Debug)]
pub enum Entity {
    Fish(Box<Fish>),
    Crab(Box<Crab>),
    Plant(Box<Plant>),
    Food(Box<Food>),
    Castle(Box<Castle>),
}

impl Entity {
    pub fn id(&self) -> EntityId {
        self.locomotion().id
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Fish(_) => EntityKind::Fish,
            Entity::Crab(_) => EntityKind::Crab,
            Entity::Plant(_) => EntityKind::Plant,
            Entity::Food(_) => EntityKind::Food,
            Entity::Castle(_) => EntityKind::Castle,
        }
    }

    pub fn locomotion(&self) -> &Locomotion {
        match self {
            Entity::Fish(f) => &f.loc,
            Entity::Crab(c) => &c.loc,
            Entity::Plant(p) => &p.loc,
            Entity::Food(f) => &f.loc,
            Entity::Castle(c) => &c.loc,
        }
    }

    pub fn locomotion_mut(&mut self) -> &mut Locomotion {
        match self {
            Entity::Fish(f) => &mut f.loc,
            Entity::Crab(c) => &mut c.loc,
            Entity::Plant(p) => &mut p.loc,
            Entity::Food(f) => &mut f.loc,
            Entity::Castle(c) => &mut c.loc,
        }
    }

    pub fn as_fish(&self) -> Option<&Fish> {
        match self {
            Entity::Fish(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_fish_mut(&mut self) -> Option<&mut Fish> {
        match self {
            Entity::Fish(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_crab(&self) -> Option<&Crab> {
        match self {
            Entity::Crab(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_crab_mut(&mut self) -> Option<&mut Crab> {
        match self {
            Entity::Crab(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_plant(&self) -> Option<&Plant> {
        match self {
            Entity::Plant(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_plant_mut(&mut self) -> Option<&mut Plant> {
        match self {
            Entity::Plant(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_food(&self) -> Option<&Food> {
        match self {
            Entity::Food(f) => Some(f),
            _ => None,
        }
    }
}
