//! The read-only view a behavior gets of its fish's local surroundings.
//! Built fresh each frame from the spatial index before behaviors run;
//! never mutated by a behavior.

/// A nearby entity expressed relative to the querying fish: direction
/// components already point *from* the fish *to* the entity, and
/// `distance` is their Euclidean separation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nearby {
    pub dx: f64,
    pub dy: f64,
    pub distance: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SchoolMate {
    pub dx: f64,
    pub dy: f64,
    pub vx: f64,
    pub vy: f64,
}

#[derive(Clone, Debug)]
pub struct BehaviorContext {
    pub energy_ratio: f32,
    pub nearest_predator: Option<Nearby>,
    pub nearest_food: Option<Nearby>,
    /// The fish's own nearest remembered food location, independent of
    /// whether any food is currently in view; lets memory-guided foraging
    /// bias toward a previously productive spot once it's out of sight.
    pub remembered_food: Option<Nearby>,
    pub nearby_same_species: Vec<SchoolMate>,
    /// Position and tank bounds, used by border/patrol/vertical algorithms.
    pub x: f64,
    pub y: f64,
    pub screen_w: f64,
    pub screen_h: f64,
    pub frame: u64,
}

impl BehaviorContext {
    /// Minimal context with no nearby entities, used by tests that only
    /// care that every algorithm returns a finite, bounded velocity.
    pub fn idle(energy_ratio: f32) -> Self {
        Self {
            energy_ratio,
            nearest_predator: None,
            nearest_food: None,
            remembered_food: None,
            nearby_same_species: Vec::new(),
            x: 400.0,
            y: 300.0,
            screen_w: 800.0,
            screen_h: 600.0,
            frame: 0,
        }
    }
}
