//! Closed-loop controllers that inject food and fish without being
//! driven by any entity's own update: the auto-food controller (spec
//! §4.7, step-function spawn interval from tank-wide energy/population
//! aggregates) and the emergency fish spawner (unconditional spawn
//! below the critical-population threshold, quadratic-decay probability
//! up to max population). Both draw exclusively from
//! `RngStreams::stream_for(RngDomain::Spawner)`.

use rand::Rng;

use crate::config::TankConfig;
use crate::entity::food::FoodType;
use crate::entity::{Entity, EntityId, Fish};
use crate::genome::Genome;

#[derive(Clone, Debug, Default)]
pub struct AutoFoodController {
    frames_since_spawn: u64,
}

impl AutoFoodController {
    /// Step-function interval: shorter (more food) when energy is
    /// critically low, longer (less food) when energy or population is
    /// high. `cfg.auto_food_spawn_rate` is the base interval at the
    /// default (mid-range) band.
    fn interval(cfg: &TankConfig, total_energy: f32, fish_count: usize) -> u64 {
        if total_energy < cfg.auto_food_low_energy_threshold {
            cfg.auto_food_spawn_rate / 2
        } else if total_energy > cfg.auto_food_high_energy_threshold_2
            || fish_count > cfg.auto_food_high_pop_threshold_2
        {
            cfg.auto_food_spawn_rate * 2
        } else if total_energy > cfg.auto_food_high_energy_threshold_1
            || fish_count > cfg.auto_food_high_pop_threshold_1
        {
            (cfg.auto_food_spawn_rate * 3) / 2
        } else {
            cfg.auto_food_spawn_rate
        }
        .max(1)
    }

    /// Advances the internal counter by one frame and returns a new
    /// `Food` entity when the (possibly adaptive) interval expires.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        cfg: &TankConfig,
        total_energy: f32,
        fish_count: usize,
        is_dawn_or_dusk: bool,
        next_id: impl FnOnce() -> EntityId,
        rng: &mut R,
    ) -> Option<Entity> {
        if !cfg.auto_food_enabled {
            return None;
        }
        self.frames_since_spawn += 1;
        if self.frames_since_spawn < Self::interval(cfg, total_energy, fish_count) {
            return None;
        }
        self.frames_since_spawn = 0;

        let food_type = draw_food_type(cfg, rng);
        let x = rng.random_range(0.0..cfg.screen_width);
        let y = cfg.fish_top_margin;
        let id = next_id();
        let mut food = crate::entity::food::Food::new(id, x, y, food_type, None);

        let live_fraction = if is_dawn_or_dusk {
            cfg.live_food_fraction_dawn_dusk
        } else {
            cfg.live_food_fraction
        };
        if rng.random::<f32>() < live_fraction {
            food.loc.vx = rng.random_range(-0.4..0.4);
        }
        Some(Entity::Food(Box::new(food)))
    }
}

fn draw_food_type<R: Rng + ?Sized>(cfg: &TankConfig, rng: &mut R) -> FoodType {
    let catalog = cfg.food_catalog();
    let total: f32 = catalog.iter().map(|(_, w)| w).sum();
    let mut roll = rng.random_range(0.0..total);
    for (food_type, weight) in catalog {
        if roll < weight {
            return food_type;
        }
        roll -= weight;
    }
    catalog[catalog.len() - 1].0
}

#[derive(Clone, Debug, Default)]
pub struct EmergencySpawner {
    frames_since_spawn: u64,
}

impl EmergencySpawner {
    /// Quadratic decay from `1.0` at `critical_population_threshold` to
    /// `0.0` at `max_population`: `p = (1 - t)^2` where `t` is the
    /// fish count's fractional progress across that band.
    fn spawn_probability(cfg: &TankConfig, fish_count: usize) -> f32 {
        if fish_count < cfg.critical_population_threshold {
            return 1.0;
        }
        if fish_count >= cfg.max_population {
            return 0.0;
        }
        let band = (cfg.max_population - cfg.critical_population_threshold).max(1) as f32;
        let t = (fish_count - cfg.critical_population_threshold) as f32 / band;
        (1.0 - t).powi(2)
    }

    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        cfg: &TankConfig,
        fish_count: usize,
        next_id: impl FnOnce() -> EntityId,
        rng: &mut R,
    ) -> Option<Entity> {
        self.frames_since_spawn += 1;
        if self.frames_since_spawn < cfg.emergency_spawn_cooldown {
            return None;
        }
        if fish_count >= cfg.max_population {
            return None;
        }
        let should_spawn = fish_count < cfg.critical_population_threshold
            || rng.random::<f32>() < Self::spawn_probability(cfg, fish_count);
        if !should_spawn {
            return None;
        }
        self.frames_since_spawn = 0;

        let genome = Genome::random(rng);
        let x = rng.random_range(0.0..cfg.screen_width);
        let y = rng.random_range(cfg.fish_top_margin..cfg.screen_height / 2.0);
        let id = next_id();
        let fish = Fish::new(id, x, y, genome, 0, cfg);
        Some(Entity::Fish(Box::new(fish)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn auto_food_spawns_faster_under_low_energy() {
        let cfg = TankConfig::default();
        let slow = AutoFoodController::interval(&cfg, 5000.0, 10);
        let fast = AutoFoodController::interval(&cfg, 10.0, 10);
        assert!(fast < slow);
    }

    #[test]
    fn emergency_spawner_always_spawns_below_critical() {
        let mut cfg = TankConfig::default();
        cfg.emergency_spawn_cooldown = 0;
        let mut spawner = EmergencySpawner::default();
        let mut rng = ChaCha12Rng::seed_from_u64(3);
        let mut next = 0u64;
        let result = spawner.tick(&cfg, 1, || {
            next += 1;
            next
        }, &mut rng);
        assert!(result.is_some());
    }

    #[test]
    fn emergency_spawner_never_spawns_at_or_above_max_population() {
        let mut cfg = TankConfig::default();
        cfg.emergency_spawn_cooldown = 0;
        let mut spawner = EmergencySpawner::default();
        let mut rng = ChaCha12Rng::seed_from_u64(4);
        let mut next = 0u64;
        let result = spawner.tick(&cfg, cfg.max_population, || {
            next += 1;
            next
        }, &mut rng);
        assert!(result.is_none());
    }
}
