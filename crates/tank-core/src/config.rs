//! Simulation configuration, validated once at `reset` time and never
//! mutated during `step` (spec.md §7: `InvalidConfiguration` is raised
//! from `reset`, never during `step`).

use std::error::Error;
use std::fmt;

use crate::entity::food::FoodType;

/// Constructed via `Default` and overridden field-by-field, then checked
/// with [`TankConfig::validate`] before a `World` is built from it. Mirrors
/// `digital-life-core::config::SimConfig` in shape and in when validation
/// runs.
#[derive(Clone, Debug, PartialEq)]
pub struct TankConfig {
    pub seed: u64,
    pub screen_width: f64,
    pub screen_height: f64,
    pub fish_top_margin: f64,

    pub initial_fish_count: usize,
    pub initial_crab_count: usize,
    pub initial_plant_count: usize,
    pub max_population: usize,
    pub critical_population_threshold: usize,

    pub plants_enabled: bool,
    pub poker_enabled: bool,

    pub cell_size: f64,
    pub fish_vision_range_base: f64,

    pub energy_max_default: f32,
    pub initial_energy_ratio: f32,
    pub starvation_threshold: f32,
    pub low_energy_threshold: f32,
    pub safe_energy_threshold: f32,

    pub baby_metabolism_multiplier: f32,
    pub elder_metabolism_multiplier: f32,
    pub energy_movement_base_cost: f32,

    pub life_stage_baby_max: u64,
    pub life_stage_juvenile_max: u64,
    pub life_stage_young_adult_max: u64,
    pub life_stage_adult_max: u64,
    pub life_stage_mature_max: u64,
    pub max_lifespan_base: u64,

    pub reproduction_min_energy: f32,
    pub reproduction_cooldown: u64,
    pub reproduction_gestation: u64,
    pub reproduction_energy_cost: f32,
    pub mating_distance: f64,

    pub post_poker_reproduction_energy_threshold: f32,
    pub post_poker_reproduction_winner_prob: f32,
    pub post_poker_reproduction_loser_prob: f32,
    pub post_poker_crossover_winner_weight: f32,
    pub post_poker_mating_distance: f64,

    pub max_food_memories: usize,
    pub food_memory_decay_frames: u64,
    pub predator_encounter_window: u64,

    /// Per-frame velocity added to sinking food, scaled by
    /// `FoodType::sink_multiplier`; stationary types never sink.
    pub food_sink_acceleration: f64,

    pub crab_initial_energy: f32,
    pub crab_attack_energy_transfer: f32,
    pub crab_attack_damage: f32,
    pub crab_idle_consumption: f32,
    pub crab_attack_cooldown: u64,

    pub plant_food_production_interval: u64,
    pub plant_food_production_energy_cost: f32,
    pub plant_production_chance: f32,
    pub plant_max_outstanding_food: usize,

    pub auto_food_enabled: bool,
    pub auto_food_spawn_rate: u64,
    pub auto_food_low_energy_threshold: f32,
    pub auto_food_high_energy_threshold_1: f32,
    pub auto_food_high_energy_threshold_2: f32,
    pub auto_food_high_pop_threshold_1: usize,
    pub auto_food_high_pop_threshold_2: usize,
    pub live_food_fraction: f32,
    pub live_food_fraction_dawn_dusk: f32,

    pub emergency_spawn_cooldown: u64,

    pub mutation_rate: f32,
    pub mutation_strength: f32,
    pub algorithm_mutation_rate_multiplier: f32,

    pub poker_min_energy: f32,
    pub poker_cooldown: u64,
    pub poker_max_players: usize,
    pub poker_house_cut_fraction: f32,
    pub poker_proximity_min: f64,
    pub poker_proximity_max: f64,

    pub max_events: usize,
    pub max_lineage_records: usize,
    pub max_poker_events: usize,

    pub day_length_frames: u64,

    pub energy_ledger_window_frames: u64,
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            screen_width: 800.0,
            screen_height: 600.0,
            fish_top_margin: 20.0,

            initial_fish_count: 10,
            initial_crab_count: 1,
            initial_plant_count: 3,
            max_population: 60,
            critical_population_threshold: 5,

            plants_enabled: true,
            poker_enabled: true,

            cell_size: 64.0,
            fish_vision_range_base: 120.0,

            energy_max_default: 100.0,
            initial_energy_ratio: 0.5,
            starvation_threshold: 15.0,
            low_energy_threshold: 30.0,
            safe_energy_threshold: 60.0,

            baby_metabolism_multiplier: 0.7,
            elder_metabolism_multiplier: 1.2,
            energy_movement_base_cost: 0.05,

            life_stage_baby_max: 300,
            life_stage_juvenile_max: 900,
            life_stage_young_adult_max: 1800,
            life_stage_adult_max: 3600,
            life_stage_mature_max: 5400,
            max_lifespan_base: 9000,

            reproduction_min_energy: 35.0,
            reproduction_cooldown: 360,
            reproduction_gestation: 300,
            reproduction_energy_cost: 60.0,
            mating_distance: 60.0,

            post_poker_reproduction_energy_threshold: 40.0,
            post_poker_reproduction_winner_prob: 0.4,
            post_poker_reproduction_loser_prob: 0.2,
            post_poker_crossover_winner_weight: 0.6,
            post_poker_mating_distance: 80.0,

            max_food_memories: 5,
            food_memory_decay_frames: 600,
            predator_encounter_window: 150,
            food_sink_acceleration: 0.01,

            crab_initial_energy: 150.0,
            crab_attack_energy_transfer: 60.0,
            crab_attack_damage: 20.0,
            crab_idle_consumption: 0.01,
            crab_attack_cooldown: 120,

            plant_food_production_interval: 75,
            plant_food_production_energy_cost: 15.0,
            plant_production_chance: 0.35,
            plant_max_outstanding_food: 6,

            auto_food_enabled: true,
            auto_food_spawn_rate: 90,
            auto_food_low_energy_threshold: 2000.0,
            auto_food_high_energy_threshold_1: 4000.0,
            auto_food_high_energy_threshold_2: 6000.0,
            auto_food_high_pop_threshold_1: 15,
            auto_food_high_pop_threshold_2: 20,
            live_food_fraction: 0.05,
            live_food_fraction_dawn_dusk: 0.2,

            emergency_spawn_cooldown: 150,

            mutation_rate: 0.1,
            mutation_strength: 0.1,
            algorithm_mutation_rate_multiplier: 1.5,

            poker_min_energy: 20.0,
            poker_cooldown: 600,
            poker_max_players: 6,
            poker_house_cut_fraction: 0.05,
            poker_proximity_min: 10.0,
            poker_proximity_max: 60.0,

            max_events: 1000,
            max_lineage_records: 2000,
            max_poker_events: 10,

            day_length_frames: 3600,

            energy_ledger_window_frames: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TankConfigError {
    NonPositiveDimension { field: &'static str, value: f64 },
    ZeroCellSize,
    CriticalAboveMax { critical: usize, max: usize },
    InvalidProbability { field: &'static str, value: f32 },
    InvalidPokerPlayerCount { value: usize },
    ProximityBandInverted { min: f64, max: f64 },
}

impl fmt::Display for TankConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TankConfigError::NonPositiveDimension { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            TankConfigError::ZeroCellSize => write!(f, "cell_size must be positive"),
            TankConfigError::CriticalAboveMax { critical, max } => write!(
                f,
                "critical_population_threshold ({critical}) must be <= max_population ({max})"
            ),
            TankConfigError::InvalidProbability { field, value } => {
                write!(f, "{field} must be in [0, 1], got {value}")
            }
            TankConfigError::InvalidPokerPlayerCount { value } => write!(
                f,
                "poker_max_players ({value}) must be in 2..=6 to keep a single deck sufficient"
            ),
            TankConfigError::ProximityBandInverted { min, max } => write!(
                f,
                "poker_proximity_min ({min}) must be <= poker_proximity_max ({max})"
            ),
        }
    }
}

impl Error for TankConfigError {}

impl TankConfig {
    pub const MAX_POKER_PLAYERS: usize = 6;

    pub fn validate(&self) -> Result<(), TankConfigError> {
        if self.screen_width <= 0.0 {
            return Err(TankConfigError::NonPositiveDimension {
                field: "screen_width",
                value: self.screen_width,
            });
        }
        if self.screen_height <= 0.0 {
            return Err(TankConfigError::NonPositiveDimension {
                field: "screen_height",
                value: self.screen_height,
            });
        }
        if self.cell_size <= 0.0 {
            return Err(TankConfigError::ZeroCellSize);
        }
        if self.critical_population_threshold > self.max_population {
            return Err(TankConfigError::CriticalAboveMax {
                critical: self.critical_population_threshold,
                max: self.max_population,
            });
        }
        for (field, value) in [
            ("plant_production_chance", self.plant_production_chance),
            ("mutation_rate", self.mutation_rate),
            ("live_food_fraction", self.live_food_fraction),
            (
                "live_food_fraction_dawn_dusk",
                self.live_food_fraction_dawn_dusk,
            ),
            (
                "post_poker_reproduction_winner_prob",
                self.post_poker_reproduction_winner_prob,
            ),
            (
                "post_poker_reproduction_loser_prob",
                self.post_poker_reproduction_loser_prob,
            ),
            ("poker_house_cut_fraction", self.poker_house_cut_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TankConfigError::InvalidProbability { field, value });
            }
        }
        if !(2..=Self::MAX_POKER_PLAYERS).contains(&self.poker_max_players) {
            return Err(TankConfigError::InvalidPokerPlayerCount {
                value: self.poker_max_players,
            });
        }
        if self.poker_proximity_min > self.poker_proximity_max {
            return Err(TankConfigError::ProximityBandInverted {
                min: self.poker_proximity_min,
                max: self.poker_proximity_max,
            });
        }
        Ok(())
    }

    /// Rarity-weighted food catalog draw order; kept here (rather than on
    /// `FoodType`) because it is a simulation-tunable, not an intrinsic
    /// property of the type.
    pub fn food_catalog(&self) -> [(FoodType, f32); 5] {
        [
            (FoodType::Algae, 0.35),
            (FoodType::Protein, 0.25),
            (FoodType::Vitamin, 0.20),
            (FoodType::Energy, 0.15),
            (FoodType::Rare, 0.05),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(TankConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_critical_above_max() {
        let mut cfg = TankConfig::default();
        cfg.critical_population_threshold = cfg.max_population + 1;
        assert_eq!(
            cfg.validate(),
            Err(TankConfigError::CriticalAboveMax {
                critical: cfg.critical_population_threshold,
                max: cfg.max_population
            })
        );
    }

    #[test]
    fn rejects_too_many_poker_players() {
        let mut cfg = TankConfig::default();
        cfg.poker_max_players = 10;
        assert!(cfg.validate().is_err());
    }
}
