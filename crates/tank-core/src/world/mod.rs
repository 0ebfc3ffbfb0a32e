//! The simulation entry point. `World` owns every entity, every RNG
//! stream, and the ecosystem trackers; `World::reset`/`World::step` are
//! the only two operations external callers drive the simulation with.
//!
//! Mirrors `digital-life-core::World` in shape: a single owning struct,
//! a fallible `reset` that rebuilds everything from a validated config,
//! and a `step` that never panics on live simulation data.

pub mod collisions;
pub mod commands;
pub mod reproduction;
pub mod snapshot;
pub mod step;
#[cfg(test)]
mod tests;

pub use commands::{Command, CommandError};
pub use snapshot::{DeltaSnapshot, Snapshot, StatsSnapshot, StepResult};

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::error::Error;
use std::fmt;

use rand::Rng;
use rand_chacha::ChaCha12Rng;

use crate::config::{TankConfig, TankConfigError};
use crate::ecosystem::{EcosystemTracker, LineageRecord};
use crate::entity::plant::PlantType;
use crate::entity::{Crab, DeathCause, Entity, EntityId, Fish, Plant};
use crate::events::{EventBus, GameEvent};
use crate::genome::Genome;
use crate::rng::{RngDomain, RngStreams};
use crate::spatial::SpatialIndex;
use crate::spawners::{AutoFoodController, EmergencySpawner};

#[derive(Debug, Clone, PartialEq)]
pub enum WorldInitError {
    InvalidConfiguration(TankConfigError),
}

impl fmt::Display for WorldInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldInitError::InvalidConfiguration(e) => write!(f, "invalid configuration: {e}"),
        }
    }
}

impl Error for WorldInitError {}

impl From<TankConfigError> for WorldInitError {
    fn from(e: TankConfigError) -> Self {
        WorldInitError::InvalidConfiguration(e)
    }
}

/// Every fish currently alive, counted fresh rather than cached, since
/// the entity vector is the single source of truth for population size.
fn fish_count(world: &World) -> usize {
    world.entities.iter().filter(|e| matches!(e, Entity::Fish(_))).count()
}

pub struct World {
    cfg: TankConfig,
    entities: Vec<Entity>,
    frame: u64,
    elapsed_time: f64,
    paused: bool,
    fast_forward: bool,

    rng_behavior: ChaCha12Rng,
    rng_mutation: ChaCha12Rng,
    rng_poker: ChaCha12Rng,
    rng_spawner: ChaCha12Rng,
    rng_lifecycle: ChaCha12Rng,

    ecosystem: EcosystemTracker,
    events: EventBus,
    auto_food: AutoFoodController,
    emergency_spawner: EmergencySpawner,
    poker_events: VecDeque<snapshot::PokerEvent>,

    /// Built from the *previous* frame's post-movement positions; behavior
    /// dispatch in this frame's step 3 reads this, then it is rebuilt
    /// after movement for this frame's own collision resolution and the
    /// next frame's behavior dispatch.
    spatial_index: SpatialIndex,

    pending_deaths: BTreeMap<EntityId, DeathCause>,
    pending_removed_food: BTreeSet<EntityId>,

    invariant_violations: u64,
    transient_warnings: u64,

    last_snapshot: Option<Snapshot>,
}

impl World {
    pub fn new(cfg: TankConfig) -> Result<Self, WorldInitError> {
        Self::build(cfg)
    }

    fn build(cfg: TankConfig) -> Result<Self, WorldInitError> {
        cfg.validate()?;

        let streams = RngStreams::new(cfg.seed);
        let rng_behavior = streams.stream_for(RngDomain::Behavior);
        let rng_mutation = streams.stream_for(RngDomain::Mutation);
        let rng_poker = streams.stream_for(RngDomain::Poker);
        let mut rng_spawner = streams.stream_for(RngDomain::Spawner);
        let rng_lifecycle = streams.stream_for(RngDomain::Lifecycle);

        let mut ecosystem = EcosystemTracker::new(&cfg);
        let mut entities = Vec::new();

        for _ in 0..cfg.initial_fish_count {
            let id = ecosystem.population.next_entity_id();
            let genome = Genome::random(&mut rng_spawner);
            let x = rng_spawner.random_range(0.0..cfg.screen_width);
            let y = rng_spawner.random_range(cfg.fish_top_margin..cfg.screen_height);
            let mut fish = Fish::new(id, x, y, genome, 0, &cfg);
            fish.species = fish.genome.behavior_algorithm.kind.family() as u32;
            ecosystem.population.record_birth(0, fish.genome.behavior_algorithm.kind);
            ecosystem.algorithms.record_birth(fish.genome.behavior_algorithm.kind);
            ecosystem.lineage.record_birth(LineageRecord {
                id,
                parent_id: None,
                generation: 0,
                algorithm: fish.genome.behavior_algorithm.kind,
                color: fish.genome.color_tint(),
                birth_frame: 0,
            });
            entities.push(Entity::Fish(Box::new(fish)));
        }

        for _ in 0..cfg.initial_crab_count {
            let id = ecosystem.population.next_entity_id();
            let x = rng_spawner.random_range(0.0..cfg.screen_width);
            let y = cfg.screen_height - 30.0;
            entities.push(Entity::Crab(Box::new(Crab::new(id, x, y, cfg.crab_initial_energy))));
        }

        if cfg.plants_enabled {
            for i in 0..cfg.initial_plant_count {
                let id = ecosystem.population.next_entity_id();
                let x = rng_spawner.random_range(0.0..cfg.screen_width);
                let y = cfg.screen_height - 50.0;
                let plant_type = match i % 3 {
                    0 => PlantType::Kelp,
                    1 => PlantType::Anemone,
                    _ => PlantType::Coral,
                };
                entities.push(Entity::Plant(Box::new(Plant::new(id, x, y, plant_type))));
            }
        }

        let spatial_index = SpatialIndex::build(&entities, cfg.cell_size);
        let events = EventBus::new(cfg.max_events);

        Ok(Self {
            cfg,
            entities,
            frame: 0,
            elapsed_time: 0.0,
            paused: false,
            fast_forward: false,
            rng_behavior,
            rng_mutation,
            rng_poker,
            rng_spawner,
            rng_lifecycle,
            ecosystem,
            events,
            auto_food: AutoFoodController::default(),
            emergency_spawner: EmergencySpawner::default(),
            poker_events: VecDeque::new(),
            spatial_index,
            pending_deaths: BTreeMap::new(),
            pending_removed_food: BTreeSet::new(),
            invariant_violations: 0,
            transient_warnings: 0,
            last_snapshot: None,
        })
    }

    /// Rebuilds the entire world from a (possibly new) config. `seed`
    /// overrides `config.seed` (or the current config's seed, if `config`
    /// is `None`) so callers can replay the same layout under a different
    /// draw without constructing a full `TankConfig`.
    pub fn reset(&mut self, seed: Option<u64>, config: Option<TankConfig>) -> Result<StepResult, WorldInitError> {
        let mut new_cfg = config.unwrap_or_else(|| self.cfg.clone());
        if let Some(seed) = seed {
            new_cfg.seed = seed;
        }
        *self = Self::build(new_cfg)?;
        Ok(self.assemble_step_result(true, false))
    }

    pub fn step(&mut self, actions: Option<Vec<Command>>) -> StepResult {
        step::run(self, &actions.unwrap_or_default())
    }

    pub fn apply_command(&mut self, command: Command) -> Result<(), CommandError> {
        match command {
            Command::Pause => self.paused = true,
            Command::Resume => self.paused = false,
            Command::FastForward { enabled } => self.fast_forward = enabled,
            Command::Reset => {
                self.reset(None, None)
                    .map_err(|_| CommandError::NotSupported { command: "reset" })?;
            }
            Command::AddFood => self.inject_food(),
            Command::SpawnFish => self.inject_fish(),
        }
        Ok(())
    }

    fn inject_food(&mut self) {
        let cfg = self.cfg.clone();
        let food_type = draw_food_type(&cfg, &mut self.rng_spawner);
        let x = self.rng_spawner.random_range(0.0..cfg.screen_width);
        let id = self.ecosystem.population.next_entity_id();
        let food = crate::entity::food::Food::new(id, x, cfg.fish_top_margin, food_type, None);
        self.entities.push(Entity::Food(Box::new(food)));
        self.events.push(GameEvent::FoodSpawned { food_id: id });
    }

    fn inject_fish(&mut self) {
        let cfg = self.cfg.clone();
        if !self.ecosystem.population.can_admit(fish_count(self), cfg.max_population) {
            return;
        }
        let genome = Genome::random(&mut self.rng_spawner);
        let x = self.rng_spawner.random_range(0.0..cfg.screen_width);
        let y = self.rng_spawner.random_range(cfg.fish_top_margin..cfg.screen_height);
        let id = self.ecosystem.population.next_entity_id();
        let mut fish = Fish::new(id, x, y, genome, 0, &cfg);
        fish.species = fish.genome.behavior_algorithm.kind.family() as u32;
        self.ecosystem.population.record_birth(0, fish.genome.behavior_algorithm.kind);
        self.ecosystem.algorithms.record_birth(fish.genome.behavior_algorithm.kind);
        self.ecosystem.lineage.record_birth(LineageRecord {
            id,
            parent_id: None,
            generation: 0,
            algorithm: fish.genome.behavior_algorithm.kind,
            color: fish.genome.color_tint(),
            birth_frame: self.frame,
        });
        self.events.push(GameEvent::Born { id, parent_ids: (None, None), generation: 0 });
        self.entities.push(Entity::Fish(Box::new(fish)));
    }

    pub fn snapshot(&self) -> Snapshot {
        snapshot::build_full(self)
    }

    pub fn metrics(&self) -> StatsSnapshot {
        snapshot::build_stats(self)
    }

    pub fn list_agents(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.entities.iter().filter_map(|e| e.as_fish()).map(|f| f.loc.id).collect();
        ids.sort_unstable();
        ids
    }

    pub fn config(&self) -> &TankConfig {
        &self.cfg
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_fast_forward(&self) -> bool {
        self.fast_forward
    }

    fn push_poker_event(&mut self, event: snapshot::PokerEvent) {
        if self.poker_events.len() >= self.cfg.max_poker_events {
            self.poker_events.pop_front();
        }
        self.poker_events.push_back(event);
    }

    /// `include_snapshot` is `false` under fast-forward: physics and
    /// ecosystem tracking always run in full, only the (comparatively
    /// expensive) snapshot/delta payload is skipped.
    fn assemble_step_result(&mut self, include_snapshot: bool, done: bool) -> StepResult {
        let metrics = snapshot::build_stats(self);
        let events = self.events.drain();
        if include_snapshot {
            let full = snapshot::build_full(self);
            let delta = snapshot::build_delta(self, self.last_snapshot.as_ref(), &full);
            let spawned = delta.added.clone();
            let removed = delta.removed.clone();
            self.last_snapshot = Some(full.clone());
            StepResult {
                snapshot: Some(full),
                delta: Some(delta),
                events,
                metrics,
                done,
                spawned,
                removed,
            }
        } else {
            StepResult {
                snapshot: None,
                delta: None,
                events,
                metrics,
                done,
                spawned: Vec::new(),
                removed: Vec::new(),
            }
        }
    }
}

fn draw_food_type<R: Rng + ?Sized>(cfg: &TankConfig, rng: &mut R) -> crate::entity::food::FoodType {
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
