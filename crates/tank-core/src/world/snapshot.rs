//! Snapshot/delta payload construction. `World` never holds a
//! `Snapshot` itself between frames except the last full one needed to
//! compute the next delta; everything here is assembled fresh from live
//! entity state, never cached across steps.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::behavior::BehaviorKind;
use crate::ecosystem::DiversitySnapshot;
use crate::entity::food::FoodType;
use crate::entity::plant::PlantType;
use crate::entity::{DeathCause, Entity, EntityId, EntityKind};
use crate::events::GameEvent;
use crate::poker::strategy::PokerStrategyKind;

use super::World;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GenomeSummary {
    pub behavior: BehaviorKind,
    pub poker_strategy: PokerStrategyKind,
    pub color_tint: (u8, u8, u8),
    pub speed_modifier: f32,
    pub size_modifier: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "detail_kind")]
pub enum EntityDetail {
    Fish {
        energy: f32,
        age: u64,
        generation: u32,
        species: u32,
        genome_summary: GenomeSummary,
    },
    Crab {
        energy: f32,
    },
    Plant {
        plant_type: PlantType,
    },
    Food {
        food_type: FoodType,
    },
    Castle,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub kind: EntityKind,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub detail: EntityDetail,
}

fn snapshot_of(entity: &Entity) -> EntitySnapshot {
    let loc = *entity.locomotion();
    let detail = match entity {
        Entity::Fish(f) => EntityDetail::Fish {
            energy: f.energy.current,
            age: f.lifecycle.age_frames,
            generation: f.generation,
            species: f.species,
            genome_summary: GenomeSummary {
                behavior: f.genome.behavior_algorithm.kind,
                poker_strategy: f.genome.poker_strategy.kind,
                color_tint: f.genome.color_tint(),
                speed_modifier: f.genome.speed_modifier.value,
                size_modifier: f.genome.size_modifier.value,
            },
        },
        Entity::Crab(c) => EntityDetail::Crab { energy: c.energy },
        Entity::Plant(p) => EntityDetail::Plant {
            plant_type: p.plant_type,
        },
        Entity::Food(f) => EntityDetail::Food {
            food_type: f.food_type,
        },
        Entity::Castle(_) => EntityDetail::Castle,
    };
    EntitySnapshot {
        id: loc.id,
        kind: entity.kind(),
        x: loc.x,
        y: loc.y,
        w: loc.w,
        h: loc.h,
        detail,
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PopulationCounts {
    pub fish: usize,
    pub crabs: usize,
    pub plants: usize,
    pub food: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub frame: u64,
    pub population: PopulationCounts,
    pub total_births: u64,
    pub total_deaths: u64,
    pub deaths_by_cause: BTreeMap<&'static str, u64>,
    pub energy_gains_by_source: BTreeMap<&'static str, f64>,
    pub energy_burns_by_source: BTreeMap<&'static str, f64>,
    pub energy_lifetime_delta: f64,
    pub energy_recent_window_delta: f64,
    pub energy_ledger_discrepancy: f64,
    pub diversity: DiversitySnapshot,
    pub capacity_usage: f32,
    pub invariant_violations: u64,
    pub transient_warnings: u64,
    pub events_dropped: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PokerEvent {
    pub frame: u64,
    pub participants: Vec<EntityId>,
    pub winners: Vec<EntityId>,
    pub pot: f32,
    pub house_cut: f32,
    pub showdown_occurred: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub version: u32,
    pub frame: u64,
    pub elapsed_time: f64,
    pub entities: Vec<EntitySnapshot>,
    pub stats: StatsSnapshot,
    pub poker_events: Vec<PokerEvent>,
    pub mode_id: String,
    pub world_type: String,
    pub view_mode: String,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct DeltaSnapshot {
    pub frame: u64,
    pub updates: Vec<EntitySnapshot>,
    pub added: Vec<EntityId>,
    pub removed: Vec<EntityId>,
}

#[derive(Clone, Debug)]
pub struct StepResult {
    pub snapshot: Option<Snapshot>,
    pub delta: Option<DeltaSnapshot>,
    pub events: Vec<GameEvent>,
    pub metrics: StatsSnapshot,
    pub done: bool,
    pub spawned: Vec<EntityId>,
    pub removed: Vec<EntityId>,
}

pub(super) fn build_stats(world: &World) -> StatsSnapshot {
    let mut population = PopulationCounts::default();
    for e in &world.entities {
        match e.kind() {
            EntityKind::Fish => population.fish += 1,
            EntityKind::Crab => population.crabs += 1,
            EntityKind::Plant => population.plants += 1,
            EntityKind::Food => population.food += 1,
            EntityKind::Castle => {}
        }
    }

    let mut deaths_by_cause: BTreeMap<&'static str, u64> = BTreeMap::new();
    for cause in [
        DeathCause::Starvation,
        DeathCause::OldAge,
        DeathCause::Predation,
        DeathCause::Unknown,
    ] {
        deaths_by_cause.insert(
            cause.as_str(),
            world
                .ecosystem
                .population
                .deaths_by_cause
                .get(&cause)
                .copied()
                .unwrap_or(0),
        );
    }

    let capacity_usage = if world.cfg.max_population > 0 {
        population.fish as f32 / world.cfg.max_population as f32
    } else {
        0.0
    };

    StatsSnapshot {
        frame: world.frame,
        population,
        total_births: world.ecosystem.population.total_births,
        total_deaths: world.ecosystem.population.total_deaths,
        deaths_by_cause,
        energy_gains_by_source: world.ecosystem.energy.gains_by_source().clone(),
        energy_burns_by_source: world.ecosystem.energy.burns_by_source().clone(),
        energy_lifetime_delta: world.ecosystem.energy.lifetime_delta(),
        energy_recent_window_delta: world.ecosystem.energy.recent_window_delta(),
        energy_ledger_discrepancy: world.ecosystem.energy.ledger_discrepancy(),
        diversity: world.ecosystem.diversity.last(),
        capacity_usage,
        invariant_violations: world.invariant_violations,
        transient_warnings: world.transient_warnings,
        events_dropped: world.events.dropped,
    }
}

pub(super) fn build_full(world: &World) -> Snapshot {
    let mut entities: Vec<EntitySnapshot> = world.entities.iter().map(snapshot_of).collect();
    entities.sort_unstable_by_key(|e| e.id);
    Snapshot {
        version: SNAPSHOT_VERSION,
        frame: world.frame,
        elapsed_time: world.elapsed_time,
        entities,
        stats: build_stats(world),
        poker_events: world.poker_events.iter().cloned().collect(),
        mode_id: "tank".to_string(),
        world_type: "fishtank".to_string(),
        view_mode: "default".to_string(),
    }
}

/// Entity-level diffing against the previous full snapshot: an entity
/// appears in `updates` if any of its snapshot fields differ. Field-level
/// diffing would shrink payloads further but isn't needed at this scale.
pub(super) fn build_delta(world: &World, previous: Option<&Snapshot>, current: &Snapshot) -> DeltaSnapshot {
    let Some(previous) = previous else {
        return DeltaSnapshot {
            frame: current.frame,
            updates: current.entities.clone(),
            added: current.entities.iter().map(|e| e.id).collect(),
            removed: Vec::new(),
        };
    };

    let prev_by_id: BTreeMap<EntityId, &EntitySnapshot> =
        previous.entities.iter().map(|e| (e.id, e)).collect();
    let cur_by_id: BTreeMap<EntityId, &EntitySnapshot> =
        current.entities.iter().map(|e| (e.id, e)).collect();

    let mut updates = Vec::new();
    let mut added = Vec::new();
    for (id, snap) in &cur_by_id {
        match prev_by_id.get(id) {
            Some(prev_snap) if *prev_snap == *snap => {}
            Some(_) => updates.push(**snap),
            None => added.push(*id),
        }
    }
    added.sort_unstable();
    let removed: Vec<EntityId> = prev_by_id
        .keys()
        .filter(|id| !cur_by_id.contains_key(id))
        .copied()
        .collect();

    let _ = world;
    DeltaSnapshot {
        frame: current.frame,
        updates,
        added,
        removed,
    }
}
