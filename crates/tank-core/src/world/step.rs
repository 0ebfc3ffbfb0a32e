//! The per-frame update loop: tick every entity against the
//! *previous* frame's spatial index, append newborns/spawner output,
//! rebuild the index, resolve collisions and reproduction against the
//! fresh index, close the frame's ecosystem bookkeeping, then remove
//! whatever died or sank out this frame.

use std::collections::BTreeMap;

use rand::Rng;
use rand_chacha::ChaCha12Rng;

use crate::behavior::{BehaviorContext, BehaviorFamily, Nearby, SchoolMate};
use crate::ecosystem::{EcosystemTracker, LineageRecord};
use crate::entity::crab::Crab;
use crate::entity::fish::Fish;
use crate::entity::food::Food;
use crate::entity::plant::Plant;
use crate::entity::{bounce_horizontal_and_bottom, clamp_top, DeathCause, Entity, EntityId, EntityKind};
use crate::events::{EventBus, GameEvent};
use crate::genome::{Genome, MutationRates};
use crate::spatial::SpatialIndex;

use super::commands::Command;
use super::fish_count;
use super::snapshot::StepResult;
use super::World;

const BASE_FISH_SPEED: f64 = 1.5;
const VELOCITY_SMOOTHING: f64 = 0.2;
const REVERSAL_DOT_THRESHOLD: f64 = -0.5;
const REVERSAL_ENERGY_COST: f32 = 0.5;
const LEARNING_DECAY_RATE: f32 = 0.01;
const CRAB_WANDER_ACCEL: f64 = 0.05;
const CRAB_MAX_SPEED: f64 = 0.5;

pub(super) fn run(world: &mut World, actions: &[Command]) -> StepResult {
    for &cmd in actions {
        if cmd == Command::Reset {
            if let Ok(result) = world.reset(None, None) {
                return result;
            }
            continue;
        }
        let _ = world.apply_command(cmd);
    }

    if !world.paused {
        advance_frame(world);
    }

    world.assemble_step_result(!world.fast_forward, false)
}

fn advance_frame(world: &mut World) {
    world.frame += 1;
    world.elapsed_time += 1.0 / 60.0;
    let phase = (world.frame % world.cfg.day_length_frames.max(1)) as f64 / world.cfg.day_length_frames.max(1) as f64;
    let dawn_or_dusk = (0.2..0.3).contains(&phase) || (0.7..0.8).contains(&phase);

    let newborns = update_entities(world);
    world.entities.extend(newborns);

    run_spawners(world, dawn_or_dusk);

    world.spatial_index = SpatialIndex::build(&world.entities, world.cfg.cell_size);
    let index = world.spatial_index.clone();

    let poker_offspring = super::collisions::resolve(world, &index);
    world.entities.extend(poker_offspring);

    super::reproduction::resolve(world, &index);

    {
        let frame = world.frame;
        let cfg = world.cfg.clone();
        let dead = &world.pending_deaths;
        let genomes = world
            .entities
            .iter()
            .filter_map(|e| e.as_fish())
            .filter(|f| !dead.contains_key(&f.loc.id))
            .map(|f| &f.genome);
        let newly_orphaned = world.ecosystem.on_frame_end(frame, &cfg, genomes);
        for child_id in newly_orphaned {
            crate::error::record_orphan_lineage(&mut world.invariant_violations, child_id);
        }
    }

    let live_fish = fish_count(world);
    if live_fish > world.cfg.max_population {
        crate::error::record_population_over_ceiling(&mut world.invariant_violations, live_fish, world.cfg.max_population);
    }

    finalize_deaths(world);
    remove_dead(world);
}

struct FishRow {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    family: BehaviorFamily,
}

/// Everything computed once per frame before entities mutate, since the
/// frame's own dispatch must see the *previous* frame's positions, not
/// positions as they're updated mid-loop.
fn update_entities(world: &mut World) -> Vec<Entity> {
    let prev_index = world.spatial_index.clone();
    let positions: BTreeMap<EntityId, (f64, f64)> = world
        .entities
        .iter()
        .map(|e| {
            let loc = e.locomotion();
            (loc.id, (loc.x, loc.y))
        })
        .collect();
    let fish_rows: BTreeMap<EntityId, FishRow> = world
        .entities
        .iter()
        .filter_map(|e| e.as_fish())
        .map(|f| {
            (
                f.loc.id,
                FishRow {
                    x: f.loc.x,
                    y: f.loc.y,
                    vx: f.loc.vx,
                    vy: f.loc.vy,
                    family: f.genome.behavior_algorithm.kind.family(),
                },
            )
        })
        .collect();

    let mut newborns = Vec::new();

    let World {
        entities,
        cfg,
        frame,
        rng_behavior,
        rng_mutation,
        rng_spawner,
        ecosystem,
        events,
        pending_deaths,
        pending_removed_food,
        transient_warnings,
        invariant_violations,
        ..
    } = world;

    for entity in entities.iter_mut() {
        match entity {
            Entity::Fish(fish) => update_fish(
                fish,
                cfg,
                &prev_index,
                &fish_rows,
                &positions,
                *frame,
                rng_behavior,
                rng_mutation,
                ecosystem,
                events,
                pending_deaths,
                transient_warnings,
                invariant_violations,
                &mut newborns,
            ),
            Entity::Crab(crab) => update_crab(crab, cfg, rng_behavior, pending_deaths),
            Entity::Plant(plant) => update_plant(plant, cfg, rng_spawner, ecosystem, &mut newborns),
            Entity::Food(food) => update_food(food, cfg, pending_removed_food),
            Entity::Castle(_) => {}
        }
    }

    newborns
}

fn build_context(
    fish: &Fish,
    cfg: &crate::config::TankConfig,
    prev_index: &SpatialIndex,
    fish_rows: &BTreeMap<EntityId, FishRow>,
    positions: &BTreeMap<EntityId, (f64, f64)>,
    frame: u64,
) -> BehaviorContext {
    let vision = fish.vision_range(cfg.fish_vision_range_base);
    let x = fish.loc.x;
    let y = fish.loc.y;

    let nearest_predator = prev_index
        .nearest(x, y, vision, EntityKind::Crab)
        .and_then(|(id, distance)| positions.get(&id).map(|&(ex, ey)| Nearby { dx: ex - x, dy: ey - y, distance }));

    let nearest_food = prev_index
        .nearest(x, y, vision, EntityKind::Food)
        .and_then(|(id, distance)| positions.get(&id).map(|&(ex, ey)| Nearby { dx: ex - x, dy: ey - y, distance }));

    let remembered_food = fish.memory.food_memories.nearest_to(x, y).map(|entry| Nearby {
        dx: entry.x - x,
        dy: entry.y - y,
        distance: (entry.x - x).hypot(entry.y - y),
    });

    let own_family = fish.genome.behavior_algorithm.kind.family();
    let nearby_same_species = prev_index
        .nearby(x, y, vision, EntityKind::Fish)
        .into_iter()
        .filter(|(id, _)| *id != fish.loc.id)
        .filter_map(|(id, _)| fish_rows.get(&id))
        .filter(|row| row.family == own_family)
        .map(|row| SchoolMate { dx: row.x - x, dy: row.y - y, vx: row.vx, vy: row.vy })
        .collect();

    BehaviorContext {
        energy_ratio: fish.energy.ratio(),
        nearest_predator,
        nearest_food,
        remembered_food,
        nearby_same_species,
        x,
        y,
        screen_w: cfg.screen_width,
        screen_h: cfg.screen_height,
        frame,
    }
}

#[allow(clippy::too_many_arguments)]
fn update_fish(
    fish: &mut Fish,
    cfg: &crate::config::TankConfig,
    prev_index: &SpatialIndex,
    fish_rows: &BTreeMap<EntityId, FishRow>,
    positions: &BTreeMap<EntityId, (f64, f64)>,
    frame: u64,
    rng_behavior: &mut ChaCha12Rng,
    rng_mutation: &mut ChaCha12Rng,
    ecosystem: &mut EcosystemTracker,
    events: &mut EventBus,
    pending_deaths: &mut BTreeMap<EntityId, DeathCause>,
    transient_warnings: &mut u64,
    invariant_violations: &mut u64,
    newborns: &mut Vec<Entity>,
) {
    fish.lifecycle.tick(cfg);
    fish.reproduction.tick();
    fish.poker.tick_cooldown();
    fish.memory.food_memories.decay(frame, cfg.food_memory_decay_frames);
    fish.memory.decay_learning(LEARNING_DECAY_RATE);

    if fish.reproduction.pregnant && fish.reproduction.pregnancy_timer == 0 {
        birth_from_pregnancy(fish, cfg, rng_mutation, ecosystem, events, frame, newborns);
    }

    let ctx = build_context(fish, cfg, prev_index, fish_rows, positions, frame);
    let (mut dvx, mut dvy) = fish.genome.behavior_algorithm.execute(&ctx, rng_behavior);
    if !dvx.is_finite() || !dvy.is_finite() {
        *transient_warnings += 1;
        log::debug!("fish {} behavior produced a non-finite velocity, clamped to zero", fish.loc.id);
        dvx = 0.0;
        dvy = 0.0;
    }
    dvx = dvx.clamp(-1.0, 1.0);
    dvy = dvy.clamp(-1.0, 1.0);

    let speed = fish.speed(BASE_FISH_SPEED);
    let target_vx = dvx * speed;
    let target_vy = dvy * speed;
    let prev_vx = fish.loc.vx;
    let prev_vy = fish.loc.vy;
    let mut new_vx = prev_vx + (target_vx - prev_vx) * VELOCITY_SMOOTHING;
    let mut new_vy = prev_vy + (target_vy - prev_vy) * VELOCITY_SMOOTHING;
    let mag = new_vx.hypot(new_vy);
    if mag > speed && mag > 0.0 {
        let scale = speed / mag;
        new_vx *= scale;
        new_vy *= scale;
    }

    let prev_speed = prev_vx.hypot(prev_vy);
    let new_speed = new_vx.hypot(new_vy);
    if prev_speed > 1e-6 && new_speed > 1e-6 {
        let dot = (prev_vx * new_vx + prev_vy * new_vy) / (prev_speed * new_speed);
        if dot <= REVERSAL_DOT_THRESHOLD {
            let outcome = fish.energy.burn(REVERSAL_ENERGY_COST);
            if outcome.went_negative {
                crate::error::record_negative_energy(invariant_violations, fish.loc.id, outcome.would_be_value);
            }
            ecosystem.energy.record_burn(frame, "sharp_reversal", REVERSAL_ENERGY_COST);
        }
    }

    fish.loc.vx = new_vx;
    fish.loc.vy = new_vy;
    fish.loc.integrate();
    bounce_horizontal_and_bottom(&mut fish.loc, cfg.screen_width, cfg.screen_height);
    clamp_top(&mut fish.loc, cfg.fish_top_margin);

    let metabolism_mult = fish.lifecycle.stage.metabolism_multiplier(cfg);
    let speed_factor = 1.0 + (new_speed / speed.max(0.01)) as f32 * 0.5;
    let cost = cfg.energy_movement_base_cost * fish.genome.metabolism_rate.value * metabolism_mult * speed_factor;
    let outcome = fish.energy.burn(cost);
    if outcome.went_negative {
        crate::error::record_negative_energy(invariant_violations, fish.loc.id, outcome.would_be_value);
    }
    ecosystem.energy.record_burn(frame, "metabolism", cost);

    if fish.lifecycle.is_past_max_age() {
        pending_deaths.insert(fish.loc.id, DeathCause::OldAge);
    } else if outcome.exhausted {
        pending_deaths.insert(fish.loc.id, DeathCause::Starvation);
    }
}

fn birth_from_pregnancy(
    fish: &mut Fish,
    cfg: &crate::config::TankConfig,
    rng_mutation: &mut ChaCha12Rng,
    ecosystem: &mut EcosystemTracker,
    events: &mut EventBus,
    frame: u64,
    newborns: &mut Vec<Entity>,
) {
    if let Some(mate_genome) = fish.reproduction.stored_mate_genome.take() {
        let rates = MutationRates { rate: cfg.mutation_rate, strength: cfg.mutation_strength };
        let child_genome = Genome::from_parents(&fish.genome, &mate_genome, rng_mutation, rates);
        let id = ecosystem.population.next_entity_id();
        let generation = fish.generation + 1;
        let mut child = Fish::new(id, fish.loc.x, fish.loc.y, child_genome, generation, cfg);
        child.species = child.genome.behavior_algorithm.kind.family() as u32;

        ecosystem.population.record_birth(generation, child.genome.behavior_algorithm.kind);
        ecosystem.algorithms.record_birth(child.genome.behavior_algorithm.kind);
        ecosystem.algorithms.record_reproduction(fish.genome.behavior_algorithm.kind);
        ecosystem.lineage.record_birth(LineageRecord {
            id,
            parent_id: Some(fish.loc.id),
            generation,
            algorithm: child.genome.behavior_algorithm.kind,
            color: child.genome.color_tint(),
            birth_frame: frame,
        });
        events.push(GameEvent::Born { id, parent_ids: (Some(fish.loc.id), None), generation });
        newborns.push(Entity::Fish(Box::new(child)));
    }
    fish.reproduction.pregnant = false;
}

fn update_crab(
    crab: &mut Crab,
    cfg: &crate::config::TankConfig,
    rng_behavior: &mut ChaCha12Rng,
    pending_deaths: &mut BTreeMap<EntityId, DeathCause>,
) {
    crab.tick_cooldown();
    let accel = rng_behavior.random_range(-CRAB_WANDER_ACCEL..CRAB_WANDER_ACCEL);
    crab.loc.vx = (crab.loc.vx + accel).clamp(-CRAB_MAX_SPEED, CRAB_MAX_SPEED);
    crab.loc.vy = 0.0;
    crab.loc.integrate();
    bounce_horizontal_and_bottom(&mut crab.loc, cfg.screen_width, cfg.screen_height);

    crab.energy -= cfg.crab_idle_consumption;
    if crab.energy <= 0.0 {
        pending_deaths.insert(crab.loc.id, DeathCause::Starvation);
    }
}

fn update_plant(
    plant: &mut Plant,
    cfg: &crate::config::TankConfig,
    rng_spawner: &mut ChaCha12Rng,
    ecosystem: &mut EcosystemTracker,
    newborns: &mut Vec<Entity>,
) {
    if !cfg.plants_enabled {
        return;
    }
    let due = plant.tick_production(cfg.plant_food_production_interval);
    if !due || plant.outstanding_food >= cfg.plant_max_outstanding_food {
        return;
    }
    if rng_spawner.random::<f32>() >= cfg.plant_production_chance {
        return;
    }
    let id = ecosystem.population.next_entity_id();
    let food = Food::new(id, plant.loc.x, plant.loc.y, crate::entity::food::FoodType::Nectar, Some(plant.loc.id));
    plant.outstanding_food += 1;
    newborns.push(Entity::Food(Box::new(food)));
}

fn update_food(food: &mut Food, cfg: &crate::config::TankConfig, pending_removed_food: &mut std::collections::BTreeSet<EntityId>) {
    if !food.food_type.is_stationary() {
        food.loc.vy += cfg.food_sink_acceleration * food.food_type.sink_multiplier();
    }
    food.loc.integrate();
    if food.loc.x < 0.0 {
        food.loc.x = 0.0;
        food.loc.vx = -food.loc.vx;
    } else if food.loc.x + food.loc.w > cfg.screen_width {
        food.loc.x = cfg.screen_width - food.loc.w;
        food.loc.vx = -food.loc.vx;
    }
    if food.loc.y > cfg.screen_height {
        pending_removed_food.insert(food.loc.id);
    }
}

fn run_spawners(world: &mut World, dawn_or_dusk: bool) {
    let cfg = world.cfg.clone();
    let fish_total = fish_count(world);
    let total_energy: f32 = world.entities.iter().filter_map(|e| e.as_fish()).map(|f| f.energy.current).sum();

    {
        let World { auto_food, rng_spawner, ecosystem, entities, .. } = world;
        if let Some(food) = auto_food.tick(&cfg, total_energy, fish_total, dawn_or_dusk, || ecosystem.population.next_entity_id(), rng_spawner) {
            entities.push(food);
        }
    }

    {
        let World { emergency_spawner, rng_spawner, ecosystem, entities, frame, .. } = world;
        if let Some(mut spawned) = emergency_spawner.tick(&cfg, fish_total, || ecosystem.population.next_entity_id(), rng_spawner) {
            if let Entity::Fish(f) = &mut spawned {
                f.species = f.genome.behavior_algorithm.kind.family() as u32;
                ecosystem.population.record_birth(0, f.genome.behavior_algorithm.kind);
                ecosystem.algorithms.record_birth(f.genome.behavior_algorithm.kind);
                ecosystem.lineage.record_birth(LineageRecord {
                    id: f.loc.id,
                    parent_id: None,
                    generation: 0,
                    algorithm: f.genome.behavior_algorithm.kind,
                    color: f.genome.color_tint(),
                    birth_frame: *frame,
                });
            }
            entities.push(spawned);
        }
    }
}

/// Applies the predator-encounter attribution window: a
/// death that would otherwise read as starvation or old age is
/// reattributed to predation if a crab came within range in the last
/// `predator_encounter_window` frames.
fn finalize_deaths(world: &mut World) {
    let frame = world.frame;
    let window = world.cfg.predator_encounter_window;

    let mut fish_deaths: Vec<(EntityId, DeathCause, crate::behavior::BehaviorKind, u64)> = Vec::new();
    let mut crab_deaths: Vec<EntityId> = Vec::new();

    for entity in &world.entities {
        match entity {
            Entity::Fish(fish) => {
                if let Some(&cause) = world.pending_deaths.get(&fish.loc.id) {
                    let mut final_cause = cause;
                    if cause != DeathCause::Predation {
                        if let Some(enc_frame) = fish.predator_encounter_frame {
                            if frame.saturating_sub(enc_frame) <= window {
                                final_cause = DeathCause::Predation;
                            }
                        }
                    }
                    fish_deaths.push((fish.loc.id, final_cause, fish.genome.behavior_algorithm.kind, fish.lifecycle.age_frames));
                }
            }
            Entity::Crab(crab) => {
                if world.pending_deaths.contains_key(&crab.loc.id) {
                    crab_deaths.push(crab.loc.id);
                }
            }
            _ => {}
        }
    }

    for (id, cause, algorithm, lifespan) in fish_deaths {
        world.ecosystem.population.record_death(cause, algorithm);
        world.ecosystem.algorithms.record_death(algorithm, cause, lifespan);
        world.events.push(GameEvent::Died { id, kind: EntityKind::Fish, cause });
    }
    for id in crab_deaths {
        world.events.push(GameEvent::Died { id, kind: EntityKind::Crab, cause: DeathCause::Starvation });
    }
}

fn remove_dead(world: &mut World) {
    let dead = std::mem::take(&mut world.pending_deaths);
    let sunk = std::mem::take(&mut world.pending_removed_food);
    world.entities.retain(|e| !dead.contains_key(&e.id()) && !sunk.contains(&e.id()));

    let alive_fish: Vec<EntityId> = world.entities.iter().filter_map(|e| e.as_fish()).map(|f| f.loc.id).collect();
    world.ecosystem.poker.cleanup_dead_fish(&alive_fish);
}
