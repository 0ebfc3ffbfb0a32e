//! Frame-local collision resolution against the just-rebuilt spatial
//! index: food being eaten, crab predation, and poker hands (spec
//! §4.2-§4.3). Runs after movement and before reproduction, so fish that
//! just moved into range this frame are caught the same frame.

use rand::Rng;

use crate::entity::{DeathCause, Entity, EntityId, EntityKind};
use crate::events::GameEvent;
use crate::genome::{Genome, MutationRates};
use crate::poker::engine::{play_hand, EnergyDelta, HandParticipant, HandResult};
use crate::spatial::SpatialIndex;

use super::snapshot::PokerEvent;
use super::World;

const FOOD_EATING_RADIUS: f64 = 12.0;
const CRAB_ATTACK_RADIUS: f64 = 25.0;

pub(super) fn resolve(world: &mut World, index: &SpatialIndex) -> Vec<Entity> {
    resolve_food_eaten(world, index);
    resolve_predation(world, index);
    resolve_poker(world, index)
}

fn resolve_food_eaten(world: &mut World, index: &SpatialIndex) {
    let frame = world.frame;
    let mut eaten: Vec<(EntityId, EntityId, f32, Option<EntityId>)> = Vec::new();

    for food in world.entities.iter().filter_map(|e| e.as_food()) {
        // `nearby` returns results sorted by ascending EntityId, so taking
        // the first entry (rather than the nearest by distance) gives the
        // lowest-ID contact priority when multiple fish reach the same food.
        let mut eater = index
            .nearby(food.loc.x, food.loc.y, FOOD_EATING_RADIUS, EntityKind::Fish)
            .into_iter()
            .next();
        if eater.is_none() {
            eater = index
                .nearby(food.loc.x, food.loc.y, FOOD_EATING_RADIUS, EntityKind::Crab)
                .into_iter()
                .next();
        }
        if let Some((eater_id, _)) = eater {
            eaten.push((food.loc.id, eater_id, food.food_type.energy_value(), food.source_plant));
        }
    }

    for (food_id, eater_id, value, source_plant) in eaten {
        if world.pending_removed_food.contains(&food_id) {
            continue;
        }
        let fed = if let Some(fish) = world.entities.iter_mut().find_map(|e| match e {
            Entity::Fish(f) if f.loc.id == eater_id => Some(f),
            _ => None,
        }) {
            fish.energy.add(value);
            fish.memory.food_memories.remember(fish.loc.x, fish.loc.y, frame, world.cfg.max_food_memories);
            fish.memory.reinforce("food_seeking", 0.05);
            Some(fish.genome.behavior_algorithm.kind)
        } else {
            None
        };
        if let Some(algorithm) = fed {
            world.ecosystem.algorithms.record_food_eaten(algorithm);
        } else if let Some(crab) = world.entities.iter_mut().find_map(|e| match e {
            Entity::Crab(c) if c.loc.id == eater_id => Some(c),
            _ => None,
        }) {
            crab.energy = (crab.energy + value).min(crab.max_energy);
        } else {
            continue;
        }

        if let Some(plant_id) = source_plant {
            if let Some(plant) = world.entities.iter_mut().find_map(|e| e.as_plant_mut().filter(|p| p.loc.id == plant_id)) {
                plant.outstanding_food = plant.outstanding_food.saturating_sub(1);
            }
        }
        world.ecosystem.energy.record_gain(frame, "food", value);
        world.pending_removed_food.insert(food_id);
        world.events.push(GameEvent::FoodEaten { food_id, eater_id, energy_gained: value });
    }
}

fn resolve_predation(world: &mut World, index: &SpatialIndex) {
    let frame = world.frame;
    let cfg = world.cfg.clone();

    let attacks: Vec<(EntityId, EntityId)> = world
        .entities
        .iter()
        .filter_map(|e| e.as_crab())
        .filter(|c| c.can_attack())
        .filter_map(|c| {
            index
                .nearest(c.loc.x, c.loc.y, CRAB_ATTACK_RADIUS, EntityKind::Fish)
                .map(|(fish_id, _)| (c.loc.id, fish_id))
        })
        .collect();

    let mut attacked_crabs = std::collections::BTreeSet::new();
    for (crab_id, fish_id) in attacks {
        if attacked_crabs.contains(&crab_id) || world.pending_deaths.contains_key(&fish_id) {
            continue;
        }
        attacked_crabs.insert(crab_id);

        if let Some(fish) = world.entities.iter_mut().find_map(|e| e.as_fish_mut().filter(|f| f.loc.id == fish_id)) {
            fish.predator_encounter_frame = Some(frame);
        }
        world.pending_deaths.insert(fish_id, DeathCause::Predation);

        if let Some(crab) = world.entities.iter_mut().find_map(|e| e.as_crab_mut().filter(|c| c.loc.id == crab_id)) {
            crab.energy = (crab.energy + cfg.crab_attack_energy_transfer).min(crab.max_energy);
            crab.attack_cooldown = cfg.crab_attack_cooldown;
        }

        world.ecosystem.energy.record_burn(frame, "predation", cfg.crab_attack_damage);
        world.ecosystem.energy.record_gain(frame, "crab_attack", cfg.crab_attack_energy_transfer);
        world.events.push(GameEvent::PredatorEncounter { fish_id, crab_id });
    }
}

struct Candidate {
    id: EntityId,
    x: f64,
    y: f64,
    energy: f32,
    family: crate::behavior::BehaviorFamily,
}

fn resolve_poker(world: &mut World, index: &SpatialIndex) -> Vec<Entity> {
    if !world.cfg.poker_enabled {
        return Vec::new();
    }
    let cfg = world.cfg.clone();
    let frame = world.frame;

    let eligible: Vec<Candidate> = world
        .entities
        .iter()
        .filter_map(|e| e.as_fish())
        .filter(|f| f.poker.cooldown == 0 && f.energy.current >= cfg.poker_min_energy && !world.pending_deaths.contains_key(&f.loc.id))
        .map(|f| Candidate {
            id: f.loc.id,
            x: f.loc.x,
            y: f.loc.y,
            energy: f.energy.current,
            family: f.genome.behavior_algorithm.kind.family(),
        })
        .collect();

    let mut seated = std::collections::BTreeSet::new();
    let mut newborns = Vec::new();

    for seed in &eligible {
        if seated.contains(&seed.id) {
            continue;
        }
        let mut table: Vec<&Candidate> = index
            .nearby(seed.x, seed.y, cfg.poker_proximity_max, EntityKind::Fish)
            .into_iter()
            .filter(|(_, dist)| *dist >= cfg.poker_proximity_min)
            .filter_map(|(id, _)| eligible.iter().find(|c| c.id == id))
            .filter(|c| !seated.contains(&c.id) && c.family == seed.family)
            .take(cfg.poker_max_players - 1)
            .collect();
        if table.is_empty() {
            continue;
        }
        table.push(seed);
        table.sort_unstable_by_key(|c| c.id);
        for c in &table {
            seated.insert(c.id);
        }

        let participants: Vec<HandParticipant> = table
            .iter()
            .enumerate()
            .map(|(i, c)| HandParticipant {
                id: c.id,
                energy: c.energy,
                strategy: world
                    .entities
                    .iter()
                    .find_map(|e| e.as_fish().filter(|f| f.loc.id == c.id))
                    .map(|f| f.genome.poker_strategy)
                    .expect("seated candidate is still a live fish this frame"),
                on_button: i == 0,
                is_plant: false,
            })
            .collect();

        let result = play_hand(&participants, cfg.poker_min_energy * 0.1, cfg.poker_house_cut_fraction, &mut world.rng_poker);
        apply_hand_result(world, &table, &result, frame);

        if let Some(child) = try_post_poker_reproduction(world, &cfg, &result, &table) {
            newborns.push(child);
        }
    }

    newborns
}

fn apply_hand_result(world: &mut World, table: &[&Candidate], result: &HandResult, frame: u64) {
    let house_cut_fraction = world.cfg.poker_house_cut_fraction;
    let pot = if house_cut_fraction > 0.0 {
        result.house_cut / house_cut_fraction
    } else {
        result.deltas.iter().map(|d| d.delta.max(0.0)).sum()
    };

    for EnergyDelta { id, delta, .. } in &result.deltas {
        let Some(fish) = world.entities.iter_mut().find_map(|e| e.as_fish_mut().filter(|f| f.loc.id == *id)) else {
            continue;
        };
        if *delta >= 0.0 {
            fish.energy.add(*delta);
        } else {
            let burn_outcome = fish.energy.burn(-delta);
            if burn_outcome.went_negative {
                crate::error::record_negative_energy(&mut world.invariant_violations, *id, burn_outcome.would_be_value);
            }
        }
        let on_button = table.first().is_some_and(|c| c.id == *id);
        let outcome = if result.winners.contains(id) {
            crate::ecosystem::poker_stats::HandOutcome::Won { at_showdown: result.showdown_occurred }
        } else {
            crate::ecosystem::poker_stats::HandOutcome::Lost
        };
        fish.poker.record_result(*delta, 0, on_button);
        fish.poker.cooldown = world.cfg.poker_cooldown;

        let strategy_kind = fish.genome.poker_strategy.kind;
        world.ecosystem.poker.record_result(*id, strategy_kind, outcome, *delta as f64, 0.0, 0, false, 0, 0, on_button);

        if *delta >= 0.0 {
            world.ecosystem.energy.record_gain(frame, "poker_fish", *delta);
        } else {
            world.ecosystem.energy.record_burn(frame, "poker_fish", -delta);
        }
    }
    world.ecosystem.energy.record_burn(frame, "poker_house_cut", result.house_cut);

    let strategies: Vec<_> = table
        .iter()
        .filter_map(|c| world.entities.iter().find_map(|e| e.as_fish().filter(|f| f.loc.id == c.id)))
        .map(|f| f.genome.poker_strategy.kind)
        .collect();
    world.events.push(GameEvent::PokerResolved {
        participants: table.iter().map(|c| c.id).collect(),
        winner_ids: result.winners.clone(),
        strategies,
        pot,
        house_cut: result.house_cut,
    });
    world.push_poker_event(PokerEvent {
        frame,
        participants: table.iter().map(|c| c.id).collect(),
        winners: result.winners.clone(),
        pot,
        house_cut: result.house_cut,
        showdown_occurred: result.showdown_occurred,
    });
}

/// Immediate, gestation-free offspring when a hand's winner and a
/// nearby loser both independently consent: this is
/// deliberately distinct from the gestation path in `reproduction.rs`,
/// since a poker win is a one-shot event, not an ongoing courtship.
fn try_post_poker_reproduction(
    world: &mut World,
    cfg: &crate::config::TankConfig,
    result: &HandResult,
    table: &[&Candidate],
) -> Option<Entity> {
    let winner_id = *result.winners.first()?;
    let winner = table.iter().find(|c| c.id == winner_id)?;
    let loser = table
        .iter()
        .filter(|c| !result.winners.contains(&c.id))
        .min_by(|a, b| {
            let da = (a.x - winner.x).hypot(a.y - winner.y);
            let db = (b.x - winner.x).hypot(b.y - winner.y);
            da.partial_cmp(&db).unwrap()
        })?;

    let dist = (loser.x - winner.x).hypot(loser.y - winner.y);
    if dist > cfg.post_poker_mating_distance {
        return None;
    }

    let (winner_energy, winner_genome) = world
        .entities
        .iter()
        .find_map(|e| e.as_fish().filter(|f| f.loc.id == winner.id))
        .map(|f| (f.energy.current, f.genome.clone()))?;
    let (loser_energy, loser_genome) = world
        .entities
        .iter()
        .find_map(|e| e.as_fish().filter(|f| f.loc.id == loser.id))
        .map(|f| (f.energy.current, f.genome.clone()))?;
    if winner_energy < cfg.post_poker_reproduction_energy_threshold || loser_energy < cfg.post_poker_reproduction_energy_threshold {
        return None;
    }

    if !world.ecosystem.population.can_admit(super::fish_count(world), cfg.max_population) {
        return None;
    }

    if world.rng_poker.random::<f32>() >= cfg.post_poker_reproduction_winner_prob {
        return None;
    }
    if world.rng_poker.random::<f32>() >= cfg.post_poker_reproduction_loser_prob {
        return None;
    }

    let rates = MutationRates { rate: cfg.mutation_rate, strength: cfg.mutation_strength };
    let child_genome = Genome::from_parents_weighted(&winner_genome, &loser_genome, cfg.post_poker_crossover_winner_weight, &mut world.rng_mutation, rates);
    let id = world.ecosystem.population.next_entity_id();
    let x = (winner.x + loser.x) / 2.0;
    let y = (winner.y + loser.y) / 2.0;
    let mut child = crate::entity::Fish::new(id, x, y, child_genome, 0, cfg);
    child.species = child.genome.behavior_algorithm.kind.family() as u32;

    world.ecosystem.population.record_birth(0, child.genome.behavior_algorithm.kind);
    world.ecosystem.algorithms.record_birth(child.genome.behavior_algorithm.kind);
    world.ecosystem.algorithms.record_reproduction(winner_genome.behavior_algorithm.kind);
    world.ecosystem.lineage.record_birth(crate::ecosystem::LineageRecord {
        id,
        parent_id: Some(winner.id),
        generation: 0,
        algorithm: child.genome.behavior_algorithm.kind,
        color: child.genome.color_tint(),
        birth_frame: world.frame,
    });
    world.events.push(GameEvent::Born { id, parent_ids: (Some(winner.id), Some(loser.id)), generation: 0 });

    Some(Entity::Fish(Box::new(child)))
}
