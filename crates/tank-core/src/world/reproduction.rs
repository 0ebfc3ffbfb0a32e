//! Ordinary courtship: finds nearby eligible mates and
//! starts a gestation on the lower-ID "carrier" fish of a pair. The
//! actual birth happens later in `step::update_fish` once the carrier's
//! `pregnancy_timer` reaches zero — distinct from the immediate,
//! gestation-free offspring `collisions::try_post_poker_reproduction`
//! produces right after a poker hand.

use crate::entity::EntityId;
use crate::spatial::SpatialIndex;

use super::World;

struct MateCandidate {
    id: EntityId,
    x: f64,
    y: f64,
}

pub(super) fn resolve(world: &mut World, index: &SpatialIndex) {
    let cfg = world.cfg.clone();
    let frame = world.frame;
    if !world.ecosystem.population.can_admit(super::fish_count(world), cfg.max_population) {
        return;
    }

    let eligible: Vec<MateCandidate> = world
        .entities
        .iter()
        .filter_map(|e| e.as_fish())
        .filter(|f| {
            f.reproduction.can_reproduce(f.energy.ratio(), cfg.reproduction_min_energy / f.energy.max)
                && f.lifecycle.stage.can_reproduce()
        })
        .map(|f| MateCandidate { id: f.loc.id, x: f.loc.x, y: f.loc.y })
        .collect();

    let mut paired = std::collections::BTreeSet::new();

    for candidate in &eligible {
        if paired.contains(&candidate.id) {
            continue;
        }
        let Some(partner_id) = index
            .nearby(candidate.x, candidate.y, cfg.mating_distance, crate::entity::EntityKind::Fish)
            .into_iter()
            .filter(|(id, _)| *id != candidate.id)
            .filter_map(|(id, dist)| eligible.iter().find(|c| c.id == id).map(|_| (id, dist)))
            .filter(|(id, _)| !paired.contains(id))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
            .map(|(id, _)| id)
        else {
            continue;
        };

        paired.insert(candidate.id);
        paired.insert(partner_id);
        let carrier_id = candidate.id.min(partner_id);
        let partner_of_carrier = candidate.id.max(partner_id);

        let partner_genome = world
            .entities
            .iter()
            .filter_map(|e| e.as_fish())
            .find(|f| f.loc.id == partner_of_carrier)
            .map(|f| f.genome.clone());
        let Some(partner_genome) = partner_genome else { continue };

        let cost = cfg.reproduction_energy_cost / 2.0;
        for id in [carrier_id, partner_of_carrier] {
            if let Some(fish) = world.entities.iter_mut().find_map(|e| e.as_fish_mut().filter(|f| f.loc.id == id)) {
                fish.reproduction.cooldown = cfg.reproduction_cooldown;
                let outcome = fish.energy.burn(cost);
                if outcome.went_negative {
                    crate::error::record_negative_energy(&mut world.invariant_violations, id, outcome.would_be_value);
                }
            }
        }
        world.ecosystem.energy.record_burn(frame, "reproduction_cost", cost * 2.0);

        if let Some(carrier) = world.entities.iter_mut().find_map(|e| e.as_fish_mut().filter(|f| f.loc.id == carrier_id)) {
            carrier.reproduction.pregnant = true;
            carrier.reproduction.pregnancy_timer = cfg.reproduction_gestation;
            carrier.reproduction.stored_mate_genome = Some(Box::new(partner_genome));
        }
    }
}
