//! Internal typed event bus: entities and collision/reproduction
//! resolution push [`GameEvent`]s during a step; `World::step` drains
//! them into `StepResult::events` and fans a subset out to the
//! ecosystem trackers. Bounded by `cfg.max_events` — oldest events drop
//! first, same policy as the lineage and memory rings.

use std::collections::VecDeque;

use crate::entity::{DeathCause, EntityId, EntityKind};
use crate::poker::strategy::PokerStrategyKind;

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Born {
        id: EntityId,
        parent_ids: (Option<EntityId>, Option<EntityId>),
        generation: u32,
    },
    Died {
        id: EntityId,
        kind: EntityKind,
        cause: DeathCause,
    },
    FoodEaten {
        food_id: EntityId,
        eater_id: EntityId,
        energy_gained: f32,
    },
    FoodSpawned {
        food_id: EntityId,
    },
    PredatorEncounter {
        fish_id: EntityId,
        crab_id: EntityId,
    },
    PokerResolved {
        participants: Vec<EntityId>,
        winner_ids: Vec<EntityId>,
        strategies: Vec<PokerStrategyKind>,
        pot: f32,
        house_cut: f32,
    },
    EnergyDelta {
        id: EntityId,
        source: &'static str,
        amount: f32,
    },
}

#[derive(Clone, Debug, Default)]
pub struct EventBus {
    ring: VecDeque<GameEvent>,
    cap: usize,
    pub dropped: u64,
}

impl EventBus {
    pub fn new(cap: usize) -> Self {
        Self {
            ring: VecDeque::with_capacity(cap.min(1024)),
            cap,
            dropped: 0,
        }
    }

    pub fn push(&mut self, event: GameEvent) {
        if self.ring.len() >= self.cap {
            self.ring.pop_front();
            self.dropped += 1;
        }
        self.ring.push_back(event);
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.ring.drain(..).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.ring.iter()
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oldest_events_drop_first_once_over_cap() {
        let mut bus = EventBus::new(2);
        bus.push(GameEvent::FoodSpawned { food_id: 1 });
        bus.push(GameEvent::FoodSpawned { food_id: 2 });
        bus.push(GameEvent::FoodSpawned { food_id: 3 });
        assert_eq!(bus.len(), 2);
        assert_eq!(bus.dropped, 1);
        assert_eq!(bus.iter().next(), Some(&GameEvent::FoodSpawned { food_id: 2 }));
    }

    #[test]
    fn drain_empties_the_ring() {
        let mut bus = EventBus::new(10);
        bus.push(GameEvent::FoodSpawned { food_id: 1 });
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.is_empty());
    }
}
