//! The poker-strategy catalog: twelve named, parametrized betting
//! policies. Structured exactly like the movement-behavior catalog
//! (`behavior::BehaviorId`) — a `Copy` identity enum plus a shared
//! parameter table — since both are "small catalog of parametrized
//! algorithms that mutate under inheritance" instances of the same shape.

use rand::Rng;

use crate::genome::MutationRates;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PokerAction {
    Fold,
    Check,
    Call,
    Raise,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub enum PokerStrategyKind {
    TightAggressive,
    LooseAggressive,
    TightPassive,
    LoosePassive,
    Balanced,
    Maniac,
    Adaptive,
    PositionalExploiter,
    TrapSetter,
    Mathematical,
    AlwaysFold,
    Random,
}

pub const ALL_STRATEGIES: [PokerStrategyKind; 12] = [
    PokerStrategyKind::TightAggressive,
    PokerStrategyKind::LooseAggressive,
    PokerStrategyKind::TightPassive,
    PokerStrategyKind::LoosePassive,
    PokerStrategyKind::Balanced,
    PokerStrategyKind::Maniac,
    PokerStrategyKind::Adaptive,
    PokerStrategyKind::PositionalExploiter,
    PokerStrategyKind::TrapSetter,
    PokerStrategyKind::Mathematical,
    PokerStrategyKind::AlwaysFold,
    PokerStrategyKind::Random,
];

impl PokerStrategyKind {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        ALL_STRATEGIES[rng.random_range(0..ALL_STRATEGIES.len())]
    }

    /// Declared bounds for the five shared parameter slots. Slot meaning
    /// per strategy family: `[weak_fold_threshold, strong_raise_threshold,
    /// value_raise_multiplier, bluff_frequency, position_bonus]`, mirroring
    /// `TightAggressiveStrategy`'s parameter names; strategies that ignore
    /// a slot declare an empty range so it is never mutated.
    pub fn param_ranges(self) -> [(f32, f32); 5] {
        use PokerStrategyKind::*;
        let none = (0.0, 0.0);
        match self {
            TightAggressive => [(0.3, 0.45), (0.65, 0.8), (2.0, 3.0), (0.05, 0.15), (0.05, 0.15)],
            LooseAggressive => [(0.1, 0.25), (0.5, 0.65), (2.0, 3.5), (0.2, 0.4), (0.05, 0.15)],
            TightPassive => [(0.35, 0.5), (0.75, 0.9), (1.2, 1.8), (0.0, 0.05), none],
            LoosePassive => [(0.1, 0.2), (0.7, 0.85), (1.2, 1.8), (0.0, 0.1), none],
            Balanced => [(0.25, 0.35), (0.6, 0.7), (1.8, 2.4), (0.1, 0.2), (0.05, 0.1)],
            Maniac => [(0.0, 0.1), (0.3, 0.45), (2.5, 4.0), (0.4, 0.6), none],
            Adaptive => [(0.2, 0.35), (0.55, 0.7), (1.8, 2.6), (0.1, 0.25), (0.05, 0.15)],
            PositionalExploiter => [(0.25, 0.4), (0.55, 0.7), (1.8, 2.6), (0.1, 0.2), (0.15, 0.3)],
            TrapSetter => [(0.2, 0.3), (0.8, 0.9), (2.2, 3.0), (0.15, 0.3), none],
            Mathematical => [(0.3, 0.4), (0.65, 0.75), (1.6, 2.2), (0.02, 0.08), (0.05, 0.1)],
            AlwaysFold => [none, none, none, none, none],
            Random => [(0.0, 1.0), (0.0, 1.0), (1.0, 3.0), (0.0, 1.0), none],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PokerStrategyParams {
    pub p: [f32; 5],
}

impl PokerStrategyParams {
    pub fn get(&self, i: usize) -> f32 {
        self.p[i]
    }

    pub fn random_for<R: Rng + ?Sized>(kind: PokerStrategyKind, rng: &mut R) -> Self {
        let ranges = kind.param_ranges();
        let mut p = [0.0f32; 5];
        for (i, (lo, hi)) in ranges.into_iter().enumerate() {
            if lo < hi {
                p[i] = rng.random_range(lo..=hi);
            }
        }
        Self { p }
    }

    pub fn mutate<R: Rng + ?Sized>(
        &mut self,
        kind: PokerStrategyKind,
        rng: &mut R,
        mutation_rate: f32,
        mutation_strength: f32,
    ) {
        let ranges = kind.param_ranges();
        for (i, (lo, hi)) in ranges.into_iter().enumerate() {
            if lo >= hi {
                continue;
            }
            if rng.random::<f32>() < mutation_rate {
                let span = hi - lo;
                let delta = crate::genome::gaussian(rng) * mutation_strength * span;
                self.p[i] = (self.p[i] + delta).clamp(lo, hi);
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PokerStrategyId {
    pub kind: PokerStrategyKind,
    pub params: PokerStrategyParams,
}

impl PokerStrategyId {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let kind = PokerStrategyKind::random(rng);
        let params = PokerStrategyParams::random_for(kind, rng);
        Self { kind, params }
    }

    pub fn mutate_parameters<R: Rng + ?Sized>(&mut self, rng: &mut R, rates: MutationRates) {
        self.params.mutate(self.kind, rng, rates.rate, rates.strength);
    }

    /// `(hand_strength, current_bet, opponent_bet, pot, energy, on_button)
    /// -> (Action, amount)`. `amount` is the chip value committed for
    /// `Raise`/`Call` and is ignored for `Fold`/`Check`.
    pub fn decide_action<R: Rng + ?Sized>(
        &self,
        hand_strength: f32,
        current_bet: f32,
        opponent_bet: f32,
        pot: f32,
        energy: f32,
        on_button: bool,
        rng: &mut R,
    ) -> (PokerAction, f32) {
        use PokerStrategyKind::*;
        let p = &self.params;
        let to_call = (opponent_bet - current_bet).max(0.0);

        if matches!(self.kind, AlwaysFold) {
            return if to_call <= 0.0 {
                (PokerAction::Check, 0.0)
            } else {
                (PokerAction::Fold, 0.0)
            };
        }
        if matches!(self.kind, Random) {
            let roll = rng.random::<f32>();
            return if roll < 0.25 && to_call > 0.0 {
                (PokerAction::Fold, 0.0)
            } else if roll < 0.6 {
                if to_call <= 0.0 {
                    (PokerAction::Check, 0.0)
                } else {
                    (PokerAction::Call, to_call.min(energy))
                }
            } else {
                let amount = (pot * p.get(2)).min(energy);
                (PokerAction::Raise, amount)
            };
        }

        let weak_fold_threshold = p.get(0);
        let strong_raise_threshold = p.get(1);
        let value_raise_multiplier = p.get(2);
        let bluff_frequency = p.get(3);
        let position_bonus = p.get(4);

        let effective_strength = if on_button {
            hand_strength + position_bonus
        } else {
            hand_strength
        };

        if effective_strength < weak_fold_threshold && to_call > 0.0 {
            if rng.random::<f32>() < bluff_frequency {
                let amount = (pot * value_raise_multiplier * 0.5).min(energy);
                return (PokerAction::Raise, amount);
            }
            return (PokerAction::Fold, 0.0);
        }

        if effective_strength >= strong_raise_threshold {
            let amount = (pot * value_raise_multiplier).min(energy);
            if amount > 0.0 {
                return (PokerAction::Raise, amount);
            }
        }

        if to_call <= 0.0 {
            (PokerAction::Check, 0.0)
        } else {
            (PokerAction::Call, to_call.min(energy))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn always_fold_never_calls_or_raises() {
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let strategy = PokerStrategyId {
            kind: PokerStrategyKind::AlwaysFold,
            params: PokerStrategyParams::random_for(PokerStrategyKind::AlwaysFold, &mut rng),
        };
        let (action, _) = strategy.decide_action(0.9, 0.0, 10.0, 20.0, 100.0, false, &mut rng);
        assert_eq!(action, PokerAction::Fold);
    }

    #[test]
    fn strong_hand_raises_above_threshold() {
        let mut rng = ChaCha12Rng::seed_from_u64(2);
        let strategy = PokerStrategyId {
            kind: PokerStrategyKind::Mathematical,
            params: PokerStrategyParams {
                p: [0.3, 0.6, 2.0, 0.0, 0.05],
            },
        };
        let (action, amount) = strategy.decide_action(0.9, 0.0, 0.0, 10.0, 100.0, false, &mut rng);
        assert_eq!(action, PokerAction::Raise);
        assert!(amount > 0.0);
    }

    #[test]
    fn decision_is_deterministic_for_fixed_seed() {
        let strategy = PokerStrategyId {
            kind: PokerStrategyKind::Random,
            params: PokerStrategyParams { p: [0.5, 0.5, 2.0, 0.5, 0.0] },
        };
        let mut rng_a = ChaCha12Rng::seed_from_u64(77);
        let mut rng_b = ChaCha12Rng::seed_from_u64(77);
        let a = strategy.decide_action(0.5, 0.0, 5.0, 15.0, 50.0, true, &mut rng_a);
        let b = strategy.decide_action(0.5, 0.0, 5.0, 15.0, 50.0, true, &mut rng_b);
        assert_eq!(a, b);
    }
}
