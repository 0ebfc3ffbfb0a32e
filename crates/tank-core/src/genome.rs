//! Heritable trait vector: nine scalar traits with declared ranges, two
//! categorical selections (behavior algorithm, poker strategy), and a
//! small learned-behavior dictionary. Every write to a scalar trait goes
//! through [`Trait::set`] so the declared range is an invariant, not a
//! convention.

use rand::Rng;
use std::collections::BTreeMap;

use crate::behavior::BehaviorId;
use crate::poker::strategy::PokerStrategyId;

/// A single scalar trait and its declared, immutable range. The range is
/// carried alongside the value (rather than looked up from a separate
/// table) so mutation and clamping never need a second source of truth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trait {
    pub value: f32,
    pub min: f32,
    pub max: f32,
}

impl Trait {
    pub fn new(value: f32, min: f32, max: f32) -> Self {
        Self {
            value: value.clamp(min, max),
            min,
            max,
        }
    }

    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    pub fn set(&mut self, value: f32) {
        self.value = value.clamp(self.min, self.max);
    }

    /// `inherited = (a + b) / 2`, mutated with `mutation_rate` probability
    /// by Gaussian noise of magnitude `mutation_strength * span`, then
    /// re-clamped.
    fn inherit<R: Rng + ?Sized>(
        a: Self,
        b: Self,
        rng: &mut R,
        mutation_rate: f32,
        mutation_strength: f32,
    ) -> Self {
        Self::inherit_weighted(a, b, 0.5, rng, mutation_rate, mutation_strength)
    }

    /// `inherited = a * weight_a + b * (1 - weight_a)`, used by the
    /// post-poker reproduction path to favor the hand's winner over the
    /// neutral 50/50 mean ordinary reproduction uses.
    fn inherit_weighted<R: Rng + ?Sized>(
        a: Self,
        b: Self,
        weight_a: f32,
        rng: &mut R,
        mutation_rate: f32,
        mutation_strength: f32,
    ) -> Self {
        let mut value = a.value * weight_a + b.value * (1.0 - weight_a);
        if rng.random::<f32>() < mutation_rate {
            value += gaussian(rng) * mutation_strength * a.span();
        }
        Self::new(value, a.min, a.max)
    }

    fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R, mutation_rate: f32, mutation_strength: f32) {
        if rng.random::<f32>() < mutation_rate {
            let delta = gaussian(rng) * mutation_strength * self.span();
            self.set(self.value + delta);
        }
    }
}

/// Box-Muller transform; `rand_distr` is outside this crate's dependency
/// set, so a standard-normal sample is drawn by hand from two uniforms.
/// Shared with `behavior::params` and `poker::strategy` so every mutation
/// path (genome traits, behavior parameters, poker-strategy parameters)
/// samples noise the same way.
pub(crate) fn gaussian<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    let u1: f32 = rng.random_range(f32::EPSILON..1.0);
    let u2: f32 = rng.random::<f32>();
    (-2.0 * u1.ln()).sqrt() * (std::f32::consts::TAU * u2).cos()
}

#[derive(Clone, Copy, Debug)]
pub struct MutationRates {
    pub rate: f32,
    pub strength: f32,
}

impl Default for MutationRates {
    fn default() -> Self {
        Self {
            rate: 0.1,
            strength: 0.1,
        }
    }
}

impl MutationRates {
    /// Categorical identities (behavior algorithm, poker strategy) mutate
    /// their parameters at a higher rate/strength than scalar traits.
    pub fn for_categorical(self) -> Self {
        Self {
            rate: (self.rate * 1.5).min(1.0),
            strength: self.strength * 1.5,
        }
    }

    /// Scaled upward under population stress so near-extinction states
    /// bias toward exploration.
    pub fn under_population_stress(self, shortfall_fraction: f32) -> Self {
        let factor = 1.0 + shortfall_fraction.clamp(0.0, 1.0);
        Self {
            rate: (self.rate * factor).min(1.0),
            strength: self.strength * factor,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Genome {
    pub speed_modifier: Trait,
    pub size_modifier: Trait,
    pub vision_range: Trait,
    pub metabolism_rate: Trait,
    pub max_energy: Trait,
    pub fertility: Trait,
    pub aggression: Trait,
    pub social_tendency: Trait,
    pub color_hue: Trait,

    pub behavior_algorithm: BehaviorId,
    pub poker_strategy: PokerStrategyId,

    /// Scalars in `[-0.3, 0.3]` keyed by learning category (e.g. a food
    /// location memory strength, a predator-avoidance adjustment).
    /// Counters such as games-played or escapes live on the fish's memory
    /// component, not here, and are never inherited.
    pub learned_behaviors: BTreeMap<String, f32>,
}

const LEARNED_BEHAVIOR_BOUND: f32 = 0.3;
const CULTURAL_INHERITANCE_RATE: f32 = 0.5;

impl Genome {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            speed_modifier: Trait::new(rng.random_range(0.7..=1.3), 0.5, 1.5),
            size_modifier: Trait::new(rng.random_range(0.7..=1.3), 0.7, 1.3),
            vision_range: Trait::new(rng.random_range(0.7..=1.3), 0.7, 1.3),
            metabolism_rate: Trait::new(rng.random_range(0.7..=1.3), 0.7, 1.3),
            max_energy: Trait::new(rng.random_range(0.7..=1.3), 0.7, 1.5),
            fertility: Trait::new(rng.random_range(0.6..=1.4), 0.6, 1.4),
            aggression: Trait::new(rng.random_range(0.0..=1.0), 0.0, 1.0),
            social_tendency: Trait::new(rng.random_range(0.0..=1.0), 0.0, 1.0),
            color_hue: Trait::new(rng.random::<f32>(), 0.0, 1.0),
            behavior_algorithm: BehaviorId::random(rng),
            poker_strategy: PokerStrategyId::random(rng),
            learned_behaviors: BTreeMap::new(),
        }
    }

    /// Builds an offspring genome from two parents: scalar traits inherit
    /// by per-trait arithmetic mean plus independent mutation; behavior
    /// algorithm and poker strategy identities come from parent 1 with
    /// parameter-level mutation at [`MutationRates::for_categorical`];
    /// learned behaviors inherit as the component-wise mean scaled by the
    /// cultural inheritance rate.
    pub fn from_parents<R: Rng + ?Sized>(
        parent1: &Genome,
        parent2: &Genome,
        rng: &mut R,
        rates: MutationRates,
    ) -> Self {
        Self::from_parents_weighted(parent1, parent2, 0.5, rng, rates)
    }

    /// Post-poker reproduction crossover: `weight1` favors `parent1`
    /// (the hand's winner) over the neutral mean, per
    /// `post_poker_crossover_winner_weight`.
    pub fn from_parents_weighted<R: Rng + ?Sized>(
        parent1: &Genome,
        parent2: &Genome,
        weight1: f32,
        rng: &mut R,
        rates: MutationRates,
    ) -> Self {
        let mut t =
            |a: Trait, b: Trait| Trait::inherit_weighted(a, b, weight1, rng, rates.rate, rates.strength);

        let speed_modifier = t(parent1.speed_modifier, parent2.speed_modifier);
        let size_modifier = t(parent1.size_modifier, parent2.size_modifier);
        let vision_range = t(parent1.vision_range, parent2.vision_range);
        let metabolism_rate = t(parent1.metabolism_rate, parent2.metabolism_rate);
        let max_energy = t(parent1.max_energy, parent2.max_energy);
        let fertility = t(parent1.fertility, parent2.fertility);
        let aggression = t(parent1.aggression, parent2.aggression);
        let social_tendency = t(parent1.social_tendency, parent2.social_tendency);
        let color_hue = t(parent1.color_hue, parent2.color_hue);

        let mut behavior_algorithm = parent1.behavior_algorithm;
        behavior_algorithm.mutate_parameters(rng, rates.for_categorical());

        let mut poker_strategy = parent1.poker_strategy;
        poker_strategy.mutate_parameters(rng, rates.for_categorical());

        let mut learned_behaviors = BTreeMap::new();
        for key in parent1
            .learned_behaviors
            .keys()
            .chain(parent2.learned_behaviors.keys())
        {
            if learned_behaviors.contains_key(key) {
                continue;
            }
            let a = parent1.learned_behaviors.get(key).copied().unwrap_or(0.0);
            let b = parent2.learned_behaviors.get(key).copied().unwrap_or(0.0);
            let inherited = ((a + b) / 2.0 * CULTURAL_INHERITANCE_RATE)
                .clamp(-LEARNED_BEHAVIOR_BOUND, LEARNED_BEHAVIOR_BOUND);
            learned_behaviors.insert(key.clone(), inherited);
        }

        Self {
            speed_modifier,
            size_modifier,
            vision_range,
            metabolism_rate,
            max_energy,
            fertility,
            aggression,
            social_tendency,
            color_hue,
            behavior_algorithm,
            poker_strategy,
            learned_behaviors,
        }
    }

    /// In-place scalar mutation without crossover, used when a genome
    /// needs to drift without a mating event (none of the current callers
    /// need this outside tests, but it mirrors other standalone
    /// `mutate` entry points in this crate's lineage).
    pub fn mutate_scalars<R: Rng + ?Sized>(&mut self, rng: &mut R, rates: MutationRates) {
        for t in [
            &mut self.speed_modifier,
            &mut self.size_modifier,
            &mut self.vision_range,
            &mut self.metabolism_rate,
            &mut self.max_energy,
            &mut self.fertility,
            &mut self.aggression,
            &mut self.social_tendency,
            &mut self.color_hue,
        ] {
            t.mutate(rng, rates.rate, rates.strength);
        }
    }

    /// RGB tint derived from `color_hue`, desaturated by blending toward
    /// white.
    pub fn color_tint(&self) -> (u8, u8, u8) {
        let hue = self.color_hue.value * 360.0;
        let (r, g, b) = if hue < 60.0 {
            (255.0, hue / 60.0 * 255.0, 0.0)
        } else if hue < 120.0 {
            ((120.0 - hue) / 60.0 * 255.0, 255.0, 0.0)
        } else if hue < 180.0 {
            (0.0, 255.0, (hue - 120.0) / 60.0 * 255.0)
        } else if hue < 240.0 {
            (0.0, (240.0 - hue) / 60.0 * 255.0, 255.0)
        } else if hue < 300.0 {
            ((hue - 240.0) / 60.0 * 255.0, 0.0, 255.0)
        } else {
            (255.0, 0.0, (360.0 - hue) / 60.0 * 255.0)
        };

        let saturation = 0.3_f32;
        let blend = |c: f32| (c * saturation + 255.0 * (1.0 - saturation)) as u8;
        (blend(r), blend(g), blend(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn random_genome_respects_declared_ranges() {
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        let g = Genome::random(&mut rng);
        assert!((0.5..=1.5).contains(&g.speed_modifier.value));
        assert!((0.0..=1.0).contains(&g.aggression.value));
        assert!((0.0..=1.0).contains(&g.color_hue.value));
    }

    #[test]
    fn crossover_is_deterministic_for_fixed_seed() {
        let mut seed_rng = ChaCha12Rng::seed_from_u64(1);
        let p1 = Genome::random(&mut seed_rng);
        let p2 = Genome::random(&mut seed_rng);

        let mut rng_a = ChaCha12Rng::seed_from_u64(99);
        let mut rng_b = ChaCha12Rng::seed_from_u64(99);
        let child_a = Genome::from_parents(&p1, &p2, &mut rng_a, MutationRates::default());
        let child_b = Genome::from_parents(&p1, &p2, &mut rng_b, MutationRates::default());
        assert_eq!(child_a.speed_modifier.value, child_b.speed_modifier.value);
        assert_eq!(child_a.color_hue.value, child_b.color_hue.value);
    }

    #[test]
    fn repeated_mutation_never_escapes_bounds() {
        let mut rng = ChaCha12Rng::seed_from_u64(42);
        let mut g = Genome::random(&mut rng);
        g.speed_modifier.set(g.speed_modifier.max);
        let rates = MutationRates {
            rate: 1.0,
            strength: 1.0,
        };
        for _ in 0..10_000 {
            g.mutate_scalars(&mut rng, rates);
            assert!((g.speed_modifier.min..=g.speed_modifier.max).contains(&g.speed_modifier.value));
        }
    }

    #[test]
    fn learned_behaviors_inherit_as_scaled_mean() {
        let mut rng = ChaCha12Rng::seed_from_u64(3);
        let mut p1 = Genome::random(&mut rng);
        let mut p2 = Genome::random(&mut rng);
        p1.learned_behaviors.insert("food_spot".into(), 0.3);
        p2.learned_behaviors.insert("food_spot".into(), 0.1);
        let child = Genome::from_parents(&p1, &p2, &mut rng, MutationRates::default());
        let expected = (0.3 + 0.1) / 2.0 * CULTURAL_INHERITANCE_RATE;
        assert!((child.learned_behaviors["food_spot"] - expected).abs() < 1e-6);
    }
}
