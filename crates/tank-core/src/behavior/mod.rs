//! The movement-behavior catalog: ~50 named, parametrized algorithms
//! grouped by intent (food-seeking, predator avoidance, schooling/
//! cohesion, exploration, energy management, specialized patrols).
//!
//! Represented as a tagged sum (`BehaviorKind`) plus a shared parameter
//! table (`BehaviorParams`), per the "dynamic dispatch of ~50 subclasses"
//! design note: identity stays a small `Copy` enum for stats keying, and
//! mutation/clamping work uniformly over the shared table instead of
//! fifty bespoke structs.

pub mod context;
pub mod dispatch;
pub mod kind;
pub mod params;

pub use context::BehaviorContext;
pub use kind::{BehaviorFamily, BehaviorKind};
pub use params::BehaviorParams;

use rand::Rng;

/// A fish's behavior algorithm identity plus its (possibly mutated)
/// parameters. This is what `Genome::behavior_algorithm` actually stores;
/// `BehaviorKind` alone is just the identity used for stats keying.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BehaviorId {
    pub kind: BehaviorKind,
    pub params: BehaviorParams,
}

impl BehaviorId {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let kind = BehaviorKind::random(rng);
        let params = BehaviorParams::random_for(kind, rng);
        Self { kind, params }
    }

    /// Desired velocity in normalized units (approximately `[-1, 1]` per
    /// axis); the movement integrator smooths the fish's actual velocity
    /// toward `desired * fish.speed`.
    pub fn execute<R: Rng + ?Sized>(&self, ctx: &BehaviorContext, rng: &mut R) -> (f64, f64) {
        dispatch::execute(self.kind, &self.params, ctx, rng)
    }

    pub fn mutate_parameters<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        rates: crate::genome::MutationRates,
    ) {
        self.params.mutate(self.kind, rng, rates.rate, rates.strength);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn execute_always_returns_finite_bounded_velocity() {
        let mut rng = ChaCha12Rng::seed_from_u64(5);
        for _ in 0..200 {
            let id = BehaviorId::random(&mut rng);
            let ctx = BehaviorContext::idle(0.5);
            let (vx, vy) = id.execute(&ctx, &mut rng);
            assert!(vx.is_finite() && vy.is_finite());
            assert!((vx * vx + vy * vy).sqrt() <= 2.5, "{:?} -> ({vx}, {vy})", id.kind);
        }
    }
}
