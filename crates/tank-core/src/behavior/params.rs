//! The shared parameter table backing every behavior algorithm. Each
//! algorithm uses 2-5 of the five slots; unused slots are left at 0 and
//! ignored by `dispatch`. Declared bounds live on `BehaviorKind` so
//! mutation has somewhere to clamp to without a second per-algorithm type.

use rand::Rng;

use super::kind::BehaviorKind;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BehaviorParams {
    pub p: [f32; 5],
}

impl BehaviorParams {
    pub fn get(&self, i: usize) -> f32 {
        self.p[i]
    }

    pub fn random_for<R: Rng + ?Sized>(kind: BehaviorKind, rng: &mut R) -> Self {
        let ranges = kind.param_ranges();
        let mut p = [0.0f32; 5];
        for (i, (lo, hi)) in ranges.into_iter().enumerate() {
            if lo < hi {
                p[i] = rng.random_range(lo..=hi);
            }
        }
        Self { p }
    }

    /// Gaussian mutation scaled by each slot's declared range span,
    /// re-clamped, identical in shape to `Genome::Trait::mutate`.
    pub fn mutate<R: Rng + ?Sized>(
        &mut self,
        kind: BehaviorKind,
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
