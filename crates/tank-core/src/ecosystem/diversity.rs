//! Population diversity: distinct-algorithm and distinct-species
//! counts, trait variance, and a composite score combining both with
//! fixed weights.
//!
//! "Species" has no dedicated genome field — the corpus's species
//! concept (`original_source/fishtank.py`'s "Solo"/"Algorithmic"/
//! "Neural"/"Schooling" populations) maps onto [`BehaviorFamily`] here,
//! since a fish's behavior family is exactly the kind of coarse grouping
//! the fish-fish poker eligibility gate and this tracker both want.

use crate::behavior::{BehaviorFamily, BehaviorKind};
use crate::genome::Genome;

fn variance(values: &[f32]) -> f32 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f32>() / values.len() as f32;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / values.len() as f32
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct DiversitySnapshot {
    pub distinct_behaviors: usize,
    pub distinct_species: usize,
    pub color_variance: f32,
    pub speed_variance: f32,
    pub size_variance: f32,
    pub vision_variance: f32,
    pub score: f32,
}

/// Fixed weights for the composite score, in the same order as the
/// individual variance fields above.
const WEIGHTS: [f32; 4] = [0.3, 0.3, 0.2, 0.2];

#[derive(Clone, Debug, Default)]
pub struct DiversityTracker {
    last: DiversitySnapshot,
}

impl DiversityTracker {
    /// Recomputes the snapshot from a fresh pass over live fish genomes.
    /// Called once per frame by the ecosystem facade rather than
    /// incrementally, since every trait variance term depends on the
    /// whole population.
    pub fn recompute<'a>(&mut self, genomes: impl Iterator<Item = &'a Genome>) -> DiversitySnapshot {
        let mut behaviors = std::collections::BTreeSet::<BehaviorKind>::new();
        let mut species = std::collections::BTreeSet::<BehaviorFamily>::new();
        let mut colors = Vec::new();
        let mut speeds = Vec::new();
        let mut sizes = Vec::new();
        let mut visions = Vec::new();

        for genome in genomes {
            behaviors.insert(genome.behavior_algorithm.kind);
            species.insert(genome.behavior_algorithm.kind.family());
            colors.push(genome.color_hue.value);
            speeds.push(genome.speed_modifier.value);
            sizes.push(genome.size_modifier.value);
            visions.push(genome.vision_range.value);
        }

        let color_variance = variance(&colors);
        let speed_variance = variance(&speeds);
        let size_variance = variance(&sizes);
        let vision_variance = variance(&visions);

        let score = WEIGHTS[0] * color_variance
            + WEIGHTS[1] * speed_variance
            + WEIGHTS[2] * size_variance
            + WEIGHTS[3] * vision_variance;

        let snapshot = DiversitySnapshot {
            distinct_behaviors: behaviors.len(),
            distinct_species: species.len(),
            color_variance,
            speed_variance,
            size_variance,
            vision_variance,
            score,
        };
        self.last = snapshot;
        snapshot
    }

    pub fn last(&self) -> DiversitySnapshot {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn identical_genomes_have_zero_variance() {
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let genome = Genome::random(&mut rng);
        let genomes = vec![genome.clone(), genome.clone(), genome];
        let mut tracker = DiversityTracker::default();
        let snapshot = tracker.recompute(genomes.iter());
        assert_eq!(snapshot.color_variance, 0.0);
        assert_eq!(snapshot.distinct_behaviors, 1);
        assert_eq!(snapshot.distinct_species, 1);
    }

    #[test]
    fn distinct_genomes_increase_counts_and_score() {
        let mut rng = ChaCha12Rng::seed_from_u64(2);
        let genomes: Vec<Genome> = (0..8).map(|_| Genome::random(&mut rng)).collect();
        let mut tracker = DiversityTracker::default();
        let snapshot = tracker.recompute(genomes.iter());
        assert!(snapshot.distinct_behaviors >= 1);
        assert!(snapshot.score >= 0.0);
    }
}
