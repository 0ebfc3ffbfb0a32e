//! Ecosystem tracking facade: composes the population, lineage, energy,
//! fitness, poker, and diversity trackers behind one `update` entry
//! point. `World::step` writes through the individual trackers during
//! collision/reproduction/lifecycle resolution, then calls
//! [`EcosystemTracker::on_frame_end`] once per frame so diversity and
//! window eviction recompute exactly once.

pub mod algorithm_stats;
pub mod diversity;
pub mod energy_ledger;
pub mod lineage;
pub mod poker_stats;
pub mod population;

pub use algorithm_stats::{AlgorithmRecord, AlgorithmStatsTracker};
pub use diversity::{DiversitySnapshot, DiversityTracker};
pub use energy_ledger::EnergyLedger;
pub use lineage::{LineageRecord, LineageTracker};
pub use poker_stats::{FishPokerRecord, HandOutcome, PokerStatsTracker, StrategyRecord};
pub use population::PopulationTracker;

use crate::config::TankConfig;
use crate::genome::Genome;

#[derive(Clone, Debug, Default)]
pub struct EcosystemTracker {
    pub population: PopulationTracker,
    pub lineage: LineageTracker,
    pub energy: EnergyLedger,
    pub algorithms: AlgorithmStatsTracker,
    pub poker: PokerStatsTracker,
    pub diversity: DiversityTracker,
}

impl EcosystemTracker {
    pub fn new(cfg: &TankConfig) -> Self {
        Self {
            energy: EnergyLedger::new(cfg.energy_ledger_window_frames),
            ..Default::default()
        }
    }

    /// Called once per frame after all entity-level updates: evicts
    /// stale energy-ledger window entries, prunes the lineage log to its
    /// cap, and recomputes diversity over the current live genomes.
    /// Returns the ids of any child records whose parent was pruned this
    /// frame and remapped to root, for the caller to record as
    /// [`crate::error::InvariantViolation::OrphanLineageRecord`].
    pub fn on_frame_end<'a>(
        &mut self,
        frame: u64,
        cfg: &TankConfig,
        live_genomes: impl Iterator<Item = &'a Genome>,
    ) -> Vec<crate::entity::EntityId> {
        self.energy.evict_stale(frame);
        let newly_orphaned = self.lineage.prune_to_cap(cfg.max_lineage_records);
        self.diversity.recompute(live_genomes);
        newly_orphaned
    }
}
