//! Non-fatal anomaly reporting.
//!
//! `step` never panics on live simulation data (spec.md §7). Runtime
//! anomalies are recovered locally, logged, and counted so they stay
//! visible in `metrics()` instead of unwinding the frame. Validation
//! failures (bad config) are the only errors `World` actually returns;
//! see `config::TankConfigError` and `world::WorldInitError`.

use std::fmt;

/// An internal assertion that failed but was recovered from (e.g. negative
/// energy clamped to zero, an orphan lineage record remapped to root).
/// Logged via `log::warn!` at the call site and tallied in
/// `StatsSnapshot::invariant_violations`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    NegativeEnergy { entity_id: u64, value: f32 },
    OrphanLineageRecord { child_stable_id: u64 },
    PopulationOverCeiling { count: usize, max: usize },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::NegativeEnergy { entity_id, value } => {
                write!(f, "entity {entity_id} had negative energy {value}, clamped to 0")
            }
            InvariantViolation::OrphanLineageRecord { child_stable_id } => {
                write!(
                    f,
                    "lineage record {child_stable_id} referenced a pruned parent, remapped to root"
                )
            }
            InvariantViolation::PopulationOverCeiling { count, max } => {
                write!(f, "fish population {count} exceeded ceiling {max}")
            }
        }
    }
}

/// A recoverable anomaly (e.g. a behavior returned a non-finite velocity).
/// Clamped to a safe default and logged at `log::debug!`; never surfaced
/// as an error to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransientWarning {
    NonFiniteVelocity { entity_id: u64 },
    BehaviorOutOfBounds { entity_id: u64, magnitude_bits: u32 },
}

impl fmt::Display for TransientWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransientWarning::NonFiniteVelocity { entity_id } => {
                write!(f, "entity {entity_id} behavior produced a non-finite velocity, clamped")
            }
            TransientWarning::BehaviorOutOfBounds {
                entity_id,
                magnitude_bits,
            } => write!(
                f,
                "entity {entity_id} behavior velocity magnitude {} exceeded bound, renormalized",
                f32::from_bits(*magnitude_bits)
            ),
        }
    }
}

/// Logs an [`InvariantViolation::NegativeEnergy`] and tallies it into the
/// running counter `World` surfaces as `StatsSnapshot::invariant_violations`.
/// Called from every `Energy::burn` site once the burn's `BurnOutcome`
/// reports `went_negative`.
pub fn record_negative_energy(invariant_violations: &mut u64, entity_id: u64, would_be_value: f32) {
    let violation = InvariantViolation::NegativeEnergy {
        entity_id,
        value: would_be_value,
    };
    log::warn!("{violation}");
    *invariant_violations += 1;
}

/// Logs an [`InvariantViolation::OrphanLineageRecord`] and tallies it.
/// Called once per child whose parent was pruned from the lineage log
/// and remapped to root this frame.
pub fn record_orphan_lineage(invariant_violations: &mut u64, child_stable_id: u64) {
    let violation = InvariantViolation::OrphanLineageRecord { child_stable_id };
    log::warn!("{violation}");
    *invariant_violations += 1;
}

/// Logs an [`InvariantViolation::PopulationOverCeiling`] and tallies it.
/// Called once per frame in which the live fish count exceeds
/// `max_population` despite admission gating, e.g. when reproduction and
/// an emergency spawn both clear their independent checks in the same
/// frame.
pub fn record_population_over_ceiling(invariant_violations: &mut u64, count: usize, max: usize) {
    let violation = InvariantViolation::PopulationOverCeiling { count, max };
    log::warn!("{violation}");
    *invariant_violations += 1;
}
