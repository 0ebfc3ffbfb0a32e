//! Tank-wide energy accounting, kept as two deliberately distinct APIs
//! a lifetime cumulative ledger and a windowed recent-frame
//! one. They are reported side by side rather than collapsed into one
//! number because they answer different questions — "where has all the
//! energy in this tank ever gone" versus "what's driving the curve right
//! now" — and they can legitimately diverge once old per-frame entries
//! fall out of the window.

use std::collections::{BTreeMap, VecDeque};

/// One source/sink bucket recorded for a single frame, used to build the
/// recent-frame window. `source` is a short stable label such as
/// `"algae"`, `"metabolism"`, `"crab_attack"`, `"reproduction_cost"`.
#[derive(Clone, Debug, PartialEq)]
struct FrameEntry {
    frame: u64,
    source: &'static str,
    amount: f32,
}

#[derive(Clone, Debug, Default)]
pub struct EnergyLedger {
    window_frames: u64,
    lifetime_gains: BTreeMap<&'static str, f64>,
    lifetime_burns: BTreeMap<&'static str, f64>,
    gains_log: VecDeque<FrameEntry>,
    burns_log: VecDeque<FrameEntry>,
}

impl EnergyLedger {
    pub fn new(window_frames: u64) -> Self {
        Self {
            window_frames,
            ..Default::default()
        }
    }

    pub fn record_gain(&mut self, frame: u64, source: &'static str, amount: f32) {
        *self.lifetime_gains.entry(source).or_insert(0.0) += amount as f64;
        self.gains_log.push_back(FrameEntry {
            frame,
            source,
            amount,
        });
    }

    pub fn record_burn(&mut self, frame: u64, source: &'static str, amount: f32) {
        *self.lifetime_burns.entry(source).or_insert(0.0) += amount as f64;
        self.burns_log.push_back(FrameEntry {
            frame,
            source,
            amount,
        });
    }

    /// Drops window-log entries older than `frame - window_frames`. Does
    /// not touch the lifetime dictionaries, which never shrink.
    pub fn evict_stale(&mut self, frame: u64) {
        let cutoff = frame.saturating_sub(self.window_frames);
        while matches!(self.gains_log.front(), Some(e) if e.frame < cutoff) {
            self.gains_log.pop_front();
        }
        while matches!(self.burns_log.front(), Some(e) if e.frame < cutoff) {
            self.burns_log.pop_front();
        }
    }

    pub fn gains_by_source(&self) -> &BTreeMap<&'static str, f64> {
        &self.lifetime_gains
    }

    pub fn burns_by_source(&self) -> &BTreeMap<&'static str, f64> {
        &self.lifetime_burns
    }

    /// Cumulative gains minus burns since the ledger was created.
    pub fn lifetime_delta(&self) -> f64 {
        let gains: f64 = self.lifetime_gains.values().sum();
        let burns: f64 = self.lifetime_burns.values().sum();
        gains - burns
    }

    /// Gains minus burns among entries still inside the window as of the
    /// last `evict_stale` call.
    pub fn recent_window_delta(&self) -> f64 {
        let gains: f64 = self.gains_log.iter().map(|e| e.amount as f64).sum();
        let burns: f64 = self.burns_log.iter().map(|e| e.amount as f64).sum();
        gains - burns
    }

    /// `recent_window_delta` scaled to a lifetime-comparable basis is not
    /// meaningful (different denominators), so this reports the raw
    /// difference between the two deltas rather than a ratio — callers
    /// that want "is the tank's energy trend changing" compare this
    /// against zero.
    pub fn ledger_discrepancy(&self) -> f64 {
        self.lifetime_delta() - self.recent_window_delta()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifetime_delta_tracks_all_entries_regardless_of_window() {
        let mut ledger = EnergyLedger::new(10);
        ledger.record_gain(0, "algae", 5.0);
        ledger.record_burn(0, "metabolism", 2.0);
        ledger.evict_stale(100);
        assert_eq!(ledger.lifetime_delta(), 3.0);
    }

    #[test]
    fn recent_window_excludes_entries_older_than_window() {
        let mut ledger = EnergyLedger::new(10);
        ledger.record_gain(0, "algae", 5.0);
        ledger.evict_stale(50);
        assert_eq!(ledger.recent_window_delta(), 0.0);
        assert_eq!(ledger.lifetime_delta(), 5.0);
    }

    #[test]
    fn discrepancy_is_zero_when_nothing_has_fallen_out_of_window() {
        let mut ledger = EnergyLedger::new(1000);
        ledger.record_gain(0, "algae", 5.0);
        ledger.record_burn(0, "metabolism", 1.0);
        ledger.evict_stale(1);
        assert_eq!(ledger.ledger_discrepancy(), 0.0);
    }
}
