//! Poker leaderboards, aggregated per strategy and per fish.
//!
//! Field names follow `PokerStats`/`FishOpponentPokerStats` in
//! `original_source/core/ecosystem_stats.py` so the derived metrics
//! (VPIP, aggression factor, button split) compute the same ratios.

use std::collections::BTreeMap;

use crate::entity::EntityId;
use crate::poker::strategy::PokerStrategyKind;

#[derive(Clone, Debug, Default)]
pub struct StrategyRecord {
    pub total_games: u64,
    pub total_wins: u64,
    pub total_losses: u64,
    pub total_ties: u64,
    pub total_energy_won: f64,
    pub total_energy_lost: f64,
    pub total_house_cuts: f64,
    pub folds: u64,
    pub preflop_folds: u64,
    pub showdown_count: u64,
    pub won_at_showdown: u64,
    pub won_by_fold: u64,
    pub total_raises: u64,
    pub total_calls: u64,
    pub button_games: u64,
    pub button_wins: u64,
    pub non_button_games: u64,
    pub non_button_wins: u64,
    pub best_hand_rank: u8,
}

impl StrategyRecord {
    pub fn net_energy(&self) -> f64 {
        self.total_energy_won - self.total_energy_lost - self.total_house_cuts
    }

    pub fn win_rate(&self) -> f32 {
        if self.total_games == 0 {
            0.0
        } else {
            self.total_wins as f32 / self.total_games as f32
        }
    }

    pub fn showdown_rate(&self) -> f32 {
        if self.total_games == 0 {
            0.0
        } else {
            self.showdown_count as f32 / self.total_games as f32
        }
    }

    /// Voluntarily Put money In Pot: fraction of hands not folded preflop.
    pub fn vpip(&self) -> f32 {
        if self.total_games == 0 {
            0.0
        } else {
            (self.total_games - self.preflop_folds) as f32 / self.total_games as f32
        }
    }

    /// Raises per call; `0.0` with no calls recorded yet rather than
    /// dividing by zero.
    pub fn aggression_factor(&self) -> f32 {
        if self.total_calls == 0 {
            0.0
        } else {
            self.total_raises as f32 / self.total_calls as f32
        }
    }

    pub fn button_win_rate(&self) -> f32 {
        if self.button_games == 0 {
            0.0
        } else {
            self.button_wins as f32 / self.button_games as f32
        }
    }

    pub fn non_button_win_rate(&self) -> f32 {
        if self.non_button_games == 0 {
            0.0
        } else {
            self.non_button_wins as f32 / self.non_button_games as f32
        }
    }

    pub fn positional_advantage(&self) -> f32 {
        self.button_win_rate() - self.non_button_win_rate()
    }
}

#[derive(Clone, Debug, Default)]
pub struct FishPokerRecord {
    pub fish_id: EntityId,
    pub games: u64,
    pub wins: u64,
    pub net_energy: f64,
    pub best_hand_rank: u8,
}

#[derive(Clone, Debug, Default)]
pub struct PokerStatsTracker {
    by_strategy: BTreeMap<PokerStrategyKind, StrategyRecord>,
    by_fish: BTreeMap<EntityId, FishPokerRecord>,
}

#[derive(Clone, Copy, Debug)]
pub enum HandOutcome {
    Won { at_showdown: bool },
    Lost,
    Tied,
}

impl PokerStatsTracker {
    #[allow(clippy::too_many_arguments)]
    pub fn record_result(
        &mut self,
        fish_id: EntityId,
        strategy: PokerStrategyKind,
        outcome: HandOutcome,
        energy_delta: f64,
        house_cut: f64,
        hand_rank: u8,
        folded_preflop: bool,
        raises: u64,
        calls: u64,
        on_button: bool,
    ) {
        let s = self.by_strategy.entry(strategy).or_default();
        s.total_games += 1;
        s.total_raises += raises;
        s.total_calls += calls;
        if folded_preflop {
            s.preflop_folds += 1;
            s.folds += 1;
        }
        if on_button {
            s.button_games += 1;
        } else {
            s.non_button_games += 1;
        }
        match outcome {
            HandOutcome::Won { at_showdown } => {
                s.total_wins += 1;
                s.total_energy_won += energy_delta.max(0.0);
                if at_showdown {
                    s.showdown_count += 1;
                    s.won_at_showdown += 1;
                } else {
                    s.won_by_fold += 1;
                }
                if on_button {
                    s.button_wins += 1;
                } else {
                    s.non_button_wins += 1;
                }
            }
            HandOutcome::Lost => {
                s.total_losses += 1;
                s.total_energy_lost += (-energy_delta).max(0.0);
            }
            HandOutcome::Tied => {
                s.total_ties += 1;
            }
        }
        s.total_house_cuts += house_cut;
        s.best_hand_rank = s.best_hand_rank.max(hand_rank);

        let f = self.by_fish.entry(fish_id).or_insert_with(|| FishPokerRecord {
            fish_id,
            ..Default::default()
        });
        f.games += 1;
        f.net_energy += energy_delta - house_cut;
        f.best_hand_rank = f.best_hand_rank.max(hand_rank);
        if matches!(outcome, HandOutcome::Won { .. }) {
            f.wins += 1;
        }
    }

    pub fn by_strategy(&self) -> &BTreeMap<PokerStrategyKind, StrategyRecord> {
        &self.by_strategy
    }

    pub fn by_fish(&self) -> &BTreeMap<EntityId, FishPokerRecord> {
        &self.by_fish
    }

    /// Highest-`net_energy`-first fish leaderboard, ties broken by ID
    /// for determinism.
    pub fn leaderboard(&self, top_n: usize) -> Vec<&FishPokerRecord> {
        let mut records: Vec<&FishPokerRecord> = self.by_fish.values().collect();
        records.sort_by(|a, b| {
            b.net_energy
                .partial_cmp(&a.net_energy)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.fish_id.cmp(&b.fish_id))
        });
        records.truncate(top_n);
        records
    }

    /// Drops per-fish records for fish no longer alive, mirroring the
    /// source manager's `cleanup_dead_fish`.
    pub fn cleanup_dead_fish(&mut self, alive: &[EntityId]) {
        let alive: std::collections::BTreeSet<_> = alive.iter().copied().collect();
        self.by_fish.retain(|id, _| alive.contains(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_rate_and_vpip_compute_correctly() {
        let mut tracker = PokerStatsTracker::default();
        tracker.record_result(
            1,
            PokerStrategyKind::TightAggressive,
            HandOutcome::Won { at_showdown: true },
            20.0,
            1.0,
            5,
            false,
            2,
            1,
            true,
        );
        tracker.record_result(
            1,
            PokerStrategyKind::TightAggressive,
            HandOutcome::Lost,
            -10.0,
            0.5,
            2,
            true,
            0,
            1,
            false,
        );
        let s = &tracker.by_strategy()[&PokerStrategyKind::TightAggressive];
        assert_eq!(s.total_games, 2);
        assert!((s.win_rate() - 0.5).abs() < 1e-6);
        assert!((s.vpip() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn leaderboard_sorts_by_net_energy_descending() {
        let mut tracker = PokerStatsTracker::default();
        tracker.record_result(
            1,
            PokerStrategyKind::Balanced,
            HandOutcome::Won { at_showdown: true },
            10.0,
            0.0,
            3,
            false,
            1,
            1,
            false,
        );
        tracker.record_result(
            2,
            PokerStrategyKind::Balanced,
            HandOutcome::Won { at_showdown: true },
            50.0,
            0.0,
            3,
            false,
            1,
            1,
            false,
        );
        let board = tracker.leaderboard(2);
        assert_eq!(board[0].fish_id, 2);
        assert_eq!(board[1].fish_id, 1);
    }
}
