//! Multi-party hand resolution: deck, streets, per-street betting driven
//! by strategy objects, showdown, and pot distribution. One call to
//! [`play_hand`] resolves a complete hand in the frame it was triggered,
//! since fish never suspend mid-step.

use rand::Rng;

use crate::entity::EntityId;
use crate::poker::cards::Deck;
use crate::poker::hand_eval::{best_hand, HandStrength};
use crate::poker::strategy::{PokerAction, PokerStrategyId};

pub const MAX_COMMUNITY_CARDS: usize = 5;

#[derive(Clone, Debug)]
pub struct HandParticipant {
    pub id: EntityId,
    pub energy: f32,
    pub strategy: PokerStrategyId,
    pub on_button: bool,
    pub is_plant: bool,
}

/// One delta reported to the ecosystem tracker's energy ledger, tagged
/// by source category (`poker_fish`, `poker_plant`, `poker_house_cut`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnergyDelta {
    pub id: EntityId,
    pub delta: f32,
    pub is_plant: bool,
}

#[derive(Clone, Debug)]
pub struct HandResult {
    pub deltas: Vec<EnergyDelta>,
    pub house_cut: f32,
    pub winners: Vec<EntityId>,
    pub showdown_occurred: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Street {
    fn community_count(self) -> usize {
        match self {
            Street::Preflop => 0,
            Street::Flop => 3,
            Street::Turn => 4,
            Street::River => 5,
        }
    }

    fn next(self) -> Option<Street> {
        match self {
            Street::Preflop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => None,
        }
    }
}

struct LivePlayer {
    id: EntityId,
    energy: f32,
    strategy: PokerStrategyId,
    on_button: bool,
    is_plant: bool,
    hole: [crate::poker::cards::Card; 2],
    folded: bool,
    committed_this_hand: f32,
    committed_this_street: f32,
}

/// Plays one complete hand to resolution. `ante` is deducted from every
/// participant up front; `house_cut_fraction` is skimmed from the pot
/// before winners are paid. Ties split the remainder evenly, with any
/// leftover cent going to the earliest-button-order winner (mirroring a
/// showdown's `chips % n` bonus split).
pub fn play_hand<R: Rng + ?Sized>(
    participants: &[HandParticipant],
    ante: f32,
    house_cut_fraction: f32,
    rng: &mut R,
) -> HandResult {
    assert!(participants.len() >= 2, "a hand needs at least two players");
    assert!(
        participants.iter().any(|p| !p.is_plant),
        "plant/fish mixed games require at least one fish participant"
    );

    let mut deck = Deck::shuffled(rng);
    let mut players: Vec<LivePlayer> = participants
        .iter()
        .map(|p| LivePlayer {
            id: p.id,
            energy: p.energy,
            strategy: p.strategy,
            on_button: p.on_button,
            is_plant: p.is_plant,
            hole: [
                deck.deal().expect("deck has enough cards for hole pairs"),
                deck.deal().expect("deck has enough cards for hole pairs"),
            ],
            folded: false,
            committed_this_hand: 0.0,
            committed_this_street: 0.0,
        })
        .collect();

    let mut pot = 0.0f32;
    for player in &mut players {
        let paid = ante.min(player.energy);
        player.energy -= paid;
        player.committed_this_hand += paid;
        pot += paid;
    }

    let mut community = Vec::with_capacity(MAX_COMMUNITY_CARDS);
    let mut street = Street::Preflop;
    loop {
        while community.len() < street.community_count() {
            community.push(deck.deal().expect("deck has enough cards for the board"));
        }

        run_betting_round(&mut players, &mut pot, &community, rng);

        let live = players.iter().filter(|p| !p.folded).count();
        if live <= 1 {
            break;
        }
        match street.next() {
            Some(next) => street = next,
            None => break,
        }
    }

    let live_ids: Vec<EntityId> = players.iter().filter(|p| !p.folded).map(|p| p.id).collect();
    let house_cut = pot * house_cut_fraction;
    let remaining_pot = pot - house_cut;

    let (winners, showdown_occurred) = if live_ids.len() == 1 {
        (live_ids, false)
    } else {
        let strengths: Vec<(EntityId, HandStrength)> = players
            .iter()
            .filter(|p| !p.folded)
            .map(|p| {
                let mut seven: Vec<_> = p.hole.to_vec();
                seven.extend(community.iter().copied());
                (p.id, best_hand(&seven))
            })
            .collect();
        let best = strengths.iter().map(|(_, s)| s).max().cloned().unwrap();
        let winners: Vec<EntityId> = strengths
            .iter()
            .filter(|(_, s)| *s == best)
            .map(|(id, _)| *id)
            .collect();
        (winners, true)
    };

    let mut deltas: Vec<EnergyDelta> = players
        .iter()
        .map(|p| EnergyDelta {
            id: p.id,
            delta: -p.committed_this_hand,
            is_plant: p.is_plant,
        })
        .collect();

    if !winners.is_empty() {
        let share = (remaining_pot / winners.len() as f32 * 100.0).floor() / 100.0;
        let distributed = share * winners.len() as f32;
        let bonus = remaining_pot - distributed;
        for (i, winner_id) in winners.iter().enumerate() {
            let mut payout = share;
            if i == 0 {
                payout += bonus;
            }
            if let Some(entry) = deltas.iter_mut().find(|d| d.id == *winner_id) {
                entry.delta += payout;
            }
        }
    }

    HandResult {
        deltas,
        house_cut,
        winners,
        showdown_occurred,
    }
}

fn run_betting_round<R: Rng + ?Sized>(
    players: &mut [LivePlayer],
    pot: &mut f32,
    community: &[crate::poker::cards::Card],
    rng: &mut R,
) {
    for p in players.iter_mut() {
        p.committed_this_street = 0.0;
    }
    let mut max_bet = 0.0f32;

    let n = players.len();
    for i in 0..n {
        if players[i].folded || players[i].energy <= 0.0 {
            continue;
        }
        let hole = players[i].hole;
        let hand_strength = estimate_strength(&hole, community);
        let energy = players[i].energy;
        let on_button = players[i].on_button;
        let committed = players[i].committed_this_street;
        let strategy = players[i].strategy;

        let (action, amount) =
            strategy.decide_action(hand_strength, committed, max_bet, *pot, energy, on_button, rng);

        match action {
            PokerAction::Fold => players[i].folded = true,
            PokerAction::Check => {}
            PokerAction::Call => {
                let to_call = (max_bet - committed).max(0.0).min(players[i].energy);
                players[i].energy -= to_call;
                players[i].committed_this_street += to_call;
                players[i].committed_this_hand += to_call;
                *pot += to_call;
            }
            PokerAction::Raise => {
                let raise = amount.max(max_bet - committed).min(players[i].energy);
                players[i].energy -= raise;
                players[i].committed_this_street += raise;
                players[i].committed_this_hand += raise;
                *pot += raise;
                max_bet = players[i].committed_this_street.max(max_bet);
            }
        }
    }

    for p in players.iter_mut() {
        if p.folded || p.committed_this_street >= max_bet {
            continue;
        }
        let to_call = (max_bet - p.committed_this_street).min(p.energy);
        p.energy -= to_call;
        p.committed_this_street += to_call;
        p.committed_this_hand += to_call;
        *pot += to_call;
    }
}

/// Preflop, only the two hole cards are known; the strength estimate is
/// a coarse pair/high-card heuristic. Postflop, the real evaluator is
/// used against hole + community.
fn estimate_strength(hole: &[crate::poker::cards::Card; 2], community: &[crate::poker::cards::Card]) -> f32 {
    if community.len() + 2 >= 5 {
        let mut all = hole.to_vec();
        all.extend(community.iter().copied());
        let strength = best_hand(&all);
        return (strength.rank as f32 / 9.0).clamp(0.0, 1.0);
    }
    let is_pair = hole[0].rank == hole[1].rank;
    let high = hole[0].rank.0.max(hole[1].rank.0) as f32;
    let base = high / 14.0;
    if is_pair {
        (base + 0.3).min(1.0)
    } else {
        base * 0.7
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn participant(id: EntityId, strategy_kind: crate::poker::strategy::PokerStrategyKind) -> HandParticipant {
        let mut rng = ChaCha12Rng::seed_from_u64(id);
        HandParticipant {
            id,
            energy: 100.0,
            strategy: PokerStrategyId {
                kind: strategy_kind,
                params: crate::poker::strategy::PokerStrategyParams::random_for(strategy_kind, &mut rng),
            },
            on_button: id == 0,
            is_plant: false,
        }
    }

    #[test]
    fn heads_up_hand_conserves_energy() {
        let mut rng = ChaCha12Rng::seed_from_u64(42);
        let participants = vec![
            participant(1, crate::poker::strategy::PokerStrategyKind::Balanced),
            participant(2, crate::poker::strategy::PokerStrategyKind::Mathematical),
        ];
        let result = play_hand(&participants, 2.0, 0.05, &mut rng);
        let total_delta: f32 = result.deltas.iter().map(|d| d.delta).sum();
        assert!((total_delta + result.house_cut).abs() < 1e-3);
        assert!(!result.winners.is_empty());
    }

    #[test]
    fn folding_opponent_awards_pot_without_showdown() {
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let participants = vec![
            participant(1, crate::poker::strategy::PokerStrategyKind::AlwaysFold),
            participant(2, crate::poker::strategy::PokerStrategyKind::Maniac),
        ];
        let result = play_hand(&participants, 1.0, 0.05, &mut rng);
        assert_eq!(result.winners, vec![2]);
        assert!(!result.showdown_occurred);
    }

    #[test]
    fn deterministic_for_fixed_seed() {
        let participants = vec![
            participant(1, crate::poker::strategy::PokerStrategyKind::TightAggressive),
            participant(2, crate::poker::strategy::PokerStrategyKind::LooseAggressive),
            participant(3, crate::poker::strategy::PokerStrategyKind::Balanced),
        ];
        let mut rng_a = ChaCha12Rng::seed_from_u64(9);
        let mut rng_b = ChaCha12Rng::seed_from_u64(9);
        let a = play_hand(&participants, 2.0, 0.05, &mut rng_a);
        let b = play_hand(&participants, 2.0, 0.05, &mut rng_b);
        assert_eq!(a.winners, b.winners);
        assert_eq!(a.house_cut, b.house_cut);
    }
}
