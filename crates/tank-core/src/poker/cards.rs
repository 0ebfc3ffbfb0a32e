//! Minimal card representation: enough for a 52-card deck, shuffling,
//! and hand evaluation. Simpler than a general-purpose poker library's
//! bit-packed representation since this deck never needs to interoperate
//! with an external card format.

use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

pub const SUITS: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

/// 2 through Ace, represented `2..=14` so comparisons are plain integer
/// comparisons (Ace high; ace-low straights are special-cased in
/// `hand_eval`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rank(pub u8);

impl Rank {
    pub const TWO: Rank = Rank(2);
    pub const ACE: Rank = Rank(14);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

#[derive(Clone, Debug)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn fresh() -> Self {
        let mut cards = Vec::with_capacity(52);
        for &suit in &SUITS {
            for r in 2..=14u8 {
                cards.push(Card {
                    rank: Rank(r),
                    suit,
                });
            }
        }
        Self { cards }
    }

    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::fresh();
        deck.cards.shuffle(rng);
        deck
    }

    pub fn deal(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn fresh_deck_has_52_unique_cards() {
        let deck = Deck::fresh();
        assert_eq!(deck.remaining(), 52);
        let mut seen = std::collections::HashSet::new();
        for c in &deck.cards {
            assert!(seen.insert((c.rank, c.suit)));
        }
    }

    #[test]
    fn shuffle_is_deterministic_for_fixed_seed() {
        let mut rng_a = ChaCha12Rng::seed_from_u64(10);
        let mut rng_b = ChaCha12Rng::seed_from_u64(10);
        let mut a = Deck::shuffled(&mut rng_a);
        let mut b = Deck::shuffled(&mut rng_b);
        for _ in 0..52 {
            assert_eq!(a.deal(), b.deal());
        }
    }
}
