//! The poker subsystem: cards, a 5-from-7 evaluator, a strategy catalog,
//! and the betting/showdown engine that resolves a staged multi-party
//! hand. `world::collisions` stages hands; this module only knows how to
//! play one out once given a participant list.

pub mod cards;
pub mod engine;
pub mod hand_eval;
pub mod strategy;

pub use engine::{play_hand, EnergyDelta, HandParticipant, HandResult};
pub use strategy::{PokerAction, PokerStrategyId, PokerStrategyKind};
