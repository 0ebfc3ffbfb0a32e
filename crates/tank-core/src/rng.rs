//! Seeded randomness. Every stochastic decision in this crate must be
//! drawn from a stream that ultimately descends from `World`'s reset
//! seed; nothing in `world`, `behavior`, `poker`, `ecosystem`, or
//! `spawners` may call `rand::thread_rng` or read the wall clock.
//!
//! `World` owns one [`ChaCha12Rng`] and hands out child streams to
//! subsystems that need their own independent sequence (mutation,
//! poker dealing, spawners) so that adding or removing draws in one
//! subsystem does not perturb another's sequence.

use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

/// Splits a single seed into independent, deterministic child streams.
/// Each child is seeded by hashing the parent seed with a fixed,
/// subsystem-specific domain tag so the same root seed always produces
/// the same set of child streams regardless of call order.
pub struct RngStreams {
    root_seed: u64,
}

impl RngStreams {
    pub fn new(root_seed: u64) -> Self {
        Self { root_seed }
    }

    pub fn stream_for(&self, domain: RngDomain) -> ChaCha12Rng {
        ChaCha12Rng::seed_from_u64(self.root_seed ^ domain.tag())
    }
}

/// Fixed domain-separation tags. Adding a new domain must append a new
/// tag rather than renumbering existing ones, or saved seeds stop
/// reproducing their original runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RngDomain {
    Behavior,
    Mutation,
    Poker,
    Spawner,
    Lifecycle,
}

impl RngDomain {
    fn tag(self) -> u64 {
        match self {
            RngDomain::Behavior => 0x5EED_0001,
            RngDomain::Mutation => 0x5EED_0002,
            RngDomain::Poker => 0x5EED_0003,
            RngDomain::Spawner => 0x5EED_0004,
            RngDomain::Lifecycle => 0x5EED_0005,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn same_seed_same_domain_reproduces() {
        let a = RngStreams::new(42).stream_for(RngDomain::Behavior).random::<u32>();
        let b = RngStreams::new(42).stream_for(RngDomain::Behavior).random::<u32>();
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_domains_diverge() {
        let streams = RngStreams::new(42);
        let a = streams.stream_for(RngDomain::Behavior).random::<u32>();
        let b = streams.stream_for(RngDomain::Poker).random::<u32>();
        assert_ne!(a, b);
    }
}
