//! Deterministic, fixed-step simulation core for an artificial-life fish tank.
//!
//! `World` is the only entry point external callers need: `World::reset`,
//! `World::step`, `World::snapshot`, `World::metrics`. Everything else in
//! this crate is implementation detail reachable through that surface.
//! Rendering, networking, persistence, and CLI concerns live outside this
//! crate entirely.

pub mod behavior;
pub mod config;
pub mod ecosystem;
pub mod entity;
pub mod error;
pub mod events;
pub mod genome;
pub mod poker;
pub mod rng;
pub mod spatial;
pub mod spawners;
pub mod world;

pub use config::{TankConfig, TankConfigError};
pub use error::{InvariantViolation, TransientWarning};
pub use world::{Command, CommandError, DeltaSnapshot, Snapshot, StepResult, World, WorldInitError};
