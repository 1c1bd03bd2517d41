//! arena-core: fighter snapshots and the duel simulator.
//!
//! Everything in this crate is pure: no I/O, no clocks, no global state.
//! Randomness is always supplied by the caller, so a fixed seed gives a
//! fixed fight.
//!
//! # Public API
//!
//! - [`Fighter`] -- attribute snapshot for one combatant
//! - [`simulate()`] -- run one duel to completion
//! - [`BattleOutcome`] / [`Decision`] -- the result of a duel

pub mod fighter;
pub mod outcome;
pub mod simulate;

pub use fighter::{Fighter, FighterError};
pub use outcome::{BattleOutcome, Decision};
pub use simulate::{simulate, MAX_TURNS};
