//! # Bonding engine logic
//!
//! The pure half of the evaluation/voting/dispute state machine: timeline
//! derivation, tally and cap machinery, and verdict computation. Instruction
//! handlers own the accounts and the clock; everything here is deterministic
//! and unit-tested in isolation.

pub mod schedule;
pub mod tally;

pub use schedule::*;
pub use tally::*;
