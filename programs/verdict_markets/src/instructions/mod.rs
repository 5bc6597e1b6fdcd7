//! Instruction handlers
//!
//! - `initialize` - set up the protocol config (admin, once)
//! - `admin` - config updates, delegation, pause, stake registry, cancellation
//! - `pool` - the bonding engine: create, options, vote, complete, process, claim
//! - `market` - the AMM: liquidity, bets, early exit, payout claims, views

pub mod admin;
pub mod initialize;
pub mod market;
pub mod pool;

pub use admin::*;
pub use initialize::*;
pub use market::*;
pub use pool::*;
