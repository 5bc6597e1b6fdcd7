//! Market engine state
//!
//! Each pool is paired with one option group carrying a per-option liquidity
//! vector; positions record the odds locked at bet time so later liquidity
//! shifts never change what a bettor was promised.

use anchor_lang::prelude::*;

use crate::constants::{MAX_OPTIONS, SEED_GROUP, SEED_POSITION};

/// Liquidity book for one pool's options.
///
/// Seeds: ["group", pool_id.to_le_bytes()]
#[account]
#[derive(InitSpace)]
pub struct OptionGroup {
    pub pool_id: u64,

    /// Backing liquidity per option. Sized when the pool's options are set.
    #[max_len(MAX_OPTIONS)]
    pub liquidity: Vec<u64>,

    /// Cumulative bet volume per option.
    #[max_len(MAX_OPTIONS)]
    pub total_volume: Vec<u64>,

    /// Whether the book was seeded (default liquidity or first bet).
    pub bootstrapped: bool,

    /// Collateral already paid out or withdrawn from the vault.
    pub paid_out: u64,

    /// Per-group settlement guard: held across any operation that moves
    /// value out of the vault, released on every exit path.
    pub settling: bool,

    pub bump: u8,
}

impl OptionGroup {
    pub const SEED: &'static [u8] = SEED_GROUP;

    pub fn total_liquidity(&self) -> u64 {
        self.liquidity.iter().copied().sum()
    }
}

/// A bettor's stake on one option of one group.
///
/// Seeds: ["position", pool_id.to_le_bytes(), bettor, option_index.to_le_bytes()]
#[account]
#[derive(InitSpace)]
pub struct Position {
    pub pool_id: u64,
    pub bettor: Pubkey,
    pub option_index: u32,

    /// Outstanding stake; reduced to zero by early exit or settlement.
    pub amount: u64,

    /// Odds locked at bet time (volume-weighted across repeat bets),
    /// in `ODDS_PRECISION` fixed point.
    pub locked_odds: u64,

    /// Write-once settlement flag.
    pub settled: bool,

    pub bump: u8,
}

impl Position {
    pub const SEED: &'static [u8] = SEED_POSITION;
}
