//! Stake registry surface
//!
//! The engines never move staked tokens; they read role eligibility and
//! adjust the internal stake ledger through the helpers below. Freezing is
//! counted per pool: a stake is immobile while any pool still holds a freeze
//! on it, and each pool's freeze is released at most once (the per-pool
//! bookkeeping lives on the `VoteRecord`).

use anchor_lang::prelude::*;

use crate::constants::SEED_STAKE;

/// Staked balance and role flags for one address.
///
/// Seeds: ["stake", owner]
#[account]
#[derive(InitSpace)]
pub struct StakeAccount {
    pub owner: Pubkey,

    /// Staked amount on the internal ledger. Rewards credit it, penalties
    /// debit it (saturating at zero).
    pub amount: u64,

    pub is_validator: bool,
    pub is_pool_creator: bool,
    pub is_evaluator: bool,

    /// Number of pools currently freezing this stake.
    pub frozen_pools: u32,

    pub bump: u8,
}

impl StakeAccount {
    pub const SEED: &'static [u8] = SEED_STAKE;

    pub fn is_frozen(&self) -> bool {
        self.frozen_pools > 0
    }

    pub fn freeze(&mut self) {
        self.frozen_pools = self.frozen_pools.saturating_add(1);
    }

    pub fn unfreeze(&mut self) {
        self.frozen_pools = self.frozen_pools.saturating_sub(1);
    }

    pub fn reward(&mut self, amount: u64) {
        self.amount = self.amount.saturating_add(amount);
    }

    /// Returns the amount actually slashed, which may be less than requested
    /// when the remaining stake does not cover the penalty.
    pub fn penalize(&mut self, amount: u64) -> u64 {
        let slashed = self.amount.min(amount);
        self.amount -= slashed;
        slashed
    }
}
