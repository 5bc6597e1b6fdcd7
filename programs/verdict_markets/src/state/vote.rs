//! Per-validator vote record
//!
//! One PDA per (pool, validator), created on the first vote in that pool.
//! The record doubles as the frozen-stake entry and the reward-ledger row,
//! so a claim, a forced unfreeze, and a duplicate-vote check all resolve
//! against the same account. A validator gets at most one evaluation vote,
//! one option vote, and one dispute vote per dispute type.

use anchor_lang::prelude::*;

use crate::constants::SEED_VOTE;

/// Seeds: ["vote", pool_id.to_le_bytes(), validator]
#[account]
#[derive(InitSpace)]
pub struct VoteRecord {
    pub pool_id: u64,
    pub validator: Pubkey,

    pub eval_voted: bool,
    pub eval_approve: bool,

    pub option_voted: bool,
    pub option_index: u32,

    pub dispute_eval_voted: bool,
    pub dispute_eval_approve: bool,

    pub dispute_option_voted: bool,
    pub dispute_option_index: u32,

    /// Whether this pool currently freezes the validator's stake.
    pub frozen: bool,

    /// Write-once claim flag (reward ledger row).
    pub reward_claimed: bool,

    pub bump: u8,
}

impl VoteRecord {
    pub const SEED: &'static [u8] = SEED_VOTE;

    pub fn has_voted(&self) -> bool {
        self.eval_voted || self.option_voted || self.dispute_eval_voted || self.dispute_option_voted
    }
}
