//! Global Protocol Configuration
//!
//! A singleton PDA holding the protocol constants both engines read:
//! phase durations, vote caps, and the reward/penalty and fee schedule.
//! Mutated only through the admin instructions; every update re-validates
//! the full parameter set so a corrupt config can never reach a pool.

use anchor_lang::prelude::*;

use crate::constants::{BPS_DENOMINATOR, SEED_CONFIG};

/// The bonding-protocol constant block, replaced atomically by `update_config`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug)]
pub struct BondingParams {
    /// Length of the evaluation window, seconds.
    pub evaluation_duration: i64,
    /// Gap between evaluation end and option voting start, seconds.
    pub option_voting_gap: i64,
    /// Length of the option-voting window, seconds.
    pub option_voting_duration: i64,
    /// Length of the dispute window, seconds.
    pub dispute_duration: i64,
    /// Minimum approve votes for an evaluation to pass.
    pub min_votes_required: u32,
    /// Starting per-option vote ceiling.
    pub initial_per_option_cap: u32,
    /// Lead over the runner-up that triggers a cap raise.
    pub max_vote_difference: u32,
    /// Fee charged to the creator on pool creation (collateral units).
    pub pool_creation_fee: u64,
    /// Stake credited to the creator of an approved pool.
    pub good_pool_reward: u64,
    /// Stake debited from the creator of a rejected pool.
    pub bad_pool_penalty: u64,
    /// Stake credited for an evaluation vote matching the verdict.
    pub true_eval_reward: u64,
    /// Stake debited for an evaluation vote against the verdict.
    pub false_eval_penalty: u64,
    /// Stake credited for a dispute vote matching the verdict.
    pub true_dispute_reward: u64,
    /// Stake debited for a dispute vote against the verdict.
    pub false_dispute_penalty: u64,
}

impl BondingParams {
    /// A config that could corrupt a pool's timeline or cap machinery is
    /// rejected here, never discovered mid-lifecycle.
    pub fn validate(&self) -> bool {
        self.evaluation_duration > 0
            && self.option_voting_gap >= 0
            && self.option_voting_duration > 0
            && self.dispute_duration > 0
            && self.min_votes_required > 0
            && self.initial_per_option_cap > 0
    }
}

/// Market-engine parameters, updated separately from the bonding block.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug)]
pub struct MarketParams {
    /// Fee on early-exit value, basis points.
    pub early_exit_fee_bps: u64,
    /// Fee on winning payouts, basis points. Never applied to principal reclaims.
    pub platform_fee_bps: u64,
    /// Per-option liquidity seeded from the protocol when bootstrap is enabled.
    pub default_option_liquidity: u64,
    /// Whether new option groups start with default liquidity.
    pub bootstrap_liquidity: bool,
    /// Seconds after processing before anyone may release a stuck freeze.
    pub auto_unfreeze_delay: i64,
}

impl MarketParams {
    pub fn validate(&self) -> bool {
        self.early_exit_fee_bps <= BPS_DENOMINATOR
            && self.platform_fee_bps <= BPS_DENOMINATOR
            && self.auto_unfreeze_delay >= 0
    }
}

/// Global configuration account (singleton PDA)
///
/// Seeds: ["config"]
#[account]
#[derive(InitSpace)]
pub struct Config {
    /// Protocol administrator.
    pub admin: Pubkey,

    /// Collects pool-creation fees and platform fees.
    pub treasury: Pubkey,

    /// Collateral token mint (the external Ledger asset).
    pub collateral_mint: Pubkey,

    /// Bonding-protocol constants.
    pub bonding: BondingParams,

    /// Market-engine constants.
    pub market: MarketParams,

    /// Monotone version stamp, bumped on every config change.
    pub version: u64,

    /// Circuit breaker for state-changing user operations.
    pub paused: bool,

    /// PDA bump seed.
    pub bump: u8,
}

impl Config {
    pub const SEED: &'static [u8] = SEED_CONFIG;
}

/// Per-address authorization flag for privileged operations
/// (forced unfreeze, delegated config updates, stake-role writes).
///
/// Seeds: ["authorized", address]
#[account]
#[derive(InitSpace)]
pub struct AuthorizedAddress {
    pub address: Pubkey,
    pub authorized: bool,
    pub bump: u8,
}

impl AuthorizedAddress {
    pub const SEED: &'static [u8] = crate::constants::SEED_AUTHORIZED;
}
