//! # Verdict Markets
//!
//! Stake-weighted outcome resolution with an embedded AMM.
//!
//! ## Overview
//!
//! Real-world questions are settled by a bonded, multi-phase voting protocol:
//! staked validators approve a pool, vote among its options, and may dispute
//! either result before processing freezes an immutable verdict. Alongside
//! it, a liquidity-weighted odds engine lets users take positions on the
//! outcome before it is known and exit early at fair value; positions settle
//! against the same verdict the voting protocol produced.
//!
//! ## How it works
//! - `BondingEngine` (pool instructions): evaluation -> option voting ->
//!   dispute -> verdict, with stake freezing and reward/penalty accounting.
//! - `MarketEngine` (market instructions): liquidity books, locked-odds
//!   bets, early exit, verdict-gated payouts.

use anchor_lang::prelude::*;

pub mod amm;
pub mod bonding;
pub mod constants;
pub mod instructions;
pub mod state;

pub use instructions::*;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

use crate::instructions::market::views::EarlyExitDetails;
use crate::state::{BondingParams, MarketParams, PoolPhase};

#[program]
pub mod verdict_markets {
    use super::*;

    // --- ADMIN & CONFIG ---

    pub fn initialize(
        ctx: Context<Initialize>,
        bonding: BondingParams,
        market: MarketParams,
    ) -> Result<()> {
        ctx.accounts.initialize(bonding, market, ctx.bumps)
    }

    /// Atomically replace the bonding-protocol constant block.
    pub fn update_config(ctx: Context<UpdateConfig>, bonding: BondingParams) -> Result<()> {
        ctx.accounts.update_config(bonding)
    }

    pub fn update_market_params(ctx: Context<UpdateConfig>, market: MarketParams) -> Result<()> {
        ctx.accounts.update_market_params(market)
    }

    pub fn update_authorized_address(
        ctx: Context<UpdateAuthorizedAddress>,
        address: Pubkey,
        status: bool,
    ) -> Result<()> {
        ctx.accounts
            .update_authorized_address(address, status, ctx.bumps)
    }

    pub fn transfer_admin(ctx: Context<AdminOnly>, new_admin: Pubkey) -> Result<()> {
        ctx.accounts.transfer_admin(new_admin)
    }

    pub fn set_pause(ctx: Context<AdminOnly>, paused: bool) -> Result<()> {
        ctx.accounts.set_pause(paused)
    }

    /// Stake-registry write surface: roles and staked amount for an address.
    pub fn set_stake_role(
        ctx: Context<SetStakeRole>,
        owner: Pubkey,
        amount: u64,
        is_validator: bool,
        is_pool_creator: bool,
        is_evaluator: bool,
    ) -> Result<()> {
        ctx.accounts.set_stake_role(
            owner,
            amount,
            is_validator,
            is_pool_creator,
            is_evaluator,
            ctx.bumps,
        )
    }

    pub fn cancel_pool(ctx: Context<CancelPool>) -> Result<()> {
        ctx.accounts.cancel_pool()
    }

    // --- BONDING ENGINE ---

    pub fn create_pool(
        ctx: Context<CreatePool>,
        pool_id: u64,
        title: String,
        data: String,
        start_timeframe: i64,
        settle_timeframe: i64,
    ) -> Result<()> {
        ctx.accounts.create_pool(
            pool_id,
            title,
            data,
            start_timeframe,
            settle_timeframe,
            ctx.bumps,
        )
    }

    pub fn set_options(ctx: Context<SetOptions>, names: Vec<String>) -> Result<()> {
        ctx.accounts.set_options(names)
    }

    pub fn vote_evaluation(ctx: Context<CastVote>, approve: bool) -> Result<()> {
        ctx.accounts.vote_evaluation(approve, ctx.bumps)
    }

    pub fn complete_evaluation(ctx: Context<CompleteEvaluation>) -> Result<()> {
        ctx.accounts.complete_evaluation()
    }

    pub fn vote_option(ctx: Context<CastVote>, option_index: u32) -> Result<()> {
        ctx.accounts.vote_option(option_index, ctx.bumps)
    }

    pub fn vote_dispute(
        ctx: Context<CastVote>,
        is_evaluation_dispute: bool,
        vote_value: u32,
    ) -> Result<()> {
        ctx.accounts
            .vote_dispute(is_evaluation_dispute, vote_value, ctx.bumps)
    }

    pub fn process_pool(ctx: Context<ProcessPool>) -> Result<()> {
        ctx.accounts.process_pool()
    }

    pub fn claim_reward(ctx: Context<ClaimReward>) -> Result<()> {
        ctx.accounts.claim_reward()
    }

    pub fn force_unfreeze(ctx: Context<ForceUnfreeze>, validator: Pubkey) -> Result<()> {
        ctx.accounts.force_unfreeze(validator)
    }

    // --- MARKET ENGINE ---

    pub fn add_liquidity(ctx: Context<AddLiquidity>, amount: u64) -> Result<()> {
        ctx.accounts.add_liquidity(amount)
    }

    pub fn place_bet(
        ctx: Context<PlaceBet>,
        option_index: u32,
        amount: u64,
        min_odds: u64,
    ) -> Result<()> {
        ctx.accounts
            .place_bet(option_index, amount, min_odds, ctx.bumps)
    }

    pub fn early_exit(ctx: Context<EarlyExit>) -> Result<()> {
        ctx.accounts.early_exit()
    }

    pub fn claim_payout(ctx: Context<ClaimPayout>) -> Result<()> {
        ctx.accounts.claim_payout()
    }

    // --- READ VIEWS ---

    pub fn get_odds(ctx: Context<ViewGroup>, option_index: u32) -> Result<u64> {
        ctx.accounts.get_odds(option_index)
    }

    pub fn calculate_potential_return(
        ctx: Context<ViewGroup>,
        option_index: u32,
        amount: u64,
    ) -> Result<u64> {
        ctx.accounts.calculate_potential_return(option_index, amount)
    }

    pub fn calculate_remaining_liquidity(ctx: Context<ViewGroup>) -> Result<u64> {
        ctx.accounts.calculate_remaining_liquidity()
    }

    pub fn get_pool_phase(ctx: Context<ViewGroup>) -> Result<PoolPhase> {
        ctx.accounts.get_pool_phase()
    }

    pub fn calculate_early_exit_value(ctx: Context<ViewPosition>) -> Result<u64> {
        ctx.accounts.calculate_early_exit_value()
    }

    pub fn get_early_exit_details(ctx: Context<ViewPosition>) -> Result<EarlyExitDetails> {
        ctx.accounts.get_early_exit_details()
    }
}
