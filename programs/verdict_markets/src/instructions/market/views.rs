//! Read Views
//!
//! Side-effect-free, value-returning instructions for the quantities that
//! are computed rather than stored: odds quotes, payout projections, the
//! early-exit valuation, and remaining liquidity. Stored state (pool
//! timelines, tallies, per-user votes, claim flags) is read straight off
//! the accounts and needs no instruction.

use anchor_lang::prelude::*;

use crate::amm::{apply_fee, early_exit_value, potential_return, quote_odds};
use crate::state::{Config, OptionGroup, Pool, PoolPhase, Position};

/// Everything a client needs to preview an early exit.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug)]
pub struct EarlyExitDetails {
    pub amount: u64,
    pub locked_odds: u64,
    pub option_liquidity: u64,
    pub total_liquidity: u64,
    pub pre_fee_value: u64,
    pub fee: u64,
    pub net_value: u64,
}

#[derive(Accounts)]
pub struct ViewGroup<'info> {
    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(
        seeds = [Pool::SEED, pool.pool_id.to_le_bytes().as_ref()],
        bump = pool.bump,
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        seeds = [OptionGroup::SEED, pool.pool_id.to_le_bytes().as_ref()],
        bump = group.bump,
    )]
    pub group: Account<'info, OptionGroup>,
}

impl<'info> ViewGroup<'info> {
    pub fn get_odds(&self, option_index: u32) -> Result<u64> {
        quote_odds(&self.group.liquidity, option_index)
    }

    pub fn calculate_potential_return(&self, option_index: u32, amount: u64) -> Result<u64> {
        let odds = quote_odds(&self.group.liquidity, option_index)?;
        potential_return(amount, odds)
    }

    /// Sum of per-option liquidity; payouts and exits have already been
    /// deducted from the vector, so no further netting applies.
    pub fn calculate_remaining_liquidity(&self) -> Result<u64> {
        Ok(self.group.total_liquidity())
    }

    pub fn get_pool_phase(&self) -> Result<PoolPhase> {
        let now = Clock::get()?.unix_timestamp;
        Ok(self.pool.phase_at(now))
    }
}

#[derive(Accounts)]
pub struct ViewPosition<'info> {
    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(
        seeds = [Pool::SEED, pool.pool_id.to_le_bytes().as_ref()],
        bump = pool.bump,
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        seeds = [OptionGroup::SEED, pool.pool_id.to_le_bytes().as_ref()],
        bump = group.bump,
    )]
    pub group: Account<'info, OptionGroup>,

    #[account(
        seeds = [
            Position::SEED,
            pool.pool_id.to_le_bytes().as_ref(),
            position.bettor.as_ref(),
            position.option_index.to_le_bytes().as_ref(),
        ],
        bump = position.bump,
    )]
    pub position: Account<'info, Position>,
}

impl<'info> ViewPosition<'info> {
    pub fn calculate_early_exit_value(&self) -> Result<u64> {
        Ok(self.early_exit_details()?.net_value)
    }

    pub fn get_early_exit_details(&self) -> Result<EarlyExitDetails> {
        self.early_exit_details()
    }

    fn early_exit_details(&self) -> Result<EarlyExitDetails> {
        let i = self.position.option_index as usize;
        let option_liquidity = self.group.liquidity.get(i).copied().unwrap_or(0);
        let total_liquidity = self.group.total_liquidity();

        let pre_fee_value = early_exit_value(
            self.position.amount,
            self.position.locked_odds,
            option_liquidity,
            total_liquidity,
        )?;
        let (net_value, fee) = apply_fee(pre_fee_value, self.config.market.early_exit_fee_bps)?;

        Ok(EarlyExitDetails {
            amount: self.position.amount,
            locked_odds: self.position.locked_odds,
            option_liquidity,
            total_liquidity,
            pre_fee_value,
            fee,
            net_value,
        })
    }
}
