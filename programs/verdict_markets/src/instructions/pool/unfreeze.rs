//! Forced / Auto Unfreeze
//!
//! Bounds validator capital lock-up on abandoned pools. Once a pool is
//! processed (or canceled), an authorized operator may release a freeze
//! immediately; anyone may do it after the auto-unfreeze delay has elapsed
//! with the reward still unclaimed. Releasing a freeze this way pays no
//! rewards; the validator can still claim later.

use anchor_lang::prelude::*;

use crate::instructions::admin::require_authorized;
use crate::instructions::pool::claim_reward::ValidatorUnfrozen;
use crate::state::{AuthorizedAddress, Config, Pool, StakeAccount, VoteRecord};

#[derive(Accounts)]
#[instruction(validator: Pubkey)]
pub struct ForceUnfreeze<'info> {
    pub caller: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(
        seeds = [AuthorizedAddress::SEED, caller.key().as_ref()],
        bump = delegate.bump,
    )]
    pub delegate: Option<Account<'info, AuthorizedAddress>>,

    #[account(
        mut,
        seeds = [Pool::SEED, pool.pool_id.to_le_bytes().as_ref()],
        bump = pool.bump,
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        mut,
        seeds = [StakeAccount::SEED, validator.as_ref()],
        bump = stake.bump,
    )]
    pub stake: Account<'info, StakeAccount>,

    #[account(
        mut,
        seeds = [VoteRecord::SEED, pool.pool_id.to_le_bytes().as_ref(), validator.as_ref()],
        bump = vote_record.bump,
    )]
    pub vote_record: Account<'info, VoteRecord>,
}

impl<'info> ForceUnfreeze<'info> {
    pub fn force_unfreeze(&mut self, validator: Pubkey) -> Result<()> {
        require!(self.vote_record.frozen, UnfreezeError::NotFrozen);

        // A canceled pool never processes; its release window anchors at the
        // dispute end instead.
        let anchor = if self.pool.canceled {
            self.pool.dispute_end
        } else {
            require!(self.pool.processed, UnfreezeError::NotYetProcessed);
            self.pool.processed_time
        };

        let operator = require_authorized(&self.config, &self.caller.key(), &self.delegate).is_ok();
        if !operator {
            let now = Clock::get()?.unix_timestamp;
            let release_at = anchor
                .checked_add(self.config.market.auto_unfreeze_delay)
                .ok_or(UnfreezeError::Overflow)?;
            require!(now > release_at, UnfreezeError::DelayNotElapsed);
            require!(
                !self.vote_record.reward_claimed,
                UnfreezeError::AlreadyClaimed
            );
        }

        self.vote_record.frozen = false;
        self.stake.unfreeze();
        self.pool.frozen_validators = self.pool.frozen_validators.saturating_sub(1);

        emit!(ValidatorUnfrozen {
            pool_id: self.pool.pool_id,
            validator,
            forced: true,
        });

        Ok(())
    }
}

#[error_code]
pub enum UnfreezeError {
    #[msg("Validator is not frozen for this pool")]
    NotFrozen,
    #[msg("Pool is not yet processed")]
    NotYetProcessed,
    #[msg("Auto-unfreeze delay has not elapsed")]
    DelayNotElapsed,
    #[msg("Reward already claimed; freeze was released with it")]
    AlreadyClaimed,
    #[msg("Timestamp arithmetic overflow")]
    Overflow,
}
