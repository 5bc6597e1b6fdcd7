//! Pool Processing
//!
//! Callable by anyone once the dispute window closes. Folds every tally into
//! the immutable verdict, stamps the processing time, and settles the
//! creator: stake reward for an approved pool, stake penalty for a rejected
//! one. Frozen stakes release lazily per validator afterwards (claim, forced
//! unfreeze, or the auto-unfreeze window) — there is no scheduler to sweep
//! them here.

use anchor_lang::prelude::*;

use crate::bonding::{compute_verdict, evaluate_approval, VerdictInput};
use crate::state::{Config, Pool, StakeAccount};

#[event]
pub struct PoolProcessed {
    pub pool_id: u64,
    pub final_approval: bool,
    pub winning_option: u32,
    pub dispute_round: u8,
    pub processed_time: i64,
}

#[event]
pub struct CreatorSettled {
    pub pool_id: u64,
    pub creator: Pubkey,
    pub reward: u64,
    pub penalty: u64,
}

#[derive(Accounts)]
pub struct ProcessPool<'info> {
    pub caller: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [Pool::SEED, pool.pool_id.to_le_bytes().as_ref()],
        bump = pool.bump,
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        mut,
        seeds = [StakeAccount::SEED, pool.creator.as_ref()],
        bump = creator_stake.bump,
    )]
    pub creator_stake: Account<'info, StakeAccount>,
}

impl<'info> ProcessPool<'info> {
    pub fn process_pool(&mut self) -> Result<()> {
        require!(!self.pool.canceled, ProcessPoolError::PoolCanceled);
        require!(!self.pool.processed, ProcessPoolError::AlreadyProcessed);

        let now = Clock::get()?.unix_timestamp;
        require!(
            now > self.pool.dispute_end,
            ProcessPoolError::DisputeWindowOpen
        );

        // Evaluation completion is lazy; a pool nobody closed resolves here,
        // with insufficient participation defaulting to rejection.
        if !self.pool.evaluation_complete {
            self.pool.evaluation_complete = true;
            self.pool.approved = evaluate_approval(
                self.pool.approve_votes,
                self.pool.reject_votes,
                self.config.bonding.min_votes_required,
            );
        }

        let verdict = compute_verdict(VerdictInput {
            approved: self.pool.approved,
            approve_votes: self.pool.approve_votes,
            reject_votes: self.pool.reject_votes,
            option_vote_counts: &self.pool.option_vote_counts,
            dispute_approve_votes: self.pool.dispute_approve_votes,
            dispute_reject_votes: self.pool.dispute_reject_votes,
            dispute_option_counts: &self.pool.dispute_option_counts,
        });

        self.pool.processed = true;
        self.pool.processed_time = now;
        self.pool.final_approval = verdict.final_approval;
        self.pool.winning_option = verdict.winning_option;
        self.pool.dispute_round = verdict.dispute_round;

        // Creator settlement against the stake ledger.
        let (reward, penalty) = if verdict.final_approval {
            let reward = self.config.bonding.good_pool_reward;
            self.creator_stake.reward(reward);
            (reward, 0)
        } else {
            let penalty = self
                .creator_stake
                .penalize(self.config.bonding.bad_pool_penalty);
            (0, penalty)
        };

        emit!(PoolProcessed {
            pool_id: self.pool.pool_id,
            final_approval: verdict.final_approval,
            winning_option: verdict.winning_option,
            dispute_round: verdict.dispute_round,
            processed_time: now,
        });
        emit!(CreatorSettled {
            pool_id: self.pool.pool_id,
            creator: self.pool.creator,
            reward,
            penalty,
        });

        Ok(())
    }
}

#[error_code]
pub enum ProcessPoolError {
    #[msg("Pool is canceled")]
    PoolCanceled,
    #[msg("Pool is already processed")]
    AlreadyProcessed,
    #[msg("Dispute window is still open")]
    DisputeWindowOpen,
}
