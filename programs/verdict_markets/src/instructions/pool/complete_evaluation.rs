//! Evaluation Phase Completion
//!
//! Callable by anyone once the evaluation window closes. The result is
//! deterministic from the tallies at that point; a pool nobody voted on
//! completes as rejected rather than hanging on a missing quorum.

use anchor_lang::prelude::*;

use crate::bonding::evaluate_approval;
use crate::state::{Config, Pool};

#[event]
pub struct EvaluationCompleted {
    pub pool_id: u64,
    pub approved: bool,
    pub approve_votes: u32,
    pub reject_votes: u32,
}

#[derive(Accounts)]
pub struct CompleteEvaluation<'info> {
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
}

impl<'info> CompleteEvaluation<'info> {
    pub fn complete_evaluation(&mut self) -> Result<()> {
        require!(!self.pool.canceled, CompleteEvaluationError::PoolCanceled);
        require!(
            !self.pool.evaluation_complete,
            CompleteEvaluationError::AlreadyCompleted
        );

        let now = Clock::get()?.unix_timestamp;
        require!(
            now > self.pool.evaluation_end,
            CompleteEvaluationError::EvaluationWindowOpen
        );

        let approved = evaluate_approval(
            self.pool.approve_votes,
            self.pool.reject_votes,
            self.config.bonding.min_votes_required,
        );

        self.pool.evaluation_complete = true;
        self.pool.approved = approved;

        emit!(EvaluationCompleted {
            pool_id: self.pool.pool_id,
            approved,
            approve_votes: self.pool.approve_votes,
            reject_votes: self.pool.reject_votes,
        });

        Ok(())
    }
}

#[error_code]
pub enum CompleteEvaluationError {
    #[msg("Pool is canceled")]
    PoolCanceled,
    #[msg("Evaluation phase already completed")]
    AlreadyCompleted,
    #[msg("Evaluation window is still open")]
    EvaluationWindowOpen,
}
