//! Voting
//!
//! All three voting operations share one account shape: the validator's
//! stake entry, the pool, and the per-(pool, validator) vote record created
//! on first use. Every vote freezes the validator's stake for this pool,
//! idempotently, and every phase gate is a lazy clock comparison.

use anchor_lang::prelude::*;

use crate::bonding::{evaluate_approval, register_capped_vote};
use crate::state::{Config, Pool, PoolPhase, StakeAccount, VoteRecord};

#[event]
pub struct EvaluationVoteCast {
    pub pool_id: u64,
    pub validator: Pubkey,
    pub approve: bool,
}

#[event]
pub struct OptionVoteCast {
    pub pool_id: u64,
    pub validator: Pubkey,
    pub option_index: u32,
}

#[event]
pub struct DisputeVoteCast {
    pub pool_id: u64,
    pub validator: Pubkey,
    pub is_evaluation_dispute: bool,
    pub vote_value: u32,
}

#[event]
pub struct VoteCapIncreased {
    pub pool_id: u64,
    pub is_dispute: bool,
    pub new_cap: u32,
}

#[event]
pub struct ValidatorFrozen {
    pub pool_id: u64,
    pub validator: Pubkey,
}

#[derive(Accounts)]
pub struct CastVote<'info> {
    #[account(mut)]
    pub validator: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [StakeAccount::SEED, validator.key().as_ref()],
        bump = stake.bump,
        constraint = stake.is_validator @ VoteError::NotValidator,
    )]
    pub stake: Account<'info, StakeAccount>,

    #[account(
        mut,
        seeds = [Pool::SEED, pool.pool_id.to_le_bytes().as_ref()],
        bump = pool.bump,
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        init_if_needed,
        payer = validator,
        space = 8 + VoteRecord::INIT_SPACE,
        seeds = [VoteRecord::SEED, pool.pool_id.to_le_bytes().as_ref(), validator.key().as_ref()],
        bump,
    )]
    pub vote_record: Account<'info, VoteRecord>,

    pub system_program: Program<'info, System>,
}

impl<'info> CastVote<'info> {
    fn prepare(&mut self, bump: u8) -> Result<()> {
        require!(!self.config.paused, VoteError::ProtocolPaused);
        require!(!self.pool.canceled, VoteError::PoolCanceled);

        let record = &mut self.vote_record;
        if record.validator == Pubkey::default() {
            record.pool_id = self.pool.pool_id;
            record.validator = self.validator.key();
            record.bump = bump;
        }
        Ok(())
    }

    /// Freeze the validator's stake for this pool. Idempotent: only the
    /// first vote in a pool takes a freeze.
    fn freeze_stake(&mut self) {
        if !self.vote_record.frozen {
            self.vote_record.frozen = true;
            self.stake.freeze();
            self.pool.frozen_validators = self.pool.frozen_validators.saturating_add(1);
            emit!(ValidatorFrozen {
                pool_id: self.pool.pool_id,
                validator: self.validator.key(),
            });
        }
    }

    pub fn vote_evaluation(&mut self, approve: bool, bumps: CastVoteBumps) -> Result<()> {
        self.prepare(bumps.vote_record)?;

        let now = Clock::get()?.unix_timestamp;
        require!(
            self.pool.phase_at(now) == PoolPhase::Evaluation,
            VoteError::OutsideVotingWindow
        );
        require!(!self.vote_record.eval_voted, VoteError::DuplicateVote);

        self.vote_record.eval_voted = true;
        self.vote_record.eval_approve = approve;
        if approve {
            self.pool.approve_votes += 1;
        } else {
            self.pool.reject_votes += 1;
        }

        self.freeze_stake();

        emit!(EvaluationVoteCast {
            pool_id: self.pool.pool_id,
            validator: self.validator.key(),
            approve,
        });
        Ok(())
    }

    pub fn vote_option(&mut self, option_index: u32, bumps: CastVoteBumps) -> Result<()> {
        self.prepare(bumps.vote_record)?;

        let now = Clock::get()?.unix_timestamp;
        require!(
            self.pool.phase_at(now) == PoolPhase::OptionVoting,
            VoteError::OutsideVotingWindow
        );
        // The evaluation window has passed; complete it lazily if nobody
        // cranked `complete_evaluation` during the gap.
        if !self.pool.evaluation_complete {
            self.pool.approved = evaluate_approval(
                self.pool.approve_votes,
                self.pool.reject_votes,
                self.config.bonding.min_votes_required,
            );
            self.pool.evaluation_complete = true;
        }
        require!(self.pool.approved, VoteError::PoolNotApproved);
        require!(!self.vote_record.option_voted, VoteError::DuplicateVote);

        let cap = self.pool.option_vote_cap;
        let cap_step = self.config.bonding.initial_per_option_cap;
        let max_diff = self.config.bonding.max_vote_difference;
        let outcome = register_capped_vote(
            &mut self.pool.option_vote_counts,
            cap,
            option_index,
            cap_step,
            max_diff,
        )?;
        if outcome.cap > cap {
            self.pool.option_vote_cap = outcome.cap;
            emit!(VoteCapIncreased {
                pool_id: self.pool.pool_id,
                is_dispute: false,
                new_cap: outcome.cap,
            });
        }

        self.vote_record.option_voted = true;
        self.vote_record.option_index = option_index;

        self.freeze_stake();

        emit!(OptionVoteCast {
            pool_id: self.pool.pool_id,
            validator: self.validator.key(),
            option_index,
        });
        Ok(())
    }

    pub fn vote_dispute(
        &mut self,
        is_evaluation_dispute: bool,
        vote_value: u32,
        bumps: CastVoteBumps,
    ) -> Result<()> {
        self.prepare(bumps.vote_record)?;

        let now = Clock::get()?.unix_timestamp;
        require!(
            self.pool.phase_at(now) == PoolPhase::Dispute,
            VoteError::OutsideVotingWindow
        );

        if is_evaluation_dispute {
            require!(vote_value <= 1, VoteError::InvalidDisputeValue);
            require!(
                !self.vote_record.dispute_eval_voted,
                VoteError::DuplicateVote
            );

            let approve = vote_value == 1;
            self.vote_record.dispute_eval_voted = true;
            self.vote_record.dispute_eval_approve = approve;
            if approve {
                self.pool.dispute_approve_votes += 1;
            } else {
                self.pool.dispute_reject_votes += 1;
            }
        } else {
            require!(
                !self.vote_record.dispute_option_voted,
                VoteError::DuplicateVote
            );

            let cap = self.pool.dispute_option_cap;
            let cap_step = self.config.bonding.initial_per_option_cap;
            let max_diff = self.config.bonding.max_vote_difference;
            let outcome = register_capped_vote(
                &mut self.pool.dispute_option_counts,
                cap,
                vote_value,
                cap_step,
                max_diff,
            )?;
            if outcome.cap > cap {
                self.pool.dispute_option_cap = outcome.cap;
                emit!(VoteCapIncreased {
                    pool_id: self.pool.pool_id,
                    is_dispute: true,
                    new_cap: outcome.cap,
                });
            }

            self.vote_record.dispute_option_voted = true;
            self.vote_record.dispute_option_index = vote_value;
        }

        self.freeze_stake();

        emit!(DisputeVoteCast {
            pool_id: self.pool.pool_id,
            validator: self.validator.key(),
            is_evaluation_dispute,
            vote_value,
        });
        Ok(())
    }
}

#[error_code]
pub enum VoteError {
    #[msg("Protocol is paused")]
    ProtocolPaused,
    #[msg("Pool is canceled")]
    PoolCanceled,
    #[msg("Caller does not hold the validator role")]
    NotValidator,
    #[msg("Operation attempted outside its voting window")]
    OutsideVotingWindow,
    #[msg("Validator already voted in this phase")]
    DuplicateVote,
    #[msg("Pool evaluation was not approved")]
    PoolNotApproved,
    #[msg("Evaluation dispute value must be 0 or 1")]
    InvalidDisputeValue,
}
