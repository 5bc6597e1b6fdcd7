//! Validator Reward Claims
//!
//! After processing, each validator who voted settles once against the
//! verdict: votes on the winning side earn stake rewards, votes against it
//! take penalties, and the claim releases the pool's freeze on their stake.
//! The claim flag is committed before any value moves.

use anchor_lang::prelude::*;

use crate::bonding::{Verdict, VoteKind};
use crate::state::{Config, Pool, StakeAccount, VoteRecord};

#[event]
pub struct RewardClaimed {
    pub pool_id: u64,
    pub validator: Pubkey,
    pub reward: u64,
    pub penalty: u64,
}

#[event]
pub struct ValidatorUnfrozen {
    pub pool_id: u64,
    pub validator: Pubkey,
    pub forced: bool,
}

#[derive(Accounts)]
pub struct ClaimReward<'info> {
    pub validator: Signer<'info>,

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
        seeds = [StakeAccount::SEED, validator.key().as_ref()],
        bump = stake.bump,
    )]
    pub stake: Account<'info, StakeAccount>,

    #[account(
        mut,
        seeds = [VoteRecord::SEED, pool.pool_id.to_le_bytes().as_ref(), validator.key().as_ref()],
        bump = vote_record.bump,
    )]
    pub vote_record: Account<'info, VoteRecord>,
}

impl<'info> ClaimReward<'info> {
    pub fn claim_reward(&mut self) -> Result<()> {
        require!(self.pool.processed, ClaimRewardError::NotYetProcessed);
        require!(
            !self.vote_record.reward_claimed,
            ClaimRewardError::AlreadyClaimed
        );
        require!(self.vote_record.has_voted(), ClaimRewardError::NeverVoted);

        let verdict = Verdict {
            final_approval: self.pool.final_approval,
            winning_option: self.pool.winning_option,
            dispute_round: self.pool.dispute_round,
        };

        let mut cast: Vec<VoteKind> = Vec::with_capacity(4);
        let record = &self.vote_record;
        if record.eval_voted {
            cast.push(VoteKind::Evaluation {
                approve: record.eval_approve,
            });
        }
        if record.option_voted {
            cast.push(VoteKind::Option {
                index: record.option_index,
            });
        }
        if record.dispute_eval_voted {
            cast.push(VoteKind::DisputeEvaluation {
                approve: record.dispute_eval_approve,
            });
        }
        if record.dispute_option_voted {
            cast.push(VoteKind::DisputeOption {
                index: record.dispute_option_index,
            });
        }

        let params = &self.config.bonding;
        let mut reward = 0u64;
        let mut penalty = 0u64;
        for vote in cast {
            let (true_amount, false_amount) = if vote.is_dispute() {
                (params.true_dispute_reward, params.false_dispute_penalty)
            } else {
                (params.true_eval_reward, params.false_eval_penalty)
            };
            if vote.agrees_with(&verdict) {
                reward = reward.saturating_add(true_amount);
            } else {
                penalty = penalty.saturating_add(false_amount);
            }
        }

        // Commit the claim and release the freeze before touching value.
        self.vote_record.reward_claimed = true;
        if self.vote_record.frozen {
            self.vote_record.frozen = false;
            self.stake.unfreeze();
            self.pool.frozen_validators = self.pool.frozen_validators.saturating_sub(1);
            emit!(ValidatorUnfrozen {
                pool_id: self.pool.pool_id,
                validator: self.validator.key(),
                forced: false,
            });
        }

        self.stake.reward(reward);
        let penalty = self.stake.penalize(penalty);

        emit!(RewardClaimed {
            pool_id: self.pool.pool_id,
            validator: self.validator.key(),
            reward,
            penalty,
        });

        Ok(())
    }
}

#[error_code]
pub enum ClaimRewardError {
    #[msg("Pool is not yet processed")]
    NotYetProcessed,
    #[msg("Reward already claimed for this pool")]
    AlreadyClaimed,
    #[msg("Caller never voted in this pool")]
    NeverVoted,
}
