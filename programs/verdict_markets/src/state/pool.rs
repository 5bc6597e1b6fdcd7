//! Pool state
//!
//! One account per real-world question moving through the bonding protocol:
//! evaluation, option voting, dispute, processing. Phase boundaries are fixed
//! at creation and transitions are never "fired" — every operation derives the
//! current phase lazily from the clock (there is no scheduler on chain).

use anchor_lang::prelude::*;

use crate::constants::{MAX_DATA_LEN, MAX_OPTIONS, MAX_OPTION_NAME_LEN, MAX_TITLE_LEN, SEED_POOL};

/// A question pool and everything the bonding engine tracks for it.
///
/// Seeds: ["pool", pool_id.to_le_bytes()]
#[account]
#[derive(InitSpace)]
pub struct Pool {
    /// Caller-assigned unique identifier. Duplicates fail at account init.
    pub pool_id: u64,

    pub creator: Pubkey,

    #[max_len(MAX_TITLE_LEN)]
    pub title: String,

    /// Opaque descriptor (e.g. an off-chain metadata pointer).
    #[max_len(MAX_DATA_LEN)]
    pub data: String,

    /// Betting window start (market engine).
    pub start_timeframe: i64,
    /// Betting window end / settlement anchor (market engine).
    pub settle_timeframe: i64,

    /// Phase boundaries, non-decreasing by construction.
    pub evaluation_start: i64,
    pub evaluation_end: i64,
    pub option_voting_start: i64,
    pub option_voting_end: i64,
    pub dispute_end: i64,

    /// Ordered option names, set at most once before evaluation completes.
    #[max_len(MAX_OPTIONS, MAX_OPTION_NAME_LEN)]
    pub options: Vec<String>,

    // Evaluation tallies.
    pub approve_votes: u32,
    pub reject_votes: u32,
    pub evaluation_complete: bool,
    pub approved: bool,

    // Option-voting tallies. The cap is pool-scoped and only ever raised.
    #[max_len(MAX_OPTIONS)]
    pub option_vote_counts: Vec<u32>,
    pub option_vote_cap: u32,

    // Dispute tallies: evaluation re-litigation plus option re-litigation,
    // each with independent counters; option disputes carry their own cap.
    pub dispute_approve_votes: u32,
    pub dispute_reject_votes: u32,
    #[max_len(MAX_OPTIONS)]
    pub dispute_option_counts: Vec<u32>,
    pub dispute_option_cap: u32,

    // Verdict, written exactly once by process_pool.
    pub processed: bool,
    pub processed_time: i64,
    pub final_approval: bool,
    pub winning_option: u32,
    pub dispute_round: u8,

    pub canceled: bool,

    /// Validators whose stake this pool still freezes (observability only;
    /// release is tracked per validator on the vote record).
    pub frozen_validators: u32,

    pub bump: u8,
}

/// Lazy view of where a pool sits on its timeline.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum PoolPhase {
    PreEvaluation,
    Evaluation,
    /// Between evaluation end and option voting start.
    Gap,
    OptionVoting,
    Dispute,
    /// Past dispute end but not yet processed.
    AwaitingProcessing,
    Processed,
    Canceled,
}

impl Pool {
    pub const SEED: &'static [u8] = SEED_POOL;

    pub fn phase_at(&self, now: i64) -> PoolPhase {
        if self.canceled {
            return PoolPhase::Canceled;
        }
        if self.processed {
            return PoolPhase::Processed;
        }
        if now < self.evaluation_start {
            PoolPhase::PreEvaluation
        } else if now <= self.evaluation_end {
            PoolPhase::Evaluation
        } else if now < self.option_voting_start {
            PoolPhase::Gap
        } else if now <= self.option_voting_end {
            PoolPhase::OptionVoting
        } else if now <= self.dispute_end {
            PoolPhase::Dispute
        } else {
            PoolPhase::AwaitingProcessing
        }
    }

    pub fn options_set(&self) -> bool {
        !self.options.is_empty()
    }
}
