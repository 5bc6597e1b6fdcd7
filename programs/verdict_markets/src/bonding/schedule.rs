//! Phase schedule derivation
//!
//! A pool's five phase boundaries are fixed once, at creation, from the
//! config durations anchored at the pool's start:
//!
//! ```text
//! evaluation_start   = start
//! evaluation_end     = start + evaluation_duration
//! option_voting_start = evaluation_end + option_voting_gap
//! option_voting_end  = option_voting_start + option_voting_duration
//! dispute_end        = option_voting_end + dispute_duration
//! ```
//!
//! With durations validated positive at the config boundary the sequence is
//! non-decreasing by construction; `is_monotonic` is the belt the tests wear.

use anchor_lang::prelude::*;

use crate::state::BondingParams;

#[error_code]
pub enum ScheduleError {
    #[msg("Settle timeframe must be after start timeframe")]
    InvalidRange,
    #[msg("Timestamp arithmetic overflow")]
    Overflow,
}

/// The five fixed boundaries of a pool's bonding timeline.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PhaseSchedule {
    pub evaluation_start: i64,
    pub evaluation_end: i64,
    pub option_voting_start: i64,
    pub option_voting_end: i64,
    pub dispute_end: i64,
}

impl PhaseSchedule {
    /// Derive the timeline for a pool anchored at `start`.
    pub fn derive(params: &BondingParams, start: i64, settle: i64) -> Result<Self> {
        require!(settle > start, ScheduleError::InvalidRange);

        let evaluation_start = start;
        let evaluation_end = evaluation_start
            .checked_add(params.evaluation_duration)
            .ok_or(ScheduleError::Overflow)?;
        let option_voting_start = evaluation_end
            .checked_add(params.option_voting_gap)
            .ok_or(ScheduleError::Overflow)?;
        let option_voting_end = option_voting_start
            .checked_add(params.option_voting_duration)
            .ok_or(ScheduleError::Overflow)?;
        let dispute_end = option_voting_end
            .checked_add(params.dispute_duration)
            .ok_or(ScheduleError::Overflow)?;

        Ok(Self {
            evaluation_start,
            evaluation_end,
            option_voting_start,
            option_voting_end,
            dispute_end,
        })
    }

    pub fn is_monotonic(&self) -> bool {
        self.evaluation_start <= self.evaluation_end
            && self.evaluation_end <= self.option_voting_start
            && self.option_voting_start <= self.option_voting_end
            && self.option_voting_end <= self.dispute_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> BondingParams {
        BondingParams {
            evaluation_duration: 3600,
            option_voting_gap: 600,
            option_voting_duration: 7200,
            dispute_duration: 1800,
            min_votes_required: 2,
            initial_per_option_cap: 10,
            max_vote_difference: 3,
            pool_creation_fee: 1_000,
            good_pool_reward: 500,
            bad_pool_penalty: 500,
            true_eval_reward: 100,
            false_eval_penalty: 100,
            true_dispute_reward: 150,
            false_dispute_penalty: 150,
        }
    }

    #[test]
    fn boundaries_are_non_decreasing() {
        let s = PhaseSchedule::derive(&params(), 1_000_000, 2_000_000).unwrap();
        assert!(s.is_monotonic());
        assert_eq!(s.evaluation_start, 1_000_000);
        assert_eq!(s.evaluation_end, 1_003_600);
        assert_eq!(s.option_voting_start, 1_004_200);
        assert_eq!(s.option_voting_end, 1_011_400);
        assert_eq!(s.dispute_end, 1_013_200);
    }

    #[test]
    fn zero_gap_still_monotonic() {
        let mut p = params();
        p.option_voting_gap = 0;
        let s = PhaseSchedule::derive(&p, 50, 100).unwrap();
        assert!(s.is_monotonic());
        assert_eq!(s.evaluation_end, s.option_voting_start);
    }

    #[test]
    fn settle_before_start_rejected() {
        assert!(PhaseSchedule::derive(&params(), 100, 100).is_err());
        assert!(PhaseSchedule::derive(&params(), 100, 50).is_err());
    }
}
