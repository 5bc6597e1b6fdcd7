//! Vote tally and verdict machinery
//!
//! Four vote kinds move through this module — evaluation, option, and the
//! two dispute flavors — sharing one tally implementation instead of four
//! near-copies:
//!
//! - boolean kinds (evaluation, evaluation-dispute) are a pair of counters;
//! - indexed kinds (option, option-dispute) are a counter vector behind a
//!   pool-scoped cap that only ever rises.
//!
//! The cap exists so a single large burst of stake cannot lock a result in:
//! a vote that would breach the cap first asks the escalation policy, which
//! raises the ceiling one step whenever the leader is already more than
//! `max_vote_difference` ahead of the runner-up. Otherwise the vote fails.
//!
//! `compute_verdict` folds all tallies into the immutable verdict:
//! the dispute side opposing the evaluation result must beat the supporting
//! side by more than the original evaluation margin to overturn approval,
//! and a dispute-option leader must hold a strict majority of all
//! option-dispute votes (and differ) to overturn the option-vote leader.

use anchor_lang::prelude::*;

#[error_code]
pub enum TallyError {
    #[msg("Option index out of range")]
    InvalidOption,
    #[msg("Vote would exceed the per-option cap")]
    VoteCapExceeded,
    #[msg("No options to tally")]
    EmptyTally,
}

/// A cast vote, tagged by kind. Claims settle every kind against the same
/// verdict through [`VoteKind::agrees_with`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum VoteKind {
    Evaluation { approve: bool },
    Option { index: u32 },
    DisputeEvaluation { approve: bool },
    DisputeOption { index: u32 },
}

/// The immutable result of processing a pool.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Verdict {
    pub final_approval: bool,
    pub winning_option: u32,
    pub dispute_round: u8,
}

impl VoteKind {
    /// Whether this vote landed on the side the verdict settled on.
    pub fn agrees_with(&self, verdict: &Verdict) -> bool {
        match *self {
            VoteKind::Evaluation { approve } => approve == verdict.final_approval,
            VoteKind::Option { index } => index == verdict.winning_option,
            VoteKind::DisputeEvaluation { approve } => approve == verdict.final_approval,
            VoteKind::DisputeOption { index } => index == verdict.winning_option,
        }
    }

    pub fn is_dispute(&self) -> bool {
        matches!(
            self,
            VoteKind::DisputeEvaluation { .. } | VoteKind::DisputeOption { .. }
        )
    }
}

/// Outcome of registering a vote into a capped tally.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CapOutcome {
    /// New count for the voted option.
    pub count: u32,
    /// The cap after the vote; greater than the input cap iff escalation fired.
    pub cap: u32,
}

/// Register one vote into an indexed, capped tally.
///
/// Shared by option voting and option-dispute voting; the caller owns the
/// counters and the pool-scoped cap and passes the policy constants in.
pub fn register_capped_vote(
    counts: &mut [u32],
    cap: u32,
    index: u32,
    cap_step: u32,
    max_vote_difference: u32,
) -> Result<CapOutcome> {
    let i = index as usize;
    require!(i < counts.len(), TallyError::InvalidOption);

    let next = counts[i].saturating_add(1);
    let mut effective_cap = cap;

    if next > effective_cap {
        // Escalation policy: raise one step only when the race is lopsided.
        let (leader, runner_up) = leader_and_runner_up(counts)?;
        if leader.saturating_sub(runner_up) > max_vote_difference {
            effective_cap = effective_cap.saturating_add(cap_step);
        }
        require!(next <= effective_cap, TallyError::VoteCapExceeded);
    }

    counts[i] = next;
    Ok(CapOutcome {
        count: next,
        cap: effective_cap,
    })
}

/// Highest and second-highest counts in a tally.
fn leader_and_runner_up(counts: &[u32]) -> Result<(u32, u32)> {
    require!(!counts.is_empty(), TallyError::EmptyTally);
    let mut leader = 0u32;
    let mut runner_up = 0u32;
    for &c in counts {
        if c > leader {
            runner_up = leader;
            leader = c;
        } else if c > runner_up {
            runner_up = c;
        }
    }
    Ok((leader, runner_up))
}

/// Index of the leading option (lowest index wins ties; 0 for an empty tally).
pub fn leading_option(counts: &[u32]) -> u32 {
    if counts.is_empty() {
        return 0;
    }
    let mut best = 0usize;
    for (i, &c) in counts.iter().enumerate() {
        if c > counts[best] {
            best = i;
        }
    }
    best as u32
}

/// Evaluation result at phase completion. Insufficient participation is a
/// completed-but-rejected evaluation, never a pending one.
pub fn evaluate_approval(approve_votes: u32, reject_votes: u32, min_votes_required: u32) -> bool {
    approve_votes > reject_votes && approve_votes >= min_votes_required
}

/// Everything `compute_verdict` reads, snapshotted at dispute end.
#[derive(Clone, Copy, Debug)]
pub struct VerdictInput<'a> {
    pub approved: bool,
    pub approve_votes: u32,
    pub reject_votes: u32,
    pub option_vote_counts: &'a [u32],
    pub dispute_approve_votes: u32,
    pub dispute_reject_votes: u32,
    pub dispute_option_counts: &'a [u32],
}

pub fn compute_verdict(input: VerdictInput<'_>) -> Verdict {
    let mut dispute_round = 0u8;

    // Evaluation overturn: the side opposing the standing result must exceed
    // the supporting side by more than the original evaluation margin.
    let margin = input.approve_votes.abs_diff(input.reject_votes);
    let (opposing, supporting) = if input.approved {
        (input.dispute_reject_votes, input.dispute_approve_votes)
    } else {
        (input.dispute_approve_votes, input.dispute_reject_votes)
    };
    let mut final_approval = input.approved;
    if opposing > supporting && opposing - supporting > margin {
        final_approval = !final_approval;
        dispute_round = 1;
    }

    // Option overturn: the dispute leader must differ and hold a strict
    // majority of all option-dispute votes.
    let mut winning_option = leading_option(input.option_vote_counts);
    let dispute_total: u64 = input.dispute_option_counts.iter().map(|&c| c as u64).sum();
    if dispute_total > 0 {
        let dispute_leader = leading_option(input.dispute_option_counts);
        let dispute_leader_votes = input.dispute_option_counts[dispute_leader as usize] as u64;
        if dispute_leader != winning_option && dispute_leader_votes * 2 > dispute_total {
            winning_option = dispute_leader;
            dispute_round = 1;
        }
    }

    Verdict {
        final_approval,
        winning_option,
        dispute_round,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approval_requires_majority_and_quorum() {
        // Two approve votes with min_votes_required = 2 passes.
        assert!(evaluate_approval(2, 0, 2));
        // Majority without quorum fails.
        assert!(!evaluate_approval(1, 0, 2));
        // Quorum without majority fails.
        assert!(!evaluate_approval(2, 3, 2));
        // Ties reject.
        assert!(!evaluate_approval(2, 2, 2));
    }

    #[test]
    fn zero_participation_rejects() {
        assert!(!evaluate_approval(0, 0, 2));
    }

    #[test]
    fn capped_vote_counts_up_to_cap() {
        let mut counts = vec![0u32, 0];
        for _ in 0..3 {
            register_capped_vote(&mut counts, 3, 0, 3, 10).unwrap();
        }
        assert_eq!(counts[0], 3);
        // Fourth vote breaches the cap; the race is not lopsided enough
        // (lead 3 over 0 is not > max_vote_difference 10) so no escalation.
        let err = register_capped_vote(&mut counts, 3, 0, 3, 10);
        assert!(err.is_err());
        assert_eq!(counts[0], 3);
    }

    #[test]
    fn cap_escalates_when_race_is_lopsided() {
        let mut counts = vec![5u32, 0];
        // Lead of 5 over 0 exceeds max_vote_difference 3: cap rises 5 -> 8.
        let out = register_capped_vote(&mut counts, 5, 0, 3, 3).unwrap();
        assert_eq!(out.count, 6);
        assert_eq!(out.cap, 8);
    }

    #[test]
    fn cap_never_decreases() {
        let mut counts = vec![5u32, 0];
        let raised = register_capped_vote(&mut counts, 5, 0, 3, 3).unwrap().cap;
        assert!(raised > 5);
        // Subsequent votes under the raised cap report the same cap back.
        let out = register_capped_vote(&mut counts, raised, 1, 3, 3).unwrap();
        assert_eq!(out.cap, raised);
    }

    #[test]
    fn invalid_option_rejected() {
        let mut counts = vec![0u32, 0];
        assert!(register_capped_vote(&mut counts, 5, 2, 3, 3).is_err());
    }

    #[test]
    fn verdict_unchanged_without_disputes() {
        let v = compute_verdict(VerdictInput {
            approved: true,
            approve_votes: 4,
            reject_votes: 1,
            option_vote_counts: &[2, 5, 1],
            dispute_approve_votes: 0,
            dispute_reject_votes: 0,
            dispute_option_counts: &[0, 0, 0],
        });
        assert!(v.final_approval);
        assert_eq!(v.winning_option, 1);
        assert_eq!(v.dispute_round, 0);
    }

    #[test]
    fn evaluation_overturn_needs_supermajority_over_margin() {
        // Approved with margin 3; 3 opposing dispute votes is not enough.
        let held = compute_verdict(VerdictInput {
            approved: true,
            approve_votes: 5,
            reject_votes: 2,
            option_vote_counts: &[1, 0],
            dispute_approve_votes: 0,
            dispute_reject_votes: 3,
            dispute_option_counts: &[0, 0],
        });
        assert!(held.final_approval);
        assert_eq!(held.dispute_round, 0);

        // Four opposing votes beat the margin: overturned.
        let flipped = compute_verdict(VerdictInput {
            approved: true,
            approve_votes: 5,
            reject_votes: 2,
            option_vote_counts: &[1, 0],
            dispute_approve_votes: 0,
            dispute_reject_votes: 4,
            dispute_option_counts: &[0, 0],
        });
        assert!(!flipped.final_approval);
        assert_eq!(flipped.dispute_round, 1);
    }

    #[test]
    fn rejection_can_be_overturned_to_approval() {
        let v = compute_verdict(VerdictInput {
            approved: false,
            approve_votes: 1,
            reject_votes: 2,
            option_vote_counts: &[3, 1],
            dispute_approve_votes: 4,
            dispute_reject_votes: 1,
            dispute_option_counts: &[0, 0],
        });
        assert!(v.final_approval);
        assert_eq!(v.dispute_round, 1);
    }

    #[test]
    fn option_overturn_needs_strict_majority() {
        // Dispute leader (index 1) holds 3 of 4 dispute votes: overturned.
        let v = compute_verdict(VerdictInput {
            approved: true,
            approve_votes: 3,
            reject_votes: 0,
            option_vote_counts: &[6, 2],
            dispute_approve_votes: 0,
            dispute_reject_votes: 0,
            dispute_option_counts: &[1, 3],
        });
        assert_eq!(v.winning_option, 1);
        assert_eq!(v.dispute_round, 1);

        // Exactly half is not a strict majority: leader stands.
        let held = compute_verdict(VerdictInput {
            approved: true,
            approve_votes: 3,
            reject_votes: 0,
            option_vote_counts: &[6, 2],
            dispute_approve_votes: 0,
            dispute_reject_votes: 0,
            dispute_option_counts: &[2, 2],
        });
        assert_eq!(held.winning_option, 0);
        assert_eq!(held.dispute_round, 0);
    }

    #[test]
    fn option_overturn_survives_saturated_tallies() {
        // Doubling a near-max count must not overflow the majority check.
        let v = compute_verdict(VerdictInput {
            approved: true,
            approve_votes: 1,
            reject_votes: 0,
            option_vote_counts: &[3, 1],
            dispute_approve_votes: 0,
            dispute_reject_votes: 0,
            dispute_option_counts: &[1, u32::MAX],
        });
        assert_eq!(v.winning_option, 1);
        assert_eq!(v.dispute_round, 1);
    }

    #[test]
    fn vote_kinds_settle_against_the_verdict() {
        let verdict = Verdict {
            final_approval: true,
            winning_option: 2,
            dispute_round: 0,
        };
        assert!(VoteKind::Evaluation { approve: true }.agrees_with(&verdict));
        assert!(!VoteKind::Evaluation { approve: false }.agrees_with(&verdict));
        assert!(VoteKind::Option { index: 2 }.agrees_with(&verdict));
        assert!(!VoteKind::Option { index: 0 }.agrees_with(&verdict));
        assert!(VoteKind::DisputeEvaluation { approve: true }.agrees_with(&verdict));
        assert!(VoteKind::DisputeOption { index: 2 }.agrees_with(&verdict));
        assert!(VoteKind::DisputeOption { index: 2 }.is_dispute());
        assert!(!VoteKind::Option { index: 2 }.is_dispute());
    }
}
