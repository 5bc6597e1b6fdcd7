//! # Liquidity-weighted odds engine
//!
//! Each option group carries one liquidity scalar per option. Odds are the
//! inverse of an option's share of total liquidity, normalized by the option
//! count so a perfectly balanced book quotes 1.0000x everywhere:
//!
//! ```text
//! odds_i = (total * PRECISION) / (liquidity_i * n)
//!
//! [100, 100]        -> 1.0000x / 1.0000x
//! [110, 100]        -> 0.9545x / 1.0500x
//! ```
//!
//! Lower liquidity behind an option means fewer funds expect it to win, so
//! its payout multiple rises; piling liquidity onto an option strictly
//! lowers its quote.
//!
//! ## Early exit
//!
//! A position's fair unwind value is its locked potential payout weighted by
//! the option's current liquidity share:
//!
//! ```text
//! pre_fee = (amount * locked_odds / PRECISION) * liquidity_i / total
//! ```
//!
//! This is zero only when the stake itself is zero or the option's backing
//! liquidity is zero; there is no other degenerate-zero path. Integer
//! flooring of a tiny position rounds up to one base unit so the value
//! stays strictly positive whenever those inputs are.

use anchor_lang::prelude::*;

use crate::constants::{BPS_DENOMINATOR, ODDS_PRECISION};

#[error_code]
pub enum AmmError {
    #[msg("Option index out of range")]
    InvalidOption,
    #[msg("Option has no backing liquidity")]
    InsufficientLiquidity,
    #[msg("Arithmetic overflow")]
    Overflow,
    #[msg("Amount must be positive")]
    ZeroAmount,
}

/// Quote the current odds for one option, in `ODDS_PRECISION` fixed point.
///
/// An empty book quotes 1.0000x: the first bet bootstraps liquidity and is
/// priced at par.
pub fn quote_odds(liquidity: &[u64], option_index: u32) -> Result<u64> {
    let i = option_index as usize;
    require!(i < liquidity.len(), AmmError::InvalidOption);

    let total: u64 = liquidity.iter().copied().sum();
    if total == 0 {
        return Ok(ODDS_PRECISION);
    }
    require!(liquidity[i] > 0, AmmError::InsufficientLiquidity);

    let n = liquidity.len() as u128;
    let odds = (total as u128)
        .checked_mul(ODDS_PRECISION as u128)
        .ok_or(AmmError::Overflow)?
        .checked_div((liquidity[i] as u128).checked_mul(n).ok_or(AmmError::Overflow)?)
        .ok_or(AmmError::Overflow)?;

    Ok(odds as u64)
}

/// Distribute `amount` across the book: pro-rata to current liquidity, or
/// evenly when the book is empty. Integer-division dust lands on option 0 so
/// the distributed sum equals `amount` exactly.
pub fn spread_liquidity(liquidity: &mut [u64], amount: u64) -> Result<()> {
    require!(!liquidity.is_empty(), AmmError::InvalidOption);
    require!(amount > 0, AmmError::ZeroAmount);

    let total: u64 = liquidity.iter().copied().sum();
    let n = liquidity.len() as u64;

    let mut distributed = 0u64;
    for i in 1..liquidity.len() {
        let share = if total == 0 {
            amount / n
        } else {
            ((amount as u128)
                .checked_mul(liquidity[i] as u128)
                .ok_or(AmmError::Overflow)? / total as u128) as u64
        };
        liquidity[i] = liquidity[i].checked_add(share).ok_or(AmmError::Overflow)?;
        distributed += share;
    }
    // Remainder to option 0: the round-trip with remaining-liquidity views
    // must reflect the added amount exactly.
    liquidity[0] = liquidity[0]
        .checked_add(amount - distributed)
        .ok_or(AmmError::Overflow)?;

    Ok(())
}

/// Projected payout for a stake at the given odds. Pure preview math, also
/// used to lock a bet's payout at placement time.
pub fn potential_return(amount: u64, odds: u64) -> Result<u64> {
    let ret = (amount as u128)
        .checked_mul(odds as u128)
        .ok_or(AmmError::Overflow)?
        / ODDS_PRECISION as u128;
    Ok(ret as u64)
}

/// Pre-fee unwind value of a position: locked potential payout weighted by
/// the option's current liquidity share. Flooring never zeroes a live
/// position: any nonzero stake against nonzero backing liquidity unwinds
/// for at least one base unit.
pub fn early_exit_value(
    amount: u64,
    locked_odds: u64,
    option_liquidity: u64,
    total_liquidity: u64,
) -> Result<u64> {
    if amount == 0 || locked_odds == 0 || option_liquidity == 0 || total_liquidity == 0 {
        return Ok(0);
    }

    let value = (amount as u128)
        .checked_mul(locked_odds as u128)
        .ok_or(AmmError::Overflow)?
        .checked_mul(option_liquidity as u128)
        .ok_or(AmmError::Overflow)?
        / (ODDS_PRECISION as u128 * total_liquidity as u128);

    Ok((value as u64).max(1))
}

/// Apply a basis-point fee. Returns `(net, fee)`; net is exactly
/// `value - value * fee_bps / 10_000`.
pub fn apply_fee(value: u64, fee_bps: u64) -> Result<(u64, u64)> {
    let fee = ((value as u128)
        .checked_mul(fee_bps as u128)
        .ok_or(AmmError::Overflow)?
        / BPS_DENOMINATOR as u128) as u64;
    Ok((value - fee, fee))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_book_quotes_par() {
        assert_eq!(quote_odds(&[100, 100], 0).unwrap(), ODDS_PRECISION);
        assert_eq!(quote_odds(&[100, 100], 1).unwrap(), ODDS_PRECISION);
        assert_eq!(quote_odds(&[50, 50, 50], 2).unwrap(), ODDS_PRECISION);
    }

    #[test]
    fn empty_book_quotes_par() {
        assert_eq!(quote_odds(&[0, 0], 0).unwrap(), ODDS_PRECISION);
    }

    #[test]
    fn thin_option_pays_more() {
        // Less liquidity behind option 1 -> higher payout multiple.
        let heavy = quote_odds(&[300, 100], 0).unwrap();
        let thin = quote_odds(&[300, 100], 1).unwrap();
        assert!(thin > ODDS_PRECISION);
        assert!(heavy < ODDS_PRECISION);
        assert!(thin > heavy);
    }

    #[test]
    fn odds_fall_strictly_as_liquidity_share_rises() {
        let mut book = vec![100u64, 100];
        let mut last = quote_odds(&book, 0).unwrap();
        for _ in 0..5 {
            book[0] += 50;
            let next = quote_odds(&book, 0).unwrap();
            assert!(next < last);
            last = next;
        }
    }

    #[test]
    fn bet_moves_both_quotes() {
        // 10 units on option 0 against a [100, 100] book at par.
        let mut book = vec![100u64, 100];
        let quote = quote_odds(&book, 0).unwrap();
        assert_eq!(quote, ODDS_PRECISION);

        book[0] += 10;
        assert!(quote_odds(&book, 0).unwrap() < ODDS_PRECISION);
        assert!(quote_odds(&book, 1).unwrap() >= ODDS_PRECISION);
    }

    #[test]
    fn zero_backed_option_is_unquotable() {
        assert!(quote_odds(&[100, 0], 1).is_err());
        assert!(quote_odds(&[100, 0], 2).is_err());
    }

    #[test]
    fn spread_on_empty_book_is_even() {
        let mut book = vec![0u64, 0, 0];
        spread_liquidity(&mut book, 90).unwrap();
        assert_eq!(book, vec![30, 30, 30]);
    }

    #[test]
    fn spread_is_pro_rata_and_exact() {
        let mut book = vec![100u64, 300];
        spread_liquidity(&mut book, 100).unwrap();
        // 75 to the heavy side, remainder (25) to option 0.
        assert_eq!(book[1], 375);
        assert_eq!(book[0], 125);
        assert_eq!(book.iter().sum::<u64>(), 500);
    }

    #[test]
    fn spread_round_trips_with_dust() {
        // 100 into [1, 2]: shares floor, dust returns to option 0.
        let mut book = vec![1u64, 2];
        spread_liquidity(&mut book, 100).unwrap();
        assert_eq!(book.iter().sum::<u64>(), 103);
    }

    #[test]
    fn potential_return_scales_with_odds() {
        assert_eq!(potential_return(100, ODDS_PRECISION).unwrap(), 100);
        assert_eq!(potential_return(100, 15_000).unwrap(), 150);
        assert_eq!(potential_return(0, 15_000).unwrap(), 0);
    }

    #[test]
    fn early_exit_positive_when_stake_and_liquidity_nonzero() {
        // 10 staked at par, book now [110, 100].
        let v = early_exit_value(10, ODDS_PRECISION, 110, 210).unwrap();
        assert!(v > 0);

        // Zero only from zero stake or zero option liquidity.
        assert_eq!(early_exit_value(0, ODDS_PRECISION, 110, 210).unwrap(), 0);
        assert_eq!(early_exit_value(10, ODDS_PRECISION, 0, 210).unwrap(), 0);
    }

    #[test]
    fn early_exit_flooring_never_zeroes_a_live_position() {
        // Dust positions whose exact value floors below one base unit still
        // unwind for at least one unit.
        assert!(early_exit_value(1, ODDS_PRECISION, 1, 1_000).unwrap() > 0);
        assert!(early_exit_value(5, ODDS_PRECISION, 3, 200).unwrap() > 0);
    }

    #[test]
    fn early_exit_tracks_liquidity_share() {
        let at_half = early_exit_value(1_000, 20_000, 500, 1_000).unwrap();
        let at_quarter = early_exit_value(1_000, 20_000, 250, 1_000).unwrap();
        assert_eq!(at_half, 1_000); // full locked payout is 2_000
        assert_eq!(at_quarter, 500);
        assert!(at_quarter < at_half);
    }

    #[test]
    fn fee_application_is_exact() {
        let (net, fee) = apply_fee(10_000, 250).unwrap();
        assert_eq!(fee, 250);
        assert_eq!(net, 9_750);
        assert_eq!(net, 10_000 - 10_000 * 250 / 10_000);

        let (net, fee) = apply_fee(33, 100).unwrap();
        // 33 * 100 / 10_000 floors to 0.
        assert_eq!(fee, 0);
        assert_eq!(net, 33);
    }
}
