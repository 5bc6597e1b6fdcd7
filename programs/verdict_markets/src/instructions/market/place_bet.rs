//! Bet Placement
//!
//! Open inside the betting window of an approved pool. The quote is taken on
//! the pre-bet book and locked into the position, so later liquidity shifts
//! never change what this bettor was promised; the bet itself then backs its
//! chosen option, nudging that option's future odds down. The first bet into
//! an empty book bootstraps liquidity instead of failing.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::amm::{quote_odds, spread_liquidity, AmmError};
use crate::bonding::evaluate_approval;
use crate::state::{Config, OptionGroup, Pool, Position};

#[event]
pub struct BetPlaced {
    pub pool_id: u64,
    pub bettor: Pubkey,
    pub option_index: u32,
    pub amount: u64,
    pub locked_odds: u64,
}

#[derive(Accounts)]
#[instruction(option_index: u32)]
pub struct PlaceBet<'info> {
    #[account(mut)]
    pub bettor: Signer<'info>,

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
        seeds = [OptionGroup::SEED, pool.pool_id.to_le_bytes().as_ref()],
        bump = group.bump,
    )]
    pub group: Account<'info, OptionGroup>,

    #[account(
        init_if_needed,
        payer = bettor,
        space = 8 + Position::INIT_SPACE,
        seeds = [
            Position::SEED,
            pool.pool_id.to_le_bytes().as_ref(),
            bettor.key().as_ref(),
            option_index.to_le_bytes().as_ref(),
        ],
        bump,
    )]
    pub position: Account<'info, Position>,

    #[account(
        constraint = collateral_mint.key() == config.collateral_mint @ PlaceBetError::WrongMint,
    )]
    pub collateral_mint: InterfaceAccount<'info, Mint>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = bettor,
    )]
    pub bettor_collateral: InterfaceAccount<'info, TokenAccount>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = group,
    )]
    pub vault: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

impl<'info> PlaceBet<'info> {
    pub fn place_bet(
        &mut self,
        option_index: u32,
        amount: u64,
        min_odds: u64,
        bumps: PlaceBetBumps,
    ) -> Result<()> {
        require!(!self.config.paused, PlaceBetError::ProtocolPaused);
        require!(!self.pool.canceled, PlaceBetError::PoolCanceled);
        require!(
            !self.group.liquidity.is_empty(),
            PlaceBetError::OptionsNotSet
        );
        require!(amount > 0, AmmError::ZeroAmount);
        require!(
            (option_index as usize) < self.group.liquidity.len(),
            AmmError::InvalidOption
        );

        let now = Clock::get()?.unix_timestamp;
        require!(
            now >= self.pool.start_timeframe && now < self.pool.settle_timeframe,
            PlaceBetError::OutsideBettingWindow
        );
        // The approval gate must not depend on anyone having cranked
        // `complete_evaluation`; close a past-due evaluation from the
        // tallies here, same as the first option vote does.
        if !self.pool.evaluation_complete && now > self.pool.evaluation_end {
            self.pool.approved = evaluate_approval(
                self.pool.approve_votes,
                self.pool.reject_votes,
                self.config.bonding.min_votes_required,
            );
            self.pool.evaluation_complete = true;
        }
        require!(
            self.pool.evaluation_complete && self.pool.approved,
            PlaceBetError::PoolNotApproved
        );

        // Quote on the pre-bet book; an empty book is par.
        let odds = quote_odds(&self.group.liquidity, option_index)?;
        require!(odds >= min_odds, PlaceBetError::SlippageExceeded);

        transfer_checked(
            CpiContext::new(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.bettor_collateral.to_account_info(),
                    mint: self.collateral_mint.to_account_info(),
                    to: self.vault.to_account_info(),
                    authority: self.bettor.to_account_info(),
                },
            ),
            amount,
            self.collateral_mint.decimals,
        )?;

        let i = option_index as usize;
        if self.group.total_liquidity() == 0 {
            // Bootstrap: the bet itself seeds an even book.
            spread_liquidity(&mut self.group.liquidity, amount)?;
            self.group.bootstrapped = true;
        } else {
            self.group.liquidity[i] = self.group.liquidity[i]
                .checked_add(amount)
                .ok_or(AmmError::Overflow)?;
        }
        self.group.total_volume[i] = self.group.total_volume[i]
            .checked_add(amount)
            .ok_or(AmmError::Overflow)?;

        // Volume-weighted lock across repeat bets on the same option.
        let position = &mut self.position;
        let locked_odds = if position.amount == 0 {
            odds
        } else {
            let weighted = (position.amount as u128 * position.locked_odds as u128
                + amount as u128 * odds as u128)
                / (position.amount as u128 + amount as u128);
            weighted as u64
        };

        position.pool_id = self.pool.pool_id;
        position.bettor = self.bettor.key();
        position.option_index = option_index;
        position.amount = position
            .amount
            .checked_add(amount)
            .ok_or(AmmError::Overflow)?;
        position.locked_odds = locked_odds;
        position.settled = false;
        position.bump = bumps.position;

        emit!(BetPlaced {
            pool_id: self.pool.pool_id,
            bettor: self.bettor.key(),
            option_index,
            amount,
            locked_odds: position.locked_odds,
        });

        Ok(())
    }
}

#[error_code]
pub enum PlaceBetError {
    #[msg("Protocol is paused")]
    ProtocolPaused,
    #[msg("Pool is canceled")]
    PoolCanceled,
    #[msg("Options are not set for this pool")]
    OptionsNotSet,
    #[msg("Bet attempted outside the betting window")]
    OutsideBettingWindow,
    #[msg("Pool evaluation was not approved")]
    PoolNotApproved,
    #[msg("Quoted odds fell below the minimum")]
    SlippageExceeded,
    #[msg("Collateral mint does not match config")]
    WrongMint,
}
