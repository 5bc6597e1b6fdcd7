//! Pool Creation
//!
//! An authorized pool creator opens a question pool: phase boundaries are
//! derived from the config durations and fixed for good, the creation fee
//! moves to the treasury, and the paired option group plus its collateral
//! vault are created in the same transaction so the two engines can never
//! reference a half-built pair.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked},
};

use crate::bonding::PhaseSchedule;
use crate::constants::{MAX_DATA_LEN, MAX_TITLE_LEN};
use crate::state::{Config, OptionGroup, Pool, StakeAccount};

#[event]
pub struct PoolCreated {
    pub pool_id: u64,
    pub creator: Pubkey,
    pub title: String,
    pub start_timeframe: i64,
    pub settle_timeframe: i64,
    pub evaluation_start: i64,
    pub dispute_end: i64,
}

#[derive(Accounts)]
#[instruction(pool_id: u64)]
pub struct CreatePool<'info> {
    /// Pool creator (pays for accounts and the creation fee)
    #[account(mut)]
    pub creator: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    /// Creator's stake-registry entry; must carry the pool-creator role.
    #[account(
        seeds = [StakeAccount::SEED, creator.key().as_ref()],
        bump = creator_stake.bump,
        constraint = creator_stake.is_pool_creator @ CreatePoolError::NotPoolCreator,
    )]
    pub creator_stake: Account<'info, StakeAccount>,

    /// The new pool. A duplicate pool_id fails here at init.
    #[account(
        init,
        payer = creator,
        space = 8 + Pool::INIT_SPACE,
        seeds = [Pool::SEED, pool_id.to_le_bytes().as_ref()],
        bump,
    )]
    pub pool: Account<'info, Pool>,

    /// The paired market book, created together with the pool.
    #[account(
        init,
        payer = creator,
        space = 8 + OptionGroup::INIT_SPACE,
        seeds = [OptionGroup::SEED, pool_id.to_le_bytes().as_ref()],
        bump,
    )]
    pub group: Account<'info, OptionGroup>,

    #[account(
        constraint = collateral_mint.key() == config.collateral_mint @ CreatePoolError::WrongMint,
    )]
    pub collateral_mint: InterfaceAccount<'info, Mint>,

    /// Creator's collateral account (pays the creation fee)
    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = creator,
    )]
    pub creator_collateral: InterfaceAccount<'info, TokenAccount>,

    /// CHECK: fee destination, must match the configured treasury
    #[account(constraint = treasury.key() == config.treasury @ CreatePoolError::WrongTreasury)]
    pub treasury: UncheckedAccount<'info>,

    /// Treasury's collateral account
    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = treasury,
    )]
    pub treasury_collateral: InterfaceAccount<'info, TokenAccount>,

    /// Group's collateral vault (holds liquidity and bets)
    #[account(
        init,
        payer = creator,
        associated_token::mint = collateral_mint,
        associated_token::authority = group,
    )]
    pub vault: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> CreatePool<'info> {
    pub fn create_pool(
        &mut self,
        pool_id: u64,
        title: String,
        data: String,
        start_timeframe: i64,
        settle_timeframe: i64,
        bumps: CreatePoolBumps,
    ) -> Result<()> {
        require!(!self.config.paused, CreatePoolError::ProtocolPaused);
        require!(title.len() <= MAX_TITLE_LEN, CreatePoolError::TitleTooLong);
        require!(data.len() <= MAX_DATA_LEN, CreatePoolError::DataTooLong);

        // Fails with InvalidRange when settle <= start.
        let schedule = PhaseSchedule::derive(
            &self.config.bonding,
            start_timeframe,
            settle_timeframe,
        )?;

        // Creation fee to the treasury.
        let fee = self.config.bonding.pool_creation_fee;
        if fee > 0 {
            transfer_checked(
                CpiContext::new(
                    self.token_program.to_account_info(),
                    TransferChecked {
                        from: self.creator_collateral.to_account_info(),
                        mint: self.collateral_mint.to_account_info(),
                        to: self.treasury_collateral.to_account_info(),
                        authority: self.creator.to_account_info(),
                    },
                ),
                fee,
                self.collateral_mint.decimals,
            )?;
        }

        self.pool.set_inner(Pool {
            pool_id,
            creator: self.creator.key(),
            title: title.clone(),
            data,
            start_timeframe,
            settle_timeframe,
            evaluation_start: schedule.evaluation_start,
            evaluation_end: schedule.evaluation_end,
            option_voting_start: schedule.option_voting_start,
            option_voting_end: schedule.option_voting_end,
            dispute_end: schedule.dispute_end,
            options: Vec::new(),
            approve_votes: 0,
            reject_votes: 0,
            evaluation_complete: false,
            approved: false,
            option_vote_counts: Vec::new(),
            option_vote_cap: self.config.bonding.initial_per_option_cap,
            dispute_approve_votes: 0,
            dispute_reject_votes: 0,
            dispute_option_counts: Vec::new(),
            dispute_option_cap: self.config.bonding.initial_per_option_cap,
            processed: false,
            processed_time: 0,
            final_approval: false,
            winning_option: 0,
            dispute_round: 0,
            canceled: false,
            frozen_validators: 0,
            bump: bumps.pool,
        });

        self.group.set_inner(OptionGroup {
            pool_id,
            liquidity: Vec::new(),
            total_volume: Vec::new(),
            bootstrapped: false,
            paid_out: 0,
            settling: false,
            bump: bumps.group,
        });

        emit!(PoolCreated {
            pool_id,
            creator: self.creator.key(),
            title,
            start_timeframe,
            settle_timeframe,
            evaluation_start: schedule.evaluation_start,
            dispute_end: schedule.dispute_end,
        });

        Ok(())
    }
}

#[error_code]
pub enum CreatePoolError {
    #[msg("Protocol is paused")]
    ProtocolPaused,
    #[msg("Caller does not hold the pool-creator role")]
    NotPoolCreator,
    #[msg("Title exceeds maximum length")]
    TitleTooLong,
    #[msg("Descriptor exceeds maximum length")]
    DataTooLong,
    #[msg("Collateral mint does not match config")]
    WrongMint,
    #[msg("Treasury does not match config")]
    WrongTreasury,
}
