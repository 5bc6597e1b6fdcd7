//! Early Exit
//!
//! Unwinds a position before the verdict at fair value: the locked potential
//! payout weighted by the option's current liquidity share, minus the early
//! exit fee. The position and the book are committed before any collateral
//! leaves the vault, and the group's settlement guard is held across the
//! operation.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::amm::{apply_fee, early_exit_value};
use crate::state::{Config, OptionGroup, Pool, Position};

#[event]
pub struct PositionExited {
    pub pool_id: u64,
    pub bettor: Pubkey,
    pub option_index: u32,
    pub amount_unwound: u64,
    pub value_paid: u64,
    pub fee: u64,
}

#[derive(Accounts)]
pub struct EarlyExit<'info> {
    #[account(mut)]
    pub bettor: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(
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
        mut,
        seeds = [
            Position::SEED,
            pool.pool_id.to_le_bytes().as_ref(),
            bettor.key().as_ref(),
            position.option_index.to_le_bytes().as_ref(),
        ],
        bump = position.bump,
        constraint = position.bettor == bettor.key() @ EarlyExitError::NotPositionOwner,
    )]
    pub position: Account<'info, Position>,

    #[account(
        constraint = collateral_mint.key() == config.collateral_mint @ EarlyExitError::WrongMint,
    )]
    pub collateral_mint: InterfaceAccount<'info, Mint>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = bettor,
    )]
    pub bettor_collateral: InterfaceAccount<'info, TokenAccount>,

    /// CHECK: fee destination, must match the configured treasury
    #[account(constraint = treasury.key() == config.treasury @ EarlyExitError::WrongTreasury)]
    pub treasury: UncheckedAccount<'info>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = treasury,
    )]
    pub treasury_collateral: InterfaceAccount<'info, TokenAccount>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = group,
    )]
    pub vault: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> EarlyExit<'info> {
    pub fn early_exit(&mut self) -> Result<()> {
        require!(!self.config.paused, EarlyExitError::ProtocolPaused);
        require!(!self.group.settling, EarlyExitError::SettlementInProgress);
        require!(!self.pool.processed, EarlyExitError::AlreadyProcessed);
        require!(!self.pool.canceled, EarlyExitError::PoolCanceled);
        require!(self.position.amount > 0, EarlyExitError::EmptyPosition);

        self.group.settling = true;

        let i = self.position.option_index as usize;
        let pre_fee = early_exit_value(
            self.position.amount,
            self.position.locked_odds,
            self.group.liquidity[i],
            self.group.total_liquidity(),
        )?;
        // Zero here means the option's backing liquidity is drained; the
        // position keeps its settlement claim instead of exiting for nothing.
        require!(pre_fee > 0, EarlyExitError::NoExitValue);

        let (net, fee) = apply_fee(pre_fee, self.config.market.early_exit_fee_bps)?;

        // Commit state before moving collateral.
        let unwound = self.position.amount;
        self.group.liquidity[i] = self.group.liquidity[i].saturating_sub(unwound);
        self.group.paid_out = self.group.paid_out.saturating_add(pre_fee);
        self.position.amount = 0;
        self.position.settled = true;

        let pool_id_bytes = self.pool.pool_id.to_le_bytes();
        let group_seeds = &[
            OptionGroup::SEED,
            pool_id_bytes.as_ref(),
            &[self.group.bump],
        ];
        let signer = &[&group_seeds[..]];

        transfer_checked(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.vault.to_account_info(),
                    mint: self.collateral_mint.to_account_info(),
                    to: self.bettor_collateral.to_account_info(),
                    authority: self.group.to_account_info(),
                },
                signer,
            ),
            net,
            self.collateral_mint.decimals,
        )?;
        if fee > 0 {
            transfer_checked(
                CpiContext::new_with_signer(
                    self.token_program.to_account_info(),
                    TransferChecked {
                        from: self.vault.to_account_info(),
                        mint: self.collateral_mint.to_account_info(),
                        to: self.treasury_collateral.to_account_info(),
                        authority: self.group.to_account_info(),
                    },
                    signer,
                ),
                fee,
                self.collateral_mint.decimals,
            )?;
        }

        self.group.settling = false;

        emit!(PositionExited {
            pool_id: self.pool.pool_id,
            bettor: self.bettor.key(),
            option_index: self.position.option_index,
            amount_unwound: unwound,
            value_paid: net,
            fee,
        });

        Ok(())
    }
}

#[error_code]
pub enum EarlyExitError {
    #[msg("Protocol is paused")]
    ProtocolPaused,
    #[msg("Another settlement is in progress for this group")]
    SettlementInProgress,
    #[msg("Pool is already processed; claim the payout instead")]
    AlreadyProcessed,
    #[msg("Pool is canceled; reclaim principal instead")]
    PoolCanceled,
    #[msg("Position has no outstanding stake")]
    EmptyPosition,
    #[msg("Option liquidity is drained; hold to settlement")]
    NoExitValue,
    #[msg("Caller does not own this position")]
    NotPositionOwner,
    #[msg("Collateral mint does not match config")]
    WrongMint,
    #[msg("Treasury does not match config")]
    WrongTreasury,
}
