//! Settlement Claims
//!
//! Once the paired pool holds an immutable verdict, winning positions claim
//! their locked payout (platform fee deducted from the payout, never from
//! principal); positions in a canceled pool, or one whose approval was
//! overturned after bets were taken, reclaim principal fee-free; losing
//! positions get nothing. The claim flag is committed before collateral
//! moves and the group's settlement guard is held across the operation.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::amm::{apply_fee, potential_return};
use crate::state::{Config, OptionGroup, Pool, Position};

#[event]
pub struct PayoutClaimed {
    pub pool_id: u64,
    pub bettor: Pubkey,
    pub option_index: u32,
    pub payout: u64,
    pub fee: u64,
    pub principal_reclaim: bool,
}

#[derive(Accounts)]
pub struct ClaimPayout<'info> {
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
        constraint = position.bettor == bettor.key() @ ClaimPayoutError::NotPositionOwner,
    )]
    pub position: Account<'info, Position>,

    #[account(
        constraint = collateral_mint.key() == config.collateral_mint @ ClaimPayoutError::WrongMint,
    )]
    pub collateral_mint: InterfaceAccount<'info, Mint>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = bettor,
    )]
    pub bettor_collateral: InterfaceAccount<'info, TokenAccount>,

    /// CHECK: fee destination, must match the configured treasury
    #[account(constraint = treasury.key() == config.treasury @ ClaimPayoutError::WrongTreasury)]
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

impl<'info> ClaimPayout<'info> {
    pub fn claim_payout(&mut self) -> Result<()> {
        require!(!self.group.settling, ClaimPayoutError::SettlementInProgress);
        require!(
            self.pool.processed || self.pool.canceled,
            ClaimPayoutError::NotYetProcessed
        );
        require!(!self.position.settled, ClaimPayoutError::AlreadyClaimed);
        require!(self.position.amount > 0, ClaimPayoutError::EmptyPosition);

        self.group.settling = true;

        // A canceled pool, or an approval overturned by dispute after bets
        // were taken, settles as a fee-free principal reclaim.
        let principal_reclaim = self.pool.canceled || !self.pool.final_approval;

        let (gross, net, fee) = if principal_reclaim {
            (self.position.amount, self.position.amount, 0)
        } else if self.position.option_index == self.pool.winning_option {
            let payout = potential_return(self.position.amount, self.position.locked_odds)?;
            let (net, fee) = apply_fee(payout, self.config.market.platform_fee_bps)?;
            (payout, net, fee)
        } else {
            return err!(ClaimPayoutError::NothingToClaim);
        };

        // Commit before moving collateral. The gross payout leaves the book
        // so remaining-liquidity reads stay net of settlements.
        let i = self.position.option_index as usize;
        self.group.liquidity[i] = self.group.liquidity[i].saturating_sub(gross);
        self.position.amount = 0;
        self.position.settled = true;
        self.group.paid_out = self.group.paid_out.saturating_add(gross);

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

        emit!(PayoutClaimed {
            pool_id: self.pool.pool_id,
            bettor: self.bettor.key(),
            option_index: self.position.option_index,
            payout: net,
            fee,
            principal_reclaim,
        });

        Ok(())
    }
}

#[error_code]
pub enum ClaimPayoutError {
    #[msg("Another settlement is in progress for this group")]
    SettlementInProgress,
    #[msg("Pool verdict is not yet final")]
    NotYetProcessed,
    #[msg("Position already settled")]
    AlreadyClaimed,
    #[msg("Position has no outstanding stake")]
    EmptyPosition,
    #[msg("Position lost; nothing to claim")]
    NothingToClaim,
    #[msg("Caller does not own this position")]
    NotPositionOwner,
    #[msg("Collateral mint does not match config")]
    WrongMint,
    #[msg("Treasury does not match config")]
    WrongTreasury,
}
