//! Liquidity Provision
//!
//! Open only before the pool's betting window starts. Deposits are spread
//! across the book pro-rata (evenly when the book is empty) and the
//! distributed sum always equals the deposit exactly.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::amm::spread_liquidity;
use crate::state::{Config, OptionGroup, Pool};

#[event]
pub struct LiquidityAdded {
    pub pool_id: u64,
    pub provider: Pubkey,
    pub amount: u64,
    pub total_liquidity: u64,
}

#[derive(Accounts)]
pub struct AddLiquidity<'info> {
    #[account(mut)]
    pub provider: Signer<'info>,

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
        constraint = collateral_mint.key() == config.collateral_mint @ AddLiquidityError::WrongMint,
    )]
    pub collateral_mint: InterfaceAccount<'info, Mint>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = provider,
    )]
    pub provider_collateral: InterfaceAccount<'info, TokenAccount>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = group,
    )]
    pub vault: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> AddLiquidity<'info> {
    pub fn add_liquidity(&mut self, amount: u64) -> Result<()> {
        require!(!self.config.paused, AddLiquidityError::ProtocolPaused);
        require!(!self.pool.canceled, AddLiquidityError::PoolCanceled);
        require!(
            !self.group.liquidity.is_empty(),
            AddLiquidityError::OptionsNotSet
        );

        let now = Clock::get()?.unix_timestamp;
        require!(
            now < self.pool.start_timeframe,
            AddLiquidityError::PoolAlreadyStarted
        );

        transfer_checked(
            CpiContext::new(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.provider_collateral.to_account_info(),
                    mint: self.collateral_mint.to_account_info(),
                    to: self.vault.to_account_info(),
                    authority: self.provider.to_account_info(),
                },
            ),
            amount,
            self.collateral_mint.decimals,
        )?;

        spread_liquidity(&mut self.group.liquidity, amount)?;
        self.group.bootstrapped = true;

        emit!(LiquidityAdded {
            pool_id: self.pool.pool_id,
            provider: self.provider.key(),
            amount,
            total_liquidity: self.group.total_liquidity(),
        });

        Ok(())
    }
}

#[error_code]
pub enum AddLiquidityError {
    #[msg("Protocol is paused")]
    ProtocolPaused,
    #[msg("Pool is canceled")]
    PoolCanceled,
    #[msg("Options are not set for this pool")]
    OptionsNotSet,
    #[msg("Betting window already started")]
    PoolAlreadyStarted,
    #[msg("Collateral mint does not match config")]
    WrongMint,
}
