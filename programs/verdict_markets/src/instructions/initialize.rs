//! Protocol Initialization
//!
//! Creates the global configuration singleton. Called once at deployment;
//! every later change goes through the admin instructions, which re-validate
//! the same bounds.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::Mint;

use crate::state::{BondingParams, Config, MarketParams};

#[event]
pub struct ProtocolInitialized {
    pub admin: Pubkey,
    pub treasury: Pubkey,
    pub collateral_mint: Pubkey,
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Protocol administrator (becomes the admin)
    #[account(mut)]
    pub admin: Signer<'info>,

    /// Global configuration account (created)
    #[account(
        init,
        payer = admin,
        space = 8 + Config::INIT_SPACE,
        seeds = [Config::SEED],
        bump,
    )]
    pub config: Account<'info, Config>,

    /// Collateral token mint (the Ledger asset, e.g. USDC)
    pub collateral_mint: InterfaceAccount<'info, Mint>,

    /// CHECK: fee-collecting wallet, recorded only
    pub treasury: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

impl<'info> Initialize<'info> {
    pub fn initialize(
        &mut self,
        bonding: BondingParams,
        market: MarketParams,
        bumps: InitializeBumps,
    ) -> Result<()> {
        require!(bonding.validate(), InitializeError::InvalidBondingParams);
        require!(market.validate(), InitializeError::InvalidMarketParams);

        self.config.set_inner(Config {
            admin: self.admin.key(),
            treasury: self.treasury.key(),
            collateral_mint: self.collateral_mint.key(),
            bonding,
            market,
            version: 1,
            paused: false,
            bump: bumps.config,
        });

        emit!(ProtocolInitialized {
            admin: self.admin.key(),
            treasury: self.treasury.key(),
            collateral_mint: self.collateral_mint.key(),
        });

        msg!("Protocol initialized, admin: {}", self.admin.key());

        Ok(())
    }
}

#[error_code]
pub enum InitializeError {
    #[msg("Bonding parameters fail validation")]
    InvalidBondingParams,
    #[msg("Market parameters fail validation")]
    InvalidMarketParams,
}
