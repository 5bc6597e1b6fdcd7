//! Option Set
//!
//! The ordered option list is written at most once, before evaluation
//! completes. Setting it sizes every per-option vector on both engines and,
//! when bootstrap liquidity is enabled, seeds the book evenly so the first
//! odds quote is 1.0000x across the board. Seed liquidity is real: it moves
//! from the protocol's own collateral vault into the group vault so the
//! book never promises payouts the vault cannot honor.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::constants::{MAX_OPTIONS, MAX_OPTION_NAME_LEN};
use crate::instructions::admin::require_authorized;
use crate::state::{AuthorizedAddress, Config, OptionGroup, Pool};

#[event]
pub struct OptionsSet {
    pub pool_id: u64,
    pub option_count: u32,
    pub bootstrap_liquidity: u64,
    pub bootstrap_funded: u64,
}

#[derive(Accounts)]
pub struct SetOptions<'info> {
    pub creator: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    /// Present when the caller is an authorized operator, not the creator.
    #[account(
        seeds = [AuthorizedAddress::SEED, creator.key().as_ref()],
        bump = delegate.bump,
    )]
    pub delegate: Option<Account<'info, AuthorizedAddress>>,

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
        constraint = collateral_mint.key() == config.collateral_mint @ SetOptionsError::WrongMint,
    )]
    pub collateral_mint: InterfaceAccount<'info, Mint>,

    /// Protocol-owned collateral that backs bootstrap liquidity.
    /// Required when bootstrap is enabled.
    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = config,
    )]
    pub protocol_vault: Option<InterfaceAccount<'info, TokenAccount>>,

    /// Group's collateral vault (receives the bootstrap funding)
    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = group,
    )]
    pub vault: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> SetOptions<'info> {
    pub fn set_options(&mut self, names: Vec<String>) -> Result<()> {
        if self.pool.creator != self.creator.key() {
            require_authorized(&self.config, &self.creator.key(), &self.delegate)
                .map_err(|_| SetOptionsError::NotCreator)?;
        }
        require!(!self.pool.canceled, SetOptionsError::PoolCanceled);
        require!(!self.pool.options_set(), SetOptionsError::OptionsAlreadySet);
        require!(!names.is_empty(), SetOptionsError::EmptyOptions);
        require!(names.len() <= MAX_OPTIONS, SetOptionsError::TooManyOptions);
        require!(
            names.iter().all(|n| n.len() <= MAX_OPTION_NAME_LEN),
            SetOptionsError::OptionNameTooLong
        );
        require!(
            !self.pool.evaluation_complete,
            SetOptionsError::EvaluationComplete
        );

        let n = names.len();
        self.pool.options = names;
        self.pool.option_vote_counts = vec![0; n];
        self.pool.dispute_option_counts = vec![0; n];

        self.group.total_volume = vec![0; n];
        let seed = if self.config.market.bootstrap_liquidity {
            self.config.market.default_option_liquidity
        } else {
            0
        };

        // Every seeded unit is collateralized before the book records it.
        let mut funded = 0u64;
        if seed > 0 {
            funded = seed
                .checked_mul(n as u64)
                .ok_or(SetOptionsError::Overflow)?;
            let protocol_vault = self
                .protocol_vault
                .as_ref()
                .ok_or(SetOptionsError::BootstrapVaultMissing)?;

            let config_seeds = &[Config::SEED, &[self.config.bump]];
            let signer = &[&config_seeds[..]];
            transfer_checked(
                CpiContext::new_with_signer(
                    self.token_program.to_account_info(),
                    TransferChecked {
                        from: protocol_vault.to_account_info(),
                        mint: self.collateral_mint.to_account_info(),
                        to: self.vault.to_account_info(),
                        authority: self.config.to_account_info(),
                    },
                    signer,
                ),
                funded,
                self.collateral_mint.decimals,
            )?;
        }

        self.group.liquidity = vec![seed; n];
        self.group.bootstrapped = seed > 0;

        emit!(OptionsSet {
            pool_id: self.pool.pool_id,
            option_count: n as u32,
            bootstrap_liquidity: seed,
            bootstrap_funded: funded,
        });

        Ok(())
    }
}

#[error_code]
pub enum SetOptionsError {
    #[msg("Only the pool creator or an authorized address may set options")]
    NotCreator,
    #[msg("Pool is canceled")]
    PoolCanceled,
    #[msg("Options are already set")]
    OptionsAlreadySet,
    #[msg("Option list is empty")]
    EmptyOptions,
    #[msg("Too many options")]
    TooManyOptions,
    #[msg("Option name exceeds maximum length")]
    OptionNameTooLong,
    #[msg("Evaluation already completed")]
    EvaluationComplete,
    #[msg("Collateral mint does not match config")]
    WrongMint,
    #[msg("Bootstrap is enabled but no protocol vault was supplied")]
    BootstrapVaultMissing,
    #[msg("Bootstrap funding amount overflows")]
    Overflow,
}
