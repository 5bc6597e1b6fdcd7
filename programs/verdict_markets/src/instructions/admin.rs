//! Administrative surface
//!
//! Config updates, delegate authorization, ownership transfer, the pause
//! circuit breaker, stake-registry writes, and pool cancellation. Privileged
//! callers are either the admin or an address holding an authorized flag;
//! both bonding and market parameter blocks are replaced atomically and
//! re-validated at this boundary.

use anchor_lang::prelude::*;

use crate::state::{AuthorizedAddress, BondingParams, Config, MarketParams, Pool, StakeAccount};

#[event]
pub struct ConfigUpdated {
    pub version: u64,
    pub updated_by: Pubkey,
}

#[event]
pub struct AuthorizedAddressUpdated {
    pub address: Pubkey,
    pub authorized: bool,
}

#[event]
pub struct AdminTransferred {
    pub old_admin: Pubkey,
    pub new_admin: Pubkey,
}

#[event]
pub struct PauseChanged {
    pub paused: bool,
}

#[event]
pub struct StakeRoleUpdated {
    pub owner: Pubkey,
    pub amount: u64,
    pub is_validator: bool,
    pub is_pool_creator: bool,
    pub is_evaluator: bool,
}

#[event]
pub struct PoolCanceled {
    pub pool_id: u64,
    pub canceled_by: Pubkey,
}

#[error_code]
pub enum AdminError {
    #[msg("Caller is neither admin nor an authorized address")]
    Unauthorized,
    #[msg("Parameters fail validation")]
    InvalidParams,
    #[msg("Pool is already processed or canceled")]
    NotCancelable,
}

/// Admin-or-delegate gate shared by the privileged instructions.
pub fn require_authorized(
    config: &Config,
    caller: &Pubkey,
    delegate: &Option<Account<AuthorizedAddress>>,
) -> Result<()> {
    if config.admin == *caller {
        return Ok(());
    }
    match delegate {
        Some(d) if d.address == *caller && d.authorized => Ok(()),
        _ => err!(AdminError::Unauthorized),
    }
}

#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    /// Present when the caller is a delegate rather than the admin.
    #[account(
        seeds = [AuthorizedAddress::SEED, authority.key().as_ref()],
        bump = delegate.bump,
    )]
    pub delegate: Option<Account<'info, AuthorizedAddress>>,
}

impl<'info> UpdateConfig<'info> {
    /// Replace the 14-field bonding tuple atomically.
    pub fn update_config(&mut self, bonding: BondingParams) -> Result<()> {
        require_authorized(&self.config, &self.authority.key(), &self.delegate)?;
        require!(bonding.validate(), AdminError::InvalidParams);

        self.config.bonding = bonding;
        self.config.version += 1;

        emit!(ConfigUpdated {
            version: self.config.version,
            updated_by: self.authority.key(),
        });
        Ok(())
    }

    pub fn update_market_params(&mut self, market: MarketParams) -> Result<()> {
        require_authorized(&self.config, &self.authority.key(), &self.delegate)?;
        require!(market.validate(), AdminError::InvalidParams);

        self.config.market = market;
        self.config.version += 1;

        emit!(ConfigUpdated {
            version: self.config.version,
            updated_by: self.authority.key(),
        });
        Ok(())
    }
}

#[derive(Accounts)]
pub struct AdminOnly<'info> {
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [Config::SEED],
        bump = config.bump,
        constraint = config.admin == admin.key() @ AdminError::Unauthorized,
    )]
    pub config: Account<'info, Config>,
}

impl<'info> AdminOnly<'info> {
    pub fn transfer_admin(&mut self, new_admin: Pubkey) -> Result<()> {
        let old_admin = self.config.admin;
        self.config.admin = new_admin;
        emit!(AdminTransferred {
            old_admin,
            new_admin,
        });
        Ok(())
    }

    pub fn set_pause(&mut self, paused: bool) -> Result<()> {
        self.config.paused = paused;
        emit!(PauseChanged { paused });
        Ok(())
    }
}

#[derive(Accounts)]
#[instruction(address: Pubkey)]
pub struct UpdateAuthorizedAddress<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
        constraint = config.admin == admin.key() @ AdminError::Unauthorized,
    )]
    pub config: Account<'info, Config>,

    #[account(
        init_if_needed,
        payer = admin,
        space = 8 + AuthorizedAddress::INIT_SPACE,
        seeds = [AuthorizedAddress::SEED, address.as_ref()],
        bump,
    )]
    pub authorized_address: Account<'info, AuthorizedAddress>,

    pub system_program: Program<'info, System>,
}

impl<'info> UpdateAuthorizedAddress<'info> {
    pub fn update_authorized_address(
        &mut self,
        address: Pubkey,
        status: bool,
        bumps: UpdateAuthorizedAddressBumps,
    ) -> Result<()> {
        self.authorized_address.set_inner(AuthorizedAddress {
            address,
            authorized: status,
            bump: bumps.authorized_address,
        });

        emit!(AuthorizedAddressUpdated {
            address,
            authorized: status,
        });
        Ok(())
    }
}

#[derive(Accounts)]
#[instruction(owner: Pubkey)]
pub struct SetStakeRole<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(
        seeds = [AuthorizedAddress::SEED, authority.key().as_ref()],
        bump = delegate.bump,
    )]
    pub delegate: Option<Account<'info, AuthorizedAddress>>,

    #[account(
        init_if_needed,
        payer = authority,
        space = 8 + StakeAccount::INIT_SPACE,
        seeds = [StakeAccount::SEED, owner.as_ref()],
        bump,
    )]
    pub stake: Account<'info, StakeAccount>,

    pub system_program: Program<'info, System>,
}

impl<'info> SetStakeRole<'info> {
    /// Registry write surface: records roles and the staked amount the
    /// engines read. Freeze counters are owned by the engines and survive
    /// role updates.
    pub fn set_stake_role(
        &mut self,
        owner: Pubkey,
        amount: u64,
        is_validator: bool,
        is_pool_creator: bool,
        is_evaluator: bool,
        bumps: SetStakeRoleBumps,
    ) -> Result<()> {
        require_authorized(&self.config, &self.authority.key(), &self.delegate)?;

        let frozen_pools = self.stake.frozen_pools;
        self.stake.set_inner(StakeAccount {
            owner,
            amount,
            is_validator,
            is_pool_creator,
            is_evaluator,
            frozen_pools,
            bump: bumps.stake,
        });

        emit!(StakeRoleUpdated {
            owner,
            amount,
            is_validator,
            is_pool_creator,
            is_evaluator,
        });
        Ok(())
    }
}

#[derive(Accounts)]
pub struct CancelPool<'info> {
    pub authority: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(
        seeds = [AuthorizedAddress::SEED, authority.key().as_ref()],
        bump = delegate.bump,
    )]
    pub delegate: Option<Account<'info, AuthorizedAddress>>,

    #[account(
        mut,
        seeds = [Pool::SEED, pool.pool_id.to_le_bytes().as_ref()],
        bump = pool.bump,
    )]
    pub pool: Account<'info, Pool>,
}

impl<'info> CancelPool<'info> {
    /// Halts all further voting; the paired market switches to
    /// principal-reclaim mode.
    pub fn cancel_pool(&mut self) -> Result<()> {
        require_authorized(&self.config, &self.authority.key(), &self.delegate)?;
        require!(
            !self.pool.processed && !self.pool.canceled,
            AdminError::NotCancelable
        );

        self.pool.canceled = true;

        emit!(PoolCanceled {
            pool_id: self.pool.pool_id,
            canceled_by: self.authority.key(),
        });
        Ok(())
    }
}
