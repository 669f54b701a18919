use anchor_lang::prelude::*;
use anchor_spl::token::{self, Transfer};

use crate::constants::*;
use crate::errors::VaultError;
use crate::state::{ConfigState, ProtocolPosition, StakingPoolState, VaultConfig, VaultState};

pub mod lending;
pub mod liquidity;
pub mod staking;

pub use lending::{LendingAction, LendingAdapter};
pub use liquidity::{LiquidityAction, LiquidityAdapter};
pub use staking::{StakingAction, StakingAdapter};

/// Protocol slots a vault may lend through
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProtocolType {
    /// Long-tail lending pools, several approved per vault
    Lending = 0,
    /// Single shared liquidity pool
    Liquidity = 1,
    /// Liquid-staking pool with an asynchronous exit flow
    Staking = 2,
}

impl ProtocolType {
    pub const ALL: [ProtocolType; PROTOCOL_COUNT] = [
        ProtocolType::Lending,
        ProtocolType::Liquidity,
        ProtocolType::Staking,
    ];
}

impl TryFrom<u8> for ProtocolType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(ProtocolType::Lending),
            1 => Ok(ProtocolType::Liquidity),
            2 => Ok(ProtocolType::Staking),
            _ => err!(VaultError::InvalidProtocolType),
        }
    }
}

/// One entry of a protocol action batch. The payload is opaque to the
/// dispatcher and decoded by the adapter bound to the slot.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct ProtocolAction {
    pub protocol: ProtocolType,
    pub data: Vec<u8>,
}

/// Capability set every protocol adapter provides
pub trait ProtocolAdapter {
    /// Decodes the opaque payload and applies it against the vault's own
    /// accounting, returning the asset amount moved
    fn execute(ctx: &mut AdapterContext, data: &[u8]) -> Result<u64>;

    /// Lent amount the protocol reports for one of the vault's positions
    fn lent_amount(position: &ProtocolPosition) -> Result<u64>;
}

/// Shared mutable accounting context handed to adapters
///
/// Carries the vault's own balances and config by reference, so adapter
/// effects land directly in vault state, plus the account tail of the current
/// action consumed in order from `remaining_accounts`.
pub struct AdapterContext<'a, 'info> {
    pub vault_key: Pubkey,
    pub vault_state: &'a mut Account<'info, VaultState>,
    pub vault_config: &'a mut Account<'info, VaultConfig>,
    pub config: &'a Account<'info, ConfigState>,
    pub vault_authority: AccountInfo<'info>,
    pub vault_token_account: AccountInfo<'info>,
    pub market_authority: AccountInfo<'info>,
    pub token_program: AccountInfo<'info>,
    remaining: &'info [AccountInfo<'info>],
    cursor: usize,
}

impl<'a, 'info> AdapterContext<'a, 'info> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        vault_key: Pubkey,
        vault_state: &'a mut Account<'info, VaultState>,
        vault_config: &'a mut Account<'info, VaultConfig>,
        config: &'a Account<'info, ConfigState>,
        vault_authority: AccountInfo<'info>,
        vault_token_account: AccountInfo<'info>,
        market_authority: AccountInfo<'info>,
        token_program: AccountInfo<'info>,
        remaining: &'info [AccountInfo<'info>],
    ) -> Self {
        Self {
            vault_key,
            vault_state,
            vault_config,
            config,
            vault_authority,
            vault_token_account,
            market_authority,
            token_program,
            remaining,
            cursor: 0,
        }
    }

    fn next_account(&mut self) -> Result<&'info AccountInfo<'info>> {
        let remaining = self.remaining;
        let account = remaining
            .get(self.cursor)
            .ok_or(error!(VaultError::MissingAdapterAccounts))?;
        self.cursor += 1;
        Ok(account)
    }

    /// Loads the vault's position for `market`, verifying its identity
    pub fn next_position(
        &mut self,
        market: &Pubkey,
        protocol: ProtocolType,
    ) -> Result<Account<'info, ProtocolPosition>> {
        let info = self.next_account()?;
        let position: Account<'info, ProtocolPosition> = Account::try_from(info)?;
        require_keys_eq!(position.vault, self.vault_key, VaultError::WrongPosition);
        require_keys_eq!(position.market, *market, VaultError::WrongPosition);
        require!(
            position.protocol == protocol as u8,
            VaultError::WrongPosition
        );
        Ok(position)
    }

    /// Loads the staking state of `market`
    pub fn next_staking_state(
        &mut self,
        market: &Pubkey,
    ) -> Result<Account<'info, StakingPoolState>> {
        let info = self.next_account()?;
        let staking_state: Account<'info, StakingPoolState> = Account::try_from(info)?;
        require_keys_eq!(staking_state.market, *market, VaultError::WrongMarket);
        Ok(staking_state)
    }

    /// Loads the market's liquidity token account, verifying its derivation
    pub fn next_market_token_account(&mut self, market: &Pubkey) -> Result<AccountInfo<'info>> {
        let info = self.next_account()?;
        let (expected, _) = Pubkey::find_program_address(
            &[
                MARKET_VAULT_SEED,
                market.as_ref(),
                self.vault_state.asset_mint.as_ref(),
            ],
            &crate::ID,
        );
        require_keys_eq!(*info.key, expected, VaultError::WrongMarket);
        Ok(info.clone())
    }

    /// Moves assets out of the vault into a market's liquidity account
    pub fn transfer_to_market(
        &self,
        market_token_account: &AccountInfo<'info>,
        amount: u64,
    ) -> Result<()> {
        let asset_mint = self.vault_state.asset_mint;
        let authority_seeds: &[&[u8]] = &[
            VAULT_AUTHORITY_SEED,
            asset_mint.as_ref(),
            &[self.vault_state.authority_bump],
        ];
        let signer_seeds = &[&authority_seeds[..]];
        token::transfer(
            CpiContext::new_with_signer(
                self.token_program.clone(),
                Transfer {
                    from: self.vault_token_account.clone(),
                    to: market_token_account.clone(),
                    authority: self.vault_authority.clone(),
                },
                signer_seeds,
            ),
            amount,
        )
    }

    /// Moves assets from a market's liquidity account back into the vault
    pub fn transfer_from_market(
        &self,
        market_token_account: &AccountInfo<'info>,
        amount: u64,
    ) -> Result<()> {
        let authority_seeds: &[&[u8]] = &[
            MARKET_AUTHORITY_SEED,
            &[self.config.market_authority_bump],
        ];
        let signer_seeds = &[&authority_seeds[..]];
        token::transfer(
            CpiContext::new_with_signer(
                self.token_program.clone(),
                Transfer {
                    from: market_token_account.clone(),
                    to: self.vault_token_account.clone(),
                    authority: self.market_authority.clone(),
                },
                signer_seeds,
            ),
            amount,
        )
    }
}

/// Dispatches one action to the adapter bound to its protocol slot
pub fn dispatch(ctx: &mut AdapterContext, action: &ProtocolAction) -> Result<u64> {
    // fails with AdapterIsNotSet when the slot was never bound
    ctx.vault_state.adapter(action.protocol)?;

    match action.protocol {
        ProtocolType::Lending => LendingAdapter::execute(ctx, &action.data),
        ProtocolType::Liquidity => LiquidityAdapter::execute(ctx, &action.data),
        ProtocolType::Staking => StakingAdapter::execute(ctx, &action.data),
    }
}

/// Lent amount a position reports, routed through the owning adapter
pub fn reported_lent_amount(position: &ProtocolPosition) -> Result<u64> {
    match ProtocolType::try_from(position.protocol)? {
        ProtocolType::Lending => LendingAdapter::lent_amount(position),
        ProtocolType::Liquidity => LiquidityAdapter::lent_amount(position),
        ProtocolType::Staking => StakingAdapter::lent_amount(position),
    }
}
