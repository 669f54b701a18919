use anchor_lang::prelude::*;

use crate::adapters::ProtocolType;
use crate::constants::*;
use crate::errors::VaultError;
use crate::util::{mul_div, mul_div_ceil};

/// Vault state tracking depositor funds and external lending positions
///
/// Share price is defined by `total_assets() / share_mint.supply`:
/// invariant: total_assets() = free_amount + total_lent.
/// `free_amount` backs the vault token account; `total_lent` is a cache of
/// the amounts adapters report and is only authoritative right after
/// `update_total_lent`.
#[account]
#[derive(InitSpace)]
pub struct VaultState {
    /// Administrative principal, transferable via the two-step accept flow
    pub owner: Pubkey,
    pub pending_owner: Pubkey,

    /// Mint of the underlying asset token, fixed for life
    pub asset_mint: Pubkey,

    /// Mint of the vault share token
    pub share_mint: Pubkey,

    /// Config this vault was initialized against, fixed for life
    pub config_manager: Pubkey,

    #[max_len(MAX_LP_NAME_LEN)]
    pub lp_name: String,
    #[max_len(MAX_LP_SYMBOL_LEN)]
    pub lp_symbol: String,

    /// Idle assets held by the vault, available for immediate redemption
    pub free_amount: u64,

    /// Cached sum of lent amounts across all bound adapters
    pub total_lent: u64,

    /// Last-cached lent amount per protocol slot
    pub lent_amounts: [u64; PROTOCOL_COUNT],

    /// Anti-dust floor for deposits; the very first deposit is exempt
    pub min_deposit: u64,

    /// At most one adapter bound per protocol slot, default pubkey = unbound
    pub lending_adapters: [Pubkey; PROTOCOL_COUNT],

    /// Operationally privileged accounts, distinct from the owner
    #[max_len(MAX_VAULT_MANAGERS)]
    pub vault_managers: Vec<Pubkey>,

    pub schema_version: u16,

    pub bump: u8,
    pub share_bump: u8,
    pub authority_bump: u8,
}

impl VaultState {
    pub fn total_assets(&self) -> Result<u64> {
        self.free_amount
            .checked_add(self.total_lent)
            .ok_or(error!(VaultError::MathOverflow))
    }

    /// Assets to shares, rounding down; 1:1 on an empty or dried-out vault
    pub fn convert_to_shares(&self, assets: u64, total_supply: u64) -> Result<u64> {
        let total_assets = self.total_assets()?;
        if total_supply == 0 || total_assets == 0 {
            return Ok(assets);
        }
        mul_div(assets, total_supply, total_assets)
    }

    /// Shares to assets, rounding down
    pub fn convert_to_assets(&self, shares: u64, total_supply: u64) -> Result<u64> {
        if total_supply == 0 {
            return Ok(0);
        }
        mul_div(shares, self.total_assets()?, total_supply)
    }

    pub fn preview_deposit(&self, assets: u64, total_supply: u64) -> Result<u64> {
        self.convert_to_shares(assets, total_supply)
    }

    /// Assets required to mint `shares`, rounding up against the depositor
    pub fn preview_mint(&self, shares: u64, total_supply: u64) -> Result<u64> {
        let total_assets = self.total_assets()?;
        if total_supply == 0 || total_assets == 0 {
            return Ok(shares);
        }
        mul_div_ceil(shares, total_assets, total_supply)
    }

    /// Shares burned to withdraw `assets`, rounding up against the caller
    pub fn preview_withdraw(&self, assets: u64, total_supply: u64) -> Result<u64> {
        let total_assets = self.total_assets()?;
        if total_supply == 0 || total_assets == 0 {
            return Ok(assets);
        }
        mul_div_ceil(assets, total_supply, total_assets)
    }

    pub fn preview_redeem(&self, shares: u64, total_supply: u64) -> Result<u64> {
        self.convert_to_assets(shares, total_supply)
    }

    fn check_min_deposit(&self, assets: u64, total_supply: u64) -> Result<()> {
        // the very first deposit seeds the technical position and may be any size
        if total_supply > 0 {
            require_gte!(
                assets,
                self.min_deposit,
                VaultError::DepositLessThanMinDeposit
            );
        }
        Ok(())
    }

    /// Deposit accounting: validates guards, credits `free_amount` and
    /// returns the share amount to mint
    pub fn checked_deposit(
        &mut self,
        assets: u64,
        total_supply: u64,
        min_shares: Option<u64>,
    ) -> Result<u64> {
        require!(assets > 0, VaultError::ZeroDepositAmount);
        self.check_min_deposit(assets, total_supply)?;

        let shares = self.convert_to_shares(assets, total_supply)?;
        require!(shares > 0, VaultError::ZeroShares);
        if let Some(min_shares) = min_shares {
            require_gte!(shares, min_shares, VaultError::TooMuchSlippage);
        }

        self.free_amount = self
            .free_amount
            .checked_add(assets)
            .ok_or(VaultError::MathOverflow)?;
        Ok(shares)
    }

    /// Mint accounting: validates guards, credits `free_amount` and returns
    /// the asset amount to collect (rounded up)
    pub fn checked_mint(
        &mut self,
        shares: u64,
        total_supply: u64,
        max_assets: Option<u64>,
    ) -> Result<u64> {
        require!(shares > 0, VaultError::ZeroShares);

        let assets = self.preview_mint(shares, total_supply)?;
        require!(assets > 0, VaultError::ZeroAssets);
        self.check_min_deposit(assets, total_supply)?;
        if let Some(max_assets) = max_assets {
            require_gte!(max_assets, assets, VaultError::TooMuchSlippage);
        }

        self.free_amount = self
            .free_amount
            .checked_add(assets)
            .ok_or(VaultError::MathOverflow)?;
        Ok(assets)
    }

    /// Withdraw accounting: validates the owner entitlement and free
    /// liquidity, debits `free_amount` and returns the shares to burn
    pub fn checked_withdraw(
        &mut self,
        assets: u64,
        total_supply: u64,
        owner_balance: u64,
        max_shares: Option<u64>,
    ) -> Result<u64> {
        require!(assets > 0, VaultError::ZeroAssets);

        let max_withdraw = self.convert_to_assets(owner_balance, total_supply)?;
        require_gte!(max_withdraw, assets, VaultError::ExceededMaxWithdraw);

        let shares = self.preview_withdraw(assets, total_supply)?;
        require!(shares > 0, VaultError::ZeroShares);
        if let Some(max_shares) = max_shares {
            require_gte!(max_shares, shares, VaultError::TooMuchSlippage);
        }

        require_gte!(self.free_amount, assets, VaultError::InsufficientFreeAmount);
        self.free_amount -= assets;
        Ok(shares)
    }

    /// Redeem accounting: validates the owner entitlement and free
    /// liquidity, debits `free_amount` and returns the assets to pay out
    pub fn checked_redeem(
        &mut self,
        shares: u64,
        total_supply: u64,
        owner_balance: u64,
        min_assets: Option<u64>,
    ) -> Result<u64> {
        require!(shares > 0, VaultError::ZeroShares);
        require_gte!(owner_balance, shares, VaultError::ExceededMaxRedeem);

        let assets = self.convert_to_assets(shares, total_supply)?;
        require!(assets > 0, VaultError::ZeroAssets);
        if let Some(min_assets) = min_assets {
            require_gte!(assets, min_assets, VaultError::TooMuchSlippage);
        }

        require_gte!(self.free_amount, assets, VaultError::InsufficientFreeAmount);
        self.free_amount -= assets;
        Ok(assets)
    }

    /// Last-cached lent amount for a protocol slot
    pub fn lent_amount(&self, protocol: ProtocolType) -> u64 {
        self.lent_amounts[protocol as usize]
    }

    /// Adapter bound to a protocol slot
    pub fn adapter(&self, protocol: ProtocolType) -> Result<Pubkey> {
        let adapter = self.lending_adapters[protocol as usize];
        require_keys_neq!(adapter, Pubkey::default(), VaultError::AdapterIsNotSet);
        Ok(adapter)
    }

    pub fn set_adapter(&mut self, protocol: ProtocolType, adapter: Pubkey) -> Result<()> {
        require_keys_neq!(adapter, Pubkey::default(), VaultError::ZeroAddress);
        self.lending_adapters[protocol as usize] = adapter;
        Ok(())
    }

    /// Moves idle assets into a protocol's lent cache
    pub fn move_free_to_lent(&mut self, protocol: ProtocolType, amount: u64) -> Result<()> {
        require_gte!(self.free_amount, amount, VaultError::InsufficientFreeAmount);
        self.free_amount -= amount;
        let slot = &mut self.lent_amounts[protocol as usize];
        *slot = slot.checked_add(amount).ok_or(VaultError::MathOverflow)?;
        self.total_lent = self
            .total_lent
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }

    /// Moves lent assets back into `free_amount`. The lent caches may lag the
    /// adapter report after external accrual, so they saturate at zero and are
    /// reconciled by `update_total_lent`.
    pub fn move_lent_to_free(&mut self, protocol: ProtocolType, amount: u64) -> Result<()> {
        self.free_amount = self
            .free_amount
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        let slot = &mut self.lent_amounts[protocol as usize];
        *slot = slot.saturating_sub(amount);
        self.total_lent = self.total_lent.saturating_sub(amount);
        Ok(())
    }

    /// Overwrites the lent caches with freshly queried per-protocol sums
    pub fn set_lent_amounts(&mut self, lent_amounts: [u64; PROTOCOL_COUNT]) -> Result<()> {
        let mut total: u64 = 0;
        for amount in lent_amounts {
            total = total.checked_add(amount).ok_or(VaultError::MathOverflow)?;
        }
        self.lent_amounts = lent_amounts;
        self.total_lent = total;
        Ok(())
    }

    pub fn is_vault_manager(&self, key: &Pubkey) -> bool {
        self.vault_managers.iter().any(|manager| manager == key)
    }

    /// Enumerable role set: add or remove a vault manager
    pub fn set_vault_manager(&mut self, manager: Pubkey, enabled: bool) -> Result<()> {
        if enabled {
            if self.is_vault_manager(&manager) {
                return Ok(());
            }
            require!(
                self.vault_managers.len() < MAX_VAULT_MANAGERS,
                VaultError::VaultManagersLimitReached
            );
            self.vault_managers.push(manager);
        } else if let Some(index) = self.vault_managers.iter().position(|m| *m == manager) {
            self.vault_managers.swap_remove(index);
        }
        Ok(())
    }

    /// Walks the schema forward to the current version, one step at a time.
    /// Returns the version migrated from.
    pub fn migrate_schema(&mut self) -> Result<u16> {
        require!(
            self.schema_version != VAULT_SCHEMA_VERSION,
            VaultError::AlreadyMigrated
        );
        require!(
            self.schema_version < VAULT_SCHEMA_VERSION,
            VaultError::UnknownSchemaVersion
        );
        let from_version = self.schema_version;
        while self.schema_version < VAULT_SCHEMA_VERSION {
            match self.schema_version {
                // version 0 predates the per-protocol lent caches; zero them
                // and let update_total_lent rebuild
                0 => {
                    self.lent_amounts = [0; PROTOCOL_COUNT];
                    self.schema_version = 1;
                }
                _ => return err!(VaultError::UnknownSchemaVersion),
            }
        }
        Ok(from_version)
    }
}

/// FIFO ledger of redemption requests deferred due to insufficient free
/// liquidity. Cursors are monotonic: a request's id is its creation index and
/// finalization always resolves the request at `start_index`.
#[account]
#[derive(InitSpace)]
pub struct WithdrawQueue {
    pub vault: Pubkey,
    /// Request id of the head, next to finalize
    pub start_index: u64,
    /// Request id assigned to the next created request
    pub end_index: u64,
    #[max_len(MAX_WITHDRAW_REQUESTS)]
    pub entries: Vec<WithdrawRequest>,
    pub bump: u8,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, InitSpace)]
pub struct WithdrawRequest {
    pub owner: Pubkey,
    pub shares: u64,
}

/// Result of finalizing the head of the withdraw queue
#[derive(Debug)]
pub struct FinalizedWithdraw {
    pub request_id: u64,
    pub owner: Pubkey,
    pub shares: u64,
    pub assets: u64,
}

impl WithdrawQueue {
    pub fn is_empty(&self) -> bool {
        self.start_index == self.end_index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Appends a request at `end_index`, returning its request id
    pub fn push(&mut self, owner: Pubkey, shares: u64) -> Result<u64> {
        require!(
            self.entries.len() < MAX_WITHDRAW_REQUESTS,
            VaultError::WithdrawQueueIsFull
        );
        let request_id = self.end_index;
        self.entries.push(WithdrawRequest { owner, shares });
        self.end_index = self
            .end_index
            .checked_add(1)
            .ok_or(VaultError::MathOverflow)?;
        Ok(request_id)
    }

    pub fn head(&self) -> Result<&WithdrawRequest> {
        require!(!self.is_empty(), VaultError::NoElementInQueue);
        Ok(&self.entries[0])
    }

    /// Resolves the head request against the vault's accounting. Fails
    /// without mutating state when `free_amount` does not cover the owed
    /// assets at the current share price.
    pub fn finalize(
        &mut self,
        vault_state: &mut VaultState,
        total_supply: u64,
    ) -> Result<FinalizedWithdraw> {
        let head = self.head()?;
        let assets = vault_state.convert_to_assets(head.shares, total_supply)?;
        require_gte!(
            vault_state.free_amount,
            assets,
            VaultError::InsufficientFreeAmount
        );

        let request_id = self.start_index;
        let request = self.entries.remove(0);
        self.start_index = self
            .start_index
            .checked_add(1)
            .ok_or(VaultError::MathOverflow)?;
        vault_state.free_amount -= assets;

        Ok(FinalizedWithdraw {
            request_id,
            owner: request.owner,
            shares: request.shares,
            assets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_vault(free_amount: u64, total_lent: u64) -> VaultState {
        VaultState {
            owner: Pubkey::default(),
            pending_owner: Pubkey::default(),
            asset_mint: Pubkey::default(),
            share_mint: Pubkey::default(),
            config_manager: Pubkey::default(),
            lp_name: String::new(),
            lp_symbol: String::new(),
            free_amount,
            total_lent,
            lent_amounts: [0; PROTOCOL_COUNT],
            min_deposit: 0,
            lending_adapters: [Pubkey::default(); PROTOCOL_COUNT],
            vault_managers: Vec::new(),
            schema_version: VAULT_SCHEMA_VERSION,
            bump: 0,
            share_bump: 0,
            authority_bump: 0,
        }
    }

    #[test]
    fn test_first_deposit_one_to_one() {
        let vault = mock_vault(0, 0);
        assert_eq!(vault.convert_to_shares(1000, 0).unwrap(), 1000);
        assert_eq!(vault.convert_to_shares(u64::MAX, 0).unwrap(), u64::MAX);
    }

    #[test]
    fn test_subsequent_deposit_with_profit() {
        // vault holds 2000 assets against 1000 shares
        let vault = mock_vault(500, 1500);
        assert_eq!(vault.convert_to_shares(500, 1000).unwrap(), 250);
    }

    #[test]
    fn test_convert_to_assets() {
        let vault = mock_vault(2000, 0);
        assert_eq!(vault.convert_to_assets(500, 1000).unwrap(), 1000);
        assert_eq!(vault.convert_to_assets(500, 0).unwrap(), 0);
    }

    #[test]
    fn test_preview_mint_rounds_up() {
        let vault = mock_vault(1001, 0);
        // 1 share is worth 1.001 assets, depositor owes 2
        assert_eq!(vault.preview_mint(1, 1000).unwrap(), 2);
        assert_eq!(vault.convert_to_assets(1, 1000).unwrap(), 1);
    }

    #[test]
    fn test_preview_withdraw_rounds_up() {
        let vault = mock_vault(1500, 0);
        // 100 assets cost ceil(100 * 1000 / 1500) = 67 shares
        assert_eq!(vault.preview_withdraw(100, 1000).unwrap(), 67);
    }

    #[test]
    fn test_min_deposit_waived_for_first_deposit() {
        let mut vault = mock_vault(0, 0);
        vault.min_deposit = 100;
        assert!(vault.checked_deposit(5, 0, None).is_ok());

        let mut vault = mock_vault(1000, 0);
        vault.min_deposit = 100;
        assert!(vault.checked_deposit(5, 1000, None).is_err());
        assert!(vault.checked_deposit(100, 1000, None).is_ok());
    }

    #[test]
    fn test_queue_fifo_order() {
        let mut queue = WithdrawQueue {
            vault: Pubkey::default(),
            start_index: 0,
            end_index: 0,
            entries: Vec::new(),
            bump: 0,
        };
        let user = Pubkey::new_unique();
        assert_eq!(queue.push(user, 10).unwrap(), 0);
        assert_eq!(queue.push(user, 20).unwrap(), 1);
        assert_eq!(queue.push(user, 30).unwrap(), 2);

        let mut vault = mock_vault(1000, 0);
        let first = queue.finalize(&mut vault, 1000).unwrap();
        assert_eq!(first.request_id, 0);
        assert_eq!(first.shares, 10);
        let second = queue.finalize(&mut vault, 990).unwrap();
        assert_eq!(second.request_id, 1);
        assert_eq!(second.shares, 20);
    }

    #[test]
    fn test_finalize_requires_free_liquidity() {
        let mut queue = WithdrawQueue {
            vault: Pubkey::default(),
            start_index: 0,
            end_index: 0,
            entries: Vec::new(),
            bump: 0,
        };
        queue.push(Pubkey::new_unique(), 50).unwrap();

        // all assets lent out, nothing free to pay the head
        let mut vault = mock_vault(0, 100);
        assert!(queue.finalize(&mut vault, 100).is_err());
        // failure must not consume the head
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.start_index, 0);
    }
}
