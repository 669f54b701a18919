// Multipool Vault - multi-protocol yield-aggregating vault on Solana
// Depositors hold shares on a single underlying asset; vault managers
// allocate idle capital across external protocols through a uniform
// adapter interface and drain a FIFO queue for deferred redemptions.

use anchor_lang::prelude::*;

pub mod adapters;
pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;
pub mod util;

use adapters::ProtocolAction;
use instructions::*;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

#[program]
pub mod multipool_vault {
    use super::*;

    // ----- vault lifecycle -----

    /// Initialize a new vault for a given asset token
    ///
    /// Asset, lp name/symbol and the config manager are fixed for life.
    pub fn initialize(
        ctx: Context<Initialize>,
        lp_name: String,
        lp_symbol: String,
        min_deposit: u64,
    ) -> Result<()> {
        instructions::initialize::handle_initialize(ctx, lp_name, lp_symbol, min_deposit)
    }

    /// Set the anti-dust deposit floor
    pub fn set_min_deposit(ctx: Context<VaultAdmin>, min_deposit: u64) -> Result<()> {
        instructions::admin::handle_set_min_deposit(ctx, min_deposit)
    }

    /// Bind an adapter to a protocol slot (at most one per slot)
    pub fn add_lending_adapter(
        ctx: Context<AddLendingAdapter>,
        protocol: u8,
        adapter: Pubkey,
    ) -> Result<()> {
        instructions::admin::handle_add_lending_adapter(ctx, protocol, adapter)
    }

    /// Add or remove an operationally privileged vault manager
    pub fn add_vault_manager(
        ctx: Context<VaultAdmin>,
        manager: Pubkey,
        enabled: bool,
    ) -> Result<()> {
        instructions::admin::handle_add_vault_manager(ctx, manager, enabled)
    }

    /// Start the two-step ownership transfer
    pub fn transfer_ownership(ctx: Context<VaultAdmin>, new_owner: Pubkey) -> Result<()> {
        instructions::admin::handle_transfer_ownership(ctx, new_owner)
    }

    /// Complete the two-step ownership transfer
    pub fn accept_ownership(ctx: Context<AcceptOwnership>) -> Result<()> {
        instructions::admin::handle_accept_ownership(ctx)
    }

    /// Migrate the persisted vault state schema to the current version
    pub fn migrate_vault(ctx: Context<VaultAdmin>) -> Result<()> {
        instructions::admin::handle_migrate_vault(ctx)
    }

    // ----- deposits and withdrawals -----

    /// Deposit assets and mint proportional shares to the receiver
    ///
    /// Rejects deposits below min_deposit (except the very first, which seeds
    /// the technical position) and deposits rounding to zero shares.
    pub fn deposit(ctx: Context<Deposit>, assets: u64) -> Result<()> {
        instructions::deposit::handle_deposit(ctx, assets)
    }

    /// Deposit with an explicit minimum-shares-out bound
    pub fn deposit_with_slippage(
        ctx: Context<Deposit>,
        assets: u64,
        min_shares: u64,
    ) -> Result<()> {
        instructions::deposit::handle_deposit_with_slippage(ctx, assets, min_shares)
    }

    /// Mint an exact share amount, collecting assets rounded up
    pub fn mint_shares(ctx: Context<Deposit>, shares: u64) -> Result<()> {
        instructions::deposit::handle_mint_shares(ctx, shares)
    }

    /// Mint with an explicit maximum-assets-in bound
    pub fn mint_shares_with_slippage(
        ctx: Context<Deposit>,
        shares: u64,
        max_assets: u64,
    ) -> Result<()> {
        instructions::deposit::handle_mint_shares_with_slippage(ctx, shares, max_assets)
    }

    /// Withdraw an exact asset amount, burning shares rounded up
    ///
    /// Bounded by the owner's share balance at the current price; requests
    /// beyond free liquidity go through the withdrawal queue instead.
    pub fn withdraw(ctx: Context<Withdraw>, assets: u64) -> Result<()> {
        instructions::withdraw::handle_withdraw(ctx, assets)
    }

    /// Withdraw with an explicit maximum-shares-burned bound
    pub fn withdraw_with_slippage(
        ctx: Context<Withdraw>,
        assets: u64,
        max_shares: u64,
    ) -> Result<()> {
        instructions::withdraw::handle_withdraw_with_slippage(ctx, assets, max_shares)
    }

    /// Redeem an exact share amount for assets rounded down
    pub fn redeem(ctx: Context<Withdraw>, shares: u64) -> Result<()> {
        instructions::withdraw::handle_redeem(ctx, shares)
    }

    /// Redeem with an explicit minimum-assets-out bound
    pub fn redeem_with_slippage(
        ctx: Context<Withdraw>,
        shares: u64,
        min_assets: u64,
    ) -> Result<()> {
        instructions::withdraw::handle_redeem_with_slippage(ctx, shares, min_assets)
    }

    /// Request redemption; pays out immediately when liquidity allows,
    /// otherwise escrows the shares and appends a queue ticket
    pub fn request_withdraw(ctx: Context<RequestWithdraw>, shares: u64) -> Result<()> {
        instructions::request_withdraw::handle_request_withdraw(ctx, shares)
    }

    /// Pay out the head of the withdrawal queue (vault managers only)
    pub fn finalize_withdraw_request(ctx: Context<FinalizeWithdrawRequest>) -> Result<()> {
        instructions::finalize_withdraw_request::handle_finalize_withdraw_request(ctx)
    }

    // ----- protocol actions -----

    /// Execute an atomic batch of protocol actions (vault managers only)
    ///
    /// Each action dispatches to the adapter bound to its protocol slot and
    /// emits an audit event with the decoded amount moved.
    pub fn execute_protocol_action<'info>(
        ctx: Context<'_, '_, 'info, 'info, ExecuteProtocolAction<'info>>,
        actions: Vec<ProtocolAction>,
    ) -> Result<()> {
        instructions::execute_protocol_action::handle_execute_protocol_action(ctx, actions)
    }

    /// Re-query every bound adapter and overwrite the cached lent amounts
    pub fn update_total_lent<'info>(
        ctx: Context<'_, '_, 'info, 'info, UpdateTotalLent<'info>>,
    ) -> Result<()> {
        instructions::update_total_lent::handle_update_total_lent(ctx)
    }

    // ----- config management -----

    /// Create the global config singleton
    pub fn initialize_config(ctx: Context<InitializeConfig>) -> Result<()> {
        instructions::initialize_config::handle_initialize_config(ctx)
    }

    /// Toggle a vault's permission to use privileged config entry points
    pub fn add_vault(ctx: Context<AddVault>, allowed: bool) -> Result<()> {
        instructions::add_vault::handle_add_vault(ctx, allowed)
    }

    /// Approve a long-tail pool for a vault (at most 7 per vault)
    pub fn add_pool(ctx: Context<AddPool>) -> Result<()> {
        instructions::manage_pools::handle_add_pool(ctx)
    }

    /// Drop an approved pool; blocked while the vault holds a position in it
    pub fn remove_pool(ctx: Context<RemovePool>, index: u32) -> Result<()> {
        instructions::manage_pools::handle_remove_pool(ctx, index)
    }

    /// Set the single shared liquidity-pool endpoint
    pub fn set_lending_pool(ctx: Context<SetLendingPool>) -> Result<()> {
        instructions::manage_pools::handle_set_lending_pool(ctx)
    }

    /// Set the single shared liquid-staking endpoint
    pub fn set_staking_pool(ctx: Context<SetStakingPool>) -> Result<()> {
        instructions::manage_pools::handle_set_staking_pool(ctx)
    }

    /// Materialize a vault's position account for an endpoint protocol
    pub fn create_position(ctx: Context<CreatePosition>, protocol: u8) -> Result<()> {
        instructions::create_position::handle_create_position(ctx, protocol)
    }

    // ----- unstake-request queue (vault-only surface) -----

    /// Park a protocol-issued unstake request id in the vault's FIFO queue
    pub fn enqueue_unstake_request(
        ctx: Context<QueueAccess>,
        request_id: u64,
        amount: u64,
    ) -> Result<()> {
        instructions::unstake_queue::handle_enqueue_unstake_request(ctx, request_id, amount)
    }

    /// Remove the head of the vault's unstake-request queue
    pub fn dequeue_unstake_request(ctx: Context<QueueAccess>) -> Result<u64> {
        instructions::unstake_queue::handle_dequeue_unstake_request(ctx)
    }

    /// Advance a staking market's external settlement watermark
    pub fn mark_unstake_requests_finalized(
        ctx: Context<FinalizeUnstakeRequests>,
        up_to: u64,
    ) -> Result<()> {
        instructions::unstake_queue::handle_mark_unstake_requests_finalized(ctx, up_to)
    }
}
